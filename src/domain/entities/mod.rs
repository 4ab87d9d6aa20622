pub mod page;
pub mod table;
pub mod view;
