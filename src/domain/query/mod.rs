pub mod cursor;
pub mod order;
pub mod predicate;
pub mod value;
