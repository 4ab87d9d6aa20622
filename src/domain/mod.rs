pub mod entities;
pub mod query;
