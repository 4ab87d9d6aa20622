pub mod page_query;
pub mod queries;
pub mod repo;
pub mod schema;
