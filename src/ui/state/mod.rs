pub mod app_state;
pub mod row_store;
pub mod viewport;
