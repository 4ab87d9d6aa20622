pub mod edit_service;
pub mod page_service;
pub mod view_service;
