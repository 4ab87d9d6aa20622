use std::sync::Arc;

use tracing::debug;

use crate::config::MAX_PAGE_SIZE;
use crate::domain::entities::page::Page;
use crate::domain::entities::table::ViewId;
use crate::domain::query::cursor;
use crate::usecase::ports::repo::{RepoError, ViewRepository};

/// Fetch boundary between the grid and the page query.
pub struct PageService {
    repo: Arc<dyn ViewRepository>,
}

impl PageService {
    pub fn new(repo: Arc<dyn ViewRepository>) -> Self {
        Self { repo }
    }

    /// Returns `Ok(None)` when the view has been deleted. An undecodable
    /// cursor restarts the view from its first row.
    pub fn fetch_page(
        &self,
        view_id: ViewId,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<Option<Page>, RepoError> {
        if limit <= 0 {
            return Err(RepoError::InvalidRequest(format!(
                "limit must be greater than zero, got {limit}"
            )));
        }
        let cursor = cursor.and_then(|token| match cursor::decode(token) {
            Ok(data) => Some(data),
            Err(err) => {
                debug!(view_id = %view_id, error = %err, "starting from the first row");
                None
            }
        });
        self.repo
            .fetch_page(view_id, cursor.as_ref(), limit.min(MAX_PAGE_SIZE))
    }
}
