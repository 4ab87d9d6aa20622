//! Incrementally loaded rows of one view.
//!
//! Pages are appended in the order the server returned them and are never
//! re-sorted locally. Every spec change bumps `generation`; a response that
//! carries an older generation is dropped instead of appended.

use std::fmt::Display;

use tracing::{debug, warn};

use crate::domain::entities::page::{Page, RowData};
use crate::domain::entities::table::{CellId, Column, RowId, ViewId};
use crate::domain::query::value::fold;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Complete,
    ViewMissing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub view_id: ViewId,
    pub generation: u64,
    pub cursor: Option<String>,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended(usize),
    Stale,
    ViewMissing,
    Failed,
}

#[derive(Debug, Clone)]
pub struct RowStore {
    view_id: Option<ViewId>,
    page_size: i64,
    generation: u64,
    columns: Vec<Column>,
    rows: Vec<RowData>,
    next_cursor: Option<String>,
    status: LoadStatus,
}

impl RowStore {
    pub fn new(page_size: i64) -> Self {
        Self {
            view_id: None,
            page_size: page_size.max(1),
            generation: 0,
            columns: Vec::new(),
            rows: Vec::new(),
            next_cursor: None,
            status: LoadStatus::Idle,
        }
    }

    pub fn view_id(&self) -> Option<ViewId> {
        self.view_id
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowData] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn has_more(&self) -> bool {
        !matches!(self.status, LoadStatus::Complete | LoadStatus::ViewMissing)
    }

    /// Switches to another view and starts over.
    pub fn set_view(&mut self, view_id: Option<ViewId>) {
        self.view_id = view_id;
        self.reset();
    }

    /// Drops every loaded page. Call after any sort, filter or column change:
    /// rows fetched under the old spec and their cursor are no longer valid.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.columns.clear();
        self.rows.clear();
        self.next_cursor = None;
        self.status = LoadStatus::Idle;
    }

    /// Next page request, or `None` while a fetch is in flight or when the
    /// view has no more rows.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        let view_id = self.view_id?;
        match self.status {
            LoadStatus::Loading | LoadStatus::Complete | LoadStatus::ViewMissing => return None,
            LoadStatus::Idle | LoadStatus::Failed(_) => {}
        }
        self.status = LoadStatus::Loading;
        Some(PageRequest {
            view_id,
            generation: self.generation,
            cursor: self.next_cursor.clone(),
            limit: self.page_size,
        })
    }

    pub fn complete_load<E: Display>(
        &mut self,
        request: &PageRequest,
        result: Result<Option<Page>, E>,
    ) -> LoadOutcome {
        if request.generation != self.generation || Some(request.view_id) != self.view_id {
            debug!(
                view_id = %request.view_id,
                request_generation = request.generation,
                generation = self.generation,
                "discarding page for a superseded view spec"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(Some(page)) => {
                let has_next_page = page.has_next_page();
                if request.cursor.is_none() {
                    self.columns = page.columns;
                }
                let appended = page.rows.len();
                self.status = if has_next_page {
                    LoadStatus::Idle
                } else {
                    LoadStatus::Complete
                };
                self.rows.extend(page.rows);
                self.next_cursor = page.next_cursor;
                LoadOutcome::Appended(appended)
            }
            Ok(None) => {
                debug!(view_id = %request.view_id, "view is gone, stopping pagination");
                self.status = LoadStatus::ViewMissing;
                LoadOutcome::ViewMissing
            }
            Err(err) => {
                warn!(view_id = %request.view_id, error = %err, "page fetch failed");
                self.status = LoadStatus::Failed(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Synchronous `begin_load` + `complete_load`.
    #[cfg(test)]
    pub fn load_more<F, E>(&mut self, fetch: F) -> Option<LoadOutcome>
    where
        F: FnOnce(&PageRequest) -> Result<Option<Page>, E>,
        E: Display,
    {
        let request = self.begin_load()?;
        let result = fetch(&request);
        Some(self.complete_load(&request, result))
    }

    /// Updates the cell in place without moving its row.
    pub fn patch_cell(&mut self, cell_id: CellId, value: &str) -> bool {
        let mut patched = false;
        for cell in self
            .rows
            .iter_mut()
            .flat_map(|row| row.cells.iter_mut())
            .filter(|cell| cell.cell_id == cell_id)
        {
            cell.value = value.to_string();
            patched = true;
        }
        patched
    }

    /// Drops a deleted row. Later rows shift up by one. The cursor resumes from
    /// sort values, not a position, so it stays usable.
    pub fn remove_row(&mut self, row_id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != row_id);
        self.rows.len() != before
    }

    /// Indices of loaded rows with a cell containing `needle`, ignoring case.
    pub fn search(&self, needle: &str) -> Vec<usize> {
        let needle = fold(needle.trim());
        if needle.is_empty() {
            return Vec::new();
        }
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.cells.iter().any(|cell| fold(&cell.value).contains(&needle)))
            .map(|(idx, _)| idx)
            .collect()
    }
}
