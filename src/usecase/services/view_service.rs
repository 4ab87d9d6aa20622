use std::sync::Arc;

use crate::domain::entities::table::{ColumnId, TableId, ViewId};
use crate::domain::entities::view::{FilterSpec, SortSpec, View};
use crate::usecase::ports::repo::{RepoError, ViewRepository};

pub struct ViewService {
    repo: Arc<dyn ViewRepository>,
}

impl ViewService {
    pub fn new(repo: Arc<dyn ViewRepository>) -> Self {
        Self { repo }
    }

    pub fn create_view(&self, table_id: TableId, name: &str) -> Result<ViewId, RepoError> {
        self.repo.create_view(table_id, name)
    }

    pub fn get_view(&self, view_id: ViewId) -> Result<Option<View>, RepoError> {
        self.repo.get_view(view_id)
    }

    pub fn list_views(&self, table_id: TableId) -> Result<Vec<View>, RepoError> {
        self.repo.list_views(table_id)
    }

    pub fn set_current_view(&self, table_id: TableId, view_id: ViewId) -> Result<(), RepoError> {
        self.repo.set_current_view(table_id, view_id)
    }

    /// Current view of the table, falling back to its first view and finally
    /// to a new view named `default_name`. The result becomes current.
    pub fn open_current_view(
        &self,
        table_id: TableId,
        default_name: &str,
    ) -> Result<View, RepoError> {
        let current = match self.repo.get_current_view(table_id)? {
            Some(view_id) => self.repo.get_view(view_id)?,
            None => None,
        };
        let view = match current {
            Some(view) => view,
            None => match self.repo.list_views(table_id)?.into_iter().next() {
                Some(view) => view,
                None => {
                    let view_id = self.repo.create_view(table_id, default_name)?;
                    self.repo.get_view(view_id)?.ok_or_else(|| {
                        RepoError::Message(format!("view #{view_id} vanished after create"))
                    })?
                }
            },
        };
        self.repo.set_current_view(table_id, view.id)?;
        Ok(view)
    }

    pub fn upsert_sort(&self, view_id: ViewId, sort: SortSpec) -> Result<Option<View>, RepoError> {
        self.edit(view_id, |view| {
            view.upsert_sort(sort);
            true
        })
    }

    pub fn remove_sort(&self, view_id: ViewId, sort: &SortSpec) -> Result<Option<View>, RepoError> {
        self.edit(view_id, |view| view.remove_sort(sort))
    }

    pub fn add_filter(
        &self,
        view_id: ViewId,
        filter: FilterSpec,
    ) -> Result<Option<View>, RepoError> {
        self.edit(view_id, |view| {
            view.add_filter(filter);
            true
        })
    }

    pub fn replace_filter(
        &self,
        view_id: ViewId,
        index: usize,
        filter: FilterSpec,
    ) -> Result<Option<View>, RepoError> {
        self.edit(view_id, |view| view.replace_filter(index, filter))
    }

    pub fn remove_filter(
        &self,
        view_id: ViewId,
        filter: &FilterSpec,
    ) -> Result<Option<View>, RepoError> {
        self.edit(view_id, |view| view.remove_filter(filter))
    }

    pub fn set_column_hidden(
        &self,
        view_id: ViewId,
        column_id: ColumnId,
        hidden: bool,
    ) -> Result<Option<View>, RepoError> {
        self.edit(view_id, |view| {
            view.set_column_hidden(column_id, hidden);
            true
        })
    }

    /// Applies `change` to the stored view and persists the whole spec when it
    /// reports a modification. `Ok(None)` when the view no longer exists.
    fn edit<F>(&self, view_id: ViewId, change: F) -> Result<Option<View>, RepoError>
    where
        F: FnOnce(&mut View) -> bool,
    {
        let Some(mut view) = self.repo.get_view(view_id)? else {
            return Ok(None);
        };
        if change(&mut view) {
            self.repo.save_view_spec(&view)?;
        }
        Ok(Some(view))
    }
}
