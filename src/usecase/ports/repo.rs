use thiserror::Error;

use crate::domain::entities::page::Page;
use crate::domain::entities::table::{
    CellId, Column, ColumnId, NewColumn, RowId, TableId, TableMeta, ViewId,
};
use crate::domain::entities::view::View;
use crate::domain::query::cursor::CursorData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("{0}")]
    Message(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RepoError {
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        RepoError::Message(format!("{err:#}"))
    }
}

/// Row, column and cell storage. The page engine only reads through it.
pub trait TableRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn list_tables(&self) -> Result<Vec<TableMeta>, RepoError>;
    fn create_table(&self, name: &str, columns: &[NewColumn]) -> Result<TableId, RepoError>;
    fn create_table_with_rows(
        &self,
        name: &str,
        columns: &[NewColumn],
        rows: &[Vec<String>],
    ) -> Result<TableId, RepoError>;
    fn load_columns(&self, table_id: TableId) -> Result<Vec<Column>, RepoError>;
    fn create_column(&self, table_id: TableId, column: &NewColumn) -> Result<ColumnId, RepoError>;
    fn delete_column(&self, column_id: ColumnId) -> Result<(), RepoError>;
    fn create_row(&self, table_id: TableId) -> Result<RowId, RepoError>;
    fn delete_row(&self, row_id: RowId) -> Result<(), RepoError>;
    fn update_cell(&self, cell_id: CellId, value: &str) -> Result<(), RepoError>;
}

/// View persistence plus the keyset page query over a view.
pub trait ViewRepository: Send + Sync {
    fn create_view(&self, table_id: TableId, name: &str) -> Result<ViewId, RepoError>;
    fn get_view(&self, view_id: ViewId) -> Result<Option<View>, RepoError>;
    fn list_views(&self, table_id: TableId) -> Result<Vec<View>, RepoError>;
    fn get_current_view(&self, table_id: TableId) -> Result<Option<ViewId>, RepoError>;
    fn set_current_view(&self, table_id: TableId, view_id: ViewId) -> Result<(), RepoError>;
    /// Persists the sort list, filter list and hidden columns of `view` as a full replace.
    fn save_view_spec(&self, view: &View) -> Result<(), RepoError>;

    /// `Ok(None)` when the view no longer exists.
    fn fetch_page(
        &self,
        view_id: ViewId,
        cursor: Option<&CursorData>,
        limit: i64,
    ) -> Result<Option<Page>, RepoError>;
}
