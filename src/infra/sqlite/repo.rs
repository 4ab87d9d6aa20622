use std::path::PathBuf;

use crate::domain::entities::page::Page;
use crate::domain::entities::table::{
    CellId, Column, ColumnId, NewColumn, RowId, TableId, TableMeta, ViewId,
};
use crate::domain::entities::view::View;
use crate::domain::query::cursor::CursorData;
use crate::infra::sqlite::page_query::fetch_page;
use crate::infra::sqlite::queries::{
    create_column, create_row, create_table_with_rows, create_view, delete_column, delete_row,
    get_current_view, get_view, list_tables, list_views, load_columns, save_view_spec,
    set_current_view, update_cell,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{RepoError, TableRepository, ViewRepository};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl SqliteRepo {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

impl TableRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(RepoError::from_anyhow)
    }

    fn list_tables(&self) -> Result<Vec<TableMeta>, RepoError> {
        list_tables(&self.db_path).map_err(RepoError::from_anyhow)
    }

    fn create_table(&self, name: &str, columns: &[NewColumn]) -> Result<TableId, RepoError> {
        self.create_table_with_rows(name, columns, &[])
    }

    fn create_table_with_rows(
        &self,
        name: &str,
        columns: &[NewColumn],
        rows: &[Vec<String>],
    ) -> Result<TableId, RepoError> {
        create_table_with_rows(&self.db_path, name, columns, rows)
            .map(TableId)
            .map_err(RepoError::from_anyhow)
    }

    fn load_columns(&self, table_id: TableId) -> Result<Vec<Column>, RepoError> {
        load_columns(&self.db_path, table_id.0).map_err(RepoError::from_anyhow)
    }

    fn create_column(&self, table_id: TableId, column: &NewColumn) -> Result<ColumnId, RepoError> {
        create_column(&self.db_path, table_id.0, column)
            .map(ColumnId)
            .map_err(RepoError::from_anyhow)
    }

    fn delete_column(&self, column_id: ColumnId) -> Result<(), RepoError> {
        delete_column(&self.db_path, column_id.0).map_err(RepoError::from_anyhow)
    }

    fn create_row(&self, table_id: TableId) -> Result<RowId, RepoError> {
        create_row(&self.db_path, table_id.0)
            .map(RowId)
            .map_err(RepoError::from_anyhow)
    }

    fn delete_row(&self, row_id: RowId) -> Result<(), RepoError> {
        delete_row(&self.db_path, row_id.0).map_err(RepoError::from_anyhow)
    }

    fn update_cell(&self, cell_id: CellId, value: &str) -> Result<(), RepoError> {
        update_cell(&self.db_path, cell_id.0, value).map_err(RepoError::from_anyhow)
    }
}

impl ViewRepository for SqliteRepo {
    fn create_view(&self, table_id: TableId, name: &str) -> Result<ViewId, RepoError> {
        create_view(&self.db_path, table_id.0, name)
            .map(ViewId)
            .map_err(RepoError::from_anyhow)
    }

    fn get_view(&self, view_id: ViewId) -> Result<Option<View>, RepoError> {
        get_view(&self.db_path, view_id.0).map_err(RepoError::from_anyhow)
    }

    fn list_views(&self, table_id: TableId) -> Result<Vec<View>, RepoError> {
        list_views(&self.db_path, table_id.0).map_err(RepoError::from_anyhow)
    }

    fn get_current_view(&self, table_id: TableId) -> Result<Option<ViewId>, RepoError> {
        get_current_view(&self.db_path, table_id.0)
            .map(|view_id| view_id.map(ViewId))
            .map_err(RepoError::from_anyhow)
    }

    fn set_current_view(&self, table_id: TableId, view_id: ViewId) -> Result<(), RepoError> {
        set_current_view(&self.db_path, table_id.0, view_id.0).map_err(RepoError::from_anyhow)
    }

    fn save_view_spec(&self, view: &View) -> Result<(), RepoError> {
        save_view_spec(&self.db_path, view).map_err(RepoError::from_anyhow)
    }

    fn fetch_page(
        &self,
        view_id: ViewId,
        cursor: Option<&CursorData>,
        limit: i64,
    ) -> Result<Option<Page>, RepoError> {
        fetch_page(&self.db_path, view_id, cursor, limit).map_err(RepoError::from_anyhow)
    }
}
