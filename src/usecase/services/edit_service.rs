use std::sync::Arc;

use crate::domain::entities::table::{
    CellId, Column, ColumnId, NewColumn, RowId, TableId, TableMeta,
};
use crate::usecase::ports::repo::{RepoError, TableRepository};

pub struct EditService {
    repo: Arc<dyn TableRepository>,
}

impl EditService {
    pub fn new(repo: Arc<dyn TableRepository>) -> Self {
        Self { repo }
    }

    pub fn init(&self) -> Result<(), RepoError> {
        self.repo.init()
    }

    pub fn list_tables(&self) -> Result<Vec<TableMeta>, RepoError> {
        self.repo.list_tables()
    }

    pub fn create_table(&self, name: &str, columns: &[NewColumn]) -> Result<TableId, RepoError> {
        self.repo.create_table(name, columns)
    }

    pub fn create_table_with_rows(
        &self,
        name: &str,
        columns: &[NewColumn],
        rows: &[Vec<String>],
    ) -> Result<TableId, RepoError> {
        self.repo.create_table_with_rows(name, columns, rows)
    }

    pub fn load_columns(&self, table_id: TableId) -> Result<Vec<Column>, RepoError> {
        self.repo.load_columns(table_id)
    }

    pub fn create_column(
        &self,
        table_id: TableId,
        column: &NewColumn,
    ) -> Result<ColumnId, RepoError> {
        self.repo.create_column(table_id, column)
    }

    pub fn delete_column(&self, column_id: ColumnId) -> Result<(), RepoError> {
        self.repo.delete_column(column_id)
    }

    pub fn create_row(&self, table_id: TableId) -> Result<RowId, RepoError> {
        self.repo.create_row(table_id)
    }

    pub fn delete_row(&self, row_id: RowId) -> Result<(), RepoError> {
        self.repo.delete_row(row_id)
    }

    pub fn update_cell(&self, cell_id: CellId, value: &str) -> Result<(), RepoError> {
        self.repo.update_cell(cell_id, value)
    }
}
