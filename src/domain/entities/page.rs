use crate::domain::entities::table::{CellId, Column, ColumnId, ColumnType, RowId};

#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    pub cell_id: CellId,
    pub column_id: ColumnId,
    pub value: String,
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowData {
    pub id: RowId,
    pub cells: Vec<CellData>,
}

impl RowData {
    pub fn cell(&self, column_id: ColumnId) -> Option<&CellData> {
        self.cells.iter().find(|cell| cell.column_id == column_id)
    }

    pub fn value(&self, column_id: ColumnId) -> Option<&str> {
        self.cell(column_id).map(|cell| cell.value.as_str())
    }
}

/// One page of a view, in compiled order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub columns: Vec<Column>,
    pub rows: Vec<RowData>,
    /// Opaque token resuming right after the last row; absent on the final page.
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn has_next_page(&self) -> bool {
        self.next_cursor.is_some()
    }
}
