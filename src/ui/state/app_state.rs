use chrono::Local;
use dioxus::prelude::{use_signal, Signal};

use crate::config::AppConfig;
use crate::domain::entities::table::{CellId, Column, ColumnId, ColumnType, TableId, TableMeta};
use crate::domain::entities::view::{FilterOperator, View};
use crate::ui::state::row_store::RowStore;
use crate::ui::state::viewport::Viewport;

#[derive(Clone, Copy)]
pub struct AppState {
    pub tables: Signal<Vec<TableMeta>>,
    pub selected_table_id: Signal<Option<TableId>>,
    pub views: Signal<Vec<View>>,
    pub current_view: Signal<Option<View>>,
    pub table_columns: Signal<Vec<Column>>,
    pub store: Signal<RowStore>,
    pub viewport: Signal<Viewport>,
    pub status: Signal<String>,
    pub editing_cell: Signal<Option<CellId>>,
    pub editing_value: Signal<String>,
    pub sort_column: Signal<Option<ColumnId>>,
    pub sort_desc: Signal<bool>,
    pub filter_column: Signal<Option<ColumnId>>,
    pub filter_operator: Signal<FilterOperator>,
    pub filter_value: Signal<String>,
    pub editing_filter: Signal<Option<usize>>,
    pub new_column_name: Signal<String>,
    pub new_column_numeric: Signal<bool>,
    pub search_text: Signal<String>,
    pub search_hit: Signal<Option<usize>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let page_size = config.page_size;
        let row_height = config.row_height;
        let overscan = config.overscan_rows;
        Self {
            tables: use_signal(Vec::<TableMeta>::new),
            selected_table_id: use_signal(|| None::<TableId>),
            views: use_signal(Vec::<View>::new),
            current_view: use_signal(|| None::<View>),
            table_columns: use_signal(Vec::<Column>::new),
            store: use_signal(move || RowStore::new(page_size)),
            viewport: use_signal(move || {
                Viewport::new(row_height, overscan).with_header(row_height)
            }),
            status: use_signal(|| "就緒".to_string()),
            editing_cell: use_signal(|| None::<CellId>),
            editing_value: use_signal(String::new),
            sort_column: use_signal(|| None::<ColumnId>),
            sort_desc: use_signal(|| false),
            filter_column: use_signal(|| None::<ColumnId>),
            filter_operator: use_signal(|| FilterOperator::Contains),
            filter_value: use_signal(String::new),
            editing_filter: use_signal(|| None::<usize>),
            new_column_name: use_signal(String::new),
            new_column_numeric: use_signal(|| false),
            search_text: use_signal(String::new),
            search_hit: use_signal(|| None::<usize>),
        }
    }
}

pub fn default_view_name() -> String {
    format!("檢視 {}", Local::now().format("%m%d"))
}

/// Columns the view shows, in table order. Without a view everything is shown.
pub fn visible_columns(columns: &[Column], view: Option<&View>) -> Vec<Column> {
    columns
        .iter()
        .filter(|column| view.map_or(true, |view| view.is_column_visible(column.id)))
        .cloned()
        .collect()
}

pub fn column_alignment(column: &Column) -> &'static str {
    match column.column_type {
        ColumnType::Number => "right",
        ColumnType::Text => "left",
    }
}
