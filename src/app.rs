use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::domain::entities::page::{CellData, RowData};
use crate::domain::entities::table::{
    CellId, ColumnId, NewColumn, RowId, TableId, TableMeta, ViewId,
};
use crate::domain::entities::view::{FilterOperator, FilterSpec, SortDirection, SortSpec, View};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::state::app_state::{column_alignment, default_view_name, visible_columns, AppState};
use crate::ui::state::row_store::{LoadOutcome, LoadStatus};
use crate::usecase::ports::repo::RepoError;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::page_service::PageService;
use crate::usecase::services::view_service::ViewService;

const GRID_ID: &str = "viewgrid-body";

#[derive(Clone)]
struct Services {
    pages: Arc<PageService>,
    views: Arc<ViewService>,
    edits: Arc<EditService>,
}

impl Services {
    fn new(config: &AppConfig) -> Self {
        let repo = Arc::new(SqliteRepo::new(config.db_path.clone()));
        Self {
            pages: Arc::new(PageService::new(repo.clone())),
            views: Arc::new(ViewService::new(repo.clone())),
            edits: Arc::new(EditService::new(repo)),
        }
    }
}

fn header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 2; background: #f3f3f3; border: 1px solid #bbb; padding: 4px; text-align: left;"
}

fn cell_style(alignment: &str) -> String {
    format!(
        "border: 1px solid #bbb; padding: 0 4px; text-align: {alignment}; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;"
    )
}

fn chip_style() -> &'static str {
    "display: inline-flex; align-items: center; gap: 4px; border: 1px solid #bbb; border-radius: 12px; padding: 2px 8px; background: #fafafa;"
}

fn scroll_grid_to(top: f64, smooth: bool) {
    let behavior = if smooth { "smooth" } else { "auto" };
    let _ = document::eval(&format!(
        "document.getElementById('{GRID_ID}')?.scrollTo({{ top: {top}, behavior: '{behavior}' }});"
    ));
}

/// Requests the next page unless one is in flight or the view is exhausted.
fn load_next_page(services: &Services, mut state: AppState) {
    let Some(request) = state.store.write().begin_load() else {
        return;
    };
    let pages = services.pages.clone();
    spawn(async move {
        let result = run_blocking("fetch_page", || {
            pages.fetch_page(request.view_id, request.cursor.as_deref(), request.limit)
        });
        let outcome = state.store.write().complete_load(&request, result);
        match outcome {
            LoadOutcome::Appended(_) | LoadOutcome::Stale => {}
            LoadOutcome::ViewMissing => state.status.set("檢視已被刪除".to_string()),
            LoadOutcome::Failed => state.status.set("載入失敗".to_string()),
        }
    });
}

/// Makes `view` current and restarts pagination under its spec.
fn show_view(mut state: AppState, view: View) {
    if let Some(existing) = state
        .views
        .write()
        .iter_mut()
        .find(|existing| existing.id == view.id)
    {
        *existing = view.clone();
    }
    state.search_hit.set(None);
    state.editing_cell.set(None);
    state.editing_filter.set(None);
    state.store.write().set_view(Some(view.id));
    state.current_view.set(Some(view));
    scroll_grid_to(0.0, false);
}

fn apply_spec_change(mut state: AppState, result: Result<Option<View>, RepoError>) {
    match result {
        Ok(Some(view)) => show_view(state, view),
        Ok(None) => {
            state.current_view.set(None);
            state.store.write().set_view(None);
            state.status.set("檢視已被刪除".to_string());
        }
        Err(err) => state.status.set(format!("更新檢視失敗：{err}")),
    }
}

fn open_table(services: &Services, mut state: AppState, table_id: TableId) -> Result<(), RepoError> {
    let view = run_blocking("open_current_view", || {
        services
            .views
            .open_current_view(table_id, &default_view_name())
    })?;
    let views = run_blocking("list_views", || services.views.list_views(table_id))?;
    state.selected_table_id.set(Some(table_id));
    state.views.set(views);
    refresh_columns(services, state, table_id);
    show_view(state, view);
    Ok(())
}

fn refresh_columns(services: &Services, mut state: AppState, table_id: TableId) {
    match run_blocking("load_columns", || services.edits.load_columns(table_id)) {
        Ok(columns) => state.table_columns.set(columns),
        Err(err) => state.status.set(format!("載入欄位失敗：{err}")),
    }
}

fn starter_columns() -> [NewColumn; 2] {
    [NewColumn::text("Name"), NewColumn::number("Value")]
}

fn starter_rows() -> Vec<Vec<String>> {
    [("Apple", "3"), ("Banana", "1"), ("Cherry", "")]
        .into_iter()
        .map(|(name, value)| vec![name.to_string(), value.to_string()])
        .collect()
}

fn refresh_tables(services: &Services, mut state: AppState) {
    match run_blocking("list_tables", || services.edits.list_tables()) {
        Ok(tables) => state.tables.set(tables),
        Err(err) => state.status.set(format!("載入資料表失敗：{err}")),
    }
}

#[component]
fn GridCell(
    cell: Option<CellData>,
    alignment: &'static str,
    mut editing_cell: Signal<Option<CellId>>,
    mut editing_value: Signal<String>,
    on_commit: EventHandler<(CellId, String)>,
) -> Element {
    let Some(cell) = cell else {
        return rsx! {
            td { style: "{cell_style(alignment)}" }
        };
    };
    let cell_id = cell.cell_id;

    if editing_cell() == Some(cell_id) {
        rsx! {
            td { style: "{cell_style(alignment)}",
                input {
                    style: "width: 100%; box-sizing: border-box;",
                    value: editing_value(),
                    autofocus: true,
                    oninput: move |event| editing_value.set(event.value()),
                    onkeydown: move |event| {
                        if event.key() == Key::Enter {
                            on_commit.call((cell_id, editing_value()));
                            editing_cell.set(None);
                        } else if event.key() == Key::Escape {
                            editing_cell.set(None);
                        }
                    },
                }
            }
        }
    } else {
        let value = cell.value.clone();
        rsx! {
            td {
                style: "{cell_style(alignment)}",
                ondoubleclick: move |_| {
                    editing_cell.set(Some(cell_id));
                    editing_value.set(value.clone());
                },
                "{cell.value}"
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_hook(|| AppConfig::from_env().map_err(|err| format!("{err:#}")));
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            return rsx! {
                div {
                    p { "無法取得資料庫路徑：{err}" }
                }
            };
        }
    };
    let services = use_hook(|| Services::new(&config));
    let prefetch_rows = config.prefetch_rows;
    let row_height = config.row_height;

    let state = AppState::new(&config);
    let AppState {
        tables,
        selected_table_id,
        views,
        current_view,
        table_columns,
        mut store,
        mut viewport,
        mut status,
        editing_cell,
        editing_value,
        mut sort_column,
        mut sort_desc,
        mut filter_column,
        mut filter_operator,
        mut filter_value,
        mut editing_filter,
        mut new_column_name,
        mut new_column_numeric,
        mut search_text,
        mut search_hit,
    } = state;
    let mut grid_element = use_signal(|| None::<Rc<MountedData>>);

    use_effect({
        let services = services.clone();
        move || {
            let mut state = state;
            let init_result = run_blocking("init", || -> Result<Vec<TableMeta>, RepoError> {
                services.edits.init()?;
                let tables = services.edits.list_tables()?;
                if !tables.is_empty() {
                    return Ok(tables);
                }
                services
                    .edits
                    .create_table_with_rows("資料表 1", &starter_columns(), &starter_rows())?;
                services.edits.list_tables()
            });
            match init_result {
                Ok(available) => {
                    let first_table = available.first().map(|table| table.id);
                    state.tables.set(available);
                    if let Some(table_id) = first_table {
                        if let Err(err) = open_table(&services, state, table_id) {
                            state.status.set(format!("開啟資料表失敗：{err}"));
                        }
                    }
                }
                Err(err) => {
                    state.status.set(format!("初始化資料庫失敗：{err}"));
                }
            }
        }
    });

    // Keeps pulling pages while the loaded tail is within reach of the viewport.
    use_effect({
        let services = services.clone();
        move || {
            let (row_count, idle) = {
                let store = store.read();
                (
                    store.len(),
                    store.view_id().is_some() && matches!(store.status(), LoadStatus::Idle),
                )
            };
            if idle && viewport.read().should_load_more(row_count, prefetch_rows) {
                load_next_page(&services, state);
            }
        }
    });

    let commit_cell = use_callback({
        let services = services.clone();
        move |(cell_id, value): (CellId, String)| {
            match run_blocking("update_cell", || services.edits.update_cell(cell_id, &value)) {
                Ok(()) => {
                    store.write().patch_cell(cell_id, &value);
                    status.set("已更新儲存格".to_string());
                }
                Err(err) => status.set(format!("更新儲存格失敗：{err}")),
            }
        }
    });

    let current_view_snapshot = current_view();
    let current_view_id: Option<ViewId> = current_view_snapshot.as_ref().map(|view| view.id);
    let (all_columns, row_count, store_empty, all_loaded, load_status, visible_rows, range) = {
        let store = store.read();
        let range = viewport.read().visible_range(store.len());
        let visible_rows: Vec<(usize, RowData)> = store.rows()[range.clone()]
            .iter()
            .cloned()
            .enumerate()
            .map(|(offset, row)| (range.start + offset, row))
            .collect();
        (
            store.columns().to_vec(),
            store.len(),
            store.is_empty(),
            !store.has_more(),
            store.status().clone(),
            visible_rows,
            range,
        )
    };
    let shown_columns = visible_columns(&all_columns, current_view_snapshot.as_ref());
    let action_cell_style = cell_style("center");
    let viewport_snapshot = viewport();
    let top_pad = viewport_snapshot.offset_of(range.start);
    let bottom_pad = (viewport_snapshot.total_height(row_count)
        - viewport_snapshot.offset_of(range.end))
    .max(0.0);
    let load_failed = matches!(load_status, LoadStatus::Failed(_));
    let loading = load_status == LoadStatus::Loading;
    let editor_columns = table_columns();
    let column_name = {
        let editor_columns = editor_columns.clone();
        move |column_id: ColumnId| {
            editor_columns
                .iter()
                .find(|column| column.id == column_id)
                .map(|column| column.name.clone())
                .unwrap_or_else(|| "(已刪除欄位)".to_string())
        }
    };
    let sort_chips: Vec<(SortSpec, String)> = current_view_snapshot
        .as_ref()
        .map(|view| {
            view.sorts
                .iter()
                .map(|sort| {
                    let arrow = match sort.direction {
                        SortDirection::Asc => "↑",
                        SortDirection::Desc => "↓",
                    };
                    (sort.clone(), format!("{} {arrow}", column_name(sort.column_id)))
                })
                .collect()
        })
        .unwrap_or_default();
    let filter_chips: Vec<(FilterSpec, String)> = current_view_snapshot
        .as_ref()
        .map(|view| {
            view.filters
                .iter()
                .map(|filter| {
                    let label = if filter.operator.is_unary() {
                        format!("{} {}", column_name(filter.column_id), filter.operator.as_str())
                    } else {
                        format!(
                            "{} {} \"{}\"",
                            column_name(filter.column_id),
                            filter.operator.as_str(),
                            filter.value
                        )
                    };
                    (filter.clone(), label)
                })
                .collect()
        })
        .unwrap_or_default();
    let filter_needs_value = !filter_operator().is_unary();

    rsx! {
        div {
            style: "font-family: 'Noto Sans TC', sans-serif; padding: 12px; background: #fff; height: 100vh; box-sizing: border-box; display: flex; flex-direction: column; gap: 8px;",

            div { style: "display: flex; gap: 8px; align-items: center; flex-wrap: wrap;",
                span { "資料表" }
                select {
                    onchange: {
                        let services = services.clone();
                        move |event: Event<FormData>| {
                            let Ok(id) = event.value().parse::<i64>() else {
                                return;
                            };
                            if let Err(err) = open_table(&services, state, TableId(id)) {
                                status.set(format!("開啟資料表失敗：{err}"));
                            }
                        }
                    },
                    for table in tables() {
                        option {
                            value: "{table.id}",
                            selected: selected_table_id() == Some(table.id),
                            "{table.name} ({table.row_count})"
                        }
                    }
                }
                span { "檢視" }
                select {
                    onchange: {
                        let services = services.clone();
                        move |event: Event<FormData>| {
                            let Ok(id) = event.value().parse::<i64>() else {
                                return;
                            };
                            let Some(table_id) = selected_table_id() else {
                                return;
                            };
                            let Some(view) = views().into_iter().find(|view| view.id == ViewId(id)) else {
                                return;
                            };
                            if let Err(err) = run_blocking("set_current_view", || {
                                services.views.set_current_view(table_id, view.id)
                            }) {
                                status.set(format!("切換檢視失敗：{err}"));
                                return;
                            }
                            show_view(state, view);
                        }
                    },
                    for view in views() {
                        option {
                            value: "{view.id}",
                            selected: current_view_id == Some(view.id),
                            "{view.name}"
                        }
                    }
                }
                button {
                    disabled: selected_table_id().is_none(),
                    onclick: {
                        let services = services.clone();
                        move |_| {
                            let Some(table_id) = selected_table_id() else {
                                return;
                            };
                            let created = run_blocking("create_view", || {
                                let view_id = services.views.create_view(table_id, &default_view_name())?;
                                services.views.set_current_view(table_id, view_id)?;
                                services.views.get_view(view_id)
                            });
                            match created {
                                Ok(Some(view)) => {
                                    let mut state = state;
                                    state.views.write().push(view.clone());
                                    show_view(state, view);
                                }
                                Ok(None) => status.set("新增檢視失敗".to_string()),
                                Err(err) => status.set(format!("新增檢視失敗：{err}")),
                            }
                        }
                    },
                    "新增檢視"
                }
                button {
                    onclick: {
                        let services = services.clone();
                        move |_| {
                            let name = format!("資料表 {}", tables().len() + 1);
                            let created = run_blocking("create_table", || {
                                services.edits.create_table(&name, &starter_columns())
                            });
                            match created {
                                Ok(table_id) => {
                                    refresh_tables(&services, state);
                                    if let Err(err) = open_table(&services, state, table_id) {
                                        status.set(format!("開啟資料表失敗：{err}"));
                                    }
                                }
                                Err(err) => status.set(format!("新增資料表失敗：{err}")),
                            }
                        }
                    },
                    "新增資料表"
                }
                button {
                    disabled: selected_table_id().is_none(),
                    onclick: {
                        let services = services.clone();
                        move |_| {
                            let Some(table_id) = selected_table_id() else {
                                return;
                            };
                            match run_blocking("create_row", || services.edits.create_row(table_id)) {
                                Ok(_) => {
                                    store.write().reset();
                                    refresh_tables(&services, state);
                                    status.set("已新增列".to_string());
                                }
                                Err(err) => status.set(format!("新增列失敗：{err}")),
                            }
                        }
                    },
                    "新增列"
                }
                input {
                    placeholder: "新欄位名稱",
                    value: new_column_name(),
                    oninput: move |event| new_column_name.set(event.value()),
                }
                button {
                    onclick: move |_| new_column_numeric.set(!new_column_numeric()),
                    if new_column_numeric() { "數字" } else { "文字" }
                }
                button {
                    disabled: selected_table_id().is_none() || new_column_name().trim().is_empty(),
                    onclick: {
                        let services = services.clone();
                        move |_| {
                            let Some(table_id) = selected_table_id() else {
                                return;
                            };
                            let name = new_column_name().trim().to_string();
                            let column = if new_column_numeric() {
                                NewColumn::number(&name)
                            } else {
                                NewColumn::text(&name)
                            };
                            match run_blocking("create_column", || services.edits.create_column(table_id, &column)) {
                                Ok(_) => {
                                    new_column_name.set(String::new());
                                    refresh_columns(&services, state, table_id);
                                    store.write().reset();
                                    status.set("已新增欄位".to_string());
                                }
                                Err(err) => status.set(format!("新增欄位失敗：{err}")),
                            }
                        }
                    },
                    "新增欄位"
                }
            }

            div { style: "display: flex; gap: 8px; align-items: center; flex-wrap: wrap;",
                span { "排序" }
                select {
                    onchange: move |event: Event<FormData>| {
                        sort_column.set(event.value().parse::<i64>().ok().map(ColumnId));
                    },
                    option { value: "", "選擇排序欄位" }
                    for column in editor_columns.iter() {
                        option {
                            value: "{column.id}",
                            selected: sort_column() == Some(column.id),
                            "{column.name}"
                        }
                    }
                }
                button {
                    onclick: move |_| sort_desc.set(!sort_desc()),
                    if sort_desc() { "降冪" } else { "升冪" }
                }
                button {
                    disabled: sort_column().is_none() || current_view_id.is_none(),
                    onclick: {
                        let services = services.clone();
                        move |_| {
                            let (Some(view_id), Some(column_id)) = (current_view_id, sort_column()) else {
                                return;
                            };
                            let sort = SortSpec {
                                column_id,
                                direction: if sort_desc() { SortDirection::Desc } else { SortDirection::Asc },
                            };
                            let result = run_blocking("upsert_sort", || services.views.upsert_sort(view_id, sort));
                            apply_spec_change(state, result);
                        }
                    },
                    "套用排序"
                }
                for (sort, label) in sort_chips {
                    span { style: "{chip_style()}",
                        "{label}"
                        button {
                            onclick: {
                                let services = services.clone();
                                move |_| {
                                    let Some(view_id) = current_view_id else {
                                        return;
                                    };
                                    let result = run_blocking("remove_sort", || services.views.remove_sort(view_id, &sort));
                                    apply_spec_change(state, result);
                                }
                            },
                            "×"
                        }
                    }
                }
            }

            div { style: "display: flex; gap: 8px; align-items: center; flex-wrap: wrap;",
                span { "篩選" }
                select {
                    onchange: move |event: Event<FormData>| {
                        filter_column.set(event.value().parse::<i64>().ok().map(ColumnId));
                    },
                    option { value: "", "選擇欄位" }
                    for column in editor_columns.iter() {
                        option {
                            value: "{column.id}",
                            selected: filter_column() == Some(column.id),
                            "{column.name}"
                        }
                    }
                }
                select {
                    onchange: move |event: Event<FormData>| {
                        filter_operator.set(FilterOperator::parse(&event.value()));
                    },
                    for operator in FilterOperator::ALL {
                        option {
                            value: "{operator.as_str()}",
                            selected: filter_operator() == operator,
                            "{operator.as_str()}"
                        }
                    }
                }
                if filter_needs_value {
                    input {
                        placeholder: "篩選值",
                        value: filter_value(),
                        oninput: move |event| filter_value.set(event.value()),
                    }
                }
                button {
                    disabled: filter_column().is_none() || current_view_id.is_none(),
                    onclick: {
                        let services = services.clone();
                        move |_| {
                            let (Some(view_id), Some(column_id)) = (current_view_id, filter_column()) else {
                                return;
                            };
                            let operator = filter_operator();
                            let value = if operator.is_unary() { String::new() } else { filter_value() };
                            let filter = FilterSpec { column_id, operator, value };
                            let result = match editing_filter() {
                                Some(index) => run_blocking("replace_filter", || {
                                    services.views.replace_filter(view_id, index, filter)
                                }),
                                None => run_blocking("add_filter", || services.views.add_filter(view_id, filter)),
                            };
                            filter_value.set(String::new());
                            editing_filter.set(None);
                            apply_spec_change(state, result);
                        }
                    },
                    if editing_filter().is_some() { "更新篩選" } else { "新增篩選" }
                }
                if editing_filter().is_some() {
                    button {
                        onclick: move |_| {
                            editing_filter.set(None);
                            filter_value.set(String::new());
                        },
                        "取消"
                    }
                }
                for (index, (filter, label)) in filter_chips.into_iter().enumerate() {
                    span {
                        style: if editing_filter() == Some(index) {
                            "{chip_style()} border-color: #3b82f6;"
                        } else {
                            "{chip_style()}"
                        },
                        span {
                            style: "cursor: pointer;",
                            title: "編輯篩選",
                            onclick: {
                                let picked = filter.clone();
                                move |_| {
                                    filter_column.set(Some(picked.column_id));
                                    filter_operator.set(picked.operator.clone());
                                    filter_value.set(picked.value.clone());
                                    editing_filter.set(Some(index));
                                }
                            },
                            "{label}"
                        }
                        button {
                            onclick: {
                                let services = services.clone();
                                move |_| {
                                    let Some(view_id) = current_view_id else {
                                        return;
                                    };
                                    let result = run_blocking("remove_filter", || services.views.remove_filter(view_id, &filter));
                                    apply_spec_change(state, result);
                                }
                            },
                            "×"
                        }
                    }
                }
            }

            div { style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
                span { "欄位顯示" }
                for column in editor_columns.iter().cloned() {
                    label { style: "display: inline-flex; gap: 4px; align-items: center;",
                        input {
                            r#type: "checkbox",
                            checked: current_view_snapshot
                                .as_ref()
                                .map_or(true, |view| view.is_column_visible(column.id)),
                            onclick: {
                                let services = services.clone();
                                move |_| {
                                    let Some(view) = current_view() else {
                                        return;
                                    };
                                    let hide = view.is_column_visible(column.id);
                                    let result = run_blocking("set_column_hidden", || {
                                        services.views.set_column_hidden(view.id, column.id, hide)
                                    });
                                    let mut state = state;
                                    match result {
                                        Ok(Some(updated)) => {
                                            if let Some(existing) = state
                                                .views
                                                .write()
                                                .iter_mut()
                                                .find(|existing| existing.id == updated.id)
                                            {
                                                *existing = updated.clone();
                                            }
                                            state.current_view.set(Some(updated));
                                        }
                                        other => apply_spec_change(state, other),
                                    }
                                }
                            },
                        }
                        "{column.name}"
                    }
                }
            }

            div { style: "display: flex; gap: 8px; align-items: center;",
                input {
                    placeholder: "搜尋已載入的列",
                    value: search_text(),
                    oninput: move |event| {
                        search_text.set(event.value());
                        search_hit.set(None);
                    },
                }
                button {
                    onclick: move |_| {
                        let matches = store.read().search(&search_text());
                        if matches.is_empty() {
                            search_hit.set(None);
                            status.set("找不到符合的列".to_string());
                            return;
                        }
                        let position = search_hit()
                            .and_then(|current| matches.iter().position(|idx| *idx > current))
                            .unwrap_or(0);
                        let target = matches[position];
                        search_hit.set(Some(target));
                        let top = viewport.read().scroll_target(target, store.read().len());
                        scroll_grid_to(top, true);
                        status.set(format!("第 {} / {} 筆符合", position + 1, matches.len()));
                    },
                    "下一筆"
                }
                span { style: "color: #666;", "{status}" }
                span { style: "color: #666;",
                    if all_loaded { "已載入 {row_count} 列（已全部載入）" } else { "已載入 {row_count} 列" }
                }
                if loading {
                    span { style: "color: #666;", "載入中…" }
                }
                if load_failed {
                    button {
                        onclick: {
                            let services = services.clone();
                            move |_| load_next_page(&services, state)
                        },
                        "重試"
                    }
                }
            }

            div {
                id: GRID_ID,
                style: "flex: 1; min-height: 0; overflow-y: auto; border: 1px solid #bbb;",
                onmounted: move |event: MountedEvent| {
                    let element = event.data();
                    grid_element.set(Some(element.clone()));
                    spawn(async move {
                        if let Ok(rect) = element.get_client_rect().await {
                            viewport.write().update(0.0, rect.height());
                        }
                    });
                },
                onscroll: move |_| {
                    let Some(element) = grid_element() else {
                        return;
                    };
                    spawn(async move {
                        let (Ok(offset), Ok(rect)) =
                            (element.get_scroll_offset().await, element.get_client_rect().await)
                        else {
                            return;
                        };
                        viewport.write().update(offset.y, rect.height());
                    });
                },
                onresize: move |event: ResizeEvent| {
                    if let Ok(size) = event.get_border_box_size() {
                        viewport.write().resize(size.height);
                    }
                },
                table { style: "border-collapse: collapse; width: 100%; table-layout: fixed; background: #fff;",
                    thead {
                        tr { style: "height: {row_height}px;",
                            th { style: "{header_cell_style()} width: 36px;" }
                            for column in shown_columns.iter() {
                                th { style: "{header_cell_style()}",
                                    "{column.name}"
                                    button {
                                        style: "margin-left: 6px; border: none; background: none; cursor: pointer; color: #888;",
                                        title: "刪除欄位",
                                        onclick: {
                                            let services = services.clone();
                                            let column_id = column.id;
                                            move |_| {
                                                let Some(table_id) = selected_table_id() else {
                                                    return;
                                                };
                                                match run_blocking("delete_column", || services.edits.delete_column(column_id)) {
                                                    Ok(()) => {
                                                        refresh_columns(&services, state, table_id);
                                                        store.write().reset();
                                                        status.set("已刪除欄位".to_string());
                                                    }
                                                    Err(err) => status.set(format!("刪除欄位失敗：{err}")),
                                                }
                                            }
                                        },
                                        "×"
                                    }
                                }
                            }
                        }
                    }
                    tbody {
                        tr { style: "height: {top_pad}px;" }
                        for (row_idx, row) in visible_rows {
                            tr {
                                key: "{row.id}",
                                style: if search_hit() == Some(row_idx) {
                                    "height: {row_height}px; background: #fff3c4;"
                                } else {
                                    "height: {row_height}px;"
                                },
                                td { style: "{action_cell_style}",
                                    button {
                                        style: "border: none; background: none; cursor: pointer; color: #888;",
                                        title: "刪除列",
                                        onclick: {
                                            let services = services.clone();
                                            let row_id: RowId = row.id;
                                            move |_| {
                                                match run_blocking("delete_row", || services.edits.delete_row(row_id)) {
                                                    Ok(()) => {
                                                        store.write().remove_row(row_id);
                                                        search_hit.set(None);
                                                        refresh_tables(&services, state);
                                                        status.set("已刪除列".to_string());
                                                    }
                                                    Err(err) => status.set(format!("刪除列失敗：{err}")),
                                                }
                                            }
                                        },
                                        "×"
                                    }
                                }
                                for column in shown_columns.iter() {
                                    GridCell {
                                        key: "{column.id}",
                                        cell: row.cell(column.id).cloned(),
                                        alignment: column_alignment(column),
                                        editing_cell,
                                        editing_value,
                                        on_commit: commit_cell,
                                    }
                                }
                            }
                        }
                        tr { style: "height: {bottom_pad}px;" }
                    }
                }
                if store_empty && !loading {
                    div { style: "padding: 16px; color: #666;",
                        if load_status == LoadStatus::ViewMissing { "檢視已被刪除" } else { "沒有符合的列" }
                    }
                }
            }
        }
    }
}
