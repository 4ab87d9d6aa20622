use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use crate::config::default_db_path;
use crate::domain::entities::page::{Page, RowData};
use crate::domain::entities::table::{Column, ColumnId, NewColumn, RowId, TableId, ViewId};
use crate::domain::entities::view::{FilterOperator, FilterSpec, SortDirection, SortSpec, View};
use crate::domain::query::order::compile_sorts;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::ui::state::app_state::visible_columns;
use crate::ui::state::row_store::{LoadStatus, RowStore};
use crate::usecase::ports::repo::{RepoError, TableRepository, ViewRepository};
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::page_service::PageService;
use crate::usecase::services::view_service::ViewService;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("viewgrid-{prefix}-{nanos}"))
}

struct Fixture {
    temp_dir: PathBuf,
    repo: Arc<SqliteRepo>,
    table_id: TableId,
    view_id: ViewId,
    columns: Vec<Column>,
}

impl Fixture {
    fn new(prefix: &str, columns: &[NewColumn], rows: &[Vec<&str>]) -> Self {
        let temp_dir = unique_test_dir(prefix);
        fs::create_dir_all(&temp_dir).expect("should create temp dir");
        let repo = Arc::new(SqliteRepo::new(temp_dir.join("app.sqlite")));
        repo.init().expect("init should succeed");

        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect();
        let table_id = repo
            .create_table_with_rows("fixture", columns, &rows)
            .expect("create table should succeed");
        let view_id = repo
            .create_view(table_id, "fixture view")
            .expect("create view should succeed");
        let columns = repo
            .load_columns(table_id)
            .expect("load columns should succeed");

        Self {
            temp_dir,
            repo,
            table_id,
            view_id,
            columns,
        }
    }

    fn db_path(&self) -> &Path {
        &self.repo.db_path
    }

    fn column(&self, name: &str) -> ColumnId {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.id)
            .expect("column should exist")
    }

    fn pages(&self) -> PageService {
        PageService::new(self.repo.clone())
    }

    fn views(&self) -> ViewService {
        ViewService::new(self.repo.clone())
    }

    fn edits(&self) -> EditService {
        EditService::new(self.repo.clone())
    }

    fn set_spec(&self, sorts: Vec<SortSpec>, filters: Vec<FilterSpec>) {
        let mut view = self
            .repo
            .get_view(self.view_id)
            .expect("get view should succeed")
            .expect("view should exist");
        view.sorts = sorts;
        view.filters = filters;
        self.repo
            .save_view_spec(&view)
            .expect("save view spec should succeed");
    }

    fn first_page(&self, limit: i64) -> Page {
        self.pages()
            .fetch_page(self.view_id, None, limit)
            .expect("fetch should succeed")
            .expect("view should exist")
    }

    fn all_pages(&self, limit: i64) -> Vec<Page> {
        let pages = self.pages();
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        for _ in 0..10_000 {
            let page = pages
                .fetch_page(self.view_id, cursor.as_deref(), limit)
                .expect("fetch should succeed")
                .expect("view should exist");
            cursor = page.next_cursor.clone();
            out.push(page);
            if cursor.is_none() {
                return out;
            }
        }
        panic!("pagination did not terminate");
    }

    fn values(&self, page: &Page, name: &str) -> Vec<String> {
        let column_id = self.column(name);
        page.rows
            .iter()
            .map(|row| row.value(column_id).unwrap_or_default().to_string())
            .collect()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.temp_dir);
    }
}

fn sort(column_id: ColumnId, direction: SortDirection) -> SortSpec {
    SortSpec {
        column_id,
        direction,
    }
}

fn filter(column_id: ColumnId, operator: FilterOperator, value: &str) -> FilterSpec {
    FilterSpec {
        column_id,
        operator,
        value: value.to_string(),
    }
}

fn row_ids(rows: &[RowData]) -> Vec<RowId> {
    rows.iter().map(|row| row.id).collect()
}

fn name_value_fixture(prefix: &str, rows: &[Vec<&str>]) -> Fixture {
    Fixture::new(
        prefix,
        &[NewColumn::text("Name"), NewColumn::number("Value")],
        rows,
    )
}

#[test]
fn init_db_creates_required_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table'
               AND name IN (
                   'data_table', 'table_column', 'table_row', 'cell',
                   'view', 'view_sort', 'view_filter', 'view_hidden_column'
               )",
            [],
            |row| row.get(0),
        )
        .expect("should query sqlite_master");
    assert_eq!(table_count, 8);

    init_db(&db_path).expect("init_db should be idempotent");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn contains_filter_ignores_case() {
    let fixture = name_value_fixture(
        "contains",
        &[vec!["Apple", "1"], vec!["Banana", "2"], vec!["apple pie", "3"]],
    );
    fixture.set_spec(
        Vec::new(),
        vec![filter(fixture.column("Name"), FilterOperator::Contains, "APP")],
    );

    let page = fixture.first_page(10);

    assert_eq!(fixture.values(&page, "Name"), vec!["Apple", "apple pie"]);
    assert!(page.next_cursor.is_none());
}

#[test]
fn number_sort_puts_missing_values_last_in_both_directions() {
    let fixture = name_value_fixture(
        "nulls-last",
        &[
            vec!["a", "3"],
            vec!["b", ""],
            vec!["c", "1"],
            vec!["d", "abc"],
            vec!["e", "2"],
        ],
    );
    let value = fixture.column("Value");

    fixture.set_spec(vec![sort(value, SortDirection::Asc)], Vec::new());
    let ascending = fixture.first_page(10);
    assert_eq!(fixture.values(&ascending, "Name"), vec!["c", "e", "a", "b", "d"]);

    fixture.set_spec(vec![sort(value, SortDirection::Desc)], Vec::new());
    let descending = fixture.first_page(10);
    assert_eq!(fixture.values(&descending, "Name"), vec!["a", "e", "c", "b", "d"]);
}

#[test]
fn numbers_sort_by_value_not_by_text() {
    let fixture = name_value_fixture(
        "numeric-order",
        &[vec!["ten", "10"], vec!["nine", "9"], vec!["tiny", "-0.5"]],
    );
    fixture.set_spec(
        vec![sort(fixture.column("Value"), SortDirection::Asc)],
        Vec::new(),
    );

    let page = fixture.first_page(10);

    assert_eq!(fixture.values(&page, "Name"), vec!["tiny", "nine", "ten"]);
}

#[test]
fn pages_split_rows_and_last_page_has_no_cursor() {
    let rows: Vec<Vec<String>> = (0..1001)
        .map(|idx| vec![format!("row {idx}"), idx.to_string()])
        .collect();
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let fixture = name_value_fixture("page-split", &rows);

    let pages = fixture.all_pages(500);

    let sizes: Vec<usize> = pages.iter().map(|page| page.rows.len()).collect();
    assert_eq!(sizes, vec![500, 500, 1]);
    assert!(pages[0].has_next_page());
    assert!(pages[1].has_next_page());
    assert!(!pages[2].has_next_page());

    let unique: BTreeSet<RowId> = pages
        .iter()
        .flat_map(|page| page.rows.iter().map(|row| row.id))
        .collect();
    assert_eq!(unique.len(), 1001);
}

#[test]
fn keyset_pages_follow_the_full_order_without_gaps_or_duplicates() {
    let groups = ["b", "A", "a", "", "c"];
    let rows: Vec<Vec<String>> = (0..97usize)
        .map(|idx| {
            let score = if idx % 7 == 0 {
                String::new()
            } else {
                ((idx * 37) % 11).to_string()
            };
            vec![groups[idx % groups.len()].to_string(), score]
        })
        .collect();
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let fixture = Fixture::new(
        "keyset-order",
        &[NewColumn::text("Group"), NewColumn::number("Score")],
        &rows,
    );
    let sorts = vec![
        sort(fixture.column("Group"), SortDirection::Asc),
        sort(fixture.column("Score"), SortDirection::Desc),
    ];
    fixture.set_spec(sorts.clone(), Vec::new());

    let paged: Vec<RowData> = fixture
        .all_pages(7)
        .into_iter()
        .flat_map(|page| page.rows)
        .collect();
    let whole = fixture.first_page(1000).rows;

    let order = compile_sorts(&sorts, &fixture.columns);
    let mut expected = whole.clone();
    expected.sort_by(|left, right| order.compare_rows(left, right));

    assert_eq!(paged.len(), 97);
    assert_eq!(row_ids(&paged), row_ids(&whole));
    assert_eq!(row_ids(&whole), row_ids(&expected));
}

#[test]
fn ties_break_by_row_creation_order() {
    let fixture = name_value_fixture(
        "tie-break",
        &[vec!["x", "1"], vec!["y", "1"], vec!["z", "1"]],
    );
    fixture.set_spec(
        vec![sort(fixture.column("Value"), SortDirection::Desc)],
        Vec::new(),
    );

    let paged: Vec<RowData> = fixture
        .all_pages(1)
        .into_iter()
        .flat_map(|page| page.rows)
        .collect();

    assert_eq!(
        paged.iter().map(|row| row.value(fixture.column("Name")).unwrap_or_default()).collect::<Vec<_>>(),
        vec!["x", "y", "z"]
    );
}

#[test]
fn repeated_fetch_returns_identical_page() {
    let fixture = name_value_fixture(
        "deterministic",
        &[vec!["b", "2"], vec!["a", "2"], vec!["c", ""]],
    );
    fixture.set_spec(
        vec![sort(fixture.column("Value"), SortDirection::Asc)],
        Vec::new(),
    );

    assert_eq!(fixture.first_page(2), fixture.first_page(2));
}

#[test]
fn invalid_cursor_restarts_from_first_row() {
    let fixture = name_value_fixture("bad-cursor", &[vec!["a", "1"], vec!["b", "2"], vec!["c", "3"]]);
    let pages = fixture.pages();

    let fresh = fixture.first_page(2);
    let restarted = pages
        .fetch_page(fixture.view_id, Some("not-a-cursor!"), 2)
        .expect("fetch should succeed")
        .expect("view should exist");

    assert_eq!(row_ids(&restarted.rows), row_ids(&fresh.rows));
}

#[test]
fn cursor_from_another_sort_restarts_from_first_row() {
    let fixture = name_value_fixture("stale-cursor", &[vec!["a", "1"], vec!["b", "2"], vec!["c", "3"]]);
    let cursor = fixture.first_page(1).next_cursor.expect("cursor should exist");

    fixture.set_spec(
        vec![sort(fixture.column("Value"), SortDirection::Desc)],
        Vec::new(),
    );
    let page = fixture
        .pages()
        .fetch_page(fixture.view_id, Some(&cursor), 1)
        .expect("fetch should succeed")
        .expect("view should exist");

    assert_eq!(fixture.values(&page, "Name"), vec!["c"]);
}

#[test]
fn missing_view_yields_no_page() {
    let fixture = name_value_fixture("missing-view", &[vec!["a", "1"]]);

    let page = fixture
        .pages()
        .fetch_page(ViewId(fixture.view_id.0 + 1000), None, 10)
        .expect("fetch should succeed");

    assert!(page.is_none());
}

#[test]
fn non_positive_limit_is_rejected() {
    let fixture = name_value_fixture("zero-limit", &[vec!["a", "1"]]);

    let err = fixture
        .pages()
        .fetch_page(fixture.view_id, None, 0)
        .expect_err("zero limit should fail");
    assert!(matches!(err, RepoError::InvalidRequest(_)));

    let err = fixture
        .pages()
        .fetch_page(fixture.view_id, None, -5)
        .expect_err("negative limit should fail");
    assert!(matches!(err, RepoError::InvalidRequest(_)));

    let err = fixture
        .repo
        .fetch_page(fixture.view_id, None, -5)
        .expect_err("the store should refuse an unbounded page");
    assert!(matches!(err, RepoError::Message(_)));
}

#[test]
fn filter_on_deleted_column_is_ignored() {
    let fixture = name_value_fixture("deleted-column", &[vec!["a", "1"], vec!["b", "2"]]);
    let value = fixture.column("Value");
    fixture.set_spec(
        vec![sort(value, SortDirection::Desc)],
        vec![filter(value, FilterOperator::EqualTo, "2")],
    );
    assert_eq!(fixture.first_page(10).rows.len(), 1);

    fixture
        .edits()
        .delete_column(value)
        .expect("delete column should succeed");

    let page = fixture.first_page(10);
    assert_eq!(fixture.values(&page, "Name"), vec!["a", "b"]);
    assert_eq!(page.columns.len(), 1);
    assert!(page.rows.iter().all(|row| row.cells.len() == 1));
}

#[test]
fn unsupported_operator_passes_every_row() {
    let fixture = name_value_fixture("unsupported-op", &[vec!["a", "1"], vec!["b", "2"]]);
    fixture.set_spec(
        Vec::new(),
        vec![filter(
            fixture.column("Name"),
            FilterOperator::Unsupported("regex".to_string()),
            "^a",
        )],
    );

    let view = fixture
        .repo
        .get_view(fixture.view_id)
        .expect("get view should succeed")
        .expect("view should exist");
    assert_eq!(
        view.filters[0].operator,
        FilterOperator::Unsupported("regex".to_string())
    );
    assert_eq!(fixture.first_page(10).rows.len(), 2);
}

#[test]
fn numeric_filters_skip_values_that_do_not_parse() {
    let fixture = name_value_fixture(
        "numeric-filter",
        &[
            vec!["two", "2"],
            vec!["word", "abc"],
            vec!["blank", ""],
            vec!["one", "1"],
        ],
    );
    let value = fixture.column("Value");

    fixture.set_spec(
        Vec::new(),
        vec![filter(value, FilterOperator::GreaterThan, "1.5")],
    );
    assert_eq!(fixture.values(&fixture.first_page(10), "Name"), vec!["two"]);

    fixture.set_spec(
        Vec::new(),
        vec![filter(value, FilterOperator::GreaterThan, "abc")],
    );
    assert!(fixture.first_page(10).rows.is_empty());

    fixture.set_spec(
        Vec::new(),
        vec![filter(value, FilterOperator::LessThanEqual, " 2 ")],
    );
    assert_eq!(
        fixture.values(&fixture.first_page(10), "Name"),
        vec!["two", "one"]
    );
}

#[test]
fn emptiness_filters_and_conjunction() {
    let fixture = name_value_fixture(
        "is-empty",
        &[vec!["a", ""], vec!["", "5"], vec!["c", "7"]],
    );
    let name = fixture.column("Name");
    let value = fixture.column("Value");

    fixture.set_spec(Vec::new(), vec![filter(value, FilterOperator::IsEmpty, "")]);
    assert_eq!(fixture.values(&fixture.first_page(10), "Name"), vec!["a"]);

    fixture.set_spec(
        Vec::new(),
        vec![
            filter(name, FilterOperator::IsNotEmpty, ""),
            filter(value, FilterOperator::IsNotEmpty, ""),
        ],
    );
    assert_eq!(fixture.values(&fixture.first_page(10), "Name"), vec!["c"]);
}

#[test]
fn text_equality_ignores_case() {
    let fixture = name_value_fixture(
        "text-equals",
        &[vec!["Alpha", "1"], vec!["alpha", "2"], vec!["alphabet", "3"]],
    );
    let name = fixture.column("Name");

    fixture.set_spec(Vec::new(), vec![filter(name, FilterOperator::EqualTo, "ALPHA")]);
    assert_eq!(
        fixture.values(&fixture.first_page(10), "Value"),
        vec!["1", "2"]
    );

    fixture.set_spec(
        Vec::new(),
        vec![filter(name, FilterOperator::NotContains, "bet")],
    );
    assert_eq!(
        fixture.values(&fixture.first_page(10), "Value"),
        vec!["1", "2"]
    );
}

#[test]
fn updated_cell_shows_in_next_fetch() {
    let fixture = name_value_fixture("update-cell", &[vec!["a", "1"], vec!["b", "2"]]);
    let value = fixture.column("Value");
    fixture.set_spec(vec![sort(value, SortDirection::Asc)], Vec::new());

    let page = fixture.first_page(10);
    let first_cell = page.rows[0]
        .cell(value)
        .expect("cell should exist")
        .cell_id;
    fixture
        .edits()
        .update_cell(first_cell, "9")
        .expect("update should succeed");

    assert_eq!(fixture.values(&fixture.first_page(10), "Name"), vec!["b", "a"]);

    let missing = fixture
        .edits()
        .update_cell(crate::domain::entities::table::CellId(first_cell.0 + 10_000), "x");
    assert!(missing.is_err(), "updating an unknown cell should fail");
}

#[test]
fn new_column_and_row_get_empty_cells() {
    let fixture = name_value_fixture("backfill", &[vec!["a", "1"], vec!["b", "2"]]);
    let edits = fixture.edits();

    let notes = edits
        .create_column(fixture.table_id, &NewColumn::text("Notes"))
        .expect("create column should succeed");
    let row_id = edits
        .create_row(fixture.table_id)
        .expect("create row should succeed");

    let page = fixture.first_page(10);
    assert_eq!(
        page.columns.iter().map(|column| column.name.as_str()).collect::<Vec<_>>(),
        vec!["Name", "Value", "Notes"]
    );
    assert_eq!(page.rows.len(), 3);
    assert!(page.rows.iter().all(|row| row.cells.len() == 3));
    assert!(page.rows.iter().all(|row| row.value(notes) == Some("")));
    assert_eq!(page.rows[2].id, row_id);

    edits.delete_row(row_id).expect("delete row should succeed");
    assert_eq!(fixture.first_page(10).rows.len(), 2);

    let tables = edits.list_tables().expect("list tables should succeed");
    assert_eq!(tables[0].row_count, 2);
}

#[test]
fn view_spec_edits_persist() {
    let fixture = name_value_fixture("spec-edits", &[vec!["a", "1"]]);
    let views = fixture.views();
    let name = fixture.column("Name");
    let value = fixture.column("Value");

    views
        .upsert_sort(fixture.view_id, sort(name, SortDirection::Asc))
        .expect("upsert should succeed");
    views
        .upsert_sort(fixture.view_id, sort(value, SortDirection::Asc))
        .expect("upsert should succeed");
    let view = views
        .upsert_sort(fixture.view_id, sort(name, SortDirection::Desc))
        .expect("upsert should succeed")
        .expect("view should exist");
    assert_eq!(
        view.sorts,
        vec![sort(name, SortDirection::Desc), sort(value, SortDirection::Asc)]
    );

    let repeated = filter(name, FilterOperator::Contains, "a");
    views
        .add_filter(fixture.view_id, repeated.clone())
        .expect("add filter should succeed");
    views
        .add_filter(fixture.view_id, filter(value, FilterOperator::IsEmpty, ""))
        .expect("add filter should succeed");
    views
        .add_filter(fixture.view_id, repeated.clone())
        .expect("add filter should succeed");
    views
        .remove_filter(fixture.view_id, &repeated)
        .expect("remove filter should succeed");
    views
        .replace_filter(fixture.view_id, 0, filter(value, FilterOperator::IsNotEmpty, ""))
        .expect("replace filter should succeed");
    views
        .remove_sort(fixture.view_id, &sort(value, SortDirection::Asc))
        .expect("remove sort should succeed");
    views
        .set_column_hidden(fixture.view_id, value, true)
        .expect("hide should succeed");

    let stored: View = fixture
        .repo
        .get_view(fixture.view_id)
        .expect("get view should succeed")
        .expect("view should exist");
    assert_eq!(stored.sorts, vec![sort(name, SortDirection::Desc)]);
    assert_eq!(
        stored.filters,
        vec![filter(value, FilterOperator::IsNotEmpty, ""), repeated]
    );
    assert!(!stored.is_column_visible(value));
    assert!(stored.is_column_visible(name));

    let gone = views
        .upsert_sort(ViewId(fixture.view_id.0 + 1000), sort(name, SortDirection::Asc))
        .expect("editing a missing view should not fail");
    assert!(gone.is_none());
}

#[test]
fn current_view_is_created_once_and_remembered() {
    let temp_dir = unique_test_dir("current-view");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let repo = Arc::new(SqliteRepo::new(temp_dir.join("app.sqlite")));
    let edits = EditService::new(repo.clone());
    let views = ViewService::new(repo.clone());
    edits.init().expect("init should succeed");
    let table_id = edits
        .create_table("t", &[NewColumn::text("Name")])
        .expect("create table should succeed");

    let first = views
        .open_current_view(table_id, "first")
        .expect("open should succeed");
    let again = views
        .open_current_view(table_id, "ignored")
        .expect("open should succeed");
    assert_eq!(first.id, again.id);
    assert_eq!(again.name, "first");

    let second = views
        .create_view(table_id, "second")
        .expect("create view should succeed");
    views
        .set_current_view(table_id, second)
        .expect("set current should succeed");
    let current = views
        .open_current_view(table_id, "ignored")
        .expect("open should succeed");
    assert_eq!(current.id, second);
    assert_eq!(
        repo.get_current_view(table_id)
            .expect("get current should succeed"),
        Some(second)
    );
    assert_eq!(views.list_views(table_id).expect("list should succeed").len(), 2);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn row_store_loads_every_page_in_order() {
    let rows: Vec<Vec<String>> = (0..25)
        .map(|idx| vec![format!("row {idx}"), ((idx * 7) % 5).to_string()])
        .collect();
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let fixture = name_value_fixture("row-store", &rows);
    fixture.set_spec(
        vec![sort(fixture.column("Value"), SortDirection::Desc)],
        Vec::new(),
    );
    let pages = fixture.pages();
    let mut store = RowStore::new(4);
    store.set_view(Some(fixture.view_id));

    for _ in 0..100 {
        let outcome = store.load_more(|request| {
            pages.fetch_page(request.view_id, request.cursor.as_deref(), request.limit)
        });
        if outcome.is_none() {
            break;
        }
    }

    assert_eq!(store.status(), &LoadStatus::Complete);
    assert_eq!(row_ids(store.rows()), row_ids(&fixture.first_page(100).rows));
    assert_eq!(store.columns().len(), 2);
}

#[test]
fn hidden_columns_are_left_out_of_the_grid() {
    let fixture = name_value_fixture("hidden", &[vec!["a", "1"]]);
    let view = fixture
        .views()
        .set_column_hidden(fixture.view_id, fixture.column("Name"), true)
        .expect("hide should succeed")
        .expect("view should exist");

    let shown = visible_columns(&fixture.columns, Some(&view));
    assert_eq!(
        shown.iter().map(|column| column.name.as_str()).collect::<Vec<_>>(),
        vec!["Value"]
    );
    assert_eq!(visible_columns(&fixture.columns, None).len(), 2);
}

#[test]
fn database_lives_in_the_app_data_directory() {
    let path = default_db_path().expect("should resolve data directory");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("viewgrid.sqlite")
    );
}

#[test]
fn tables_list_with_row_counts() {
    let fixture = name_value_fixture("list-tables", &[vec!["a", "1"], vec!["b", "2"]]);
    let tables = fixture
        .edits()
        .list_tables()
        .expect("list tables should succeed");

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].id, fixture.table_id);
    assert_eq!(tables[0].row_count, 2);
    assert!(fixture.db_path().exists());
}

#[test]
fn deleting_a_loaded_row_keeps_the_next_page_intact() {
    let rows: Vec<Vec<String>> = (0..9)
        .map(|idx| vec![format!("row {idx}"), (idx % 3).to_string()])
        .collect();
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let fixture = name_value_fixture("delete-row", &rows);
    fixture.set_spec(
        vec![sort(fixture.column("Value"), SortDirection::Asc)],
        Vec::new(),
    );
    let pages = fixture.pages();
    let mut store = RowStore::new(3);
    store.set_view(Some(fixture.view_id));
    store
        .load_more(|request| pages.fetch_page(request.view_id, request.cursor.as_deref(), request.limit))
        .expect("first page should load");

    let doomed = store.rows()[1].id;
    fixture
        .edits()
        .delete_row(doomed)
        .expect("delete row should succeed");
    assert!(store.remove_row(doomed));
    assert!(!store.remove_row(doomed));

    for _ in 0..100 {
        let outcome = store.load_more(|request| {
            pages.fetch_page(request.view_id, request.cursor.as_deref(), request.limit)
        });
        if outcome.is_none() {
            break;
        }
    }

    assert_eq!(store.status(), &LoadStatus::Complete);
    assert_eq!(store.len(), 8);
    assert_eq!(row_ids(store.rows()), row_ids(&fixture.first_page(100).rows));
}

#[test]
fn starter_table_and_column_removal_go_through_the_edit_service() {
    let fixture = name_value_fixture("edit-service", &[]);
    let edits = fixture.edits();
    let table_id = edits
        .create_table_with_rows(
            "starter",
            &[NewColumn::text("Item"), NewColumn::number("Qty")],
            &[
                vec!["Apple".to_string(), "3".to_string()],
                vec!["Banana".to_string(), String::new()],
            ],
        )
        .expect("create table should succeed");
    let columns = edits
        .load_columns(table_id)
        .expect("load columns should succeed");
    assert_eq!(
        columns.iter().map(|column| column.name.as_str()).collect::<Vec<_>>(),
        vec!["Item", "Qty"]
    );

    edits
        .delete_column(columns[1].id)
        .expect("delete column should succeed");
    let remaining = edits
        .load_columns(table_id)
        .expect("load columns should succeed");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Item");

    let tables = edits.list_tables().expect("list tables should succeed");
    let starter = tables
        .iter()
        .find(|table| table.id == table_id)
        .expect("starter table should be listed");
    assert_eq!(starter.row_count, 2);
}

#[test]
fn replaced_filter_changes_the_next_fetch() {
    let fixture = name_value_fixture(
        "replace-filter",
        &[vec!["a", "1"], vec!["b", "2"], vec!["c", ""]],
    );
    let views = fixture.views();
    let value = fixture.column("Value");
    views
        .add_filter(fixture.view_id, filter(value, FilterOperator::EqualTo, "1"))
        .expect("add filter should succeed");
    assert_eq!(fixture.values(&fixture.first_page(10), "Name"), vec!["a"]);

    views
        .replace_filter(fixture.view_id, 0, filter(value, FilterOperator::IsEmpty, ""))
        .expect("replace filter should succeed")
        .expect("view should exist");
    assert_eq!(fixture.values(&fixture.first_page(10), "Name"), vec!["c"]);
}
