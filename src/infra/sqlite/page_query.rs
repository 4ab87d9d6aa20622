//! Keyset-paginated page query over a view.
//!
//! Filters, sort levels and the resume condition are compiled into a single
//! parameterized statement. User values only ever travel as bound parameters.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::Value;
use tracing::debug;

use crate::domain::entities::page::{CellData, Page, RowData};
use crate::domain::entities::table::{CellId, ColumnId, ColumnType, RowId, ViewId};
use crate::domain::entities::view::SortDirection;
use crate::domain::query::cursor::{self, CursorData};
use crate::domain::query::order::{compile_sorts, CompiledOrder};
use crate::domain::query::predicate::{compile_filters, CellTest, Condition, Predicate};
use crate::domain::query::value::SortKey;
use crate::infra::sqlite::queries::{read_columns, read_view};
use crate::infra::sqlite::schema::open_connection;

type KeyedRow = (RowId, Vec<Option<String>>);

pub fn fetch_page(
    db_path: &Path,
    view_id: ViewId,
    cursor: Option<&CursorData>,
    limit: i64,
) -> Result<Option<Page>> {
    // LIMIT with a negative bound is unbounded in SQLite.
    if limit <= 0 {
        anyhow::bail!("limit must be greater than zero, got {limit}")
    }

    let conn = open_connection(db_path)?;
    let Some(view) = read_view(&conn, view_id)? else {
        debug!(view_id = %view_id, "view not found, nothing to page");
        return Ok(None);
    };
    let columns = read_columns(&conn, view.table_id)?;
    let predicate = compile_filters(&view.filters, &columns);
    let order = compile_sorts(&view.sorts, &columns);

    let resume = cursor.and_then(|cursor| match cursor.keys_for(&order) {
        Some(keys) => Some((keys, cursor.last_row_id)),
        None => {
            debug!(view_id = %view_id, "cursor does not match the current sort, restarting");
            None
        }
    });

    let key_exprs: Vec<String> = order
        .levels
        .iter()
        .enumerate()
        .map(|(idx, level)| match level.column_type {
            ColumnType::Text => format!("vg_text_key(sk{idx}.value)"),
            ColumnType::Number => format!("vg_num(sk{idx}.value)"),
        })
        .collect();

    let mut row_params = Vec::<Value>::new();
    let mut row_sql = String::from("SELECT r.id");
    for idx in 0..order.levels.len() {
        row_sql.push_str(&format!(", sk{idx}.value"));
    }
    row_sql.push_str(" FROM table_row r ");
    for (idx, level) in order.levels.iter().enumerate() {
        row_sql.push_str(&format!(
            "LEFT JOIN cell sk{idx}
             ON sk{idx}.row_id = r.id
            AND sk{idx}.column_id = ? "
        ));
        row_params.push(Value::Integer(level.column_id.0));
    }

    let mut where_clauses = vec!["r.table_id = ?".to_string()];
    row_params.push(Value::Integer(view.table_id.0));
    for condition in &predicate.conditions {
        let (clause, params) = condition_sql(condition);
        where_clauses.push(clause);
        row_params.extend(params);
    }
    if let Some((keys, last_row_id)) = &resume {
        let (clause, params) = keyset_sql(&order, &key_exprs, keys, *last_row_id);
        where_clauses.push(clause);
        row_params.extend(params);
    }
    row_sql.push_str(&format!("WHERE {} ORDER BY ", where_clauses.join(" AND ")));
    for (expr, level) in key_exprs.iter().zip(order.levels.iter()) {
        let direction = match level.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        row_sql.push_str(&format!("({expr} IS NULL) ASC, {expr} {direction}, "));
    }
    row_sql.push_str("r.id ASC LIMIT ?");
    row_params.push(Value::Integer(limit.saturating_add(1)));

    let level_count = order.levels.len();
    let mut row_stmt = conn
        .prepare(&row_sql)
        .context("failed to prepare page row query")?;
    let mut keyed_rows = row_stmt
        .query_map(rusqlite::params_from_iter(row_params), |row| {
            let id: i64 = row.get(0)?;
            let mut raw = Vec::with_capacity(level_count);
            for idx in 0..level_count {
                raw.push(row.get::<_, Option<String>>(idx + 1)?);
            }
            Ok((RowId(id), raw))
        })
        .context("failed to query page rows")?
        .collect::<rusqlite::Result<Vec<KeyedRow>>>()
        .context("failed to collect page rows")?;
    drop(row_stmt);

    let has_next_page = keyed_rows.len() as i64 > limit;
    keyed_rows.truncate(limit as usize);

    let next_cursor = if has_next_page {
        keyed_rows.last().map(|(row_id, raw)| {
            cursor::encode(&CursorData {
                last_row_id: *row_id,
                sort_values: order
                    .levels
                    .iter()
                    .map(|level| level.column_id)
                    .zip(raw.iter().cloned())
                    .collect::<BTreeMap<ColumnId, Option<String>>>(),
            })
        })
        .transpose()
        .context("failed to build next cursor")?
    } else {
        None
    };

    let column_types: HashMap<ColumnId, ColumnType> = columns
        .iter()
        .map(|column| (column.id, column.column_type))
        .collect();
    let row_ids: Vec<RowId> = keyed_rows.iter().map(|(row_id, _)| *row_id).collect();
    let rows = hydrate_rows(&conn, &row_ids, &column_types)?;
    debug_assert!(
        page_agrees_with_view(&rows, &predicate, &order),
        "page for view #{view_id} disagrees with the in-memory filter or order"
    );

    debug!(
        view_id = %view_id,
        rows = rows.len(),
        has_next_page,
        filtered = !predicate.is_always_true(),
        resumed = resume.is_some(),
        "fetched page"
    );

    Ok(Some(Page {
        columns,
        rows,
        next_cursor,
    }))
}

/// Every row passes the predicate and rows are strictly increasing under the
/// compiled order.
fn page_agrees_with_view(rows: &[RowData], predicate: &Predicate, order: &CompiledOrder) -> bool {
    rows.iter()
        .all(|row| predicate.matches(|column_id| row.value(column_id)))
        && rows
            .windows(2)
            .all(|pair| order.compare_rows(&pair[0], &pair[1]).is_lt())
}

fn condition_sql(condition: &Condition) -> (String, Vec<Value>) {
    let column = Value::Integer(condition.column_id.0);
    let exists = |test_sql: &str| {
        format!(
            "EXISTS (
                SELECT 1 FROM cell f
                WHERE f.row_id = r.id
                  AND f.column_id = ?
                  AND {test_sql}
            )"
        )
    };
    match &condition.test {
        CellTest::Contains(needle) => (
            exists("instr(vg_fold(f.value), ?) > 0"),
            vec![column, Value::Text(needle.clone())],
        ),
        CellTest::NotContains(needle) => (
            exists("instr(vg_fold(f.value), ?) = 0"),
            vec![column, Value::Text(needle.clone())],
        ),
        CellTest::TextEquals(expected) => (
            exists("vg_fold(f.value) = ?"),
            vec![column, Value::Text(expected.clone())],
        ),
        CellTest::TextNotEquals(expected) => (
            exists("vg_fold(f.value) <> ?"),
            vec![column, Value::Text(expected.clone())],
        ),
        CellTest::NumberEquals(expected) => (
            exists("vg_num(f.value) = ?"),
            vec![column, Value::Real(*expected)],
        ),
        CellTest::NumberNotEquals(expected) => (
            exists("vg_num(f.value) <> ?"),
            vec![column, Value::Real(*expected)],
        ),
        CellTest::NumberCompare(op, rhs) => (
            exists(&format!("vg_num(f.value) {} ?", op.sql())),
            vec![column, Value::Real(*rhs)],
        ),
        CellTest::IsEmpty => (format!("NOT {}", exists("f.value <> ''")), vec![column]),
        CellTest::IsNotEmpty => (exists("f.value <> ''"), vec![column]),
        CellTest::Never => ("0".to_string(), Vec::new()),
    }
}

fn key_value(key: &SortKey) -> Value {
    match key {
        SortKey::Text(text) => Value::Text(text.clone()),
        SortKey::Number(number) => Value::Real(*number),
    }
}

fn key_equals(expr: &str, key: Option<&SortKey>) -> (String, Vec<Value>) {
    match key {
        Some(key) => (format!("{expr} = ?"), vec![key_value(key)]),
        None => (format!("{expr} IS NULL"), Vec::new()),
    }
}

/// `None` when nothing can follow the cursor value at this level: missing
/// keys already sort last.
fn key_after(
    expr: &str,
    key: Option<&SortKey>,
    direction: SortDirection,
) -> Option<(String, Vec<Value>)> {
    let key = key?;
    let op = match direction {
        SortDirection::Asc => ">",
        SortDirection::Desc => "<",
    };
    Some((
        format!("({expr} {op} ? OR {expr} IS NULL)"),
        vec![key_value(key)],
    ))
}

/// Lexicographic "row comes after cursor" over the sort levels and the
/// trailing row id.
fn keyset_sql(
    order: &CompiledOrder,
    key_exprs: &[String],
    keys: &[Option<SortKey>],
    last_row_id: RowId,
) -> (String, Vec<Value>) {
    let mut branches = Vec::new();
    let mut params = Vec::new();

    let equal_prefix = |len: usize, parts: &mut Vec<String>, params: &mut Vec<Value>| {
        for (expr, key) in key_exprs.iter().zip(keys.iter()).take(len) {
            let (clause, values) = key_equals(expr, key.as_ref());
            parts.push(clause);
            params.extend(values);
        }
    };

    for (idx, level) in order.levels.iter().enumerate() {
        let Some((after, after_params)) =
            key_after(&key_exprs[idx], keys[idx].as_ref(), level.direction)
        else {
            continue;
        };
        let mut parts = Vec::new();
        equal_prefix(idx, &mut parts, &mut params);
        parts.push(after);
        params.extend(after_params);
        branches.push(format!("({})", parts.join(" AND ")));
    }

    let mut parts = Vec::new();
    equal_prefix(order.levels.len(), &mut parts, &mut params);
    parts.push("r.id > ?".to_string());
    params.push(Value::Integer(last_row_id.0));
    branches.push(format!("({})", parts.join(" AND ")));

    (format!("({})", branches.join(" OR ")), params)
}

fn hydrate_rows(
    conn: &rusqlite::Connection,
    row_ids: &[RowId],
    column_types: &HashMap<ColumnId, ColumnType>,
) -> Result<Vec<RowData>> {
    if row_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = std::iter::repeat_n("?", row_ids.len())
        .collect::<Vec<_>>()
        .join(",");
    let hydrate_sql = format!(
        "SELECT c.row_id, c.id, c.column_id, c.value
         FROM cell c
         JOIN table_column tc ON tc.id = c.column_id
         WHERE c.row_id IN ({placeholders})
         ORDER BY c.row_id ASC, tc.position ASC, tc.id ASC"
    );

    let mut rows: Vec<RowData> = row_ids
        .iter()
        .map(|row_id| RowData {
            id: *row_id,
            cells: Vec::new(),
        })
        .collect();
    let row_pos: HashMap<RowId, usize> = row_ids
        .iter()
        .copied()
        .enumerate()
        .map(|(idx, row_id)| (row_id, idx))
        .collect();

    let mut hydrate_stmt = conn
        .prepare(&hydrate_sql)
        .context("failed to prepare row hydration query")?;
    let mut hydrate_rows = hydrate_stmt
        .query(rusqlite::params_from_iter(row_ids.iter().map(|id| id.0)))
        .context("failed to run row hydration query")?;

    while let Some(row) = hydrate_rows.next().context("failed to read hydrated row")? {
        let row_id: i64 = row.get(0).context("failed to read row_id")?;
        let cell_id: i64 = row.get(1).context("failed to read cell id")?;
        let column_id: i64 = row.get(2).context("failed to read column_id")?;
        let value: String = row.get(3).context("failed to read value")?;

        let column_id = ColumnId(column_id);
        let Some(column_type) = column_types.get(&column_id).copied() else {
            continue;
        };
        if let Some(dest) = row_pos
            .get(&RowId(row_id))
            .and_then(|&idx| rows.get_mut(idx))
        {
            dest.cells.push(CellData {
                cell_id: CellId(cell_id),
                column_id,
                value,
                column_type,
            });
        }
    }

    Ok(rows)
}
