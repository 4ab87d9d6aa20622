use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::domain::entities::table::{Column, ColumnId, ColumnType, NewColumn, TableMeta, ViewId};
use crate::domain::entities::view::{FilterOperator, FilterSpec, SortDirection, SortSpec, View};
use crate::infra::sqlite::schema::{init_db, open_connection};

pub fn read_columns(conn: &Connection, table_id: impl Into<i64>) -> Result<Vec<Column>> {
    let table_id = table_id.into();
    let mut stmt = conn
        .prepare(
            "SELECT id, name, column_type
             FROM table_column
             WHERE table_id = ?1
             ORDER BY position ASC, id ASC",
        )
        .context("failed to prepare columns query")?;
    let raw = stmt
        .query_map([table_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .context("failed to query columns")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect columns")?;

    let mut columns = Vec::with_capacity(raw.len());
    for (id, name, column_type) in raw {
        let column_type = ColumnType::parse(&column_type)
            .with_context(|| format!("unknown column type {column_type:?} on column #{id}"))?;
        columns.push(Column {
            id: ColumnId(id),
            name,
            column_type,
        });
    }
    Ok(columns)
}

pub fn read_view(conn: &Connection, view_id: ViewId) -> Result<Option<View>> {
    let header = conn
        .query_row(
            "SELECT table_id, name FROM view WHERE id = ?1",
            [view_id.0],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()
        .with_context(|| format!("failed to load view #{view_id}"))?;
    let Some((table_id, name)) = header else {
        return Ok(None);
    };

    let mut sort_stmt = conn
        .prepare(
            "SELECT column_id, direction
             FROM view_sort
             WHERE view_id = ?1
             ORDER BY position ASC",
        )
        .context("failed to prepare view sort query")?;
    let sorts = sort_stmt
        .query_map([view_id.0], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to query view sorts")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect view sorts")?
        .into_iter()
        .filter_map(|(column_id, direction)| match SortDirection::parse(&direction) {
            Some(direction) => Some(SortSpec {
                column_id: ColumnId(column_id),
                direction,
            }),
            None => {
                warn!(view_id = %view_id, direction = %direction, "ignoring sort with unknown direction");
                None
            }
        })
        .collect();

    let mut filter_stmt = conn
        .prepare(
            "SELECT column_id, operator, value
             FROM view_filter
             WHERE view_id = ?1
             ORDER BY position ASC",
        )
        .context("failed to prepare view filter query")?;
    let filters = filter_stmt
        .query_map([view_id.0], |row| {
            Ok(FilterSpec {
                column_id: ColumnId(row.get(0)?),
                operator: FilterOperator::parse(&row.get::<_, String>(1)?),
                value: row.get(2)?,
            })
        })
        .context("failed to query view filters")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect view filters")?;

    let mut hidden_stmt = conn
        .prepare("SELECT column_id FROM view_hidden_column WHERE view_id = ?1")
        .context("failed to prepare hidden column query")?;
    let hidden_columns = hidden_stmt
        .query_map([view_id.0], |row| Ok(ColumnId(row.get(0)?)))
        .context("failed to query hidden columns")?
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .context("failed to collect hidden columns")?;

    Ok(Some(View {
        id: view_id,
        table_id: table_id.into(),
        name,
        sorts,
        filters,
        hidden_columns,
    }))
}

pub fn list_tables(db_path: &Path) -> Result<Vec<TableMeta>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT t.id, t.name, t.current_view_id,
                    (SELECT COUNT(*) FROM table_row r WHERE r.table_id = t.id)
             FROM data_table t
             ORDER BY t.id ASC",
        )
        .context("failed to prepare tables query")?;

    let tables = stmt
        .query_map([], |row| {
            Ok(TableMeta {
                id: row.get::<_, i64>(0)?.into(),
                name: row.get(1)?,
                current_view_id: row.get::<_, Option<i64>>(2)?.map(ViewId),
                row_count: row.get(3)?,
            })
        })
        .context("failed to query tables")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect tables")?;

    Ok(tables)
}

pub fn create_table_with_rows(
    db_path: &Path,
    name: &str,
    columns: &[NewColumn],
    rows: &[Vec<String>],
) -> Result<i64> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start table create transaction")?;

    tx.execute("INSERT INTO data_table(name) VALUES (?1)", params![name])
        .context("failed to insert table")?;
    let table_id = tx.last_insert_rowid();

    let mut column_ids = Vec::with_capacity(columns.len());
    {
        let mut insert_column = tx
            .prepare(
                "INSERT INTO table_column(table_id, name, column_type, position)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .context("failed to prepare column insert")?;
        for (position, column) in columns.iter().enumerate() {
            insert_column
                .execute(params![
                    table_id,
                    column.name,
                    column.column_type.as_str(),
                    position as i64
                ])
                .context("failed to insert column")?;
            column_ids.push(tx.last_insert_rowid());
        }
    }

    {
        let mut insert_row = tx
            .prepare("INSERT INTO table_row(table_id) VALUES (?1)")
            .context("failed to prepare row insert")?;
        let mut insert_cell = tx
            .prepare("INSERT INTO cell(row_id, column_id, value) VALUES (?1, ?2, ?3)")
            .context("failed to prepare cell insert")?;
        for row in rows {
            insert_row
                .execute(params![table_id])
                .context("failed to insert row")?;
            let row_id = tx.last_insert_rowid();
            for (col_idx, column_id) in column_ids.iter().enumerate() {
                let value = row.get(col_idx).map(String::as_str).unwrap_or_default();
                insert_cell
                    .execute(params![row_id, column_id, value])
                    .context("failed to insert table cell")?;
            }
        }
    }

    tx.commit().context("failed to commit table create")?;
    Ok(table_id)
}

pub fn load_columns(db_path: &Path, table_id: i64) -> Result<Vec<Column>> {
    let conn = open_connection(db_path)?;
    read_columns(&conn, table_id)
}

/// Appends a column and back-fills an empty cell for every existing row.
pub fn create_column(db_path: &Path, table_id: i64, column: &NewColumn) -> Result<i64> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start column create transaction")?;

    tx.execute(
        "INSERT INTO table_column(table_id, name, column_type, position)
         VALUES (
             ?1, ?2, ?3,
             (SELECT COALESCE(MAX(position) + 1, 0) FROM table_column WHERE table_id = ?1)
         )",
        params![table_id, column.name, column.column_type.as_str()],
    )
    .with_context(|| format!("failed to insert column into table #{table_id}"))?;
    let column_id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO cell(row_id, column_id, value)
         SELECT id, ?1, '' FROM table_row WHERE table_id = ?2",
        params![column_id, table_id],
    )
    .context("failed to back-fill cells for new column")?;

    tx.commit().context("failed to commit column create")?;
    Ok(column_id)
}

pub fn delete_column(db_path: &Path, column_id: i64) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute("DELETE FROM table_column WHERE id = ?1", params![column_id])
        .with_context(|| format!("failed to delete column #{column_id}"))?;
    Ok(())
}

pub fn create_row(db_path: &Path, table_id: i64) -> Result<i64> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start row create transaction")?;

    tx.execute(
        "INSERT INTO table_row(table_id) VALUES (?1)",
        params![table_id],
    )
    .with_context(|| format!("failed to insert row into table #{table_id}"))?;
    let row_id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO cell(row_id, column_id, value)
         SELECT ?1, id, '' FROM table_column WHERE table_id = ?2",
        params![row_id, table_id],
    )
    .context("failed to create cells for new row")?;

    tx.commit().context("failed to commit row create")?;
    Ok(row_id)
}

pub fn delete_row(db_path: &Path, row_id: i64) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute("DELETE FROM table_row WHERE id = ?1", params![row_id])
        .with_context(|| format!("failed to delete row #{row_id}"))?;
    Ok(())
}

pub fn update_cell(db_path: &Path, cell_id: i64, value: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    let updated = conn
        .execute(
            "UPDATE cell SET value = ?1 WHERE id = ?2",
            params![value, cell_id],
        )
        .with_context(|| format!("failed to update cell #{cell_id}"))?;
    if updated == 0 {
        anyhow::bail!("cell #{cell_id} not found");
    }
    Ok(())
}

pub fn create_view(db_path: &Path, table_id: i64, name: &str) -> Result<i64> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO view(table_id, name) VALUES (?1, ?2)",
        params![table_id, name],
    )
    .with_context(|| format!("failed to create view for table #{table_id}"))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_view(db_path: &Path, view_id: i64) -> Result<Option<View>> {
    let conn = open_connection(db_path)?;
    read_view(&conn, ViewId(view_id))
}

pub fn list_views(db_path: &Path, table_id: i64) -> Result<Vec<View>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare("SELECT id FROM view WHERE table_id = ?1 ORDER BY id ASC")
        .context("failed to prepare views query")?;
    let view_ids = stmt
        .query_map([table_id], |row| row.get::<_, i64>(0))
        .context("failed to query views")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect views")?;
    drop(stmt);

    let mut views = Vec::with_capacity(view_ids.len());
    for view_id in view_ids {
        if let Some(view) = read_view(&conn, ViewId(view_id))? {
            views.push(view);
        }
    }
    Ok(views)
}

pub fn get_current_view(db_path: &Path, table_id: i64) -> Result<Option<i64>> {
    let conn = open_connection(db_path)?;
    let current = conn
        .query_row(
            "SELECT current_view_id FROM data_table WHERE id = ?1",
            [table_id],
            |row| row.get::<_, Option<i64>>(0),
        )
        .optional()
        .with_context(|| format!("failed to load current view of table #{table_id}"))?;
    Ok(current.flatten())
}

pub fn set_current_view(db_path: &Path, table_id: i64, view_id: i64) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "UPDATE data_table SET current_view_id = ?1 WHERE id = ?2",
        params![view_id, table_id],
    )
    .with_context(|| format!("failed to set current view of table #{table_id}"))?;
    Ok(())
}

pub fn save_view_spec(db_path: &Path, view: &View) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start view spec transaction")?;
    let view_id = view.id.0;

    for table in ["view_sort", "view_filter", "view_hidden_column"] {
        tx.execute(&format!("DELETE FROM {table} WHERE view_id = ?1"), [view_id])
            .with_context(|| format!("failed to clear {table} for view #{view_id}"))?;
    }

    {
        let mut insert_sort = tx
            .prepare(
                "INSERT INTO view_sort(view_id, position, column_id, direction)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .context("failed to prepare view sort insert")?;
        for (position, sort) in view.sorts.iter().enumerate() {
            insert_sort
                .execute(params![
                    view_id,
                    position as i64,
                    sort.column_id.0,
                    sort.direction.as_str()
                ])
                .context("failed to insert view sort")?;
        }

        let mut insert_filter = tx
            .prepare(
                "INSERT INTO view_filter(view_id, position, column_id, operator, value)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .context("failed to prepare view filter insert")?;
        for (position, filter) in view.filters.iter().enumerate() {
            insert_filter
                .execute(params![
                    view_id,
                    position as i64,
                    filter.column_id.0,
                    filter.operator.as_str(),
                    filter.value
                ])
                .context("failed to insert view filter")?;
        }

        let mut insert_hidden = tx
            .prepare("INSERT INTO view_hidden_column(view_id, column_id) VALUES (?1, ?2)")
            .context("failed to prepare hidden column insert")?;
        for column_id in &view.hidden_columns {
            insert_hidden
                .execute(params![view_id, column_id.0])
                .context("failed to insert hidden column")?;
        }
    }

    tx.commit().context("failed to commit view spec")?;
    Ok(())
}
