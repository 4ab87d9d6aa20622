use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::domain::query::value::{fold, parse_number, text_key};

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    register_value_functions(&conn)?;
    Ok(conn)
}

/// Exposes the in-memory value semantics to SQL so both paths agree.
///
/// - `vg_fold(text)`: case-folded text
/// - `vg_text_key(text)`: folded text, NULL when empty
/// - `vg_num(text)`: finite number, NULL when the cast fails
fn register_value_functions(conn: &Connection) -> Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("vg_fold", 1, flags, |ctx| {
        let value: Option<String> = ctx.get(0)?;
        Ok(value.map(|value| fold(&value)))
    })
    .context("failed to register vg_fold")?;

    conn.create_scalar_function("vg_text_key", 1, flags, |ctx| {
        let value: Option<String> = ctx.get(0)?;
        Ok(text_key(value.as_deref()))
    })
    .context("failed to register vg_text_key")?;

    conn.create_scalar_function("vg_num", 1, flags, |ctx| {
        let value: Option<String> = ctx.get(0)?;
        Ok(value.as_deref().and_then(parse_number))
    })
    .context("failed to register vg_num")?;

    Ok(())
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS data_table (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            current_view_id INTEGER,
            created_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS table_column (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            table_id    INTEGER NOT NULL,
            name        TEXT NOT NULL,
            column_type TEXT NOT NULL CHECK (column_type IN ('text', 'number')),
            position    INTEGER NOT NULL,
            FOREIGN KEY (table_id) REFERENCES data_table(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS table_row (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            table_id    INTEGER NOT NULL,
            FOREIGN KEY (table_id) REFERENCES data_table(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS cell (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            row_id      INTEGER NOT NULL,
            column_id   INTEGER NOT NULL,
            value       TEXT NOT NULL DEFAULT '',
            UNIQUE (row_id, column_id),
            FOREIGN KEY (row_id) REFERENCES table_row(id) ON DELETE CASCADE,
            FOREIGN KEY (column_id) REFERENCES table_column(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS view (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            table_id    INTEGER NOT NULL,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (table_id) REFERENCES data_table(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS view_sort (
            view_id     INTEGER NOT NULL,
            position    INTEGER NOT NULL,
            column_id   INTEGER NOT NULL,
            direction   TEXT NOT NULL CHECK (direction IN ('asc', 'desc')),
            PRIMARY KEY (view_id, position),
            FOREIGN KEY (view_id) REFERENCES view(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS view_filter (
            view_id     INTEGER NOT NULL,
            position    INTEGER NOT NULL,
            column_id   INTEGER NOT NULL,
            operator    TEXT NOT NULL,
            value       TEXT NOT NULL,
            PRIMARY KEY (view_id, position),
            FOREIGN KEY (view_id) REFERENCES view(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS view_hidden_column (
            view_id     INTEGER NOT NULL,
            column_id   INTEGER NOT NULL,
            PRIMARY KEY (view_id, column_id),
            FOREIGN KEY (view_id) REFERENCES view(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_row_table
            ON table_row(table_id, id);

        CREATE INDEX IF NOT EXISTS idx_cell_column_row
            ON cell(column_id, row_id);

        CREATE INDEX IF NOT EXISTS idx_column_table
            ON table_column(table_id, position);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
