//! Opaque keyset cursor tokens.
//!
//! A token is URL-safe base64 over a small JSON document carrying the last
//! row id and the raw values of every sort column of that row. Decoding needs
//! no server-side state.

use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::table::{ColumnId, RowId};
use crate::domain::query::order::CompiledOrder;
use crate::domain::query::value::SortKey;

const CURSOR_VERSION: u8 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("invalid cursor token")]
    InvalidCursor,
    #[error("failed to encode cursor: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorData {
    #[serde(rename = "r")]
    pub last_row_id: RowId,
    /// Raw cell value per sort column; `None` when the row had no cell.
    #[serde(rename = "s")]
    pub sort_values: BTreeMap<ColumnId, Option<String>>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    v: u8,
    c: CursorData,
}

impl CursorData {
    /// Keys of the cursor row under `order`, or `None` when the cursor was
    /// produced for a different set of sort columns.
    pub fn keys_for(&self, order: &CompiledOrder) -> Option<Vec<Option<SortKey>>> {
        order
            .levels
            .iter()
            .map(|level| {
                self.sort_values
                    .get(&level.column_id)
                    .map(|raw| SortKey::from_raw(level.column_type, raw.as_deref()))
            })
            .collect()
    }
}

pub fn encode(cursor: &CursorData) -> Result<String, CursorError> {
    let envelope = Envelope {
        v: CURSOR_VERSION,
        c: cursor.clone(),
    };
    let json =
        serde_json::to_vec(&envelope).map_err(|err| CursorError::Encode(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode(token: &str) -> Result<CursorData, CursorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim().as_bytes())
        .map_err(|_| CursorError::InvalidCursor)?;
    let envelope: Envelope =
        serde_json::from_slice(&bytes).map_err(|_| CursorError::InvalidCursor)?;
    if envelope.v != CURSOR_VERSION {
        return Err(CursorError::InvalidCursor);
    }
    Ok(envelope.c)
}
