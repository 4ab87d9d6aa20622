//! Value semantics shared by the SQLite functions and the in-memory comparators.
//!
//! Cells are stored as text. Text comparisons fold case, numeric comparisons
//! cast at evaluation time, and a failed cast yields `None` rather than an error.

use std::cmp::Ordering;

use crate::domain::entities::table::ColumnType;

pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Folded text used for ordering. Absent and empty values have no key.
pub fn text_key(value: Option<&str>) -> Option<String> {
    match value {
        Some(value) if !value.is_empty() => Some(fold(value)),
        _ => None,
    }
}

pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        // -0 and 0 must compare equal in SQL and in memory alike.
        .map(|number| if number == 0.0 { 0.0 } else { number })
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    pub fn from_raw(column_type: ColumnType, raw: Option<&str>) -> Option<SortKey> {
        match column_type {
            ColumnType::Text => text_key(raw).map(SortKey::Text),
            ColumnType::Number => raw.and_then(parse_number).map(SortKey::Number),
        }
    }

    pub fn cmp_key(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}
