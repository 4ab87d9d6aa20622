use std::cmp::Ordering;

use tracing::debug;

use crate::domain::entities::page::RowData;
use crate::domain::entities::table::{Column, ColumnId, ColumnType, RowId};
use crate::domain::entities::view::{SortDirection, SortSpec};
use crate::domain::query::value::SortKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortLevel {
    pub column_id: ColumnId,
    pub column_type: ColumnType,
    pub direction: SortDirection,
}

/// Declared sort levels. Row id ascending always follows the last level, so
/// the order is total even when every declared key ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledOrder {
    pub levels: Vec<SortLevel>,
}

impl CompiledOrder {
    pub fn keys_for<'a, F>(&self, lookup: F) -> Vec<Option<SortKey>>
    where
        F: Fn(ColumnId) -> Option<&'a str>,
    {
        self.levels
            .iter()
            .map(|level| SortKey::from_raw(level.column_type, lookup(level.column_id)))
            .collect()
    }

    pub fn compare_keys(
        &self,
        left: (&[Option<SortKey>], RowId),
        right: (&[Option<SortKey>], RowId),
    ) -> Ordering {
        self.levels
            .iter()
            .zip(left.0.iter().zip(right.0.iter()))
            .map(|(level, (a, b))| compare_level(a.as_ref(), b.as_ref(), level.direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| left.1.cmp(&right.1))
    }

    pub fn compare_rows(&self, left: &RowData, right: &RowData) -> Ordering {
        let left_keys = self.keys_for(|column_id| left.value(column_id));
        let right_keys = self.keys_for(|column_id| right.value(column_id));
        self.compare_keys((&left_keys, left.id), (&right_keys, right.id))
    }
}

/// Missing keys sort last in both directions.
pub fn compare_level(
    left: Option<&SortKey>,
    right: Option<&SortKey>,
    direction: SortDirection,
) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp_key(b),
            SortDirection::Desc => b.cmp_key(a),
        },
    }
}

pub fn compile_sorts(sorts: &[SortSpec], columns: &[Column]) -> CompiledOrder {
    let mut levels: Vec<SortLevel> = Vec::with_capacity(sorts.len());
    for sort in sorts {
        let Some(column) = columns.iter().find(|column| column.id == sort.column_id) else {
            debug!(column_id = %sort.column_id, "sort references a missing column, skipping");
            continue;
        };
        // A repeated column can never break a tie the earlier level left.
        if levels.iter().any(|level| level.column_id == column.id) {
            continue;
        }
        levels.push(SortLevel {
            column_id: column.id,
            column_type: column.column_type,
            direction: sort.direction,
        });
    }
    CompiledOrder { levels }
}
