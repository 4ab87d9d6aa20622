use std::collections::BTreeSet;

use crate::domain::entities::table::{ColumnId, TableId, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column_id: ColumnId,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Contains,
    NotContains,
    EqualTo,
    NotEqualTo,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    /// Operator name read back from storage that this build does not know.
    Unsupported(String),
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 10] = [
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::EqualTo,
        FilterOperator::NotEqualTo,
        FilterOperator::IsEmpty,
        FilterOperator::IsNotEmpty,
        FilterOperator::GreaterThan,
        FilterOperator::GreaterThanEqual,
        FilterOperator::LessThan,
        FilterOperator::LessThanEqual,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::EqualTo => "equal_to",
            FilterOperator::NotEqualTo => "not_equal_to",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::GreaterThanEqual => "greater_than_equal",
            FilterOperator::LessThan => "less_than",
            FilterOperator::LessThanEqual => "less_than_equal",
            FilterOperator::Unsupported(name) => name,
        }
    }

    pub fn parse(value: &str) -> Self {
        Self::ALL
            .iter()
            .find(|op| op.as_str() == value)
            .cloned()
            .unwrap_or_else(|| FilterOperator::Unsupported(value.to_string()))
    }

    /// Whether the operator ignores the filter value.
    pub fn is_unary(&self) -> bool {
        matches!(self, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column_id: ColumnId,
    pub operator: FilterOperator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub id: ViewId,
    pub table_id: TableId,
    pub name: String,
    pub sorts: Vec<SortSpec>,
    pub filters: Vec<FilterSpec>,
    pub hidden_columns: BTreeSet<ColumnId>,
}

impl View {
    /// Replaces the sort on the same column, or appends a new sort level.
    pub fn upsert_sort(&mut self, sort: SortSpec) {
        match self
            .sorts
            .iter_mut()
            .find(|existing| existing.column_id == sort.column_id)
        {
            Some(existing) => *existing = sort,
            None => self.sorts.push(sort),
        }
    }

    pub fn remove_sort(&mut self, sort: &SortSpec) -> bool {
        let before = self.sorts.len();
        self.sorts.retain(|existing| existing != sort);
        self.sorts.len() != before
    }

    pub fn add_filter(&mut self, filter: FilterSpec) {
        self.filters.push(filter);
    }

    pub fn replace_filter(&mut self, index: usize, filter: FilterSpec) -> bool {
        match self.filters.get_mut(index) {
            Some(existing) => {
                *existing = filter;
                true
            }
            None => false,
        }
    }

    /// Removes the first filter equal to `filter`.
    pub fn remove_filter(&mut self, filter: &FilterSpec) -> bool {
        match self.filters.iter().position(|existing| existing == filter) {
            Some(idx) => {
                self.filters.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn set_column_hidden(&mut self, column_id: ColumnId, hidden: bool) {
        if hidden {
            self.hidden_columns.insert(column_id);
        } else {
            self.hidden_columns.remove(&column_id);
        }
    }

    pub fn is_column_visible(&self, column_id: ColumnId) -> bool {
        !self.hidden_columns.contains(&column_id)
    }
}
