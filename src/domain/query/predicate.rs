use tracing::{debug, warn};

use crate::domain::entities::table::{Column, ColumnId, ColumnType};
use crate::domain::entities::view::{FilterOperator, FilterSpec};
use crate::domain::query::value::{fold, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn sql(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
        }
    }
}

/// Test applied to a single cell value. Text operands are already folded.
#[derive(Debug, Clone, PartialEq)]
pub enum CellTest {
    Contains(String),
    NotContains(String),
    TextEquals(String),
    TextNotEquals(String),
    NumberEquals(f64),
    NumberNotEquals(f64),
    NumberCompare(CompareOp, f64),
    IsEmpty,
    IsNotEmpty,
    /// The filter operand failed to cast; nothing matches.
    Never,
}

impl CellTest {
    /// `value` is `None` when the row has no cell for the column.
    pub fn evaluate(&self, value: Option<&str>) -> bool {
        match self {
            CellTest::Contains(needle) => value.is_some_and(|v| fold(v).contains(needle.as_str())),
            CellTest::NotContains(needle) => {
                value.is_some_and(|v| !fold(v).contains(needle.as_str()))
            }
            CellTest::TextEquals(expected) => value.is_some_and(|v| fold(v) == *expected),
            CellTest::TextNotEquals(expected) => value.is_some_and(|v| fold(v) != *expected),
            CellTest::NumberEquals(expected) => {
                value.and_then(parse_number).is_some_and(|n| n == *expected)
            }
            CellTest::NumberNotEquals(expected) => {
                value.and_then(parse_number).is_some_and(|n| n != *expected)
            }
            CellTest::NumberCompare(op, rhs) => value
                .and_then(parse_number)
                .is_some_and(|n| op.holds(n, *rhs)),
            CellTest::IsEmpty => value.map_or(true, str::is_empty),
            CellTest::IsNotEmpty => value.is_some_and(|v| !v.is_empty()),
            CellTest::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column_id: ColumnId,
    pub test: CellTest,
}

/// Conjunction of cell conditions. An empty predicate accepts every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub conditions: Vec<Condition>,
}

impl Predicate {
    pub fn is_always_true(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches<'a, F>(&self, lookup: F) -> bool
    where
        F: Fn(ColumnId) -> Option<&'a str>,
    {
        self.conditions
            .iter()
            .all(|condition| condition.test.evaluate(lookup(condition.column_id)))
    }
}

pub fn compile_filters(filters: &[FilterSpec], columns: &[Column]) -> Predicate {
    let mut conditions = Vec::with_capacity(filters.len());
    for filter in filters {
        let Some(column) = columns.iter().find(|column| column.id == filter.column_id) else {
            debug!(column_id = %filter.column_id, "filter references a missing column, skipping");
            continue;
        };
        if let Some(test) = compile_test(filter, column.column_type) {
            conditions.push(Condition {
                column_id: column.id,
                test,
            });
        }
    }
    Predicate { conditions }
}

fn compile_test(filter: &FilterSpec, column_type: ColumnType) -> Option<CellTest> {
    let numeric = |op: CompareOp| {
        parse_number(&filter.value)
            .map(|rhs| CellTest::NumberCompare(op, rhs))
            .unwrap_or(CellTest::Never)
    };
    let test = match (&filter.operator, column_type) {
        (FilterOperator::Contains, _) => CellTest::Contains(fold(&filter.value)),
        (FilterOperator::NotContains, _) => CellTest::NotContains(fold(&filter.value)),
        (FilterOperator::EqualTo, ColumnType::Text) => CellTest::TextEquals(fold(&filter.value)),
        (FilterOperator::EqualTo, ColumnType::Number) => parse_number(&filter.value)
            .map(CellTest::NumberEquals)
            .unwrap_or(CellTest::Never),
        (FilterOperator::NotEqualTo, ColumnType::Text) => {
            CellTest::TextNotEquals(fold(&filter.value))
        }
        (FilterOperator::NotEqualTo, ColumnType::Number) => parse_number(&filter.value)
            .map(CellTest::NumberNotEquals)
            .unwrap_or(CellTest::Never),
        (FilterOperator::IsEmpty, _) => CellTest::IsEmpty,
        (FilterOperator::IsNotEmpty, _) => CellTest::IsNotEmpty,
        (FilterOperator::GreaterThan, _) => numeric(CompareOp::Gt),
        (FilterOperator::GreaterThanEqual, _) => numeric(CompareOp::Gte),
        (FilterOperator::LessThan, _) => numeric(CompareOp::Lt),
        (FilterOperator::LessThanEqual, _) => numeric(CompareOp::Lte),
        (FilterOperator::Unsupported(name), _) => {
            warn!(operator = %name, column_id = %filter.column_id, "unsupported filter operator, passing rows through");
            return None;
        }
    };
    Some(test)
}
