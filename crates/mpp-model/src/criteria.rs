//! Filter criteria, groups and graphical indicators.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::field::FieldType;

/// Comparison or logical operator of a criteria node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestOperator {
    IsAnyValue,
    IsWithin,
    IsGreaterThan,
    IsLessThan,
    IsGreaterThanOrEqualTo,
    IsLessThanOrEqualTo,
    Equals,
    DoesNotEqual,
    Contains,
    IsNotWithin,
    DoesNotContain,
    ContainsExactly,
    And,
    Or,
    /// An operator code outside the known set.
    Unknown(i32),
}

impl TestOperator {
    #[must_use]
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => Self::IsAnyValue,
            1 => Self::IsWithin,
            2 => Self::IsGreaterThan,
            3 => Self::IsLessThan,
            4 => Self::IsGreaterThanOrEqualTo,
            5 => Self::IsLessThanOrEqualTo,
            6 => Self::Equals,
            7 => Self::DoesNotEqual,
            8 => Self::Contains,
            9 => Self::IsNotWithin,
            10 => Self::DoesNotContain,
            11 => Self::ContainsExactly,
            12 => Self::And,
            13 => Self::Or,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Number of operands a comparison takes.
    #[must_use]
    pub fn operand_count(self) -> usize {
        match self {
            Self::IsAnyValue | Self::And | Self::Or | Self::Unknown(_) => 0,
            Self::IsWithin | Self::IsNotWithin => 2,
            _ => 1,
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CriteriaValue {
    Text(String),
    Number(f64),
    Date(Option<NaiveDateTime>),
    Duration(Duration),
    Boolean(bool),
    /// Compare against another field of the same entity.
    Field(FieldType),
    /// Ask the user at evaluation time.
    Prompt(String),
}

/// A node of a criteria tree: a comparison, or a logical operator over
/// child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericCriteria {
    pub field: Option<FieldType>,
    pub operator: TestOperator,
    pub values: Vec<CriteriaValue>,
    pub children: Vec<GenericCriteria>,
}

impl GenericCriteria {
    #[must_use]
    pub fn new(operator: TestOperator) -> Self {
        Self {
            field: None,
            operator,
            values: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Nodes in this tree, counting this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub unique_id: i32,
    pub name: Option<String>,
    pub is_task_filter: bool,
    pub show_related_summary_rows: bool,
    pub criteria: Option<GenericCriteria>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupClause {
    pub field: FieldType,
    pub ascending: bool,
    pub group_interval: i32,
    pub start_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub unique_id: i32,
    pub name: Option<String>,
    pub show_summary_tasks: bool,
    pub clauses: Vec<GroupClause>,
}

/// One test of a graphical indicator, and the indicator shown when it passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicalIndicatorCriteria {
    pub criteria: GenericCriteria,
    pub indicator: i32,
}

/// Indicator tests for a field, split by the rows they apply to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphicalIndicator {
    pub field: Option<FieldType>,
    pub non_summary_rows: Vec<GraphicalIndicatorCriteria>,
    pub summary_rows: Vec<GraphicalIndicatorCriteria>,
    pub project_summary: Vec<GraphicalIndicatorCriteria>,
    pub summary_rows_inherit: bool,
    pub project_summary_inherits: bool,
    pub show_data_values_in_tooltips: bool,
}
