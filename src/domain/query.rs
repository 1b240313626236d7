use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the rules of a query are combined. Passed to the API untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOperator {
    #[default]
    And,
    Or,
}

impl QueryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryOperator::And => "and",
            QueryOperator::Or => "or",
        }
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueryOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(QueryOperator::And),
            "or" => Ok(QueryOperator::Or),
            _ => Err(format!("Invalid query operator: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    AnyOf,
    NotAnyOf,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    GreaterThanOrEquals,
    LowerThan,
    LowerThanOrEqual,
    Between,
    NotContainsText,
    ContainsText,
    ContainsTerms,
    StartsWith,
    EndsWith,
    WithinTheNext,
    WithinTheLast,
}

impl RuleOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleOperator::AnyOf => "any_of",
            RuleOperator::NotAnyOf => "not_any_of",
            RuleOperator::IsEmpty => "is_empty",
            RuleOperator::IsNotEmpty => "is_not_empty",
            RuleOperator::GreaterThan => "greater_than",
            RuleOperator::GreaterThanOrEquals => "greater_than_or_equals",
            RuleOperator::LowerThan => "lower_than",
            RuleOperator::LowerThanOrEqual => "lower_than_or_equal",
            RuleOperator::Between => "between",
            RuleOperator::NotContainsText => "not_contains_text",
            RuleOperator::ContainsText => "contains_text",
            RuleOperator::ContainsTerms => "contains_terms",
            RuleOperator::StartsWith => "starts_with",
            RuleOperator::EndsWith => "ends_with",
            RuleOperator::WithinTheNext => "within_the_next",
            RuleOperator::WithinTheLast => "within_the_last",
        }
    }

    pub fn all() -> &'static [RuleOperator] {
        use RuleOperator::*;
        &[
            AnyOf,
            NotAnyOf,
            IsEmpty,
            IsNotEmpty,
            GreaterThan,
            GreaterThanOrEquals,
            LowerThan,
            LowerThanOrEqual,
            Between,
            NotContainsText,
            ContainsText,
            ContainsTerms,
            StartsWith,
            EndsWith,
            WithinTheNext,
            WithinTheLast,
        ]
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleOperator::all()
            .iter()
            .find(|op| op.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid rule operator: {}", s))
    }
}

/// A column as the caller names it. Titles are resolved per board; ids are
/// taken as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Title(String),
    Id(String),
}

impl ColumnRef {
    pub fn title(title: impl Into<String>) -> Self {
        ColumnRef::Title(title.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        ColumnRef::Id(id.into())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Title(title) => write!(f, "{}", title),
            ColumnRef::Id(id) => write!(f, "#{}", id),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(title: &str) -> Self {
        ColumnRef::title(title)
    }
}

impl From<String> for ColumnRef {
    fn from(title: String) -> Self {
        ColumnRef::Title(title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsQueryRule {
    pub column: ColumnRef,
    pub compare_value: String,
    pub operator: RuleOperator,
}

/// A filter written against column titles, valid for any board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsQuery {
    pub operator: QueryOperator,
    pub rules: Vec<ItemsQueryRule>,
}

impl ItemsQuery {
    pub fn new(operator: QueryOperator) -> Self {
        Self {
            operator,
            rules: Vec::new(),
        }
    }

    pub fn rule(
        mut self,
        column: impl Into<ColumnRef>,
        operator: RuleOperator,
        compare_value: impl Into<String>,
    ) -> Self {
        self.rules.push(ItemsQueryRule {
            column: column.into(),
            compare_value: compare_value.into(),
            operator,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedRule {
    pub column_id: String,
    pub compare_value: String,
    pub operator: RuleOperator,
}

/// An [`ItemsQuery`] rewritten against one board's column ids. Serialises to
/// the API's `query_params` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedQuery {
    pub rules: Vec<TranslatedRule>,
    pub operator: QueryOperator,
}
