pub mod board;
pub mod error;
pub mod item;
pub mod query;

pub use board::{BoardListing, BoardWithGroups, Column, Group};
pub use error::{OpsError, TranslationMiss};
pub use item::{
    ColumnValue, ColumnValueColumn, CreateItemMutation, CreateItemRequest, CreatedItem, Item,
};
pub use query::{
    ColumnRef, ItemsQuery, ItemsQueryRule, QueryOperator, RuleOperator, TranslatedQuery,
    TranslatedRule,
};
