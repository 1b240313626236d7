use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Group;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnValueColumn {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    pub column: ColumnValueColumn,
}

impl ColumnValue {
    /// Rendered text if the API produced one, otherwise the raw value.
    pub fn display_value(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.value.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub group: Group,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

impl Item {
    pub fn value_for(&self, column_title: &str) -> Option<&str> {
        let wanted = column_title.to_lowercase();
        self.column_values
            .iter()
            .find(|cv| cv.column.title.to_lowercase() == wanted)
            .map(ColumnValue::display_value)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Group: '{}/{}', Name: {}, Email: {}, Phone: {}",
            self.group.title,
            self.name,
            self.value_for("nume").unwrap_or_default(),
            self.value_for("email").unwrap_or_default(),
            self.value_for("telefon").unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItem {
    pub id: String,
}

/// What the caller asks for: names, not ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub board_name: String,
    pub group_name: String,
    pub item_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Resolved form of a [`CreateItemRequest`], ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemMutation {
    pub board_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub item_name: String,
    /// JSON object keyed by column id, already encoded.
    pub column_values: String,
}
