use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardListing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub board_kind: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardWithGroups {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub board_kind: Option<String>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl BoardWithGroups {
    /// Case-insensitive exact match on the group title.
    pub fn find_group(&self, title: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.title.to_lowercase() == title.to_lowercase())
    }
}

impl fmt::Display for BoardWithGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board {} ID {}\nGroups:", self.name, self.id)?;
        for group in &self.groups {
            write!(f, " (Name: {} ID: {})", group.title, group.id)?;
        }
        Ok(())
    }
}
