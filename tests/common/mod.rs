#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use board_ops::config::Config;
use board_ops::domain::{
    BoardListing, BoardWithGroups, Column, ColumnValue, ColumnValueColumn, CreateItemMutation,
    CreatedItem, Group, Item, OpsError, TranslatedQuery,
};
use board_ops::infrastructure::BoardsApi;
use board_ops::BoardsClient;

struct FakePage {
    items: Result<Vec<Item>, String>,
    delay: Duration,
}

/// In-memory stand-in for the remote API. Records every call it receives.
#[derive(Default)]
pub struct FakeBoardsApi {
    boards: Vec<BoardListing>,
    list_error: Option<String>,
    pages: HashMap<String, FakePage>,
    groups: HashMap<String, Vec<Group>>,
    create_error: Option<String>,

    pub list_calls: AtomicUsize,
    pub group_calls: AtomicUsize,
    page_calls: Mutex<Vec<(String, usize, TranslatedQuery)>>,
    created: Mutex<Vec<CreateItemMutation>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBoardsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(mut self, board: BoardListing) -> Self {
        self.boards.push(board);
        self
    }

    pub fn items(self, board_id: &str, items: Vec<Item>) -> Self {
        self.items_after(board_id, items, Duration::ZERO)
    }

    pub fn items_after(mut self, board_id: &str, items: Vec<Item>, delay: Duration) -> Self {
        self.pages.insert(
            board_id.to_string(),
            FakePage {
                items: Ok(items),
                delay,
            },
        );
        self
    }

    pub fn failing(mut self, board_id: &str, message: &str) -> Self {
        self.pages.insert(
            board_id.to_string(),
            FakePage {
                items: Err(message.to_string()),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Board query that never answers within a test's lifetime.
    pub fn hanging(self, board_id: &str) -> Self {
        self.items_after(board_id, vec![], Duration::from_secs(3600))
    }

    pub fn list_fails(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn groups(mut self, board_id: &str, groups: &[(&str, &str)]) -> Self {
        self.groups.insert(
            board_id.to_string(),
            groups
                .iter()
                .map(|(id, title)| Group {
                    id: id.to_string(),
                    title: title.to_string(),
                    position: None,
                })
                .collect(),
        );
        self
    }

    pub fn create_fails(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    pub fn page_calls(&self) -> Vec<(String, usize, TranslatedQuery)> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<CreateItemMutation> {
        self.created.lock().unwrap().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BoardsApi for FakeBoardsApi {
    async fn list_boards(&self) -> Result<Vec<BoardListing>, OpsError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_error {
            Some(message) => Err(OpsError::Transport(message.clone())),
            None => Ok(self.boards.clone()),
        }
    }

    async fn board_with_groups(&self, board_id: &str) -> Result<Vec<BoardWithGroups>, OpsError> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .boards
            .iter()
            .filter(|b| b.id == board_id)
            .map(|b| BoardWithGroups {
                id: b.id.clone(),
                name: b.name.clone(),
                description: None,
                board_kind: None,
                groups: self.groups.get(board_id).cloned().unwrap_or_default(),
            })
            .collect())
    }

    async fn board_items_page(
        &self,
        board_id: &str,
        limit: usize,
        query: &TranslatedQuery,
    ) -> Result<Vec<Item>, OpsError> {
        self.page_calls
            .lock()
            .unwrap()
            .push((board_id.to_string(), limit, query.clone()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let Some(page) = self.pages.get(board_id) else {
            return Ok(vec![]);
        };
        if !page.delay.is_zero() {
            tokio::time::sleep(page.delay).await;
        }
        page.items.clone().map_err(OpsError::Transport)
    }

    async fn create_item(&self, mutation: &CreateItemMutation) -> Result<CreatedItem, OpsError> {
        if let Some(message) = &self.create_error {
            return Err(OpsError::Transport(message.clone()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(mutation.clone());
        Ok(CreatedItem {
            id: format!("item-{}", created.len()),
        })
    }
}

pub fn client(api: &Arc<FakeBoardsApi>) -> BoardsClient {
    client_with(api, &Config::default())
}

pub fn client_with(api: &Arc<FakeBoardsApi>, config: &Config) -> BoardsClient {
    let api: Arc<dyn BoardsApi> = api.clone();
    BoardsClient::new(api, config)
}

pub fn board(id: &str, name: &str, columns: &[(&str, &str)]) -> BoardListing {
    BoardListing {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        board_kind: Some("public".into()),
        columns: columns
            .iter()
            .map(|(id, title)| Column {
                id: id.to_string(),
                title: title.to_string(),
            })
            .collect(),
    }
}

pub fn item(id: &str, name: &str) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        group: Group {
            id: "topics".into(),
            title: "Topics".into(),
            position: None,
        },
        column_values: vec![ColumnValue {
            id: "email".into(),
            text: Some(format!("{}@example.com", name.to_lowercase())),
            value: None,
            column: ColumnValueColumn {
                id: "email".into(),
                title: "Email".into(),
                kind: Some("email".into()),
            },
        }],
    }
}
