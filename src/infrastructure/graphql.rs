use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::domain::{
    BoardListing, BoardWithGroups, CreateItemMutation, CreatedItem, Item, OpsError,
    TranslatedQuery,
};

/// The four remote operations the rest of the crate needs. Implementations are
/// shared across concurrent board workers and must not hold mutable state.
#[async_trait]
pub trait BoardsApi: Send + Sync {
    async fn list_boards(&self) -> Result<Vec<BoardListing>, OpsError>;

    async fn board_with_groups(&self, board_id: &str) -> Result<Vec<BoardWithGroups>, OpsError>;

    async fn board_items_page(
        &self,
        board_id: &str,
        limit: usize,
        query: &TranslatedQuery,
    ) -> Result<Vec<Item>, OpsError>;

    async fn create_item(&self, mutation: &CreateItemMutation) -> Result<CreatedItem, OpsError>;
}

const LIST_BOARDS_QUERY: &str = "query {
  boards(workspace_ids: [null]) {
    id name description board_kind
    columns { id title }
  }
}";

const BOARD_WITH_GROUPS_QUERY: &str = "query ($ids: [ID!]) {
  boards(ids: $ids) {
    id name description board_kind
    groups { id title position }
  }
}";

const BOARD_ITEMS_PAGE_QUERY: &str = "query ($ids: [ID!], $limit: Int!, $queryParams: ItemsQuery) {
  boards(ids: $ids) {
    id name
    items_page(limit: $limit, query_params: $queryParams) {
      items {
        id name
        group { id title position }
        column_values { id text value column { id title type } }
      }
    }
  }
}";

const CREATE_ITEM_MUTATION: &str = "mutation ($boardId: ID!, $groupId: String, $itemName: String!, $cols: JSON) {
  create_item(board_id: $boardId, group_id: $groupId, item_name: $itemName, column_values: $cols) {
    id
  }
}";

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct BoardsData<T> {
    boards: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct BoardWithItemsPage {
    items_page: ItemsPage,
}

#[derive(Debug, Deserialize)]
struct CreateItemData {
    create_item: CreatedItem,
}

/// GraphQL-over-HTTP client. Cheap to clone; the credential is read-only.
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    http_client: reqwest::Client,
    url: String,
    token: String,
    api_version: Option<String>,
}

impl GraphqlClient {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url: url.into(),
            token: token.into(),
            api_version: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, OpsError> {
        let token = config.require_token()?.to_string();
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OpsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: config.api_url.clone(),
            token,
            api_version: config.api_version.clone(),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, OpsError> {
        let mut req = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(version) = &self.api_version {
            req = req.header("API-Version", version);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| OpsError::Transport(format!("HTTP POST {}: {}", self.url, e)))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OpsError::Transport(format!("API error {}: {}", status, body)));
        }

        let body: GraphqlResponse<T> = resp
            .json()
            .await
            .map_err(|e| OpsError::Transport(format!("JSON decode: {}", e)))?;

        if !body.errors.is_empty() {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(OpsError::Transport(format!(
                "GraphQL error: {}",
                messages.join("; ")
            )));
        }

        body.data
            .ok_or_else(|| OpsError::Transport("GraphQL response carried no data".into()))
    }
}

#[async_trait]
impl BoardsApi for GraphqlClient {
    async fn list_boards(&self) -> Result<Vec<BoardListing>, OpsError> {
        let data: BoardsData<BoardListing> = self.execute(LIST_BOARDS_QUERY, json!({})).await?;
        Ok(data.boards)
    }

    async fn board_with_groups(&self, board_id: &str) -> Result<Vec<BoardWithGroups>, OpsError> {
        let data: BoardsData<BoardWithGroups> = self
            .execute(BOARD_WITH_GROUPS_QUERY, json!({ "ids": [board_id] }))
            .await?;
        Ok(data.boards)
    }

    async fn board_items_page(
        &self,
        board_id: &str,
        limit: usize,
        query: &TranslatedQuery,
    ) -> Result<Vec<Item>, OpsError> {
        let variables = json!({
            "ids": [board_id],
            "limit": limit,
            "queryParams": query,
        });
        let data: BoardsData<BoardWithItemsPage> =
            self.execute(BOARD_ITEMS_PAGE_QUERY, variables).await?;

        data.boards
            .into_iter()
            .next()
            .map(|board| board.items_page.items)
            .ok_or_else(|| OpsError::NotFound(format!("no board with id {}", board_id)))
    }

    async fn create_item(&self, mutation: &CreateItemMutation) -> Result<CreatedItem, OpsError> {
        let variables = json!({
            "boardId": mutation.board_id,
            "groupId": mutation.group_id,
            "itemName": mutation.item_name,
            "cols": mutation.column_values,
        });
        let data: CreateItemData = self.execute(CREATE_ITEM_MUTATION, variables).await?;
        Ok(data.create_item)
    }
}
