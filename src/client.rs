use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::domain::{
    BoardListing, BoardWithGroups, CreateItemRequest, CreatedItem, ItemsQuery, OpsError,
};
use crate::infrastructure::{BoardsApi, GraphqlClient};
use crate::services::{Aggregator, BoardCatalog, BoardQueryWorker, ItemCreator, ItemStream};

/// Immutable handle over one transport and credential. Every service borrows
/// the same `Arc<dyn BoardsApi>`; nothing here is mutated after construction.
#[derive(Clone)]
pub struct BoardsClient {
    catalog: BoardCatalog,
    aggregator: Aggregator,
    creator: Arc<ItemCreator>,
}

impl BoardsClient {
    pub fn new(api: Arc<dyn BoardsApi>, config: &Config) -> Self {
        let catalog = BoardCatalog::new(Arc::clone(&api));
        let worker = BoardQueryWorker::new(Arc::clone(&api)).with_limit(config.page_limit);
        let aggregator = Aggregator::new(catalog.clone(), worker)
            .with_max_concurrency(config.max_concurrency);
        let creator = Arc::new(ItemCreator::new(api, catalog.clone()));

        Self {
            catalog,
            aggregator,
            creator,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, OpsError> {
        let api = GraphqlClient::from_config(config)?;
        Ok(Self::new(Arc::new(api), config))
    }

    pub async fn list_boards(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<BoardListing>, OpsError> {
        self.catalog.list_boards(cancel).await
    }

    pub async fn find_board_by_name(
        &self,
        cancel: &CancellationToken,
        name: &str,
    ) -> Result<BoardListing, OpsError> {
        self.catalog.find_board_by_name(cancel, name).await
    }

    pub async fn board_with_groups(
        &self,
        cancel: &CancellationToken,
        board_id: &str,
    ) -> Result<BoardWithGroups, OpsError> {
        self.catalog.board_with_groups(cancel, board_id).await
    }

    pub async fn search_all_boards(
        &self,
        cancel: &CancellationToken,
        query: ItemsQuery,
    ) -> Result<ItemStream, OpsError> {
        self.aggregator.search_all_boards(cancel, query).await
    }

    pub async fn create_item(
        &self,
        cancel: &CancellationToken,
        request: &CreateItemRequest,
    ) -> Result<CreatedItem, OpsError> {
        self.creator.create_item(cancel, request).await
    }
}
