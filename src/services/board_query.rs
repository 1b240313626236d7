use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::DEFAULT_PAGE_LIMIT;
use crate::domain::{Item, OpsError, TranslatedQuery};
use crate::infrastructure::BoardsApi;

/// Only the first page is ever fetched: items past `limit` on a board are not
/// seen by the search.
#[derive(Clone)]
pub struct BoardQueryWorker {
    api: Arc<dyn BoardsApi>,
    limit: usize,
}

impl BoardQueryWorker {
    pub fn new(api: Arc<dyn BoardsApi>) -> Self {
        Self {
            api,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub async fn query(
        &self,
        cancel: &CancellationToken,
        board_id: &str,
        query: &TranslatedQuery,
    ) -> Result<Vec<Item>, OpsError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(OpsError::Cancelled),
            result = self.api.board_items_page(board_id, self.limit, query) => result,
        }
    }
}
