use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{BoardListing, BoardWithGroups, OpsError};
use crate::infrastructure::BoardsApi;

#[derive(Clone)]
pub struct BoardCatalog {
    api: Arc<dyn BoardsApi>,
}

impl BoardCatalog {
    pub fn new(api: Arc<dyn BoardsApi>) -> Self {
        Self { api }
    }

    // Cancellation is checked once; an in-flight listing is not interrupted.
    pub async fn list_boards(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<BoardListing>, OpsError> {
        if cancel.is_cancelled() {
            tracing::debug!("Board listing skipped: token already cancelled");
            return Err(OpsError::Cancelled);
        }

        self.api.list_boards().await
    }

    pub async fn find_board_by_name(
        &self,
        cancel: &CancellationToken,
        name: &str,
    ) -> Result<BoardListing, OpsError> {
        let wanted = name.to_lowercase();
        let boards = self.list_boards(cancel).await?;

        boards
            .into_iter()
            .find(|board| {
                tracing::trace!(board = board.name.as_str(), wanted = name, "Comparing board name");
                board.name.to_lowercase() == wanted
            })
            .ok_or_else(|| OpsError::NotFound(format!("board '{}'", name)))
    }

    pub async fn board_with_groups(
        &self,
        cancel: &CancellationToken,
        board_id: &str,
    ) -> Result<BoardWithGroups, OpsError> {
        if cancel.is_cancelled() {
            return Err(OpsError::Cancelled);
        }

        self.api
            .board_with_groups(board_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OpsError::NotFound(format!("no board with id {}", board_id)))
    }
}
