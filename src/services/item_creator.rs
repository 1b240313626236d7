use std::collections::BTreeMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{BoardListing, CreateItemMutation, CreateItemRequest, CreatedItem, OpsError};
use crate::infrastructure::BoardsApi;

use super::board_catalog::BoardCatalog;

pub const NAME_COLUMN: &str = "Nume";
pub const EMAIL_COLUMN: &str = "Email";
pub const PHONE_COLUMN: &str = "Telefon";

pub struct ItemCreator {
    api: Arc<dyn BoardsApi>,
    catalog: BoardCatalog,
}

impl ItemCreator {
    pub fn new(api: Arc<dyn BoardsApi>, catalog: BoardCatalog) -> Self {
        Self { api, catalog }
    }

    pub async fn create_item(
        &self,
        cancel: &CancellationToken,
        request: &CreateItemRequest,
    ) -> Result<CreatedItem, OpsError> {
        let board = self
            .catalog
            .find_board_by_name(cancel, &request.board_name)
            .await?;
        let group_id = self
            .resolve_group(cancel, &board, &request.group_name)
            .await?;

        let column_values = encode_column_values(&board, request)?;
        tracing::debug!(
            board_id = board.id.as_str(),
            columns = column_values.as_str(),
            "Encoded item column values"
        );

        let mutation = CreateItemMutation {
            board_id: board.id,
            group_id,
            item_name: request.item_name.clone(),
            column_values,
        };

        if cancel.is_cancelled() {
            return Err(OpsError::Cancelled);
        }
        let created = self.api.create_item(&mutation).await?;
        tracing::info!(
            item_id = created.id.as_str(),
            board_id = mutation.board_id.as_str(),
            "Item created"
        );

        Ok(created)
    }

    async fn resolve_group(
        &self,
        cancel: &CancellationToken,
        board: &BoardListing,
        group_name: &str,
    ) -> Result<Option<String>, OpsError> {
        if group_name.is_empty() {
            return Ok(None);
        }

        let with_groups = self.catalog.board_with_groups(cancel, &board.id).await?;
        with_groups
            .find_group(group_name)
            .map(|group| Some(group.id.clone()))
            .ok_or_else(|| {
                OpsError::NotFound(format!(
                    "group '{}' in board '{}'",
                    group_name, with_groups.name
                ))
            })
    }
}

// Every column carrying a fixed title gets the value, duplicates included.
pub fn encode_column_values(
    board: &BoardListing,
    request: &CreateItemRequest,
) -> Result<String, OpsError> {
    let fields = [
        (NAME_COLUMN.to_lowercase(), request.name.as_str()),
        (EMAIL_COLUMN.to_lowercase(), request.email.as_str()),
        (PHONE_COLUMN.to_lowercase(), request.phone.as_str()),
    ];

    let mut values: BTreeMap<&str, &str> = BTreeMap::new();
    for column in &board.columns {
        let title = column.title.to_lowercase();
        if let Some((_, value)) = fields.iter().find(|(fixed, _)| *fixed == title) {
            values.insert(column.id.as_str(), *value);
        }
    }

    Ok(serde_json::to_string(&values)?)
}
