/// A rule referenced a column the board does not have. Never fatal: the
/// board is left out of the search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column '{column}' not found on board '{board}'")]
pub struct TranslationMiss {
    pub board: String,
    pub column: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),
}

impl OpsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, OpsError::NotFound(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OpsError::Cancelled)
    }
}
