/// Repository-side failures, as seen through the ports.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("rule not found: {id}")]
    RuleNotFound { id: String },

    #[error("backend error: {0}")]
    Backend(String),
}
