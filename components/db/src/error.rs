#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document Not Found: {0}")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(&'static str),

    #[error("Precondition Failed: {0}")]
    Precondition(&'static str),

    #[error("Store Unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Backend failures, as opposed to errors caused by the request itself
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
