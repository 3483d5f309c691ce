/// Outcome delivered to a caller of [DataLoader](super::DataLoader) whose
/// key could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// The batch succeeded but did not contain the requested key.
    #[error("No value found for the requested key")]
    NotFound,

    /// The batch call itself failed. Every caller of the batch sees the same
    /// error.
    #[error("Batch fetch failed: {0}")]
    BatchFetch(E),

    /// The batch task was dropped before it produced a result.
    #[error("Batch was dropped before it resolved")]
    Canceled,
}

impl<E> Error<E> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}
