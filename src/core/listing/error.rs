use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A page of a listing could not be fetched. The accumulated list is left
/// as it was.
#[derive(Clone, thiserror::Error)]
#[error("Page fetch failed: {0}")]
pub struct PageFetchError(Arc<anyhow::Error>);

impl PageFetchError {
    pub fn cause(&self) -> &anyhow::Error {
        &self.0
    }
}

impl From<anyhow::Error> for PageFetchError {
    fn from(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }
}

impl fmt::Debug for PageFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PageFetchError").field(&self.0.to_string()).finish()
    }
}

/// Serialized as its message.
impl Serialize for PageFetchError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
