use std::sync::Arc;

use crate::core::HttpIO;

/// IO handles the core needs from its host. The CLI fills it with a reqwest
/// client, tests with canned responses.
#[derive(Clone)]
pub struct TargetRuntime {
    /// HTTP client for the upstream API.
    pub http: Arc<dyn HttpIO>,
}
