mod http;

use std::sync::Arc;

pub use http::NativeHttp;

use crate::core::config::Upstream;
use crate::core::runtime::TargetRuntime;
use crate::core::HttpIO;

// Provides access to http in native rust environment
fn init_http(upstream: &Upstream) -> anyhow::Result<Arc<dyn HttpIO>> {
    Ok(Arc::new(NativeHttp::init(upstream)?))
}

pub fn init(upstream: &Upstream) -> anyhow::Result<TargetRuntime> {
    Ok(TargetRuntime { http: init_http(upstream)? })
}
