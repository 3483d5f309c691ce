use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;

use crate::core::config::Upstream;
use crate::core::http::Response;
use crate::core::HttpIO;

#[derive(Clone)]
pub struct NativeHttp {
    client: Client,
}

impl Default for NativeHttp {
    fn default() -> Self {
        Self { client: Client::new() }
    }
}

impl NativeHttp {
    pub fn init(upstream: &Upstream) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(upstream.timeout))
            .connect_timeout(Duration::from_secs(upstream.connect_timeout))
            .user_agent(upstream.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpIO for NativeHttp {
    #[tracing::instrument(
        skip_all,
        fields(url.full = %request.url(), http.request.method = %request.method())
    )]
    async fn execute(&self, request: reqwest::Request) -> Result<Response<Bytes>> {
        tracing::info!("{} {}", request.method(), request.url());
        let response = self.client.execute(request).await;
        tracing::debug!("response: {:?}", response);

        Response::from_reqwest(
            response?
                .error_for_status()
                .map_err(|err| err.without_url())?,
        )
        .await
    }
}
