use anyhow::Result;
use bytes::Bytes;
use derive_setters::Setters;
use serde::de::DeserializeOwned;

#[derive(Clone, Debug, Default, Setters)]
pub struct Response<Body> {
    pub status: reqwest::StatusCode,
    pub headers: reqwest::header::HeaderMap,
    pub body: Body,
}

impl Response<Bytes> {
    pub async fn from_reqwest(resp: reqwest::Response) -> Result<Self> {
        let status = resp.status();
        let headers = resp.headers().to_owned();
        let body = resp.bytes().await?;
        Ok(Response { status, headers, body })
    }

    pub fn empty() -> Self {
        Response {
            status: reqwest::StatusCode::OK,
            headers: reqwest::header::HeaderMap::default(),
            body: Bytes::new(),
        }
    }

    pub fn to_json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            anyhow::bail!("Empty response body with status {}", self.status);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Body {
        after: Option<String>,
    }

    #[test]
    fn test_to_json() {
        let response = Response::empty().body(Bytes::from_static(br#"{"after":"t3_x"}"#));
        let actual: Body = response.to_json().unwrap();
        assert_eq!(actual, Body { after: Some("t3_x".to_string()) });
    }

    #[test]
    fn test_to_json_empty_body() {
        let error = Response::empty().to_json::<Body>().unwrap_err();
        assert_eq!(error.to_string(), "Empty response body with status 200 OK");
    }
}
