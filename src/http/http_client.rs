use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::HttpError;

/// Opaque credentials attached to every outbound request.
///
/// Sourced from configuration; the client forwards them as headers and
/// never inspects them.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub auth_token: String,
    pub portfolio_token: String,
}

pub(crate) struct HttpClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: Url, tokens: &AuthTokens) -> Result<Self, anyhow::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert("x-auth-token", HeaderValue::from_str(&tokens.auth_token)?);
        headers.insert("x-portfolio-token", HeaderValue::from_str(&tokens.portfolio_token)?);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { base_url, client })
    }

    /// Issues a single GET request and decodes the JSON response body.
    ///
    /// One outbound request per call; failures are propagated, never
    /// retried, and nothing is cached at this layer.
    pub async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, HttpError> {
        let url = self.base_url.join(path_and_query)?;

        let resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            return Err(HttpError::ServerError { status, body });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
