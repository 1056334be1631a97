//! HTTP client used to fire load requests


use crate::{
    defaults::REQUEST_PATH,
    error::{AppError, Result},
};
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET and return the status code once the response head arrives
    ///
    /// Any status counts as a response. `Err` means no response was obtained.
    async fn get(&self, url: &Url) -> Result<u16>;
}

/// reqwest-backed client; the body of each response is never read
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Create a client whose every request is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<u16> {
        let response = self.client.get(url.clone()).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Build `<base>/api/v1/models?round=<round>&id=<id>`
///
/// Any path on the base URL is kept as a prefix; an existing query or
/// fragment is dropped.
pub fn build_request_url(base: &Url, round: u32, id: u32) -> Url {
    let mut url = base.clone();
    let path = format!("{}{}", base.path().trim_end_matches('/'), REQUEST_PATH);
    url.set_path(&path);
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("round", &round.to_string())
        .append_pair("id", &id.to_string());
    url
}
