mod error;
mod url;

pub use error::FetchError;
pub use url::join_base_path;

use anyhow::Context;
use protocol::{Issue, SearchResults};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub const SEARCH_PATH: &str = "rest/api/2/search";
/// Upper bound on issues returned per search.
pub const MAX_RESULTS: u32 = 10;

/// Credentials and location of a JIRA instance.
#[derive(Clone)]
pub struct JiraApiContext {
    pub email: String,
    pub api_key: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct JiraClient {
    http: Client,
    search_url: String,
    email: String,
    api_key: String,
}

impl JiraClient {
    pub fn new(context: JiraApiContext, timeout: Duration) -> anyhow::Result<Self> {
        let search_url =
            join_base_path(&context.base_url, SEARCH_PATH).map_err(anyhow::Error::msg)?;
        reqwest::Url::parse(&search_url)
            .with_context(|| format!("invalid base_url {}", context.base_url))?;
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("qj/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            search_url,
            email: context.email,
            api_key: context.api_key,
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Runs one JQL search. The query text is sent as-is; issues come back in
    /// the order the server returned them. Returns `Cancelled` as soon as
    /// `cancel` fires, dropping the in-flight request.
    pub async fn search(
        &self,
        jql: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Issue>, FetchError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.search_uncancelled(jql) => result,
        }
    }

    async fn search_uncancelled(&self, jql: &str) -> Result<Vec<Issue>, FetchError> {
        let started = Instant::now();
        let max_results = MAX_RESULTS.to_string();
        let response = self
            .http
            .get(&self.search_url)
            .basic_auth(&self.email, Some(&self.api_key))
            .header(ACCEPT, "application/json")
            .query(&[("jql", jql), ("maxResults", max_results.as_str())])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            status = %status,
            body_len = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search response"
        );
        if !status.is_success() {
            return Err(FetchError::api(status.as_u16(), body.trim()));
        }
        let results: SearchResults = serde_json::from_str(&body)?;
        Ok(results.issues)
    }
}
