use async_trait::async_trait;
use jira_client::{FetchError, JiraClient};
use protocol::{Issue, Query};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Anything that can answer a JQL search.
#[async_trait]
pub(crate) trait IssueSource: Send + Sync {
    async fn fetch_issues(
        &self,
        jql: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Issue>, FetchError>;
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch_issues(
        &self,
        jql: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Issue>, FetchError> {
        self.search(jql, cancel).await
    }
}

#[derive(Debug)]
pub(crate) enum FetchOutcome {
    Success { query: Query, issues: Vec<Issue> },
    Failure { query: Query, error: FetchError },
}

impl FetchOutcome {
    pub(crate) fn query(&self) -> &Query {
        match self {
            Self::Success { query, .. } | Self::Failure { query, .. } => query,
        }
    }
}

/// Runs a single query against an [`IssueSource`] and reports exactly one
/// outcome for it.
#[derive(Clone)]
pub(crate) struct QueryFetcher {
    source: Arc<dyn IssueSource>,
}

impl QueryFetcher {
    pub(crate) fn new(source: Arc<dyn IssueSource>) -> Self {
        Self { source }
    }

    pub(crate) async fn fetch(&self, query: Query, cancel: &CancellationToken) -> FetchOutcome {
        let started = Instant::now();
        match self.source.fetch_issues(&query.jql, cancel).await {
            Ok(issues) => {
                tracing::debug!(
                    query = %query.name,
                    issues = issues.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "query fetched"
                );
                FetchOutcome::Success { query, issues }
            }
            Err(error) => {
                tracing::debug!(
                    query = %query.name,
                    error = %error,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "query failed"
                );
                FetchOutcome::Failure { query, error }
            }
        }
    }
}
