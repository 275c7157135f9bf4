use crate::fetcher::{FetchOutcome, QueryFetcher};
use jira_client::FetchError;
use protocol::{Issue, Query};
use std::collections::HashMap;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Issues of every query in a batch, keyed by query name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ResultSet {
    by_name: HashMap<String, Vec<Issue>>,
}

impl ResultSet {
    /// Returns the entry this one replaced, if the name was already present.
    pub(crate) fn insert(&mut self, name: String, issues: Vec<Issue>) -> Option<Vec<Issue>> {
        self.by_name.insert(name, issues)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&[Issue]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Iteration order is unspecified; render by query order instead.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &[Issue])> {
        self.by_name
            .iter()
            .map(|(name, issues)| (name.as_str(), issues.as_slice()))
    }
}

#[derive(Debug, Error)]
pub(crate) enum DispatchError {
    #[error("query {query:?} failed")]
    Fetch {
        query: String,
        #[source]
        source: FetchError,
    },
    #[error("fetch worker stopped unexpectedly")]
    Worker(#[from] JoinError),
    #[error("interrupted")]
    Interrupted,
}

/// Fetches every query concurrently, one task per query.
///
/// The first failure observed in completion order wins: remaining workers are
/// cancelled through a child of `cancel` and their results discarded. A
/// failure reporting cancellation can only come from `cancel` itself firing,
/// which surfaces as [`DispatchError::Interrupted`].
///
/// Results are folded in input order after every worker finished, so when two
/// queries share a name the later one in `queries` owns the entry.
pub(crate) async fn dispatch(
    fetcher: &QueryFetcher,
    queries: &[Query],
    cancel: &CancellationToken,
) -> Result<ResultSet, DispatchError> {
    tracing::info!(queries = queries.len(), "dispatching queries");
    let workers_cancel = cancel.child_token();
    let mut workers = JoinSet::new();
    for (index, query) in queries.iter().cloned().enumerate() {
        let fetcher = fetcher.clone();
        let cancel = workers_cancel.clone();
        workers.spawn(async move { (index, fetcher.fetch(query, &cancel).await) });
    }

    let mut fetched: Vec<Option<Vec<Issue>>> = vec![None; queries.len()];
    while let Some(joined) = workers.join_next().await {
        let (index, outcome) = match joined {
            Ok(done) => done,
            Err(err) => {
                workers_cancel.cancel();
                return Err(DispatchError::Worker(err));
            }
        };
        tracing::debug!(query = %outcome.query().name, "worker finished");
        match outcome {
            FetchOutcome::Success { issues, .. } => fetched[index] = Some(issues),
            FetchOutcome::Failure { query, error } => {
                workers_cancel.cancel();
                let outstanding = workers.len();
                workers.abort_all();
                if error.is_cancelled() {
                    tracing::warn!(query = %query.name, outstanding, "dispatch interrupted");
                    return Err(DispatchError::Interrupted);
                }
                tracing::warn!(
                    query = %query.name,
                    error = %error,
                    outstanding,
                    "query failed, cancelling remaining fetches"
                );
                return Err(DispatchError::Fetch {
                    query: query.name,
                    source: error,
                });
            }
        }
    }

    let mut results = ResultSet::default();
    for (query, issues) in queries.iter().zip(fetched) {
        let issues = issues.unwrap_or_default();
        if results.insert(query.name.clone(), issues).is_some() {
            tracing::warn!(
                query = %query.name,
                "duplicate query name, keeping the later query's issues"
            );
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::test_support::{issue, Canned, StubSource};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn fetcher_for(source: Arc<StubSource>) -> QueryFetcher {
        QueryFetcher::new(source)
    }

    #[tokio::test]
    async fn collects_one_entry_per_query() {
        let source = Arc::new(
            StubSource::default()
                .answer(
                    "assignee=me",
                    Duration::from_millis(30),
                    Canned::Issues(vec![issue("A-1", "Fix bug", "Al", &["bug"])]),
                )
                .answer("order by updated", Duration::ZERO, Canned::Issues(vec![]))
                .answer(
                    "project = B",
                    Duration::from_millis(10),
                    Canned::Issues(vec![
                        issue("B-2", "two", "Bo", &[]),
                        issue("B-1", "one", "", &[]),
                    ]),
                ),
        );
        let queries = vec![
            Query::new("Mine", "assignee=me"),
            Query::new("Recent", "order by updated"),
            Query::new("Project B", "project = B"),
        ];
        let results = dispatch(&fetcher_for(source), &queries, &CancellationToken::new())
            .await
            .expect("dispatch");
        assert_eq!(results.len(), 3);
        assert_eq!(results.get("Mine").unwrap()[0].key, "A-1");
        assert!(results.get("Recent").unwrap().is_empty());
        let keys: Vec<_> = results
            .get("Project B")
            .unwrap()
            .iter()
            .map(|issue| issue.key.as_str())
            .collect();
        assert_eq!(keys, vec!["B-2", "B-1"]);
    }

    #[tokio::test]
    async fn runs_fetches_concurrently() {
        let mut source = StubSource::default();
        let mut queries = Vec::new();
        for idx in 0..5 {
            let jql = format!("project = P{idx}");
            source = source.answer(&jql, Duration::from_millis(200), Canned::Issues(vec![]));
            queries.push(Query::new(format!("P{idx}"), jql));
        }
        let started = Instant::now();
        let results = dispatch(
            &fetcher_for(Arc::new(source)),
            &queries,
            &CancellationToken::new(),
        )
        .await
        .expect("dispatch");
        assert_eq!(results.len(), 5);
        assert!(started.elapsed() < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn first_failure_aborts_batch_and_cancels_siblings() {
        let source = Arc::new(
            StubSource::default()
                .answer(
                    "order by updated",
                    Duration::from_secs(10),
                    Canned::Issues(vec![issue("A-1", "slow", "Al", &[])]),
                )
                .answer("assignee=me", Duration::from_millis(20), Canned::Api(429, "rate limited")),
        );
        let queries = vec![
            Query::new("Recent", "order by updated"),
            Query::new("Mine", "assignee=me"),
        ];
        let started = Instant::now();
        let err = dispatch(
            &fetcher_for(Arc::clone(&source)),
            &queries,
            &CancellationToken::new(),
        )
        .await
        .expect_err("dispatch must fail");
        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            DispatchError::Fetch { query, source } => {
                assert_eq!(query, "Mine");
                match source {
                    FetchError::Api { status, message } => {
                        assert_eq!(status, 429);
                        assert_eq!(message, "rate limited");
                    }
                    other => panic!("unexpected fetch error: {other:?}"),
                }
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn caller_cancellation_reports_interrupted() {
        let source = Arc::new(StubSource::default().answer(
            "order by updated",
            Duration::from_secs(10),
            Canned::Issues(vec![]),
        ));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let queries = vec![Query::new("Recent", "order by updated")];
        let err = dispatch(&fetcher_for(Arc::clone(&source)), &queries, &cancel)
            .await
            .expect_err("interrupted");
        assert!(matches!(err, DispatchError::Interrupted));
        assert_eq!(
            source.cancelled.lock().unwrap().as_slice(),
            ["order by updated".to_string()]
        );
    }

    #[tokio::test]
    async fn duplicate_names_keep_later_query_regardless_of_completion_order() {
        let source = Arc::new(
            StubSource::default()
                .answer(
                    "first",
                    Duration::from_millis(50),
                    Canned::Issues(vec![issue("F-1", "first", "", &[])]),
                )
                .answer(
                    "second",
                    Duration::ZERO,
                    Canned::Issues(vec![issue("S-1", "second", "", &[])]),
                ),
        );
        let queries = vec![Query::new("X", "first"), Query::new("X", "second")];
        let results = dispatch(&fetcher_for(source), &queries, &CancellationToken::new())
            .await
            .expect("dispatch");
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("X").unwrap()[0].key, "S-1");
    }

    #[tokio::test]
    async fn empty_query_set_yields_empty_results() {
        let source = Arc::new(StubSource::default());
        let results = dispatch(&fetcher_for(Arc::clone(&source)), &[], &CancellationToken::new())
            .await
            .expect("dispatch");
        assert_eq!(results.len(), 0);
        assert!(source.calls.lock().unwrap().is_empty());
    }
}
