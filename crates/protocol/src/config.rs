use crate::Query;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const API_TOKEN_URL: &str = "https://id.atlassian.com/manage/api-tokens";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QjConfig {
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "ApiKey")]
    pub api_key: String,
    #[serde(default, alias = "BaseUrl")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "Timeout")]
    pub timeout: Option<String>,
    #[serde(default, alias = "Queries")]
    pub queries: Vec<Query>,
}

impl QjConfig {
    /// Written to disk the first time `qj` runs without a config file.
    pub fn example() -> Self {
        Self {
            email: String::new(),
            api_key: String::new(),
            base_url: String::new(),
            timeout: None,
            queries: vec![
                Query::new("Assigned to me", "assignee = currentUser()"),
                Query::new("Recently updated", "order by updated"),
            ],
        }
    }

    pub fn request_timeout(&self) -> Result<Duration, String> {
        match self.timeout.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_REQUEST_TIMEOUT),
            Some(raw) => humantime::parse_duration(raw)
                .map_err(|err| format!("invalid timeout {raw:?}: {err}")),
        }
    }

    /// Returns every problem found, in a stable order. Empty means valid.
    pub fn problems(&self) -> Vec<String> {
        let mut msgs = Vec::new();
        if self.api_key.trim().is_empty() {
            msgs.push(format!(
                "no API key was provided, you can create one here {API_TOKEN_URL}"
            ));
        }
        if self.email.trim().is_empty() {
            msgs.push("no email was provided".to_string());
        }
        if self.base_url.trim().is_empty() {
            msgs.push("no base URL was provided".to_string());
        }
        if let Err(err) = self.request_timeout() {
            msgs.push(err);
        }

        let mut seen = HashSet::new();
        for (index, query) in self.queries.iter().enumerate() {
            let name = query.name.trim();
            let label = if name.is_empty() {
                format!("query[{index}]")
            } else {
                format!("query {name}")
            };
            if name.is_empty() {
                msgs.push(format!("{label} has no name"));
            }
            if query.jql.trim().is_empty() {
                msgs.push(format!("{label} has no jql"));
            }
            if !name.is_empty() && !seen.insert(name.to_string()) {
                msgs.push(format!("duplicate query name: {name}"));
            }
        }
        msgs
    }
}
