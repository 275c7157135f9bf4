use serde::{Deserialize, Serialize};

pub mod config;

/// Name given to the query built from `--query`.
pub const AD_HOC_QUERY_NAME: &str = "Command Line Query";

/// A named JQL search. Names are expected to be unique within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Jql")]
    pub jql: String,
}

impl Query {
    pub fn new(name: impl Into<String>, jql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jql: jql.into(),
        }
    }

    pub fn ad_hoc(jql: impl Into<String>) -> Self {
        Self::new(AD_HOC_QUERY_NAME, jql)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// A single issue as returned by the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

impl Issue {
    pub fn new(
        key: impl Into<String>,
        summary: impl Into<String>,
        assignee: impl Into<String>,
        labels: Vec<String>,
    ) -> Self {
        let assignee = assignee.into();
        Self {
            id: String::new(),
            key: key.into(),
            fields: IssueFields {
                summary: summary.into(),
                assignee: if assignee.is_empty() {
                    None
                } else {
                    Some(Assignee {
                        display_name: assignee,
                        email_address: None,
                    })
                },
                labels,
            },
        }
    }

    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// Unassigned issues report an empty name.
    pub fn assignee_display_name(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map(|assignee| assignee.display_name.as_str())
            .unwrap_or("")
    }

    pub fn labels(&self) -> &[String] {
        &self.fields.labels
    }
}

/// Envelope of `GET rest/api/2/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResults {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<Issue>,
}
