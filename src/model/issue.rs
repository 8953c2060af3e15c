use serde::{Deserialize, Serialize};

/// A Jira issue after normalization: every field populated, no nulls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIssue {
    pub key: String,
    /// Browse link, `{base_url}/browse/{key}`
    pub url: String,
    pub project_key: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub reporter: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub description_text: String,
    #[serde(default)]
    pub acceptance_criteria: String,
    #[serde(default)]
    pub dev_notes: String,
    /// Browse links of related issues, in the order Jira lists them.
    #[serde(default)]
    pub links: Vec<String>,
}
