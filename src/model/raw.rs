//! Wire shapes of a Jira issue as returned by the REST API v3.
//!
//! Jira omits or nulls most fields depending on the project scheme and the
//! requested projection, so everything here is optional. Unknown fields are
//! ignored.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub key: Option<String>,
    pub fields: Option<IssueFields>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueFields {
    pub summary: Option<String>,
    /// Plain string on older instances, an ADF document on Cloud.
    pub description: Option<Value>,
    pub status: Option<NamedField>,
    pub priority: Option<NamedField>,
    pub issuetype: Option<NamedField>,
    pub project: Option<ProjectField>,
    pub assignee: Option<Person>,
    pub reporter: Option<Person>,
    pub labels: Option<Vec<String>>,
    pub components: Option<Vec<NamedField>>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub issuelinks: Option<Vec<IssueLink>>,
}

/// Status, priority, issue type and component objects all carry a `name`.
#[derive(Debug, Deserialize)]
pub struct NamedField {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectField {
    pub key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Person {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueLink {
    #[serde(rename = "inwardIssue")]
    pub inward_issue: Option<LinkedIssue>,
    #[serde(rename = "outwardIssue")]
    pub outward_issue: Option<LinkedIssue>,
}

#[derive(Debug, Deserialize)]
pub struct LinkedIssue {
    pub key: Option<String>,
}

/// Best-effort key of an untyped payload, for labelling failures.
pub fn issue_key(value: &Value) -> String {
    value
        .get("key")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
        .unwrap_or("UNKNOWN")
        .to_string()
}
