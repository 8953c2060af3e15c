pub mod jira;

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;

/// Fields requested from Jira unless the caller asks for something else.
pub const DEFAULT_FIELDS: &[&str] = &[
    "summary",
    "description",
    "status",
    "priority",
    "assignee",
    "reporter",
    "labels",
    "components",
    "fixVersions",
    "created",
    "updated",
    "issuetype",
    "parent",
    "subtasks",
    "issuelinks",
    "project",
];

/// One page of a JQL search.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub issues: Vec<Value>,
    /// Total number of matches, when the service reports it.
    pub total: Option<usize>,
}

/// Somewhere raw issue JSON can be read from.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Base URL used to build browse links for issues from this source.
    fn base_url(&self) -> &str;

    /// Read one issue. An empty `fields` list means "all fields".
    async fn fetch_one(&self, key: &str, fields: &[&str]) -> Result<Value>;

    /// Read one page of search results starting at `offset`.
    async fn search_page(
        &self,
        jql: &str,
        fields: &[&str],
        page_size: usize,
        offset: usize,
    ) -> Result<SearchPage>;

    /// Read every match of `jql`, page by page, stopping at `limit` if set.
    ///
    /// Ends on an empty page, at `limit`, or at the reported total. A short
    /// page does not end it: Jira caps page size on its side. If the service
    /// answers a continuation request with issues already received it does
    /// not honor `startAt`; the search then stops with what it has.
    async fn search_all(
        &self,
        jql: &str,
        fields: &[&str],
        page_size: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        let page_size = page_size.max(1);
        let mut issues: Vec<Value> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        loop {
            let request_size = match limit {
                Some(limit) => {
                    let remaining = limit.saturating_sub(issues.len());
                    if remaining == 0 {
                        break;
                    }
                    page_size.min(remaining)
                }
                None => page_size,
            };

            let offset = issues.len();
            let page = self.search_page(jql, fields, request_size, offset).await?;
            if page.issues.is_empty() {
                break;
            }

            let repeated = page
                .issues
                .first()
                .and_then(|issue| issue.get("key"))
                .and_then(Value::as_str)
                .is_some_and(|key| seen.contains(key));
            if repeated {
                warn!(
                    offset,
                    fetched = issues.len(),
                    "Search did not advance past startAt; results may be truncated"
                );
                break;
            }

            for issue in page.issues {
                if let Some(key) = issue.get("key").and_then(Value::as_str) {
                    seen.insert(key.to_string());
                }
                issues.push(issue);
            }
            debug!(fetched = issues.len(), total = ?page.total, "Fetched search page");

            if page.total.is_some_and(|total| issues.len() >= total) {
                break;
            }
        }

        if let Some(limit) = limit {
            issues.truncate(limit);
        }
        Ok(issues)
    }
}
