use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::issue::CanonicalIssue;
use crate::model::raw::issue_key;
use crate::normalizer::normalize;
use crate::providers::{IssueSource, DEFAULT_FIELDS};
use crate::util::keys::extract_issue_keys;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Issues that made it through a batch, plus the ones that did not.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Normalized issues, in query or input order.
    pub issues: Vec<CanonicalIssue>,
    /// Raw issues received from Jira (or keys attempted, for key lists).
    pub fetched: usize,
    pub failures: Vec<(String, Error)>,
}

/// Drives an [`IssueSource`] and the normalizer.
pub struct IssueFetcher {
    source: Box<dyn IssueSource>,
    page_size: usize,
}

impl IssueFetcher {
    pub fn new(source: Box<dyn IssueSource>) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetch and normalize one issue. Any failure is returned as-is.
    pub async fn fetch_single(&self, key: &str) -> Result<CanonicalIssue> {
        let raw = self.source.fetch_one(key, DEFAULT_FIELDS).await?;
        let issue = normalize(&raw, self.source.base_url())?;
        info!(key = %issue.key, summary = %issue.summary, "Fetched issue");
        Ok(issue)
    }

    /// Run a JQL search and normalize every result independently.
    ///
    /// A failed search fails the batch; a result that does not normalize is
    /// recorded and dropped.
    pub async fn fetch_batch(&self, jql: &str, limit: Option<usize>) -> Result<BatchOutcome> {
        let raw_issues = self
            .source
            .search_all(jql, DEFAULT_FIELDS, self.page_size, limit)
            .await?;

        let mut outcome = BatchOutcome {
            fetched: raw_issues.len(),
            ..Default::default()
        };
        for raw in &raw_issues {
            match normalize(raw, self.source.base_url()) {
                Ok(issue) => {
                    info!(key = %issue.key, summary = %issue.summary, "Normalized issue");
                    outcome.issues.push(issue);
                }
                Err(e) => {
                    let key = issue_key(raw);
                    warn!(key = %key, error = %e, "Failed to normalize issue");
                    outcome.failures.push((key, e));
                }
            }
        }

        info!(
            fetched = outcome.fetched,
            normalized = outcome.issues.len(),
            "Batch fetch finished"
        );
        Ok(outcome)
    }

    /// Fetch each key on its own, skipping the ones that fail.
    ///
    /// Repeated keys are fetched once, at their first position.
    pub async fn fetch_keys(&self, keys: &[String]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut seen = std::collections::HashSet::new();
        for key in keys.iter().filter(|k| seen.insert(k.as_str())) {
            outcome.fetched += 1;
            match self.fetch_single(key).await {
                Ok(issue) => outcome.issues.push(issue),
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to fetch issue");
                    outcome.failures.push((key.clone(), e));
                }
            }
        }
        outcome
    }

    /// Fetch every issue key mentioned in `text` (one per line or in prose).
    pub async fn fetch_from_text(&self, text: &str) -> BatchOutcome {
        let keys = extract_issue_keys(text);
        info!(count = keys.len(), "Found issue keys");
        self.fetch_keys(&keys).await
    }
}
