use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{IssueSource, SearchPage};
use crate::error::{Error, Result};

/// Jira Cloud REST API v3 client authenticated with an email + API token.
pub struct JiraClient {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraClient {
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Self {
        let creds = format!("{email}:{api_token}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {encoded}"),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    jql: &'a str,
    #[serde(rename = "maxResults")]
    max_results: usize,
    #[serde(rename = "startAt", skip_serializing_if = "Option::is_none")]
    start_at: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [&'a str]>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Value>,
    total: Option<usize>,
}

/// Turn a non-success response into [`Error::Remote`] with its body.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl IssueSource for JiraClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_one(&self, key: &str, fields: &[&str]) -> Result<Value> {
        let url = format!(
            "{}/rest/api/3/issue/{}",
            self.base_url,
            urlencoding::encode(key)
        );
        debug!(key, "Fetching issue");

        let mut req = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json");
        if !fields.is_empty() {
            req = req.query(&[("fields", fields.join(","))]);
        }

        let resp = check_status(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn search_page(
        &self,
        jql: &str,
        fields: &[&str],
        page_size: usize,
        offset: usize,
    ) -> Result<SearchPage> {
        let url = format!("{}/rest/api/3/search/jql", self.base_url);
        let body = SearchRequest {
            jql,
            max_results: page_size,
            start_at: (offset > 0).then_some(offset),
            fields: (!fields.is_empty()).then_some(fields),
        };
        debug!(jql, page_size, offset, "Searching issues");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let resp = match check_status(resp).await {
            Ok(resp) => resp,
            Err(e) => {
                if let Error::Remote { status, body } = &e {
                    warn!(status, body = %body, jql, "Jira search failed");
                }
                return Err(e);
            }
        };

        let search: SearchResponse = resp.json().await?;
        Ok(SearchPage {
            issues: search.issues,
            total: search.total,
        })
    }
}
