//! Map raw Jira issue JSON onto [`CanonicalIssue`].
//!
//! Every default lives in this module. Nothing here performs I/O.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::issue::CanonicalIssue;
use crate::model::raw::{self, IssueLink, NamedField, Person, RawIssue};
use crate::util::adf::description_text;

pub const UNKNOWN_PROJECT: &str = "UNKNOWN";
pub const DEFAULT_TYPE: &str = "Task";
pub const DEFAULT_SUMMARY: &str = "No Summary";
pub const DEFAULT_STATUS: &str = "Unknown";
pub const DEFAULT_PRIORITY: &str = "None";
pub const UNASSIGNED: &str = "Unassigned";
pub const UNKNOWN_REPORTER: &str = "Unknown";
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize one raw issue. `base_url` is used for browse links.
pub fn normalize(value: &Value, base_url: &str) -> Result<CanonicalIssue> {
    let raw: RawIssue = serde_json::from_value(value.clone())
        .map_err(|e| Error::malformed(raw::issue_key(value), e.to_string()))?;

    let key = raw
        .key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| Error::malformed("UNKNOWN", "issue has no key"))?;
    let fields = raw.fields.unwrap_or_default();
    let base_url = base_url.trim_end_matches('/');

    let project_key = fields
        .project
        .and_then(|p| p.key)
        .or_else(|| key.split_once('-').map(|(prefix, _)| prefix.to_string()))
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string());

    Ok(CanonicalIssue {
        url: browse_url(base_url, &key),
        project_key,
        issue_type: name_or(fields.issuetype, DEFAULT_TYPE),
        summary: fields.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        status: name_or(fields.status, DEFAULT_STATUS),
        priority: name_or(fields.priority, DEFAULT_PRIORITY),
        assignee: person_or(fields.assignee, UNASSIGNED),
        reporter: person_or(fields.reporter, UNKNOWN_REPORTER),
        labels: fields.labels.unwrap_or_default(),
        components: fields
            .components
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.name.filter(|n| !n.is_empty()))
            .collect(),
        created_at: format_timestamp(fields.created.as_deref()),
        updated_at: format_timestamp(fields.updated.as_deref()),
        description_text: description_text(fields.description.as_ref()),
        acceptance_criteria: String::new(),
        dev_notes: String::new(),
        links: related_links(fields.issuelinks.as_deref().unwrap_or_default(), base_url),
        key,
    })
}

fn browse_url(base_url: &str, key: &str) -> String {
    format!("{base_url}/browse/{key}")
}

fn name_or(field: Option<NamedField>, default: &str) -> String {
    field
        .and_then(|f| f.name)
        .unwrap_or_else(|| default.to_string())
}

/// Display name, then email address, then `default`.
fn person_or(person: Option<Person>, default: &str) -> String {
    person
        .and_then(|p| {
            p.display_name
                .filter(|n| !n.trim().is_empty())
                .or(p.email_address.filter(|e| !e.trim().is_empty()))
        })
        .unwrap_or_else(|| default.to_string())
}

/// Reformat an ISO-8601 timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// The wall-clock time of the input is kept; no zone conversion happens.
/// Unparseable input comes back unchanged.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return UNKNOWN_TIMESTAMP.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(TIMESTAMP_FORMAT).to_string();
    }
    // Jira's own format: 2025-12-01T10:00:00.000+0000
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return dt.format(TIMESTAMP_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(TIMESTAMP_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return dt.format(TIMESTAMP_FORMAT).to_string();
        }
    }
    raw.to_string()
}

/// Browse URLs of linked issues, inward before outward within each link.
fn related_links(links: &[IssueLink], base_url: &str) -> Vec<String> {
    links
        .iter()
        .flat_map(|link| [link.inward_issue.as_ref(), link.outward_issue.as_ref()])
        .flatten()
        .filter_map(|issue| issue.key.as_deref())
        .filter(|key| !key.is_empty())
        .map(|key| browse_url(base_url, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://example.atlassian.net";

    #[test]
    fn minimal_payload_gets_every_default() {
        let issue = normalize(&json!({"key": "UEP-7", "fields": {}}), BASE).unwrap();
        assert_eq!(issue.key, "UEP-7");
        assert_eq!(issue.url, "https://example.atlassian.net/browse/UEP-7");
        assert_eq!(issue.project_key, "UEP");
        assert_eq!(issue.issue_type, "Task");
        assert_eq!(issue.summary, "No Summary");
        assert_eq!(issue.status, "Unknown");
        assert_eq!(issue.priority, "None");
        assert_eq!(issue.assignee, "Unassigned");
        assert_eq!(issue.reporter, "Unknown");
        assert!(issue.labels.is_empty());
        assert!(issue.components.is_empty());
        assert_eq!(issue.created_at, "Unknown");
        assert_eq!(issue.updated_at, "Unknown");
        assert_eq!(issue.description_text, "");
        assert_eq!(issue.acceptance_criteria, "");
        assert_eq!(issue.dev_notes, "");
        assert!(issue.links.is_empty());
    }

    #[test]
    fn missing_fields_object_is_tolerated() {
        let issue = normalize(&json!({"key": "OPS-1"}), BASE).unwrap();
        assert_eq!(issue.project_key, "OPS");
        let issue = normalize(&json!({"key": "OPS-2", "fields": null}), BASE).unwrap();
        assert_eq!(issue.summary, "No Summary");
    }

    #[test]
    fn full_payload() {
        let payload = json!({
            "key": "UEP-123",
            "fields": {
                "summary": "Implement user authentication",
                "project": {"key": "UEP", "name": "User Experience Platform"},
                "issuetype": {"name": "Story"},
                "status": {"name": "In Progress"},
                "priority": {"name": "High"},
                "assignee": {"displayName": "John Doe", "emailAddress": "john@example.com"},
                "reporter": {"emailAddress": "jane@example.com"},
                "labels": ["auth", "security"],
                "components": [{"name": "Backend"}, {"id": "10"}, {"name": "API"}],
                "created": "2025-12-01T10:00:00.000+0000",
                "updated": "2025-12-18T14:30:00Z",
                "description": {
                    "type": "doc",
                    "content": [{"type": "paragraph", "content": [
                        {"type": "text", "text": "As a user, I want to log in securely."}
                    ]}]
                },
                "issuelinks": [
                    {"type": {"name": "Blocks"}, "outwardIssue": {"key": "UEP-200"}},
                    {"type": {"name": "Relates"}, "inwardIssue": {"key": "OPS-5"}}
                ]
            }
        });
        let issue = normalize(&payload, "https://example.atlassian.net/").unwrap();
        assert_eq!(issue.url, "https://example.atlassian.net/browse/UEP-123");
        assert_eq!(issue.issue_type, "Story");
        assert_eq!(issue.status, "In Progress");
        assert_eq!(issue.priority, "High");
        assert_eq!(issue.assignee, "John Doe");
        assert_eq!(issue.reporter, "jane@example.com");
        assert_eq!(issue.labels, vec!["auth", "security"]);
        assert_eq!(issue.components, vec!["Backend", "API"]);
        assert_eq!(issue.created_at, "2025-12-01 10:00:00");
        assert_eq!(issue.updated_at, "2025-12-18 14:30:00");
        assert_eq!(issue.description_text, "As a user, I want to log in securely.");
        assert_eq!(
            issue.links,
            vec![
                "https://example.atlassian.net/browse/UEP-200",
                "https://example.atlassian.net/browse/OPS-5",
            ]
        );
    }

    #[test]
    fn summary_with_punctuation_is_kept_verbatim() {
        let payload = json!({
            "key": "UEP-1",
            "fields": {"summary": "Fix Login   Bug!!", "project": {"key": "UEP"}, "status": {"name": "Open"}}
        });
        let issue = normalize(&payload, BASE).unwrap();
        assert_eq!(issue.summary, "Fix Login   Bug!!");
        assert_eq!(issue.status, "Open");
        assert_eq!(issue.project_key, "UEP");
    }

    #[test]
    fn null_people_are_unassigned_and_unknown() {
        let payload = json!({"key": "A-1", "fields": {"assignee": null, "reporter": null}});
        let issue = normalize(&payload, BASE).unwrap();
        assert_eq!(issue.assignee, "Unassigned");
        assert_eq!(issue.reporter, "Unknown");
    }

    #[test]
    fn person_without_name_or_email_falls_back_to_default() {
        let payload = json!({
            "key": "A-1",
            "fields": {
                "assignee": {"accountId": "557058:abc"},
                "reporter": {"displayName": "", "emailAddress": ""}
            }
        });
        let issue = normalize(&payload, BASE).unwrap();
        assert_eq!(issue.assignee, "Unassigned");
        assert_eq!(issue.reporter, "Unknown");
    }

    #[test]
    fn empty_display_name_uses_email() {
        let payload = json!({
            "key": "A-1",
            "fields": {"assignee": {"displayName": " ", "emailAddress": "dev@example.com"}}
        });
        assert_eq!(normalize(&payload, BASE).unwrap().assignee, "dev@example.com");
    }

    #[test]
    fn project_object_wins_over_key_prefix() {
        let payload = json!({"key": "OLD-3", "fields": {"project": {"key": "NEW"}}});
        assert_eq!(normalize(&payload, BASE).unwrap().project_key, "NEW");
    }

    #[test]
    fn key_without_hyphen_has_unknown_project() {
        let issue = normalize(&json!({"key": "ORPHAN", "fields": {}}), BASE).unwrap();
        assert_eq!(issue.project_key, "UNKNOWN");
    }

    #[test]
    fn string_description_passes_through() {
        let payload = json!({"key": "A-1", "fields": {"description": "plain text body"}});
        assert_eq!(normalize(&payload, BASE).unwrap().description_text, "plain text body");
    }

    #[test]
    fn link_object_can_contribute_both_directions() {
        let payload = json!({
            "key": "A-1",
            "fields": {"issuelinks": [
                {"inwardIssue": {"key": "B-1"}, "outwardIssue": {"key": "C-1"}},
                {"outwardIssue": {"id": "1"}},
                {"inwardIssue": {"key": "B-1"}}
            ]}
        });
        let links = normalize(&payload, BASE).unwrap().links;
        assert_eq!(
            links,
            vec![
                format!("{BASE}/browse/B-1"),
                format!("{BASE}/browse/C-1"),
                format!("{BASE}/browse/B-1"),
            ]
        );
    }

    #[test]
    fn missing_key_is_malformed() {
        let err = normalize(&json!({"fields": {"summary": "x"}}), BASE).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
        let err = normalize(&json!({"key": "", "fields": {}}), BASE).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn wrongly_typed_field_is_malformed_and_names_the_issue() {
        let err = normalize(&json!({"key": "UEP-9", "fields": {"labels": 5}}), BASE).unwrap_err();
        match err {
            Error::MalformedInput { key, .. } => assert_eq!(key, "UEP-9"),
            other => panic!("expected malformed input, got {other:?}"),
        }
        assert!(normalize(&json!("UEP-9"), BASE).is_err());
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(None), "Unknown");
        assert_eq!(format_timestamp(Some("")), "Unknown");
        assert_eq!(format_timestamp(Some("2025-12-18T14:30:00Z")), "2025-12-18 14:30:00");
        assert_eq!(
            format_timestamp(Some("2025-12-18T14:30:00.123+02:00")),
            "2025-12-18 14:30:00"
        );
        assert_eq!(
            format_timestamp(Some("2024-03-05T08:09:10.000-0700")),
            "2024-03-05 08:09:10"
        );
        assert_eq!(format_timestamp(Some("2024-03-05T08:09:10")), "2024-03-05 08:09:10");
        assert_eq!(format_timestamp(Some("2024-03-05")), "2024-03-05 00:00:00");
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
    }

    #[test]
    fn normalize_is_deterministic() {
        let payload = json!({"key": "A-1", "fields": {"summary": "same"}});
        assert_eq!(normalize(&payload, BASE).unwrap(), normalize(&payload, BASE).unwrap());
    }
}
