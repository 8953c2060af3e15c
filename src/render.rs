use std::fmt::Write;

use crate::model::issue::CanonicalIssue;

/// Render an issue as a Markdown document ready for development work.
pub fn render_issue(issue: &CanonicalIssue) -> String {
    let description = if issue.description_text.is_empty() {
        "_No description provided._"
    } else {
        issue.description_text.as_str()
    };

    let mut out = format!(
        r#"# {key}: {summary}

| Field | Value |
|-------|-------|
| Type | {issue_type} |
| Status | {status} |
| Priority | {priority} |
| Assignee | {assignee} |
| Reporter | {reporter} |
| Project | {project} |
| Created | {created} |
| Updated | {updated} |
| Link | [{key}]({url}) |

**Labels**: {labels}
**Components**: {components}

## Description

{description}

## Acceptance Criteria

{acceptance}

## Dev Notes

{dev_notes}
"#,
        key = issue.key,
        summary = issue.summary,
        issue_type = table_cell(&issue.issue_type),
        status = table_cell(&issue.status),
        priority = table_cell(&issue.priority),
        assignee = table_cell(&issue.assignee),
        reporter = table_cell(&issue.reporter),
        project = table_cell(&issue.project_key),
        created = issue.created_at,
        updated = issue.updated_at,
        url = issue.url,
        labels = list_or_none(&issue.labels),
        components = list_or_none(&issue.components),
        description = description,
        acceptance = placeholder(&issue.acceptance_criteria),
        dev_notes = placeholder(&issue.dev_notes),
    );

    if !issue.links.is_empty() {
        out.push_str("\n## Related Issues\n\n");
        for link in &issue.links {
            let _ = writeln!(out, "- {link}");
        }
    }

    out
}

fn table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() {
        "_TBD_"
    } else {
        value
    }
}
