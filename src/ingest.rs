//! Conversion of tracker search results into engine issue records.

use chrono::{DateTime, Utc};
use jira_api::{Issue, User};
use log::warn;

use crate::report::{Identity, IssueRecord, WorklogRecord};

/// Parses tracker timestamps, which come either as RFC 3339 or with a colon-less offset (`+0800`).
fn parse_tracker_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .or_else(|| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z").ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn identity_of(user: &User) -> Option<Identity> {
    let id = user.stable_id()?;
    let display_name = user
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(id);
    Some(Identity::new(id, display_name))
}

pub fn issue_record(issue: &Issue, organization_field: &str) -> IssueRecord {
    let fields = &issue.fields;
    let worklogs = fields
        .worklog
        .as_ref()
        .map(|page| {
            if page.is_truncated() {
                warn!(
                    "Issue {} has {} worklogs but search returned {}; logged time is undercounted",
                    issue.key,
                    page.total,
                    page.worklogs.len()
                );
            }
            page.worklogs
                .iter()
                .map(|worklog| {
                    WorklogRecord::new(
                        worklog.author.as_ref().and_then(identity_of),
                        worklog.time_spent_seconds,
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    IssueRecord {
        key: issue.key.clone(),
        created_at: fields.created.as_deref().and_then(parse_tracker_datetime),
        updated_at: fields.updated.as_deref().and_then(parse_tracker_datetime),
        organization: fields.first_organization(organization_field),
        assignee: fields.assignee.as_ref().and_then(identity_of),
        worklogs,
    }
}

pub fn issue_records(issues: &[Issue], organization_field: &str) -> Vec<IssueRecord> {
    issues
        .iter()
        .map(|issue| issue_record(issue, organization_field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ORG_FIELD: &str = "customfield_10002";

    fn decode(value: serde_json::Value) -> Issue {
        serde_json::from_value(value).expect("decode issue")
    }

    #[test]
    fn converts_issue_with_offsets_worklogs_and_organization() {
        let issue = decode(json!({
            "key": "SD-7",
            "fields": {
                "created": "2024-03-01T23:30:00.000+0800",
                "updated": "2024-03-02T10:00:00+00:00",
                "assignee": {"name": "jdoe", "displayName": "Jane Doe"},
                "worklog": {"worklogs": [
                    {"author": {"accountId": "acc-1", "displayName": "Ann"}, "timeSpentSeconds": 7200},
                    {"timeSpentSeconds": 600}
                ]},
                "customfield_10002": [{"id": 1, "name": "Acme"}]
            }
        }));

        let record = issue_record(&issue, ORG_FIELD);
        assert_eq!(record.key, "SD-7");
        assert_eq!(
            record.created_at.map(|at| at.to_rfc3339()),
            Some("2024-03-01T15:30:00+00:00".to_string())
        );
        assert_eq!(
            record.updated_at.map(|at| at.to_rfc3339()),
            Some("2024-03-02T10:00:00+00:00".to_string())
        );
        assert_eq!(record.organization.as_deref(), Some("Acme"));
        let assignee = record.assignee.as_ref().expect("assignee");
        assert_eq!((assignee.id.as_str(), assignee.display_name.as_str()), ("jdoe", "Jane Doe"));
        assert_eq!(record.worklogs.len(), 2);
        assert_eq!(record.worklogs[0].author.as_ref().map(|a| a.id.as_str()), Some("acc-1"));
        assert!(record.worklogs[1].author.is_none());
        assert_eq!(record.total_seconds_logged(), 7800);
    }

    #[test]
    fn missing_fields_fall_back_to_sentinels() {
        let record = issue_record(&decode(json!({"key": "SD-8", "fields": {"created": "garbage"}})), ORG_FIELD);
        assert!(record.created_at.is_none());
        assert_eq!(record.organization_label(), "Unknown");
        assert_eq!(record.assignee_identity().display_name, "Unassigned");
        assert!(record.worklogs.is_empty());
    }

    #[test]
    fn user_without_display_name_is_named_by_id() {
        let issue = decode(json!({"key": "SD-9", "fields": {"assignee": {"key": "JIRAUSER1"}}}));
        let assignee = issue_record(&issue, ORG_FIELD).assignee.expect("assignee");
        assert_eq!(assignee.display_name, "JIRAUSER1");

        let nameless = decode(json!({"key": "SD-10", "fields": {"assignee": {}}}));
        assert!(issue_record(&nameless, ORG_FIELD).assignee.is_none());
    }

    #[test]
    fn truncated_worklog_page_keeps_returned_entries() {
        let issue = decode(json!({
            "key": "SD-12",
            "fields": {"worklog": {
                "startAt": 0,
                "maxResults": 1,
                "total": 5,
                "worklogs": [{"author": {"name": "jdoe"}, "timeSpentSeconds": 900}]
            }}
        }));
        assert!(issue.fields.worklog.as_ref().is_some_and(|page| page.is_truncated()));

        let record = issue_record(&issue, ORG_FIELD);
        assert_eq!(record.worklogs.len(), 1);
        assert_eq!(record.total_seconds_logged(), 900);
    }

    #[test]
    fn organization_field_is_configurable() {
        let issues = vec![decode(json!({"key": "SD-11", "fields": {"customfield_20000": "Globex"}}))];
        assert_eq!(issue_records(&issues, "customfield_20000")[0].organization.as_deref(), Some("Globex"));
        assert_eq!(issue_records(&issues, ORG_FIELD)[0].organization, None);
    }
}
