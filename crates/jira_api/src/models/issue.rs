use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::models::{NamedEntity, User, WorklogPage};

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub worklog: Option<WorklogPage>,
    /// Custom fields keyed by id, e.g. `customfield_10002`.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl IssueFields {
    /// Returns the label of the first organization stored in `field_id`.
    ///
    /// Service Desk stores organizations as an array of objects; a single
    /// object or plain string is accepted as well.
    pub fn first_organization(&self, field_id: &str) -> Option<String> {
        let value = self.extra.get(field_id)?;
        let first = match value {
            Value::Array(items) => items.first()?,
            other => other,
        };
        match first {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Value::Object(_) => serde_json::from_value::<NamedEntity>(first.clone())
                .ok()
                .and_then(|entity| entity.label().map(str::to_string)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Issue;
    use serde_json::json;

    const ORG_FIELD: &str = "customfield_10002";

    #[test]
    fn decodes_search_issue_with_worklogs_and_organizations() {
        let issue: Issue = serde_json::from_value(json!({
            "key": "SD-1",
            "fields": {
                "created": "2019-03-04T10:11:12.000+0800",
                "updated": "2019-03-05T08:00:00.000+0800",
                "assignee": {"name": "jdoe", "displayName": "Jane Doe"},
                "worklog": {
                    "startAt": 0,
                    "maxResults": 20,
                    "total": 1,
                    "worklogs": [
                        {"id": "10", "author": {"name": "jdoe", "displayName": "Jane Doe"}, "timeSpentSeconds": 3600}
                    ]
                },
                "customfield_10002": [{"id": 3, "name": "Acme"}, {"id": 4, "name": "Other"}]
            }
        }))
        .expect("decode issue");

        assert_eq!(issue.key, "SD-1");
        assert_eq!(issue.fields.first_organization(ORG_FIELD).as_deref(), Some("Acme"));
        let worklogs = issue.fields.worklog.expect("worklog").worklogs;
        assert_eq!(worklogs.len(), 1);
        assert_eq!(worklogs[0].time_spent_seconds, 3600);
    }

    #[test]
    fn missing_fields_decode_to_empty_defaults() {
        let issue: Issue = serde_json::from_value(json!({
            "key": "SD-2",
            "fields": {"assignee": null, "customfield_10002": []}
        }))
        .expect("decode issue");

        assert!(issue.fields.assignee.is_none());
        assert!(issue.fields.worklog.is_none());
        assert_eq!(issue.fields.first_organization(ORG_FIELD), None);
        assert_eq!(issue.fields.first_organization("customfield_99999"), None);
    }

    #[test]
    fn organization_accepts_plain_string_values() {
        let issue: Issue = serde_json::from_value(json!({
            "key": "SD-3",
            "fields": {"customfield_10002": "Globex"}
        }))
        .expect("decode issue");
        assert_eq!(issue.fields.first_organization(ORG_FIELD).as_deref(), Some("Globex"));
    }
}
