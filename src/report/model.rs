//! Engine-side issue records, decoupled from the tracker wire format.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Label for issues without an organization and for worklogs without an author.
pub const UNKNOWN_LABEL: &str = "Unknown";
/// Label for issues nobody is assigned to.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// A person known to the tracker. Equality, hashing and ordering only look at `id`.
#[derive(Clone, Debug)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Identity whose id and display name are the same sentinel label.
    pub fn sentinel(label: &str) -> Self {
        Self::new(label, label)
    }

    /// True when `needle` names this identity by id or by display name.
    pub fn matches(&self, needle: &str) -> bool {
        self.id == needle || self.display_name == needle
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// One logged time contribution.
#[derive(Clone, Debug, Default)]
pub struct WorklogRecord {
    pub author: Option<Identity>,
    pub time_spent_seconds: u64,
}

impl WorklogRecord {
    pub fn new(author: Option<Identity>, time_spent_seconds: u64) -> Self {
        Self {
            author,
            time_spent_seconds,
        }
    }

    pub fn author_identity(&self) -> Identity {
        self.author
            .clone()
            .unwrap_or_else(|| Identity::sentinel(UNKNOWN_LABEL))
    }
}

/// One tracked work item as the aggregation engine sees it.
#[derive(Clone, Debug, Default)]
pub struct IssueRecord {
    pub key: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub organization: Option<String>,
    pub assignee: Option<Identity>,
    pub worklogs: Vec<WorklogRecord>,
}

impl IssueRecord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_assignee(mut self, assignee: Identity) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub fn with_worklog(mut self, author: Identity, seconds: u64) -> Self {
        self.worklogs.push(WorklogRecord::new(Some(author), seconds));
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn organization_label(&self) -> &str {
        self.organization.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    pub fn assignee_identity(&self) -> Identity {
        self.assignee
            .clone()
            .unwrap_or_else(|| Identity::sentinel(UNASSIGNED_LABEL))
    }

    /// Sum of every worklog entry on the issue, regardless of author.
    pub fn total_seconds_logged(&self) -> u64 {
        self.worklogs
            .iter()
            .fold(0u64, |acc, entry| acc.saturating_add(entry.time_spent_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::{Identity, IssueRecord, WorklogRecord};

    #[test]
    fn identities_compare_by_id_only() {
        let a = Identity::new("jdoe", "Jane Doe");
        let b = Identity::new("jdoe", "J. Doe");
        assert_eq!(a, b);
        assert!(Identity::new("alice", "Zed") < Identity::new("bob", "Adam"));
    }

    #[test]
    fn missing_fields_resolve_to_sentinels() {
        let issue = IssueRecord::new("SD-1");
        assert_eq!(issue.organization_label(), "Unknown");
        assert_eq!(issue.assignee_identity().display_name, "Unassigned");
        assert_eq!(WorklogRecord::new(None, 60).author_identity().id, "Unknown");
        assert_eq!(issue.total_seconds_logged(), 0);
    }

    #[test]
    fn identity_matches_id_or_display_name() {
        let identity = Identity::new("jdoe", "Jane Doe");
        assert!(identity.matches("jdoe"));
        assert!(identity.matches("Jane Doe"));
        assert!(!identity.matches("jane"));
    }
}
