use serde::Deserialize;

use crate::models::User;

/// The worklog container embedded in issue search results.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

impl WorklogPage {
    /// Search results embed one page of worklogs; true when the issue has more.
    pub fn is_truncated(&self) -> bool {
        self.total > self.worklogs.len() as u64
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub time_spent_seconds: u64,
}
