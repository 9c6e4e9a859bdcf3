//! User references embedded in issues and worklogs.

use serde::Deserialize;

use super::named_entity::deserialize_string_field;

/// Represents a Jira user reference. Cloud sites identify users by `accountId`, Server/Data Center by `name` and `key`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub display_name: Option<String>,
}

impl User {
    /// Returns the most stable identifier available for this user.
    pub fn stable_id(&self) -> Option<&str> {
        self.account_id
            .as_deref()
            .or(self.name.as_deref())
            .or(self.key.as_deref())
            .or(self.display_name.as_deref())
    }
}
