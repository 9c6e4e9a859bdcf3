//! Saved filter models returned by the favourite-filter endpoint.

use serde::Deserialize;

use super::named_entity::deserialize_string_field;

/// Represents a saved filter the configured user marked as favourite: its display name and JQL clause.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub jql: String,
}
