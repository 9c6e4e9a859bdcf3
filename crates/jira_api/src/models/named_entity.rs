use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

/// Represents an option-like custom field value, e.g. one entry of the Service Desk organizations field.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntity {
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub value: Option<String>,
}

impl NamedEntity {
    /// Returns the human label, preferring `name` over `value`.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.value.as_deref())
    }
}

/// Accepts strings, numbers and booleans for id-like fields; blank strings read as absent.
pub(crate) fn deserialize_string_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|val| match val {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => None,
        other => serde_json::to_string(&other).ok(),
    }))
}

#[cfg(test)]
mod tests {
    use super::NamedEntity;
    use serde_json::json;

    #[test]
    fn numeric_id_and_padded_name_are_normalized() {
        let entity: NamedEntity =
            serde_json::from_value(json!({"id": 17, "name": "  Acme  "})).expect("decode");
        assert_eq!(entity.id.as_deref(), Some("17"));
        assert_eq!(entity.label(), Some("Acme"));
    }

    #[test]
    fn label_falls_back_to_value_and_blank_is_absent() {
        let entity: NamedEntity =
            serde_json::from_value(json!({"name": " ", "value": "Gold"})).expect("decode");
        assert_eq!(entity.name, None);
        assert_eq!(entity.label(), Some("Gold"));
    }
}
