use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user record. Identity lives in the store key, never in the record
/// itself, and is assigned by the store at insert time.
///
/// Every field carries a serde default: a field omitted from a create or
/// update body deserializes to the empty string. Updates replace the record
/// wholesale, so an omitted field blanks the stored value rather than keeping
/// it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
}

impl User {
    #[allow(dead_code)]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        biography: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            biography: biography.into(),
        }
    }
}

/// A list item: the store key joined with the record fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
}

impl UserRecord {
    pub fn new(id: Uuid, user: User) -> Self {
        Self {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            biography: user.biography,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_with_camel_case_keys() {
        let user = User::new("Ada", "Lovelace", "math");
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "biography": "math",
            })
        );
    }

    #[test]
    fn omitted_fields_deserialize_to_empty_strings() {
        let user: User = serde_json::from_str(r#"{"firstName":"Ada"}"#).unwrap();

        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "");
        assert_eq!(user.biography, "");
    }

    #[test]
    fn non_string_field_is_rejected() {
        let result = serde_json::from_str::<User>(r#"{"firstName":42}"#);

        assert!(result.is_err());
    }

    #[test]
    fn user_record_serializes_id_as_canonical_uuid_string() {
        let id = Uuid::new_v4();
        let record = UserRecord::new(id, User::new("Ada", "Lovelace", "math"));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], serde_json::json!(id.to_string()));
        assert_eq!(json["firstName"], serde_json::json!("Ada"));
    }
}
