use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored credentials for one account, keyed by normalized email in [`UserTable`].
///
/// Kept as the raw JSON value from disk so hand-edited or foreign fields survive
/// a save untouched; the known fields are read leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Value);

impl UserRecord {
    pub fn new(password_hash: String, created_at: String) -> Self {
        let mut fields = Map::new();
        fields.insert("password_hash".into(), Value::String(password_hash));
        fields.insert("created_at".into(), Value::String(created_at));
        Self(Value::Object(fields))
    }

    /// Argon2 PHC string, if the record has one.
    pub fn password_hash(&self) -> Option<&str> {
        self.0.get("password_hash").and_then(Value::as_str)
    }

    /// RFC 3339 creation time, if present and a string.
    pub fn created_at(&self) -> Option<&str> {
        self.0.get("created_at").and_then(Value::as_str)
    }
}

/// Whole contents of the users file: normalized email -> record.
pub type UserTable = HashMap<String, UserRecord>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_known_fields() {
        let record = UserRecord::new("$argon2id$h".into(), "2024-01-01T00:00:00Z".into());
        assert_eq!(record.password_hash(), Some("$argon2id$h"));
        assert_eq!(record.created_at(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn odd_shapes_read_as_absent() {
        let numeric: UserRecord =
            serde_json::from_value(json!({ "password_hash": 7, "created_at": 1700000000 }))
                .unwrap();
        assert_eq!(numeric.password_hash(), None);
        assert_eq!(numeric.created_at(), None);

        let scalar: UserRecord = serde_json::from_value(json!("just a string")).unwrap();
        assert_eq!(scalar.password_hash(), None);
    }

    #[test]
    fn extra_fields_are_written_back() {
        let raw = json!({ "password_hash": "h", "created_at": "t", "display_name": "Ada" });
        let record: UserRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }
}
