// Opaque text fields are written as JSON strings. Documents written by other tools sometimes
// carry them as numbers, so a number is accepted on read and kept in its textual form.
pub mod serializer {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use serde_json::Value;

    pub fn serialize<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
        text.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(text),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!("expected string or number, found {}", other))),
        }
    }
}
