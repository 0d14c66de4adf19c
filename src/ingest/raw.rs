// src/ingest/raw.rs
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

/// One unvalidated record as handed over by a provider.
///
/// Every accessor tolerates missing keys, `null` and wrong types by
/// returning the caller's default.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(anyhow!("raw record is not an object: {}", kind_of(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// String field, or `None` when missing, non-string or empty.
    pub fn opt_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_is_rejected() {
        assert!(RawRecord::from_value(json!("titanic")).is_err());
        assert!(RawRecord::from_value(json!([1, 2])).is_err());
        assert!(RawRecord::from_value(json!({})).is_ok());
    }

    #[test]
    fn accessors_fall_back_on_wrong_shape() {
        let r = RawRecord::from_value(json!({
            "title": 42,
            "ref": null,
            "reward": "$1,000",
            "deadline": ""
        }))
        .unwrap();

        assert_eq!(r.str_or("title", "Untitled"), "Untitled");
        assert_eq!(r.str_or("ref", ""), "");
        assert_eq!(r.str_or("missing", "x"), "x");
        assert_eq!(r.str_or("reward", ""), "$1,000");
        assert_eq!(r.opt_str("deadline"), None);
        assert_eq!(r.opt_str("title"), None);
        assert!(r.get("ref").is_none());
    }
}
