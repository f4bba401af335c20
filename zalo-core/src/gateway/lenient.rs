//! Tolerant field decoders for gateway JSON.
//!
//! The gateway forwards values straight from the remote network, so numbers
//! arrive as strings, ids arrive as numbers and fields go missing. Absent or
//! unusable values decode to the zero value.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f as i64))
                .unwrap_or_default()
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

pub fn value_to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        _ => false,
    }
}

/// First non-empty string among `keys` of a JSON object.
pub fn pick_string(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .map(value_to_string)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

pub fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_string).unwrap_or_default())
}

pub fn de_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_i64).unwrap_or_default())
}

pub fn de_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = de_i64(deserializer)?;
    Ok(u32::try_from(n).unwrap_or_default())
}

pub fn de_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_bool).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "de_string")]
        id: String,
        #[serde(default, deserialize_with = "de_i64")]
        ts: i64,
        #[serde(default, deserialize_with = "de_u32")]
        width: u32,
        #[serde(default, deserialize_with = "de_bool")]
        flag: bool,
    }

    #[test]
    fn test_numbers_as_strings() {
        let s: Sample =
            serde_json::from_value(json!({"id": 42, "ts": "1700000000000", "width": "640", "flag": 1}))
                .unwrap();
        assert_eq!(s.id, "42");
        assert_eq!(s.ts, 1_700_000_000_000);
        assert_eq!(s.width, 640);
        assert!(s.flag);
    }

    #[test]
    fn test_missing_and_null_fields() {
        let s: Sample = serde_json::from_value(json!({"id": null, "width": -3})).unwrap();
        assert_eq!(s.id, "");
        assert_eq!(s.ts, 0);
        assert_eq!(s.width, 0);
        assert!(!s.flag);
    }

    #[test]
    fn test_pick_string() {
        let v = json!({"userId": "", "uid": 77, "id": "x"});
        assert_eq!(pick_string(&v, &["userId", "uid", "id"]), "77");
        assert_eq!(pick_string(&v, &["missing"]), "");
    }
}
