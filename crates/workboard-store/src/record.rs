//! Record definitions and the normalization applied before persistence.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One of the two persisted arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Tasks,
    Discoveries,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Tasks, Collection::Discoveries];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Discoveries => "discoveries",
        }
    }

    /// File name inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks.json",
            Collection::Discoveries => "discoveries.json",
        }
    }

    /// Key the browser frontend keeps this collection under in localStorage.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Collection::Tasks => "workboard-simple-tasks-v2",
            Collection::Discoveries => "workboard-discoveries-v1",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A persisted task or discovery. Both collections share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// JavaScript-style truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalize one incoming entry.
///
/// Non-object entries and entries whose `text` is explicitly `null` yield
/// `None`. A missing `text` becomes `""`; a missing or falsy `date` becomes
/// `today`. Every other field (`id`, `done`, ...) is dropped.
pub fn normalize_record(value: &Value, today: &str) -> Option<Record> {
    let obj = value.as_object()?;

    let text = match obj.get("text") {
        None => String::new(),
        Some(Value::Null) => return None,
        Some(v) => coerce_to_string(v),
    };

    let date = match obj.get("date") {
        Some(v) if is_truthy(v) => coerce_to_string(v),
        _ => today.to_string(),
    };

    Some(Record { text, date })
}

/// Normalize a whole submitted collection, preserving submission order.
pub fn normalize_records(values: &[Value], today: &str) -> Vec<Record> {
    values
        .iter()
        .filter_map(|v| normalize_record(v, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TODAY: &str = "2026-10-16";

    #[test]
    fn test_strips_extra_fields() {
        let rec = normalize_record(
            &json!({"id": "t-1", "text": "buy milk", "done": true, "date": "2026-10-01"}),
            TODAY,
        )
        .unwrap();
        assert_eq!(
            rec,
            Record {
                text: "buy milk".into(),
                date: "2026-10-01".into()
            }
        );
    }

    #[test]
    fn test_missing_or_falsy_date_defaults_to_today() {
        for date in [json!(null), json!(""), json!(false), json!(0), json!([])] {
            let rec = normalize_record(&json!({"text": "x", "date": date}), TODAY).unwrap();
            assert_eq!(rec.date, TODAY);
        }
        let rec = normalize_record(&json!({"text": "x"}), TODAY).unwrap();
        assert_eq!(rec.date, TODAY);
    }

    #[test]
    fn test_drops_non_object_entries() {
        let input = vec![
            json!("stray"),
            json!(42),
            json!(null),
            json!(["nested"]),
            json!({"text": "kept"}),
            json!(true),
        ];
        let out = normalize_records(&input, TODAY);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "kept");
    }

    #[test]
    fn test_null_text_is_dropped_missing_text_is_empty() {
        assert!(normalize_record(&json!({"text": null}), TODAY).is_none());
        let rec = normalize_record(&json!({"date": "2026-01-02"}), TODAY).unwrap();
        assert_eq!(rec.text, "");
    }

    #[test]
    fn test_coerces_non_string_values() {
        let rec = normalize_record(&json!({"text": 12, "date": 20261016}), TODAY).unwrap();
        assert_eq!(rec.text, "12");
        assert_eq!(rec.date, "20261016");

        let rec = normalize_record(&json!({"text": true}), TODAY).unwrap();
        assert_eq!(rec.text, "true");

        let rec = normalize_record(&json!({"text": {"a": 1}}), TODAY).unwrap();
        assert_eq!(rec.text, r#"{"a":1}"#);
    }

    #[test]
    fn test_preserves_order_and_unicode() {
        let input = vec![
            json!({"text": "第一", "date": "2026-01-01"}),
            json!({"text": "second", "date": "2026-01-02"}),
        ];
        let out = normalize_records(&input, TODAY);
        assert_eq!(out[0].text, "第一");
        assert_eq!(out[1].text, "second");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(0.0)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!(true)));
    }

    #[test]
    fn test_collection_keys() {
        assert_eq!(Collection::Tasks.file_name(), "tasks.json");
        assert_eq!(Collection::Discoveries.storage_key(), "workboard-discoveries-v1");
        assert_eq!(Collection::Tasks.to_string(), "tasks");
    }
}
