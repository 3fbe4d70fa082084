use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::RecordStatus;
use super::identity::AdmissionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateForm {
    pub admission_id: AdmissionId,
    pub form_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    pub form_data: Value,
    pub status: RecordStatus,
}

/// Interpret free text as structured form data.
///
/// Valid JSON passes through unchanged; anything else is wrapped as
/// `{"content": text}`. Blank input becomes an empty object. Never fails.
pub fn parse_form_data(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => {
            let mut wrapped = Map::new();
            wrapped.insert("content".to_string(), Value::String(text.to_string()));
            Value::Object(wrapped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_passes_through() {
        assert_eq!(parse_form_data(r#"{"a":1}"#), json!({"a": 1}));
    }

    #[test]
    fn plain_text_is_wrapped() {
        assert_eq!(parse_form_data("hello"), json!({"content": "hello"}));
    }

    #[test]
    fn malformed_json_is_wrapped_verbatim() {
        assert_eq!(
            parse_form_data(r#"{"a":1"#),
            json!({"content": "{\"a\":1"})
        );
    }

    #[test]
    fn scalar_json_is_kept() {
        assert_eq!(parse_form_data("42"), json!(42));
        assert_eq!(parse_form_data("[1, 2]"), json!([1, 2]));
    }

    #[test]
    fn blank_is_empty_object() {
        assert_eq!(parse_form_data("  \n"), json!({}));
    }
}
