//! JSON encoding and decoding.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::{Error, Result};
use crate::form::{ExportFormat, FormRecord};

// ============================================================================
// Encoding
// ============================================================================

/// Serializes a record as pretty-printed JSON (two-space indent).
///
/// # Errors
///
/// Returns [`Error::Json`] if serialization fails.
pub fn to_json(record: &FormRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

// ============================================================================
// Decoding
// ============================================================================

/// Parses JSON text into a record.
///
/// # Errors
///
/// - [`Error::Parse`] with the parser diagnostic on malformed JSON
/// - [`Error::MalformedFormData`] if `inputs` is missing, not an array, or
///   a field cannot be decoded
///
/// An input without an `index` key takes its position in `inputs`, the same
/// as XML fields do.
pub fn from_json(text: &str) -> Result<FormRecord> {
    let mut value: Value =
        serde_json::from_str(text).map_err(|e| Error::parse(ExportFormat::Json, e.to_string()))?;

    check_inputs(&value)?;
    fill_missing_indexes(&mut value);

    serde_json::from_value(value).map_err(|e| Error::malformed(e.to_string()))
}

/// Requires an array-valued `inputs` member.
fn check_inputs(value: &Value) -> Result<()> {
    match value.get("inputs") {
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(Error::malformed("`inputs` is not an array")),
        None => Err(Error::malformed("missing `inputs` array")),
    }
}

/// Sets `index` to the array position on inputs that omit it.
fn fill_missing_indexes(value: &mut Value) {
    let Some(Value::Array(inputs)) = value.get_mut("inputs") else {
        return;
    };

    for (position, input) in inputs.iter_mut().enumerate() {
        if let Value::Object(fields) = input {
            fields
                .entry("index")
                .or_insert_with(|| Value::from(position));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::form::FieldRecord;

    #[test]
    fn test_to_json_is_pretty_and_ordered() {
        let record = FormRecord::new("login")
            .with_input(FieldRecord::new("text", 0).with_name("user"));
        let text = to_json(&record).expect("encode");

        assert!(text.starts_with("{\n  \"id\": \"login\",\n  \"action\""));
        let id_pos = text.find("\"id\"").expect("id");
        let inputs_pos = text.find("\"inputs\"").expect("inputs");
        assert!(id_pos < inputs_pos);
        assert!(text.contains("\"type\": \"text\""));
        assert!(text.contains("\"index\": 0"));
    }

    #[test]
    fn test_from_json_reads_plain_export_shape() {
        // Older exports carry no `id` or `index` per input.
        let text = r#"{
            "id": "form-1",
            "action": "No action specified",
            "method": "get",
            "inputs": [
                { "name": "email", "type": "text", "value": "x@y.z", "required": false }
            ]
        }"#;

        let record = from_json(text).expect("decode");
        assert_eq!(record.id, "form-1");
        assert_eq!(record.inputs.len(), 1);
        assert_eq!(record.inputs[0].name, "email");
        assert_eq!(record.inputs[0].id, "");
        assert_eq!(record.inputs[0].index, 0);
    }

    #[test]
    fn test_from_json_missing_index_uses_position() {
        let text = r#"{
            "id": "form-1",
            "inputs": [
                { "name": "a", "type": "text", "value": "1" },
                { "name": "", "type": "text", "value": "2" },
                { "name": "", "type": "submit", "value": "Go", "index": 7 }
            ]
        }"#;

        let record = from_json(text).expect("decode");
        let indexes: Vec<_> = record.inputs.iter().map(|f| f.index).collect();
        assert_eq!(indexes, [0, 1, 7]);
    }

    #[test]
    fn test_from_json_and_xml_agree_on_missing_index() {
        let json = r#"{ "id": "f", "inputs": [
            { "name": "a", "type": "text", "value": "1" },
            { "name": "", "type": "text", "value": "2" },
            { "name": "", "type": "submit", "value": "Go" }
        ] }"#;
        let xml = "<form><id>f</id><inputs>\
            <input><name>a</name><type>text</type><value>1</value></input>\
            <input><name></name><type>text</type><value>2</value></input>\
            <input><name></name><type>submit</type><value>Go</value></input>\
            </inputs></form>";

        let from_json_text = from_json(json).expect("json");
        let from_xml_text = crate::codec::from_xml(xml).expect("xml");
        let json_indexes: Vec<_> = from_json_text.inputs.iter().map(|f| f.index).collect();
        let xml_indexes: Vec<_> = from_xml_text.inputs.iter().map(|f| f.index).collect();
        assert_eq!(json_indexes, xml_indexes);
    }

    #[test]
    fn test_from_json_malformed_text() {
        let err = from_json("{ \"id\": ").unwrap_err();
        assert!(matches!(err, Error::Parse { format: ExportFormat::Json, .. }));
    }

    #[test]
    fn test_from_json_missing_inputs() {
        let err = from_json(r#"{ "id": "x" }"#).unwrap_err();
        assert!(matches!(err, Error::MalformedFormData { .. }));
    }

    #[test]
    fn test_from_json_inputs_not_array() {
        let err = from_json(r#"{ "id": "x", "inputs": {} }"#).unwrap_err();
        assert!(matches!(err, Error::MalformedFormData { .. }));
    }

    #[test]
    fn test_from_json_non_object_root() {
        let err = from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, Error::MalformedFormData { .. }));
    }

    #[test]
    fn test_from_json_empty_inputs_is_valid() {
        let record = from_json(r#"{ "inputs": [] }"#).expect("decode");
        assert_eq!(record.field_count(), 0);
        assert_eq!(record.id, "");
    }
}
