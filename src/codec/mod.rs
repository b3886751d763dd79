//! Form record serializers.
//!
//! | Direction | JSON | XML |
//! |-----------|------|-----|
//! | Encode | [`to_json`] | [`to_xml`] |
//! | Decode | [`from_json`] | [`from_xml`] |
//!
//! Decoding validates shape only: the document must carry an array of
//! inputs, otherwise [`Error::MalformedFormData`](crate::Error::MalformedFormData)
//! is returned. Individual fields are not validated.

// ============================================================================
// Submodules
// ============================================================================

/// JSON encoding and decoding.
pub mod json;

/// XML encoding and decoding.
pub mod xml;

// ============================================================================
// Imports
// ============================================================================

use crate::error::Result;
use crate::form::{ExportFormat, FormRecord};

// ============================================================================
// Re-exports
// ============================================================================

pub use json::{from_json, to_json};
pub use xml::{from_xml, to_xml};

// ============================================================================
// Dispatch
// ============================================================================

/// Serializes a record in the given format.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if JSON serialization fails.
pub fn encode(record: &FormRecord, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(record),
        ExportFormat::Xml => Ok(to_xml(record)),
    }
}

/// Deserializes and shape-checks a record in the given format.
///
/// # Errors
///
/// - [`Error::Parse`](crate::Error::Parse) if the text is not well-formed
/// - [`Error::MalformedFormData`](crate::Error::MalformedFormData) if it has no inputs array
pub fn decode(text: &str, format: ExportFormat) -> Result<FormRecord> {
    match format {
        ExportFormat::Json => from_json(text),
        ExportFormat::Xml => from_xml(text),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::form::FieldRecord;

    fn sample() -> FormRecord {
        FormRecord::new("signup")
            .with_input(FieldRecord::new("text", 0).with_name("email").with_value("a@b.c").required())
            .with_input(FieldRecord::new("checkbox", 1).with_name("subscribe").with_value("true"))
            .with_input(FieldRecord::new("submit", 2).with_value("Join"))
    }

    #[test]
    fn test_encode_decode_dispatch() {
        let record = sample();
        for format in ExportFormat::ALL {
            let text = encode(&record, format).expect("encode");
            let decoded = decode(&text, format).expect("decode");
            assert_eq!(decoded, record, "format {format}");
        }
    }

    #[test]
    fn test_decode_wrong_format_is_parse_error() {
        let json = encode(&sample(), ExportFormat::Json).expect("encode");
        let err = decode(&json, ExportFormat::Xml).unwrap_err();
        assert!(err.is_user_facing());
    }

    fn field_strategy() -> impl Strategy<Value = (String, String, String, String, bool)> {
        (
            "[a-z0-9_-]{0,8}",
            "[a-z0-9_\\[\\]-]{0,8}",
            prop_oneof![Just("text"), Just("checkbox"), Just("email"), Just("select-one")]
                .prop_map(str::to_string),
            "\\PC{0,16}",
            any::<bool>(),
        )
    }

    fn record_strategy() -> impl Strategy<Value = FormRecord> {
        (
            "[a-zA-Z0-9 _-]{1,12}",
            "\\PC{0,24}",
            prop_oneof![Just("get"), Just("post"), Just("dialog")].prop_map(str::to_string),
            prop::collection::vec(field_strategy(), 0..6),
        )
            .prop_map(|(id, action, method, fields)| FormRecord {
                id,
                action,
                method,
                inputs: fields
                    .into_iter()
                    .enumerate()
                    .map(|(index, (id, name, field_type, value, required))| FieldRecord {
                        id,
                        name,
                        field_type,
                        value,
                        required,
                        index,
                    })
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn prop_json_round_trip(record in record_strategy()) {
            let text = to_json(&record).expect("encode");
            prop_assert_eq!(from_json(&text).expect("decode"), record);
        }

        #[test]
        fn prop_xml_round_trip(record in record_strategy()) {
            let text = to_xml(&record);
            prop_assert_eq!(from_xml(&text).expect("decode"), record);
        }
    }
}
