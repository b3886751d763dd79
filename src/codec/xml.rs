//! XML encoding and decoding.
//!
//! # Document Shape
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <form>
//!   <id>signup</id>
//!   <action>https://example.com/join</action>
//!   <method>post</method>
//!   <inputs>
//!     <input>
//!       <id></id>
//!       <name>email</name>
//!       <type>text</type>
//!       <value>a@b.c</value>
//!       <required>true</required>
//!     </input>
//!   </inputs>
//! </form>
//! ```
//!
//! Text is escaped on write and unescaped on read. The schema has no
//! `<index>` element; a field's index is its ordinal among `<input>`
//! elements.

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Write as _;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::form::{ExportFormat, FieldRecord, FormRecord};

// ============================================================================
// Encoding
// ============================================================================

/// Serializes a record as an XML document.
#[must_use]
pub fn to_xml(record: &FormRecord) -> String {
    let mut out = String::with_capacity(256 + record.inputs.len() * 160);

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<form>\n");
    push_leaf(&mut out, 1, "id", &record.id);
    push_leaf(&mut out, 1, "action", &record.action);
    push_leaf(&mut out, 1, "method", &record.method);
    out.push_str("  <inputs>\n");

    for field in &record.inputs {
        out.push_str("    <input>\n");
        push_leaf(&mut out, 3, "id", &field.id);
        push_leaf(&mut out, 3, "name", &field.name);
        push_leaf(&mut out, 3, "type", &field.field_type);
        push_leaf(&mut out, 3, "value", &field.value);
        push_leaf(&mut out, 3, "required", if field.required { "true" } else { "false" });
        out.push_str("    </input>\n");
    }

    out.push_str("  </inputs>\n</form>\n");
    out
}

fn push_leaf(out: &mut String, depth: usize, tag: &str, text: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{:indent$}<{tag}>{}</{tag}>", "", escape(text), indent = depth * 2);
}

// ============================================================================
// Decoding
// ============================================================================

/// Form-level slots, filled by the first matching element outside any `<input>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormSlot {
    Id,
    Action,
    Method,
}

impl FormSlot {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "id" => Some(Self::Id),
            "action" => Some(Self::Action),
            "method" => Some(Self::Method),
            _ => None,
        }
    }
}

/// Field-level slots, filled by the first matching descendant of an `<input>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldSlot {
    Id,
    Name,
    Type,
    Value,
    Required,
}

impl FieldSlot {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "type" => Some(Self::Type),
            "value" => Some(Self::Value),
            "required" => Some(Self::Required),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Form(FormSlot),
    Field(FieldSlot),
}

/// Text collected for one element until its end tag.
struct Capture {
    slot: Slot,
    depth: usize,
    text: String,
}

/// An `<input>` element being read.
#[derive(Default)]
struct PendingField {
    depth: usize,
    id: Option<String>,
    name: Option<String>,
    field_type: Option<String>,
    value: Option<String>,
    required: Option<String>,
}

impl PendingField {
    fn slot_mut(&mut self, slot: FieldSlot) -> &mut Option<String> {
        match slot {
            FieldSlot::Id => &mut self.id,
            FieldSlot::Name => &mut self.name,
            FieldSlot::Type => &mut self.field_type,
            FieldSlot::Value => &mut self.value,
            FieldSlot::Required => &mut self.required,
        }
    }

    fn finish(self, index: usize) -> FieldRecord {
        FieldRecord {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            field_type: self.field_type.unwrap_or_default(),
            value: self.value.unwrap_or_default(),
            required: self.required.as_deref() == Some("true"),
            index,
        }
    }
}

/// Streaming decoder state.
#[derive(Default)]
struct Decoder {
    stack: Vec<String>,
    saw_root: bool,
    saw_inputs: bool,
    id: Option<String>,
    action: Option<String>,
    method: Option<String>,
    field: Option<PendingField>,
    capture: Option<Capture>,
    inputs: Vec<FieldRecord>,
}

impl Decoder {
    fn form_slot_mut(&mut self, slot: FormSlot) -> &mut Option<String> {
        match slot {
            FormSlot::Id => &mut self.id,
            FormSlot::Action => &mut self.action,
            FormSlot::Method => &mut self.method,
        }
    }

    /// Handles an opening tag; `depth` is the element's depth once opened.
    fn open(&mut self, tag: &str, depth: usize) {
        self.saw_root = true;

        if self.capture.is_some() {
            return;
        }

        if tag == "inputs" {
            self.saw_inputs = true;
        }

        let slot = match self.field.as_mut() {
            Some(field) => FieldSlot::from_tag(tag)
                .filter(|slot| field.slot_mut(*slot).is_none())
                .map(Slot::Field),
            None if tag == "input" => {
                self.field = Some(PendingField {
                    depth,
                    ..PendingField::default()
                });
                None
            }
            None => FormSlot::from_tag(tag)
                .filter(|slot| self.form_slot_mut(*slot).is_none())
                .map(Slot::Form),
        };

        if let Some(slot) = slot {
            self.capture = Some(Capture {
                slot,
                depth,
                text: String::new(),
            });
        }
    }

    /// Handles a closing tag at `depth`.
    fn close(&mut self, depth: usize) {
        if let Some(capture) = self.capture.take_if(|c| c.depth == depth) {
            match capture.slot {
                Slot::Form(slot) => *self.form_slot_mut(slot) = Some(capture.text),
                Slot::Field(slot) => {
                    if let Some(field) = self.field.as_mut() {
                        *field.slot_mut(slot) = Some(capture.text);
                    }
                }
            }
            return;
        }

        if let Some(field) = self.field.take_if(|f| f.depth == depth) {
            let index = self.inputs.len();
            self.inputs.push(field.finish(index));
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn finish(self) -> Result<FormRecord> {
        if let Some(open) = self.stack.last() {
            return Err(Error::parse(
                ExportFormat::Xml,
                format!("unclosed element <{open}> at end of document"),
            ));
        }
        if !self.saw_root {
            return Err(Error::parse(ExportFormat::Xml, "document has no root element"));
        }
        if !self.saw_inputs {
            return Err(Error::malformed("missing <inputs> element"));
        }

        Ok(FormRecord {
            id: self.id.unwrap_or_default(),
            action: self.action.unwrap_or_default(),
            method: self.method.unwrap_or_default(),
            inputs: self.inputs,
        })
    }
}

/// Parses an XML document into a record.
///
/// # Errors
///
/// - [`Error::Parse`] with the parser diagnostic on malformed XML
/// - [`Error::MalformedFormData`] if the document has no `<inputs>` element
pub fn from_xml(text: &str) -> Result<FormRecord> {
    let mut reader = Reader::from_str(text);
    let mut decoder = Decoder::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::parse(
                ExportFormat::Xml,
                format!("{e} (at byte {})", reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                decoder.stack.push(tag.clone());
                decoder.open(&tag, decoder.stack.len());
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let depth = decoder.stack.len() + 1;
                decoder.open(&tag, depth);
                decoder.close(depth);
            }
            Event::End(_) => {
                let depth = decoder.stack.len();
                decoder.close(depth);
                decoder.stack.pop();
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::parse(ExportFormat::Xml, err.to_string()))?;
                decoder.text(&text);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                decoder.text(&String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    decoder.finish()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FormRecord {
        FormRecord {
            id: "signup".into(),
            action: "https://example.com/join?a=1&b=2".into(),
            method: "post".into(),
            inputs: vec![
                FieldRecord::new("text", 0)
                    .with_id("email")
                    .with_name("email")
                    .with_value("<b>me</b> & \"you\"")
                    .required(),
                FieldRecord::new("checkbox", 1).with_name("subscribe").with_value("false"),
            ],
        }
    }

    #[test]
    fn test_to_xml_layout() {
        let xml = to_xml(&FormRecord::new("login").with_input(FieldRecord::new("text", 0)));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<form>\n  <id>login</id>\n"));
        assert!(xml.contains("  <inputs>\n    <input>\n      <id></id>\n"));
        assert!(xml.contains("      <required>false</required>\n    </input>\n"));
        assert!(!xml.contains("<index>"));
    }

    #[test]
    fn test_to_xml_escapes_markup() {
        let xml = to_xml(&sample());
        assert!(xml.contains("<value>&lt;b&gt;me&lt;/b&gt; &amp; &quot;you&quot;</value>"));
        assert!(xml.contains("<action>https://example.com/join?a=1&amp;b=2</action>"));
    }

    #[test]
    fn test_round_trip_with_markup_characters() {
        let record = sample();
        assert_eq!(from_xml(&to_xml(&record)).expect("decode"), record);
    }

    #[test]
    fn test_from_xml_export_without_ids() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<form>
  <id>form-1</id>
  <action>No action specified</action>
  <method>get</method>
  <inputs>

    <input>
      <name>email</name>
      <type>text</type>
      <value>x@y.z</value>
      <required>false</required>
    </input>
    <input>
      <name>agree</name>
      <type>checkbox</type>
      <value>on</value>
      <required>true</required>
    </input>
  </inputs>
</form>"#;

        let record = from_xml(xml).expect("decode");
        assert_eq!(record.id, "form-1");
        assert_eq!(record.method, "get");
        assert_eq!(record.inputs.len(), 2);
        assert_eq!(record.inputs[0].id, "");
        assert_eq!(record.inputs[0].name, "email");
        assert_eq!(record.inputs[0].value, "x@y.z");
        assert_eq!(record.inputs[1].index, 1);
        assert!(record.inputs[1].required);
    }

    #[test]
    fn test_from_xml_required_only_literal_true() {
        let xml = "<form><inputs><input><required>TRUE</required></input>\
                   <input><required>true</required></input></inputs></form>";
        let record = from_xml(xml).expect("decode");
        assert!(!record.inputs[0].required);
        assert!(record.inputs[1].required);
    }

    #[test]
    fn test_from_xml_first_match_wins() {
        let xml = "<form><inputs><input><name>a</name><name>b</name></input></inputs></form>";
        let record = from_xml(xml).expect("decode");
        assert_eq!(record.inputs[0].name, "a");
    }

    #[test]
    fn test_from_xml_empty_elements() {
        let xml = "<form><id/><inputs><input><value/><type>text</type></input></inputs></form>";
        let record = from_xml(xml).expect("decode");
        assert_eq!(record.id, "");
        assert_eq!(record.inputs[0].value, "");
        assert_eq!(record.inputs[0].field_type, "text");
    }

    #[test]
    fn test_from_xml_field_id_does_not_leak_to_form() {
        let xml = "<form><inputs><input><id>first</id></input></inputs><id>late</id></form>";
        let record = from_xml(xml).expect("decode");
        assert_eq!(record.inputs[0].id, "first");
        assert_eq!(record.id, "late");
    }

    #[test]
    fn test_from_xml_mismatched_tag() {
        let err = from_xml("<form><inputs></form>").unwrap_err();
        assert!(matches!(err, Error::Parse { format: ExportFormat::Xml, .. }));
    }

    #[test]
    fn test_from_xml_unclosed_root() {
        let err = from_xml("<form><inputs></inputs>").unwrap_err();
        assert!(matches!(err, Error::Parse { format: ExportFormat::Xml, .. }));
    }

    #[test]
    fn test_from_xml_empty_document() {
        let err = from_xml("").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_from_xml_missing_inputs() {
        let err = from_xml("<form><id>x</id></form>").unwrap_err();
        assert!(matches!(err, Error::MalformedFormData { .. }));
    }
}
