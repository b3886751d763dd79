//! Page-context function declarations.
//!
//! Each constant is a complete JavaScript function declaration. The host
//! calls it with JSON arguments and returns its JSON result. The functions
//! close over nothing.

// ============================================================================
// Constants
// ============================================================================

/// Enumerates every `<form>` and every control in its `elements` collection.
///
/// Takes no arguments. Returns an array of form records. Checkbox and radio
/// controls report their checked state as `"true"`/`"false"`.
///
/// Form properties are read through the prototype accessors, since a
/// control named `action` or `elements` shadows the property on the form.
pub const SCAN_FORMS: &str = r##"function scanForms() {
  const formGetter = (prop) => Object.getOwnPropertyDescriptor(HTMLFormElement.prototype, prop).get;
  const getAction = formGetter('action');
  const getMethod = formGetter('method');
  const getElements = formGetter('elements');
  const getAttribute = Element.prototype.getAttribute;
  const hasAttribute = Element.prototype.hasAttribute;

  const forms = document.getElementsByTagName('form');
  const records = [];

  for (let i = 0; i < forms.length; i++) {
    const form = forms[i];
    const inputs = Array.from(getElements.call(form)).map((element, index) => {
      const checkable = element.type === 'checkbox' || element.type === 'radio';
      return {
        id: element.getAttribute('id') || '',
        name: element.getAttribute('name') || '',
        type: element.type || '',
        value: checkable ? String(element.checked) : String(element.value ?? ''),
        required: Boolean(element.required),
        index,
      };
    });

    records.push({
      id: getAttribute.call(form, 'id') || getAttribute.call(form, 'name') || `form-${i + 1}`,
      action: hasAttribute.call(form, 'action') ? getAction.call(form) : 'No action specified',
      method: hasAttribute.call(form, 'method') ? getMethod.call(form) : 'get',
      inputs,
    });
  }

  return records;
}"##;

/// Applies fill steps to the form at a positional index.
///
/// Arguments: `(formIndex, steps)`. Returns
/// `{ formFound, filled: [position], skipped: [position] }`. When the form
/// does not exist, the page is left untouched.
pub const FILL_FORM: &str = r##"function fillForm(formIndex, steps) {
  const form = document.getElementsByTagName('form')[formIndex];
  if (!form) {
    return { formFound: false, filled: [], skipped: [] };
  }

  const elements = Array.from(
    Object.getOwnPropertyDescriptor(HTMLFormElement.prototype, 'elements').get.call(form)
  );
  const querySelector = Element.prototype.querySelector;
  const report = { formFound: true, filled: [], skipped: [] };

  steps.forEach((step, position) => {
    let element = null;

    if (step.id) {
      element = document.getElementById(step.id);
    }
    if (!element && step.name) {
      element = querySelector.call(form, `[name="${CSS.escape(step.name)}"]`);
    }
    if (!element) {
      element = elements.find((candidate, idx) => candidate.type === step.type && idx === step.index) || null;
    }

    if (!element) {
      report.skipped.push(position);
      return;
    }

    if (element.type === 'checkbox' || element.type === 'radio') {
      element.checked = step.checked;
    } else {
      element.value = step.value;
    }

    element.dispatchEvent(new Event('input', { bubbles: true }));
    element.dispatchEvent(new Event('change', { bubbles: true }));
    report.filled.push(position);
  });

  return report;
}"##;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_are_function_declarations() {
        for script in [SCAN_FORMS, FILL_FORM] {
            assert!(script.starts_with("function "));
            assert!(script.ends_with('}'));
        }
    }

    #[test]
    fn test_scan_uses_record_fallbacks() {
        assert!(SCAN_FORMS.contains("'No action specified'"));
        assert!(SCAN_FORMS.contains("`form-${i + 1}`"));
        assert!(SCAN_FORMS.contains("'get'"));
    }

    #[test]
    fn test_form_properties_survive_named_controls() {
        for prop in ["'action'", "'method'", "'elements'"] {
            assert!(SCAN_FORMS.contains(&format!("formGetter({prop})")));
        }
        for shadowed in ["form.action", "form.method", "form.elements", "form.hasAttribute", "form.getAttribute"] {
            assert!(!SCAN_FORMS.contains(shadowed), "{shadowed}");
        }
        for shadowed in ["form.elements", "form.querySelector"] {
            assert!(!FILL_FORM.contains(shadowed), "{shadowed}");
        }
        assert!(FILL_FORM.contains("querySelector.call(form,"));
    }

    #[test]
    fn test_fill_dispatches_input_then_change() {
        let input = FILL_FORM.find("new Event('input'").expect("input event");
        let change = FILL_FORM.find("new Event('change'").expect("change event");
        assert!(input < change);
        assert!(FILL_FORM.contains("bubbles: true"));
    }

    #[test]
    fn test_fill_resolution_order() {
        let by_id = FILL_FORM.find("getElementById").expect("id lookup");
        let by_name = FILL_FORM.find("querySelector.call").expect("name lookup");
        let by_position = FILL_FORM.find("elements.find").expect("positional lookup");
        assert!(by_id < by_name && by_name < by_position);
    }
}
