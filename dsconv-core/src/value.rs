//! Value coercion and length rules
//!
//! Projection decides validity on the *text* form of a value, so every
//! variant needs a defined rendering. Arrays are listed the way array
//! printers in the data-science ecosystem list them: bracketed, elements
//! separated by a single space, strings single-quoted.

use serde_json::Value;

/// Render a value as the text stored in an output record.
///
/// | variant | text |
/// |---------|------|
/// | null    | empty |
/// | string  | unchanged |
/// | number  | decimal (`42`, `-7`, `1.5`) |
/// | bool    | `true` / `false` |
/// | array   | `[1 2 3]`, `['a' 'b']`, `[]` |
/// | object  | compact JSON |
pub fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => list_array(items),
        Value::Object(_) => value.to_string(),
    }
}

fn list_array(items: &[Value]) -> String {
    let mut out = String::from("[");
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        match item {
            Value::String(s) => {
                out.push('\'');
                out.push_str(s);
                out.push('\'');
            }
            Value::Null => out.push_str("null"),
            other => out.push_str(&coerce_to_text(other)),
        }
    }
    out.push(']');
    out
}

/// Natural length of a value.
///
/// Strings count Unicode scalar values, arrays their elements and objects
/// their entries. Scalars without a length concept report 0.
pub fn value_len(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}
