//! A small hand-rolled JSON emitter for the façade's `stringify` surface.
//!
//! This is not a general-purpose JSON library: it exists to satisfy two
//! rules an off-the-shelf serializer won't give us for free — big
//! integers render as decimal strings rather than lossy `f64` numbers, and
//! `-0.0` renders as the literal `-0` rather than being folded into `0`.

use std::fmt::Write as _;

/// A minimal JSON value tree, just expressive enough to describe the
/// object graph this codec produces.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    /// A double, rendered with `-0` preserved when the sign bit is set.
    Number(f64),
    /// A 64-bit integer, always rendered as a decimal string so it
    /// survives a round-trip through JSON parsers that use `f64`.
    BigInt(i64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn object(fields: impl IntoIterator<Item = (&'static str, JsonValue)>) -> Self {
        Self::Object(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Render `value` as indented JSON text. `indent` is the number of spaces
/// per nesting level; `0` produces compact output on a single line.
pub fn stringify(value: &JsonValue, indent: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, indent, 0);
    out
}

fn write_value(out: &mut String, value: &JsonValue, indent: usize, depth: usize) {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        JsonValue::Number(n) => write_number(out, *n),
        JsonValue::BigInt(n) => {
            out.push('"');
            let _ = write!(out, "{n}");
            out.push('"');
        }
        JsonValue::String(s) => write_string(out, s),
        JsonValue::Array(items) => write_array(out, items, indent, depth),
        JsonValue::Object(fields) => write_object(out, fields, indent, depth),
    }
}

/// Renders the distinguished `-0` literal when the sign bit is set on an
/// otherwise-zero value; ordinary values use Rust's shortest round-trip
/// float formatting.
fn write_number(out: &mut String, n: f64) {
    if n == 0.0 && n.is_sign_negative() {
        out.push_str("-0");
    } else if n.is_nan() || n.is_infinite() {
        // Not valid JSON; emit null rather than producing unparsable output.
        out.push_str("null");
    } else {
        let _ = write!(out, "{n}");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn newline_indent(out: &mut String, indent: usize, depth: usize) {
    if indent > 0 {
        out.push('\n');
        out.push_str(&" ".repeat(indent * depth));
    }
}

fn write_array(out: &mut String, items: &[JsonValue], indent: usize, depth: usize) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline_indent(out, indent, depth + 1);
        write_value(out, item, indent, depth + 1);
    }
    newline_indent(out, indent, depth);
    out.push(']');
}

fn write_object(out: &mut String, fields: &[(String, JsonValue)], indent: usize, depth: usize) {
    if fields.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline_indent(out, indent, depth + 1);
        write_string(out, key);
        out.push(':');
        if indent > 0 {
            out.push(' ');
        }
        write_value(out, value, indent, depth + 1);
    }
    newline_indent(out, indent, depth);
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_zero_renders_as_literal_minus_zero() {
        let value = JsonValue::Number(-0.0);
        assert_eq!(stringify(&value, 0), "-0");
        assert_eq!(stringify(&JsonValue::Number(0.0), 0), "0");
    }

    #[test]
    fn test_big_int_renders_as_decimal_string() {
        let value = JsonValue::BigInt(9_223_372_036_854_775_807);
        assert_eq!(stringify(&value, 0), "\"9223372036854775807\"");
    }

    #[test]
    fn test_indented_object() {
        let value = JsonValue::object([("a", JsonValue::BigInt(1)), ("b", JsonValue::Bool(true))]);
        let text = stringify(&value, 2);
        assert!(text.contains("\n  \"a\": \"1\""));
        assert!(text.contains("\n  \"b\": true"));
    }

    #[test]
    fn test_string_escaping() {
        let value = JsonValue::String("a\"b\\c\n".to_string());
        assert_eq!(stringify(&value, 0), "\"a\\\"b\\\\c\\n\"");
    }
}
