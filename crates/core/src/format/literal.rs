//! Java literal syntax for strings, chars and floating point numbers.

use std::fmt::Write;

fn escape_into(out: &mut String, c: char, quote: char) {
    match c {
        '\u{8}' => out.push_str("\\b"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\u{c}' => out.push_str("\\f"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", c as u32);
        }
        c => out.push(c),
    }
}

pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        escape_into(&mut out, c, '"');
    }
    out.push('"');
    out
}

pub fn char_literal(c: char) -> String {
    let mut out = String::with_capacity(4);
    out.push('\'');
    escape_into(&mut out, c, '\'');
    out.push('\'');
    out
}

/// Constant name on the wrapper class for values with no literal form.
pub(crate) fn special_constant(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("POSITIVE_INFINITY")
    } else if value == f64::NEG_INFINITY {
        Some("NEGATIVE_INFINITY")
    } else {
        None
    }
}

pub(crate) fn double_literal(value: f64) -> String {
    format!("{value:?}D")
}

pub(crate) fn float_literal(value: f32) -> String {
    format!("{value:?}F")
}
