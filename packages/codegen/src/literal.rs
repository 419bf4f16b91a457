//! Rendering of prop values as TypeScript literals.
//!
//! Multi-line output is flat: nesting is restored by the writer when the
//! lines are placed into the page.

use crate::symbols::is_identifier;
use ditto_schema::{Literal, PropValue, ValueType};
use serde_json::Number;

/// Render a value as expression lines.
///
/// Non-empty objects and arrays span several lines with a trailing comma on
/// every entry except the last. Function sources are emitted verbatim.
pub fn render_literal(value: &PropValue) -> Vec<String> {
    match value {
        PropValue::Object(entries) if !entries.is_empty() => {
            let mut lines = vec!["{".to_string()];
            let last = entries.len() - 1;
            for (i, (key, entry)) in entries.iter().enumerate() {
                let prefix = format!("{}: ", render_key(key));
                let suffix = if i < last { "," } else { "" };
                lines.extend(wrap(&prefix, render_literal(entry), suffix));
            }
            lines.push("}".to_string());
            lines
        }
        PropValue::Array(items) if !items.is_empty() => {
            let mut lines = vec!["[".to_string()];
            let last = items.len() - 1;
            for (i, item) in items.iter().enumerate() {
                let suffix = if i < last { "," } else { "" };
                lines.extend(wrap("", render_literal(item), suffix));
            }
            lines.push("]".to_string());
            lines
        }
        PropValue::FunctionSource(source) => source.lines().map(|line| line.trim_end().to_string()).collect(),
        other => vec![render_inline(other)],
    }
}

/// Render a value on a single line (`{ a: 1, b: 'x' }`)
pub fn render_inline(value: &PropValue) -> String {
    match value {
        PropValue::Literal(literal) => render_scalar(literal),
        PropValue::FunctionSource(source) => source.trim().to_string(),
        PropValue::Object(entries) if entries.is_empty() => "{}".to_string(),
        PropValue::Array(items) if items.is_empty() => "[]".to_string(),
        PropValue::Object(entries) => {
            let body: Vec<String> = entries
                .iter()
                .map(|(key, entry)| format!("{}: {}", render_key(key), render_inline(entry)))
                .collect();
            format!("{{ {} }}", body.join(", "))
        }
        PropValue::Array(items) => {
            let body: Vec<String> = items.iter().map(render_inline).collect();
            format!("[{}]", body.join(", "))
        }
    }
}

pub fn render_scalar(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Number(n) => render_number(n),
        Literal::String(s) => quote(s),
    }
}

/// Numbers as JavaScript `String()` prints them
pub fn render_number(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() => render_double(value),
        _ => number.to_string(),
    }
}

/// `Number.prototype.toString` for a finite double: shortest round-trip
/// digits, exponent notation below 1e-6 and from 1e21 up
fn render_double(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:e}", value.abs());
    let parsed = scientific
        .split_once('e')
        .and_then(|(mantissa, exponent)| Some((mantissa, exponent.parse::<i32>().ok()?)));
    let (mantissa, exponent) = match parsed {
        Some(parts) => parts,
        None => return value.to_string(),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // decimal point sits after the first `n` digits
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (whole, fraction) = digits.split_at(n as usize);
        format!("{}.{}", whole, fraction)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat(n.unsigned_abs() as usize), digits)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        match digits.split_at(1) {
            (first, "") => format!("{}e{}{}", first, sign, exponent.abs()),
            (first, rest) => format!("{}.{}e{}{}", first, rest, sign, exponent.abs()),
        }
    };

    if value < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Single-quoted string literal
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

pub fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Prefix the first line and suffix the last line of a block
pub fn wrap(prefix: &str, lines: Vec<String>, suffix: &str) -> Vec<String> {
    let count = lines.len();
    if count == 0 {
        return vec![format!("{}{}", prefix, suffix)];
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let mut text = String::new();
            if i == 0 {
                text.push_str(prefix);
            }
            text.push_str(&line);
            if i + 1 == count {
                text.push_str(suffix);
            }
            text
        })
        .collect()
}

/// TypeScript type for a declared value type, refined by the value's shape
pub fn ts_type(value_type: ValueType, value: &PropValue) -> String {
    match value_type {
        ValueType::String => "string".to_string(),
        ValueType::Number => "number".to_string(),
        ValueType::Boolean => "boolean".to_string(),
        ValueType::Object | ValueType::Array => infer_ts_type(value),
        ValueType::Function => "any".to_string(),
    }
}

/// TypeScript type inferred from a value alone
pub fn infer_ts_type(value: &PropValue) -> String {
    match value {
        PropValue::Literal(Literal::Null) => "any".to_string(),
        PropValue::Literal(Literal::Bool(_)) => "boolean".to_string(),
        PropValue::Literal(Literal::Number(_)) => "number".to_string(),
        PropValue::Literal(Literal::String(_)) => "string".to_string(),
        PropValue::FunctionSource(_) => "(...args: any[]) => any".to_string(),
        PropValue::Array(items) => {
            let types: Vec<Option<&str>> = items.iter().map(primitive_type).collect();
            match types.first() {
                Some(Some(first)) if types.iter().all(|t| *t == Some(*first)) => format!("{}[]", first),
                _ => "any[]".to_string(),
            }
        }
        PropValue::Object(entries) if entries.is_empty() => "Record<string, any>".to_string(),
        PropValue::Object(entries) => {
            let mut fields = Vec::with_capacity(entries.len());
            for (key, entry) in entries {
                match primitive_type(entry) {
                    Some(t) => fields.push(format!("{}: {}", render_key(key), t)),
                    None => return "any".to_string(),
                }
            }
            format!("{{ {} }}", fields.join("; "))
        }
    }
}

fn primitive_type(value: &PropValue) -> Option<&'static str> {
    match value {
        PropValue::Literal(Literal::Bool(_)) => Some("boolean"),
        PropValue::Literal(Literal::Number(_)) => Some("number"),
        PropValue::Literal(Literal::String(_)) => Some("string"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> PropValue {
        PropValue::from(json)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render_inline(&value(json!("hello world"))), "'hello world'");
        assert_eq!(render_inline(&value(json!("it's"))), "'it\\'s'");
        assert_eq!(render_inline(&value(json!(3))), "3");
        assert_eq!(render_inline(&value(json!(3.0))), "3");
        assert_eq!(render_inline(&value(json!(2.5))), "2.5");
        assert_eq!(render_inline(&value(json!(true))), "true");
        assert_eq!(render_inline(&value(json!(null))), "null");
    }

    #[test]
    fn test_numbers_print_like_javascript() {
        let number = |source: &str| render_number(&serde_json::from_str::<Number>(source).unwrap());

        assert_eq!(number("42"), "42");
        assert_eq!(number("-7"), "-7");
        assert_eq!(number("3.0"), "3");
        assert_eq!(number("2.5"), "2.5");
        assert_eq!(number("-0.5"), "-0.5");
        assert_eq!(number("0.0"), "0");
        assert_eq!(number("100.0"), "100");
        assert_eq!(number("0.000001"), "0.000001");
        assert_eq!(number("1e-7"), "1e-7");
        assert_eq!(number("1.5e-7"), "1.5e-7");
        assert_eq!(number("1e20"), "100000000000000000000");
        assert_eq!(number("1e21"), "1e+21");
        assert_eq!(number("1.25e22"), "1.25e+22");
    }

    #[test]
    fn test_object_lines_have_trailing_commas_except_last() {
        let lines = render_literal(&value(json!({ "a": 1, "b": { "c": "x" }, "data-index": [1, 2] })));
        assert_eq!(
            lines,
            vec!["{", "a: 1,", "b: {", "c: 'x'", "},", "'data-index': [", "1,", "2", "]", "}"]
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(render_literal(&value(json!({}))), vec!["{}"]);
        assert_eq!(render_literal(&value(json!([]))), vec!["[]"]);
    }

    #[test]
    fn test_inline_containers() {
        assert_eq!(render_inline(&value(json!({ "a": 1, "b": "x" }))), "{ a: 1, b: 'x' }");
        assert_eq!(render_inline(&value(json!([1, "a"]))), "[1, 'a']");
    }

    #[test]
    fn test_infer_ts_type() {
        assert_eq!(infer_ts_type(&value(json!(["a", "b"]))), "string[]");
        assert_eq!(infer_ts_type(&value(json!([1, "b"]))), "any[]");
        assert_eq!(infer_ts_type(&value(json!({ "a": 1, "b": "x" }))), "{ a: number; b: string }");
        assert_eq!(infer_ts_type(&value(json!({ "a": [] }))), "any");
        assert_eq!(ts_type(ValueType::Boolean, &value(json!(true))), "boolean");
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("const a = ", vec!["{".into(), "b: 1".into(), "}".into()], ";");
        assert_eq!(lines, vec!["const a = {", "b: 1", "};"]);
        assert_eq!(wrap("x(", vec!["1".into()], ")"), vec!["x(1)"]);
    }
}
