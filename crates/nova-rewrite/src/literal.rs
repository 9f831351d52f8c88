use std::fmt;

use crate::edit::{TextEdit, TextRange};
use crate::source::SourceText;

/// The decoded value of a Java literal token.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    String(String),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Null,
}

impl LiteralValue {
    /// The value as it is spelled inside the literal token, without decoration.
    ///
    /// Strings and chars are escaped, so `a"b` is spelled `a\"b`.
    pub fn spelling(&self) -> String {
        match self {
            LiteralValue::String(s) => escape(s.chars(), '"'),
            LiteralValue::Char(c) => escape(std::iter::once(*c), '\''),
            other => other.to_string(),
        }
    }

    fn opening_quote(&self) -> Option<char> {
        match self {
            LiteralValue::String(_) => Some('"'),
            LiteralValue::Char(_) => Some('\''),
            _ => None,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(s) => f.write_str(s),
            LiteralValue::Char(c) => write!(f, "{c}"),
            LiteralValue::Int(v) => write!(f, "{v}"),
            LiteralValue::Long(v) => write!(f, "{v}"),
            // `{:?}` keeps the fractional part (`1.0`), matching Java source spelling.
            LiteralValue::Float(v) => write!(f, "{v:?}"),
            LiteralValue::Double(v) => write!(f, "{v:?}"),
            LiteralValue::Boolean(v) => write!(f, "{v}"),
            LiteralValue::Null => f.write_str("null"),
        }
    }
}

fn escape(chars: impl Iterator<Item = char>, quote: char) -> String {
    let mut out = String::new();
    let mut chars = chars.peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            // `\0` followed by an octal digit would read as a longer octal escape.
            '\0' if !chars.peek().is_some_and(|next| ('0'..='7').contains(next)) => {
                out.push_str("\\0")
            }
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                for unit in c.encode_utf16(&mut [0; 2]) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Computes the edit that replaces the literal at `range` with its transformed value.
///
/// The value's spelling is located in the raw token by first occurrence (after the
/// opening quote for strings and chars); whatever surrounds it (quotes, an `L` or `f`
/// suffix, a sign) is kept around the new value. Returns `None` when the transform
/// leaves the spelling unchanged or the spelling cannot be found in the token.
pub fn literal_edit(
    source: &SourceText<'_>,
    range: TextRange,
    value: &LiteralValue,
    transform: &dyn Fn(&LiteralValue) -> LiteralValue,
) -> Option<TextEdit> {
    let raw = source.slice(range);
    let original = value.spelling();

    let search_from = match value.opening_quote() {
        Some(quote) => raw.find(quote).map(|idx| idx + quote.len_utf8()).unwrap_or(0),
        None => 0,
    };
    let Some(found) = raw[search_from..].find(&original) else {
        tracing::debug!(
            target = "nova.rewrite",
            raw,
            value = %original,
            "literal value is not spelled verbatim in its token; leaving it untouched"
        );
        return None;
    };
    let value_start = search_from + found;
    let prefix = &raw[..value_start];
    let suffix = &raw[value_start + original.len()..];

    let transformed = transform(value).spelling();
    if transformed == original {
        return None;
    }

    Some(TextEdit::replace(
        range,
        format!("{prefix}{transformed}{suffix}"),
    ))
}
