//! Decoder for the upstream feed record.
//!
//! The feed sends either JSON or a Python literal (`{'series': {...}}`).
//! Literal syntax is rewritten to JSON first, then the record is decoded
//! with a strict serde schema.

use serde::Deserialize;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::FeedError;
use crate::payload::Timestamp;

/// The record carried by one upstream data frame.
///
/// Unknown keys are ignored; every field listed here is required and must
/// have the declared type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedRecord {
    pub series: SeriesRecord,
    pub time: Vec<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesRecord {
    pub values: Vec<f64>,
    pub sensor_id: i64,
    pub label: i64,
}

/// Decodes a [`FeedRecord`] from raw frame bytes.
///
/// # Errors
///
/// Returns [`FeedError::MalformedPayload`] if the bytes are not UTF-8, do
/// not parse as JSON or a Python literal, or a required field is missing
/// or mistyped.
pub fn parse_record(bytes: &[u8]) -> Result<FeedRecord, FeedError> {
    let text = std::str::from_utf8(bytes).map_err(|e| FeedError::MalformedPayload(e.to_string()))?;
    serde_json::from_str(&literal_to_json(text))
        .map_err(|e| FeedError::MalformedPayload(e.to_string()))
}

/// Rewrites Python literal syntax into JSON.
///
/// Single-quoted strings become double-quoted, `True`/`False`/`None` become
/// `true`/`false`/`null`, tuples become arrays and trailing commas are
/// dropped. Valid JSON comes out unchanged. Anything else is left for the
/// JSON decoder to reject.
pub fn literal_to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => copy_string(c, &mut chars, &mut out),
            '(' => out.push('['),
            ')' | ']' | '}' => {
                drop_trailing_comma(&mut out);
                out.push(if c == ')' { ']' } else { c });
            }
            c if (c.is_ascii_alphabetic() || c == '_')
                && !prev.is_some_and(|p| p.is_ascii_alphanumeric() || p == '.') =>
            {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || next == '_') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    other => other,
                });
                prev = word.chars().last();
                continue;
            }
            c => out.push(c),
        }
        prev = Some(c);
    }

    out
}

/// Copies one string literal opened by `quote` as a JSON string.
fn copy_string(quote: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push('"');
    while let Some(c) = chars.next() {
        match c {
            c if c == quote => {
                out.push('"');
                return;
            }
            '"' => out.push_str("\\\""),
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some('x') => {
                    out.push_str("\\u00");
                    out.extend(chars.by_ref().take(2));
                }
                Some(e @ ('"' | '\\' | 'b' | 'f' | 'n' | 'r' | 't' | 'u')) => {
                    out.push('\\');
                    out.push(e);
                }
                // Python keeps unknown escapes literally.
                Some(other) => {
                    out.push_str("\\\\");
                    out.push(other);
                }
                None => out.push_str("\\\\"),
            },
            c => out.push(c),
        }
    }
}

fn drop_trailing_comma(out: &mut String) {
    let len = out.trim_end().len();
    out.truncate(len);
    if out.ends_with(',') {
        out.pop();
    }
}
