//! Book search client module.
//!
//! This module talks to the remote matching service. It exposes:
//! - `BookResult`, the decoded identification returned by the service
//! - `BookSearch`, the trait every search backend implements
//! - `HttpSearchClient`, the reqwest-backed implementation
//! - `SearchError`, the typed failure taxonomy

mod http;
mod provider;

pub use http::{HttpSearchClient, DEFAULT_API_BASE};
pub use provider::{BookSearch, ErrorKind, SearchError, SearchResult};

use serde::Serialize;
use serde_json::{Map, Value};

/// Prefix shown before the revealed book name.
pub const BOOK_NAME_PREFIX: &str = "Book Name: ";

/// A book identification returned by the matching service.
///
/// Only the title is interpreted. Everything else the service sends
/// (author, confidence, votes, candidates...) is kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookResult {
    /// Raw title as reported by the service (image search calls it `book`).
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookResult {
    /// Create a result with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// Interpret a decoded response body.
    ///
    /// A body with `"status": "fail"` is a service-side rejection and carries
    /// the service's `reason`. The title is `title` when that is a non-empty
    /// string, otherwise `book`; whichever key is not used stays in `extra`.
    /// A body with neither is malformed.
    pub fn from_response(body: Value) -> SearchResult<Self> {
        let Value::Object(mut fields) = body else {
            return Err(SearchError::Malformed(
                "expected a JSON object".to_string(),
            ));
        };

        if fields.get("status").and_then(Value::as_str) == Some("fail") {
            let reason = fields
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("No match found")
                .to_string();
            return Err(SearchError::NoMatch(reason));
        }

        let title = take_name(&mut fields, "title")
            .or_else(|| take_name(&mut fields, "book"))
            .ok_or_else(|| SearchError::Malformed("missing `title` or `book`".to_string()))?;

        Ok(Self {
            title,
            extra: fields,
        })
    }

    /// Passthrough field lookup.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// The title normalised for display.
    pub fn display_name(&self) -> String {
        format_book_name(&self.title)
    }

    /// The full line revealed to the user for this result.
    pub fn display_text(&self) -> String {
        format!("{}{}", BOOK_NAME_PREFIX, self.display_name())
    }
}

/// Normalise a raw book name for display.
///
/// Strips a trailing `.txt`, turns `_`/`-` runs into spaces and title-cases
/// each word.
///
/// Examples:
/// - "moby_dick.txt" -> "Moby Dick"
/// - "THE--ODYSSEY" -> "The Odyssey"
/// - "" -> ""
pub fn format_book_name(raw: &str) -> String {
    let stem = match raw.len().checked_sub(4) {
        Some(cut) if raw.is_char_boundary(cut) && raw[cut..].eq_ignore_ascii_case(".txt") => {
            &raw[..cut]
        }
        _ => raw,
    };

    stem.replace(['_', '-'], " ")
        .to_lowercase()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove `key` if it holds a non-blank string.
fn take_name(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        _ => return None,
    }
    match fields.remove(key) {
        Some(Value::String(name)) => Some(name),
        _ => None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
