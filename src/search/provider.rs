//! Search backend trait and error taxonomy.
//!
//! Every way of reaching the matching service implements `BookSearch`, so the
//! application can swap the HTTP client for an in-memory fake in tests.

use async_trait::async_trait;
use thiserror::Error;

use super::BookResult;
use crate::capture::ImageHandle;

/// Trait for book search backends.
///
/// Both calls make a single attempt. There is no retry, timeout or cache at
/// this layer; the caller decides what a failure means.
///
/// # Example
///
/// ```ignore
/// use leaflens_cli::search::{BookSearch, HttpSearchClient};
///
/// async fn lookup(search: &dyn BookSearch) {
///     match search.search_by_text("Call me Ishmael").await {
///         Ok(book) => println!("{}", book.display_text()),
///         Err(e) => eprintln!("{}", e),
///     }
/// }
/// ```
#[async_trait]
pub trait BookSearch: Send + Sync {
    /// Identify a book from a text snippet.
    async fn search_by_text(&self, text: &str) -> SearchResult<BookResult>;

    /// Identify a book from a photographed page.
    ///
    /// Takes ownership of the image; its bytes are released once the call
    /// completes or fails.
    async fn search_by_image(&self, image: ImageHandle) -> SearchResult<BookResult>;

    /// Human-readable description of where searches go.
    fn endpoint(&self) -> &str;
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport unreachable or interrupted.
    Network,
    /// The service answered, but not with a usable identification.
    Service,
}

/// Errors that can occur while searching.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// Connection refused, reset, timed out at the OS level, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// The service returned a non-success status.
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The service answered but could not identify the book.
    #[error("No match: {0}")]
    NoMatch(String),

    /// The response body could not be interpreted.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl SearchError {
    /// Map onto the two-level network/service taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Service { .. } | Self::NoMatch(_) | Self::Malformed(_) => ErrorKind::Service,
        }
    }

    /// Short text suitable for the conversation view.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "The search service is unreachable.".to_string(),
            Self::Service { status, .. } => format!("The search service failed ({}).", status),
            Self::NoMatch(reason) => reason.clone(),
            Self::Malformed(_) => "The search service sent an unreadable answer.".to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network("Request timed out".to_string())
        } else if err.is_connect() {
            Self::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Service {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}
