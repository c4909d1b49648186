//! HTTP client for the remote matching service.
//!
//! Two endpoints:
//! - `POST {api_base}/text-search` with a JSON body `{"text": ...}`
//! - `POST {api_base}/image-search` with a multipart form field `file`

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::Serialize;
use serde_json::Value;

use super::{BookResult, BookSearch, SearchError, SearchResult};
use crate::capture::ImageHandle;
use crate::config::ServiceConfig;

/// Default matching service address.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const OCTET_STREAM: &str = "application/octet-stream";

/// Request body for text search.
#[derive(Debug, Serialize)]
struct TextSearchRequest<'a> {
    text: &'a str,
}

/// reqwest-backed search client.
#[derive(Clone)]
pub struct HttpSearchClient {
    client: Client,
    api_base: String,
}

impl HttpSearchClient {
    /// Create a client for the given service base URL.
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        let api_base = if api_base.trim().is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            api_base.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::new(),
            api_base,
        }
    }

    /// Create a client from the `[service]` config section.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.api_base.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }
}

#[async_trait]
impl BookSearch for HttpSearchClient {
    async fn search_by_text(&self, text: &str) -> SearchResult<BookResult> {
        let response = self
            .client
            .post(self.url("text-search"))
            .json(&TextSearchRequest { text })
            .send()
            .await?;

        decode(response).await
    }

    async fn search_by_image(&self, image: ImageHandle) -> SearchResult<BookResult> {
        let ImageHandle {
            file_name,
            mime,
            bytes,
        } = image;

        let mime = upload_mime(&mime);
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| SearchError::Malformed(format!("Invalid image type {}: {}", mime, e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("image-search"))
            .multipart(form)
            .send()
            .await?;

        decode(response).await
    }

    fn endpoint(&self) -> &str {
        &self.api_base
    }
}

/// The content type sent with an upload; unparseable guesses become octet-stream.
fn upload_mime(mime: &str) -> &str {
    match mime.parse::<mime_guess::Mime>() {
        Ok(_) => mime,
        Err(_) => OCTET_STREAM,
    }
}

/// Turn an HTTP response into a `BookResult` or a typed failure.
async fn decode(response: Response) -> SearchResult<BookResult> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(SearchError::Service {
            status: status.as_u16(),
            message: body,
        });
    }

    let value: Value =
        serde_json::from_str(&body).map_err(|e| SearchError::Malformed(e.to_string()))?;
    BookResult::from_response(value)
}
