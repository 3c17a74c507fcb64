use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::models::gigs::CreateGig;
use crate::models::listings::Listing;

/// Listings requested per page; the server caps `limit` at the same value.
const LISTING_FETCH_LIMIT: u64 = 100;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A local image picked in the submission form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads an image from disk, guessing its content type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let content_type = guess_content_type(&file_name).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// The backend endpoints the marketplace page talks to.
///
/// The submission flow only needs `upload_image` and `create_gig`; tests
/// provide an in-memory implementation that records calls.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// `POST /api/upload`. Returns the stored image URL.
    async fn upload_image(&self, image: &ImageFile) -> Result<String, ApiError>;

    /// `POST /api/gigs`. Any 2xx response counts as created.
    async fn create_gig(&self, gig: &CreateGig) -> Result<(), ApiError>;

    /// `GET /api/gigs`, every page of it. Active listings, newest first.
    async fn list_gigs(&self) -> Result<Vec<Listing>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// [`MarketplaceApi`] over HTTP, authenticated with the wallet session token.
#[derive(Clone)]
pub struct HttpMarketplaceApi {
    client: reqwest::Client,
    base_url: String,
    session_token: Option<String>,
}

impl HttpMarketplaceApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.session_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// One page of `GET /api/gigs`.
    async fn list_page(&self, page: u64) -> Result<Vec<Listing>, ApiError> {
        let response = self
            .request(reqwest::Method::GET, "/api/gigs")
            .query(&[("page", page), ("limit", LISTING_FETCH_LIMIT)])
            .send()
            .await?;
        ensure_success(response)?
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn upload_image(&self, image: &ImageFile) -> Result<String, ApiError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .request(reqwest::Method::POST, "/api/upload")
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = ensure_success(response)?
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        if body.url.trim().is_empty() {
            return Err(ApiError::Malformed("empty upload url".to_string()));
        }
        Ok(body.url)
    }

    async fn create_gig(&self, gig: &CreateGig) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::POST, "/api/gigs")
            .json(gig)
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }

    async fn list_gigs(&self) -> Result<Vec<Listing>, ApiError> {
        let mut listings: Vec<Listing> = Vec::new();
        let mut page: u64 = 1;

        loop {
            let batch = self.list_page(page).await?;
            let fetched = batch.len();
            // A server that ignores `page` would hand back the same rows forever.
            if let Some(first) = batch.first() {
                if listings.iter().any(|l| l.id == first.id) {
                    warn!("Listing page {page} repeats earlier rows; stopping");
                    break;
                }
            }
            listings.extend(batch);

            if (fetched as u64) < LISTING_FETCH_LIMIT {
                break;
            }
            page += 1;
        }

        Ok(listings)
    }
}
