//! HTTP client for the spreadsheet web-app backend.
//!
//! # Architecture
//!
//! - One GET/POST surface shared by catalog synchronization and order
//!   submission; both talk to the same endpoint
//! - POST bodies are JSON but travel as `Content-Type: text/plain` - a
//!   simple content type keeps browser-origin deployments of this protocol
//!   outside CORS preflight, and the backend parses the raw body itself
//! - No retries here; callers decide whether a failure degrades (catalog)
//!   or surfaces as an unconfirmed outcome (orders)

pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::StoreConfig;
use types::{
    AddProductRequest, OrderRequest, PingEnvelope, ProductRow, ProductsEnvelope, STATUS_ERROR,
    STATUS_SUCCESS, SubmitEnvelope,
};

/// Errors from the backend HTTP surface.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a usable response (DNS failure, connection
    /// refused, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived with a non-success HTTP status.
    #[error("unexpected HTTP status: {0}")]
    HttpStatus(StatusCode),

    /// The body could not be parsed as the expected envelope.
    #[error("unparseable response body: {0}")]
    Parse(String),

    /// A well-formed envelope reporting `status:"error"`.
    #[error("backend error: {0}")]
    Server(String),
}

/// Client for the spreadsheet web-app backend.
///
/// Cheaply cloneable; one `reqwest` client per process with the configured
/// request timeout applied to every call.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StoreConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                endpoint: config.endpoint.clone(),
            }),
        })
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch the product listing rows (primary JSON tier).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, a body that
    /// is not the `{status, products}` envelope, or an error envelope.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<ProductRow>, BackendError> {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut().append_pair("action", "get_products");

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::HttpStatus(status));
        }

        let body = response.text().await?;
        let envelope: ProductsEnvelope =
            serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))?;

        if envelope.status == STATUS_ERROR {
            return Err(BackendError::Server(
                envelope.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        envelope
            .products
            .ok_or_else(|| BackendError::Parse("envelope has no products".to_string()))
    }

    /// Fetch the published CSV export (fallback tier) as raw text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    #[instrument(skip(self))]
    pub async fn get_csv_export(&self) -> Result<String, BackendError> {
        let url = csv_export_url(&self.inner.endpoint);

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::HttpStatus(status));
        }

        Ok(response.text().await?)
    }

    /// POST an order and parse the response envelope.
    ///
    /// The HTTP status is deliberately not inspected: the backend answers
    /// every request with 200 and encodes failure in the envelope, so only
    /// the body decides the outcome. Callers interpret the returned
    /// envelope (or error) into a definite submission state.
    ///
    /// # Errors
    ///
    /// `Transport` when the POST never resolves, `Parse` when the body is
    /// not a `{status, ...}` envelope.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn post_order(&self, order: &OrderRequest) -> Result<SubmitEnvelope, BackendError> {
        self.post_text_plain(order).await
    }

    /// POST a new catalog product (admin path).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, an unparseable body, or an
    /// error envelope.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn add_product(&self, product: &AddProductRequest) -> Result<(), BackendError> {
        let envelope = self.post_text_plain(product).await?;
        if envelope.status == STATUS_SUCCESS {
            Ok(())
        } else {
            Err(BackendError::Server(
                envelope.message.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    /// Check that the backend is reachable and answering.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or an
    /// unparseable body.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<PingEnvelope, BackendError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::HttpStatus(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Shared POST path: JSON body under a preflight-free content type.
    async fn post_text_plain<T: serde::Serialize>(
        &self,
        payload: &T,
    ) -> Result<SubmitEnvelope, BackendError> {
        let body =
            serde_json::to_string(payload).map_err(|e| BackendError::Parse(e.to_string()))?;

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

/// Derive the published-CSV export URL from the web-app endpoint.
///
/// The spreadsheet behind the web app publishes a CSV export at a sibling
/// path: the `/exec` suffix is dropped, the first `/macros/s/` segment
/// becomes `/d/e/`, and the standard publish query is appended.
#[must_use]
pub fn csv_export_url(endpoint: &Url) -> String {
    let base = endpoint.as_str().replacen("/exec", "", 1);
    let base = base.replacen("/macros/s/", "/d/e/", 1);
    format!("{base}/pub?gid=0&single=true&output=csv")
}
