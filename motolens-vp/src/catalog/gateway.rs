//! Catalog provider HTTP gateway
//!
//! Single access point for the external vehicle catalog API. Every pipeline
//! component fetches through [`CatalogFetch`], which keeps the transport
//! swappable in tests and confines auth headers, timeouts and payload
//! sanitation to one place.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::types::{ManufacturerId, ModelSeriesId, VariantId, Vin};

const USER_AGENT: &str = "MotoLens/0.1.0 (https://github.com/motolens/motolens)";

/// Longest response-body prefix carried into errors and log records
const BODY_PREFIX_LIMIT: usize = 256;

/// Catalog gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("catalog endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("catalog request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),
}

/// Fetch abstraction over the catalog provider.
///
/// `Ok(None)` means the provider answered with a success status but no
/// usable payload (empty or undecodable body). Callers treat that as an
/// empty directory, not a failure.
#[async_trait]
pub trait CatalogFetch: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Option<Value>, GatewayError>;
}

/// HTTP gateway to the catalog provider behind the RapidAPI facade
pub struct CatalogGateway {
    http_client: reqwest::Client,
    base_url: String,
    api_host: String,
    api_key: String,
    timeout: Duration,
}

impl CatalogGateway {
    pub fn new(
        base_url: &str,
        api_host: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_host: api_host.to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl CatalogFetch for CatalogGateway {
    async fn fetch(&self, path: &str) -> Result<Option<Value>, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(endpoint = %path, "querying catalog provider");

        let response = self
            .http_client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, self.timeout))?;

        if !status.is_success() {
            tracing::warn!(
                endpoint = %path,
                status = status.as_u16(),
                body = %body_prefix(&body),
                "catalog endpoint returned error status"
            );
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body: body_prefix(&body).to_string(),
            });
        }

        tracing::debug!(
            endpoint = %path,
            status = status.as_u16(),
            body = %body_prefix(&body),
            "catalog endpoint responded"
        );
        Ok(parse_payload(path, &body))
    }
}

fn classify_transport_error(err: reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(timeout)
    } else {
        GatewayError::Network(err.to_string())
    }
}

/// Decode a success body to JSON. The provider is known to emit blank and
/// truncated payloads under load; those decode to `None` rather than an
/// error.
fn parse_payload(endpoint: &str, body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                endpoint,
                error = %e,
                body = %body_prefix(body),
                "catalog payload is not valid JSON, treating as no data"
            );
            None
        }
    }
}

/// Bounded, UTF-8-safe body prefix for diagnostics
fn body_prefix(body: &str) -> &str {
    if body.len() <= BODY_PREFIX_LIMIT {
        return body;
    }
    let mut end = BODY_PREFIX_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Decode an endpoint payload that should be a JSON array of rows.
///
/// Absent payloads decode to an empty list. Rows that do not match the
/// expected shape are dropped with a warning; the provider's directories
/// are treated as sparse, not fatal.
pub(crate) fn decode_rows<T: DeserializeOwned>(payload: Option<Value>, endpoint: &str) -> Vec<T> {
    let rows = match payload {
        None => return Vec::new(),
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            tracing::warn!(endpoint, "catalog payload is not an array, treating as empty");
            return Vec::new();
        }
    };

    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    if decoded.len() < total {
        tracing::warn!(
            endpoint,
            dropped = total - decoded.len(),
            "dropped catalog rows with unexpected shape"
        );
    }
    decoded
}

/// Endpoint path construction for the catalog provider.
///
/// Paths embed the query parameters the provider models as path segments
/// (language, country filter, vehicle class).
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub lang_id: u32,
    pub country_filter_id: u32,
    pub type_id: u32,
    pub search_param: String,
}

impl CatalogPaths {
    pub fn new(lang_id: u32, country_filter_id: u32, type_id: u32, search_param: &str) -> Self {
        Self {
            lang_id,
            country_filter_id,
            type_id,
            search_param: search_param.to_string(),
        }
    }

    pub fn vin_decode(&self, vin: &Vin) -> String {
        format!("/vin/check-vin/{}", vin)
    }

    pub fn manufacturers(&self) -> String {
        format!(
            "/manufacturers/type-id/{}/lang-id/{}/country-filter-id/{}",
            self.type_id, self.lang_id, self.country_filter_id
        )
    }

    pub fn model_series(&self, manufacturer: ManufacturerId) -> String {
        format!(
            "/model-series/manufacturer-id/{}/type-id/{}/lang-id/{}/country-filter-id/{}",
            manufacturer, self.type_id, self.lang_id, self.country_filter_id
        )
    }

    pub fn vehicle_types(&self, model_series: ModelSeriesId) -> String {
        format!(
            "/types/type-id/{}/list-vehicles-id/{}/lang-id/{}/country-filter-id/{}",
            self.type_id, model_series, self.lang_id, self.country_filter_id
        )
    }

    pub fn articles_oem(&self, variant: VariantId) -> String {
        format!(
            "/articles-oem/search/type-id/{}/vehicle-id/{}/lang-id/{}/search-param/{}",
            self.type_id, variant, self.lang_id, self.search_param
        )
    }
}
