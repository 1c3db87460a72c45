//! Test Helper Utilities
//!
//! Scripted catalog provider and canned payload builders for testing the
//! resolution pipeline without a live provider.

use async_trait::async_trait;
use motolens_vp::catalog::{CatalogFetch, CatalogPaths, GatewayError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Scripted response for one endpoint path
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Success with a JSON payload
    Payload(Value),
    /// Success with an empty or undecodable body
    Empty,
    /// Transport timeout
    Timeout,
    /// Provider error status
    HttpError(u16, String),
}

/// A scripted catalog provider. Unknown paths panic, so a test fails loudly
/// when the pipeline requests an endpoint the script did not expect.
#[derive(Debug, Default)]
pub struct StubCatalog {
    responses: HashMap<String, StubResponse>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: String, response: StubResponse) -> Self {
        self.responses.insert(path, response);
        self
    }
}

#[async_trait]
impl CatalogFetch for StubCatalog {
    async fn fetch(&self, path: &str) -> Result<Option<Value>, GatewayError> {
        match self.responses.get(path) {
            Some(StubResponse::Payload(value)) => Ok(Some(value.clone())),
            Some(StubResponse::Empty) => Ok(None),
            Some(StubResponse::Timeout) => Err(GatewayError::Timeout(Duration::from_secs(45))),
            Some(StubResponse::HttpError(status, body)) => Err(GatewayError::Http {
                status: *status,
                body: body.clone(),
            }),
            None => panic!("unscripted catalog path requested: {path}"),
        }
    }
}

/// Paths configured exactly as the default service configuration builds them
pub fn test_paths() -> CatalogPaths {
    CatalogPaths::new(4, 62, 1, "*")
}

/// Legacy-shape decode payload
pub fn legacy_decode(
    manufacturer: Option<&str>,
    model: &str,
    vehicle: Option<(i64, &str)>,
) -> Value {
    let manufacturers: Vec<Value> = manufacturer
        .into_iter()
        .map(|name| json!({ "name": name }))
        .collect();
    let vehicles: Vec<Value> = vehicle
        .into_iter()
        .map(|(id, name)| json!({ "vehicleId": id, "manufacturerName": name }))
        .collect();
    json!({
        "matchingManufacturers": manufacturers,
        "matchingModels": [{ "name": model }],
        "matchingVehicles": vehicles,
    })
}

/// Structured-shape decode payload with all three sub-documents intact
pub fn structured_decode(make: &str, model: &str, year: i32) -> Value {
    json!({
        "basic": json!({ "manufacturer": make, "modelYear": year }).to_string(),
        "detailed": json!({ "make": make, "model": model, "year": year }).to_string(),
        "manufacturer": json!({ "name": make }).to_string(),
    })
}

/// Manufacturer directory payload from (catalogId, name) pairs
pub fn manufacturers_payload(entries: &[(i64, &str)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(id, name)| json!({ "catalogId": id, "name": name }))
            .collect(),
    )
}

/// Model series directory payload from (catalogId, name, from, to) tuples
pub fn model_series_payload(entries: &[(i64, &str, Option<i32>, Option<i32>)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(id, name, from, to)| {
                json!({
                    "catalogId": id,
                    "name": name,
                    "productionYearFrom": from,
                    "productionYearTo": to,
                })
            })
            .collect(),
    )
}

/// Vehicle variant payload from (variantId, manufacturer, model, engine) tuples
pub fn variants_payload(entries: &[(i64, &str, &str, &str)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(id, manufacturer, model, engine)| {
                json!({
                    "variantId": id,
                    "manufacturerName": manufacturer,
                    "modelName": model,
                    "engineDescription": engine,
                })
            })
            .collect(),
    )
}

/// OEM article payload from (productName, oemNumber) pairs
pub fn articles_payload(entries: &[(&str, &str)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(product, oem)| json!({ "productName": product, "oemNumber": oem }))
            .collect(),
    )
}
