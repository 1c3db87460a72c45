//! VIN resolution endpoints
//!
//! The decode endpoint answers with the normalized vehicle identity only;
//! the parts endpoint runs the full resolution chain.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::catalog::{Vin, VinDecodeResult, VinPartsResolution};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /vin/:vin
///
/// Decode a VIN into its normalized vehicle identity without touching the
/// catalog directories.
pub async fn decode_vin(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> ApiResult<Json<VinDecodeResult>> {
    let vin = parse_vin(&vin)?;
    match state.pipeline.decode_vin(&vin).await {
        Ok(decoded) => Ok(Json(decoded)),
        Err(err) => {
            state.record_error(err.to_string()).await;
            Err(err.into())
        }
    }
}

/// GET /vin/:vin/parts
///
/// Resolve a VIN all the way to its grouped OEM parts.
pub async fn resolve_parts(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> ApiResult<Json<VinPartsResolution>> {
    let vin = parse_vin(&vin)?;
    match state.pipeline.resolve_vin_to_parts(&vin).await {
        Ok(resolution) => Ok(Json(resolution)),
        Err(err) => {
            state.record_error(err.to_string()).await;
            Err(err.into())
        }
    }
}

fn parse_vin(raw: &str) -> Result<Vin, ApiError> {
    Vin::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Build VIN resolution routes
pub fn vin_routes() -> Router<AppState> {
    Router::new()
        .route("/vin/:vin", get(decode_vin))
        .route("/vin/:vin/parts", get(resolve_parts))
}
