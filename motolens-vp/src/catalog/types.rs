//! Catalog Pipeline Type Definitions
//!
//! Shared types for the VIN-to-parts resolution pipeline: identifiers,
//! decoded vehicle identity, catalog directory records, and the pipeline
//! error taxonomy.

use crate::catalog::gateway::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Catalog-internal manufacturer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManufacturerId(pub i64);

impl fmt::Display for ManufacturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog-internal model series identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSeriesId(pub i64);

impl fmt::Display for ModelSeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog-internal vehicle variant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub i64);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// VIN
// ============================================================================

/// A validated Vehicle Identification Number.
///
/// Construction via [`Vin::parse`] guarantees 17 characters from the VIN
/// alphabet (ASCII alphanumerics excluding I, O and Q), uppercased and
/// trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    pub fn parse(raw: &str) -> Result<Self, InvalidVin> {
        let vin = raw.trim().to_ascii_uppercase();
        if vin.len() != 17 {
            return Err(InvalidVin::Length(vin.len()));
        }
        if let Some(c) = vin
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() || matches!(c, 'I' | 'O' | 'Q'))
        {
            return Err(InvalidVin::Character(c));
        }
        Ok(Self(vin))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// VIN validation failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidVin {
    #[error("VIN must be exactly 17 characters, got {0}")]
    Length(usize),
    #[error("VIN contains character '{0}' outside the VIN alphabet")]
    Character(char),
}

// ============================================================================
// Decoded vehicle identity
// ============================================================================

/// Normalized result of a VIN decode, independent of which upstream
/// response shape produced it.
///
/// Only `make` is guaranteed; every other attribute is best-effort and may
/// be absent depending on what the decoder knew about the vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VinDecodeResult {
    pub vin: Vin,
    pub make: String,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub trim: Option<String>,
    pub engine_cylinders: Option<String>,
    pub displacement: Option<String>,
    pub drive_type: Option<String>,
    pub body_class: Option<String>,
    /// Catalog variant id carried by some decode responses; used to pin
    /// variant selection when it matches a catalogued variant
    pub variant_hint: Option<VariantId>,
}

// ============================================================================
// Catalog directory records
// ============================================================================

/// One entry in the catalog's manufacturer directory
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerCandidate {
    pub catalog_id: ManufacturerId,
    pub name: String,
}

/// One entry in a manufacturer's model series directory
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCandidate {
    pub catalog_id: ModelSeriesId,
    pub name: String,
    #[serde(default)]
    pub production_year_from: Option<i32>,
    #[serde(default)]
    pub production_year_to: Option<i32>,
}

/// A concrete vehicle variant (engine and drivetrain configuration) of a
/// model series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleVariant {
    pub variant_id: VariantId,
    pub manufacturer_name: String,
    pub model_name: String,
    pub engine_description: String,
}

/// One OEM article row as retrieved for a vehicle variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRecord {
    pub product_name: String,
    pub oem_number: String,
}

// ============================================================================
// Error taxonomy
// ============================================================================

/// Errors surfaced by the resolution pipeline.
///
/// The chain is strictly sequential; the first error aborts the run and is
/// mapped to an HTTP status at the API boundary.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Transport or provider failure talking to the catalog API
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The VIN decode response carried no usable vehicle identity
    #[error("VIN not recognized: {0}")]
    Normalization(String),

    /// No directory entry satisfied the manufacturer match cascade
    #[error("manufacturer \"{0}\" not found in catalog")]
    ManufacturerNotFound(String),

    /// No model series scored against the decoded model name
    #[error("no matching model series for manufacturer {manufacturer_id} (searched: {})", model.as_deref().unwrap_or("<any>"))]
    ModelNotFound {
        manufacturer_id: ManufacturerId,
        model: Option<String>,
    },

    /// The catalog lists no vehicle variants for the matched model series
    #[error("no vehicle variants catalogued for model series {0}")]
    NoVariants(ModelSeriesId),
}

/// Treat blank and whitespace-only strings as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
