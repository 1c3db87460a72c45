//! VIN decode and response-shape normalization
//!
//! The decode endpoint answers in one of two historically observed shapes:
//!
//! - **Legacy**: flat arrays (`matchingManufacturers`, `matchingModels`,
//!   `matchingVehicles`) at the top level
//! - **Structured**: three JSON-encoded string sub-documents (`basic`,
//!   `detailed`, `manufacturer`), each of which may independently fail to
//!   parse
//!
//! Both normalize into one [`VinDecodeResult`]. Legacy is probed first; the
//! probe is a non-empty `matchingModels` array.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::catalog::gateway::{CatalogFetch, CatalogPaths};
use crate::catalog::types::{non_blank, ResolveError, VariantId, Vin, VinDecodeResult};

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyPayload {
    matching_manufacturers: Vec<LegacyManufacturerRow>,
    matching_models: Vec<LegacyModelRow>,
    matching_vehicles: Vec<LegacyVehicleRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyManufacturerRow {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyModelRow {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyVehicleRow {
    vehicle_id: Option<VariantId>,
    manufacturer_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StructuredPayload {
    basic: Option<String>,
    detailed: Option<String>,
    manufacturer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BasicInfo {
    manufacturer: Option<String>,
    model_year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DetailedInfo {
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    trim: Option<String>,
    engine_cylinders: Option<String>,
    displacement: Option<String>,
    drive_type: Option<String>,
    body_class: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ManufacturerInfo {
    name: Option<String>,
}

/// Upstream decode payload shape, probed legacy-first
#[derive(Debug)]
enum DecodeShape {
    Legacy(LegacyPayload),
    Structured(StructuredPayload),
}

fn detect_shape(payload: Value) -> DecodeShape {
    if let Ok(legacy) = serde_json::from_value::<LegacyPayload>(payload.clone()) {
        if !legacy.matching_models.is_empty() {
            return DecodeShape::Legacy(legacy);
        }
    }
    DecodeShape::Structured(serde_json::from_value(payload).unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a decode payload into a [`VinDecodeResult`].
///
/// Fails only when no make can be established from any shape element; every
/// other attribute degrades to absence.
pub fn normalize(vin: &Vin, payload: Value) -> Result<VinDecodeResult, ResolveError> {
    match detect_shape(payload) {
        DecodeShape::Legacy(legacy) => normalize_legacy(vin, legacy),
        DecodeShape::Structured(structured) => normalize_structured(vin, structured),
    }
}

fn normalize_legacy(vin: &Vin, payload: LegacyPayload) -> Result<VinDecodeResult, ResolveError> {
    let make = payload
        .matching_manufacturers
        .first()
        .and_then(|m| non_blank(m.name.clone()))
        .or_else(|| {
            payload
                .matching_vehicles
                .first()
                .and_then(|v| non_blank(v.manufacturer_name.clone()))
        })
        .ok_or_else(|| ResolveError::Normalization("make not identifiable".to_string()))?;

    let model = payload
        .matching_models
        .first()
        .and_then(|m| non_blank(m.name.clone()));
    let variant_hint = payload.matching_vehicles.first().and_then(|v| v.vehicle_id);

    Ok(VinDecodeResult {
        vin: vin.clone(),
        make,
        model,
        year: None,
        trim: None,
        engine_cylinders: None,
        displacement: None,
        drive_type: None,
        body_class: None,
        variant_hint,
    })
}

fn normalize_structured(
    vin: &Vin,
    payload: StructuredPayload,
) -> Result<VinDecodeResult, ResolveError> {
    let basic: BasicInfo = parse_subdocument(payload.basic.as_deref(), "basic");
    let detailed: DetailedInfo = parse_subdocument(payload.detailed.as_deref(), "detailed");
    let manufacturer: ManufacturerInfo =
        parse_subdocument(payload.manufacturer.as_deref(), "manufacturer");

    let make = non_blank(detailed.make)
        .or_else(|| non_blank(basic.manufacturer))
        .or_else(|| non_blank(manufacturer.name))
        .ok_or_else(|| ResolveError::Normalization("make not identifiable".to_string()))?;

    Ok(VinDecodeResult {
        vin: vin.clone(),
        make,
        model: non_blank(detailed.model),
        year: detailed.year.or(basic.model_year),
        trim: non_blank(detailed.trim),
        engine_cylinders: non_blank(detailed.engine_cylinders),
        displacement: non_blank(detailed.displacement),
        drive_type: non_blank(detailed.drive_type),
        body_class: non_blank(detailed.body_class),
        variant_hint: None,
    })
}

/// Parse one JSON-encoded sub-document. Absent or undecodable
/// sub-documents degrade to the shape's empty value.
fn parse_subdocument<T>(raw: Option<&str>, label: &str) -> T
where
    T: Default + serde::de::DeserializeOwned,
{
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(
                subdocument = label,
                error = %e,
                "decode sub-document failed to parse, treating as absent"
            );
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder component
// ---------------------------------------------------------------------------

/// Fetches and normalizes VIN decode responses
#[derive(Clone)]
pub struct VinDecoder {
    catalog: Arc<dyn CatalogFetch>,
    paths: CatalogPaths,
}

impl VinDecoder {
    pub fn new(catalog: Arc<dyn CatalogFetch>, paths: CatalogPaths) -> Self {
        Self { catalog, paths }
    }

    /// Decode a VIN against the catalog provider.
    ///
    /// An empty provider response means the VIN is unknown to the decoder,
    /// which surfaces as a normalization failure rather than a gateway one.
    pub async fn decode(&self, vin: &Vin) -> Result<VinDecodeResult, ResolveError> {
        let payload = self.catalog.fetch(&self.paths.vin_decode(vin)).await?;
        let Some(payload) = payload else {
            return Err(ResolveError::Normalization(
                "decoder returned no data".to_string(),
            ));
        };
        let decoded = normalize(vin, payload)?;
        tracing::info!(
            vin = %vin,
            make = %decoded.make,
            model = ?decoded.model,
            year = ?decoded.year,
            "VIN decoded"
        );
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vin() -> Vin {
        Vin::parse("WBA3A5C51CF256987").unwrap()
    }

    #[test]
    fn legacy_shape_maps_directly() {
        let payload = json!({
            "matchingManufacturers": [{"name": "BMW"}],
            "matchingModels": [{"name": "3 Series"}],
            "matchingVehicles": [{"vehicleId": 19044, "manufacturerName": "BMW"}]
        });
        let decoded = normalize(&vin(), payload).unwrap();
        assert_eq!(decoded.make, "BMW");
        assert_eq!(decoded.model.as_deref(), Some("3 Series"));
        assert_eq!(decoded.variant_hint, Some(VariantId(19044)));
        assert_eq!(decoded.year, None);
    }

    #[test]
    fn legacy_make_falls_back_to_vehicle_row() {
        let payload = json!({
            "matchingManufacturers": [],
            "matchingModels": [{"name": "Golf"}],
            "matchingVehicles": [{"vehicleId": 7, "manufacturerName": "VW"}]
        });
        let decoded = normalize(&vin(), payload).unwrap();
        assert_eq!(decoded.make, "VW");
    }

    #[test]
    fn empty_matching_models_routes_to_structured() {
        // Legacy keys present but matchingModels empty: not the legacy shape
        let payload = json!({
            "matchingManufacturers": [{"name": "BMW"}],
            "matchingModels": [],
            "matchingVehicles": []
        });
        let err = normalize(&vin(), payload).unwrap_err();
        assert!(matches!(err, ResolveError::Normalization(_)));
    }

    #[test]
    fn structured_shape_merges_sub_documents() {
        let payload = json!({
            "basic": r#"{"manufacturer": "BMW", "modelYear": 2012}"#,
            "detailed": r#"{"make": "BMW", "model": "328i", "year": 2012, "trim": "Sport", "engineCylinders": "4", "displacement": "2.0L", "driveType": "RWD", "bodyClass": "Sedan"}"#,
            "manufacturer": r#"{"name": "Bayerische Motoren Werke"}"#
        });
        let decoded = normalize(&vin(), payload).unwrap();
        assert_eq!(decoded.make, "BMW");
        assert_eq!(decoded.model.as_deref(), Some("328i"));
        assert_eq!(decoded.year, Some(2012));
        assert_eq!(decoded.trim.as_deref(), Some("Sport"));
        assert_eq!(decoded.engine_cylinders.as_deref(), Some("4"));
        assert_eq!(decoded.drive_type.as_deref(), Some("RWD"));
        assert_eq!(decoded.body_class.as_deref(), Some("Sedan"));
        assert_eq!(decoded.variant_hint, None);
    }

    #[test]
    fn detailed_takes_precedence_over_basic_and_manufacturer() {
        let payload = json!({
            "basic": r#"{"manufacturer": "Bayerische Motoren Werke", "modelYear": 2011}"#,
            "detailed": r#"{"make": "BMW", "year": 2012}"#,
            "manufacturer": r#"{"name": "BMW AG"}"#
        });
        let decoded = normalize(&vin(), payload).unwrap();
        assert_eq!(decoded.make, "BMW");
        assert_eq!(decoded.year, Some(2012));
    }

    #[test]
    fn corrupt_detailed_degrades_to_basic() {
        let payload = json!({
            "basic": r#"{"manufacturer": "Mercedes-Benz", "modelYear": 2019}"#,
            "detailed": "{not json",
            "manufacturer": r#"{"name": "Daimler"}"#
        });
        let decoded = normalize(&vin(), payload).unwrap();
        assert_eq!(decoded.make, "Mercedes-Benz");
        assert_eq!(decoded.year, Some(2019));
        assert_eq!(decoded.model, None);
    }

    #[test]
    fn manufacturer_name_is_the_last_resort() {
        let payload = json!({
            "basic": "{broken",
            "detailed": "{broken",
            "manufacturer": r#"{"name": "Audi"}"#
        });
        let decoded = normalize(&vin(), payload).unwrap();
        assert_eq!(decoded.make, "Audi");
        assert_eq!(decoded.year, None);
    }

    #[test]
    fn all_sub_documents_corrupt_is_a_normalization_error() {
        let payload = json!({
            "basic": "{broken",
            "detailed": "{broken",
            "manufacturer": "{broken"
        });
        let err = normalize(&vin(), payload).unwrap_err();
        assert!(matches!(err, ResolveError::Normalization(_)));
    }

    #[test]
    fn blank_make_fields_are_treated_as_absent() {
        let payload = json!({
            "basic": r#"{"manufacturer": "  "}"#,
            "detailed": r#"{"make": ""}"#,
            "manufacturer": r#"{"name": "Porsche"}"#
        });
        let decoded = normalize(&vin(), payload).unwrap();
        assert_eq!(decoded.make, "Porsche");
    }

    #[test]
    fn unrecognized_payload_is_a_normalization_error() {
        let err = normalize(&vin(), json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, ResolveError::Normalization(_)));
    }
}
