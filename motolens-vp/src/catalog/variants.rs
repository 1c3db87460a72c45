//! Vehicle variant listing and selection
//!
//! A model series fans out into concrete variants (engine and drivetrain
//! configurations). The provider repeats variant rows under different row
//! contexts, so listing dedups by variant id, first occurrence wins.

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::gateway::{decode_rows, CatalogFetch, CatalogPaths};
use crate::catalog::types::{ModelSeriesId, ResolveError, VariantId, VehicleVariant};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantRow {
    variant_id: VariantId,
    manufacturer_name: String,
    model_name: String,
    #[serde(default)]
    engine_description: String,
}

impl From<VariantRow> for VehicleVariant {
    fn from(row: VariantRow) -> Self {
        Self {
            variant_id: row.variant_id,
            manufacturer_name: row.manufacturer_name,
            model_name: row.model_name,
            engine_description: row.engine_description,
        }
    }
}

/// Lists and selects vehicle variants for a model series
#[derive(Clone)]
pub struct VariantSelector {
    catalog: Arc<dyn CatalogFetch>,
    paths: CatalogPaths,
}

impl VariantSelector {
    pub fn new(catalog: Arc<dyn CatalogFetch>, paths: CatalogPaths) -> Self {
        Self { catalog, paths }
    }

    /// List the deduplicated variants of a model series in catalog order.
    pub async fn list_variants(
        &self,
        model_series: ModelSeriesId,
    ) -> Result<Vec<VehicleVariant>, ResolveError> {
        let payload = self
            .catalog
            .fetch(&self.paths.vehicle_types(model_series))
            .await?;
        let rows: Vec<VariantRow> = decode_rows(payload, "types");
        let variants = dedup_variants(rows.into_iter().map(VehicleVariant::from).collect());
        tracing::debug!(
            model_series = %model_series,
            variants = variants.len(),
            "vehicle variants listed"
        );
        Ok(variants)
    }
}

/// Keep the first occurrence of each variant id, preserving order.
pub fn dedup_variants(variants: Vec<VehicleVariant>) -> Vec<VehicleVariant> {
    let mut seen = HashSet::new();
    variants
        .into_iter()
        .filter(|v| seen.insert(v.variant_id))
        .collect()
}

/// Select the variant to resolve parts for.
///
/// A decode hint that matches a catalogued variant pins the selection;
/// otherwise the first candidate stands in. `None` only for an empty list.
pub fn select_best(variants: &[VehicleVariant], hint: Option<VariantId>) -> Option<&VehicleVariant> {
    if let Some(hint) = hint {
        if let Some(exact) = variants.iter().find(|v| v.variant_id == hint) {
            return Some(exact);
        }
    }
    variants.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: i64, engine: &str) -> VehicleVariant {
        VehicleVariant {
            variant_id: VariantId(id),
            manufacturer_name: "BMW".to_string(),
            model_name: "3 Series".to_string(),
            engine_description: engine.to_string(),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let variants = vec![
            variant(1, "320i 135kW"),
            variant(2, "328i 180kW"),
            variant(1, "320i duplicate"),
            variant(3, "335i 225kW"),
        ];
        let deduped = dedup_variants(variants);
        assert_eq!(
            deduped.iter().map(|v| v.variant_id.0).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(deduped[0].engine_description, "320i 135kW");
    }

    #[test]
    fn matching_hint_pins_selection() {
        let variants = vec![variant(1, "320i"), variant(2, "328i"), variant(3, "335i")];
        let selected = select_best(&variants, Some(VariantId(2))).unwrap();
        assert_eq!(selected.variant_id, VariantId(2));
    }

    #[test]
    fn unmatched_hint_falls_back_to_first() {
        let variants = vec![variant(1, "320i"), variant(2, "328i")];
        let selected = select_best(&variants, Some(VariantId(99))).unwrap();
        assert_eq!(selected.variant_id, VariantId(1));
    }

    #[test]
    fn no_hint_selects_first() {
        let variants = vec![variant(7, "118d"), variant(8, "120d")];
        let selected = select_best(&variants, None).unwrap();
        assert_eq!(selected.variant_id, VariantId(7));
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(select_best(&[], Some(VariantId(1))).is_none());
        assert!(select_best(&[], None).is_none());
    }
}
