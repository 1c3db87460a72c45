//! VIN-to-parts resolution pipeline
//!
//! Chains the four catalog lookups into one strict forward pass:
//!
//! ```text
//! VIN decode -> manufacturer match -> model match -> variant selection -> parts
//! ```
//!
//! Each stage consumes the previous stage's output. The first failure
//! aborts the run; there are no retries and no partial results.

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::decode::VinDecoder;
use crate::catalog::gateway::{CatalogFetch, CatalogPaths};
use crate::catalog::parts::{PartCategoryGroup, PartsRetriever};
use crate::catalog::resolver::{IdentityResolver, ManufacturerMatch};
use crate::catalog::types::{ResolveError, VehicleVariant, Vin, VinDecodeResult};
use crate::catalog::variants::{select_best, VariantSelector};

/// Complete resolution of a VIN down to its OEM parts
#[derive(Debug, Clone, Serialize)]
pub struct VinPartsResolution {
    pub vin: Vin,
    pub manufacturer: ManufacturerMatch,
    pub model_name: String,
    /// True when the model was a first-entry fallback rather than a scored
    /// match against a decoded model name
    pub model_fallback: bool,
    pub selected_variant: VehicleVariant,
    pub available_variants: Vec<VehicleVariant>,
    pub parts: Vec<PartCategoryGroup>,
    /// Count of retrieved article rows before grouping
    pub total_parts: usize,
}

/// The resolution pipeline, cheap to clone and share across handlers
#[derive(Clone)]
pub struct VinPartsPipeline {
    decoder: VinDecoder,
    resolver: IdentityResolver,
    variants: VariantSelector,
    parts: PartsRetriever,
}

impl VinPartsPipeline {
    pub fn new(catalog: Arc<dyn CatalogFetch>, paths: CatalogPaths) -> Self {
        Self {
            decoder: VinDecoder::new(Arc::clone(&catalog), paths.clone()),
            resolver: IdentityResolver::new(Arc::clone(&catalog), paths.clone()),
            variants: VariantSelector::new(Arc::clone(&catalog), paths.clone()),
            parts: PartsRetriever::new(catalog, paths),
        }
    }

    /// Decode a VIN without resolving it further.
    pub async fn decode_vin(&self, vin: &Vin) -> Result<VinDecodeResult, ResolveError> {
        self.decoder.decode(vin).await
    }

    /// Resolve a VIN all the way to its grouped OEM parts.
    pub async fn resolve_vin_to_parts(
        &self,
        vin: &Vin,
    ) -> Result<VinPartsResolution, ResolveError> {
        let decoded = self.decoder.decode(vin).await?;
        let manufacturer = self.resolver.resolve_manufacturer(&decoded.make).await?;
        let model = self
            .resolver
            .resolve_model(manufacturer.catalog_id, decoded.model.as_deref(), decoded.year)
            .await?;
        let available_variants = self.variants.list_variants(model.catalog_id).await?;
        let selected_variant = select_best(&available_variants, decoded.variant_hint)
            .cloned()
            .ok_or(ResolveError::NoVariants(model.catalog_id))?;
        let parts = self.parts.get_parts(selected_variant.variant_id).await?;

        tracing::info!(
            vin = %vin,
            manufacturer = %manufacturer.name,
            model = %model.name,
            variant = %selected_variant.variant_id,
            total_parts = parts.total_parts,
            "VIN resolved to parts"
        );

        Ok(VinPartsResolution {
            vin: vin.clone(),
            manufacturer,
            model_name: model.name,
            model_fallback: model.fallback,
            selected_variant,
            available_variants,
            parts: parts.groups,
            total_parts: parts.total_parts,
        })
    }
}
