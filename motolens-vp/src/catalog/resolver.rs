//! Manufacturer and model series resolution
//!
//! Maps the decoded vehicle identity onto catalog-internal identifiers.
//! Manufacturer matching is a strict three-tier cascade; model matching is
//! scored. Neither guesses: a search that satisfies no rule is a miss, even
//! when a near-identical directory entry exists.

use std::sync::Arc;

use crate::catalog::gateway::{decode_rows, CatalogFetch, CatalogPaths};
use crate::catalog::types::{
    ManufacturerCandidate, ManufacturerId, ModelCandidate, ModelSeriesId, ResolveError,
};

const SCORE_EXACT: i32 = 100;
const SCORE_PREFIX: i32 = 70;
const SCORE_SUBSTRING: i32 = 50;
const YEAR_BONUS: i32 = 20;

/// Similarity floor for the near-miss diagnostic log
const NEAR_MISS_THRESHOLD: f64 = 0.8;

/// Resolved manufacturer
#[derive(Debug, Clone, serde::Serialize)]
pub struct ManufacturerMatch {
    pub catalog_id: ManufacturerId,
    pub name: String,
}

/// Resolved model series
#[derive(Debug, Clone)]
pub struct ModelMatch {
    pub catalog_id: ModelSeriesId,
    pub name: String,
    /// True when no model name was decoded and the first directory entry
    /// stood in for a scored match
    pub fallback: bool,
}

/// Resolves decoded vehicle identity against the catalog directories
#[derive(Clone)]
pub struct IdentityResolver {
    catalog: Arc<dyn CatalogFetch>,
    paths: CatalogPaths,
}

impl IdentityResolver {
    pub fn new(catalog: Arc<dyn CatalogFetch>, paths: CatalogPaths) -> Self {
        Self { catalog, paths }
    }

    /// Find the catalog manufacturer for a decoded make name.
    pub async fn resolve_manufacturer(
        &self,
        make: &str,
    ) -> Result<ManufacturerMatch, ResolveError> {
        let payload = self.catalog.fetch(&self.paths.manufacturers()).await?;
        let candidates: Vec<ManufacturerCandidate> = decode_rows(payload, "manufacturers");

        match match_manufacturer(&candidates, make) {
            Some(hit) => {
                tracing::info!(
                    search = %make,
                    matched = %hit.name,
                    catalog_id = %hit.catalog_id,
                    "manufacturer resolved"
                );
                Ok(ManufacturerMatch {
                    catalog_id: hit.catalog_id,
                    name: hit.name.clone(),
                })
            }
            None => {
                log_nearest_miss(&candidates, make);
                Err(ResolveError::ManufacturerNotFound(make.to_string()))
            }
        }
    }

    /// Find the catalog model series for a decoded model name.
    ///
    /// Without a decoded name the first directory entry is returned with the
    /// fallback flag set, so callers can weight VIN hints more heavily.
    pub async fn resolve_model(
        &self,
        manufacturer: ManufacturerId,
        model: Option<&str>,
        year: Option<i32>,
    ) -> Result<ModelMatch, ResolveError> {
        let payload = self
            .catalog
            .fetch(&self.paths.model_series(manufacturer))
            .await?;
        let candidates: Vec<ModelCandidate> = decode_rows(payload, "model-series");

        let Some(model) = model else {
            let first = candidates.first().ok_or(ResolveError::ModelNotFound {
                manufacturer_id: manufacturer,
                model: None,
            })?;
            tracing::warn!(
                manufacturer_id = %manufacturer,
                model = %first.name,
                "no model name decoded, falling back to first model series"
            );
            return Ok(ModelMatch {
                catalog_id: first.catalog_id,
                name: first.name.clone(),
                fallback: true,
            });
        };

        match pick_model(&candidates, model, year) {
            Some((hit, score)) => {
                tracing::info!(
                    search = %model,
                    matched = %hit.name,
                    catalog_id = %hit.catalog_id,
                    score,
                    "model series resolved"
                );
                Ok(ModelMatch {
                    catalog_id: hit.catalog_id,
                    name: hit.name.clone(),
                    fallback: false,
                })
            }
            None => Err(ResolveError::ModelNotFound {
                manufacturer_id: manufacturer,
                model: Some(model.to_string()),
            }),
        }
    }
}

/// Case-normalized, trimmed comparison key
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Manufacturer match cascade: exact, then candidate-starts-with-search,
/// then candidate-contains-search. Within a tier the first directory entry
/// wins. The containment rules are directional; the search term is never
/// tested for containing the candidate.
pub fn match_manufacturer<'a>(
    candidates: &'a [ManufacturerCandidate],
    search: &str,
) -> Option<&'a ManufacturerCandidate> {
    let search = normalize_name(search);
    if search.is_empty() {
        return None;
    }
    candidates
        .iter()
        .find(|c| normalize_name(&c.name) == search)
        .or_else(|| {
            candidates
                .iter()
                .find(|c| normalize_name(&c.name).starts_with(&search))
        })
        .or_else(|| {
            candidates
                .iter()
                .find(|c| normalize_name(&c.name).contains(&search))
        })
}

/// Name-rule score: exact 100, mutual prefix 70, mutual substring 50. A
/// name with no relationship to the search is excluded, not scored zero.
pub fn score_model_name(candidate: &str, search: &str) -> Option<i32> {
    let candidate = normalize_name(candidate);
    let search = normalize_name(search);
    if candidate.is_empty() || search.is_empty() {
        return None;
    }
    if candidate == search {
        return Some(SCORE_EXACT);
    }
    if candidate.starts_with(&search) || search.starts_with(&candidate) {
        return Some(SCORE_PREFIX);
    }
    if candidate.contains(&search) || search.contains(&candidate) {
        return Some(SCORE_SUBSTRING);
    }
    None
}

/// Inclusive production-range check. A missing bound is an open end; a
/// range with no declared bounds matches nothing.
pub fn year_in_range(year: i32, from: Option<i32>, to: Option<i32>) -> bool {
    if from.is_none() && to.is_none() {
        return false;
    }
    from.map_or(true, |f| year >= f) && to.map_or(true, |t| year <= t)
}

/// Score every candidate and keep the strictly highest. Ties keep the
/// earliest directory entry; catalog order is assumed stable between calls.
pub fn pick_model<'a>(
    candidates: &'a [ModelCandidate],
    search: &str,
    year: Option<i32>,
) -> Option<(&'a ModelCandidate, i32)> {
    let mut best: Option<(&ModelCandidate, i32)> = None;
    for candidate in candidates {
        let Some(mut score) = score_model_name(&candidate.name, search) else {
            continue;
        };
        if let Some(year) = year {
            if year_in_range(
                year,
                candidate.production_year_from,
                candidate.production_year_to,
            ) {
                score += YEAR_BONUS;
            }
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((candidate, score)),
        }
    }
    best
}

/// Advisory diagnostic only: when the cascade misses, log the most similar
/// directory entry for data review. Nothing is ever matched from here.
fn log_nearest_miss(candidates: &[ManufacturerCandidate], search: &str) {
    let search_normalized = normalize_name(search);
    let nearest = candidates
        .iter()
        .map(|c| {
            (
                strsim::jaro_winkler(&normalize_name(&c.name), &search_normalized),
                c,
            )
        })
        .filter(|(similarity, _)| *similarity >= NEAR_MISS_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0));

    if let Some((similarity, candidate)) = nearest {
        tracing::debug!(
            search = %search,
            nearest = %candidate.name,
            similarity,
            "manufacturer search missed, nearest directory entry logged for data review"
        );
    }
}
