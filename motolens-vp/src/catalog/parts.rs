//! OEM parts retrieval and grouping
//!
//! Retrieves the OEM article rows for a vehicle variant and groups them by
//! product name for presentation. Grouping is exact and case sensitive:
//! "Brake Disc" and "brake disc" are distinct categories.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::gateway::{decode_rows, CatalogFetch, CatalogPaths};
use crate::catalog::types::{non_blank, PartRecord, ResolveError, VariantId};

/// Group label for article rows without a product name
pub const UNKNOWN_PRODUCT: &str = "Unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartRow {
    #[serde(default)]
    product_name: Option<String>,
    oem_number: String,
}

impl From<PartRow> for PartRecord {
    fn from(row: PartRow) -> Self {
        Self {
            product_name: non_blank(row.product_name)
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            oem_number: row.oem_number,
        }
    }
}

/// One product-name group of OEM numbers, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PartCategoryGroup {
    pub product_name: String,
    pub oem_numbers: Vec<String>,
}

/// Grouped parts for a vehicle variant.
///
/// `total_parts` counts the retrieved article rows before grouping. An
/// empty list is a valid outcome: a catalogued vehicle with no retrievable
/// parts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PartsList {
    pub groups: Vec<PartCategoryGroup>,
    pub total_parts: usize,
}

/// Retrieves and groups OEM articles for a vehicle variant
#[derive(Clone)]
pub struct PartsRetriever {
    catalog: Arc<dyn CatalogFetch>,
    paths: CatalogPaths,
}

impl PartsRetriever {
    pub fn new(catalog: Arc<dyn CatalogFetch>, paths: CatalogPaths) -> Self {
        Self { catalog, paths }
    }

    pub async fn get_parts(&self, variant: VariantId) -> Result<PartsList, ResolveError> {
        let payload = self.catalog.fetch(&self.paths.articles_oem(variant)).await?;
        let rows: Vec<PartRow> = decode_rows(payload, "articles-oem");
        let parts = group_parts(rows.into_iter().map(PartRecord::from).collect());
        tracing::info!(
            variant = %variant,
            total_parts = parts.total_parts,
            groups = parts.groups.len(),
            "parts retrieved"
        );
        Ok(parts)
    }
}

/// Group article rows by exact product name, groups and members both in
/// first-seen order.
pub fn group_parts(records: Vec<PartRecord>) -> PartsList {
    let total_parts = records.len();
    let mut groups: Vec<PartCategoryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(&record.product_name) {
            Some(&at) => groups[at].oem_numbers.push(record.oem_number),
            None => {
                index.insert(record.product_name.clone(), groups.len());
                groups.push(PartCategoryGroup {
                    product_name: record.product_name,
                    oem_numbers: vec![record.oem_number],
                });
            }
        }
    }

    PartsList { groups, total_parts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product: &str, oem: &str) -> PartRecord {
        PartRecord {
            product_name: product.to_string(),
            oem_number: oem.to_string(),
        }
    }

    #[test]
    fn groups_preserve_first_seen_order() {
        let records = vec![
            record("Brake Disc", "111"),
            record("Oil Filter", "222"),
            record("Brake Disc", "333"),
        ];
        let parts = group_parts(records);
        assert_eq!(parts.total_parts, 3);
        assert_eq!(
            parts.groups,
            vec![
                PartCategoryGroup {
                    product_name: "Brake Disc".to_string(),
                    oem_numbers: vec!["111".to_string(), "333".to_string()],
                },
                PartCategoryGroup {
                    product_name: "Oil Filter".to_string(),
                    oem_numbers: vec!["222".to_string()],
                },
            ]
        );
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let records = vec![record("Brake Disc", "111"), record("brake disc", "222")];
        let parts = group_parts(records);
        assert_eq!(parts.groups.len(), 2);
    }

    #[test]
    fn empty_retrieval_is_valid() {
        let parts = group_parts(Vec::new());
        assert!(parts.groups.is_empty());
        assert_eq!(parts.total_parts, 0);
    }

    #[test]
    fn missing_product_name_groups_under_unknown() {
        let row: PartRow = serde_json::from_value(serde_json::json!({"oemNumber": "999"})).unwrap();
        let record = PartRecord::from(row);
        assert_eq!(record.product_name, UNKNOWN_PRODUCT);

        let blank: PartRow =
            serde_json::from_value(serde_json::json!({"productName": " ", "oemNumber": "998"}))
                .unwrap();
        assert_eq!(PartRecord::from(blank).product_name, UNKNOWN_PRODUCT);
    }
}
