//! Catalog resolution modules
//!
//! Everything between a raw VIN and a grouped parts list:
//! - `gateway`: HTTP access to the external catalog provider
//! - `decode`: VIN decode and response-shape normalization
//! - `resolver`: manufacturer and model series matching
//! - `variants`: vehicle variant listing and selection
//! - `parts`: OEM article retrieval and grouping
//! - `pipeline`: the strict forward chain tying the stages together

pub mod decode;
pub mod gateway;
pub mod parts;
pub mod pipeline;
pub mod resolver;
pub mod types;
pub mod variants;

pub use decode::VinDecoder;
pub use gateway::{CatalogFetch, CatalogGateway, CatalogPaths, GatewayError};
pub use parts::{PartCategoryGroup, PartsList, PartsRetriever};
pub use pipeline::{VinPartsPipeline, VinPartsResolution};
pub use resolver::{IdentityResolver, ManufacturerMatch, ModelMatch};
pub use types::{
    InvalidVin, ManufacturerCandidate, ManufacturerId, ModelCandidate, ModelSeriesId, PartRecord,
    ResolveError, VariantId, VehicleVariant, Vin, VinDecodeResult,
};
pub use variants::{dedup_variants, select_best, VariantSelector};
