//! HTTP API handlers for motolens-vp

pub mod health;
pub mod vin;

pub use health::health_routes;
pub use vin::vin_routes;
