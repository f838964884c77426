//! Ingestion, validation, spatial selection and display-point derivation.

pub mod geojson;
pub mod points;
pub mod spatial;
pub mod validation;
