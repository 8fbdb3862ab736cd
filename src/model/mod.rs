//! The Avro-shaped data model produced by [`crate::xsd`] and consumed by
//! [`crate::datum`]: named types, primitives, and the `source` provenance
//! annotation, plus their JSON serialization.

pub mod json;
pub mod schema;
