//! Converts XML Schema (XSD) documents into Avro schemas, and XML instance
//! documents into Avro generic datums shaped by those schemas.
//!
//! This crate provides two entry points:
//!
//! - [`create_schema`] — translate an XSD document into an [`AvroSchema`].
//! - [`create_datum`] — build an `apache_avro::types::Value` out of an XML
//!   document, against an [`AvroSchema`] already produced by
//!   [`create_schema`].
//!
//! [`SchemaTranslator`] and [`DatumBuilder`] are non-consuming builders
//! around the same two operations, for callers that want to set optional
//! behavior (currently just log verbosity) before converting.
//!
//! # Translating a schema
//!
//! ```no_run
//! let xsd = std::fs::read_to_string("order.xsd")?;
//! let schema = xsd_avro::create_schema(&xsd)?;
//! println!("{}", serde_json::to_string_pretty(&xsd_avro::schema_to_json(&schema))?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Building a datum
//!
//! ```no_run
//! let xsd = std::fs::read_to_string("order.xsd")?;
//! let xml = std::fs::read_to_string("order.xml")?;
//! let schema = xsd_avro::create_schema(&xsd)?;
//! let datum = xsd_avro::create_datum(&schema, &xml)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error handling
//!
//! Every fallible operation returns [`ConverterError`], a single error type
//! whose message describes which of the failure kinds documented on it
//! occurred.

pub(crate) mod compiler;
pub(crate) mod datum;
pub(crate) mod error;
pub(crate) mod model;
pub(crate) mod resolve;
pub(crate) mod sanitize;
pub(crate) mod scalar;
pub(crate) mod xsd;

pub use compiler::{create_datum, create_schema, schema_to_json, DatumBuilder, SchemaTranslator};
pub use error::ConverterError;
pub use model::schema::{AvroSchema, EnumSchema, Field, RecordSchema, Source};
