// ==============================================================================
// Library API: Two Builders for Converting XSD/XML to Avro
// ==============================================================================
//
// Two builders mirror the two operations:
//
//   - `SchemaTranslator` — XSD text -> `AvroSchema`
//   - `DatumBuilder`     — (`AvroSchema`, XML text) -> `apache_avro::types::Value`
//
// Both follow the non-consuming `&mut self` builder pattern (C-BUILDER), so
// the same builder can be reused across multiple calls. The only thing
// either currently configures is `.quiet()`, which suppresses every `debug`
// diagnostic the conversion would otherwise emit -- the generic
// "translating/building" line logged here, plus the per-construct ones
// logged deeper in `xsd`/`datum` (collapsed wildcard siblings, dropped
// unmapped XML content).
//
// `create_schema`/`create_datum`/`schema_to_json` are the same operations as
// free functions, for callers who have no configuration to set.

use apache_avro::types::Value as AvroValue;
use serde_json::Value as JsonValue;

use crate::error::ConverterError;
use crate::model::schema::AvroSchema;
use crate::{datum, xsd};

/// Translate an XSD document into an [`AvroSchema`].
pub fn create_schema(xsd_text: &str) -> Result<AvroSchema, ConverterError> {
    xsd::translate(xsd_text)
}

/// Build an Avro generic datum out of an XML document, shaped by `schema`.
pub fn create_datum(schema: &AvroSchema, xml_text: &str) -> Result<AvroValue, ConverterError> {
    datum::build(schema, xml_text)
}

/// Serialize an [`AvroSchema`] to the JSON shape a standard Avro runtime
/// expects (the `.avsc` form).
pub fn schema_to_json(schema: &AvroSchema) -> JsonValue {
    crate::model::json::schema_to_json(schema)
}

// ==============================================================================
// `SchemaTranslator` — mirrors `create_schema`
// ==============================================================================

/// Builder for translating XSD documents to [`AvroSchema`].
///
/// Follows the non-consuming builder pattern (like [`std::process::Command`]):
/// configuration and terminal methods both take `&mut self`.
///
/// # Examples
///
/// ```no_run
/// use xsd_avro::SchemaTranslator;
///
/// let schema = SchemaTranslator::new().quiet(true).translate(&std::fs::read_to_string("order.xsd")?)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SchemaTranslator {
    quiet: bool,
}

impl Default for SchemaTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTranslator {
    /// Create a new builder with default logging (drops are logged at `debug`).
    pub fn new() -> Self {
        SchemaTranslator { quiet: false }
    }

    /// When `true`, the translator does not log anything -- not even at
    /// `debug` -- about constructs it silently ignores (unused globals,
    /// collapsed wildcard siblings).
    pub fn quiet(&mut self, quiet: bool) -> &mut Self {
        self.quiet = quiet;
        self
    }

    /// Translate an XSD document's text into an [`AvroSchema`].
    pub fn translate(&mut self, xsd_text: &str) -> Result<AvroSchema, ConverterError> {
        if !self.quiet {
            log::debug!("translating XSD document ({} bytes)", xsd_text.len());
        }
        xsd::translate_with(xsd_text, self.quiet)
    }
}

// ==============================================================================
// `DatumBuilder` — mirrors `create_datum`
// ==============================================================================

/// Builder for building Avro datums out of XML documents.
///
/// # Examples
///
/// ```no_run
/// use xsd_avro::{create_schema, DatumBuilder};
///
/// let schema = create_schema(&std::fs::read_to_string("order.xsd")?)?;
/// let datum = DatumBuilder::new().quiet(true).build(&schema, &std::fs::read_to_string("order.xml")?)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DatumBuilder {
    quiet: bool,
}

impl Default for DatumBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatumBuilder {
    /// Create a new builder with default logging (dropped XML content is
    /// logged at `debug`).
    pub fn new() -> Self {
        DatumBuilder { quiet: false }
    }

    /// When `true`, suppresses the `debug` logging this builder otherwise
    /// emits for XML content with no corresponding field in the schema.
    pub fn quiet(&mut self, quiet: bool) -> &mut Self {
        self.quiet = quiet;
        self
    }

    /// Build a datum for `xml_text` against `schema`.
    pub fn build(&mut self, schema: &AvroSchema, xml_text: &str) -> Result<AvroValue, ConverterError> {
        if !self.quiet {
            log::debug!("building datum from XML document ({} bytes)", xml_text.len());
        }
        datum::build_with(schema, xml_text, self.quiet)
    }
}
