// ==============================================================================
// Shared Test Helpers
// ==============================================================================
//
// Each test file that imports this module compiles its own copy, so not
// every function is used in every binary.
#![allow(dead_code)]
//
// Import this module in each test file with:
//
//     mod common;
//     use common::xsd_schema_from;

/// Wrap a `<xs:schema>` body fragment with the namespace declaration every
/// test needs, so individual tests can stay focused on their own elements.
pub const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

pub fn schema_for(body: &str) -> xsd_avro::AvroSchema {
    let xsd = format!(r#"<xs:schema {XS}>{body}</xs:schema>"#);
    xsd_avro::create_schema(&xsd).unwrap_or_else(|e| panic!("failed to translate: {e}"))
}
