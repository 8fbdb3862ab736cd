// ==============================================================================
// Scalar Parsing
// ==============================================================================
//
// Parses XML leaf text into the Rust values that back Avro primitives.
// Every failure here becomes a `ConverterError::datum_parse`, carrying the
// field name and the offending text so the caller can point at exactly what
// went wrong.

use crate::error::ConverterError;

/// `int`/`long`/`float`/`double`: base-10, optional sign, surrounding
/// whitespace trimmed.
pub fn parse_int(field_name: &str, text: &str) -> Result<i32, ConverterError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| ConverterError::datum_parse(field_name, text, "int"))
}

pub fn parse_long(field_name: &str, text: &str) -> Result<i64, ConverterError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ConverterError::datum_parse(field_name, text, "long"))
}

pub fn parse_float(field_name: &str, text: &str) -> Result<f32, ConverterError> {
    text.trim()
        .parse::<f32>()
        .map_err(|_| ConverterError::datum_parse(field_name, text, "float"))
}

pub fn parse_double(field_name: &str, text: &str) -> Result<f64, ConverterError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ConverterError::datum_parse(field_name, text, "double"))
}

/// `boolean`: `true`/`false`/`1`/`0`, per the XSD boolean lexical space.
pub fn parse_bool(field_name: &str, text: &str) -> Result<bool, ConverterError> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConverterError::datum_parse(field_name, text, "boolean")),
    }
}

/// `xs:hexBinary`: pairs of hex digits, each pair one byte.
pub fn parse_hex_binary(field_name: &str, text: &str) -> Result<Vec<u8>, ConverterError> {
    let trimmed = text.trim();
    if trimmed.len() % 2 != 0 {
        return Err(ConverterError::datum_parse(field_name, text, "hexBinary"));
    }
    let mut bytes = Vec::with_capacity(trimmed.len() / 2);
    let chars: Vec<char> = trimmed.chars().collect();
    for pair in chars.chunks(2) {
        let byte_str: String = pair.iter().collect();
        let byte = u8::from_str_radix(&byte_str, 16)
            .map_err(|_| ConverterError::datum_parse(field_name, text, "hexBinary"))?;
        bytes.push(byte);
    }
    Ok(bytes)
}

/// `xs:base64Binary`: standard base64 with padding.
pub fn parse_base64_binary(field_name: &str, text: &str) -> Result<Vec<u8>, ConverterError> {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|_| ConverterError::datum_parse(field_name, text, "base64Binary"))
}

/// Both `xs:hexBinary` and `xs:base64Binary` erase to the same Avro `bytes`
/// schema, so by the time a datum is built there's no record of which
/// lexical space the text is actually in. Try hex first (it's a strict
/// subset of valid base64 alphabets only by coincidence for short strings,
/// so this rarely misfires) and fall back to base64.
pub fn parse_bytes_best_effort(field_name: &str, text: &str) -> Result<Vec<u8>, ConverterError> {
    parse_hex_binary(field_name, text).or_else(|_| parse_base64_binary(field_name, text))
}
