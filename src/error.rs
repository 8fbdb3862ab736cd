use thiserror::Error;

/// The single failure kind for every XSD/XML-to-Avro conversion.
///
/// Sub-reasons (missing namespace, unsupported construct, schema
/// validation, XML parse, datum parse, unresolvable name collision) are
/// encoded in [`ConverterError::message`] rather than as distinct variants,
/// per the one-error-family design: every conversion failure is fatal and
/// leaves no partial result, so callers never need to match on a reason to
/// decide how to recover.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConverterError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ConverterError {
    fn new(message: impl Into<String>) -> Self {
        ConverterError {
            message: message.into(),
            source: None,
        }
    }

    fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConverterError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The XSD declares no `xs:schema` root in the `http://www.w3.org/2001/XMLSchema`
    /// namespace. The message always contains the substring `namespace` and
    /// the expected URL, per the error-reporting contract.
    pub fn missing_namespace() -> Self {
        ConverterError::new(format!(
            "missing or incorrect XSD namespace: expected the root element's \
             namespace to be `{}`",
            crate::xsd::XSD_NAMESPACE
        ))
    }

    /// An XSD construct was encountered that this translator does not
    /// interpret.
    pub fn unsupported_construct(detail: impl std::fmt::Display) -> Self {
        ConverterError::new(format!("unsupported XSD construct: {detail}"))
    }

    /// The XSD itself failed to parse, or failed a structural check before
    /// translation could begin.
    pub fn schema_validation(detail: impl std::fmt::Display) -> Self {
        ConverterError::new(format!("invalid XSD: {detail}"))
    }

    /// The XSD or XML text failed to parse as well-formed XML.
    pub fn xml_parse(detail: impl std::fmt::Display, source: roxmltree::Error) -> Self {
        ConverterError::with_source(format!("failed to parse XML: {detail}"), source)
    }

    /// A leaf value in the XML instance could not be parsed as the scalar
    /// type its field declares.
    pub fn datum_parse(field_name: &str, text: &str, expected: impl std::fmt::Display) -> Self {
        ConverterError::new(format!(
            "cannot parse `{text}` as {expected} for field `{field_name}`"
        ))
    }

    /// A record accumulated two same-named fields that could not be
    /// disambiguated even after suffixing.
    pub fn name_collision_unresolvable(name: &str) -> Self {
        ConverterError::new(format!(
            "could not generate a unique Avro name for `{name}`: exhausted suffixes"
        ))
    }
}
