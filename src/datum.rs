// ==============================================================================
// XML -> Avro Datum Builder
// ==============================================================================
//
// Walks an XML instance document against an already-built `AvroSchema` and
// produces an `apache_avro::types::Value`. The schema drives everything: for
// each field we consult its `Source` to know whether to look at an
// attribute, a named child element, or (for the wildcard field) whatever
// children no other field claimed.

use std::collections::HashMap;
use std::collections::HashSet;

use apache_avro::types::Value;
use roxmltree::Node;

use crate::error::ConverterError;
use crate::model::schema::{AvroSchema, EnumSchema, RecordSchema, Source};
use crate::scalar;

/// Build a datum for `xml_text` against `schema`.
pub fn build(schema: &AvroSchema, xml_text: &str) -> Result<Value, ConverterError> {
    build_with(schema, xml_text, false)
}

/// Build a datum for `xml_text` against `schema`. When `quiet` is `true`,
/// suppresses the `debug` diagnostics otherwise emitted for XML attributes
/// and child elements that match no field and are dropped.
pub fn build_with(schema: &AvroSchema, xml_text: &str, quiet: bool) -> Result<Value, ConverterError> {
    let doc =
        roxmltree::Document::parse(xml_text).map_err(|e| ConverterError::xml_parse("XML instance", e))?;
    let root = doc.root_element();
    build_from_root(schema, root, quiet)
}

fn build_from_root(schema: &AvroSchema, root: Node, quiet: bool) -> Result<Value, ConverterError> {
    match schema {
        AvroSchema::Record(record) if record.source == Some(Source::Document) => {
            build_document_value(record, root, quiet)
        }
        AvroSchema::Record(record) => build_record_value(record, root, quiet),
        AvroSchema::Enum(e) => build_enum_value(e, &element_text(root), "root"),
        _ => build_scalar_value(schema, &element_text(root), "root"),
    }
}

/// The synthetic "several global elements" wrapper: exactly one field is
/// populated, selected by matching the XML root's tag name against each
/// field's element name; every other field is null.
fn build_document_value(record: &RecordSchema, root: Node, quiet: bool) -> Result<Value, ConverterError> {
    let mut pairs = Vec::new();
    for field in record.fields.borrow().iter() {
        let xml_name = match &field.source {
            Some(Source::Element(name)) => name.as_str(),
            other => {
                return Err(ConverterError::schema_validation(format!(
                    "document wrapper field `{}` has unexpected source {:?}",
                    field.name, other
                )));
            }
        };
        let value = if root.tag_name().name() == xml_name {
            let inner = field
                .schema
                .nullable_inner()
                .ok_or_else(|| ConverterError::schema_validation("document field was not nullable"))?;
            Value::Union(0, Box::new(build_node_value(inner, root, &field.name, quiet)?))
        } else {
            Value::Union(1, Box::new(Value::Null))
        };
        pairs.push((field.name.clone(), value));
    }
    Ok(Value::Record(pairs))
}

fn build_record_value(record: &RecordSchema, el: Node, quiet: bool) -> Result<Value, ConverterError> {
    let mut pairs = Vec::new();
    for field in record.fields.borrow().iter() {
        let value = match &field.source {
            Some(Source::Attribute(xml_name)) => match el.attribute(xml_name.as_str()) {
                Some(text) => build_attribute_value(&field.schema, text, &field.name)?,
                None => default_for_missing(&field.schema, &field.name)?,
            },
            Some(Source::Element(xml_name)) => {
                let matches: Vec<Node> = el
                    .children()
                    .filter(|c| c.is_element() && c.tag_name().name() == xml_name.as_str())
                    .collect();
                build_element_field_value(&field.schema, &matches, &field.name, quiet)?
            }
            Some(Source::Document) => {
                return Err(ConverterError::schema_validation(
                    "document source can only appear on the wrapper record",
                ));
            }
            None => build_wildcard_value(record, el),
        };
        pairs.push((field.name.clone(), value));
    }
    if !quiet {
        log_unclaimed(record, el);
    }
    Ok(Value::Record(pairs))
}

fn build_element_field_value(
    schema: &AvroSchema,
    matches: &[Node],
    field_name: &str,
    quiet: bool,
) -> Result<Value, ConverterError> {
    match schema {
        AvroSchema::Array(item) => {
            let mut values = Vec::with_capacity(matches.len());
            for node in matches {
                values.push(build_node_value(item, *node, field_name, quiet)?);
            }
            Ok(Value::Array(values))
        }
        _ if schema.is_nullable() => {
            let inner = schema.nullable_inner().expect("checked nullable above");
            match matches.first() {
                Some(node) => Ok(Value::Union(
                    0,
                    Box::new(build_node_value(inner, *node, field_name, quiet)?),
                )),
                None => Ok(Value::Union(1, Box::new(Value::Null))),
            }
        }
        _ => match matches.first() {
            Some(node) => build_node_value(schema, *node, field_name, quiet),
            None => Err(ConverterError::datum_parse(field_name, "", schema.type_description())),
        },
    }
}

fn build_attribute_value(schema: &AvroSchema, text: &str, field_name: &str) -> Result<Value, ConverterError> {
    if schema.is_nullable() {
        let inner = schema.nullable_inner().expect("checked nullable above");
        Ok(Value::Union(0, Box::new(build_scalar_value(inner, text, field_name)?)))
    } else {
        build_scalar_value(schema, text, field_name)
    }
}

fn build_node_value(
    schema: &AvroSchema,
    node: Node,
    field_name: &str,
    quiet: bool,
) -> Result<Value, ConverterError> {
    match schema {
        AvroSchema::Record(record) => build_record_value(record, node, quiet),
        AvroSchema::Enum(e) => build_enum_value(e, &element_text(node), field_name),
        _ => build_scalar_value(schema, &element_text(node), field_name),
    }
}

fn build_enum_value(e: &EnumSchema, text: &str, field_name: &str) -> Result<Value, ConverterError> {
    let candidate = crate::sanitize::sanitize(text.trim());
    match e.symbols.iter().position(|s| *s == candidate) {
        Some(index) => Ok(Value::Enum(index as i32, candidate)),
        None => Err(ConverterError::datum_parse(
            field_name,
            text,
            format!("enum {{{}}}", e.symbols.join(", ")),
        )),
    }
}

fn build_scalar_value(schema: &AvroSchema, text: &str, field_name: &str) -> Result<Value, ConverterError> {
    match schema {
        AvroSchema::Null => Ok(Value::Null),
        AvroSchema::Boolean => scalar::parse_bool(field_name, text).map(Value::Boolean),
        AvroSchema::Int => scalar::parse_int(field_name, text).map(Value::Int),
        AvroSchema::Long => scalar::parse_long(field_name, text).map(Value::Long),
        AvroSchema::Float => scalar::parse_float(field_name, text).map(Value::Float),
        AvroSchema::Double => scalar::parse_double(field_name, text).map(Value::Double),
        AvroSchema::Bytes => scalar::parse_bytes_best_effort(field_name, text).map(Value::Bytes),
        AvroSchema::String => Ok(Value::String(text.to_string())),
        other => Err(ConverterError::unsupported_construct(format!(
            "cannot build a leaf datum for {}",
            other.type_description()
        ))),
    }
}

/// §4.4 post-traversal defaulting: a missing array becomes empty, a missing
/// nullable field becomes null, and a missing required scalar is an error.
fn default_for_missing(schema: &AvroSchema, field_name: &str) -> Result<Value, ConverterError> {
    match schema {
        AvroSchema::Array(_) => Ok(Value::Array(Vec::new())),
        _ if schema.is_nullable() => Ok(Value::Union(1, Box::new(Value::Null))),
        AvroSchema::Map(_) => Ok(Value::Map(HashMap::new())),
        _ => Err(ConverterError::datum_parse(field_name, "", schema.type_description())),
    }
}

/// The wildcard field collects every child element no other field in this
/// record claimed, keyed by tag name with its text content as the value.
fn build_wildcard_value(record: &RecordSchema, el: Node) -> Value {
    let known: HashSet<&str> = record
        .fields
        .borrow()
        .iter()
        .filter_map(|f| match &f.source {
            Some(Source::Element(name)) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let mut map = HashMap::new();
    for child in el.children().filter(|c| c.is_element()) {
        let name = child.tag_name().name();
        if known.contains(name) {
            continue;
        }
        map.insert(name.to_string(), Value::String(element_text(child)));
    }
    Value::Map(map)
}

/// Logs (but does not fail on) XML content with nowhere to go: a child
/// element or attribute that matches no field and no wildcard exists to
/// absorb it.
fn log_unclaimed(record: &RecordSchema, el: Node) {
    let fields = record.fields.borrow();
    if fields.iter().any(|f| f.source.is_none()) {
        return;
    }
    let known_elements: HashSet<&str> = fields
        .iter()
        .filter_map(|f| match &f.source {
            Some(Source::Element(name)) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let known_attributes: HashSet<&str> = fields
        .iter()
        .filter_map(|f| match &f.source {
            Some(Source::Attribute(name)) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    for child in el.children().filter(|c| c.is_element()) {
        let name = child.tag_name().name();
        if !known_elements.contains(name) {
            log::debug!("dropping unmapped child element `{name}` under `{}`", el.tag_name().name());
        }
    }
    for attr in el.attributes() {
        if !known_attributes.contains(attr.name()) {
            log::debug!("dropping unmapped attribute `{}` on `{}`", attr.name(), el.tag_name().name());
        }
    }
}

fn element_text(node: Node) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<Vec<_>>()
        .join("")
}
