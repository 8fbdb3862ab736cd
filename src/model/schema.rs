use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Provenance annotation carried by a [`Field`] (and, for the synthetic
/// multi-root wrapper, by a [`RecordSchema`] itself) describing which XML
/// construct a field was populated from.
///
/// Serializes to the `source` property on the corresponding JSON schema node
/// (see `model::json`), in the exact string shapes the datum builder parses
/// back: `"element <name>"`, `"attribute <name>"`, or the literal
/// `"document"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Populated from a child element with this local name.
    Element(String),
    /// Populated from an attribute with this local name.
    Attribute(String),
    /// Sentinel on the synthetic record wrapping multiple global root elements.
    Document,
}

impl Source {
    /// Render the annotation to the exact string stored in the `source` JSON
    /// property.
    pub fn to_property(&self) -> String {
        match self {
            Source::Element(name) => format!("element {name}"),
            Source::Attribute(name) => format!("attribute {name}"),
            Source::Document => "document".to_string(),
        }
    }

    /// True if this annotation came from an XML attribute rather than an
    /// element.
    pub fn is_attribute(&self) -> bool {
        matches!(self, Source::Attribute(_))
    }

    /// The original XML local name this field was derived from, if any.
    pub fn xml_name(&self) -> Option<&str> {
        match self {
            Source::Element(name) | Source::Attribute(name) => Some(name),
            Source::Document => None,
        }
    }
}

/// The reserved field name for the wildcard map synthesized from `xs:any`.
pub const WILDCARD_FIELD_NAME: &str = "others";

/// A field within a [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub schema: AvroSchema,
    /// Avro default value for the field. The XSD translator never populates
    /// this -- nothing in the translation rules calls for a declared
    /// default -- but the slot is part of the data model so hand-built
    /// schemas can still carry one.
    pub default: Option<serde_json::Value>,
    /// `None` for the wildcard map field; `Some` for every field derived
    /// from a single named XML construct.
    pub source: Option<Source>,
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.schema == other.schema && self.source == other.source
    }
}

/// A named `record` node.
///
/// Lives behind `Rc<RefCell<..>>` so recursive XSD complex types can share
/// one node: the type registry hands out a placeholder with an empty field
/// list before translating the type's children, then fills the field list in
/// once translation completes. Every occurrence of a self- or mutually-
/// recursive reference clones the same `Rc`, so `Rc::ptr_eq` holds between
/// them -- the Rust realization of the "same named node reused" recursion
/// invariant.
pub struct RecordSchema {
    pub name: String,
    pub fields: RefCell<Vec<Field>>,
    /// `Some(Source::Document)` for the synthetic multi-root wrapper record;
    /// `None` otherwise.
    pub source: Option<Source>,
}

/// A named `enum` node, generated from an XSD simple type restricted to an
/// enumeration of string-compatible values.
pub struct EnumSchema {
    pub name: String,
    pub symbols: Vec<String>,
}

/// An Avro schema node.
///
/// Named types (`Record`, `Enum`) are reference-counted so the graph can
/// contain cycles (see [`RecordSchema`]). Everything else is owned plainly.
#[derive(Clone)]
pub enum AvroSchema {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record(Rc<RecordSchema>),
    Enum(Rc<EnumSchema>),
    Array(Box<AvroSchema>),
    Map(Box<AvroSchema>),
    Union(Vec<AvroSchema>),
}

impl AvroSchema {
    /// Build the `[T, null]` optional-field union used for every
    /// `minOccurs=0`/`maxOccurs<=1` component, `use="optional"` attribute,
    /// and choice branch. Always null-last.
    pub fn nullable(inner: AvroSchema) -> AvroSchema {
        AvroSchema::Union(vec![inner, AvroSchema::Null])
    }

    /// True if this is the two-branch `[T, null]` shape produced by
    /// [`AvroSchema::nullable`].
    pub fn is_nullable(&self) -> bool {
        matches!(self, AvroSchema::Union(types) if types.len() == 2 && types[1] == AvroSchema::Null)
    }

    /// For a `[T, null]` union, the non-null branch.
    pub fn nullable_inner(&self) -> Option<&AvroSchema> {
        match self {
            AvroSchema::Union(types) if types.len() == 2 && types[1] == AvroSchema::Null => {
                Some(&types[0])
            }
            _ => None,
        }
    }

    /// The record or enum's simple name, if this is a named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            AvroSchema::Record(r) => Some(&r.name),
            AvroSchema::Enum(e) => Some(&e.name),
            _ => None,
        }
    }

    /// Human-readable description for error messages.
    pub fn type_description(&self) -> String {
        match self {
            AvroSchema::Null => "null".to_string(),
            AvroSchema::Boolean => "boolean".to_string(),
            AvroSchema::Int => "int".to_string(),
            AvroSchema::Long => "long".to_string(),
            AvroSchema::Float => "float".to_string(),
            AvroSchema::Double => "double".to_string(),
            AvroSchema::Bytes => "bytes".to_string(),
            AvroSchema::String => "string".to_string(),
            AvroSchema::Record(r) => format!("record {}", r.name),
            AvroSchema::Enum(e) => format!("enum {}", e.name),
            AvroSchema::Array(_) => "array".to_string(),
            AvroSchema::Map(_) => "map".to_string(),
            AvroSchema::Union(_) => "union".to_string(),
        }
    }
}

/// Schema equality is by-name for named types rather than deep structural
/// comparison: two `Record`/`Enum` nodes are equal if they're the same `Rc`
/// (the common case for recursive references) or carry the same name. A
/// deep comparison would recurse forever on a cyclic schema graph, and name
/// equality is the right notion anyway -- Avro identifies named types by
/// name, not by structural field equality.
impl PartialEq for AvroSchema {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AvroSchema::Null, AvroSchema::Null) => true,
            (AvroSchema::Boolean, AvroSchema::Boolean) => true,
            (AvroSchema::Int, AvroSchema::Int) => true,
            (AvroSchema::Long, AvroSchema::Long) => true,
            (AvroSchema::Float, AvroSchema::Float) => true,
            (AvroSchema::Double, AvroSchema::Double) => true,
            (AvroSchema::Bytes, AvroSchema::Bytes) => true,
            (AvroSchema::String, AvroSchema::String) => true,
            (AvroSchema::Record(a), AvroSchema::Record(b)) => Rc::ptr_eq(a, b) || a.name == b.name,
            (AvroSchema::Enum(a), AvroSchema::Enum(b)) => Rc::ptr_eq(a, b) || a.name == b.name,
            (AvroSchema::Array(a), AvroSchema::Array(b)) => a == b,
            (AvroSchema::Map(a), AvroSchema::Map(b)) => a == b,
            (AvroSchema::Union(a), AvroSchema::Union(b)) => a == b,
            _ => false,
        }
    }
}

/// Shallow debug output: named types print as `Record("Name")` /
/// `Enum("Name")` without expanding their fields, so formatting a schema
/// that contains a recursive reference to itself terminates. Use
/// `model::json::schema_to_json` to render the full expanded tree.
impl fmt::Debug for AvroSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvroSchema::Null => write!(f, "Null"),
            AvroSchema::Boolean => write!(f, "Boolean"),
            AvroSchema::Int => write!(f, "Int"),
            AvroSchema::Long => write!(f, "Long"),
            AvroSchema::Float => write!(f, "Float"),
            AvroSchema::Double => write!(f, "Double"),
            AvroSchema::Bytes => write!(f, "Bytes"),
            AvroSchema::String => write!(f, "String"),
            AvroSchema::Record(r) => write!(f, "Record({:?})", r.name),
            AvroSchema::Enum(e) => write!(f, "Enum({:?})", e.name),
            AvroSchema::Array(items) => f.debug_tuple("Array").field(items).finish(),
            AvroSchema::Map(values) => f.debug_tuple("Map").field(values).finish(),
            AvroSchema::Union(types) => f.debug_tuple("Union").field(types).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_wraps_null_last() {
        let schema = AvroSchema::nullable(AvroSchema::Int);
        match &schema {
            AvroSchema::Union(types) => {
                assert_eq!(types.len(), 2);
                assert_eq!(types[0], AvroSchema::Int);
                assert_eq!(types[1], AvroSchema::Null);
            }
            other => panic!("expected union, got {other:?}"),
        }
        assert!(schema.is_nullable());
        assert_eq!(schema.nullable_inner(), Some(&AvroSchema::Int));
    }

    #[test]
    fn array_is_not_nullable() {
        let schema = AvroSchema::Array(Box::new(AvroSchema::String));
        assert!(!schema.is_nullable());
        assert!(schema.nullable_inner().is_none());
    }

    #[test]
    fn source_to_property() {
        assert_eq!(Source::Element("field".into()).to_property(), "element field");
        assert_eq!(
            Source::Attribute("field".into()).to_property(),
            "attribute field"
        );
        assert_eq!(Source::Document.to_property(), "document");
    }

    #[test]
    fn record_equality_is_by_name_not_deep_structure() {
        let a = Rc::new(RecordSchema {
            name: "Foo".to_string(),
            fields: RefCell::new(vec![]),
            source: None,
        });
        let b = Rc::new(RecordSchema {
            name: "Foo".to_string(),
            fields: RefCell::new(vec![Field {
                name: "extra".to_string(),
                schema: AvroSchema::String,
                default: None,
                source: Some(Source::Element("extra".to_string())),
            }]),
            source: None,
        });
        assert_eq!(AvroSchema::Record(a), AvroSchema::Record(b));
    }

    #[test]
    fn recursive_schema_has_shared_identity() {
        let placeholder = Rc::new(RecordSchema {
            name: "Node".to_string(),
            fields: RefCell::new(vec![]),
            source: None,
        });
        let self_ref = AvroSchema::Record(Rc::clone(&placeholder));
        placeholder.fields.borrow_mut().push(Field {
            name: "node".to_string(),
            schema: AvroSchema::nullable(self_ref),
            default: None,
            source: Some(Source::Element("node".to_string())),
        });

        let fields = placeholder.fields.borrow();
        let AvroSchema::Union(types) = &fields[0].schema else {
            panic!("expected nullable union");
        };
        let AvroSchema::Record(inner) = &types[0] else {
            panic!("expected record");
        };
        assert!(Rc::ptr_eq(inner, &placeholder));

        // Debug formatting must terminate even though the node is cyclic.
        let rendered = format!("{:?}", AvroSchema::Record(Rc::clone(&placeholder)));
        assert_eq!(rendered, r#"Record("Node")"#);
    }
}
