// ==============================================================================
// XSD -> Avro Translator
// ==============================================================================
//
// Walks an XSD document (parsed by `roxmltree`) and builds an `AvroSchema`
// graph. The entry point is `translate`; everything else is private
// machinery split by XSD construct: root shaping, complex-type bodies
// (attributes + content particle), simple-type restrictions/enumerations,
// and the `xs:any` wildcard collapse.
//
// Recursion is broken by `TypeRegistry`: before walking a named complex
// type's content, we register a placeholder record under its XSD name, so a
// self- or mutually-recursive `type="..."` reference resolves to the same
// `Rc<RecordSchema>` instead of looping forever.

use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;
use roxmltree::Node;

use crate::error::ConverterError;
use crate::model::schema::{AvroSchema, EnumSchema, Field, Source, WILDCARD_FIELD_NAME};
use crate::resolve::TypeRegistry;
use crate::sanitize::{dedup, sanitize};

/// The only namespace URI this translator recognizes for XSD constructs.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Translate an XSD document's text into a single `AvroSchema`.
pub fn translate(xsd_text: &str) -> Result<AvroSchema, ConverterError> {
    translate_with(xsd_text, false)
}

/// Translate an XSD document's text into a single `AvroSchema`. When `quiet`
/// is `true`, suppresses the `debug` diagnostic emitted when a second or
/// later `xs:any` sibling collapses into an already-created wildcard field.
pub fn translate_with(xsd_text: &str, quiet: bool) -> Result<AvroSchema, ConverterError> {
    let doc =
        roxmltree::Document::parse(xsd_text).map_err(|e| ConverterError::xml_parse("XSD document", e))?;
    let root = doc.root_element();
    if root.tag_name().namespace() != Some(XSD_NAMESPACE) {
        return Err(ConverterError::missing_namespace());
    }

    let mut translator = Translator::new(quiet);
    translator.collect_globals(root);
    translator.build_root_schema()
}

fn local_name<'a>(node: &Node<'a, 'a>) -> &'a str {
    node.tag_name().name()
}

/// Strip a leading `prefix:` off a qualified name reference.
fn local_part(qname: &str) -> &str {
    qname.split(':').next_back().unwrap_or(qname)
}

struct Translator<'a> {
    registry: TypeRegistry,
    global_elements: IndexMap<String, Node<'a, 'a>>,
    global_complex_types: IndexMap<String, Node<'a, 'a>>,
    global_simple_types: IndexMap<String, Node<'a, 'a>>,
    global_attributes: IndexMap<String, Node<'a, 'a>>,
    /// Named simple types translate to the same `Enum` every time they're
    /// referenced -- otherwise each reference would reserve a fresh,
    /// suffixed name.
    named_simple_type_cache: std::collections::HashMap<String, AvroSchema>,
    /// Suppresses the `debug` diagnostic for collapsed `xs:any` siblings.
    quiet: bool,
}

impl<'a> Translator<'a> {
    fn new(quiet: bool) -> Self {
        Translator {
            registry: TypeRegistry::new(),
            global_elements: IndexMap::new(),
            global_complex_types: IndexMap::new(),
            global_simple_types: IndexMap::new(),
            global_attributes: IndexMap::new(),
            named_simple_type_cache: std::collections::HashMap::new(),
            quiet,
        }
    }

    fn collect_globals(&mut self, schema_root: Node<'a, 'a>) {
        for child in schema_root.children().filter(|n| n.is_element()) {
            match local_name(&child) {
                "element" => {
                    if let Some(name) = child.attribute("name") {
                        self.global_elements.insert(name.to_string(), child);
                    }
                }
                "complexType" => {
                    if let Some(name) = child.attribute("name") {
                        self.global_complex_types.insert(name.to_string(), child);
                    }
                }
                "simpleType" => {
                    if let Some(name) = child.attribute("name") {
                        self.global_simple_types.insert(name.to_string(), child);
                    }
                }
                "attribute" => {
                    if let Some(name) = child.attribute("name") {
                        self.global_attributes.insert(name.to_string(), child);
                    }
                }
                _ => {}
            }
        }
    }

    // ==========================================================================
    // Root shaping
    // ==========================================================================

    fn build_root_schema(&mut self) -> Result<AvroSchema, ConverterError> {
        let elements: Vec<(String, Node<'a, 'a>)> = self
            .global_elements
            .iter()
            .map(|(name, node)| (name.clone(), *node))
            .collect();

        match elements.len() {
            0 => Err(ConverterError::schema_validation(
                "no global element declarations found",
            )),
            1 => {
                let (name, el) = &elements[0];
                self.resolve_element_type(*el, name)
            }
            _ => {
                let avro_name = self.registry.reserve_name("Document");
                let record = self
                    .registry
                    .insert_placeholder(None, avro_name, Some(Source::Document));

                let mut fields = Vec::new();
                let mut used_names = HashSet::new();
                for (name, el) in &elements {
                    let schema = self.resolve_element_type(*el, name)?;
                    let field_name = dedup(&mut used_names, &sanitize(name));
                    fields.push(Field {
                        name: field_name,
                        schema: AvroSchema::nullable(schema),
                        default: None,
                        source: Some(Source::Element(name.clone())),
                    });
                }
                *record.fields.borrow_mut() = fields;
                Ok(AvroSchema::Record(record))
            }
        }
    }

    // ==========================================================================
    // Type resolution
    // ==========================================================================

    /// Resolve the Avro schema for an element particle or global element,
    /// whether its type comes from an inline `complexType`/`simpleType`
    /// child or a `type="..."` attribute.
    fn resolve_element_type(
        &mut self,
        el: Node<'a, 'a>,
        name_for_anon: &str,
    ) -> Result<AvroSchema, ConverterError> {
        if let Some(inline_complex) = el
            .children()
            .find(|n| n.is_element() && local_name(n) == "complexType")
        {
            let name_hint = inline_complex
                .attribute("name")
                .unwrap_or(name_for_anon)
                .to_string();
            let record = self.translate_complex_type(None, inline_complex, &name_hint)?;
            return Ok(AvroSchema::Record(record));
        }
        if let Some(inline_simple) = el
            .children()
            .find(|n| n.is_element() && local_name(n) == "simpleType")
        {
            return self.translate_simple_type(None, name_for_anon, inline_simple);
        }
        if let Some(type_attr) = el.attribute("type") {
            return self.resolve_named_type_schema(type_attr, el);
        }
        Ok(AvroSchema::String)
    }

    /// Resolve a `type="..."` reference to either a built-in XSD primitive
    /// or a globally declared simple/complex type.
    fn resolve_named_type_schema(
        &mut self,
        type_qname: &str,
        context: Node<'a, 'a>,
    ) -> Result<AvroSchema, ConverterError> {
        let local = local_part(type_qname);
        let prefix = type_qname.split(':').next().filter(|_| type_qname.contains(':'));
        let namespace = context.lookup_namespace_uri(prefix);
        if namespace == Some(XSD_NAMESPACE) {
            return Ok(primitive_for_xsd_local(local));
        }
        if let Some(node) = self.global_simple_types.get(local).copied() {
            return self.translate_simple_type(Some(local), local, node);
        }
        if let Some(node) = self.global_complex_types.get(local).copied() {
            let record = self.translate_complex_type(Some(local), node, local)?;
            return Ok(AvroSchema::Record(record));
        }
        Err(ConverterError::unsupported_construct(format!(
            "unknown type reference `{type_qname}`"
        )))
    }

    fn translate_simple_type(
        &mut self,
        xsd_name: Option<&str>,
        name_hint: &str,
        node: Node<'a, 'a>,
    ) -> Result<AvroSchema, ConverterError> {
        if let Some(name) = xsd_name
            && let Some(cached) = self.named_simple_type_cache.get(name)
        {
            return Ok(cached.clone());
        }

        let restriction = node
            .children()
            .find(|n| n.is_element() && local_name(n) == "restriction")
            .ok_or_else(|| ConverterError::unsupported_construct("simpleType without restriction"))?;

        let enum_values: Vec<String> = restriction
            .children()
            .filter(|n| n.is_element() && local_name(n) == "enumeration")
            .filter_map(|n| n.attribute("value").map(str::to_string))
            .collect();

        let schema = if !enum_values.is_empty() {
            let avro_name = self.registry.reserve_name(&sanitize(name_hint));
            let mut used_symbols = HashSet::new();
            let symbols: Vec<String> = enum_values
                .iter()
                .map(|v| dedup(&mut used_symbols, &sanitize(v)))
                .collect();
            AvroSchema::Enum(Rc::new(EnumSchema {
                name: avro_name,
                symbols,
            }))
        } else if let Some(base) = restriction.attribute("base") {
            self.resolve_named_type_schema(base, restriction)?
        } else {
            AvroSchema::String
        };

        if let Some(name) = xsd_name {
            self.named_simple_type_cache
                .insert(name.to_string(), schema.clone());
        }
        Ok(schema)
    }

    // ==========================================================================
    // Complex type bodies
    // ==========================================================================

    fn translate_complex_type(
        &mut self,
        xsd_name: Option<&str>,
        node: Node<'a, 'a>,
        name_hint: &str,
    ) -> Result<Rc<crate::model::schema::RecordSchema>, ConverterError> {
        if let Some(name) = xsd_name
            && let Some(existing) = self.registry.lookup(name)
        {
            return Ok(existing);
        }

        let avro_name = self.registry.reserve_name(&sanitize(name_hint));
        let record = self.registry.insert_placeholder(xsd_name, avro_name, None);

        let mut fields = Vec::new();
        let mut used_names = HashSet::new();

        // Inherited fields from a complexContent extension/restriction base.
        if let Some(base_qname) = complex_content_base(node) {
            let base_local = local_part(&base_qname);
            if let Some(base_node) = self.global_complex_types.get(base_local).copied() {
                let base_record = self.translate_complex_type(Some(base_local), base_node, base_local)?;
                for field in base_record.fields.borrow().iter() {
                    used_names.insert(field.name.clone());
                    fields.push(field.clone());
                }
            }
        }

        for attr_node in attribute_nodes(node) {
            if let Some(field) = self.translate_attribute(attr_node, &mut used_names)? {
                fields.push(field);
            }
        }

        if let Some(particle) = particle_node(node) {
            self.collect_particle_fields(particle, &mut fields, &mut used_names, false)?;
        }

        *record.fields.borrow_mut() = fields;
        Ok(record)
    }

    fn translate_attribute(
        &mut self,
        attr_node: Node<'a, 'a>,
        used_names: &mut HashSet<String>,
    ) -> Result<Option<Field>, ConverterError> {
        let use_kind = attr_node.attribute("use").unwrap_or("optional");
        if use_kind == "prohibited" {
            return Ok(None);
        }

        let (xml_name, resolved_node) = if let Some(name) = attr_node.attribute("name") {
            (name.to_string(), attr_node)
        } else if let Some(ref_attr) = attr_node.attribute("ref") {
            let target = local_part(ref_attr);
            let global = self
                .global_attributes
                .get(target)
                .copied()
                .ok_or_else(|| {
                    ConverterError::unsupported_construct(format!(
                        "attribute ref to unknown global attribute `{target}`"
                    ))
                })?;
            (target.to_string(), global)
        } else {
            return Err(ConverterError::unsupported_construct(
                "attribute particle without name or ref",
            ));
        };

        let type_schema = match resolved_node.attribute("type") {
            Some(type_attr) => self.resolve_named_type_schema(type_attr, resolved_node)?,
            None => AvroSchema::String,
        };
        let schema = if use_kind == "required" {
            type_schema
        } else {
            AvroSchema::nullable(type_schema)
        };

        let field_name = dedup(used_names, &sanitize(&xml_name));
        Ok(Some(Field {
            name: field_name,
            schema,
            default: None,
            source: Some(Source::Attribute(xml_name)),
        }))
    }

    fn collect_particle_fields(
        &mut self,
        particle: Node<'a, 'a>,
        fields: &mut Vec<Field>,
        used_names: &mut HashSet<String>,
        inside_choice: bool,
    ) -> Result<(), ConverterError> {
        let choice_context = inside_choice || local_name(&particle) == "choice";
        for child in particle.children().filter(|n| n.is_element()) {
            match local_name(&child) {
                "element" => {
                    self.translate_element_particle(child, fields, used_names, choice_context)?;
                }
                "any" => collect_wildcard_field(fields, used_names, self.quiet),
                "sequence" | "choice" | "all" => {
                    self.collect_particle_fields(child, fields, used_names, choice_context)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn translate_element_particle(
        &mut self,
        el: Node<'a, 'a>,
        fields: &mut Vec<Field>,
        used_names: &mut HashSet<String>,
        choice_context: bool,
    ) -> Result<(), ConverterError> {
        let min_occurs = el.attribute("minOccurs").unwrap_or("1");
        let max_occurs = el.attribute("maxOccurs").unwrap_or("1");
        let is_array = max_occurs == "unbounded"
            || max_occurs.parse::<u64>().map(|n| n > 1).unwrap_or(false);
        let is_optional = min_occurs == "0" || choice_context;

        let (xml_name, item_schema) = if let Some(ref_attr) = el.attribute("ref") {
            let target = local_part(ref_attr);
            let global = self.global_elements.get(target).copied().ok_or_else(|| {
                ConverterError::unsupported_construct(format!(
                    "element ref to unknown global element `{target}`"
                ))
            })?;
            let schema = self.resolve_element_type(global, target)?;
            (target.to_string(), schema)
        } else {
            let name = el.attribute("name").ok_or_else(|| {
                ConverterError::unsupported_construct("element particle without name or ref")
            })?;
            let schema = self.resolve_element_type(el, name)?;
            (name.to_string(), schema)
        };

        let schema = if is_array {
            AvroSchema::Array(Box::new(item_schema))
        } else if is_optional {
            AvroSchema::nullable(item_schema)
        } else {
            item_schema
        };

        let field_name = dedup(used_names, &sanitize(&xml_name));
        fields.push(Field {
            name: field_name,
            schema,
            default: None,
            source: Some(Source::Element(xml_name)),
        });
        Ok(())
    }
}

/// `xs:any` wildcards collapse to a single `map<string>` field (§4.3);
/// a second or third sibling `xs:any` is a no-op once the field exists.
fn collect_wildcard_field(fields: &mut Vec<Field>, used_names: &mut HashSet<String>, quiet: bool) {
    if fields.iter().any(|f| f.name == WILDCARD_FIELD_NAME) {
        if !quiet {
            log::debug!(
                "collapsing additional xs:any sibling into existing `{WILDCARD_FIELD_NAME}` field"
            );
        }
        return;
    }
    used_names.insert(WILDCARD_FIELD_NAME.to_string());
    fields.push(Field {
        name: WILDCARD_FIELD_NAME.to_string(),
        schema: AvroSchema::Map(Box::new(AvroSchema::String)),
        default: None,
        source: None,
    });
}

/// Primitive type mapping (§4.3) for built-in XSD simple types.
fn primitive_for_xsd_local(local: &str) -> AvroSchema {
    match local {
        "boolean" => AvroSchema::Boolean,
        "byte" | "short" | "int" | "unsignedByte" | "unsignedShort" => AvroSchema::Int,
        "long" | "unsignedInt" => AvroSchema::Long,
        "float" => AvroSchema::Float,
        "double" | "decimal" => AvroSchema::Double,
        "hexBinary" | "base64Binary" => AvroSchema::Bytes,
        _ => AvroSchema::String,
    }
}

fn attribute_nodes<'a>(type_node: Node<'a, 'a>) -> Vec<Node<'a, 'a>> {
    let mut attrs: Vec<Node<'a, 'a>> = type_node
        .children()
        .filter(|n| n.is_element() && local_name(n) == "attribute")
        .collect();
    for content in type_node
        .children()
        .filter(|n| n.is_element() && matches!(local_name(n), "simpleContent" | "complexContent"))
    {
        for ext in content
            .children()
            .filter(|n| n.is_element() && matches!(local_name(n), "extension" | "restriction"))
        {
            attrs.extend(
                ext.children()
                    .filter(|n| n.is_element() && local_name(n) == "attribute"),
            );
        }
    }
    attrs
}

fn particle_node<'a>(type_node: Node<'a, 'a>) -> Option<Node<'a, 'a>> {
    if let Some(p) = type_node
        .children()
        .find(|n| n.is_element() && matches!(local_name(n), "sequence" | "all" | "choice"))
    {
        return Some(p);
    }
    type_node
        .children()
        .filter(|n| n.is_element() && local_name(n) == "complexContent")
        .flat_map(|c| c.children())
        .filter(|n| n.is_element() && matches!(local_name(n), "extension" | "restriction"))
        .find_map(|ext| {
            ext.children()
                .find(|n| n.is_element() && matches!(local_name(n), "sequence" | "all" | "choice"))
        })
}

fn complex_content_base(type_node: Node) -> Option<String> {
    type_node
        .children()
        .filter(|n| n.is_element() && local_name(n) == "complexContent")
        .flat_map(|c| c.children())
        .filter(|n| n.is_element() && matches!(local_name(n), "extension" | "restriction"))
        .find_map(|ext| ext.attribute("base").map(str::to_string))
}
