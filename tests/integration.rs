// ==============================================================================
// Integration Tests: XSD -> Avro Schema -> XML Datum, End to End
// ==============================================================================
//
// Each test builds a schema from an inline XSD, optionally serializes it to
// JSON to check its shape, and then builds a datum from an inline XML
// document against that schema.

mod common;

use common::{schema_for, XS};
use pretty_assertions::assert_eq;
use serde_json::json;
use xsd_avro::{create_datum, create_schema, schema_to_json};

#[test]
fn single_primitive_element_is_a_bare_primitive_schema() {
    let schema = schema_for(r#"<xs:element name="count" type="xs:int"/>"#);
    assert_eq!(schema_to_json(&schema), json!("int"));

    let datum = create_datum(&schema, "<count>12</count>").unwrap();
    assert_eq!(datum, apache_avro::types::Value::Int(12));
}

#[test]
fn several_global_elements_produce_a_document_wrapper() {
    let schema = schema_for(
        r#"
        <xs:element name="ping" type="xs:string"/>
        <xs:element name="pong" type="xs:int"/>
        "#,
    );
    let json_shape = schema_to_json(&schema);
    assert_eq!(json_shape["type"], json!("record"));
    let field_names: Vec<&str> = json_shape["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(field_names, vec!["ping", "pong"]);

    let datum = create_datum(&schema, "<pong>5</pong>").unwrap();
    let apache_avro::types::Value::Record(pairs) = datum else {
        panic!("expected record datum")
    };
    assert_eq!(
        pairs[0],
        (
            "ping".to_string(),
            apache_avro::types::Value::Union(1, Box::new(apache_avro::types::Value::Null))
        )
    );
    assert_eq!(
        pairs[1],
        (
            "pong".to_string(),
            apache_avro::types::Value::Union(0, Box::new(apache_avro::types::Value::Int(5)))
        )
    );
}

#[test]
fn self_referential_complex_type_shares_the_same_record_node() {
    let xsd = format!(
        r#"<xs:schema {XS}>
            <xs:complexType name="tree">
                <xs:sequence>
                    <xs:element name="left" type="tree" minOccurs="0"/>
                    <xs:element name="right" type="tree" minOccurs="0"/>
                </xs:sequence>
            </xs:complexType>
            <xs:element name="root" type="tree"/>
        </xs:schema>"#
    );
    let schema = create_schema(&xsd).unwrap();
    let json_shape = schema_to_json(&schema);
    // The record is serialized inline once; any further self-reference
    // appears as a bare name string, proving identity was preserved.
    let left_type = &json_shape["fields"][0]["type"][0];
    assert!(left_type.is_string());

    let datum = create_datum(&schema, "<root><left><left/></left></root>").unwrap();
    let apache_avro::types::Value::Record(fields) = datum else {
        panic!("expected record");
    };
    let apache_avro::types::Value::Union(_, left) = &fields[0].1 else {
        panic!("expected union");
    };
    let apache_avro::types::Value::Record(left_fields) = left.as_ref() else {
        panic!("expected record");
    };
    assert!(matches!(left_fields[0].1, apache_avro::types::Value::Union(0, _)));
}

#[test]
fn unbounded_element_becomes_an_avro_array() {
    let schema = schema_for(
        r#"
        <xs:element name="root">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="item" type="xs:string" maxOccurs="unbounded"/>
                </xs:sequence>
            </xs:complexType>
        </xs:element>
        "#,
    );
    assert_eq!(
        schema_to_json(&schema)["fields"][0]["type"],
        json!({"type": "array", "items": "string"})
    );

    let datum = create_datum(&schema, "<root><item>a</item><item>b</item><item>c</item></root>").unwrap();
    let apache_avro::types::Value::Record(fields) = datum else {
        panic!("expected record");
    };
    assert_eq!(
        fields[0].1,
        apache_avro::types::Value::Array(vec![
            apache_avro::types::Value::String("a".to_string()),
            apache_avro::types::Value::String("b".to_string()),
            apache_avro::types::Value::String("c".to_string()),
        ])
    );
}

#[test]
fn choice_branches_are_all_nullable_and_exactly_one_is_set() {
    let schema = schema_for(
        r#"
        <xs:element name="root">
            <xs:complexType>
                <xs:choice>
                    <xs:element name="a" type="xs:string"/>
                    <xs:element name="b" type="xs:int"/>
                </xs:choice>
            </xs:complexType>
        </xs:element>
        "#,
    );
    let datum = create_datum(&schema, "<root><a>hi</a></root>").unwrap();
    let apache_avro::types::Value::Record(fields) = datum else {
        panic!("expected record");
    };
    assert_eq!(
        fields[0].1,
        apache_avro::types::Value::Union(0, Box::new(apache_avro::types::Value::String("hi".to_string())))
    );
    assert_eq!(
        fields[1].1,
        apache_avro::types::Value::Union(1, Box::new(apache_avro::types::Value::Null))
    );
}

#[test]
fn any_wildcard_collects_unmapped_children_into_a_map() {
    let schema = schema_for(
        r#"
        <xs:element name="root">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="known" type="xs:string"/>
                    <xs:any/>
                    <xs:any/>
                </xs:sequence>
            </xs:complexType>
        </xs:element>
        "#,
    );
    let fields_json = schema_to_json(&schema)["fields"].clone();
    assert_eq!(fields_json.as_array().unwrap().len(), 2, "two xs:any siblings collapse to one field");

    let datum = create_datum(&schema, "<root><known>k</known><extra>e</extra><more>m</more></root>").unwrap();
    let apache_avro::types::Value::Record(fields) = datum else {
        panic!("expected record");
    };
    let apache_avro::types::Value::Map(map) = &fields[1].1 else {
        panic!("expected map");
    };
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.get("extra"),
        Some(&apache_avro::types::Value::String("e".to_string()))
    );
}

#[test]
fn enumeration_simple_type_becomes_avro_enum() {
    let schema = schema_for(
        r#"
        <xs:simpleType name="Suit">
            <xs:restriction base="xs:string">
                <xs:enumeration value="Hearts"/>
                <xs:enumeration value="Spades"/>
            </xs:restriction>
        </xs:simpleType>
        <xs:element name="suit" type="Suit"/>
        "#,
    );
    assert_eq!(
        schema_to_json(&schema)["symbols"],
        json!(["Hearts", "Spades"])
    );
    let datum = create_datum(&schema, "<suit>Spades</suit>").unwrap();
    assert_eq!(datum, apache_avro::types::Value::Enum(1, "Spades".to_string()));
}

#[test]
fn prohibited_attribute_use_produces_no_field_and_is_ignored_in_xml() {
    let schema = schema_for(
        r#"
        <xs:element name="root">
            <xs:complexType>
                <xs:attribute name="legacy" type="xs:string" use="prohibited"/>
                <xs:attribute name="id" type="xs:int" use="required"/>
            </xs:complexType>
        </xs:element>
        "#,
    );
    let fields = schema_to_json(&schema)["fields"].as_array().unwrap().clone();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["name"], json!("id"));

    let datum = create_datum(&schema, r#"<root id="3" legacy="ignored"/>"#).unwrap();
    assert_eq!(
        datum,
        apache_avro::types::Value::Record(vec![("id".to_string(), apache_avro::types::Value::Int(3))])
    );
}

#[test]
fn element_and_attribute_name_collision_gets_suffixed() {
    let schema = schema_for(
        r#"
        <xs:element name="root">
            <xs:complexType>
                <xs:attribute name="id" type="xs:string"/>
                <xs:sequence>
                    <xs:element name="id" type="xs:int"/>
                </xs:sequence>
            </xs:complexType>
        </xs:element>
        "#,
    );
    let names: Vec<String> = schema_to_json(&schema)["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["id", "id0"]);
}

#[test]
fn missing_required_scalar_field_is_an_error() {
    let schema = schema_for(
        r#"
        <xs:element name="root">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="required_value" type="xs:string"/>
                </xs:sequence>
            </xs:complexType>
        </xs:element>
        "#,
    );
    let err = create_datum(&schema, "<root></root>").unwrap_err();
    assert!(err.to_string().contains("required_value"));
}

#[test]
fn missing_namespace_is_reported_clearly() {
    let err = create_schema("<schema><element name=\"a\" type=\"int\"/></schema>").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("namespace"));
}
