// ==============================================================================
// JSON Serialization for Avro Schemas
// ==============================================================================
//
// Serializes the domain model in `model::schema` to the JSON shape a
// standard Avro runtime expects. Key rules:
//
// - Named types (record, enum) are serialized inline on FIRST occurrence,
//   then as bare string names afterward -- this is what lets a cyclic schema
//   graph (see `RecordSchema`'s `Rc<RefCell<..>>` sharing) terminate when
//   rendered to JSON.
// - Primitives serialize as plain strings: "null", "int", etc.
// - Unions serialize as JSON arrays: ["null", "string"].
// - Fields (and the synthetic document-wrapper record) carry a `source`
//   property holding the string form of their `Source` annotation.

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use super::schema::{AvroSchema, Field, RecordSchema};

/// Serialize an `AvroSchema` to JSON. For named types, the first occurrence
/// (by name) is serialized inline; subsequent occurrences become bare name
/// strings, exactly as Avro tooling expects for repeated/recursive
/// references.
pub fn schema_to_json(schema: &AvroSchema) -> Value {
    let mut known_names = IndexSet::new();
    schema_to_json_inner(schema, &mut known_names)
}

fn schema_to_json_inner(schema: &AvroSchema, known_names: &mut IndexSet<String>) -> Value {
    match schema {
        AvroSchema::Null => Value::String("null".to_string()),
        AvroSchema::Boolean => Value::String("boolean".to_string()),
        AvroSchema::Int => Value::String("int".to_string()),
        AvroSchema::Long => Value::String("long".to_string()),
        AvroSchema::Float => Value::String("float".to_string()),
        AvroSchema::Double => Value::String("double".to_string()),
        AvroSchema::Bytes => Value::String("bytes".to_string()),
        AvroSchema::String => Value::String("string".to_string()),

        AvroSchema::Record(record) => {
            if known_names.contains(&record.name) {
                return Value::String(record.name.clone());
            }
            known_names.insert(record.name.clone());
            record_to_json(record, known_names)
        }

        AvroSchema::Enum(e) => {
            if known_names.contains(&e.name) {
                return Value::String(e.name.clone());
            }
            known_names.insert(e.name.clone());
            let mut obj = IndexMap::new();
            obj.insert("type".to_string(), Value::String("enum".to_string()));
            obj.insert("name".to_string(), Value::String(e.name.clone()));
            let symbols: Vec<Value> = e.symbols.iter().map(|s| Value::String(s.clone())).collect();
            obj.insert("symbols".to_string(), Value::Array(symbols));
            indexmap_to_value(obj)
        }

        AvroSchema::Array(items) => {
            let mut obj = IndexMap::new();
            obj.insert("type".to_string(), Value::String("array".to_string()));
            obj.insert("items".to_string(), schema_to_json_inner(items, known_names));
            indexmap_to_value(obj)
        }

        AvroSchema::Map(values) => {
            let mut obj = IndexMap::new();
            obj.insert("type".to_string(), Value::String("map".to_string()));
            obj.insert(
                "values".to_string(),
                schema_to_json_inner(values, known_names),
            );
            indexmap_to_value(obj)
        }

        AvroSchema::Union(types) => {
            let types_json: Vec<Value> = types
                .iter()
                .map(|t| schema_to_json_inner(t, known_names))
                .collect();
            Value::Array(types_json)
        }
    }
}

fn record_to_json(record: &RecordSchema, known_names: &mut IndexSet<String>) -> Value {
    let mut obj = IndexMap::new();
    obj.insert("type".to_string(), Value::String("record".to_string()));
    obj.insert("name".to_string(), Value::String(record.name.clone()));
    let fields_json: Vec<Value> = record
        .fields
        .borrow()
        .iter()
        .map(|f| field_to_json(f, known_names))
        .collect();
    obj.insert("fields".to_string(), Value::Array(fields_json));
    if let Some(source) = &record.source {
        obj.insert("source".to_string(), Value::String(source.to_property()));
    }
    indexmap_to_value(obj)
}

fn field_to_json(field: &Field, known_names: &mut IndexSet<String>) -> Value {
    let mut obj = IndexMap::new();
    obj.insert("name".to_string(), Value::String(field.name.clone()));
    obj.insert(
        "type".to_string(),
        schema_to_json_inner(&field.schema, known_names),
    );
    if let Some(default) = &field.default {
        obj.insert("default".to_string(), default.clone());
    }
    if let Some(source) = &field.source {
        obj.insert("source".to_string(), Value::String(source.to_property()));
    }
    indexmap_to_value(obj)
}

/// Convert an `IndexMap` to a `serde_json::Value::Object`, preserving
/// insertion order.
fn indexmap_to_value(map: IndexMap<String, Value>) -> Value {
    let json_map: Map<String, Value> = map.into_iter().collect();
    Value::Object(json_map)
}
