//! Avro Decoding
//!
//! Compiles schema text with `apache_avro` and decodes a single datum into
//! JSON. Record fields keep the order declared in the schema, map entries are
//! sorted by key, so the same payload always yields the same text.

use crate::error::{DeserializeError, Result};
use apache_avro::types::Value;
use apache_avro::Schema;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

/// Compiled decoder for one writer schema
#[derive(Debug, Clone)]
pub struct AvroDecoder {
    schema: Schema,
}

impl AvroDecoder {
    /// Parse `schema_text` into a decoder.
    pub fn compile(schema_text: &str) -> Result<Self> {
        let schema = Schema::parse_str(schema_text)
            .map_err(DeserializeError::schema_compile)?;
        Ok(Self { schema })
    }

    /// Decode one Avro datum from `data`.
    ///
    /// Bytes left over after the datum are ignored.
    pub fn decode(&self, data: &[u8]) -> Result<Value> {
        let mut reader = data;
        let value = apache_avro::from_avro_datum(&self.schema, &mut reader, None)
            .map_err(|e| DeserializeError::PayloadDecode(Box::new(e)))?;

        if !reader.is_empty() {
            debug!(
                trailing_bytes = reader.len(),
                "Ignoring bytes after Avro datum"
            );
        }

        Ok(value)
    }

    /// Decode one datum and render it as compact JSON text.
    pub fn decode_to_json(&self, data: &[u8]) -> Result<String> {
        let json = to_json(self.decode(data)?)?;
        serde_json::to_string(&json).map_err(|e| DeserializeError::JsonEncode(e.to_string()))
    }
}

/// Convert a decoded Avro value into JSON.
///
/// Unions render as the value of their selected branch.
pub fn to_json(value: Value) -> Result<JsonValue> {
    match value {
        Value::Record(fields) => {
            let mut object = Map::with_capacity(fields.len());
            for (name, field) in fields {
                object.insert(name, to_json(field)?);
            }
            Ok(JsonValue::Object(object))
        }
        Value::Map(entries) => {
            let mut entries: Vec<_> = entries.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut object = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                object.insert(key, to_json(entry)?);
            }
            Ok(JsonValue::Object(object))
        }
        Value::Array(items) => items
            .into_iter()
            .map(to_json)
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        Value::Union(_, inner) => to_json(*inner),
        other => JsonValue::try_from(other)
            .map_err(|e| DeserializeError::JsonEncode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apache_avro::types::Record;
    use std::collections::HashMap;

    const PERSON: &str = r#"{"type":"record","name":"Person","fields":[{"name":"Name","type":"string"},{"name":"Age","type":"int"}]}"#;

    fn encode_person(name: &str, age: i32) -> Vec<u8> {
        let schema = Schema::parse_str(PERSON).unwrap();
        let mut record = Record::new(&schema).unwrap();
        record.put("Name", name);
        record.put("Age", age);
        apache_avro::to_avro_datum(&schema, record).unwrap()
    }

    #[test]
    fn test_decode_record_in_field_order() {
        let decoder = AvroDecoder::compile(PERSON).unwrap();
        let json = decoder.decode_to_json(&encode_person("John", 21)).unwrap();
        assert_eq!(json, r#"{"Name":"John","Age":21}"#);
    }

    #[test]
    fn test_invalid_schema_is_compile_error() {
        let err = AvroDecoder::compile("{invalid}").unwrap_err();
        assert!(matches!(err, DeserializeError::SchemaCompile(_)));
        assert_eq!(err.to_string(), "key must be a string at line 1 column 2");
    }

    #[test]
    fn test_json_that_is_not_avro_is_compile_error() {
        let err = AvroDecoder::compile(r#"{"type": "nope"}"#).unwrap_err();
        assert!(matches!(err, DeserializeError::SchemaCompile(_)));
    }

    #[test]
    fn test_truncated_payload_is_decode_error() {
        let decoder = AvroDecoder::compile(PERSON).unwrap();
        let body = encode_person("John", 21);

        let err = decoder.decode(&body[..2]).unwrap_err();
        assert!(matches!(err, DeserializeError::PayloadDecode(_)));

        let err = decoder.decode(&[]).unwrap_err();
        assert!(matches!(err, DeserializeError::PayloadDecode(_)));
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let decoder = AvroDecoder::compile(PERSON).unwrap();
        let mut body = encode_person("Ann", 3);
        body.extend_from_slice(&[0xDE, 0xAD]);

        let json = decoder.decode_to_json(&body).unwrap();
        assert_eq!(json, r#"{"Name":"Ann","Age":3}"#);
    }

    #[test]
    fn test_non_finite_double_is_json_error() {
        let decoder = AvroDecoder::compile(r#"{"type": "double"}"#).unwrap();
        let body = f64::NAN.to_le_bytes();

        let err = decoder.decode_to_json(&body).unwrap_err();
        assert!(matches!(err, DeserializeError::JsonEncode(_)));
        assert!(err.is_decode_error());
        assert!(err.to_string().starts_with("cannot encode decoded value as JSON"));

        let record = Value::Record(vec![("score".to_string(), Value::Double(f64::INFINITY))]);
        assert!(matches!(to_json(record), Err(DeserializeError::JsonEncode(_))));
    }

    #[test]
    fn test_union_renders_selected_branch() {
        let schema = r#"{"type":"record","name":"R","fields":[
            {"name":"a","type":["null","string"]},
            {"name":"b","type":["null","long"]}
        ]}"#;
        let decoder = AvroDecoder::compile(schema).unwrap();

        // a = union branch 1 "hi", b = union branch 0 null
        let body = [0x02, 0x04, b'h', b'i', 0x00];
        let json = decoder.decode_to_json(&body).unwrap();
        assert_eq!(json, r#"{"a":"hi","b":null}"#);
    }

    #[test]
    fn test_map_keys_are_sorted() {
        let mut entries = HashMap::new();
        entries.insert("zeta".to_string(), Value::Int(1));
        entries.insert("alpha".to_string(), Value::Int(2));
        entries.insert("mid".to_string(), Value::Int(3));

        let json = serde_json::to_string(&to_json(Value::Map(entries)).unwrap()).unwrap();
        assert_eq!(json, r#"{"alpha":2,"mid":3,"zeta":1}"#);
    }

    #[test]
    fn test_nested_values() {
        let value = Value::Record(vec![
            (
                "tags".to_string(),
                Value::Array(vec![Value::String("x".into()), Value::String("y".into())]),
            ),
            ("flag".to_string(), Value::Boolean(true)),
            ("kind".to_string(), Value::Enum(1, "BLUE".to_string())),
            ("score".to_string(), Value::Double(1.5)),
        ]);

        let json = serde_json::to_string(&to_json(value).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"tags":["x","y"],"flag":true,"kind":"BLUE","score":1.5}"#
        );
    }
}
