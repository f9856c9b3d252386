#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use topiclens_deserializer::{wire, Deserializer, MemorySchemaSource};

const PERSON_SCHEMA: &str = r#"{"type":"record","name":"Person","fields":[{"name":"Name","type":"string"},{"name":"Age","type":"int"},{"name":"Tags","type":{"type":"array","items":"string"}}]}"#;

fuzz_target!(|data: &[u8]| {
    // Fuzz wire-format detection and the decode path.
    // Tests handling of:
    // - Short and unframed buffers
    // - Garbage Avro bodies behind a valid header
    // - Invalid UTF-8 in pass-through text

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let source = Arc::new(MemorySchemaSource::new());
    source.register(1, PERSON_SCHEMA);
    let deserializer = Deserializer::builder().schema_source(source).build();

    let result = runtime.block_on(deserializer.deserialize(data));

    match wire::detect(data) {
        // Unframed input must never fail
        None => {
            let decoded = result.unwrap();
            assert!(decoded.schema.is_empty());
            assert_eq!(decoded.value, String::from_utf8_lossy(data));
        }
        Some(_) => {
            if let Ok(decoded) = result {
                assert_eq!(decoded.schema, PERSON_SCHEMA);
                serde_json::from_str::<serde_json::Value>(&decoded.value).unwrap();
            }
        }
    }
});
