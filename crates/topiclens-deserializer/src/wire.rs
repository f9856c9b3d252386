//! Confluent Wire Format
//!
//! Registry-aware producers frame every Avro message as
//! `[magic_byte(1)][schema_id(4)][data(N)]`. Detection looks at the first five
//! bytes only; anything else is treated as an ordinary payload.

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Schema registry identifier embedded in a framed payload.
pub type SchemaId = i32;

/// Magic byte indicating schema ID is present
pub const MAGIC_BYTE: u8 = 0x00;

/// Magic byte plus the big-endian schema ID
pub const HEADER_LEN: usize = 5;

/// Return the embedded schema ID if `data` carries the Confluent framing.
///
/// Short buffers and a wrong magic byte are normal, not errors.
pub fn detect(data: &[u8]) -> Option<SchemaId> {
    split(data).map(|(schema_id, _)| schema_id)
}

/// Split a framed payload into its schema ID and Avro body.
///
/// Returns (schema_id, data_without_header)
pub fn split(data: &[u8]) -> Option<(SchemaId, &[u8])> {
    if data.len() < HEADER_LEN || data[0] != MAGIC_BYTE {
        return None;
    }

    // Extract schema ID (big-endian)
    let mut id_bytes = &data[1..HEADER_LEN];
    let schema_id = id_bytes.get_i32();

    Some((schema_id, &data[HEADER_LEN..]))
}

/// Frame an already encoded Avro body with the magic byte and schema ID.
pub fn frame(schema_id: SchemaId, body: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + body.len());
    buf.put_u8(MAGIC_BYTE);
    buf.put_i32(schema_id);
    buf.put_slice(body);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_and_split() {
        let framed = frame(123, b"hello world");

        assert_eq!(framed[0], MAGIC_BYTE);
        assert_eq!(&framed[1..5], &[0, 0, 0, 123]);
        assert_eq!(framed.len(), HEADER_LEN + 11);

        let (schema_id, body) = split(&framed).unwrap();
        assert_eq!(schema_id, 123);
        assert_eq!(body, b"hello world");
    }

    #[test]
    fn test_detect_invalid_magic_byte() {
        let data = vec![0xFF, 0x00, 0x00, 0x00, 0x01, 0x42];
        assert_eq!(detect(&data), None);
    }

    #[test]
    fn test_detect_too_short() {
        assert_eq!(detect(&[]), None);
        assert_eq!(detect(&[0x00, 0x01]), None);
        assert_eq!(detect(&[0x00, 0x00, 0x00, 0x01]), None);
    }

    #[test]
    fn test_header_only_has_empty_body() {
        let (schema_id, body) = split(&[0x00, 0x00, 0x00, 0x00, 0x07]).unwrap();
        assert_eq!(schema_id, 7);
        assert!(body.is_empty());
    }

    #[test]
    fn test_schema_id_is_signed_big_endian() {
        assert_eq!(detect(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF]), Some(-1));
        assert_eq!(detect(&[0x00, 0x01, 0x02, 0x03, 0x04, 0xAA]), Some(0x0102_0304));
        assert_eq!(detect(&[0x00, 0x80, 0x00, 0x00, 0x00]), Some(i32::MIN));
    }

    #[test]
    fn test_detection_ignores_body() {
        let a = [0x00, 0x00, 0x00, 0x00, 0x09, 0x01, 0x02];
        let b = [0x00, 0x00, 0x00, 0x00, 0x09, 0xFF];
        assert_eq!(detect(&a), detect(&b));
    }
}
