//! Value codec for networked stores
//!
//! Values crossing into a backend are serialized to MessagePack. The codec is
//! applied by the container layer, so every backend speaks the same byte
//! format and a value written through one backend instance deserializes
//! through any other. A value that fails to serialize is a programmer error
//! and the failure propagates immediately; nothing is ever cached in its
//! place.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Serialize a value to its stored byte representation.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(value)?)
}

/// Deserialize a value from its stored byte representation.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: u64,
        name: String,
        scores: Vec<i32>,
        attributes: HashMap<String, String>,
    }

    #[test]
    fn test_round_trip_structured_value() {
        let record = Record {
            id: 42,
            name: "widget".to_string(),
            scores: vec![1, -2, 3],
            attributes: HashMap::from([("color".to_string(), "red".to_string())]),
        };

        let bytes = encode(&record).unwrap();
        let decoded: Record = decode(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<Record> = decode(&[0xc1, 0xff, 0x00]);
        assert!(result.is_err());
    }
}
