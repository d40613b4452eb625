//! Serializer capability
//!
//! Encodes entities into their at-rest cache form. Implementations must be
//! symmetric: deserializing bytes produced by `serialize` reconstructs an
//! entity equal in all fields to the original.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::BoxError;

/// Pluggable payload codec for cached entities.
pub trait Serializer: Send + Sync {
    /// Encode an entity into its at-rest byte form.
    fn serialize<E: Serialize>(&self, entry: &E) -> Result<Vec<u8>, BoxError>;

    /// Decode at-rest bytes, overwriting the referenced entity.
    fn deserialize<E: DeserializeOwned>(&self, bytes: &[u8], entry: &mut E) -> Result<(), BoxError>;
}

/// JSON codec, the default serializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<E: Serialize>(&self, entry: &E) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec(entry)?)
    }

    fn deserialize<E: DeserializeOwned>(&self, bytes: &[u8], entry: &mut E) -> Result<(), BoxError> {
        *entry = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: i64,
        name: String,
        score: Option<f64>,
    }

    #[test]
    fn json_round_trip_reconstructs_equal_entry() {
        let original = Sample {
            id: 9,
            name: "nine".to_owned(),
            score: Some(0.5),
        };
        let bytes = JsonSerializer.serialize(&original).unwrap();

        let mut restored = Sample {
            id: 0,
            name: String::new(),
            score: None,
        };
        JsonSerializer.deserialize(&bytes, &mut restored).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn corrupt_payload_is_an_error() {
        let mut target = Sample {
            id: 0,
            name: String::new(),
            score: None,
        };
        assert!(JsonSerializer.deserialize(b"{not json", &mut target).is_err());
    }
}
