//! Value codec for records kept in the coordination service.
//!
//! Records are serialized with bincode and stored as standard base64 text.
//! Encoding is deterministic: equal values always produce equal strings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Codec failures.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Serialize a record to its stored representation.
pub fn encode<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let flat = bincode::serialize(value)?;
    Ok(STANDARD.encode(flat))
}

/// Parse a stored representation back into a record.
pub fn decode<T: DeserializeOwned>(stored: &str) -> Result<T, CodecError> {
    let flat = STANDARD.decode(stored)?;
    Ok(bincode::deserialize(&flat)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{ClusterNodeState, LoggedCertificate};

    #[test]
    fn test_encode_is_deterministic_base64() {
        let cert = LoggedCertificate::x509(9000, "leaf");
        let a = encode(&cert).unwrap();
        let b = encode(&cert.clone()).unwrap();
        assert_eq!(a, b);
        assert!(STANDARD.decode(&a).is_ok());
    }

    #[test]
    fn test_decode_restores_node_state() {
        let state = ClusterNodeState::new("node-1", 2342);
        let decoded: ClusterNodeState = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode::<LoggedCertificate>("not base64!"),
            Err(CodecError::Base64(_))
        ));
        assert!(matches!(
            decode::<LoggedCertificate>(&STANDARD.encode([0xffu8; 3])),
            Err(CodecError::Serialization(_))
        ));
    }
}
