//! Error types for the codec and the shared-store boundary.
//!
//! Pool and rule operations never fail; only encoding, decoding and calls
//! to the external store can.

use thiserror::Error;

/// A snapshot could not be turned back into deck state.
///
/// Callers recover by starting from a fresh default deck.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("snapshot is empty")]
    Empty,

    #[error("failed to decompress snapshot: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// A snapshot could not be serialized.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to compress snapshot: {0}")]
    Compress(#[from] std::io::Error),
}

/// A call to the external store failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// A local change could not be published.
///
/// The in-memory deck keeps the change; nothing is retried automatically.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to publish snapshot: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(DecodeError::Empty.to_string(), "snapshot is empty");
        assert_eq!(
            DecodeError::Inconsistent("duplicate card #3".into()).to_string(),
            "inconsistent snapshot: duplicate card #3"
        );
        let publish: PublishError = StoreError::Unavailable("offline".into()).into();
        assert_eq!(
            publish.to_string(),
            "failed to publish snapshot: store unavailable: offline"
        );
    }
}
