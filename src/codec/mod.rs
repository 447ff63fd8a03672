//! State codec: `DeckMeta` to bytes and back.
//!
//! Snapshots are JSON compressed with gzip, so every encoded blob starts
//! with the gzip magic `1f 8b`. Decoding also accepts bare JSON, the form
//! written before compression was introduced.
//!
//! ## Legacy Fields
//!
//! Older snapshots carry keys that no longer mean anything (`discard`,
//! `pool`, `drawDeck`, `chosenList`, `currentPlayer`, `currentRound`).
//! They are stripped before typed parsing rather than rejected.
//!
//! ```
//! use initiative_deck::codec::{decode, encode, DeckMeta};
//! use initiative_deck::core::{Deck, DeckConfig};
//!
//! let deck = Deck::new(DeckConfig::default(), 1);
//! let bytes = encode(&DeckMeta::capture(&deck, 1, "client")).unwrap();
//! assert_eq!(bytes[0], 0x1f);
//!
//! let meta = decode(&bytes).unwrap();
//! assert_eq!(meta.draw_pile.len(), 56);
//! ```

pub mod meta;

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::rng::DeckRng;
use crate::core::{Deck, DeckConfig};
use crate::error::{DecodeError, EncodeError};

pub use meta::{CardMeta, DeckMeta, PlayerMeta};

/// Leading bytes of every compressed snapshot.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Keys dropped from older snapshots before parsing.
pub const LEGACY_KEYS: [&str; 6] = [
    "discard",
    "pool",
    "drawDeck",
    "chosenList",
    "currentPlayer",
    "currentRound",
];

/// Serialize and compress a snapshot.
pub fn encode(meta: &DeckMeta) -> Result<Vec<u8>, EncodeError> {
    let json = serde_json::to_vec(meta)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let bytes = encoder.finish()?;
    debug!(json = json.len(), compressed = bytes.len(), "snapshot encoded");
    Ok(bytes)
}

/// Check whether bytes carry the compression signature.
#[must_use]
pub fn is_compressed(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decompress (when compressed) and parse a snapshot.
pub fn decode(bytes: &[u8]) -> Result<DeckMeta, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let json = if is_compressed(bytes) {
        let mut json = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut json)
            .map_err(DecodeError::Decompress)?;
        json
    } else {
        bytes.to_vec()
    };

    let mut value: Value = serde_json::from_slice(&json)?;
    strip_legacy(&mut value);
    Ok(serde_json::from_value(value)?)
}

/// Remove obsolete top-level keys from a parsed snapshot.
pub fn strip_legacy(value: &mut Value) {
    if let Value::Object(map) = value {
        for key in LEGACY_KEYS {
            if map.remove(key).is_some() {
                debug!(key, "dropped legacy snapshot field");
            }
        }
    }
}

/// Decode a snapshot into a deck, falling back to a fresh default deck
/// (56 cards, default configuration, no players) on any failure.
pub fn decode_or_default(bytes: &[u8], rng: DeckRng) -> Deck {
    let meta = match decode(bytes) {
        Ok(meta) => meta,
        Err(err) => {
            warn!(%err, "unreadable snapshot, starting from a fresh deck");
            return Deck::with_rng(DeckConfig::default(), rng);
        }
    };
    match meta.into_deck(rng.clone()) {
        Ok(deck) => deck,
        Err(err) => {
            warn!(%err, "inconsistent snapshot, starting from a fresh deck");
            Deck::with_rng(DeckConfig::default(), rng)
        }
    }
}
