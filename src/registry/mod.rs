//! Player registry: local players reconciled against the host's characters.
//!
//! ## Key Types
//!
//! - `PlayerRegistry`: Ordered players, unique by `CharacterId`
//! - `CharacterMeta`: Initiative metadata carried by a character record
//! - `ReconcileOutcome`: Adds and removes from one reconciliation

pub mod players;

pub use players::{CharacterMeta, PlayerRegistry, ReconcileOutcome};
