//! Deck and synchronization configuration.
//!
//! - `DeckConfig`: The user-facing configuration surface; travels inside
//!   every snapshot and is round-tripped verbatim
//! - `SyncConfig`: Per-client settings for the synchronization controller
//!
//! Both follow the builder style: start from `default()` and chain
//! `with_*` calls.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of card back artworks available.
pub const BACK_STYLE_COUNT: u8 = 6;

/// Metadata key this crate owns in the shared session store.
pub const DEFAULT_META_KEY: &str = "initiative-deck/deck";

/// Deck configuration shared by every client.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckConfig {
    /// Deck has four jokers (56 cards) instead of two (54 cards).
    pub use_four_jokers: bool,

    /// Card back artwork, `0..BACK_STYLE_COUNT`.
    pub back_style_index: u8,

    /// Display scale for the rendering layer. Always finite.
    #[serde(deserialize_with = "finite_scale")]
    pub scale: f32,

    /// Show the discard pile.
    pub show_discard: bool,

    /// Show the special pool.
    pub show_pool: bool,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            use_four_jokers: true,
            back_style_index: 0,
            scale: 1.0,
            show_discard: true,
            show_pool: true,
        }
    }
}

impl DeckConfig {
    /// Set the joker count.
    #[must_use]
    pub fn with_four_jokers(mut self, enabled: bool) -> Self {
        self.use_four_jokers = enabled;
        self
    }

    /// Set the back style, clamped to the available styles.
    #[must_use]
    pub fn with_back_style(mut self, index: usize) -> Self {
        self.back_style_index = clamp_back_style(index);
        self
    }

    /// Set the display scale. Non-finite values are ignored.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        if scale.is_finite() {
            self.scale = scale;
        }
        self
    }

    /// Set discard pile visibility.
    #[must_use]
    pub fn with_show_discard(mut self, show: bool) -> Self {
        self.show_discard = show;
        self
    }

    /// Set special pool visibility.
    #[must_use]
    pub fn with_show_pool(mut self, show: bool) -> Self {
        self.show_pool = show;
        self
    }
}

/// Clamp a back style index to `0..BACK_STYLE_COUNT`.
#[must_use]
pub fn clamp_back_style(index: usize) -> u8 {
    // Fits in u8 after the clamp.
    index.min(usize::from(BACK_STYLE_COUNT - 1)) as u8
}

/// Role the host reports for this client.
///
/// Only GMs are expected to shuffle or change configuration; the UI layer
/// enforces that, not the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientRole {
    Gm,
    #[default]
    Player,
}

/// Per-client synchronization settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Key owned in the shared metadata store.
    pub meta_key: String,

    /// Identifier stamped on published snapshots as their origin.
    pub client_id: String,

    /// Role the host reports for this client.
    pub role: ClientRole,

    /// Seed for the shuffle RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SyncConfig {
    /// Create a configuration for a client.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            meta_key: DEFAULT_META_KEY.to_string(),
            client_id: client_id.into(),
            role: ClientRole::default(),
            seed: None,
        }
    }

    /// Use a different metadata key.
    #[must_use]
    pub fn with_meta_key(mut self, key: impl Into<String>) -> Self {
        self.meta_key = key.into();
        self
    }

    /// Set the client role.
    #[must_use]
    pub fn with_role(mut self, role: ClientRole) -> Self {
        self.role = role;
        self
    }

    /// Fix the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check if this client is the GM.
    #[must_use]
    pub fn is_gm(&self) -> bool {
        self.role == ClientRole::Gm
    }
}

/// Read a scale, mapping `null` (how JSON carries NaN and infinities) and
/// other non-finite values to the default.
fn finite_scale<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let scale = Option::<f32>::deserialize(deserializer)?;
    Ok(scale
        .filter(|value| value.is_finite())
        .unwrap_or(DeckConfig::default().scale))
}
