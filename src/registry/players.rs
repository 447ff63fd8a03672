//! Registry of players keyed by external character identity.
//!
//! Membership follows the host's character feed: `reconcile` removes players
//! whose character disappeared and creates players for new characters.
//! Registration order is the order rounds are dealt in.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::Facing;
use crate::core::player::{CharacterId, Player, PlayerId, Traits};
use crate::zones::Pool;

/// Initiative metadata attached to a character record by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMeta {
    /// External character identity.
    pub character_id: CharacterId,

    /// Controlling player.
    pub player_id: PlayerId,

    /// Display name.
    pub name: String,

    /// Trait flags at the time the record was written.
    #[serde(default)]
    pub traits: Traits,
}

impl CharacterMeta {
    /// Create metadata with no traits set.
    #[must_use]
    pub fn new(character_id: CharacterId, player_id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            character_id,
            player_id,
            name: name.into(),
            traits: Traits::default(),
        }
    }

    /// Metadata describing an existing player.
    #[must_use]
    pub fn from_player(player: &Player) -> Self {
        Self {
            character_id: player.character_id.clone(),
            player_id: player.player_id.clone(),
            name: player.name.clone(),
            traits: player.traits,
        }
    }
}

/// Membership changes produced by `PlayerRegistry::reconcile`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Characters that gained a player, in feed order.
    pub added: Vec<CharacterId>,
    /// Characters whose player was removed, in registry order.
    pub removed: Vec<CharacterId>,
}

impl ReconcileOutcome {
    /// Check if membership changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Ordered set of players, unique by `CharacterId`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Iterate mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Registry index of a character's player.
    #[must_use]
    pub fn position(&self, character_id: &CharacterId) -> Option<usize> {
        self.players
            .iter()
            .position(|player| &player.character_id == character_id)
    }

    /// Check if a character has a player.
    #[must_use]
    pub fn contains(&self, character_id: &CharacterId) -> bool {
        self.position(character_id).is_some()
    }

    /// Look up a player by character.
    #[must_use]
    pub fn get(&self, character_id: &CharacterId) -> Option<&Player> {
        self.players
            .iter()
            .find(|player| &player.character_id == character_id)
    }

    /// Look up a player by character, mutably.
    pub fn get_mut(&mut self, character_id: &CharacterId) -> Option<&mut Player> {
        self.players
            .iter_mut()
            .find(|player| &player.character_id == character_id)
    }

    /// Player at a registry index.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Player at a registry index, mutably.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut Player> {
        self.players.get_mut(index)
    }

    /// Append a new player.
    ///
    /// Returns `None` without changing anything if the character already has
    /// a player.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        character_id: CharacterId,
        player_id: PlayerId,
    ) -> Option<&mut Player> {
        if self.contains(&character_id) {
            return None;
        }

        let player = Player::new(name, character_id, player_id);
        debug!(character = %player.character_id, name = %player.name, "player added");
        self.players.push(player);
        self.players.last_mut()
    }

    /// Discard the player's hand face up, then drop the player.
    ///
    /// Removing an unknown character is a no-op.
    pub fn remove_player(&mut self, character_id: &CharacterId, discard: &mut Pool) -> Option<Player> {
        let index = self.position(character_id)?;
        let mut player = self.players.remove(index);
        player.hand.move_to(discard, 0, true, Facing::Up);
        debug!(character = %player.character_id, "player removed");
        Some(player)
    }

    /// Rehydrate-or-create keyed by `character_id`.
    ///
    /// An existing player keeps its hand and gets name and traits from `meta`.
    pub fn upsert(&mut self, meta: &CharacterMeta) -> &mut Player {
        let index = match self.position(&meta.character_id) {
            Some(index) => index,
            None => {
                self.players.push(Player::new(
                    meta.name.clone(),
                    meta.character_id.clone(),
                    meta.player_id.clone(),
                ));
                self.players.len() - 1
            }
        };

        let player = &mut self.players[index];
        player.name.clone_from(&meta.name);
        player.player_id = meta.player_id.clone();
        player.traits = meta.traits;
        player
    }

    /// Overwrite a player's traits without touching the hand.
    ///
    /// Returns false if the character has no player.
    pub fn apply_trait_snapshot(&mut self, character_id: &CharacterId, traits: Traits) -> bool {
        match self.get_mut(character_id) {
            Some(player) => {
                player.traits = traits;
                true
            }
            None => false,
        }
    }

    /// Align membership with the external character set.
    ///
    /// Players whose character is absent are removed (hands discarded);
    /// characters without a player get one. Running it twice with the same
    /// records changes nothing the second time.
    pub fn reconcile<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a CharacterMeta>,
        discard: &mut Pool,
    ) -> ReconcileOutcome {
        let records: Vec<&CharacterMeta> = records.into_iter().collect();
        let external: FxHashSet<&CharacterId> =
            records.iter().map(|meta| &meta.character_id).collect();

        let mut outcome = ReconcileOutcome::default();

        let stale: Vec<CharacterId> = self
            .players
            .iter()
            .filter(|player| !external.contains(&player.character_id))
            .map(|player| player.character_id.clone())
            .collect();
        for character_id in stale {
            if self.remove_player(&character_id, discard).is_some() {
                outcome.removed.push(character_id);
            }
        }

        for meta in records {
            if self.contains(&meta.character_id) {
                continue;
            }
            if let Some(player) = self.add_player(
                meta.name.clone(),
                meta.character_id.clone(),
                meta.player_id.clone(),
            ) {
                player.traits = meta.traits;
                outcome.added.push(meta.character_id.clone());
            }
        }

        if outcome.is_changed() {
            info!(
                added = outcome.added.len(),
                removed = outcome.removed.len(),
                players = self.players.len(),
                "registry reconciled"
            );
        }

        outcome
    }
}
