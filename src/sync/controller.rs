//! Synchronization controller.
//!
//! Owns one client's `Deck` and keeps it aligned with the shared store:
//! inbound snapshots replace pools and configuration, the item feed governs
//! registry membership, and every local mutation is published as a full
//! snapshot.
//!
//! ## State Machine
//!
//! `Uninitialized -> Syncing -> Ready`. The controller becomes `Ready` once
//! the item feed has been read and a snapshot has been applied (or a fresh
//! default deck established). A snapshot that arrives before the feed is
//! read is held and applied right after.
//!
//! ## Merge
//!
//! An inbound snapshot replaces the draw pile, discard pile, special pool
//! and configuration wholesale. Hands and traits are merged per character:
//! local players take their hand and traits from the snapshot, players the
//! snapshot does not mention end up with empty hands, and hands of
//! characters not registered locally go to the discard pile face up.
//!
//! ## Echoes
//!
//! Every published snapshot carries this client's id and a revision. The
//! store notifies the publisher too, so inbound snapshots with our own origin
//! and a revision we already passed are skipped, unless a snapshot from
//! another client was merged since our last publish. In that case our own
//! write may be the last one the store accepted and is applied like any
//! other. The local revision is kept at least as high as any revision seen.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use super::render::{NoRender, RenderReason, RenderSink};
use super::store::{ItemRecord, SessionStore, StoreEvent};
use crate::cards::{Facing, SequenceId};
use crate::codec::{decode, encode, DeckMeta};
use crate::core::config::{ClientRole, SyncConfig};
use crate::core::player::{CharacterId, Player, PlayerId, Traits};
use crate::core::rng::DeckRng;
use crate::core::state::Deck;
use crate::core::DeckConfig;
use crate::error::{DecodeError, PublishError, StoreError};
use crate::registry::{CharacterMeta, ReconcileOutcome};
use crate::rules::{self, RoundReport};
use crate::zones::{Pool, PoolId};

/// Controller lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Uninitialized,
    Syncing,
    Ready,
}

/// One client's view of the shared deck.
pub struct SyncController {
    store: Arc<dyn SessionStore>,
    render: Arc<dyn RenderSink>,
    config: SyncConfig,
    deck: Deck,
    state: SyncState,
    items_read: bool,
    snapshot_ready: bool,
    pending: Option<Vec<u8>>,
    revision: u64,
    foreign_since_publish: bool,
}

impl SyncController {
    /// Create a controller holding a default deck.
    pub fn new(store: Arc<dyn SessionStore>, render: Arc<dyn RenderSink>, config: SyncConfig) -> Self {
        let rng = config.seed.map_or_else(DeckRng::from_entropy, DeckRng::new);
        Self {
            store,
            render,
            deck: Deck::with_rng(DeckConfig::default(), rng),
            config,
            state: SyncState::Uninitialized,
            items_read: false,
            snapshot_ready: false,
            pending: None,
            revision: 0,
            foreign_since_publish: false,
        }
    }

    /// Create a controller that renders nothing.
    pub fn headless(store: Arc<dyn SessionStore>, config: SyncConfig) -> Self {
        Self::new(store, Arc::new(NoRender), config)
    }

    // === Accessors ===

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Check if the controller finished its initial sync.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == SyncState::Ready
    }

    /// Local deck.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Client settings.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Role reported by the host. Not enforced here.
    #[must_use]
    pub fn role(&self) -> ClientRole {
        self.config.role
    }

    /// Check if this client is the GM.
    #[must_use]
    pub fn is_gm(&self) -> bool {
        self.config.is_gm()
    }

    /// Highest revision published or seen.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if a snapshot is waiting for the item feed.
    #[must_use]
    pub fn has_pending_snapshot(&self) -> bool {
        self.pending.is_some()
    }

    /// Characters in acting order.
    #[must_use]
    pub fn initiative_order(&self) -> Vec<CharacterId> {
        rules::initiative_order(&self.deck)
    }

    /// Check whether a joker is showing.
    #[must_use]
    pub fn joker_drawn(&self) -> bool {
        rules::joker_drawn(&self.deck)
    }

    // === Inbound ===

    /// Read the item feed and the shared snapshot.
    ///
    /// When the store holds no snapshot the local default deck is published
    /// once. Fetch failures leave the controller in `Syncing`; calling again
    /// retries.
    pub async fn initialize(&mut self) -> Result<(), StoreError> {
        self.state = SyncState::Syncing;
        info!(client = %self.config.client_id, "sync starting");
        self.pull().await
    }

    /// Re-read the item feed and the shared snapshot.
    pub async fn resync(&mut self) -> Result<(), StoreError> {
        if self.state == SyncState::Uninitialized {
            self.state = SyncState::Syncing;
        }
        self.pull().await
    }

    async fn pull(&mut self) -> Result<(), StoreError> {
        let items = self.store.fetch_items().await.map_err(|err| {
            warn!(%err, "failed to read item feed");
            err
        })?;
        self.on_items(items);

        let fetched = self
            .store
            .fetch_meta(&self.config.meta_key)
            .await
            .map_err(|err| {
                warn!(%err, key = %self.config.meta_key, "failed to read shared deck");
                err
            })?;

        match fetched {
            Some(bytes) => self.on_snapshot(&bytes),
            None if !self.snapshot_ready => {
                info!("no shared deck yet, publishing a fresh one");
                self.snapshot_ready = true;
                self.update_state();
                if let Err(err) = self.publish().await {
                    warn!(%err, "initial deck not published");
                }
            }
            None => debug!("shared deck absent, keeping local state"),
        }
        Ok(())
    }

    /// Apply one store notification.
    pub fn handle_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::MetaChanged(Some(bytes)) => self.on_snapshot(&bytes),
            StoreEvent::MetaChanged(None) => debug!("shared deck deleted, keeping local state"),
            StoreEvent::ItemsChanged(items) => {
                self.on_items(items);
            }
        }
    }

    /// Apply notifications until the channel closes, resyncing after a lag.
    pub async fn run(&mut self, mut events: broadcast::Receiver<StoreEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "store events dropped, resyncing");
                    if let Err(err) = self.resync().await {
                        warn!(%err, "resync failed");
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Reconcile membership with the item feed.
    pub fn on_items(&mut self, items: Vec<ItemRecord>) -> ReconcileOutcome {
        let records: Vec<CharacterMeta> = items.into_iter().filter_map(|item| item.meta).collect();
        let outcome = self
            .deck
            .players
            .reconcile(&records, &mut self.deck.discard);
        self.items_read = true;

        if outcome.is_changed() {
            self.render.render_needed(RenderReason::Membership);
        }
        if !outcome.removed.is_empty() {
            self.render.render_needed(RenderReason::Pools);
        }
        if let Some(bytes) = self.pending.take() {
            debug!("applying held snapshot");
            self.on_snapshot(&bytes);
        }
        self.update_state();
        outcome
    }

    /// Apply an inbound snapshot.
    ///
    /// An unreadable snapshot resets the deck to the default; players stay.
    pub fn on_snapshot(&mut self, bytes: &[u8]) {
        if !self.items_read {
            debug!("snapshot arrived before the item feed, holding it");
            self.pending = Some(bytes.to_vec());
            return;
        }

        match decode(bytes) {
            Ok(meta) if self.is_echo(&meta) => {
                debug!(revision = meta.revision, "skipping own snapshot");
                return;
            }
            Ok(meta) => {
                let revision = meta.revision;
                let origin = meta.origin.clone();
                match self.merge(meta) {
                    Ok(()) => {
                        self.revision = self.revision.max(revision);
                        if origin != self.config.client_id {
                            self.foreign_since_publish = true;
                        }
                        debug!(revision, %origin, "snapshot applied");
                    }
                    Err(err) => self.recover(&err),
                }
            }
            Err(err) => self.recover(&err),
        }

        self.snapshot_ready = true;
        self.render.render_needed(RenderReason::Pools);
        self.render.render_needed(RenderReason::Hands);
        self.update_state();
    }

    fn is_echo(&self, meta: &DeckMeta) -> bool {
        !self.foreign_since_publish
            && meta.origin == self.config.client_id
            && meta.revision <= self.revision
    }

    fn recover(&mut self, err: &DecodeError) {
        warn!(%err, "unusable shared deck, resetting to default");
        self.deck.reset();
    }

    fn merge(&mut self, meta: DeckMeta) -> Result<(), DecodeError> {
        let layout = meta.into_layout()?;

        self.deck.config = layout.config;
        self.deck.draw = layout.draw;
        self.deck.discard = layout.discard;
        self.deck.special = layout.special;
        for player in self.deck.players.iter_mut() {
            player.hand = Pool::new();
        }

        for (character, mut hand) in layout.players {
            let id = &character.character_id;
            if self.deck.players.apply_trait_snapshot(id, character.traits) {
                if let Some(player) = self.deck.players.get_mut(id) {
                    player.hand = hand;
                }
            } else {
                debug!(character = %id, cards = hand.len(), "hand of unknown character discarded");
                hand.move_to(&mut self.deck.discard, 0, true, Facing::Up);
            }
        }

        debug_assert!(self.deck.is_conserved());
        Ok(())
    }

    fn update_state(&mut self) {
        if self.state != SyncState::Ready && self.items_read && self.snapshot_ready {
            self.state = SyncState::Ready;
            info!(
                players = self.deck.players().len(),
                revision = self.revision,
                "sync ready"
            );
        }
    }

    // === Outbound ===

    /// Encode the local deck and replace the shared snapshot with it.
    pub async fn publish(&mut self) -> Result<(), PublishError> {
        self.revision += 1;
        let revision = self.revision;
        let meta = DeckMeta::capture(&self.deck, revision, self.config.client_id.clone());
        let bytes = encode(&meta)?;
        self.foreign_since_publish = false;

        match self.store.publish_meta(&self.config.meta_key, bytes).await {
            Ok(()) => {
                debug!(revision, "snapshot published");
                Ok(())
            }
            Err(err) => {
                warn!(%err, revision, "publish failed, local state kept");
                Err(err.into())
            }
        }
    }

    async fn commit(&mut self, reason: RenderReason) -> Result<(), PublishError> {
        self.render.render_needed(reason);
        self.publish().await
    }

    // === Local Mutations ===

    /// Deal one initiative round and publish.
    pub async fn deal_round(&mut self) -> Result<RoundReport, PublishError> {
        let report = rules::deal_round(&mut self.deck);
        self.render.render_needed(RenderReason::Pools);
        self.commit(RenderReason::Hands).await?;
        Ok(report)
    }

    /// Deal an interlude and publish.
    pub async fn deal_interlude(&mut self) -> Result<usize, PublishError> {
        let dealt = rules::deal_interlude(&mut self.deck);
        self.render.render_needed(RenderReason::Pools);
        self.commit(RenderReason::Hands).await?;
        Ok(dealt)
    }

    /// Move cards between pools and publish.
    pub async fn move_cards(
        &mut self,
        to: PoolId,
        from: PoolId,
        count: usize,
        from_top: bool,
        facing: Facing,
    ) -> Result<usize, PublishError> {
        let moved = self.deck.move_cards(to, from, count, from_top, facing);
        let touches_hand = matches!(to, PoolId::Hand(_)) || matches!(from, PoolId::Hand(_));
        let reason = if touches_hand {
            RenderReason::Hands
        } else {
            RenderReason::Pools
        };
        self.commit(reason).await?;
        Ok(moved)
    }

    /// Shuffle the draw pile and publish.
    pub async fn shuffle(&mut self) -> Result<(), PublishError> {
        self.deck.shuffle();
        self.commit(RenderReason::Pools).await
    }

    /// Cut the draw pile and publish.
    pub async fn cut(&mut self, index: usize) -> Result<(), PublishError> {
        self.deck.cut(index);
        self.commit(RenderReason::Pools).await
    }

    /// Gather every card into the draw pile, shuffle and publish.
    pub async fn reshuffle(&mut self) -> Result<(), PublishError> {
        self.deck.reshuffle();
        self.render.render_needed(RenderReason::Hands);
        self.commit(RenderReason::Pools).await
    }

    /// Switch the joker count. Publishes only when the setting changed.
    pub async fn set_four_jokers(&mut self, enabled: bool) -> Result<bool, PublishError> {
        if !rules::set_four_jokers(&mut self.deck, enabled) {
            return Ok(false);
        }
        self.render.render_needed(RenderReason::Config);
        self.render.render_needed(RenderReason::Hands);
        self.commit(RenderReason::Pools).await?;
        Ok(true)
    }

    /// Set the card back style and publish.
    pub async fn set_back_style(&mut self, index: usize) -> Result<(), PublishError> {
        self.deck.set_back_style(index);
        self.commit(RenderReason::Config).await
    }

    /// Set the display scale and publish. NaN and infinities are ignored and
    /// return false.
    pub async fn set_scale(&mut self, scale: f32) -> Result<bool, PublishError> {
        if !self.deck.set_scale(scale) {
            return Ok(false);
        }
        self.commit(RenderReason::Config).await?;
        Ok(true)
    }

    /// Show or hide the discard pile and publish.
    pub async fn set_show_discard(&mut self, show: bool) -> Result<(), PublishError> {
        self.deck.set_show_discard(show);
        self.commit(RenderReason::Config).await
    }

    /// Show or hide the special pool and publish.
    pub async fn set_show_pool(&mut self, show: bool) -> Result<(), PublishError> {
        self.deck.set_show_pool(show);
        self.commit(RenderReason::Config).await
    }

    /// Replace a player's traits and publish. Unknown characters return false.
    pub async fn set_traits(
        &mut self,
        character_id: &CharacterId,
        traits: Traits,
    ) -> Result<bool, PublishError> {
        if !self.deck.players.apply_trait_snapshot(character_id, traits) {
            return Ok(false);
        }
        self.commit(RenderReason::Hands).await?;
        Ok(true)
    }

    /// Keep one card from a hand, discard the rest and publish.
    pub async fn choose_card(
        &mut self,
        character_id: &CharacterId,
        card: SequenceId,
    ) -> Result<bool, PublishError> {
        if !rules::choose_card(&mut self.deck, character_id, card) {
            return Ok(false);
        }
        self.render.render_needed(RenderReason::Pools);
        self.commit(RenderReason::Hands).await?;
        Ok(true)
    }

    /// Drop a player, discarding their hand, and publish.
    ///
    /// The item feed still lists the character until the UI layer clears
    /// its metadata; the next reconcile would add it back otherwise.
    pub async fn remove_player(
        &mut self,
        character_id: &CharacterId,
    ) -> Result<Option<Player>, PublishError> {
        let Some(player) = self
            .deck
            .players
            .remove_player(character_id, &mut self.deck.discard)
        else {
            return Ok(None);
        };
        self.render.render_needed(RenderReason::Pools);
        self.commit(RenderReason::Membership).await?;
        Ok(Some(player))
    }

    /// Register a character and publish.
    ///
    /// Returns the metadata the UI layer should write onto the character's
    /// item, or `None` if the character already takes part.
    pub async fn add_to_initiative(
        &mut self,
        name: impl Into<String>,
        character_id: CharacterId,
        player_id: PlayerId,
    ) -> Result<Option<CharacterMeta>, PublishError> {
        let Some(player) = self.deck.players.add_player(name, character_id, player_id) else {
            return Ok(None);
        };
        let meta = CharacterMeta::from_player(player);
        info!(character = %meta.character_id, "added to initiative");
        self.commit(RenderReason::Membership).await?;
        Ok(Some(meta))
    }
}
