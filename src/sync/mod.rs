//! Keeps each client's deck in step with the shared session store.
//!
//! - `store`: the `SessionStore` boundary and its event type
//! - `memory`: an in-memory store for tests and local play
//! - `render`: render notifications for the UI layer
//! - `controller`: the `SyncController` state machine

pub mod controller;
pub mod memory;
pub mod render;
pub mod store;

pub use controller::{SyncController, SyncState};
pub use memory::MemoryStore;
pub use render::{NoRender, RenderReason, RenderSink};
pub use store::{ItemRecord, SessionStore, StoreEvent};
