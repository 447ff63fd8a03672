//! Render notifications for the UI layer.

use tokio::sync::mpsc;

/// What changed since the last render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderReason {
    /// Players were added or removed.
    Membership,
    /// Hand contents changed.
    Hands,
    /// Draw, discard or special pool changed.
    Pools,
    /// Configuration surface changed.
    Config,
}

/// Receiver of "render needed" signals.
pub trait RenderSink: Send + Sync {
    fn render_needed(&self, reason: RenderReason);
}

/// Sink that drops every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRender;

impl RenderSink for NoRender {
    fn render_needed(&self, _reason: RenderReason) {}
}

impl RenderSink for mpsc::UnboundedSender<RenderReason> {
    fn render_needed(&self, reason: RenderReason) {
        // A closed receiver means nobody renders anymore.
        let _ = self.send(reason);
    }
}
