//! Session state for an embedded map whose layer visibility is driven from the UI.
//!
//! A [`MapSession`] acquires the map controller once, hides every layer the controller
//! reports before declaring itself ready, and afterwards mirrors each visibility toggle
//! to the controller without waiting on it.

use shared::{domain::MapId, protocol::EmbedOptions};

pub mod acquirer;
pub mod handshake;
pub mod selection;
pub mod session;
pub mod synchronizer;
pub mod table;
pub mod view;

pub use acquirer::{AcquireState, ControllerAcquirer};
pub use handshake::{run_handshake, HandshakeOutcomes, HandshakeReport};
pub use selection::{filter_layers, SelectionRows, SelectionSummary, SelectionSurface, SurfaceKey};
pub use session::{MapSession, SessionPhase};
pub use synchronizer::{toggle_layer, MirrorQueue, MirrorTasks};
pub use table::{first_visible, TableAction, TableSession};
pub use view::SessionView;

/// Fixed for the lifetime of a session; changing either requires a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSettings {
    pub map_id: MapId,
    pub options: EmbedOptions,
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
