//! One-shot acquisition of the map controller handle.

use std::sync::Arc;

use map_integration::{MapController, MapEmbedder, MountSurface};
use shared::domain::MapId;
use tracing::{debug, info, warn};

use crate::EmbedSettings;

pub type EmbedResult = Result<Arc<dyn MapController>, String>;

#[derive(Clone)]
pub enum AcquireState {
    NotStarted,
    Pending,
    Acquired(Arc<dyn MapController>),
    /// The embed request rejected. Terminal: no further request is ever issued.
    Unavailable(String),
}

impl AcquireState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Issues at most one embed request per instance, however often `begin` is called.
///
/// The latch belongs to the acquirer rather than to the map id, so a repeated mount
/// with a different surface or id is ignored as well.
pub struct ControllerAcquirer {
    embedder: Arc<dyn MapEmbedder>,
    settings: EmbedSettings,
    latched: bool,
    state: AcquireState,
}

impl ControllerAcquirer {
    pub fn new(embedder: Arc<dyn MapEmbedder>, settings: EmbedSettings) -> Self {
        Self {
            embedder,
            settings,
            latched: false,
            state: AcquireState::NotStarted,
        }
    }

    pub fn map_id(&self) -> &MapId {
        &self.settings.map_id
    }

    /// Spawns the embed request unless one was already issued. `on_resolved` runs on the
    /// spawned task once the embedder answers; it never runs if the embedder hangs.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin<F>(&mut self, surface: &MountSurface, on_resolved: F) -> bool
    where
        F: FnOnce(EmbedResult) + Send + 'static,
    {
        if self.latched {
            debug!(
                map_id = %self.settings.map_id,
                surface = %surface.element_id,
                "map embed already requested; ignoring mount"
            );
            return false;
        }
        self.latched = true;
        self.state = AcquireState::Pending;

        let embedder = Arc::clone(&self.embedder);
        let surface = surface.clone();
        let map_id = self.settings.map_id.clone();
        let options = self.settings.options;
        info!(map_id = %map_id, surface = %surface.element_id, "requesting map embed");
        tokio::spawn(async move {
            let result = embedder
                .embed(surface, map_id, options)
                .await
                .map_err(|err| err.to_string());
            on_resolved(result);
        });
        true
    }

    /// Records the embed result. Returns the handle only on the transition from pending to
    /// acquired; an existing handle is never replaced.
    pub fn resolve(&mut self, result: EmbedResult) -> Option<Arc<dyn MapController>> {
        if !self.state.is_pending() {
            warn!(
                map_id = %self.settings.map_id,
                "ignoring map embed result outside of a pending request"
            );
            return None;
        }

        match result {
            Ok(handle) => {
                info!(map_id = %self.settings.map_id, "map controller acquired");
                self.state = AcquireState::Acquired(Arc::clone(&handle));
                Some(handle)
            }
            Err(reason) => {
                warn!(
                    map_id = %self.settings.map_id,
                    %reason,
                    "map embed rejected; controller stays unavailable"
                );
                self.state = AcquireState::Unavailable(reason);
                None
            }
        }
    }

    pub fn handle(&self) -> Option<&Arc<dyn MapController>> {
        match &self.state {
            AcquireState::Acquired(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn state(&self) -> &AcquireState {
        &self.state
    }
}
