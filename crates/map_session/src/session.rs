use std::sync::Arc;

use map_integration::{MapController, MapEmbedder, MountSurface};
use shared::{
    domain::{LayerId, LayerState},
    error::SessionError,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    acquirer::{AcquireState, ControllerAcquirer, EmbedResult},
    handshake::{run_handshake, HandshakeOutcomes, HandshakeReport},
    selection::{SelectionRows, SelectionSummary, SelectionSurface},
    synchronizer::{self, MirrorQueue, MirrorTasks},
    table::{first_visible, TableAction, TableSession},
    view::SessionView,
    EmbedSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Embedding,
    Handshaking,
    Ready,
    Unavailable,
}

/// Set once, never cleared.
#[derive(Debug, Default)]
pub(crate) struct ReadinessFlag {
    ready: bool,
}

impl ReadinessFlag {
    /// Returns `true` only for the call that flipped the flag.
    pub(crate) fn mark(&mut self) -> bool {
        !std::mem::replace(&mut self.ready, true)
    }

    pub(crate) fn get(&self) -> bool {
        self.ready
    }
}

enum LifecycleEvent {
    Embedded(EmbedResult),
    HandshakeFinished(HandshakeReport),
}

/// State for one mounted map.
///
/// Owned by a single event loop. The embed request and the handshake run on spawned
/// tasks and report back through a channel drained by [`MapSession::pump`] or
/// [`MapSession::settle`].
pub struct MapSession {
    acquirer: ControllerAcquirer,
    phase: SessionPhase,
    layers: Vec<LayerState>,
    readiness: ReadinessFlag,
    handshake: Option<HandshakeOutcomes>,
    mirror: Option<MirrorQueue>,
    table: TableSession,
    selection: SelectionSurface,
    events_tx: mpsc::UnboundedSender<LifecycleEvent>,
    events_rx: mpsc::UnboundedReceiver<LifecycleEvent>,
}

impl MapSession {
    pub fn new(embedder: Arc<dyn MapEmbedder>, settings: EmbedSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            acquirer: ControllerAcquirer::new(embedder, settings),
            phase: SessionPhase::Idle,
            layers: Vec::new(),
            readiness: ReadinessFlag::default(),
            handshake: None,
            mirror: None,
            table: TableSession::default(),
            selection: SelectionSurface::default(),
            events_tx,
            events_rx,
        }
    }

    /// Safe to call on every render; only the first call issues the embed request.
    pub fn mount(&mut self, surface: &MountSurface) -> bool {
        let events_tx = self.events_tx.clone();
        let started = self.acquirer.begin(surface, move |result| {
            if events_tx.send(LifecycleEvent::Embedded(result)).is_err() {
                debug!("session ended before the map embed resolved; discarding controller");
            }
        });
        if started {
            self.phase = SessionPhase::Embedding;
        }
        started
    }

    /// Applies every lifecycle event already delivered, without waiting.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits until the session leaves the embedding and handshaking phases.
    ///
    /// There is no timeout: if the embedder never answers, this never returns.
    pub async fn settle(&mut self) {
        while matches!(
            self.phase,
            SessionPhase::Embedding | SessionPhase::Handshaking
        ) {
            match self.events_rx.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    fn apply(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Embedded(result) => {
                if let Some(handle) = self.acquirer.resolve(result) {
                    self.mirror = Some(MirrorQueue::new(Arc::clone(&handle)));
                    self.start_handshake(handle);
                } else if matches!(self.acquirer.state(), AcquireState::Unavailable(_)) {
                    self.phase = SessionPhase::Unavailable;
                }
            }
            LifecycleEvent::HandshakeFinished(report) => {
                if self.phase != SessionPhase::Handshaking {
                    debug!("ignoring handshake result outside of the handshake phase");
                    return;
                }
                self.layers = report.layers;
                self.handshake = Some(report.outcomes);
                if self.readiness.mark() {
                    info!(
                        map_id = %self.acquirer.map_id(),
                        layers = self.layers.len(),
                        "map session ready"
                    );
                }
                self.phase = SessionPhase::Ready;
            }
        }
    }

    fn start_handshake(&mut self, handle: Arc<dyn MapController>) {
        self.phase = SessionPhase::Handshaking;
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let report = run_handshake(handle.as_ref()).await;
            if events_tx
                .send(LifecycleEvent::HandshakeFinished(report))
                .is_err()
            {
                debug!("session ended during the layer handshake");
            }
        });
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.get()
    }

    pub fn handshake_outcomes(&self) -> Option<&HandshakeOutcomes> {
        self.handshake.as_ref()
    }

    pub fn controller(&self) -> Option<&Arc<dyn MapController>> {
        self.acquirer.handle()
    }

    /// Like [`MapSession::controller`], but says why there is no controller.
    pub fn require_controller(&self) -> Result<&Arc<dyn MapController>, SessionError> {
        match self.acquirer.state() {
            AcquireState::Acquired(handle) => Ok(handle),
            AcquireState::Unavailable(reason) => Err(SessionError::EmbedRejected(reason.clone())),
            AcquireState::NotStarted | AcquireState::Pending => {
                Err(SessionError::ControllerUnavailable)
            }
        }
    }

    pub fn layers(&self) -> &[LayerState] {
        &self.layers
    }

    pub fn toggle_layer(&mut self, layer_id: &LayerId, show: bool) -> Option<MirrorTasks> {
        synchronizer::toggle_layer(self.mirror.as_ref(), &mut self.layers, layer_id, show)
    }

    pub fn is_table_open(&self) -> bool {
        self.table.is_open()
    }

    pub fn toggle_table(&mut self) -> Option<TableAction> {
        let controller = self.acquirer.handle()?;
        self.table.toggle(controller.as_ref(), &self.layers)
    }

    pub fn selection(&self) -> &SelectionSurface {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSurface {
        &mut self.selection
    }

    pub fn selection_rows(&self) -> SelectionRows<'_> {
        self.selection.rows(&self.layers)
    }

    pub fn view(&self) -> SessionView {
        let ready = self.is_ready();
        SessionView {
            show_top_bar: ready,
            show_table_button: ready && first_visible(&self.layers).is_some(),
            table_button_label: self.table.button_label(),
            map_surface_ready: ready,
            selection_open: self.selection.is_open(),
            summary: SelectionSummary::of(&self.layers),
        }
    }
}
