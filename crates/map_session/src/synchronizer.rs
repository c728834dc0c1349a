//! Optimistic layer toggles mirrored to the map controller.

use std::sync::Arc;

use map_integration::MapController;
use shared::{
    domain::{LayerId, LayerState},
    error::MirrorOutcome,
    protocol::VisibilityRequest,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MirrorChannel {
    Features,
    Legend,
}

impl MirrorChannel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Features => "visibility",
            Self::Legend => "legend",
        }
    }
}

struct MirrorJob {
    channel: MirrorChannel,
    request: VisibilityRequest,
    reply: oneshot::Sender<MirrorOutcome>,
}

/// Issues mirror calls to one controller strictly in the order they were queued.
///
/// A single worker task drains the queue, so the controller sees toggles on the same
/// layer in call order on any runtime flavor. The worker stops once the queue is dropped.
pub struct MirrorQueue {
    jobs: mpsc::UnboundedSender<MirrorJob>,
}

impl MirrorQueue {
    /// Must be called from within a tokio runtime.
    pub fn new(controller: Arc<dyn MapController>) -> Self {
        let (jobs, mut rx) = mpsc::unbounded_channel::<MirrorJob>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let outcome = issue(controller.as_ref(), job.channel, job.request).await;
                // Receiver is gone when the caller detached.
                let _ = job.reply.send(outcome);
            }
            debug!("mirror queue closed");
        });
        Self { jobs }
    }

    fn enqueue(
        &self,
        channel: MirrorChannel,
        request: VisibilityRequest,
    ) -> oneshot::Receiver<MirrorOutcome> {
        let (reply, outcome) = oneshot::channel();
        if self
            .jobs
            .send(MirrorJob {
                channel,
                request,
                reply,
            })
            .is_err()
        {
            debug!(call = channel.as_str(), "mirror queue closed; dropping call");
        }
        outcome
    }
}

async fn issue(
    controller: &dyn MapController,
    channel: MirrorChannel,
    request: VisibilityRequest,
) -> MirrorOutcome {
    let result = match channel {
        MirrorChannel::Features => controller.set_layer_visibility(request).await,
        MirrorChannel::Legend => controller.set_layer_legend_visibility(request).await,
    };
    let outcome = MirrorOutcome::from(result);
    if let MirrorOutcome::Failed(reason) = &outcome {
        warn!(
            call = channel.as_str(),
            %reason,
            "mirror call failed; local visibility kept"
        );
    }
    outcome
}

/// The two queued calls issued by one toggle.
///
/// Dropping this value does not cancel them; nothing about the local layer list
/// depends on how they finish.
pub struct MirrorTasks {
    visibility: oneshot::Receiver<MirrorOutcome>,
    legend: oneshot::Receiver<MirrorOutcome>,
}

impl MirrorTasks {
    pub async fn outcomes(self) -> (MirrorOutcome, MirrorOutcome) {
        let (visibility, legend) = futures::join!(self.visibility, self.legend);
        (received(visibility), received(legend))
    }
}

fn received(result: Result<MirrorOutcome, oneshot::error::RecvError>) -> MirrorOutcome {
    result.unwrap_or_else(|_| MirrorOutcome::failed("mirror queue closed before the call ran"))
}

/// Sets `visible` on the matching layer, then queues the change for the controller.
///
/// Without a mirror queue (no controller yet), or for an id not in `layers`, nothing is
/// written and nothing is sent. The local write happens before this returns.
pub fn toggle_layer(
    mirror: Option<&MirrorQueue>,
    layers: &mut [LayerState],
    layer_id: &LayerId,
    show: bool,
) -> Option<MirrorTasks> {
    let Some(mirror) = mirror else {
        debug!(layer_id = %layer_id, "no map controller; ignoring layer toggle");
        return None;
    };
    let Some(layer) = layers.iter_mut().find(|layer| layer.id() == layer_id) else {
        debug!(layer_id = %layer_id, "unknown layer; ignoring toggle");
        return None;
    };
    layer.visible = show;
    debug!(layer_id = %layer_id, show, "layer toggled");

    Some(MirrorTasks {
        visibility: mirror.enqueue(
            MirrorChannel::Features,
            VisibilityRequest::for_layer(layer_id.clone(), show),
        ),
        legend: mirror.enqueue(
            MirrorChannel::Legend,
            VisibilityRequest::for_layer(layer_id.clone(), show),
        ),
    })
}
