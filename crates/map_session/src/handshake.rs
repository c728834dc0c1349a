//! Initial enumerate-then-hide pass run once a controller handle exists.

use map_integration::MapController;
use shared::{
    domain::{LayerId, LayerState},
    error::MirrorOutcome,
    protocol::VisibilityRequest,
};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeOutcomes {
    pub enumeration: MirrorOutcome,
    /// `None` when there was nothing to hide.
    pub visibility: Option<MirrorOutcome>,
    pub legend: Option<MirrorOutcome>,
}

impl HandshakeOutcomes {
    pub fn fully_suppressed(&self) -> bool {
        let hidden =
            |outcome: &Option<MirrorOutcome>| outcome.as_ref().map_or(true, MirrorOutcome::is_ok);
        self.enumeration.is_ok() && hidden(&self.visibility) && hidden(&self.legend)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandshakeReport {
    pub layers: Vec<LayerState>,
    pub outcomes: HandshakeOutcomes,
}

/// Enumerates the controller's layers and hides all of them, features and legend entries
/// alike, then returns the baseline list with every layer marked hidden.
///
/// Never fails. A failed enumeration yields an empty list; a failed hide still yields the
/// enumerated list, even though the controller may be showing some of those layers.
pub async fn run_handshake(controller: &dyn MapController) -> HandshakeReport {
    let records = match controller.get_layers().await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "layer enumeration failed; continuing without layers");
            return HandshakeReport {
                layers: Vec::new(),
                outcomes: HandshakeOutcomes {
                    enumeration: MirrorOutcome::failed(err.to_string()),
                    visibility: None,
                    legend: None,
                },
            };
        }
    };

    let (visibility, legend) = if records.is_empty() {
        (None, None)
    } else {
        let ids: Vec<LayerId> = records.iter().map(|record| record.id.clone()).collect();
        let (visibility, legend) = futures::join!(
            controller.set_layer_visibility(VisibilityRequest::Hide(ids.clone())),
            controller.set_layer_legend_visibility(VisibilityRequest::Hide(ids)),
        );
        (
            Some(MirrorOutcome::from(visibility)),
            Some(MirrorOutcome::from(legend)),
        )
    };

    for (call, outcome) in [("visibility", &visibility), ("legend", &legend)] {
        if let Some(MirrorOutcome::Failed(reason)) = outcome {
            warn!(call, %reason, "bulk hide failed; initial layer state may be unsuppressed");
        }
    }

    let layers: Vec<LayerState> = records.into_iter().map(LayerState::hidden).collect();
    info!(layers = layers.len(), "layer baseline established");

    HandshakeReport {
        layers,
        outcomes: HandshakeOutcomes {
            enumeration: MirrorOutcome::Ok,
            visibility,
            legend,
        },
    }
}
