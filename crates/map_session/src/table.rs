use map_integration::MapController;
use shared::{
    domain::{LayerId, LayerState},
    error::MirrorOutcome,
};
use tracing::{info, warn};

/// First visible layer in list order, which is the controller's enumeration order.
pub fn first_visible(layers: &[LayerState]) -> Option<&LayerState> {
    layers.iter().find(|layer| layer.visible)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    Opened {
        layer_id: LayerId,
        outcome: MirrorOutcome,
    },
    Closed {
        outcome: MirrorOutcome,
    },
}

/// Open/closed state of the controller's data table.
///
/// Hiding the tabulated layer does not close the table; once shown, the table's
/// lifecycle belongs to the controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableSession {
    open: bool,
}

impl TableSession {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn button_label(&self) -> &'static str {
        if self.open {
            "Hide Table"
        } else {
            "Show Table"
        }
    }

    /// Returns `None` without calling the controller when no layer is visible.
    pub fn open(
        &mut self,
        controller: &dyn MapController,
        layers: &[LayerState],
    ) -> Option<TableAction> {
        let layer_id = first_visible(layers)?.id().clone();
        let outcome = MirrorOutcome::from(controller.show_layer_data_table(&layer_id));
        log_outcome("show", &outcome);
        self.open = true;
        info!(layer_id = %layer_id, "data table opened");
        Some(TableAction::Opened { layer_id, outcome })
    }

    pub fn close(&mut self, controller: &dyn MapController) -> TableAction {
        let outcome = MirrorOutcome::from(controller.hide_layer_data_table());
        log_outcome("hide", &outcome);
        self.open = false;
        info!("data table closed");
        TableAction::Closed { outcome }
    }

    /// The toggle is only offered while some layer is visible.
    pub fn toggle(
        &mut self,
        controller: &dyn MapController,
        layers: &[LayerState],
    ) -> Option<TableAction> {
        first_visible(layers)?;
        if self.open {
            Some(self.close(controller))
        } else {
            self.open(controller, layers)
        }
    }
}

fn log_outcome(call: &'static str, outcome: &MirrorOutcome) {
    if let MirrorOutcome::Failed(reason) = outcome {
        warn!(call, %reason, "data table command failed");
    }
}
