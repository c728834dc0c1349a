use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use map_integration::{MapController, MapEmbedder, MountSurface};
use shared::{
    domain::{LayerId, LayerRecord, LayerState, MapId},
    protocol::{ControllerCall, EmbedOptions, UiControls, VisibilityRequest},
};

use crate::EmbedSettings;

pub(crate) struct ScriptedController {
    layers: Vec<LayerRecord>,
    fail_enumeration: bool,
    fail_visibility: bool,
    fail_legend: bool,
    calls: Mutex<Vec<ControllerCall>>,
}

impl ScriptedController {
    pub(crate) fn with_layers(ids: &[&str]) -> Self {
        Self {
            layers: ids
                .iter()
                .map(|id| LayerRecord::new(*id, format!("Layer {id}")))
                .collect(),
            fail_enumeration: false,
            fail_visibility: false,
            fail_legend: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub(crate) fn failing_visibility(mut self) -> Self {
        self.fail_visibility = true;
        self
    }

    pub(crate) fn failing_legend(mut self) -> Self {
        self.fail_legend = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<ControllerCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: ControllerCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl MapController for ScriptedController {
    async fn get_layers(&self) -> Result<Vec<LayerRecord>> {
        self.record(ControllerCall::GetLayers);
        if self.fail_enumeration {
            return Err(anyhow!("layer enumeration rejected"));
        }
        Ok(self.layers.clone())
    }

    async fn set_layer_visibility(&self, request: VisibilityRequest) -> Result<()> {
        self.record(ControllerCall::SetLayerVisibility(request));
        if self.fail_visibility {
            return Err(anyhow!("visibility rejected"));
        }
        Ok(())
    }

    async fn set_layer_legend_visibility(&self, request: VisibilityRequest) -> Result<()> {
        self.record(ControllerCall::SetLayerLegendVisibility(request));
        if self.fail_legend {
            return Err(anyhow!("legend rejected"));
        }
        Ok(())
    }

    fn show_layer_data_table(&self, layer_id: &LayerId) -> Result<()> {
        self.record(ControllerCall::ShowLayerDataTable {
            layer_id: layer_id.clone(),
        });
        Ok(())
    }

    fn hide_layer_data_table(&self) -> Result<()> {
        self.record(ControllerCall::HideLayerDataTable);
        Ok(())
    }
}

pub(crate) enum EmbedBehavior {
    Resolve(Arc<ScriptedController>),
    Reject,
    Hang,
}

pub(crate) struct ScriptedEmbedder {
    behavior: EmbedBehavior,
    embeds: AtomicUsize,
}

impl ScriptedEmbedder {
    pub(crate) fn new(behavior: EmbedBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            embeds: AtomicUsize::new(0),
        })
    }

    pub(crate) fn embed_count(&self) -> usize {
        self.embeds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MapEmbedder for ScriptedEmbedder {
    async fn embed(
        &self,
        _surface: MountSurface,
        _map_id: MapId,
        _options: EmbedOptions,
    ) -> Result<Arc<dyn MapController>> {
        self.embeds.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            EmbedBehavior::Resolve(controller) => {
                let controller: Arc<dyn MapController> = controller.clone();
                Ok(controller)
            }
            EmbedBehavior::Reject => Err(anyhow!("embed rejected")),
            EmbedBehavior::Hang => std::future::pending().await,
        }
    }
}

pub(crate) fn settings() -> EmbedSettings {
    EmbedSettings {
        map_id: MapId::from("nwB1j9CilTkak2n66zCEUfA"),
        options: EmbedOptions {
            ui_controls: UiControls {
                cooperative_gestures: false,
                show_legend: true,
                full_screen_button: false,
            },
        },
    }
}

pub(crate) fn surface() -> MountSurface {
    MountSurface::new("map")
}

pub(crate) fn hidden_layers(ids: &[&str]) -> Vec<LayerState> {
    ids.iter()
        .map(|id| LayerState::hidden(LayerRecord::new(*id, format!("Layer {id}"))))
        .collect()
}

pub(crate) fn ids(values: &[&str]) -> Vec<LayerId> {
    values.iter().map(|id| LayerId::from(*id)).collect()
}
