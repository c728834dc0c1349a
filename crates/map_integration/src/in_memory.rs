//! Headless map controller keeping its own layer registry.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{LayerId, LayerRecord, MapId},
    protocol::{ControllerCall, EmbedOptions, VisibilityRequest},
};
use tracing::debug;

use crate::{MapController, MapEmbedder, MountSurface};

#[derive(Default)]
struct RegistryState {
    hidden: HashSet<LayerId>,
    legend_hidden: HashSet<LayerId>,
    table_layer: Option<LayerId>,
    calls: Vec<ControllerCall>,
}

/// Every layer starts visible with its legend entry shown, which is the default state
/// a freshly embedded map presents.
pub struct InMemoryMapController {
    layers: Vec<LayerRecord>,
    state: Mutex<RegistryState>,
}

impl InMemoryMapController {
    pub fn new(layers: Vec<LayerRecord>) -> Self {
        Self {
            layers,
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub fn is_visible(&self, layer_id: &LayerId) -> bool {
        self.knows(layer_id) && !self.state().hidden.contains(layer_id)
    }

    pub fn is_legend_visible(&self, layer_id: &LayerId) -> bool {
        self.knows(layer_id) && !self.state().legend_hidden.contains(layer_id)
    }

    pub fn data_table_layer(&self) -> Option<LayerId> {
        self.state().table_layer.clone()
    }

    pub fn calls(&self) -> Vec<ControllerCall> {
        self.state().calls.clone()
    }

    fn knows(&self, layer_id: &LayerId) -> bool {
        self.layers.iter().any(|layer| &layer.id == layer_id)
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_known(&self, ids: &[LayerId]) -> Result<()> {
        match ids.iter().find(|id| !self.knows(id)) {
            Some(unknown) => Err(anyhow!("unknown layer id {unknown}")),
            None => Ok(()),
        }
    }

    fn apply(hidden: &mut HashSet<LayerId>, request: &VisibilityRequest) {
        match request {
            VisibilityRequest::Show(ids) => {
                for id in ids {
                    hidden.remove(id);
                }
            }
            VisibilityRequest::Hide(ids) => hidden.extend(ids.iter().cloned()),
        }
    }
}

#[async_trait]
impl MapController for InMemoryMapController {
    async fn get_layers(&self) -> Result<Vec<LayerRecord>> {
        self.state().calls.push(ControllerCall::GetLayers);
        Ok(self.layers.clone())
    }

    async fn set_layer_visibility(&self, request: VisibilityRequest) -> Result<()> {
        let mut state = self.state();
        state
            .calls
            .push(ControllerCall::SetLayerVisibility(request.clone()));
        self.check_known(request.ids())?;
        Self::apply(&mut state.hidden, &request);
        Ok(())
    }

    async fn set_layer_legend_visibility(&self, request: VisibilityRequest) -> Result<()> {
        let mut state = self.state();
        state
            .calls
            .push(ControllerCall::SetLayerLegendVisibility(request.clone()));
        self.check_known(request.ids())?;
        Self::apply(&mut state.legend_hidden, &request);
        Ok(())
    }

    fn show_layer_data_table(&self, layer_id: &LayerId) -> Result<()> {
        let mut state = self.state();
        state.calls.push(ControllerCall::ShowLayerDataTable {
            layer_id: layer_id.clone(),
        });
        self.check_known(std::slice::from_ref(layer_id))?;
        state.table_layer = Some(layer_id.clone());
        Ok(())
    }

    fn hide_layer_data_table(&self) -> Result<()> {
        let mut state = self.state();
        state.calls.push(ControllerCall::HideLayerDataTable);
        state.table_layer = None;
        Ok(())
    }
}

/// Embeds the same in-memory controller on every request and records each request.
pub struct InMemoryEmbedder {
    controller: Arc<InMemoryMapController>,
    embeds: Mutex<Vec<ControllerCall>>,
}

impl InMemoryEmbedder {
    pub fn new(layers: Vec<LayerRecord>) -> Self {
        Self {
            controller: Arc::new(InMemoryMapController::new(layers)),
            embeds: Mutex::new(Vec::new()),
        }
    }

    pub fn controller(&self) -> Arc<InMemoryMapController> {
        Arc::clone(&self.controller)
    }

    pub fn embed_calls(&self) -> Vec<ControllerCall> {
        self.embeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MapEmbedder for InMemoryEmbedder {
    async fn embed(
        &self,
        surface: MountSurface,
        map_id: MapId,
        options: EmbedOptions,
    ) -> Result<Arc<dyn MapController>> {
        debug!(map_id = %map_id, surface = %surface.element_id, "in-memory embed");
        self.embeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ControllerCall::Embed {
                map_id,
                surface: surface.element_id,
                options,
            });
        let controller: Arc<dyn MapController> = self.controller.clone();
        Ok(controller)
    }
}
