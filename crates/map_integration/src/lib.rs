use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{LayerId, LayerRecord, MapId},
    protocol::{EmbedOptions, VisibilityRequest},
};

pub mod catalog;
mod in_memory;

pub use in_memory::{InMemoryEmbedder, InMemoryMapController};

/// Caller-owned surface a map is embedded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSurface {
    pub element_id: String,
}

impl MountSurface {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

/// A live session with an embedded map controller.
///
/// The controller owns rendering and its own layer registry; callers only drive which
/// layers, legends and data tables are shown.
#[async_trait]
pub trait MapController: Send + Sync {
    async fn get_layers(&self) -> anyhow::Result<Vec<LayerRecord>>;
    async fn set_layer_visibility(&self, request: VisibilityRequest) -> anyhow::Result<()>;
    async fn set_layer_legend_visibility(&self, request: VisibilityRequest)
        -> anyhow::Result<()>;
    fn show_layer_data_table(&self, layer_id: &LayerId) -> anyhow::Result<()>;
    fn hide_layer_data_table(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MapEmbedder: Send + Sync {
    async fn embed(
        &self,
        surface: MountSurface,
        map_id: MapId,
        options: EmbedOptions,
    ) -> anyhow::Result<Arc<dyn MapController>>;
}

pub struct MissingMapEmbedder;

#[async_trait]
impl MapEmbedder for MissingMapEmbedder {
    async fn embed(
        &self,
        _surface: MountSurface,
        map_id: MapId,
        _options: EmbedOptions,
    ) -> anyhow::Result<Arc<dyn MapController>> {
        Err(anyhow::anyhow!(
            "map controller is unavailable for map {map_id}"
        ))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
