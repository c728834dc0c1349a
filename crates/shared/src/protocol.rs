use serde::{Deserialize, Serialize};

use crate::domain::{LayerId, MapId};

/// Body of a visibility or legend-visibility command.
///
/// Exactly one of `show`/`hide` is ever sent per call, so the request is an enum
/// rather than a pair of optional lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRequest {
    Show(Vec<LayerId>),
    Hide(Vec<LayerId>),
}

impl VisibilityRequest {
    pub fn for_layer(layer_id: LayerId, show: bool) -> Self {
        if show {
            Self::Show(vec![layer_id])
        } else {
            Self::Hide(vec![layer_id])
        }
    }

    pub fn ids(&self) -> &[LayerId] {
        match self {
            Self::Show(ids) | Self::Hide(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiControls {
    pub cooperative_gestures: bool,
    pub show_legend: bool,
    pub full_screen_button: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedOptions {
    pub ui_controls: UiControls,
}

/// One call issued against a map controller, as recorded in call logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ControllerCall {
    Embed {
        map_id: MapId,
        surface: String,
        options: EmbedOptions,
    },
    GetLayers,
    SetLayerVisibility(VisibilityRequest),
    SetLayerLegendVisibility(VisibilityRequest),
    ShowLayerDataTable {
        layer_id: LayerId,
    },
    HideLayerDataTable,
}
