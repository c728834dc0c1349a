//! Layer picker model: search, counts, open/close state.

use std::fmt;

use shared::domain::LayerState;

/// Case-insensitive substring match; `needle` is already lowercased.
fn matches_lowered(layer: &LayerState, needle: &str) -> bool {
    layer.name().to_lowercase().contains(needle)
        || layer
            .caption()
            .is_some_and(|caption| caption.to_lowercase().contains(needle))
}

/// Layers matching `query`, in list order. An empty query matches everything.
pub fn filter_layers<'a>(layers: &'a [LayerState], query: &str) -> Vec<&'a LayerState> {
    let needle = query.to_lowercase();
    layers
        .iter()
        .filter(|layer| matches_lowered(layer, &needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub selected: usize,
    pub total: usize,
}

impl SelectionSummary {
    pub fn of(layers: &[LayerState]) -> Self {
        Self {
            selected: layers.iter().filter(|layer| layer.visible).count(),
            total: layers.len(),
        }
    }
}

impl fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} selected", self.selected, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKey {
    Escape,
    Other,
}

#[derive(Debug)]
pub struct SelectionRows<'a> {
    pub rows: Vec<&'a LayerState>,
    pub summary: SelectionSummary,
    pub empty_message: Option<String>,
}

/// The picker starts open. Reopening it clears the previous search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSurface {
    open: bool,
    query: String,
}

impl Default for SelectionSurface {
    fn default() -> Self {
        Self {
            open: true,
            query: String::new(),
        }
    }
}

impl SelectionSurface {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            self.query.clear();
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Returns `true` if the key closed the surface.
    pub fn on_key(&mut self, key: SurfaceKey) -> bool {
        if self.open && key == SurfaceKey::Escape {
            self.close();
            return true;
        }
        false
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn rows<'a>(&self, layers: &'a [LayerState]) -> SelectionRows<'a> {
        let rows = filter_layers(layers, &self.query);
        let empty_message = rows
            .is_empty()
            .then(|| format!("No layers match \"{}\"", self.query));
        SelectionRows {
            rows,
            summary: SelectionSummary::of(layers),
            empty_message,
        }
    }
}
