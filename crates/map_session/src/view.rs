use crate::selection::SelectionSummary;

/// Presentation flags derived from a session on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub show_top_bar: bool,
    pub show_table_button: bool,
    pub table_button_label: &'static str,
    pub map_surface_ready: bool,
    pub selection_open: bool,
    pub summary: SelectionSummary,
}
