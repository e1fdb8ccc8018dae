//! Placement of imported nodes.

use serde::{Deserialize, Serialize};
use world_graph::{GraphSettings, Position};

/// Grid used to place imported entries on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub grid_origin: Position,
    pub column_spacing: f64,
    pub row_spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            grid_origin: Position::new(150.0, 150.0),
            column_spacing: 200.0,
            row_spacing: 180.0,
        }
    }
}

impl LayoutSettings {
    /// Cell of entry `index` in a roughly square grid holding `total` entries.
    pub fn grid_position(&self, index: usize, total: usize) -> Position {
        let cols = ((total as f64).sqrt().ceil() as usize).max(1);
        let col = (index % cols) as f64;
        let row = (index / cols) as f64;
        self.grid_origin
            .offset(col * self.column_spacing, row * self.row_spacing)
    }
}

/// Sublocation `index` of `count`, in a row centred under its parent.
pub fn sublocation_position(
    parent: Position,
    index: usize,
    count: usize,
    settings: &GraphSettings,
) -> Position {
    let centred = index as f64 - (count.saturating_sub(1)) as f64 / 2.0;
    parent.offset(centred * settings.sublocation_spacing, settings.sublocation_drop)
}
