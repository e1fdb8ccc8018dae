//! Tunable defaults for graph construction.

use serde::{Deserialize, Serialize};

use crate::Position;

/// Defaults applied when nodes and edges are created without explicit values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Probability given to spawn edges created without one.
    pub default_spawn_probability: f64,

    /// `globalSpawnChance` of new events.
    pub default_global_spawn_chance: f64,

    /// Where new nodes without a requested position are placed.
    pub node_origin: Position,

    /// Diagonal step between consecutive unplaced nodes.
    pub node_stagger: f64,

    /// Horizontal gap between sibling sublocations.
    pub sublocation_spacing: f64,

    /// Vertical drop of sublocations below their parent.
    pub sublocation_drop: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            default_spawn_probability: 0.1,
            default_global_spawn_chance: 0.1,
            node_origin: Position::new(300.0, 200.0),
            node_stagger: 20.0,
            sublocation_spacing: 50.0,
            sublocation_drop: 20.0,
        }
    }
}
