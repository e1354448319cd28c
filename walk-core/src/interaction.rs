//! Coarse many-body attraction and repulsion over an [`AggregationGrid`].
//!
//! Each occupied cell in the window around a particle acts as a single body
//! of mass `count` at the cell centroid. Per-particle cost is bounded by the
//! window size, not by the population.

use crate::{
    config::NEIGHBOR_RADIUS, grid::AggregationGrid, types::Direction, weights::DirectionWeights,
};
use glam::Vec2;

/// Which inter-particle effects are active and how strong they are.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionParams {
    pub attract: bool,
    pub repel: bool,
    pub strength: f32,
}

impl InteractionParams {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.attract || self.repel
    }
}

/// Adds the cell-aggregate bias at `pos` into `weights`.
///
/// For every non-empty cell in the window around `cell` (a `(row, col)`
/// pair, normally `grid.cell_coords(pos)`):
///
/// 1. Take the vector from `pos` to the cell centroid.
/// 2. Skip the cell if it is closer than 1 px; this also keeps a particle's
///    own cell from dominating when it is nearly alone.
/// 3. Magnitude is `strength * count / dist²`.
/// 4. Attraction projects the direction, repulsion projects its negation.
///    Both may apply to the same cell.
///
/// ### Parameters
/// - `pos` - Particle position.
/// - `grid` - Aggregate rebuilt from pre-tick positions.
/// - `cell` - Owning cell of `pos`.
/// - `params` - Enabled effects and strength.
/// - `weights` - Accumulator the bias is added into.
pub fn accumulate_into(
    pos: Vec2,
    grid: &AggregationGrid,
    cell: (usize, usize),
    params: &InteractionParams,
    weights: &mut DirectionWeights,
) {
    if !params.is_active() {
        return;
    }

    let (row, col) = cell;
    for idx in grid.neighbors_of(row, col, NEIGHBOR_RADIUS) {
        let Ok(centroid) = grid.centroid_of(idx) else {
            continue;
        };

        let g = centroid - pos;
        let dist = g.length();
        if dist < 1.0 {
            continue;
        }

        let dir = g / dist;
        let magnitude = (params.strength * grid.count(idx) as f32) / (dist * dist);

        if params.attract {
            weights.add_projected(dir, magnitude);
        }
        if params.repel {
            weights.add_projected(-dir, magnitude);
        }
    }
}

/// Returns the cell-aggregate bias at `pos`, one value per [`Direction`]
/// slot.
pub fn bias_contribution(
    pos: Vec2,
    grid: &AggregationGrid,
    cell: (usize, usize),
    params: &InteractionParams,
) -> [f32; Direction::COUNT] {
    let mut weights = DirectionWeights::zero();
    accumulate_into(pos, grid, cell, params, &mut weights);
    weights.0
}
