//! Per-particle direction weights and weighted sampling.

use crate::types::Direction;
use glam::Vec2;
use rand::Rng;

/// Weight given to every direction before any bias is added.
pub const BASE_WEIGHT: f32 = 1.0;

/// Eight non-negative weights, one per [`Direction`] slot.
///
/// Relative magnitudes define the probability of each step direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionWeights(pub [f32; Direction::COUNT]);

impl Default for DirectionWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

impl DirectionWeights {
    /// All directions at [`BASE_WEIGHT`]; every step stays possible.
    #[inline]
    pub fn uniform() -> Self {
        Self([BASE_WEIGHT; Direction::COUNT])
    }

    /// All directions at zero, for collecting a pure bias contribution.
    #[inline]
    pub fn zero() -> Self {
        Self([0.0; Direction::COUNT])
    }

    #[inline]
    pub fn get(&self, dir: Direction) -> f32 {
        self.0[dir.index()]
    }

    #[inline]
    pub fn total(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Adds `strength` times the projection of `dir` onto every compass unit
    /// vector it points along.
    ///
    /// Directions with a non-positive dot product receive nothing, so with a
    /// non-negative `strength` no weight ever decreases.
    ///
    /// ### Parameters
    /// - `dir` - Unit bias direction.
    /// - `strength` - Magnitude of the bias.
    #[inline]
    pub fn add_projected(&mut self, dir: Vec2, strength: f32) {
        for (w, unit) in self.0.iter_mut().zip(Direction::UNIT_VECTORS) {
            let dot = dir.dot(unit);
            if dot > 0.0 {
                *w += strength * dot;
            }
        }
    }

    /// Picks the direction selected by a draw `r` in `[0, total)`.
    ///
    /// Directions are scanned in canonical order and the first one whose
    /// cumulative weight strictly exceeds `r` wins. A draw at or past the
    /// total, which float rounding can produce, selects the last direction
    /// with positive weight.
    pub fn select(&self, r: f32) -> Direction {
        let mut cumulative = 0.0;
        let mut last_positive = Direction::SE;
        for (dir, &w) in Direction::ALL.iter().zip(&self.0) {
            cumulative += w;
            if w > 0.0 {
                last_positive = *dir;
            }
            if r < cumulative {
                return *dir;
            }
        }
        last_positive
    }

    /// Draws a direction with probability proportional to its weight.
    ///
    /// Falls back to a uniform choice if the total is not positive.
    pub fn sample(&self, rng: &mut impl Rng) -> Direction {
        let total = self.total();
        if total <= 0.0 || !total.is_finite() {
            return Direction::ALL[rng.random_range(0..Direction::COUNT)];
        }
        self.select(rng.random_range(0.0..total))
    }
}
