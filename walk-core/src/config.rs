use crate::{error::SimError, gravity::EmitterKind};
use serde::{Deserialize, Serialize};

/// Side length of an aggregation grid cell, in pixels.
pub const GRID_CELL_SIZE: u32 = 20;

/// Half-width of the cell window scanned for inter-particle interaction
/// (`2` gives a 5×5 window).
pub const NEIGHBOR_RADIUS: usize = 2;

/// Distance within which a removal query hits an emitter, in pixels.
pub const HIT_RADIUS: f32 = 15.0;

/// Scale applied to the gravity base strength before the `1/dist` falloff.
pub const GRAVITY_SCALE: f32 = 5.0;

/// Runtime-adjustable simulation parameters.
///
/// Owned by [`crate::engine::Simulation`] and read at tick time; the UI
/// replaces it wholesale through [`crate::engine::Command::SetConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub particle_count: usize,
    /// Minimum time between two applied ticks, in milliseconds.
    pub tick_interval_ms: u32,
    pub gravity_enabled: bool,
    pub gravity_strength: f32,
    pub particle_attract: bool,
    pub particle_repel: bool,
    pub interaction_strength: f32,
    pub counter_enabled: bool,
    /// Radius of the particle counter, in pixels.
    pub counter_radius: u32,
    /// Kind given to newly placed emitters.
    pub emitter_kind: EmitterKind,
    pub show_emitters: bool,
    /// Seed for particle placement and step sampling; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            tick_interval_ms: 10,
            gravity_enabled: false,
            gravity_strength: 200.0,
            particle_attract: false,
            particle_repel: false,
            interaction_strength: 50.0,
            counter_enabled: false,
            counter_radius: 100,
            emitter_kind: EmitterKind::Attract,
            show_emitters: true,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Returns `true` if either inter-particle effect is switched on.
    #[inline]
    pub fn interaction_active(&self) -> bool {
        self.particle_attract || self.particle_repel
    }

    /// Checks the values the engine relies on.
    ///
    /// Strengths must be finite and non-negative so that every bias
    /// contribution stays additive and weights never drop below the base.
    ///
    /// ### Errors
    /// [`SimError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.particle_count == 0 {
            return Err(SimError::InvalidConfig("particle_count must be positive"));
        }
        if !self.gravity_strength.is_finite() || self.gravity_strength < 0.0 {
            return Err(SimError::InvalidConfig(
                "gravity_strength must be finite and non-negative",
            ));
        }
        if !self.interaction_strength.is_finite() || self.interaction_strength < 0.0 {
            return Err(SimError::InvalidConfig(
                "interaction_strength must be finite and non-negative",
            ));
        }
        Ok(())
    }
}
