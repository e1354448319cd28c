use crate::particles::ParticleStore;
use glam::Vec2;

/// What the renderer needs to draw the counter overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterReading {
    pub center: Vec2,
    pub radius: f32,
    pub count: usize,
}

/// Counts particles inside a circle that follows the pointer.
///
/// The count is only refreshed when asked to (after a tick, on pointer
/// movement, on radius change), never on a timer.
#[derive(Clone, Debug, Default)]
pub struct RadiusCounter {
    center: Option<Vec2>,
    count: usize,
}

impl RadiusCounter {
    pub fn set_center(&mut self, center: Vec2) {
        self.center = Some(center);
    }

    /// Recounts particles within `radius` of the current centre.
    ///
    /// Leaves the count at zero while no centre has been set.
    pub fn recompute(&mut self, particles: &ParticleStore, radius: f32) {
        self.count = match self.center {
            Some(c) => particles.count_within(c, radius),
            None => 0,
        };
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reading(&self, radius: f32) -> Option<CounterReading> {
        self.center.map(|center| CounterReading {
            center,
            radius,
            count: self.count,
        })
    }
}
