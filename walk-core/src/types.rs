use glam::Vec2;
use std::f32::consts::FRAC_1_SQRT_2;

/// Index of a particle in a [`crate::particles::ParticleStore`].
///
/// Only meaningful until the store is reallocated (count or canvas change).
pub type ParticleId = usize;

/// Stable handle of an emitter in a [`crate::gravity::GravityField`].
///
/// Unlike list positions, ids survive removal of other emitters, so a drag
/// in progress keeps pointing at the same emitter.
pub type EmitterId = u64;

/// One of the eight compass steps a particle can take.
///
/// The discriminant is the slot in a [`crate::weights::DirectionWeights`]
/// vector and the variants are declared in the canonical scan order used by
/// sampling. Screen space is y-down, so `N` moves towards smaller `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    NW = 0,
    N = 1,
    NE = 2,
    W = 3,
    E = 4,
    SW = 5,
    S = 6,
    SE = 7,
}

impl Direction {
    /// Number of step directions.
    pub const COUNT: usize = 8;

    /// All directions in canonical scan order.
    pub const ALL: [Direction; Self::COUNT] = [
        Direction::NW,
        Direction::N,
        Direction::NE,
        Direction::W,
        Direction::E,
        Direction::SW,
        Direction::S,
        Direction::SE,
    ];

    /// Unit-length versions of [`Direction::offset`], indexed by slot.
    ///
    /// Bias projections use these so that a diagonal never receives more
    /// weight than the axis a field is exactly aligned with.
    pub const UNIT_VECTORS: [Vec2; Self::COUNT] = [
        Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        Vec2::new(0.0, -1.0),
        Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        Vec2::new(-1.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        Vec2::new(0.0, 1.0),
        Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    ];

    /// Slot of this direction in a weight vector.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction stored at `index`, if `index < 8`.
    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    /// Pixel offset applied when this direction is taken.
    ///
    /// Diagonals move one pixel on both axes.
    #[inline]
    pub fn offset(self) -> Vec2 {
        match self {
            Direction::NW => Vec2::new(-1.0, -1.0),
            Direction::N => Vec2::new(0.0, -1.0),
            Direction::NE => Vec2::new(1.0, -1.0),
            Direction::W => Vec2::new(-1.0, 0.0),
            Direction::E => Vec2::new(1.0, 0.0),
            Direction::SW => Vec2::new(-1.0, 1.0),
            Direction::S => Vec2::new(0.0, 1.0),
            Direction::SE => Vec2::new(1.0, 1.0),
        }
    }

    /// Unit vector pointing the same way as [`Direction::offset`].
    #[inline]
    pub fn unit(self) -> Vec2 {
        Self::UNIT_VECTORS[self.index()]
    }
}
