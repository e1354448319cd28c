use crate::{error::SimError, types::ParticleId};
use glam::Vec2;
use rand::Rng;

/// Flat buffer of particle positions inside a `width × height` canvas.
///
/// Every stored coordinate satisfies `0 <= x <= width - 1` and
/// `0 <= y <= height - 1`. Order carries no meaning beyond giving the
/// renderer stable indices.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    positions: Vec<Vec2>,
    width: u32,
    height: u32,
}

impl ParticleStore {
    /// Allocates `count` particles placed uniformly over the canvas.
    ///
    /// Coordinates are whole pixels drawn from `[0, width-1] × [0, height-1]`.
    ///
    /// ### Errors
    /// [`SimError::InvalidConfig`] if either extent is zero.
    pub fn initialize(
        count: usize,
        width: u32,
        height: u32,
        rng: &mut impl Rng,
    ) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidConfig("canvas extents must be positive"));
        }

        let positions = (0..count)
            .map(|_| {
                let x = rng.random_range(0..width);
                let y = rng.random_range(0..height);
                Vec2::new(x as f32, y as f32)
            })
            .collect();

        Ok(Self {
            positions,
            width,
            height,
        })
    }

    /// Builds a store from explicit positions, clamping each into the canvas.
    pub fn from_positions(positions: Vec<Vec2>, width: u32, height: u32) -> Self {
        let mut store = Self {
            positions,
            width,
            height,
        };
        for i in 0..store.positions.len() {
            store.positions[i] = store.clamp(store.positions[i]);
        }
        store
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Position of particle `id`.
    pub fn get(&self, id: ParticleId) -> Result<Vec2, SimError> {
        self.positions
            .get(id)
            .copied()
            .ok_or(SimError::IndexOutOfRange {
                index: id,
                len: self.positions.len(),
            })
    }

    /// Overwrites the position of particle `id`, clamped into the canvas.
    pub fn set(&mut self, id: ParticleId, x: f32, y: f32) -> Result<(), SimError> {
        let clamped = self.clamp(Vec2::new(x, y));
        let len = self.positions.len();
        let slot = self
            .positions
            .get_mut(id)
            .ok_or(SimError::IndexOutOfRange { index: id, len })?;
        *slot = clamped;
        Ok(())
    }

    /// Read-only view of the whole buffer, for rendering.
    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    #[inline]
    pub(crate) fn positions_mut(&mut self) -> &mut [Vec2] {
        &mut self.positions
    }

    /// Clamps each axis of `p` independently into the canvas.
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(0.0, self.width.saturating_sub(1) as f32),
            p.y.clamp(0.0, self.height.saturating_sub(1) as f32),
        )
    }

    /// Counts particles within `radius` of `center` (inclusive).
    ///
    /// A bounding-box test rejects most particles before the distance check.
    pub fn count_within(&self, center: Vec2, radius: f32) -> usize {
        let r2 = radius * radius;
        self.positions
            .iter()
            .filter(|p| {
                let d = **p - center;
                if d.x.abs() > radius || d.y.abs() > radius {
                    return false;
                }
                d.length_squared() <= r2
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn initialize_places_whole_pixels_inside_canvas() {
        let mut rng = StdRng::seed_from_u64(7);
        let store = ParticleStore::initialize(500, 30, 20, &mut rng).unwrap();

        assert_eq!(store.count(), 500);
        for p in store.positions() {
            assert!(p.x >= 0.0 && p.x <= 29.0);
            assert!(p.y >= 0.0 && p.y <= 19.0);
            assert_eq!(p.x.fract(), 0.0);
            assert_eq!(p.y.fract(), 0.0);
        }
    }

    #[test]
    fn initialize_rejects_empty_canvas() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = ParticleStore::initialize(10, 0, 20, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn get_and_set_check_index() {
        let mut store = ParticleStore::from_positions(vec![Vec2::new(1.0, 2.0)], 10, 10);

        assert_eq!(store.get(0), Ok(Vec2::new(1.0, 2.0)));
        assert_eq!(
            store.get(1),
            Err(SimError::IndexOutOfRange { index: 1, len: 1 })
        );

        store.set(0, 4.0, 5.0).unwrap();
        assert_eq!(store.get(0), Ok(Vec2::new(4.0, 5.0)));
        assert_eq!(
            store.set(3, 0.0, 0.0),
            Err(SimError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn set_clamps_into_canvas() {
        let mut store = ParticleStore::from_positions(vec![Vec2::ZERO], 10, 8);
        store.set(0, -3.0, 100.0).unwrap();
        assert_eq!(store.get(0), Ok(Vec2::new(0.0, 7.0)));
    }

    #[test]
    fn count_within_is_inclusive_and_circular() {
        let store = ParticleStore::from_positions(
            vec![
                Vec2::new(50.0, 50.0),
                Vec2::new(60.0, 50.0), // exactly on the radius
                Vec2::new(58.0, 58.0), // inside the box, outside the circle
                Vec2::new(90.0, 90.0),
            ],
            100,
            100,
        );

        assert_eq!(store.count_within(Vec2::new(50.0, 50.0), 10.0), 2);
        assert_eq!(store.count_within(Vec2::new(0.0, 0.0), 5.0), 0);
    }
}
