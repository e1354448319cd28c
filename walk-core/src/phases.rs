//! Per-tick simulation phases for the biased random walk.
//!
//! A tick is:
//! 1. [`aggregation_phase`]: rebuild the [`AggregationGrid`] from the
//!    current positions, if any inter-particle effect is enabled.
//! 2. [`step_phase`]: for every particle, build its
//!    [`DirectionWeights`] with [`compute_weights`], sample a direction and
//!    move one pixel, clamped to the canvas.
//!
//! The grid is never touched during [`step_phase`], so every particle sees
//! the same pre-tick aggregate regardless of its position in the buffer.

use crate::{
    config::SimConfig,
    gravity::GravityField,
    grid::AggregationGrid,
    interaction::{self, InteractionParams},
    particles::ParticleStore,
    types::Direction,
    weights::DirectionWeights,
};
use glam::Vec2;
use rand::Rng;

/// Read-only inputs shared by every particle during one tick.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    pub field: &'a GravityField,
    pub grid: &'a AggregationGrid,
    pub cfg: &'a SimConfig,
}

impl StepContext<'_> {
    #[inline]
    fn gravity_active(&self) -> bool {
        self.cfg.gravity_enabled && !self.field.is_empty()
    }

    #[inline]
    fn interaction(&self) -> InteractionParams {
        InteractionParams {
            attract: self.cfg.particle_attract,
            repel: self.cfg.particle_repel,
            strength: self.cfg.interaction_strength,
        }
    }
}

/// Rebuilds the aggregation grid when inter-particle interaction is enabled.
///
/// ### Returns
/// `true` if the grid was rebuilt.
pub fn aggregation_phase(
    particles: &ParticleStore,
    grid: &mut AggregationGrid,
    cfg: &SimConfig,
) -> bool {
    if !cfg.interaction_active() {
        return false;
    }
    grid.rebuild(particles);
    true
}

/// Builds the step weights for a particle at `pos`.
///
/// Starts from [`DirectionWeights::uniform`], then adds the emitter bias if
/// gravity is on and emitters exist, then the cell-aggregate bias if any
/// inter-particle effect is on.
pub fn compute_weights(pos: Vec2, ctx: &StepContext<'_>) -> DirectionWeights {
    let mut weights = DirectionWeights::uniform();

    if ctx.gravity_active() {
        ctx.field
            .accumulate_into(pos, ctx.cfg.gravity_strength, &mut weights);
    }

    let params = ctx.interaction();
    if params.is_active() {
        let cell = ctx.grid.cell_coords(pos);
        interaction::accumulate_into(pos, ctx.grid, cell, &params, &mut weights);
    }

    weights
}

/// Moves `pos` one step in `dir` and clamps it into `particles`' canvas.
#[inline]
pub fn apply_step(particles: &ParticleStore, pos: Vec2, dir: Direction) -> Vec2 {
    particles.clamp(pos + dir.offset())
}

/// Advances every particle by one sampled step, in place.
///
/// [`aggregation_phase`] must have run first in the same tick when
/// interaction is enabled.
pub fn step_phase(particles: &mut ParticleStore, ctx: &StepContext<'_>, rng: &mut impl Rng) {
    for i in 0..particles.count() {
        let pos = particles.positions()[i];
        let dir = compute_weights(pos, ctx).sample(rng);
        particles.positions_mut()[i] = apply_step(particles, pos, dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::EmitterKind;
    use rand::{SeedableRng, rngs::StdRng};

    fn all_on() -> SimConfig {
        SimConfig {
            gravity_enabled: true,
            particle_attract: true,
            particle_repel: true,
            ..SimConfig::default()
        }
    }

    #[test]
    fn aggregation_phase_skips_when_interaction_off() {
        let store = ParticleStore::from_positions(vec![Vec2::new(5.0, 5.0)], 40, 40);
        let mut grid = AggregationGrid::new(40, 40, 20);

        assert!(!aggregation_phase(&store, &mut grid, &SimConfig::default()));
        assert_eq!(grid.total_count(), 0);

        assert!(aggregation_phase(&store, &mut grid, &all_on()));
        assert_eq!(grid.total_count(), 1);
    }

    #[test]
    fn weights_never_drop_below_base() {
        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::initialize(400, 120, 90, &mut rng).unwrap();
        let mut grid = AggregationGrid::new(120, 90, 20);
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(30.0, 30.0));
        field.add_emitter(EmitterKind::Repel, Vec2::new(80.0, 60.0));
        let cfg = all_on();

        aggregation_phase(&store, &mut grid, &cfg);
        let ctx = StepContext {
            field: &field,
            grid: &grid,
            cfg: &cfg,
        };

        for &p in store.positions() {
            let w = compute_weights(p, &ctx);
            assert!(w.0.iter().all(|&x| x >= 1.0 && x.is_finite()));
        }
    }

    #[test]
    fn gravity_ignored_when_disabled() {
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(20.0, 10.0));
        let grid = AggregationGrid::new(40, 40, 20);
        let cfg = SimConfig::default();
        let ctx = StepContext {
            field: &field,
            grid: &grid,
            cfg: &cfg,
        };

        assert_eq!(
            compute_weights(Vec2::new(10.0, 10.0), &ctx),
            DirectionWeights::uniform()
        );
    }

    #[test]
    fn gravity_adds_emitter_bias() {
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(110.0, 100.0));
        let grid = AggregationGrid::new(200, 200, 20);
        let cfg = SimConfig {
            gravity_enabled: true,
            gravity_strength: 2.0,
            ..SimConfig::default()
        };
        let ctx = StepContext {
            field: &field,
            grid: &grid,
            cfg: &cfg,
        };

        let w = compute_weights(Vec2::new(100.0, 100.0), &ctx);
        assert!((w.get(Direction::E) - 2.0).abs() < 1e-5);
        assert_eq!(w.get(Direction::W), 1.0);
    }

    #[test]
    fn step_keeps_particles_in_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        // Start everything on the edges and corners of a small canvas.
        let mut store = ParticleStore::from_positions(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(9.0, 0.0),
                Vec2::new(0.0, 6.0),
                Vec2::new(9.0, 6.0),
                Vec2::new(4.0, 0.0),
            ],
            10,
            7,
        );
        let mut grid = AggregationGrid::new(10, 7, 20);
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Repel, Vec2::new(5.0, 3.0));
        let cfg = all_on();

        for _ in 0..500 {
            aggregation_phase(&store, &mut grid, &cfg);
            let ctx = StepContext {
                field: &field,
                grid: &grid,
                cfg: &cfg,
            };
            step_phase(&mut store, &ctx, &mut rng);

            for p in store.positions() {
                assert!(p.x >= 0.0 && p.x < 10.0);
                assert!(p.y >= 0.0 && p.y < 7.0);
            }
        }
    }

    #[test]
    fn step_moves_every_particle_in_the_interior() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut store =
            ParticleStore::from_positions(vec![Vec2::new(50.0, 50.0); 64], 100, 100);
        let grid = AggregationGrid::new(100, 100, 20);
        let field = GravityField::new();
        let cfg = SimConfig::default();
        let ctx = StepContext {
            field: &field,
            grid: &grid,
            cfg: &cfg,
        };

        step_phase(&mut store, &ctx, &mut rng);

        for p in store.positions() {
            assert_ne!(*p, Vec2::new(50.0, 50.0));
            assert!((p.x - 50.0).abs() <= 1.0 && (p.y - 50.0).abs() <= 1.0);
        }
    }

    #[test]
    fn apply_step_clamps_per_axis() {
        let store = ParticleStore::from_positions(Vec::new(), 10, 10);
        assert_eq!(
            apply_step(&store, Vec2::new(0.0, 5.0), Direction::NW),
            Vec2::new(0.0, 4.0)
        );
        assert_eq!(
            apply_step(&store, Vec2::new(9.0, 9.0), Direction::SE),
            Vec2::new(9.0, 9.0)
        );
    }

    #[test]
    fn attract_drifts_towards_emitter() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut store =
            ParticleStore::from_positions(vec![Vec2::new(20.0, 100.0); 200], 200, 200);
        let grid = AggregationGrid::new(200, 200, 20);
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(180.0, 100.0));
        let cfg = SimConfig {
            gravity_enabled: true,
            ..SimConfig::default()
        };

        for _ in 0..50 {
            let ctx = StepContext {
                field: &field,
                grid: &grid,
                cfg: &cfg,
            };
            step_phase(&mut store, &ctx, &mut rng);
        }

        let mean_x: f32 =
            store.positions().iter().map(|p| p.x).sum::<f32>() / store.count() as f32;
        assert!(mean_x > 35.0, "mean x only reached {mean_x}");
    }
}
