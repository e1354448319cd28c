//! The simulation as a whole, driven by [`Command`]s and frame callbacks.
//!
//! [`Simulation`] owns the particles, the aggregation grid, the emitters,
//! the configuration and the clock. Input handling lives outside the core
//! and talks to it only through [`Simulation::apply`]; rendering reads the
//! buffers back through the accessor methods.

use crate::{
    clock::SimulationClock,
    config::{GRID_CELL_SIZE, HIT_RADIUS, SimConfig},
    counter::{CounterReading, RadiusCounter},
    error::SimError,
    gravity::{Emitter, EmitterKind, GravityField},
    grid::AggregationGrid,
    particles::ParticleStore,
    phases::{self, StepContext},
    types::EmitterId,
};
use glam::Vec2;
use log::{debug, info, trace};
use rand::{SeedableRng, rngs::StdRng};

/// An input to the simulation, decoupled from whatever produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Adds an emitter and starts dragging it.
    PlaceEmitter { kind: EmitterKind, pos: Vec2 },
    /// Moves the emitter being dragged; ignored when nothing is dragged.
    MoveEmitter { pos: Vec2 },
    /// Ends the current drag.
    ReleaseEmitter,
    /// Removes the first emitter within [`HIT_RADIUS`] of `pos`.
    RemoveEmitter { pos: Vec2 },
    ClearEmitters,
    /// Replaces the configuration. A changed particle count reallocates.
    SetConfig(SimConfig),
    /// Reseeds every particle at the current count.
    Restart,
    /// Canvas extents changed; reallocates particles and grid.
    Resize { width: u32, height: u32 },
    TogglePause,
    /// Moves the counter circle.
    MoveCounter { pos: Vec2 },
}

/// An emitter as the renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterView {
    pub kind: EmitterKind,
    pub pos: Vec2,
    pub dragged: bool,
}

/// Result of one host frame callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// A tick was applied during this frame.
    pub ticked: bool,
    /// The host should schedule another frame.
    pub wants_repaint: bool,
}

pub struct Simulation {
    cfg: SimConfig,
    particles: ParticleStore,
    grid: AggregationGrid,
    field: GravityField,
    clock: SimulationClock,
    counter: RadiusCounter,
    rng: StdRng,
    dragging: Option<EmitterId>,
    /// Set by resets and edits; cleared by the next frame.
    dirty: bool,
}

impl Simulation {
    /// Creates a paused simulation on a `width × height` canvas.
    ///
    /// ### Errors
    /// [`SimError::InvalidConfig`] if `cfg` fails validation or the canvas
    /// is empty.
    pub fn new(cfg: SimConfig, width: u32, height: u32) -> Result<Self, SimError> {
        cfg.validate()?;
        let mut rng = seeded_rng(cfg.seed);
        let particles = ParticleStore::initialize(cfg.particle_count, width, height, &mut rng)?;
        info!(
            "created simulation: {} particles on {}x{}",
            cfg.particle_count, width, height
        );

        let mut sim = Self {
            cfg,
            grid: AggregationGrid::new(width, height, GRID_CELL_SIZE),
            particles,
            field: GravityField::new(),
            clock: SimulationClock::new(cfg.tick_interval_ms),
            counter: RadiusCounter::default(),
            rng,
            dragging: None,
            dirty: true,
        };
        sim.refresh_counter();
        Ok(sim)
    }

    /// Applies one input command.
    ///
    /// ### Errors
    /// - [`SimError::InvalidConfig`] for a [`Command::SetConfig`] that fails
    ///   validation (the old configuration stays in place), or for a
    ///   [`Command::Resize`] to an empty canvas.
    pub fn apply(&mut self, cmd: Command) -> Result<(), SimError> {
        match cmd {
            Command::PlaceEmitter { kind, pos } => {
                let id = self.field.add_emitter(kind, pos);
                debug!("placed {} emitter {} at {:?}", kind.name(), id, pos);
                self.dragging = Some(id);
            }
            Command::MoveEmitter { pos } => {
                if let Some(id) = self.dragging
                    && !self.field.move_emitter(id, pos)
                {
                    self.dragging = None;
                }
            }
            Command::ReleaseEmitter => {
                self.dragging = None;
            }
            Command::RemoveEmitter { pos } => match self.field.remove_nearest(pos, HIT_RADIUS) {
                Some(removed) => {
                    debug!("removed emitter {} at {:?}", removed.id, removed.pos);
                    if self.dragging == Some(removed.id) {
                        self.dragging = None;
                    }
                }
                None => trace!("no emitter within {} px of {:?}", HIT_RADIUS, pos),
            },
            Command::ClearEmitters => {
                debug!("cleared {} emitters", self.field.len());
                self.field.clear();
                self.dragging = None;
            }
            Command::SetConfig(cfg) => self.set_config(cfg)?,
            Command::Restart => self.reset(self.particles.width(), self.particles.height())?,
            Command::Resize { width, height } => {
                if width != self.particles.width() || height != self.particles.height() {
                    self.reset(width, height)?;
                }
            }
            Command::TogglePause => {
                self.clock.toggle();
                debug!("running = {}", self.clock.is_running());
            }
            Command::MoveCounter { pos } => {
                self.counter.set_center(pos);
                self.refresh_counter();
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Host frame callback: ticks once if the clock says one is due.
    ///
    /// ### Parameters
    /// - `now` - Host time in seconds.
    pub fn frame(&mut self, now: f64) -> FrameReport {
        let ticked = self.clock.poll(now);
        if ticked {
            self.tick();
        }

        let wants_repaint = self.clock.is_running() || self.dirty;
        self.dirty = false;
        FrameReport {
            ticked,
            wants_repaint,
        }
    }

    /// Applies a single tick immediately, whether running or paused.
    pub fn step(&mut self, now: f64) {
        self.tick();
        self.clock.mark_manual_tick(now);
        self.dirty = true;
    }

    /// Grid rebuild, then every particle's step, then the counter.
    fn tick(&mut self) {
        let rebuilt = phases::aggregation_phase(&self.particles, &mut self.grid, &self.cfg);
        let ctx = StepContext {
            field: &self.field,
            grid: &self.grid,
            cfg: &self.cfg,
        };
        phases::step_phase(&mut self.particles, &ctx, &mut self.rng);
        self.refresh_counter();

        trace!(
            "tick {}: {} particles, {} emitters, grid rebuilt = {}",
            self.clock.ticks(),
            self.particles.count(),
            self.field.len(),
            rebuilt
        );
    }

    fn set_config(&mut self, cfg: SimConfig) -> Result<(), SimError> {
        cfg.validate()?;
        let old = std::mem::replace(&mut self.cfg, cfg);

        if old.tick_interval_ms != cfg.tick_interval_ms {
            self.clock.set_interval_ms(cfg.tick_interval_ms);
        }
        if old.particle_count != cfg.particle_count || old.seed != cfg.seed {
            self.reset(self.particles.width(), self.particles.height())?;
        } else {
            self.refresh_counter();
        }
        Ok(())
    }

    /// Reallocates and reseeds all particles and the grid.
    ///
    /// Emitters, configuration and run state are kept.
    fn reset(&mut self, width: u32, height: u32) -> Result<(), SimError> {
        let mut rng = seeded_rng(self.cfg.seed);
        self.particles = ParticleStore::initialize(self.cfg.particle_count, width, height, &mut rng)?;
        self.rng = rng;
        self.grid.resize(width, height);
        self.refresh_counter();
        self.dirty = true;
        info!(
            "reset: {} particles on {}x{}",
            self.cfg.particle_count, width, height
        );
        Ok(())
    }

    fn refresh_counter(&mut self) {
        if self.cfg.counter_enabled {
            self.counter
                .recompute(&self.particles, self.cfg.counter_radius as f32);
        }
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    #[inline]
    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Live particle buffer, complete after every tick.
    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        self.particles.positions()
    }

    #[inline]
    pub fn emitter_list(&self) -> &[Emitter] {
        self.field.emitters()
    }

    pub fn emitters(&self) -> impl Iterator<Item = EmitterView> + '_ {
        self.field.emitters().iter().map(|e| EmitterView {
            kind: e.kind,
            pos: e.pos,
            dragged: self.dragging == Some(e.id),
        })
    }

    #[inline]
    pub fn dragging(&self) -> Option<EmitterId> {
        self.dragging
    }

    /// Counter overlay, if the counter is enabled and has a centre.
    pub fn counter(&self) -> Option<CounterReading> {
        if !self.cfg.counter_enabled {
            return None;
        }
        self.counter.reading(self.cfg.counter_radius as f32)
    }

    #[inline]
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
