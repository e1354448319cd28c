//! Interactive random-walk viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulation`] and a draft
//! [`SimConfig`] edited by the widgets, and implements [`eframe::App`] to
//! draw particles and emitters and translate pointer input into
//! [`Command`]s.

use eframe::App;
use glam::Vec2;
use log::warn;
use walk_core::{
    config::SimConfig,
    engine::{Command, Simulation},
    error::SimError,
    gravity::EmitterKind,
};

/// Canvas extents used until the central panel has been laid out once.
const INITIAL_CANVAS: (u32, u32) = (800, 600);

/// Upper bound of the particle count slider.
const MAX_PARTICLES: usize = 500_000;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Simulation`], driven through [`Command`]s.
/// - A draft [`SimConfig`] that the side panel edits and that is pushed to
///   the simulation whenever it differs from the live one.
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / pointer input.
/// 2. Call [`Simulation::frame`], which ticks if running and due.
/// 3. Render particles, emitters and the counter overlay.
///
/// ### Fields
/// - `sim` - The simulation being shown.
/// - `cfg` - Draft configuration bound to the widgets.
/// - `canvas` - Canvas extents in pixels the simulation was last sized to.
/// - `last_error` - Last rejected command, shown in the status bar.
pub struct Viewer {
    sim: Simulation,
    cfg: SimConfig,
    canvas: (u32, u32),
    last_error: Option<String>,
}

impl Viewer {
    /// Creates a paused viewer on the initial canvas size.
    ///
    /// ### Errors
    /// Whatever [`Simulation::new`] reports for `cfg`.
    pub fn new(cfg: SimConfig) -> Result<Self, SimError> {
        let (w, h) = INITIAL_CANVAS;
        Ok(Self {
            sim: Simulation::new(cfg, w, h)?,
            cfg,
            canvas: INITIAL_CANVAS,
            last_error: None,
        })
    }

    /// Forwards a command to the simulation, remembering any rejection.
    ///
    /// Only an accepted config or resize clears the remembered error.
    fn send(&mut self, cmd: Command) {
        match self.sim.apply(cmd) {
            Ok(()) => {
                if matches!(cmd, Command::SetConfig(_) | Command::Resize { .. }) {
                    self.last_error = None;
                }
            }
            Err(e) => {
                warn!("{cmd:?} rejected: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Pushes the draft configuration if the widgets changed it.
    ///
    /// A rejected draft is replaced by the simulation's live configuration.
    fn sync_config(&mut self) {
        if self.cfg != *self.sim.config() {
            self.send(Command::SetConfig(self.cfg));
            self.cfg = *self.sim.config();
        }
    }

    /// Resizes the simulation to the pixel extents of `rect`.
    fn sync_canvas(&mut self, rect: egui::Rect) {
        let size = (
            (rect.width().floor() as u32).max(1),
            (rect.height().floor() as u32).max(1),
        );
        if size != self.canvas {
            self.canvas = size;
            self.send(Command::Resize {
                width: size.0,
                height: size.1,
            });
        }
    }

    /// Converts a canvas pixel position to screen-space.
    ///
    /// The canvas origin is the top-left corner of `rect`, with y growing
    /// downwards as on screen.
    fn canvas_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
    }

    /// Converts a screen-space position back to canvas pixels.
    ///
    /// This is the inverse of [`Viewer::canvas_to_screen`].
    fn screen_to_canvas(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    /// Builds the top panel UI (run controls, stepping, restart).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.sim.is_running() {
                        "⏸ Pause"
                    } else {
                        "▶ Run"
                    })
                    .clicked()
                {
                    self.send(Command::TogglePause);
                }

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    self.sim.step(now);
                }

                if ui.button("Restart").clicked() {
                    self.send(Command::Restart);
                }

                if ui.button("Clear emitters").clicked() {
                    self.send(Command::ClearEmitters);
                }
            });
        });
    }

    /// Builds the bottom status bar (tick timing, counts, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let clock = self.sim.clock();
                ui.label(format!("dt target = {} ms", self.sim.config().tick_interval_ms));
                ui.label(format!("dt last = {:.3} s", clock.last_dt()));
                ui.label(format!("ticks = {}", clock.ticks()));
                ui.separator();
                ui.label(format!("particles = {}", self.sim.positions().len()));
                ui.label(format!("emitters = {}", self.sim.emitter_list().len()));
                if let Some(reading) = self.sim.counter() {
                    ui.label(format!("in radius = {}", reading.count));
                }
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
            });
        });
    }

    /// Builds the right-hand configuration panel bound to the draft config.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Particles");
                ui.add(
                    egui::Slider::new(&mut self.cfg.particle_count, 1..=MAX_PARTICLES)
                        .logarithmic(true)
                        .text("count"),
                );
                ui.add(
                    egui::Slider::new(&mut self.cfg.tick_interval_ms, 0..=500)
                        .text("interval (ms)"),
                );

                ui.separator();
                ui.label("Gravity");
                ui.checkbox(&mut self.cfg.gravity_enabled, "enabled");
                ui.add(
                    egui::Slider::new(&mut self.cfg.gravity_strength, 0.0..=1000.0)
                        .text("strength"),
                );
                egui::ComboBox::from_label("new emitter")
                    .selected_text(self.cfg.emitter_kind.name())
                    .show_ui(ui, |ui| {
                        for kind in [EmitterKind::Attract, EmitterKind::Repel] {
                            ui.selectable_value(&mut self.cfg.emitter_kind, kind, kind.name());
                        }
                    });
                ui.checkbox(&mut self.cfg.show_emitters, "show emitters");

                ui.separator();
                ui.label("Inter-particle");
                ui.checkbox(&mut self.cfg.particle_attract, "attract");
                ui.checkbox(&mut self.cfg.particle_repel, "repel");
                ui.add_enabled(
                    self.cfg.interaction_active(),
                    egui::Slider::new(&mut self.cfg.interaction_strength, 0.0..=500.0)
                        .text("strength"),
                );

                ui.separator();
                ui.label("Counter");
                ui.checkbox(&mut self.cfg.counter_enabled, "enabled");
                ui.add_enabled(
                    self.cfg.counter_enabled,
                    egui::Slider::new(&mut self.cfg.counter_radius, 1..=500).text("radius"),
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = SimConfig {
                        seed: self.cfg.seed,
                        ..SimConfig::default()
                    };
                }
            });

        self.sync_config();
    }

    /// Turns pointer input over the canvas into emitter and counter commands.
    ///
    /// Primary press places an emitter of the selected kind and drags it
    /// until release; secondary press removes the emitter under the pointer.
    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let rect = response.rect;
        let (primary_pressed, primary_released, secondary_pressed, latest) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.secondary_pressed(),
                i.pointer.latest_pos(),
            )
        });

        if let Some(hover) = response.hover_pos() {
            let pos = Self::screen_to_canvas(hover, rect);
            if primary_pressed {
                self.send(Command::PlaceEmitter {
                    kind: self.cfg.emitter_kind,
                    pos,
                });
            } else if secondary_pressed {
                self.send(Command::RemoveEmitter { pos });
            }

            if self.cfg.counter_enabled {
                let moved = self
                    .sim
                    .counter()
                    .is_none_or(|reading| reading.center != pos);
                if moved {
                    self.send(Command::MoveCounter { pos });
                }
            }
        }

        if self.sim.dragging().is_some() {
            if let Some(p) = latest {
                self.send(Command::MoveEmitter {
                    pos: Self::screen_to_canvas(p, rect),
                });
            }
            if primary_released {
                self.send(Command::ReleaseEmitter);
            }
        }
    }

    /// Draws all particles as one mesh of 1×1 px quads.
    fn paint_particles(&self, painter: &egui::Painter, rect: egui::Rect) {
        let positions = self.sim.positions();
        let mut mesh = egui::Mesh::default();
        mesh.reserve_vertices(positions.len() * 4);
        mesh.reserve_triangles(positions.len() * 2);

        let px = egui::vec2(1.0, 1.0);
        for &p in positions {
            let min = Self::canvas_to_screen(p, rect);
            mesh.add_colored_rect(egui::Rect::from_min_size(min, px), egui::Color32::WHITE);
        }
        painter.add(egui::Shape::mesh(mesh));
    }

    /// Draws emitters, dimmed while gravity is disabled.
    fn paint_emitters(&self, painter: &egui::Painter, rect: egui::Rect) {
        if !self.sim.config().show_emitters {
            return;
        }
        let active = self.sim.config().gravity_enabled;

        for e in self.sim.emitters() {
            let color = match (e.kind, active) {
                (EmitterKind::Attract, true) => egui::Color32::from_rgb(255, 0, 0),
                (EmitterKind::Attract, false) => egui::Color32::from_rgb(77, 0, 0),
                (EmitterKind::Repel, true) => egui::Color32::from_rgb(0, 128, 255),
                (EmitterKind::Repel, false) => egui::Color32::from_rgb(0, 51, 102),
            };
            let p = Self::canvas_to_screen(e.pos, rect);
            painter.circle_filled(p, 3.0, color);
            if e.dragged {
                painter.circle_stroke(p, 6.0, egui::Stroke::new(1.0, egui::Color32::WHITE));
            }
        }
    }

    /// Draws the counter circle and its count next to it.
    fn paint_counter(&self, painter: &egui::Painter, rect: egui::Rect) {
        let Some(reading) = self.sim.counter() else {
            return;
        };
        let center = Self::canvas_to_screen(reading.center, rect);
        let green = egui::Color32::from_rgba_unmultiplied(0, 255, 0, 128);
        painter.circle_stroke(center, reading.radius, egui::Stroke::new(1.0, green));
        painter.text(
            center + egui::vec2(reading.radius + 4.0, 0.0),
            egui::Align2::LEFT_CENTER,
            reading.count.to_string(),
            egui::FontId::monospace(12.0),
            egui::Color32::LIGHT_GREEN,
        );
    }

    /// Builds the central panel where the simulation is drawn and driven.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::new().fill(egui::Color32::BLACK);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            self.sync_canvas(rect);
            self.handle_pointer(ctx, &response);

            // Auto-run: the simulation's clock decides whether this frame ticks.
            let now = ctx.input(|i| i.time);
            let report = self.sim.frame(now);

            self.paint_particles(&painter, rect);
            self.paint_emitters(&painter, rect);
            self.paint_counter(&painter, rect);

            if report.wants_repaint {
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(12.0, 30.0), egui::vec2(800.0, 600.0))
    }

    fn seeded() -> SimConfig {
        SimConfig {
            seed: Some(1),
            ..SimConfig::default()
        }
    }

    #[test]
    fn canvas_to_screen_and_back_is_roundtrip() {
        let rect = test_rect();
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(799.0, 599.0),
        ];

        for p in points {
            let screen = Viewer::canvas_to_screen(p, rect);
            let back = Viewer::screen_to_canvas(screen, rect);
            assert!(
                (back - p).length() < 1e-4,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
        assert_eq!(
            Viewer::screen_to_canvas(rect.min, rect),
            Vec2::ZERO,
            "canvas origin is the panel's top-left corner"
        );
    }

    #[test]
    fn sync_config_pushes_draft() {
        let mut viewer = Viewer::new(seeded()).unwrap();

        viewer.cfg.particle_count = 321;
        viewer.cfg.gravity_enabled = true;
        viewer.sync_config();

        assert_eq!(viewer.sim.positions().len(), 321);
        assert!(viewer.sim.config().gravity_enabled);
        assert!(viewer.last_error.is_none());
    }

    #[test]
    fn sync_config_reverts_rejected_draft() {
        let mut viewer = Viewer::new(seeded()).unwrap();

        viewer.cfg.gravity_strength = -1.0;
        viewer.sync_config();

        assert_eq!(viewer.cfg, *viewer.sim.config());
        assert!(viewer.last_error.is_some());
    }

    #[test]
    fn pointer_commands_keep_rejection_visible() {
        let mut viewer = Viewer::new(seeded()).unwrap();

        viewer.cfg.gravity_strength = -1.0;
        viewer.sync_config();
        assert!(viewer.last_error.is_some());

        viewer.send(Command::MoveCounter {
            pos: Vec2::new(10.0, 10.0),
        });
        viewer.send(Command::PlaceEmitter {
            kind: EmitterKind::Attract,
            pos: Vec2::new(20.0, 20.0),
        });
        viewer.send(Command::MoveEmitter {
            pos: Vec2::new(25.0, 20.0),
        });
        assert!(viewer.last_error.is_some());

        viewer.cfg.gravity_strength = 10.0;
        viewer.sync_config();
        assert!(viewer.last_error.is_none());
    }

    #[test]
    fn sync_canvas_resizes_once() {
        let mut viewer = Viewer::new(seeded()).unwrap();
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(320.5, 200.0));

        viewer.sync_canvas(rect);
        assert_eq!(viewer.canvas, (320, 200));
        assert_eq!(viewer.sim.particles().width(), 320);
        assert_eq!(viewer.sim.particles().height(), 200);
        assert!(viewer.sim.positions().iter().all(|p| p.x < 320.0 && p.y < 200.0));

        let before: Vec<Vec2> = viewer.sim.positions().to_vec();
        viewer.sync_canvas(rect);
        assert_eq!(viewer.sim.positions(), before.as_slice());
    }
}
