//! Biased random-walk particle engine on a 2-D canvas.
//!
//! Main components:
//! - [`particles`]: the flat particle position buffer.
//! - [`grid`]: uniform bucket grid aggregating count and centroid per cell.
//! - [`gravity`]: user-placed attract/repel emitters and their bias.
//! - [`interaction`]: inter-particle bias from grid cell aggregates.
//! - [`weights`]: eight-way direction weights and weighted sampling.
//! - [`phases`]: the per-tick pipeline (aggregate, then step).
//! - [`clock`]: run/pause state and the minimum tick interval.
//! - [`counter`]: particle count inside a pointer-following circle.
//! - [`engine`]: [`engine::Simulation`] and its [`engine::Command`] API.
//! - [`config`]: runtime configuration and design constants.
//! - [`error`]: the crate's error type.
//! - [`types`]: shared ids and the [`types::Direction`] table.

pub mod clock;
pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod gravity;
pub mod grid;
pub mod interaction;
pub mod particles;
pub mod phases;
pub mod types;
pub mod weights;
