//! Application entry point for the random-walk gravity viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use log::{info, warn};
use std::{error::Error, path::Path};
use viewer::Viewer;
use walk_core::config::SimConfig;

/// Reads and validates a JSON configuration file.
///
/// Missing fields take their [`SimConfig::default`] values.
fn load_config(path: &Path) -> Result<SimConfig, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let cfg: SimConfig = serde_json::from_str(&text)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Starts the native eframe application.
///
/// An optional first argument names a JSON config file. If it cannot be
/// read or is invalid, a warning is logged and defaults are used.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => match load_config(Path::new(&path)) {
            Ok(cfg) => {
                info!("loaded config from {path}");
                cfg
            }
            Err(e) => {
                warn!("ignoring config {path}: {e}");
                SimConfig::default()
            }
        },
        None => SimConfig::default(),
    };

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Random Walk Gravity",
        options,
        Box::new(move |_cc| {
            // Construct the root app state for the viewer.
            Ok(Box::new(Viewer::new(cfg)?))
        }),
    )
}
