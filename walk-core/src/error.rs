use thiserror::Error;

/// Errors reported by the engine's public API.
///
/// The per-tick path never produces these: degenerate geometry is handled
/// by distance floors and skips, and grid indices are clamped. They only
/// surface from explicit lookups and from configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("particle index {index} out of range for {len} particles")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("grid cell {cell} holds no particles")]
    EmptyCell { cell: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
