use atelier_types::SpaceDimensions;
use thiserror::Error;

/// Errors from the spatial planner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The instances cannot fit in the available space; carries the
    /// computed minimum footprint so the caller can report exactly what
    /// would be needed.
    #[error(
        "insufficient space for layout: requires at least {:.1}m x {:.1}m, available {:.1}m x {:.1}m",
        required.width_m, required.depth_m, available.width_m, available.depth_m
    )]
    InsufficientSpace {
        required: SpaceDimensions,
        available: SpaceDimensions,
    },
}
