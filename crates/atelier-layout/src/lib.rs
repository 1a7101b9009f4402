//! # atelier-layout
//!
//! The spatial planner. Turns a list of selected instances plus the
//! available space and the event's cultural profile into concrete positions
//! and rotations, derived pathways, and accessibility access points.
//!
//! Placement algorithm selection follows the culture's group-orientation
//! preference (circular, linear, or conversational) with deterministic
//! row packing as the fallback when no preference applies. Fall-zone circles
//! never overlap and every instance stays inside the available space; a
//! setup that cannot fit fails with the computed minimum footprint.

pub mod error;
pub mod planner;

pub use error::LayoutError;
pub use planner::{
    compute_layout, FallZone, Layout, Pathway, Placement, PlacementAlgorithm,
    PlacementInstance,
};
