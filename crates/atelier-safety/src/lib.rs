//! # atelier-safety
//!
//! The safety and constraint registry: immutable per-age-group /
//! per-equipment limit tables, exhaustive safety validation, and the
//! minimum-space arithmetic the spatial planner and orchestrator build on.
//!
//! Validation never fails fast: every check runs and every violation is
//! collected, so a caller can present one complete remediation list.

pub mod limits;
pub mod registry;
pub mod validate;

pub use limits::{AgeGroupLimits, EquipmentKind, SafetyConstraintSet, UnknownEquipment};
pub use registry::SafetyRegistry;
pub use validate::{
    calculate_minimum_space, validate_safety_requirements, EquipmentSpec, SafetyParameters,
    SafetyReport, SafetyViolation, ViolationCode,
};
