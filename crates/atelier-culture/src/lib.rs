//! # atelier-culture
//!
//! The cultural knowledge base: per-culture profiles (proportion ratios,
//! style elements, material preferences, palettes, ceremonial metadata), a
//! registry with an explicit build-once lifecycle, kind-aware proportion
//! adaptation, and authenticity scoring.
//!
//! ## Lifecycle
//!
//! Profiles are literal data, assembled by the canonical constructor
//! functions in [`canonical`] and validated when [`CultureRegistry::builtin`]
//! builds the registry. After construction the registry is immutable and is
//! shared behind an `Arc` by generators and the orchestrator; there is no
//! ambient global table.

pub mod authenticity;
pub mod canonical;
pub mod error;
pub mod profile;
pub mod registry;

pub use authenticity::{AuthenticityScorer, AuthenticityWeights, NEUTRAL_BASELINE};
pub use error::CultureError;
pub use profile::{
    BackStyle, CeremonialContext, CulturalProfile, EdgeStyle, GroupOrientation, LegStyle,
    MaterialPreferences, ProportionSet, SeatStyle, StyleElements,
};
pub use registry::CultureRegistry;
