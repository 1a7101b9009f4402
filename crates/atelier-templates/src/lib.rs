//! # atelier-templates
//!
//! The template generator family. One generator exists per artifact kind,
//! all implementing the same five-stage pure pipeline:
//!
//! 1. **convert**: map the generic parameter record into the generator's
//!    specialized parameter set, deriving cultural defaults for anything the
//!    caller left unspecified
//! 2. **validate_and_adjust**: safety-driven overrides with recorded
//!    warnings, capacity clamping, formality raising
//! 3. **calculate_dimensions**: base size x age/ergonomic/formality
//!    adjustment x cultural ratio set, styles resolved by per-culture lookup
//! 4. **generate_geometry**: primary surface + style-specific support
//!    structure + accessories + ornaments gated by decorative intensity
//! 5. **apply_materials**: material/finish per structural role, accent
//!    materials on decorative sub-parts
//!
//! Every stage returns a new value; no stage mutates shared state. Given
//! identical inputs and the same jitter seed, a generator produces identical
//! dimension sets and component counts.
//!
//! Dispatch over kinds is a lookup table ([`GeneratorRegistry`]) of
//! [`ArtifactGenerator`] trait objects: a closed set of variants behind one
//! contract, not an inheritance tree.

pub mod error;
pub mod jitter;
pub mod pipeline;
pub mod registry;

mod climate;
mod environment;
mod floral;
mod lighting;
mod playground;
mod seating;
mod security;
mod stage;
mod structure;
mod table;

pub use climate::ClimateGenerator;
pub use environment::EnvironmentGenerator;
pub use error::GeneratorError;
pub use floral::FloralGenerator;
pub use jitter::DecorativeJitter;
pub use lighting::LightingGenerator;
pub use pipeline::{
    Adjusted, ArtifactGenerator, DimensionSet, GeneratorContext, TemplatePipeline,
};
pub use playground::PlaygroundGenerator;
pub use registry::GeneratorRegistry;
pub use seating::SeatingGenerator;
pub use security::SecurityGenerator;
pub use stage::StageGenerator;
pub use structure::StructureGenerator;
pub use table::TableGenerator;

/// Ornaments are attached only at or above this decorative intensity.
pub const DECORATIVE_THRESHOLD: f64 = 0.3;
