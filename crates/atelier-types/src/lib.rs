//! # atelier-types
//!
//! Shared data model for the Atelier cultural parametric design engine.
//!
//! Everything that crosses a crate boundary lives here: culture and artifact
//! identifiers, the generic parameter record callers hand to generators, the
//! geometry tree produced by the template pipeline, material and finish
//! vocabulary, template relationships, and the aggregate report attached to
//! a composite scene.
//!
//! The engine itself performs no I/O; every type in this crate derives
//! `Serialize`/`Deserialize` so an external API layer can move these records
//! across whatever boundary it likes.

pub mod artifact;
pub mod event;
pub mod geometry;
pub mod kind;
pub mod material;
pub mod params;
pub mod relationship;
pub mod report;

pub use artifact::{ArtifactId, ArtifactMetadata, GeneratedArtifact};
pub use event::{BudgetBreakdown, EventRequest, EventType, GuestProfile};
pub use geometry::{
    Dimensions, GeometryNode, PrimitiveShape, StructuralRole, Transform, Vec3,
};
pub use kind::ArtifactKind;
pub use material::{Finish, Material, MaterialAssignment};
pub use params::{
    AdjustmentWarning, AgeGroup, CultureId, ErgonomicProfile, Formality, ParametricParameters,
    SpaceDimensions, Venue,
};
pub use relationship::{
    RelationshipAdjustment, RelationshipKind, SpatialConstraint, TemplateRelationship,
};
pub use report::{CompositeArtifact, DegradationNote, OrchestrationReport};
