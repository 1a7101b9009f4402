//! Artifact kinds: the closed set of template families the engine can generate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of artifact kinds.
///
/// One template generator exists per kind; the orchestrator selects a subset
/// per event and assembles the results in a fixed z-order (see
/// [`ArtifactKind::assembly_layer`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Ground plane, zone markers, and venue dressing
    Environment,
    /// Load-bearing builds: pavilions, canopies, arches
    Structure,
    /// Climate mitigation: shade sails, heaters, misters
    Climate,
    /// Perimeter and crowd-control elements
    Security,
    /// Raised performance or ceremony platform
    Stage,
    /// Chairs and benches
    Seating,
    /// Dining and display tables
    Table,
    /// Lanterns, string lights, uplights
    Lighting,
    /// Floral and celebratory decor props
    Floral,
    /// Play equipment: slides, swings, climbers
    Playground,
}

impl ArtifactKind {
    /// All kinds, in declaration order.
    pub const ALL: [ArtifactKind; 10] = [
        ArtifactKind::Environment,
        ArtifactKind::Structure,
        ArtifactKind::Climate,
        ArtifactKind::Security,
        ArtifactKind::Stage,
        ArtifactKind::Seating,
        ArtifactKind::Table,
        ArtifactKind::Lighting,
        ArtifactKind::Floral,
        ArtifactKind::Playground,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Environment => "environment",
            ArtifactKind::Structure => "structure",
            ArtifactKind::Climate => "climate",
            ArtifactKind::Security => "security",
            ArtifactKind::Stage => "stage",
            ArtifactKind::Seating => "seating",
            ArtifactKind::Table => "table",
            ArtifactKind::Lighting => "lighting",
            ArtifactKind::Floral => "floral",
            ArtifactKind::Playground => "playground",
        }
    }

    /// Fixed assembly z-order: environment first, interactive equipment last.
    ///
    /// Seating and Table share the furniture layer; relative order within a
    /// layer follows instantiation order.
    pub fn assembly_layer(&self) -> u8 {
        match self {
            ArtifactKind::Environment => 0,
            ArtifactKind::Structure => 1,
            ArtifactKind::Climate => 2,
            ArtifactKind::Security => 3,
            ArtifactKind::Stage => 4,
            ArtifactKind::Seating | ArtifactKind::Table => 5,
            ArtifactKind::Lighting => 6,
            ArtifactKind::Floral => 7,
            ArtifactKind::Playground => 8,
        }
    }

    /// Whether this kind places equipment with a fall zone around it.
    pub fn has_fall_zone(&self) -> bool {
        matches!(self, ArtifactKind::Playground)
    }

    /// Base bounding dimensions (metres) for an adult, casual, average-build
    /// instance of this kind. Cultural ratios, age, ergonomics, and
    /// formality all multiply on top of these.
    pub fn base_dimensions(&self) -> crate::geometry::Dimensions {
        use crate::geometry::Dimensions;
        match self {
            ArtifactKind::Environment => Dimensions::new(10.0, 0.05, 10.0),
            ArtifactKind::Structure => Dimensions::new(6.0, 3.2, 6.0),
            ArtifactKind::Climate => Dimensions::new(4.0, 2.8, 4.0),
            ArtifactKind::Security => Dimensions::new(1.2, 1.1, 0.1),
            ArtifactKind::Stage => Dimensions::new(6.0, 0.6, 4.0),
            ArtifactKind::Seating => Dimensions::new(0.45, 0.85, 0.45),
            ArtifactKind::Table => Dimensions::new(1.6, 0.75, 0.9),
            ArtifactKind::Lighting => Dimensions::new(0.3, 1.8, 0.3),
            ArtifactKind::Floral => Dimensions::new(0.5, 1.2, 0.5),
            ArtifactKind::Playground => Dimensions::new(3.0, 2.4, 3.0),
        }
    }

    /// Base height of the primary working surface, where the kind has one.
    ///
    /// Seat height for seating, tabletop height for tables, deck height for
    /// stages and play platforms.
    pub fn base_surface_height(&self) -> Option<f64> {
        match self {
            ArtifactKind::Seating => Some(0.45),
            ArtifactKind::Table => Some(0.75),
            ArtifactKind::Stage => Some(0.6),
            ArtifactKind::Playground => Some(1.2),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
