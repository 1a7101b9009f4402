//! Template relationships: declared interactions between artifact kinds.
//!
//! The orchestrator filters a static relationship table down to the kinds
//! selected for an event. `depends-on` edges drive instantiation order;
//! every other relationship kind drives a composition-time adjustment.

use crate::geometry::Vec3;
use crate::kind::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How two artifact kinds interact when both are selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// The secondary kind must not instantiate before the primary succeeds
    DependsOn,
    /// The secondary is positioned to serve the primary
    Complements,
    /// The two kinds should be kept apart
    ConflictsWith,
    /// The secondary amplifies the primary (scale/property boost)
    Enhances,
    /// The secondary is blended into the primary's zone
    IntegratesWith,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::DependsOn => "depends-on",
            RelationshipKind::Complements => "complements",
            RelationshipKind::ConflictsWith => "conflicts-with",
            RelationshipKind::Enhances => "enhances",
            RelationshipKind::IntegratesWith => "integrates-with",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spatial constraint attached to a relationship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialConstraint {
    /// Minimum clearance between the two artifacts, metres
    pub min_clearance_m: f64,
    /// Maximum useful distance; beyond this the relationship has no effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance_m: Option<f64>,
}

/// Adjustment deltas applied at composition time, scaled by relationship
/// strength.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipAdjustment {
    /// Offset applied to the secondary artifact's position
    pub position_offset: Vec3,
    /// Multiplicative scale applied to the secondary artifact (1.0 = none)
    pub scale_factor: f64,
    /// Metadata extension overrides applied to the secondary artifact
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub property_overrides: HashMap<String, String>,
}

impl RelationshipAdjustment {
    pub fn none() -> Self {
        Self {
            position_offset: Vec3::ZERO,
            scale_factor: 1.0,
            property_overrides: HashMap::new(),
        }
    }

    pub fn offset(position_offset: Vec3) -> Self {
        Self { position_offset, ..Self::none() }
    }

    pub fn with_scale(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.property_overrides.insert(key.into(), value.into());
        self
    }
}

/// One declared relationship between two artifact kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateRelationship {
    pub primary: ArtifactKind,
    pub secondary: ArtifactKind,
    pub kind: RelationshipKind,
    /// How strongly the adjustment applies, 0.0–1.0
    pub strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialConstraint>,
    /// Cultural condition (culture id) limiting when the relationship applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_constraint: Option<String>,
    /// Material condition limiting when the relationship applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_constraint: Option<String>,
    pub adjustment: RelationshipAdjustment,
}

impl TemplateRelationship {
    pub fn new(
        primary: ArtifactKind,
        secondary: ArtifactKind,
        kind: RelationshipKind,
        strength: f64,
    ) -> Self {
        Self {
            primary,
            secondary,
            kind,
            strength: strength.clamp(0.0, 1.0),
            spatial: None,
            cultural_constraint: None,
            material_constraint: None,
            adjustment: RelationshipAdjustment::none(),
        }
    }

    pub fn with_spatial(mut self, spatial: SpatialConstraint) -> Self {
        self.spatial = Some(spatial);
        self
    }

    pub fn with_adjustment(mut self, adjustment: RelationshipAdjustment) -> Self {
        self.adjustment = adjustment;
        self
    }

    /// Whether both endpoints are within `kinds`.
    pub fn applies_to(&self, kinds: &[ArtifactKind]) -> bool {
        kinds.contains(&self.primary) && kinds.contains(&self.secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_is_clamped_to_unit_interval() {
        let rel = TemplateRelationship::new(
            ArtifactKind::Table,
            ArtifactKind::Seating,
            RelationshipKind::DependsOn,
            1.8,
        );
        assert_eq!(rel.strength, 1.0);
    }

    #[test]
    fn applies_to_requires_both_endpoints() {
        let rel = TemplateRelationship::new(
            ArtifactKind::Table,
            ArtifactKind::Seating,
            RelationshipKind::DependsOn,
            0.9,
        );
        assert!(rel.applies_to(&[ArtifactKind::Table, ArtifactKind::Seating]));
        assert!(!rel.applies_to(&[ArtifactKind::Table, ArtifactKind::Lighting]));
    }

    #[test]
    fn relationship_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&RelationshipKind::DependsOn).unwrap();
        assert_eq!(json, "\"depends-on\"");
    }
}
