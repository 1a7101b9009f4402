//! The static relationship table between artifact kinds.
//!
//! Filtered per event to the kinds actually selected; `depends-on` edges
//! drive instantiation order in phase 5, every other kind of edge drives a
//! composition-time adjustment in phase 6.

use atelier_types::{
    ArtifactKind, RelationshipAdjustment, RelationshipKind, SpatialConstraint,
    TemplateRelationship, Vec3,
};

/// Every relationship the engine knows about.
///
/// Direction matters: the secondary kind waits for (or is adjusted around)
/// the primary. Tables anchor seating, stages anchor lighting.
pub fn builtin_relationships() -> Vec<TemplateRelationship> {
    vec![
        // Seating is arranged around tables, so tables instantiate first
        TemplateRelationship::new(
            ArtifactKind::Table,
            ArtifactKind::Seating,
            RelationshipKind::DependsOn,
            1.0,
        )
        .with_spatial(SpatialConstraint { min_clearance_m: 0.5, max_distance_m: Some(2.0) }),
        // Roofed structures need the ground plane settled first
        TemplateRelationship::new(
            ArtifactKind::Environment,
            ArtifactKind::Structure,
            RelationshipKind::DependsOn,
            1.0,
        ),
        // Lighting pulls toward the stage and lifts its presence
        TemplateRelationship::new(
            ArtifactKind::Stage,
            ArtifactKind::Lighting,
            RelationshipKind::Enhances,
            0.8,
        )
        .with_adjustment(
            RelationshipAdjustment::offset(Vec3::new(1.5, 0.0, 1.0)).with_scale(1.1),
        ),
        // Centerpieces sit on tables
        TemplateRelationship::new(
            ArtifactKind::Table,
            ArtifactKind::Floral,
            RelationshipKind::Complements,
            0.9,
        )
        .with_adjustment(
            RelationshipAdjustment::offset(Vec3::new(0.0, 0.0, 0.6))
                .with_override("arrangement", "centerpiece"),
        )
        .with_spatial(SpatialConstraint { min_clearance_m: 0.0, max_distance_m: Some(1.0) }),
        // Garlands blend into the stage zone
        TemplateRelationship::new(
            ArtifactKind::Stage,
            ArtifactKind::Floral,
            RelationshipKind::IntegratesWith,
            0.6,
        )
        .with_adjustment(RelationshipAdjustment::offset(Vec3::new(0.0, 0.0, 0.8))),
        // Play equipment and performance areas stay apart
        TemplateRelationship::new(
            ArtifactKind::Stage,
            ArtifactKind::Playground,
            RelationshipKind::ConflictsWith,
            1.0,
        )
        .with_spatial(SpatialConstraint { min_clearance_m: 5.0, max_distance_m: None }),
        // Climate units serve the sheltered zone
        TemplateRelationship::new(
            ArtifactKind::Structure,
            ArtifactKind::Climate,
            RelationshipKind::Complements,
            0.7,
        )
        .with_adjustment(RelationshipAdjustment::offset(Vec3::new(2.0, 0.0, 0.0))),
        // Perimeter barriers ring the environment
        TemplateRelationship::new(
            ArtifactKind::Environment,
            ArtifactKind::Security,
            RelationshipKind::Complements,
            0.5,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_anchors_seating() {
        let table = builtin_relationships();
        let edge = table
            .iter()
            .find(|r| r.kind == RelationshipKind::DependsOn && r.secondary == ArtifactKind::Seating)
            .expect("seating dependency missing");
        assert_eq!(edge.primary, ArtifactKind::Table);
    }

    #[test]
    fn strengths_are_unit_interval() {
        for rel in builtin_relationships() {
            assert!((0.0..=1.0).contains(&rel.strength));
        }
    }

    #[test]
    fn filtering_respects_selection() {
        let selected = [ArtifactKind::Table, ArtifactKind::Seating];
        let applicable: Vec<_> = builtin_relationships()
            .into_iter()
            .filter(|r| r.applies_to(&selected))
            .collect();
        assert_eq!(applicable.len(), 1);
        assert_eq!(applicable[0].kind, RelationshipKind::DependsOn);
    }
}
