//! Composite scenes and the aggregate report attached to them.

use crate::artifact::GeneratedArtifact;
use crate::kind::ArtifactKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note recorded when a non-critical kind failed and was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationNote {
    pub kind: ArtifactKind,
    pub reason: String,
}

/// Aggregate report attached to every composite.
///
/// Score fields are 0–100. `sustainability_score` returns the documented
/// neutral baseline (50) until a real scoring pass lands; it is never an
/// empty placeholder masquerading as a validation result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationReport {
    /// Number of templates successfully instantiated
    pub template_count: usize,
    pub cultural_authenticity: f64,
    pub sustainability_score: f64,
    pub accessibility_score: f64,
    pub experience_score: f64,
    /// Spent budget / total budget, 0.0–1.0
    pub budget_utilization: f64,
    pub generation_time_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cultural_notes: Vec<String>,
    /// Non-critical kinds that failed and were skipped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<DegradationNote>,
}

/// The assembled composite: instantiated artifacts layered in the fixed
/// assembly z-order, each still carrying its own metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositeArtifact {
    pub id: Uuid,
    pub name: String,
    /// Artifacts in assembly order (environment first, interactive last)
    pub layers: Vec<GeneratedArtifact>,
}

impl CompositeArtifact {
    pub fn new(name: impl Into<String>, mut artifacts: Vec<GeneratedArtifact>) -> Self {
        artifacts.sort_by_key(|a| a.metadata.kind.assembly_layer());
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layers: artifacts,
        }
    }

    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.layers.iter().map(|a| a.metadata.kind).collect()
    }

    pub fn artifact_of_kind(&self, kind: ArtifactKind) -> Option<&GeneratedArtifact> {
        self.layers.iter().find(|a| a.metadata.kind == kind)
    }

    pub fn total_components(&self) -> usize {
        self.layers.iter().map(GeneratedArtifact::component_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactMetadata;
    use crate::geometry::GeometryNode;
    use crate::params::CultureId;

    fn make_artifact(kind: ArtifactKind) -> GeneratedArtifact {
        GeneratedArtifact::new(
            ArtifactMetadata::new(kind, CultureId::new("mexican")),
            GeometryNode::group(kind.as_str()),
        )
    }

    #[test]
    fn composite_sorts_layers_by_assembly_order() {
        let composite = CompositeArtifact::new(
            "festival",
            vec![
                make_artifact(ArtifactKind::Floral),
                make_artifact(ArtifactKind::Environment),
                make_artifact(ArtifactKind::Stage),
            ],
        );
        assert_eq!(
            composite.kinds(),
            vec![ArtifactKind::Environment, ArtifactKind::Stage, ArtifactKind::Floral]
        );
    }

    #[test]
    fn artifact_lookup_by_kind() {
        let composite =
            CompositeArtifact::new("scene", vec![make_artifact(ArtifactKind::Lighting)]);
        assert!(composite.artifact_of_kind(ArtifactKind::Lighting).is_some());
        assert!(composite.artifact_of_kind(ArtifactKind::Stage).is_none());
    }
}
