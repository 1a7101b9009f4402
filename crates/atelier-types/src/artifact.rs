//! Generated artifacts: geometry tree + fixed-schema metadata.

use crate::geometry::GeometryNode;
use crate::kind::ArtifactKind;
use crate::params::{AdjustmentWarning, CultureId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one generated artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-schema metadata attached to every generated artifact.
///
/// Kind-specific values go into the `extensions` map rather than loosening
/// the schema; the orchestrator and report layer only ever read the typed
/// fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: ArtifactId,
    pub kind: ArtifactKind,
    pub culture: CultureId,
    /// How well the artifact matches its culture's profile, 0–100
    pub authenticity_score: f64,
    /// Whether the artifact passed safety validation
    pub safety_compliant: bool,
    pub generated_at: DateTime<Utc>,
    /// Kind-specific extension values (e.g. `"seat_height" -> "0.44"`)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, String>,
}

impl ArtifactMetadata {
    pub fn new(kind: ArtifactKind, culture: CultureId) -> Self {
        Self {
            id: ArtifactId::new(),
            kind,
            culture,
            authenticity_score: 0.0,
            safety_compliant: false,
            generated_at: Utc::now(),
            extensions: HashMap::new(),
        }
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }
}

/// A generated artifact: the geometry tree plus its metadata and any
/// adjustment warnings recorded during generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub metadata: ArtifactMetadata,
    pub root: GeometryNode,
    /// Stage-2 adjustments recorded during generation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AdjustmentWarning>,
    /// Estimated cost in the caller's currency unit
    pub estimated_cost: f64,
}

impl GeneratedArtifact {
    pub fn new(metadata: ArtifactMetadata, root: GeometryNode) -> Self {
        Self {
            metadata,
            root,
            warnings: Vec::new(),
            estimated_cost: 0.0,
        }
    }

    pub fn component_count(&self) -> usize {
        self.root.component_count()
    }

    pub fn decorative_count(&self) -> usize {
        self.root.decorative_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryNode;

    #[test]
    fn artifact_ids_are_unique() {
        assert_ne!(ArtifactId::new(), ArtifactId::new());
    }

    #[test]
    fn metadata_extensions_round_trip() {
        let meta = ArtifactMetadata::new(ArtifactKind::Table, CultureId::new("moroccan"))
            .with_extension("surface_height", "0.35");
        assert_eq!(meta.extensions.get("surface_height").map(String::as_str), Some("0.35"));
    }

    #[test]
    fn artifact_delegates_counts_to_tree() {
        let meta = ArtifactMetadata::new(ArtifactKind::Seating, CultureId::new("japanese"));
        let artifact = GeneratedArtifact::new(meta, GeometryNode::group("empty"));
        assert_eq!(artifact.component_count(), 0);
    }
}
