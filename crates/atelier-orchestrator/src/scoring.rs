//! Phase 7 scoring: coherence, accessibility, sustainability, experience.
//!
//! Thresholds and weights are configurable constants with fixed defaults.
//! Sustainability has no real scoring pass yet and returns a documented
//! neutral baseline rather than a fabricated number.

use atelier_layout::Layout;
use atelier_types::{EventRequest, GeneratedArtifact};
use std::time::Duration;

/// Neutral baseline returned by unscored passes.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Tunables for one orchestrator instance.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Scenes scoring below this coherence get one corrective pass
    pub coherence_threshold: f64,
    /// Hard deadline for a full orchestration
    pub timeout: Duration,
    pub weights: ExperienceWeights,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            coherence_threshold: 80.0,
            timeout: Duration::from_secs(30),
            weights: ExperienceWeights::default(),
        }
    }
}

/// How the experience score blends its inputs. Normalized at use.
#[derive(Clone, Copy, Debug)]
pub struct ExperienceWeights {
    pub authenticity: f64,
    pub accessibility: f64,
    pub budget: f64,
}

impl Default for ExperienceWeights {
    fn default() -> Self {
        Self { authenticity: 0.5, accessibility: 0.3, budget: 0.2 }
    }
}

/// Mean authenticity across the scene's artifacts, 0–100.
pub fn coherence_score(artifacts: &[GeneratedArtifact]) -> f64 {
    if artifacts.is_empty() {
        return 0.0;
    }
    let sum: f64 = artifacts.iter().map(|a| a.metadata.authenticity_score).sum();
    (sum / artifacts.len() as f64).clamp(0.0, 100.0)
}

/// Accessibility score from the computed layout and the request.
///
/// Rewards wide pathways and edge access points; penalizes declared
/// accessibility needs the layout does not evidently serve.
pub fn accessibility_score(request: &EventRequest, layout: &Layout) -> f64 {
    let mut score: f64 = 60.0;
    if layout.pathways.iter().all(|p| p.width_m >= 1.2) && !layout.pathways.is_empty() {
        score += 20.0;
    }
    score += (layout.access_points.len() as f64 * 5.0).min(20.0);
    if request.guests.accessibility_needs > 0 && !request.accessibility_required {
        // Needs were declared but no accommodation was requested
        score -= 15.0;
    }
    score.clamp(0.0, 100.0)
}

/// Sustainability is not scored yet: the neutral baseline is documented
/// output, not a measurement.
pub fn sustainability_score() -> f64 {
    NEUTRAL_SCORE
}

/// Weighted blend of authenticity, accessibility, and budget discipline.
pub fn experience_score(
    weights: &ExperienceWeights,
    coherence: f64,
    accessibility: f64,
    budget_utilization: f64,
) -> f64 {
    let total = weights.authenticity + weights.accessibility + weights.budget;
    if total <= 0.0 {
        return NEUTRAL_SCORE;
    }
    // Full marks for staying at or under budget, linear penalty beyond
    let budget_component = if budget_utilization <= 1.0 {
        100.0
    } else {
        (100.0 - (budget_utilization - 1.0) * 200.0).max(0.0)
    };
    ((weights.authenticity * coherence
        + weights.accessibility * accessibility
        + weights.budget * budget_component)
        / total)
        .clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_types::{
        ArtifactKind, ArtifactMetadata, CultureId, EventType, GeometryNode, SpaceDimensions,
    };

    fn make_artifact(score: f64) -> GeneratedArtifact {
        let mut metadata =
            ArtifactMetadata::new(ArtifactKind::Seating, CultureId::new("japanese"));
        metadata.authenticity_score = score;
        GeneratedArtifact::new(metadata, GeometryNode::group("seating"))
    }

    #[test]
    fn coherence_is_the_mean_of_authenticity() {
        let artifacts = vec![make_artifact(90.0), make_artifact(70.0)];
        assert!((coherence_score(&artifacts) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn empty_scene_scores_zero_coherence() {
        assert_eq!(coherence_score(&[]), 0.0);
    }

    #[test]
    fn over_budget_drags_experience_down() {
        let weights = ExperienceWeights::default();
        let on_budget = experience_score(&weights, 80.0, 80.0, 0.9);
        let over = experience_score(&weights, 80.0, 80.0, 1.4);
        assert!(over < on_budget);
    }

    #[test]
    fn unserved_accessibility_needs_cost_points() {
        let layout = Layout {
            algorithm: atelier_layout::PlacementAlgorithm::RowPacking,
            placements: vec![],
            fall_zones: vec![],
            pathways: vec![],
            access_points: vec![],
        };
        let base = EventRequest::new(
            EventType::CommunityEvent,
            CultureId::new("french"),
            SpaceDimensions::new(20.0, 20.0),
        );
        let mut with_needs = base.clone();
        with_needs.guests.accessibility_needs = 3;
        assert!(accessibility_score(&with_needs, &layout) < accessibility_score(&base, &layout));
    }
}
