//! Authenticity scoring: how well a generated artifact matches its declared
//! culture's profile.
//!
//! The score is a weighted sum of five sub-scores (proportion, material,
//! aesthetic, decorative, construction), each in [0, 100]. The weights are
//! configurable constants with fixed defaults.

use crate::profile::CulturalProfile;
use atelier_types::{GeneratedArtifact, ParametricParameters, StructuralRole};

/// Neutral sub-score used whenever an input is empty or minimal; keeps the
/// final score inside [0, 100] even for bare artifacts.
pub const NEUTRAL_BASELINE: f64 = 50.0;

/// Weights for the five authenticity sub-scores. Normalized at use, so they
/// need not sum to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthenticityWeights {
    pub proportion: f64,
    pub material: f64,
    pub aesthetic: f64,
    pub decorative: f64,
    pub construction: f64,
}

impl Default for AuthenticityWeights {
    fn default() -> Self {
        Self {
            proportion: 0.25,
            material: 0.25,
            aesthetic: 0.20,
            decorative: 0.15,
            construction: 0.15,
        }
    }
}

impl AuthenticityWeights {
    fn total(&self) -> f64 {
        self.proportion + self.material + self.aesthetic + self.decorative + self.construction
    }
}

/// Scores artifacts against cultural profiles.
#[derive(Clone, Debug, Default)]
pub struct AuthenticityScorer {
    weights: AuthenticityWeights,
}

impl AuthenticityScorer {
    pub fn new(weights: AuthenticityWeights) -> Self {
        Self { weights }
    }

    /// Weighted authenticity score in [0, 100].
    ///
    /// Always in range, including for artifacts with no materials, no
    /// ornaments, and no recorded styles; missing evidence scores the
    /// neutral baseline rather than zero.
    pub fn score(
        &self,
        params: &ParametricParameters,
        artifact: &GeneratedArtifact,
        profile: &CulturalProfile,
    ) -> f64 {
        let w = self.weights;
        let total = w.total();
        if total <= 0.0 {
            return NEUTRAL_BASELINE;
        }

        let weighted = w.proportion * self.proportion_score(params, artifact, profile)
            + w.material * self.material_score(artifact, profile)
            + w.aesthetic * self.aesthetic_score(params, profile)
            + w.decorative * self.decorative_score(params, artifact, profile)
            + w.construction * self.construction_score(artifact, profile);

        (weighted / total).clamp(0.0, 100.0)
    }

    /// Compare the primary surface height against the culture-adapted
    /// expectation for the kind.
    fn proportion_score(
        &self,
        params: &ParametricParameters,
        artifact: &GeneratedArtifact,
        profile: &CulturalProfile,
    ) -> f64 {
        let Some(base_height) = params.kind.base_surface_height() else {
            return NEUTRAL_BASELINE;
        };
        let Some(measured) = surface_height(artifact) else {
            return NEUTRAL_BASELINE;
        };
        let ratios = profile.proportions_for(params.kind);
        let expected = base_height * ratios.height_ratio;
        if expected <= 0.0 {
            return NEUTRAL_BASELINE;
        }
        // Formality and age scaling make exact agreement unlikely; tolerate
        // up to 50% relative error before bottoming out.
        let relative_error = ((measured - expected) / expected).abs();
        (100.0 * (1.0 - (relative_error * 2.0).min(1.0))).max(0.0)
    }

    /// Fraction of assigned materials drawn from the culture's lists.
    /// Preferred materials score full, traditional score lower, and
    /// out-of-list materials are penalized.
    fn material_score(&self, artifact: &GeneratedArtifact, profile: &CulturalProfile) -> f64 {
        let mut scored = 0.0;
        let mut count = 0u32;
        collect_material_scores(&artifact.root, profile, &mut scored, &mut count);
        if count == 0 {
            NEUTRAL_BASELINE
        } else {
            scored / f64::from(count)
        }
    }

    /// Palette agreement between the caller's colors and the culture's
    /// everyday + ceremonial palettes.
    fn aesthetic_score(&self, params: &ParametricParameters, profile: &CulturalProfile) -> f64 {
        if params.color_palette.is_empty() {
            // Caller deferred to the culture's own palette
            return 70.0;
        }
        let known: Vec<&str> = profile
            .palette
            .iter()
            .chain(profile.ceremonial.ceremonial_colors.iter())
            .map(String::as_str)
            .collect();
        let matching = params
            .color_palette
            .iter()
            .filter(|c| known.iter().any(|k| k.eq_ignore_ascii_case(c)))
            .count();
        let fraction = matching as f64 / params.color_palette.len() as f64;
        40.0 + 60.0 * fraction
    }

    /// Presence of culturally tagged ornaments relative to the requested
    /// decorative intensity.
    fn decorative_score(
        &self,
        params: &ParametricParameters,
        artifact: &GeneratedArtifact,
        profile: &CulturalProfile,
    ) -> f64 {
        let ornaments = artifact.decorative_count();
        let expected = params.decorative_intensity >= 0.3 && !profile.decorative_motifs.is_empty();
        match (expected, ornaments) {
            (true, 0) => 25.0,
            (true, n) => (60.0 + 10.0 * n as f64).min(100.0),
            (false, 0) => 85.0,
            (false, _) => 60.0,
        }
    }

    /// Agreement between the artifact's recorded leg/back styles and the
    /// culture's style choices.
    fn construction_score(&self, artifact: &GeneratedArtifact, profile: &CulturalProfile) -> f64 {
        let ext = &artifact.metadata.extensions;
        let leg = ext.get("leg_style").map(String::as_str);
        let back = ext.get("back_style").map(String::as_str);
        if leg.is_none() && back.is_none() {
            return NEUTRAL_BASELINE;
        }
        let mut matches = 0;
        let mut checked = 0;
        if let Some(leg) = leg {
            checked += 1;
            if leg == profile.styles.leg_style.as_str() {
                matches += 1;
            }
        }
        if let Some(back) = back {
            checked += 1;
            if back == profile.styles.back_style.as_str() {
                matches += 1;
            }
        }
        match (matches, checked) {
            (0, _) => 30.0,
            (m, c) if m == c => 100.0,
            _ => 65.0,
        }
    }
}

/// Height of the first surface-role primitive, read from its placement.
fn surface_height(artifact: &GeneratedArtifact) -> Option<f64> {
    find_surface_y(&artifact.root)
}

fn collect_material_scores(
    node: &atelier_types::GeometryNode,
    profile: &CulturalProfile,
    scored: &mut f64,
    count: &mut u32,
) {
    use atelier_types::GeometryNode;
    match node {
        GeometryNode::Primitive { material: Some(assignment), .. } => {
            *count += 1;
            *scored += if profile.materials.preferred.contains(&assignment.material) {
                100.0
            } else if profile.materials.traditional.contains(&assignment.material) {
                75.0
            } else {
                25.0
            };
        }
        GeometryNode::Primitive { material: None, .. } => {}
        GeometryNode::Group { children, .. } => {
            for child in children {
                collect_material_scores(child, profile, scored, count);
            }
        }
    }
}

fn find_surface_y(node: &atelier_types::GeometryNode) -> Option<f64> {
    use atelier_types::GeometryNode;
    match node {
        GeometryNode::Primitive { role, transform, .. } => {
            (*role == StructuralRole::Surface).then_some(transform.position.y)
        }
        GeometryNode::Group { children, .. } => children.iter().find_map(find_surface_y),
    }
}
