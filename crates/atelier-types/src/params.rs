//! Generic parameter records: the caller-owned input to every template generator.

use crate::kind::ArtifactKind;
use crate::material::Material;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier for a culture in the knowledge base (e.g. `"japanese"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CultureId(String);

impl CultureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CultureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target age group for an artifact.
///
/// The ranges mirror the safety tables: equipment limits are keyed by these
/// groups, and the toddler band carries the strictest ceilings.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Ages 2–5
    Toddler,
    /// Ages 6–12
    Child,
    /// Ages 13–17
    Teen,
    /// 18+
    Adult,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Toddler => "2-5",
            AgeGroup::Child => "6-12",
            AgeGroup::Teen => "13-17",
            AgeGroup::Adult => "adult",
        }
    }

    /// Dimension scale relative to adult sizing.
    pub fn size_factor(&self) -> f64 {
        match self {
            AgeGroup::Toddler => 0.55,
            AgeGroup::Child => 0.75,
            AgeGroup::Teen => 0.9,
            AgeGroup::Adult => 1.0,
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied size/accessibility class used to scale dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErgonomicProfile {
    Petite,
    #[default]
    Average,
    Tall,
    /// Wheelchair-accessible sizing: wider clearances, lower work surfaces
    Accessible,
}

impl ErgonomicProfile {
    /// Height scale applied on top of the age-group factor.
    pub fn height_factor(&self) -> f64 {
        match self {
            ErgonomicProfile::Petite => 0.92,
            ErgonomicProfile::Average => 1.0,
            ErgonomicProfile::Tall => 1.08,
            ErgonomicProfile::Accessible => 0.95,
        }
    }

    /// Width scale; accessible sizing widens clearances.
    pub fn width_factor(&self) -> f64 {
        match self {
            ErgonomicProfile::Accessible => 1.25,
            _ => 1.0,
        }
    }
}

/// Occasion formality, ordered from least to most formal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    #[default]
    Casual,
    SemiFormal,
    Formal,
    Ceremonial,
}

impl Formality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formality::Casual => "casual",
            Formality::SemiFormal => "semi_formal",
            Formality::Formal => "formal",
            Formality::Ceremonial => "ceremonial",
        }
    }

    /// Dimension adjustment for the occasion: ceremonial pieces sit taller
    /// and broader than casual ones.
    pub fn dimension_adjustment(&self) -> f64 {
        match self {
            Formality::Casual => 1.0,
            Formality::SemiFormal => 1.02,
            Formality::Formal => 1.05,
            Formality::Ceremonial => 1.1,
        }
    }
}

/// Venue class; outdoor venues trigger climate and structure templates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    #[default]
    Indoor,
    Outdoor,
}

/// Available floor space, metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceDimensions {
    pub width_m: f64,
    pub depth_m: f64,
}

impl SpaceDimensions {
    pub fn new(width_m: f64, depth_m: f64) -> Self {
        Self { width_m, depth_m }
    }

    pub fn area_m2(&self) -> f64 {
        self.width_m * self.depth_m
    }

    /// Whether `required` fits inside this space in either orientation.
    pub fn fits(&self, required: &SpaceDimensions) -> bool {
        (self.width_m >= required.width_m && self.depth_m >= required.depth_m)
            || (self.width_m >= required.depth_m && self.depth_m >= required.width_m)
    }
}

/// The generic parameter record a caller hands to a template generator.
///
/// Owned by the caller and read-only to the engine; generators derive their
/// specialized parameter sets from this plus the cultural profile, never by
/// mutating it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParametricParameters {
    /// Artifact kind to generate
    pub kind: ArtifactKind,
    /// Culture driving proportions, styles, and materials
    pub culture: CultureId,
    /// Target age group
    pub target_age: AgeGroup,
    /// Size/accessibility class
    pub ergonomic_profile: ErgonomicProfile,
    /// Occasion formality
    pub formality: Formality,
    /// Number of people the artifact serves
    pub capacity: u32,
    /// Explicit dimension override (width, height, depth in metres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_override: Option<crate::geometry::Dimensions>,
    /// Caller-chosen primary material; generators fall back to the culture's
    /// preferred list when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    /// Caller-chosen palette (hex strings); empty means use the culture's
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_palette: Vec<String>,
    /// How many ornamental sub-parts to attach, 0.0–1.0
    pub decorative_intensity: f64,
    /// Safety standard the artifact must satisfy (e.g. `"ASTM-F1487"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_standard: Option<String>,
    /// Venue class
    pub venue: Venue,
    /// Seed for decorative jitter; identical seeds yield identical geometry
    pub jitter_seed: u64,
    /// Kind-specific extras (e.g. `"equipment" -> "slide,swing"`)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extras: HashMap<String, String>,
}

impl ParametricParameters {
    /// Create a parameter record with neutral defaults for everything the
    /// caller left unspecified.
    pub fn new(kind: ArtifactKind, culture: CultureId) -> Self {
        Self {
            kind,
            culture,
            target_age: AgeGroup::Adult,
            ergonomic_profile: ErgonomicProfile::Average,
            formality: Formality::Casual,
            capacity: 1,
            dimension_override: None,
            material: None,
            color_palette: Vec::new(),
            decorative_intensity: 0.5,
            safety_standard: None,
            venue: Venue::Indoor,
            jitter_seed: 0,
            extras: HashMap::new(),
        }
    }

    pub fn with_target_age(mut self, age: AgeGroup) -> Self {
        self.target_age = age;
        self
    }

    pub fn with_ergonomic_profile(mut self, profile: ErgonomicProfile) -> Self {
        self.ergonomic_profile = profile;
        self
    }

    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = formality;
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_decorative_intensity(mut self, intensity: f64) -> Self {
        self.decorative_intensity = intensity.clamp(0.0, 1.0);
        self
    }

    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.venue = venue;
        self
    }

    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = seed;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

/// A recorded stage-2 adjustment: the pipeline never silently overrides a
/// caller's choice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentWarning {
    /// Which parameter was adjusted
    pub field: String,
    /// The caller's original value, rendered
    pub original: String,
    /// The value actually used
    pub adjusted: String,
    /// Why the adjustment was required
    pub reason: String,
}

impl AdjustmentWarning {
    pub fn new(
        field: impl Into<String>,
        original: impl fmt::Display,
        adjusted: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            original: original.to_string(),
            adjusted: adjusted.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn culture_id_normalizes_case() {
        assert_eq!(CultureId::new("Japanese").as_str(), "japanese");
    }

    #[test]
    fn age_groups_scale_up_with_age() {
        assert!(AgeGroup::Toddler.size_factor() < AgeGroup::Child.size_factor());
        assert!(AgeGroup::Child.size_factor() < AgeGroup::Teen.size_factor());
        assert_eq!(AgeGroup::Adult.size_factor(), 1.0);
    }

    #[test]
    fn formality_ordering_matches_adjustment() {
        assert!(Formality::Casual < Formality::Ceremonial);
        assert!(
            Formality::Casual.dimension_adjustment()
                < Formality::Ceremonial.dimension_adjustment()
        );
    }

    #[test]
    fn decorative_intensity_is_clamped() {
        let params = ParametricParameters::new(
            ArtifactKind::Seating,
            CultureId::new("japanese"),
        )
        .with_decorative_intensity(1.7);
        assert_eq!(params.decorative_intensity, 1.0);
    }

    #[test]
    fn space_fits_in_either_orientation() {
        let space = SpaceDimensions::new(10.0, 6.0);
        assert!(space.fits(&SpaceDimensions::new(6.0, 10.0)));
        assert!(!space.fits(&SpaceDimensions::new(11.0, 2.0)));
    }

    #[test]
    fn accessible_profile_widens_clearances() {
        assert!(ErgonomicProfile::Accessible.width_factor() > 1.0);
        assert_eq!(ErgonomicProfile::Average.width_factor(), 1.0);
    }
}
