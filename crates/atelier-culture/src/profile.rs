//! Cultural profiles: the complete design specification for one culture.

use atelier_types::{ArtifactKind, CultureId, Finish, Material};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Proportion ratios applied on top of a template's base dimensions.
///
/// Ratios are multiplicative (1.0 = the template's base size); the back
/// angle is absolute degrees from vertical.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProportionSet {
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub depth_ratio: f64,
    /// Backrest rake, degrees from vertical
    pub back_angle_deg: f64,
    /// Leg thickness relative to the template's base leg thickness
    pub leg_thickness_ratio: f64,
}

impl ProportionSet {
    pub fn uniform(ratio: f64) -> Self {
        Self {
            width_ratio: ratio,
            height_ratio: ratio,
            depth_ratio: ratio,
            back_angle_deg: 5.0,
            leg_thickness_ratio: ratio,
        }
    }

    /// All multiplicative ratios strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width_ratio > 0.0
            && self.height_ratio > 0.0
            && self.depth_ratio > 0.0
            && self.leg_thickness_ratio > 0.0
            && self.back_angle_deg >= 0.0
    }

    /// Clamp every multiplicative ratio into `[min, max]`.
    pub fn clamped(&self, min: f64, max: f64) -> ProportionSet {
        ProportionSet {
            width_ratio: self.width_ratio.clamp(min, max),
            height_ratio: self.height_ratio.clamp(min, max),
            depth_ratio: self.depth_ratio.clamp(min, max),
            back_angle_deg: self.back_angle_deg,
            leg_thickness_ratio: self.leg_thickness_ratio.clamp(min, max),
        }
    }
}

/// Support styles the seating/table generators can realize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegStyle {
    Tapered,
    Straight,
    Cabriole,
    Turned,
    Pedestal,
    Trestle,
    Splayed,
    Folding,
}

impl LegStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegStyle::Tapered => "tapered",
            LegStyle::Straight => "straight",
            LegStyle::Cabriole => "cabriole",
            LegStyle::Turned => "turned",
            LegStyle::Pedestal => "pedestal",
            LegStyle::Trestle => "trestle",
            LegStyle::Splayed => "splayed",
            LegStyle::Folding => "folding",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackStyle {
    Straight,
    Curved,
    Ladder,
    Slat,
    Carved,
    Open,
}

impl BackStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackStyle::Straight => "straight",
            BackStyle::Curved => "curved",
            BackStyle::Ladder => "ladder",
            BackStyle::Slat => "slat",
            BackStyle::Carved => "carved",
            BackStyle::Open => "open",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStyle {
    Flat,
    Contoured,
    Woven,
    Upholstered,
    Cushioned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    Square,
    Rounded,
    Beveled,
    Ornate,
    LiveEdge,
}

/// The style choices a culture makes for structural elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleElements {
    pub leg_style: LegStyle,
    pub back_style: BackStyle,
    pub seat_style: SeatStyle,
    pub edge_style: EdgeStyle,
}

/// Preferred and traditional material lists plus finishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialPreferences {
    /// First-choice materials for new work
    pub preferred: Vec<Material>,
    /// Historically used materials, acceptable but scored lower
    pub traditional: Vec<Material>,
    pub finishes: Vec<Finish>,
}

impl MaterialPreferences {
    /// Whether a material is culturally appropriate (preferred or
    /// traditional).
    pub fn is_appropriate(&self, material: Material) -> bool {
        self.preferred.contains(&material) || self.traditional.contains(&material)
    }
}

/// How a culture prefers to orient groups of furniture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrientation {
    /// Equal angular spacing around a centroid, facing inward
    Circular,
    /// Equal spacing along one axis
    Linear,
    /// Facing pairs across the culture's social distance
    Conversational,
}

/// Ceremonial and seasonal metadata for a culture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonialContext {
    /// Palette reserved for ceremonial occasions (hex strings)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ceremonial_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasonal_notes: Vec<String>,
    /// Minimum formality the culture expects for ceremonial occasions
    pub minimum_ceremonial_formality: atelier_types::Formality,
}

/// The complete design specification for one culture.
///
/// Immutable once the registry is built; every field is validated at load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CulturalProfile {
    pub culture: CultureId,
    /// Base proportions applied to every kind before kind adaptation
    pub base_proportions: ProportionSet,
    /// Per-kind height adaptation: a culture can size tables very
    /// differently from chairs (e.g. Japanese floor-level tables)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub kind_height_scale: HashMap<ArtifactKind, f64>,
    /// Clamp bounds for every adapted multiplicative ratio
    pub ratio_bounds: (f64, f64),
    pub styles: StyleElements,
    pub materials: MaterialPreferences,
    /// Everyday palette, hex strings
    pub palette: Vec<String>,
    pub ceremonial: CeremonialContext,
    /// Group layout preference consumed by the spatial planner; `None`
    /// falls back to row packing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_orientation: Option<GroupOrientation>,
    /// Comfortable conversation distance, metres
    pub social_distance_m: f64,
    /// The largest capacity a single piece is culturally expected to serve
    pub max_single_piece_capacity: u32,
    /// Names of decorative motifs the culture recognizes as its own
    pub decorative_motifs: Vec<String>,
}

impl CulturalProfile {
    /// Proportions adapted for a specific artifact kind, clamped into the
    /// culture's ratio bounds.
    pub fn proportions_for(&self, kind: ArtifactKind) -> ProportionSet {
        let mut adapted = self.base_proportions;
        if let Some(scale) = self.kind_height_scale.get(&kind) {
            adapted.height_ratio *= scale;
        }
        let (min, max) = self.ratio_bounds;
        adapted.clamped(min, max)
    }

    /// Validation run at registry construction. Returns the offending field
    /// name and message rather than panicking.
    pub fn validate(&self) -> Result<(), (String, String)> {
        if !self.base_proportions.is_valid() {
            return Err((
                "base_proportions".into(),
                "all multiplicative ratios must be strictly positive".into(),
            ));
        }
        let (min, max) = self.ratio_bounds;
        if !(min > 0.0 && max >= min) {
            return Err(("ratio_bounds".into(), format!("invalid bounds ({min}, {max})")));
        }
        if self.materials.preferred.is_empty() {
            return Err(("materials.preferred".into(), "must list at least one material".into()));
        }
        if self.palette.is_empty() {
            return Err(("palette".into(), "must list at least one color".into()));
        }
        if self.social_distance_m <= 0.0 {
            return Err(("social_distance_m".into(), "must be positive".into()));
        }
        if self.max_single_piece_capacity == 0 {
            return Err(("max_single_piece_capacity".into(), "must be at least 1".into()));
        }
        for (kind, scale) in &self.kind_height_scale {
            if *scale <= 0.0 {
                return Err((
                    "kind_height_scale".into(),
                    format!("scale for {kind} must be positive"),
                ));
            }
        }
        Ok(())
    }
}
