//! Canonical culture profiles.
//!
//! These are the built-in literal data tables. Each constructor returns a
//! complete [`CulturalProfile`]; the registry validates every one at build
//! time, so a profile missing a required sub-field fails construction
//! instead of surfacing mid-generation.

use crate::profile::{
    BackStyle, CeremonialContext, CulturalProfile, EdgeStyle, GroupOrientation, LegStyle,
    MaterialPreferences, ProportionSet, SeatStyle, StyleElements,
};
use atelier_types::{ArtifactKind, CultureId, Finish, Formality, Material};
use std::collections::HashMap;

/// Japanese profile: restrained proportions, low tables, natural finishes.
pub fn japanese_profile() -> CulturalProfile {
    CulturalProfile {
        culture: CultureId::new("japanese"),
        base_proportions: ProportionSet {
            width_ratio: 0.95,
            height_ratio: 0.89,
            depth_ratio: 0.95,
            back_angle_deg: 3.0,
            leg_thickness_ratio: 0.8,
        },
        // Chabudai-height tables: roughly half of western table height
        kind_height_scale: HashMap::from([
            (ArtifactKind::Table, 0.52),
            (ArtifactKind::Lighting, 1.1),
        ]),
        ratio_bounds: (0.35, 1.6),
        styles: StyleElements {
            leg_style: LegStyle::Tapered,
            back_style: BackStyle::Straight,
            seat_style: SeatStyle::Flat,
            edge_style: EdgeStyle::Square,
        },
        materials: MaterialPreferences {
            preferred: vec![Material::Cedar, Material::Bamboo, Material::Walnut],
            traditional: vec![Material::Paper, Material::Oak],
            finishes: vec![Finish::Natural, Finish::Lacquered, Finish::Oiled],
        },
        palette: vec![
            "#2B2B2B".into(),
            "#E34234".into(),
            "#F5F0E6".into(),
            "#4A6B4F".into(),
        ],
        ceremonial: CeremonialContext {
            ceremonial_colors: vec!["#E34234".into(), "#D4AF37".into(), "#FFFFFF".into()],
            seasonal_notes: vec![
                "sakura motifs in spring".into(),
                "momiji motifs in autumn".into(),
            ],
            minimum_ceremonial_formality: Formality::Formal,
        },
        group_orientation: Some(GroupOrientation::Linear),
        social_distance_m: 1.2,
        max_single_piece_capacity: 8,
        decorative_motifs: vec!["asanoha".into(), "seigaiha".into(), "sakura".into()],
    }
}

/// Scandinavian profile: light woods, clean lines, conversational grouping.
pub fn scandinavian_profile() -> CulturalProfile {
    CulturalProfile {
        culture: CultureId::new("scandinavian"),
        base_proportions: ProportionSet {
            width_ratio: 1.0,
            height_ratio: 1.0,
            depth_ratio: 1.0,
            back_angle_deg: 8.0,
            leg_thickness_ratio: 0.7,
        },
        kind_height_scale: HashMap::from([(ArtifactKind::Lighting, 0.9)]),
        ratio_bounds: (0.45, 1.7),
        styles: StyleElements {
            leg_style: LegStyle::Splayed,
            back_style: BackStyle::Curved,
            seat_style: SeatStyle::Contoured,
            edge_style: EdgeStyle::Rounded,
        },
        materials: MaterialPreferences {
            preferred: vec![Material::Pine, Material::Oak, Material::Fabric],
            traditional: vec![Material::Leather, Material::Walnut],
            finishes: vec![Finish::Oiled, Finish::Waxed, Finish::Natural],
        },
        palette: vec![
            "#F8F4EC".into(),
            "#C9D3CE".into(),
            "#6E7F73".into(),
            "#2E3532".into(),
        ],
        ceremonial: CeremonialContext {
            ceremonial_colors: vec!["#FFFFFF".into(), "#A3B9C9".into()],
            seasonal_notes: vec!["candle-heavy midwinter decor".into()],
            minimum_ceremonial_formality: Formality::SemiFormal,
        },
        group_orientation: Some(GroupOrientation::Conversational),
        social_distance_m: 1.5,
        max_single_piece_capacity: 10,
        decorative_motifs: vec!["eight-petal rose".into(), "runic band".into()],
    }
}

/// Moroccan profile: low circular seating, carved cedar, saturated palettes.
pub fn moroccan_profile() -> CulturalProfile {
    CulturalProfile {
        culture: CultureId::new("moroccan"),
        base_proportions: ProportionSet {
            width_ratio: 1.05,
            height_ratio: 0.8,
            depth_ratio: 1.1,
            back_angle_deg: 12.0,
            leg_thickness_ratio: 1.1,
        },
        kind_height_scale: HashMap::from([
            (ArtifactKind::Table, 0.6),
            (ArtifactKind::Seating, 0.75),
        ]),
        ratio_bounds: (0.3, 1.8),
        styles: StyleElements {
            leg_style: LegStyle::Turned,
            back_style: BackStyle::Carved,
            seat_style: SeatStyle::Cushioned,
            edge_style: EdgeStyle::Ornate,
        },
        materials: MaterialPreferences {
            preferred: vec![Material::Cedar, Material::Brass, Material::Fabric],
            traditional: vec![Material::Ceramic, Material::Leather, Material::WroughtIron],
            finishes: vec![Finish::Stained, Finish::Painted, Finish::Gilded],
        },
        palette: vec![
            "#B0413E".into(),
            "#0F4C5C".into(),
            "#E3B23C".into(),
            "#7A4E2D".into(),
        ],
        ceremonial: CeremonialContext {
            ceremonial_colors: vec!["#D4AF37".into(), "#B0413E".into()],
            seasonal_notes: vec!["lantern-dense evening settings".into()],
            minimum_ceremonial_formality: Formality::Formal,
        },
        group_orientation: Some(GroupOrientation::Circular),
        social_distance_m: 0.9,
        max_single_piece_capacity: 12,
        decorative_motifs: vec!["zellige".into(), "arabesque".into(), "khamsa".into()],
    }
}

/// Mexican profile: robust pine builds, vivid palettes, circular gathering.
pub fn mexican_profile() -> CulturalProfile {
    CulturalProfile {
        culture: CultureId::new("mexican"),
        base_proportions: ProportionSet {
            width_ratio: 1.1,
            height_ratio: 1.0,
            depth_ratio: 1.05,
            back_angle_deg: 10.0,
            leg_thickness_ratio: 1.3,
        },
        kind_height_scale: HashMap::new(),
        ratio_bounds: (0.5, 1.8),
        styles: StyleElements {
            leg_style: LegStyle::Straight,
            back_style: BackStyle::Ladder,
            seat_style: SeatStyle::Woven,
            edge_style: EdgeStyle::Beveled,
        },
        materials: MaterialPreferences {
            preferred: vec![Material::Pine, Material::Leather, Material::Ceramic],
            traditional: vec![Material::WroughtIron, Material::Rattan],
            finishes: vec![Finish::Painted, Finish::Stained, Finish::Natural],
        },
        palette: vec![
            "#E4572E".into(),
            "#17BEBB".into(),
            "#FFC914".into(),
            "#76448A".into(),
        ],
        ceremonial: CeremonialContext {
            ceremonial_colors: vec!["#FFC914".into(), "#E4572E".into(), "#FFFFFF".into()],
            seasonal_notes: vec!["papel picado for festivals".into(), "marigolds in autumn".into()],
            minimum_ceremonial_formality: Formality::SemiFormal,
        },
        group_orientation: Some(GroupOrientation::Circular),
        social_distance_m: 1.0,
        max_single_piece_capacity: 10,
        decorative_motifs: vec!["papel picado".into(), "talavera".into(), "marigold".into()],
    }
}

/// Indian profile: carved hardwoods, brass accents, circular gathering.
pub fn indian_profile() -> CulturalProfile {
    CulturalProfile {
        culture: CultureId::new("indian"),
        base_proportions: ProportionSet {
            width_ratio: 1.05,
            height_ratio: 0.95,
            depth_ratio: 1.0,
            back_angle_deg: 9.0,
            leg_thickness_ratio: 1.2,
        },
        kind_height_scale: HashMap::from([(ArtifactKind::Table, 0.7)]),
        ratio_bounds: (0.4, 1.8),
        styles: StyleElements {
            leg_style: LegStyle::Cabriole,
            back_style: BackStyle::Carved,
            seat_style: SeatStyle::Upholstered,
            edge_style: EdgeStyle::Ornate,
        },
        materials: MaterialPreferences {
            preferred: vec![Material::Teak, Material::Brass, Material::Silk],
            traditional: vec![Material::Rattan, Material::Marble],
            finishes: vec![Finish::Lacquered, Finish::Gilded, Finish::Oiled],
        },
        palette: vec![
            "#9B1B30".into(),
            "#E0A100".into(),
            "#1D6A55".into(),
            "#30337B".into(),
        ],
        ceremonial: CeremonialContext {
            ceremonial_colors: vec!["#9B1B30".into(), "#E0A100".into()],
            seasonal_notes: vec!["diya lamps for diwali".into()],
            minimum_ceremonial_formality: Formality::Ceremonial,
        },
        group_orientation: Some(GroupOrientation::Circular),
        social_distance_m: 0.9,
        max_single_piece_capacity: 14,
        decorative_motifs: vec!["paisley".into(), "lotus".into(), "jali".into()],
    }
}

/// French profile: cabriole curves, upholstery, linear banquet layouts.
pub fn french_profile() -> CulturalProfile {
    CulturalProfile {
        culture: CultureId::new("french"),
        base_proportions: ProportionSet {
            width_ratio: 1.0,
            height_ratio: 1.05,
            depth_ratio: 0.95,
            back_angle_deg: 7.0,
            leg_thickness_ratio: 0.9,
        },
        kind_height_scale: HashMap::from([(ArtifactKind::Stage, 1.1)]),
        ratio_bounds: (0.5, 1.7),
        styles: StyleElements {
            leg_style: LegStyle::Cabriole,
            back_style: BackStyle::Curved,
            seat_style: SeatStyle::Upholstered,
            edge_style: EdgeStyle::Ornate,
        },
        materials: MaterialPreferences {
            preferred: vec![Material::Walnut, Material::Silk, Material::Marble],
            traditional: vec![Material::Oak, Material::Brass],
            finishes: vec![Finish::Lacquered, Finish::Gilded, Finish::Waxed],
        },
        palette: vec![
            "#F2E9DC".into(),
            "#7D8CA3".into(),
            "#A67B5B".into(),
            "#404E5C".into(),
        ],
        ceremonial: CeremonialContext {
            ceremonial_colors: vec!["#FFFFFF".into(), "#D4AF37".into()],
            seasonal_notes: vec!["garden tones for spring weddings".into()],
            minimum_ceremonial_formality: Formality::Formal,
        },
        group_orientation: Some(GroupOrientation::Linear),
        social_distance_m: 1.3,
        max_single_piece_capacity: 16,
        decorative_motifs: vec!["fleur-de-lis".into(), "acanthus".into(), "toile".into()],
    }
}

/// Every built-in profile, in registry load order.
pub fn all_profiles() -> Vec<CulturalProfile> {
    vec![
        japanese_profile(),
        scandinavian_profile(),
        moroccan_profile(),
        mexican_profile(),
        indian_profile(),
        french_profile(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_profile_validates() {
        for profile in all_profiles() {
            assert!(
                profile.validate().is_ok(),
                "profile {} failed validation",
                profile.culture
            );
        }
    }

    #[test]
    fn japanese_styles_match_expected_vocabulary() {
        let profile = japanese_profile();
        assert_eq!(profile.styles.leg_style, LegStyle::Tapered);
        assert_eq!(profile.styles.back_style, BackStyle::Straight);
    }

    #[test]
    fn cultures_are_distinct() {
        let profiles = all_profiles();
        let mut cultures: Vec<_> = profiles.iter().map(|p| p.culture.clone()).collect();
        cultures.dedup();
        assert_eq!(cultures.len(), profiles.len());
    }

    #[test]
    fn profiles_round_trip_through_json() {
        let profile = japanese_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let back: crate::CulturalProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
