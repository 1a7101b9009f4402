//! Limit tables: per-age-group ceilings and per-equipment constraint sets.

use atelier_types::AgeGroup;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Play equipment kinds with safety tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Slide,
    Swing,
    ClimbingFrame,
    Seesaw,
    SpringRider,
    PlayHouse,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 6] = [
        EquipmentKind::Slide,
        EquipmentKind::Swing,
        EquipmentKind::ClimbingFrame,
        EquipmentKind::Seesaw,
        EquipmentKind::SpringRider,
        EquipmentKind::PlayHouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentKind::Slide => "slide",
            EquipmentKind::Swing => "swing",
            EquipmentKind::ClimbingFrame => "climbing_frame",
            EquipmentKind::Seesaw => "seesaw",
            EquipmentKind::SpringRider => "spring_rider",
            EquipmentKind::PlayHouse => "play_house",
        }
    }
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized equipment kind: {0}")]
pub struct UnknownEquipment(pub String);

impl FromStr for EquipmentKind {
    type Err = UnknownEquipment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "slide" => Ok(EquipmentKind::Slide),
            "swing" => Ok(EquipmentKind::Swing),
            "climbing_frame" | "climber" => Ok(EquipmentKind::ClimbingFrame),
            "seesaw" => Ok(EquipmentKind::Seesaw),
            "spring_rider" => Ok(EquipmentKind::SpringRider),
            "play_house" | "playhouse" => Ok(EquipmentKind::PlayHouse),
            other => Err(UnknownEquipment(other.to_string())),
        }
    }
}

/// Constraint set for one (age group, equipment kind) pairing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetyConstraintSet {
    /// Maximum platform/deck height, metres
    pub max_height_m: f64,
    /// Required clear radius around the equipment, metres
    pub fall_zone_radius_m: f64,
    /// Minimum spacing to the next equipment piece, metres
    pub min_spacing_m: f64,
    /// Openings inside this band (metres) are head-entrapment hazards
    pub entrapment_min_m: f64,
    pub entrapment_max_m: f64,
    /// Whether elevated platforms require guard barriers
    pub barrier_required: bool,
}

impl SafetyConstraintSet {
    /// Whether an opening size falls inside the entrapment hazard band.
    pub fn is_entrapment_hazard(&self, opening_m: f64) -> bool {
        opening_m > self.entrapment_min_m && opening_m < self.entrapment_max_m
    }
}

/// Per-age-group ceilings that apply across all equipment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeGroupLimits {
    /// Absolute height ceiling for the group; no equipment may exceed it
    pub max_equipment_height_m: f64,
    /// Clear floor area required per person, square metres
    pub per_person_area_m2: f64,
    /// Whether outdoor metal surfaces are a burn hazard for the group
    pub metal_heat_sensitive: bool,
}

/// Ceilings per age group. The toddler band carries the strictest limits.
pub fn age_group_limits(age: AgeGroup) -> AgeGroupLimits {
    match age {
        AgeGroup::Toddler => AgeGroupLimits {
            max_equipment_height_m: 1.5,
            per_person_area_m2: 5.0,
            metal_heat_sensitive: true,
        },
        AgeGroup::Child => AgeGroupLimits {
            max_equipment_height_m: 2.4,
            per_person_area_m2: 5.0,
            metal_heat_sensitive: false,
        },
        AgeGroup::Teen => AgeGroupLimits {
            max_equipment_height_m: 3.0,
            per_person_area_m2: 5.0,
            metal_heat_sensitive: false,
        },
        AgeGroup::Adult => AgeGroupLimits {
            max_equipment_height_m: 3.5,
            per_person_area_m2: 5.0,
            metal_heat_sensitive: false,
        },
    }
}

/// Constraint table for one (age group, equipment kind) pairing.
///
/// Values follow the usual playground standards shape: fall zones of roughly
/// 1.8m, larger for swings, entrapment band 89–230mm.
pub fn constraint_for(age: AgeGroup, equipment: EquipmentKind) -> SafetyConstraintSet {
    let base = SafetyConstraintSet {
        max_height_m: age_group_limits(age).max_equipment_height_m,
        fall_zone_radius_m: 1.83,
        min_spacing_m: 2.7,
        entrapment_min_m: 0.089,
        entrapment_max_m: 0.23,
        barrier_required: age <= AgeGroup::Child,
    };
    match equipment {
        EquipmentKind::Slide => SafetyConstraintSet {
            max_height_m: base.max_height_m.min(match age {
                AgeGroup::Toddler => 1.2,
                AgeGroup::Child => 2.4,
                _ => 3.0,
            }),
            ..base
        },
        EquipmentKind::Swing => SafetyConstraintSet {
            // Swings need clearance twice the pivot height front and back,
            // and have no platform to guard
            fall_zone_radius_m: 2.4,
            min_spacing_m: 3.6,
            max_height_m: base.max_height_m.min(match age {
                AgeGroup::Toddler => 1.5,
                _ => 2.4,
            }),
            barrier_required: false,
            ..base
        },
        EquipmentKind::ClimbingFrame => SafetyConstraintSet {
            max_height_m: base.max_height_m.min(match age {
                AgeGroup::Toddler => 0.8,
                AgeGroup::Child => 1.8,
                _ => 2.4,
            }),
            ..base
        },
        EquipmentKind::Seesaw => SafetyConstraintSet {
            max_height_m: base.max_height_m.min(1.0),
            barrier_required: false,
            ..base
        },
        EquipmentKind::SpringRider => SafetyConstraintSet {
            max_height_m: base.max_height_m.min(0.8),
            fall_zone_radius_m: 1.5,
            barrier_required: false,
            ..base
        },
        EquipmentKind::PlayHouse => SafetyConstraintSet {
            max_height_m: base.max_height_m.min(match age {
                AgeGroup::Toddler => 1.4,
                _ => 2.0,
            }),
            ..base
        },
    }
}
