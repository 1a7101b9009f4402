//! The safety registry: build-once constraint lookup shared by generators
//! and the orchestrator.

use crate::limits::{age_group_limits, constraint_for, AgeGroupLimits, EquipmentKind, SafetyConstraintSet};
use atelier_types::AgeGroup;
use std::collections::BTreeMap;

/// Immutable constraint lookup keyed by (age group, equipment kind).
///
/// Materialized once at construction so lookups are allocation-free and the
/// table can be audited as data rather than as branching code.
#[derive(Clone, Debug)]
pub struct SafetyRegistry {
    constraints: BTreeMap<(AgeGroup, EquipmentKind), SafetyConstraintSet>,
}

impl SafetyRegistry {
    /// Build the registry from the built-in constraint tables.
    pub fn builtin() -> Self {
        let mut constraints = BTreeMap::new();
        for age in [AgeGroup::Toddler, AgeGroup::Child, AgeGroup::Teen, AgeGroup::Adult] {
            for equipment in EquipmentKind::ALL {
                constraints.insert((age, equipment), constraint_for(age, equipment));
            }
        }
        Self { constraints }
    }

    /// Constraint set for one (age group, equipment) pair.
    pub fn constraints(&self, age: AgeGroup, equipment: EquipmentKind) -> &SafetyConstraintSet {
        // builtin() populates the full cross product, so the lookup is total
        &self.constraints[&(age, equipment)]
    }

    /// Per-age ceilings independent of equipment kind.
    pub fn age_limits(&self, age: AgeGroup) -> AgeGroupLimits {
        age_group_limits(age)
    }

    /// The largest fall-zone radius among the given equipment for an age
    /// group; used when a caller needs one conservative radius.
    pub fn max_fall_zone_radius(&self, age: AgeGroup, equipment: &[EquipmentKind]) -> f64 {
        equipment
            .iter()
            .map(|e| self.constraints(age, *e).fall_zone_radius_m)
            .fold(0.0, f64::max)
    }
}

impl Default for SafetyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_the_full_cross_product() {
        let registry = SafetyRegistry::builtin();
        for age in [AgeGroup::Toddler, AgeGroup::Child, AgeGroup::Teen, AgeGroup::Adult] {
            for equipment in EquipmentKind::ALL {
                let set = registry.constraints(age, equipment);
                assert!(set.max_height_m > 0.0);
                assert!(set.fall_zone_radius_m > 0.0);
            }
        }
    }

    #[test]
    fn max_fall_zone_picks_the_swing() {
        let registry = SafetyRegistry::builtin();
        let radius = registry.max_fall_zone_radius(
            AgeGroup::Child,
            &[EquipmentKind::Slide, EquipmentKind::Swing],
        );
        assert_eq!(radius, registry.constraints(AgeGroup::Child, EquipmentKind::Swing).fall_zone_radius_m);
    }
}
