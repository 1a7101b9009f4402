//! Safety validation: exhaustive violation collection and minimum-space
//! arithmetic.

use crate::limits::EquipmentKind;
use crate::registry::SafetyRegistry;
use atelier_types::{AgeGroup, Material, SpaceDimensions, Venue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Violation categories, stable for programmatic handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    InsufficientSpace,
    ExcessiveHeight,
    HazardousMaterial,
    EntrapmentRisk,
    MissingBarrier,
}

/// One recorded safety violation with enough context to remediate it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetyViolation {
    pub code: ViolationCode,
    /// The offending equipment, when the violation is equipment-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<EquipmentKind>,
    pub message: String,
}

impl SafetyViolation {
    fn new(code: ViolationCode, equipment: Option<EquipmentKind>, message: String) -> Self {
        Self { code, equipment, message }
    }
}

impl fmt::Display for SafetyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One piece of equipment to validate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSpec {
    pub kind: EquipmentKind,
    /// Proposed platform/deck height, metres
    pub height_m: f64,
    pub material: Material,
    /// Smallest structural opening, metres, if the design has any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_m: Option<f64>,
    /// Whether the design includes guard barriers on elevated platforms
    pub has_barrier: bool,
}

impl EquipmentSpec {
    pub fn new(kind: EquipmentKind, height_m: f64, material: Material) -> Self {
        Self { kind, height_m, material, opening_m: None, has_barrier: false }
    }

    pub fn with_opening(mut self, opening_m: f64) -> Self {
        self.opening_m = Some(opening_m);
        self
    }

    pub fn with_barrier(mut self) -> Self {
        self.has_barrier = true;
        self
    }
}

/// Input record for a full safety validation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetyParameters {
    pub age_group: AgeGroup,
    pub capacity: u32,
    pub equipment: Vec<EquipmentSpec>,
    pub available_space: SpaceDimensions,
    pub venue: Venue,
    /// Whether the site sees direct sun / high ambient heat
    pub heat_exposure: bool,
}

/// Result of a validation pass: every violation found, never just the first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub passed: bool,
    pub violations: Vec<SafetyViolation>,
    /// The computed minimum footprint for the requested setup
    pub required_space: SpaceDimensions,
}

/// Minimum footprint for `capacity` people and `equipment_count` pieces of
/// equipment, each surrounded by a fall zone of `fall_zone_radius` metres.
///
/// Required area = capacity x per-person area + equipment_count x
/// (fall-zone diameter)^2; the area is split into a 4:3 footprint.
/// Monotonically non-decreasing in both `capacity` and `equipment_count`.
pub fn calculate_minimum_space(
    capacity: u32,
    equipment_count: u32,
    fall_zone_radius: f64,
) -> SpaceDimensions {
    // Per-person clear area shared by every age table
    const PER_PERSON_AREA_M2: f64 = 5.0;
    let diameter = fall_zone_radius.max(0.0) * 2.0;
    let area = f64::from(capacity) * PER_PERSON_AREA_M2
        + f64::from(equipment_count) * diameter * diameter;
    let width = (area * 4.0 / 3.0).sqrt();
    let depth = if width > 0.0 { area / width } else { 0.0 };
    SpaceDimensions::new(width, depth)
}

/// Validate a full setup against the registry tables.
///
/// Runs every check and collects all violations; a setup with three problems
/// reports three violations, not one.
pub fn validate_safety_requirements(
    registry: &SafetyRegistry,
    params: &SafetyParameters,
) -> SafetyReport {
    let mut violations = Vec::new();
    let limits = registry.age_limits(params.age_group);

    // Space: largest fall zone among the requested equipment drives the
    // per-equipment term.
    let kinds: Vec<EquipmentKind> = params.equipment.iter().map(|e| e.kind).collect();
    let radius = registry.max_fall_zone_radius(params.age_group, &kinds);
    let required = calculate_minimum_space(params.capacity, kinds.len() as u32, radius);
    if !params.available_space.fits(&required) {
        violations.push(SafetyViolation::new(
            ViolationCode::InsufficientSpace,
            None,
            format!(
                "available space {:.1}m x {:.1}m is below the computed minimum {:.1}m x {:.1}m",
                params.available_space.width_m,
                params.available_space.depth_m,
                required.width_m,
                required.depth_m,
            ),
        ));
    }

    for spec in &params.equipment {
        let constraints = registry.constraints(params.age_group, spec.kind);
        let ceiling = constraints.max_height_m.min(limits.max_equipment_height_m);

        if spec.height_m > ceiling {
            violations.push(SafetyViolation::new(
                ViolationCode::ExcessiveHeight,
                Some(spec.kind),
                format!(
                    "{} height {:.2}m exceeds the {} age-group ceiling of {:.2}m",
                    spec.kind,
                    spec.height_m,
                    params.age_group,
                    ceiling,
                ),
            ));
        }

        if spec.material.is_metal()
            && limits.metal_heat_sensitive
            && params.venue == Venue::Outdoor
            && params.heat_exposure
        {
            violations.push(SafetyViolation::new(
                ViolationCode::HazardousMaterial,
                Some(spec.kind),
                format!(
                    "{} in {} is a burn hazard outdoors in heat for ages {}",
                    spec.material, spec.kind, params.age_group,
                ),
            ));
        }

        if let Some(opening) = spec.opening_m {
            if constraints.is_entrapment_hazard(opening) {
                violations.push(SafetyViolation::new(
                    ViolationCode::EntrapmentRisk,
                    Some(spec.kind),
                    format!(
                        "{} opening of {:.0}mm falls in the entrapment band ({:.0}-{:.0}mm)",
                        spec.kind,
                        opening * 1000.0,
                        constraints.entrapment_min_m * 1000.0,
                        constraints.entrapment_max_m * 1000.0,
                    ),
                ));
            }
        }

        if constraints.barrier_required && spec.height_m > 0.75 && !spec.has_barrier {
            violations.push(SafetyViolation::new(
                ViolationCode::MissingBarrier,
                Some(spec.kind),
                format!(
                    "{} platform at {:.2}m requires a guard barrier for ages {}",
                    spec.kind, spec.height_m, params.age_group,
                ),
            ));
        }
    }

    if !violations.is_empty() {
        tracing::warn!(
            violation_count = violations.len(),
            age_group = %params.age_group,
            "safety validation failed"
        );
    }

    SafetyReport { passed: violations.is_empty(), violations, required_space: required }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_registry() -> SafetyRegistry {
        SafetyRegistry::builtin()
    }

    fn toddler_playground(space: SpaceDimensions) -> SafetyParameters {
        SafetyParameters {
            age_group: AgeGroup::Toddler,
            capacity: 10,
            equipment: vec![
                EquipmentSpec::new(EquipmentKind::Slide, 1.0, Material::Plastic).with_barrier(),
                EquipmentSpec::new(EquipmentKind::Swing, 1.4, Material::Oak),
            ],
            available_space: space,
            venue: Venue::Outdoor,
            heat_exposure: false,
        }
    }

    #[test]
    fn minimum_space_matches_the_documented_formula() {
        let space = calculate_minimum_space(15, 4, 1.83);
        let expected_area = 15.0 * 5.0 + 4.0 * (1.83 * 2.0_f64).powi(2);
        assert!(space.area_m2() >= expected_area - 1e-9);
    }

    #[test]
    fn compliant_toddler_setup_passes() {
        let report = validate_safety_requirements(
            &make_registry(),
            &toddler_playground(SpaceDimensions::new(20.0, 15.0)),
        );
        assert!(report.passed, "unexpected violations: {:?}", report.violations);
    }

    #[test]
    fn undersized_space_reports_the_computed_minimum() {
        let report = validate_safety_requirements(
            &make_registry(),
            &toddler_playground(SpaceDimensions::new(4.0, 3.0)),
        );
        assert!(!report.passed);
        let violation = report
            .violations
            .iter()
            .find(|v| v.code == ViolationCode::InsufficientSpace)
            .expect("expected an insufficient-space violation");
        let width = format!("{:.1}", report.required_space.width_m);
        assert!(violation.message.contains(&width));
    }

    #[test]
    fn toddler_height_ceiling_rejection_names_the_equipment() {
        let mut params = toddler_playground(SpaceDimensions::new(30.0, 20.0));
        params.equipment.push(
            EquipmentSpec::new(EquipmentKind::ClimbingFrame, 2.0, Material::Oak).with_barrier(),
        );
        let report = validate_safety_requirements(&make_registry(), &params);
        assert!(!report.passed);
        let violation = report
            .violations
            .iter()
            .find(|v| v.code == ViolationCode::ExcessiveHeight)
            .expect("expected a height violation");
        assert_eq!(violation.equipment, Some(EquipmentKind::ClimbingFrame));
        assert!(violation.message.contains("climbing_frame"));
    }

    #[test]
    fn all_violations_are_collected_not_just_the_first() {
        let mut params = toddler_playground(SpaceDimensions::new(2.0, 2.0));
        params.heat_exposure = true;
        params.equipment = vec![
            // Too tall, metal, entrapment opening, no barrier: four problems
            EquipmentSpec::new(EquipmentKind::Slide, 2.5, Material::Steel).with_opening(0.12),
        ];
        let report = validate_safety_requirements(&make_registry(), &params);
        let codes: Vec<ViolationCode> = report.violations.iter().map(|v| v.code).collect();
        assert!(codes.contains(&ViolationCode::InsufficientSpace));
        assert!(codes.contains(&ViolationCode::ExcessiveHeight));
        assert!(codes.contains(&ViolationCode::HazardousMaterial));
        assert!(codes.contains(&ViolationCode::EntrapmentRisk));
        assert!(codes.contains(&ViolationCode::MissingBarrier));
    }

    #[test]
    fn metal_is_fine_for_older_groups() {
        let mut params = toddler_playground(SpaceDimensions::new(30.0, 20.0));
        params.age_group = AgeGroup::Teen;
        params.heat_exposure = true;
        params.equipment =
            vec![EquipmentSpec::new(EquipmentKind::Swing, 2.2, Material::Steel)];
        let report = validate_safety_requirements(&make_registry(), &params);
        assert!(!report
            .violations
            .iter()
            .any(|v| v.code == ViolationCode::HazardousMaterial));
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn minimum_space_monotone_in_capacity(
            capacity in 0u32..500,
            extra in 1u32..50,
            equipment in 0u32..20,
            radius in 0.0f64..5.0,
        ) {
            let smaller = calculate_minimum_space(capacity, equipment, radius);
            let larger = calculate_minimum_space(capacity + extra, equipment, radius);
            prop_assert!(larger.width_m >= smaller.width_m);
            prop_assert!(larger.depth_m >= smaller.depth_m);
        }

        #[test]
        fn minimum_space_monotone_in_equipment(
            capacity in 0u32..500,
            equipment in 0u32..20,
            extra in 1u32..10,
            radius in 0.0f64..5.0,
        ) {
            let smaller = calculate_minimum_space(capacity, equipment, radius);
            let larger = calculate_minimum_space(capacity, equipment + extra, radius);
            prop_assert!(larger.width_m >= smaller.width_m);
            prop_assert!(larger.depth_m >= smaller.depth_m);
        }

        #[test]
        fn minimum_space_is_never_negative(
            capacity in 0u32..500,
            equipment in 0u32..20,
            radius in -2.0f64..5.0,
        ) {
            let space = calculate_minimum_space(capacity, equipment, radius);
            prop_assert!(space.width_m >= 0.0);
            prop_assert!(space.depth_m >= 0.0);
        }
    }
}
