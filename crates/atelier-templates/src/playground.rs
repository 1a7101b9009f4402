//! Playground generator: the safety-critical member of the family.
//!
//! Stage 2 here runs the full safety validation; an equipment list that
//! cannot be made compliant by adjustment fails with the complete violation
//! set rather than the first problem found.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    material_cost_index, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use crate::DECORATIVE_THRESHOLD;
use atelier_culture::CulturalProfile;
use atelier_safety::{
    calculate_minimum_space, validate_safety_requirements, EquipmentKind, EquipmentSpec,
    SafetyParameters,
};
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, Material, MaterialAssignment,
    ParametricParameters, PrimitiveShape, SpaceDimensions, StructuralRole, Transform, Vec3, Venue,
};
use std::collections::BTreeMap;

/// Platforms above this height always carry a guard barrier.
const BARRIER_HEIGHT_M: f64 = 0.75;
const COST_RATE_PER_PIECE: f64 = 650.0;

pub struct PlaygroundGenerator;

#[derive(Clone, Debug)]
pub struct PlaygroundParams {
    pub common: CommonSpec,
    pub equipment: Vec<EquipmentSpec>,
    pub available_space: SpaceDimensions,
    pub heat_exposure: bool,
    pub fall_zone_radius_m: f64,
    pub min_spacing_m: f64,
    pub finish: Finish,
    pub motifs: Vec<String>,
}

impl TemplatePipeline for PlaygroundGenerator {
    type Params = PlaygroundParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Playground
    }

    fn convert(
        &self,
        ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<PlaygroundParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        let age = common.age;

        let equipment_material = match generic.extras.get("equipment_material") {
            Some(raw) => raw.parse::<Material>().map_err(|e| {
                GeneratorError::InvalidParameters {
                    kind: ArtifactKind::Playground,
                    message: e.to_string(),
                }
            })?,
            None => common.material,
        };

        let listed = generic
            .extras
            .get("equipment")
            .map(String::as_str)
            .unwrap_or("slide,swing");
        let mut equipment = Vec::new();
        for token in listed.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let kind: EquipmentKind =
                token.parse().map_err(|e: atelier_safety::UnknownEquipment| {
                    GeneratorError::InvalidParameters {
                        kind: ArtifactKind::Playground,
                        message: e.to_string(),
                    }
                })?;
            let constraint = ctx.safety.constraints(age, kind);
            // Design height tracks the age-specific ceiling with headroom
            let height = match generic.extras.get(&format!("{}_height_m", kind.as_str())) {
                Some(raw) => raw.parse::<f64>().map_err(|_| {
                    GeneratorError::InvalidParameters {
                        kind: ArtifactKind::Playground,
                        message: format!("unparseable height for {kind}: '{raw}'"),
                    }
                })?,
                None => constraint.max_height_m * 0.9,
            };
            let mut spec = EquipmentSpec::new(kind, height, equipment_material);
            if let Some(raw) = generic.extras.get(&format!("{}_opening_m", kind.as_str())) {
                if let Ok(opening) = raw.parse::<f64>() {
                    spec = spec.with_opening(opening);
                }
            }
            let barriers_declined =
                generic.extras.get("barriers").map(String::as_str) == Some("false");
            if constraint.barrier_required && height > BARRIER_HEIGHT_M && !barriers_declined {
                spec = spec.with_barrier();
            }
            equipment.push(spec);
        }

        let kinds: Vec<EquipmentKind> = equipment.iter().map(|e| e.kind).collect();
        let radius = ctx.safety.max_fall_zone_radius(age, &kinds);
        let available_space = match (
            generic.extras.get("space_width_m").and_then(|v| v.parse().ok()),
            generic.extras.get("space_depth_m").and_then(|v| v.parse().ok()),
        ) {
            (Some(w), Some(d)) => SpaceDimensions::new(w, d),
            // No declared site: size the site to the computed minimum
            _ => calculate_minimum_space(common.capacity, kinds.len() as u32, radius),
        };
        let min_spacing = kinds
            .iter()
            .map(|k| ctx.safety.constraints(age, *k).min_spacing_m)
            .fold(0.0_f64, f64::max);

        Ok(PlaygroundParams {
            common,
            equipment,
            available_space,
            heat_exposure: generic.venue == Venue::Outdoor,
            fall_zone_radius_m: radius,
            min_spacing_m: min_spacing,
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
            motifs: profile.decorative_motifs.clone(),
        })
    }

    fn validate_and_adjust(
        &self,
        ctx: &GeneratorContext,
        mut params: PlaygroundParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<PlaygroundParams>, GeneratorError> {
        // Capacity means children served at once; the furniture clamp does
        // not apply
        let capacity = params.common.capacity;
        let mut warnings = params.common.apply_standard_adjustments(generic, profile);
        warnings.retain(|w| w.field != "capacity");
        params.common.capacity = capacity;
        // A material swap on the common spec carries through to equipment
        // that inherited it
        if generic.extras.get("equipment_material").is_none() {
            for spec in &mut params.equipment {
                spec.material = params.common.material;
            }
        }

        let report = validate_safety_requirements(
            &ctx.safety,
            &SafetyParameters {
                age_group: params.common.age,
                capacity: params.common.capacity,
                equipment: params.equipment.clone(),
                available_space: params.available_space,
                venue: params.common.venue,
                heat_exposure: params.heat_exposure,
            },
        );
        if !report.passed {
            return Err(GeneratorError::Safety {
                kind: ArtifactKind::Playground,
                violations: report.violations,
            });
        }
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &PlaygroundParams,
        _profile: &CulturalProfile,
    ) -> DimensionSet {
        let tallest = params
            .equipment
            .iter()
            .map(|e| e.height_m)
            .fold(0.0_f64, f64::max);
        let overall = Dimensions::new(
            params.available_space.width_m,
            tallest.max(0.5),
            params.available_space.depth_m,
        );
        let mut extras = BTreeMap::new();
        extras.insert("fall_zone_radius_m".into(), params.fall_zone_radius_m);
        extras.insert("min_spacing_m".into(), params.min_spacing_m);
        DimensionSet {
            overall,
            surface_height: Some(tallest * 0.5),
            leg_thickness_m: 0.1,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &PlaygroundParams,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let mut root = GeometryNode::group("playground");
        root.push(GeometryNode::primitive(
            "impact-surface",
            PrimitiveShape::Box,
            Dimensions::new(dims.overall.width, 0.1, dims.overall.depth),
            Transform::at(Vec3::new(0.0, 0.05, 0.0)),
            StructuralRole::Base,
        ));

        // Pieces laid out along x at the governing spacing
        let pitch = params.min_spacing_m + 1.0;
        let start_x = -pitch * (params.equipment.len().saturating_sub(1) as f64) / 2.0;
        for (i, spec) in params.equipment.iter().enumerate() {
            let x = start_x + pitch * i as f64;
            root.push(equipment_geometry(spec, i, x));
        }

        if params.common.decorative_intensity >= DECORATIVE_THRESHOLD {
            let count = (params.common.decorative_intensity * 3.0).round() as usize;
            let mut markers = GeometryNode::group("play-markers");
            for i in 0..count {
                let motif = jitter.pick(&params.motifs).map(String::as_str).unwrap_or("marker");
                markers.push(GeometryNode::ornament(
                    format!("{motif}-{i}"),
                    PrimitiveShape::Sphere,
                    Dimensions::new(0.15, 0.15, 0.15),
                    Transform::at(Vec3::new(
                        jitter.offset(dims.overall.width * 0.4),
                        0.2,
                        jitter.offset(dims.overall.depth * 0.4),
                    )),
                ));
            }
            root.push(markers);
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &PlaygroundParams) {
        let equipment_material = params
            .equipment
            .first()
            .map(|e| e.material)
            .unwrap_or(params.common.material);
        let structural = MaterialAssignment::structural(equipment_material, params.finish);
        let surface = MaterialAssignment::structural(Material::Rattan, Finish::Natural);
        let accent = MaterialAssignment::accent(equipment_material, Finish::Painted);
        root.visit_primitives_mut(&mut |name, _, decorative, material| {
            *material = Some(if name == "impact-surface" {
                surface
            } else if decorative {
                accent
            } else {
                structural
            });
        });
    }

    fn estimate_cost(&self, _dims: &DimensionSet, params: &PlaygroundParams) -> f64 {
        params
            .equipment
            .iter()
            .map(|e| {
                COST_RATE_PER_PIECE * e.height_m.max(0.5) * material_cost_index(e.material)
            })
            .sum::<f64>()
            * (1.0 + 0.3 * params.common.decorative_intensity)
    }

    fn metadata_extensions(
        &self,
        _dims: &DimensionSet,
        params: &PlaygroundParams,
    ) -> Vec<(String, String)> {
        let listed: Vec<&str> = params.equipment.iter().map(|e| e.kind.as_str()).collect();
        vec![
            ("equipment".into(), listed.join(",")),
            (
                "fall_zone_radius_m".into(),
                format!("{:.2}", params.fall_zone_radius_m),
            ),
        ]
    }
}

fn equipment_geometry(spec: &EquipmentSpec, index: usize, x: f64) -> GeometryNode {
    let mut piece = GeometryNode::group(format!("{}-{index}", spec.kind.as_str()));
    piece.transform_mut().position = Vec3::new(x, 0.0, 0.0);
    let h = spec.height_m;
    match spec.kind {
        EquipmentKind::Slide => {
            piece.push(GeometryNode::primitive(
                "platform",
                PrimitiveShape::Box,
                Dimensions::new(1.0, 0.08, 1.0),
                Transform::at(Vec3::new(0.0, h, 0.0)),
                StructuralRole::Surface,
            ));
            piece.push(GeometryNode::primitive(
                "chute",
                PrimitiveShape::Panel,
                Dimensions::new(0.6, 0.05, h * 1.8),
                Transform::at(Vec3::new(0.0, h / 2.0, h * 0.9)),
                StructuralRole::Accessory,
            ));
            push_posts(&mut piece, h, 0.45);
        }
        EquipmentKind::Swing => {
            piece.push(GeometryNode::primitive(
                "crossbar",
                PrimitiveShape::Cylinder,
                Dimensions::new(2.4, 0.08, 0.08),
                Transform::at(Vec3::new(0.0, h, 0.0)),
                StructuralRole::Support,
            ));
            for (name, x_off) in [("seat-left", -0.6), ("seat-right", 0.6)] {
                piece.push(GeometryNode::primitive(
                    name,
                    PrimitiveShape::Box,
                    Dimensions::new(0.45, 0.03, 0.2),
                    Transform::at(Vec3::new(x_off, 0.45, 0.0)),
                    StructuralRole::Surface,
                ));
            }
            push_posts(&mut piece, h, 1.2);
        }
        EquipmentKind::ClimbingFrame | EquipmentKind::PlayHouse => {
            piece.push(GeometryNode::primitive(
                "frame",
                PrimitiveShape::Box,
                Dimensions::new(1.5, h, 1.5),
                Transform::at(Vec3::new(0.0, h / 2.0, 0.0)),
                StructuralRole::Support,
            ));
        }
        EquipmentKind::Seesaw | EquipmentKind::SpringRider => {
            piece.push(GeometryNode::primitive(
                "beam",
                PrimitiveShape::Box,
                Dimensions::new(2.0, 0.1, 0.25),
                Transform::at(Vec3::new(0.0, h, 0.0)),
                StructuralRole::Surface,
            ));
            piece.push(GeometryNode::primitive(
                "pivot",
                PrimitiveShape::Cylinder,
                Dimensions::new(0.2, h, 0.2),
                Transform::at(Vec3::new(0.0, h / 2.0, 0.0)),
                StructuralRole::Support,
            ));
        }
    }
    if spec.has_barrier {
        piece.push(GeometryNode::primitive(
            "guard-barrier",
            PrimitiveShape::Panel,
            Dimensions::new(1.0, 0.7, 0.03),
            Transform::at(Vec3::new(0.0, h + 0.35, -0.5)),
            StructuralRole::Barrier,
        ));
    }
    piece
}

fn push_posts(piece: &mut GeometryNode, height: f64, half_span: f64) {
    for (i, x) in [-half_span, half_span].iter().enumerate() {
        piece.push(GeometryNode::primitive(
            format!("post-{i}"),
            PrimitiveShape::Cylinder,
            Dimensions::new(0.1, height, 0.1),
            Transform::at(Vec3::new(*x, height / 2.0, 0.0)),
            StructuralRole::Support,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ArtifactGenerator;
    use atelier_culture::CultureRegistry;
    use atelier_safety::{SafetyRegistry, ViolationCode};
    use atelier_types::{AgeGroup, CultureId};
    use std::sync::Arc;

    fn make_ctx() -> GeneratorContext {
        GeneratorContext::new(
            Arc::new(CultureRegistry::builtin().unwrap()),
            Arc::new(SafetyRegistry::builtin()),
        )
    }

    #[test]
    fn default_site_is_sized_to_pass_validation() {
        let ctx = make_ctx();
        let params =
            ParametricParameters::new(ArtifactKind::Playground, CultureId::new("scandinavian"))
                .with_target_age(AgeGroup::Child)
                .with_capacity(10)
                .with_extra("equipment", "slide,swing,climbing_frame");
        let artifact = PlaygroundGenerator.generate(&ctx, &params).unwrap();
        assert!(artifact.metadata.safety_compliant);
        assert_eq!(artifact.metadata.extensions["equipment"], "slide,swing,climbing_frame");
    }

    #[test]
    fn explicit_steel_slide_for_outdoor_toddlers_fails_with_burn_hazard() {
        let ctx = make_ctx();
        let params =
            ParametricParameters::new(ArtifactKind::Playground, CultureId::new("mexican"))
                .with_target_age(AgeGroup::Toddler)
                .with_venue(Venue::Outdoor)
                .with_extra("equipment", "slide")
                .with_extra("equipment_material", "steel");
        let err = PlaygroundGenerator.generate(&ctx, &params).unwrap_err();
        match err {
            GeneratorError::Safety { violations, .. } => {
                assert!(violations
                    .iter()
                    .any(|v| v.code == ViolationCode::HazardousMaterial));
            }
            other => panic!("expected safety error, got {other}"),
        }
    }

    #[test]
    fn cramped_site_reports_insufficient_space() {
        let ctx = make_ctx();
        let params =
            ParametricParameters::new(ArtifactKind::Playground, CultureId::new("scandinavian"))
                .with_target_age(AgeGroup::Child)
                .with_capacity(15)
                .with_extra("equipment", "slide,swing,seesaw,climbing_frame")
                .with_extra("space_width_m", "5")
                .with_extra("space_depth_m", "4");
        let err = PlaygroundGenerator.generate(&ctx, &params).unwrap_err();
        match err {
            GeneratorError::Safety { violations, .. } => {
                assert!(violations
                    .iter()
                    .any(|v| v.code == ViolationCode::InsufficientSpace));
            }
            other => panic!("expected safety error, got {other}"),
        }
    }

    #[test]
    fn unknown_equipment_token_is_rejected_up_front() {
        let ctx = make_ctx();
        let params =
            ParametricParameters::new(ArtifactKind::Playground, CultureId::new("french"))
                .with_extra("equipment", "slide,zip_line");
        let err = PlaygroundGenerator.generate(&ctx, &params).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidParameters { .. }));
    }

    #[test]
    fn inherited_material_swap_keeps_toddler_setup_compliant() {
        let ctx = make_ctx();
        // Metal requested generically: stage 2 swaps it for a safe preferred
        // material instead of failing
        let params =
            ParametricParameters::new(ArtifactKind::Playground, CultureId::new("japanese"))
                .with_target_age(AgeGroup::Toddler)
                .with_venue(Venue::Outdoor)
                .with_material(Material::Steel)
                .with_extra("equipment", "slide");
        let artifact = PlaygroundGenerator.generate(&ctx, &params).unwrap();
        assert!(artifact.warnings.iter().any(|w| w.field == "material"));
        assert!(artifact.metadata.safety_compliant);
    }
}
