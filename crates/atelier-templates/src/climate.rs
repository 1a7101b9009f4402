//! Climate generator: heaters, cooling fans, and shade sails that keep an
//! outdoor scene usable.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use atelier_culture::CulturalProfile;
use atelier_types::{
    AdjustmentWarning, AgeGroup, ArtifactKind, Dimensions, Finish, GeometryNode, Material,
    MaterialAssignment, ParametricParameters, PrimitiveShape, StructuralRole, Transform, Vec3,
};
use std::collections::BTreeMap;

const COST_RATE_PER_M3: f64 = 450.0;
/// Guests one climate unit serves.
const GUESTS_PER_UNIT: u32 = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClimateUnit {
    Heater,
    CoolingFan,
    ShadeSail,
}

impl ClimateUnit {
    fn as_str(&self) -> &'static str {
        match self {
            ClimateUnit::Heater => "heater",
            ClimateUnit::CoolingFan => "cooling-fan",
            ClimateUnit::ShadeSail => "shade-sail",
        }
    }
}

pub struct ClimateGenerator;

#[derive(Clone, Debug)]
pub struct ClimateParams {
    pub common: CommonSpec,
    pub unit: ClimateUnit,
    pub unit_count: u32,
    /// Radiant heaters are fenced off when toddlers are expected
    pub guarded: bool,
    pub finish: Finish,
}

impl TemplatePipeline for ClimateGenerator {
    type Params = ClimateParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Climate
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<ClimateParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        let unit = match generic.extras.get("climate_unit").map(String::as_str) {
            Some("heater") | None => ClimateUnit::Heater,
            Some("cooling-fan") | Some("fan") => ClimateUnit::CoolingFan,
            Some("shade-sail") | Some("shade") => ClimateUnit::ShadeSail,
            Some(other) => {
                return Err(GeneratorError::InvalidParameters {
                    kind: ArtifactKind::Climate,
                    message: format!("unknown climate unit '{other}'"),
                })
            }
        };
        let unit_count = common.capacity.div_ceil(GUESTS_PER_UNIT).max(1);
        Ok(ClimateParams {
            common,
            unit,
            unit_count,
            guarded: false,
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: ClimateParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<ClimateParams>, GeneratorError> {
        // Capacity here means guests served, not sitters; skip the
        // single-piece clamp and apply only the material/formality rules
        let capacity = params.common.capacity;
        let mut warnings = params.common.apply_standard_adjustments(generic, profile);
        warnings.retain(|w| w.field != "capacity");
        params.common.capacity = capacity;

        if params.unit == ClimateUnit::Heater && params.common.age <= AgeGroup::Child {
            params.guarded = true;
            warnings.push(AdjustmentWarning::new(
                "guarded",
                "false",
                "true",
                "radiant heaters are fenced when young children are expected",
            ));
        }
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &ClimateParams,
        profile: &CulturalProfile,
    ) -> DimensionSet {
        let overall = params.common.scaled_dimensions(ArtifactKind::Climate, profile);
        let mut extras = BTreeMap::new();
        extras.insert("unit_count".into(), f64::from(params.unit_count));
        DimensionSet {
            overall,
            surface_height: None,
            leg_thickness_m: 0.08,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &ClimateParams,
        _jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let mut root = GeometryNode::group("climate");
        let pitch = dims.overall.width / f64::from(params.unit_count).max(1.0);
        for i in 0..params.unit_count {
            let x = pitch * (f64::from(i) - f64::from(params.unit_count - 1) / 2.0);
            let mut unit = GeometryNode::group(format!("{}-{i}", params.unit.as_str()));
            unit.transform_mut().position = Vec3::new(x, 0.0, 0.0);
            match params.unit {
                ClimateUnit::Heater | ClimateUnit::CoolingFan => {
                    unit.push(GeometryNode::primitive(
                        "column",
                        PrimitiveShape::Cylinder,
                        Dimensions::new(0.3, dims.overall.height * 0.8, 0.3),
                        Transform::at(Vec3::new(0.0, dims.overall.height * 0.4, 0.0)),
                        StructuralRole::Support,
                    ));
                    unit.push(GeometryNode::primitive(
                        "head",
                        if params.unit == ClimateUnit::Heater {
                            PrimitiveShape::Cone
                        } else {
                            PrimitiveShape::Cylinder
                        },
                        Dimensions::new(0.5, dims.overall.height * 0.2, 0.5),
                        Transform::at(Vec3::new(0.0, dims.overall.height * 0.9, 0.0)),
                        StructuralRole::Accessory,
                    ));
                }
                ClimateUnit::ShadeSail => {
                    unit.push(GeometryNode::primitive(
                        "sail",
                        PrimitiveShape::Panel,
                        Dimensions::new(3.0, 0.02, 3.0),
                        Transform::at(Vec3::new(0.0, dims.overall.height, 0.0)),
                        StructuralRole::Canopy,
                    ));
                }
            }
            if params.guarded {
                unit.push(GeometryNode::primitive(
                    "guard-fence",
                    PrimitiveShape::Panel,
                    Dimensions::new(1.2, 0.9, 1.2),
                    Transform::at(Vec3::new(0.0, 0.45, 0.0)),
                    StructuralRole::Barrier,
                ));
            }
            root.push(unit);
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &ClimateParams) {
        let body = MaterialAssignment::structural(Material::Steel, Finish::Painted);
        let sail = MaterialAssignment::structural(Material::Fabric, Finish::Natural);
        let fence = MaterialAssignment::structural(params.common.material, params.finish);
        root.visit_primitives_mut(&mut |name, _, _, material| {
            *material = Some(match name {
                "sail" => sail,
                "guard-fence" => fence,
                _ => body,
            });
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &ClimateParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3) * f64::from(params.unit_count)
    }

    fn metadata_extensions(
        &self,
        _dims: &DimensionSet,
        params: &ClimateParams,
    ) -> Vec<(String, String)> {
        vec![
            ("unit".into(), params.unit.as_str().into()),
            ("unit_count".into(), params.unit_count.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ArtifactGenerator;
    use atelier_culture::CultureRegistry;
    use atelier_safety::SafetyRegistry;
    use atelier_types::CultureId;
    use std::sync::Arc;

    fn make_ctx() -> GeneratorContext {
        GeneratorContext::new(
            Arc::new(CultureRegistry::builtin().unwrap()),
            Arc::new(SafetyRegistry::builtin()),
        )
    }

    #[test]
    fn unit_count_scales_with_guests_served() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Climate, CultureId::new("french"))
            .with_capacity(60);
        let artifact = ClimateGenerator.generate(&ctx, &params).unwrap();
        assert_eq!(artifact.metadata.extensions["unit_count"], "3");
    }

    #[test]
    fn heaters_are_fenced_for_young_children() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Climate, CultureId::new("mexican"))
            .with_target_age(AgeGroup::Toddler);
        let artifact = ClimateGenerator.generate(&ctx, &params).unwrap();
        assert!(artifact.warnings.iter().any(|w| w.field == "guarded"));
    }
}
