//! Environment generator: the ground plane and zone markers every composite
//! scene is assembled on.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use atelier_culture::CulturalProfile;
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, Material, MaterialAssignment,
    ParametricParameters, PrimitiveShape, StructuralRole, Transform, Vec3, Venue,
};
use std::collections::BTreeMap;

const COST_RATE_PER_M3: f64 = 160.0;
/// Clear floor area per guest, matching the safety tables.
const PER_GUEST_AREA_M2: f64 = 5.0;

pub struct EnvironmentGenerator;

#[derive(Clone, Debug)]
pub struct EnvironmentParams {
    pub common: CommonSpec,
    pub finish: Finish,
}

impl TemplatePipeline for EnvironmentGenerator {
    type Params = EnvironmentParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Environment
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<EnvironmentParams, GeneratorError> {
        Ok(EnvironmentParams {
            common: CommonSpec::from_generic(generic, profile)?,
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: EnvironmentParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<EnvironmentParams>, GeneratorError> {
        // Capacity means guests hosted, not sitters on one piece; the
        // single-piece clamp does not apply to the ground plane
        let capacity = params.common.capacity;
        let mut warnings = params.common.apply_standard_adjustments(generic, profile);
        warnings.retain(|w| w.field != "capacity");
        params.common.capacity = capacity;
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &EnvironmentParams,
        profile: &CulturalProfile,
    ) -> DimensionSet {
        let mut overall = params.common.scaled_dimensions(ArtifactKind::Environment, profile);
        // The ground plane grows with headcount rather than formality
        if params.common.dimension_override.is_none() {
            let needed = f64::from(params.common.capacity) * PER_GUEST_AREA_M2;
            if needed > overall.footprint_m2() {
                let scale = (needed / overall.footprint_m2()).sqrt();
                overall.width *= scale;
                overall.depth *= scale;
            }
        }
        DimensionSet {
            overall,
            surface_height: None,
            leg_thickness_m: 0.0,
            back_angle_deg: 0.0,
            extras: BTreeMap::new(),
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &EnvironmentParams,
        _jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let mut root = GeometryNode::group("environment");
        root.push(GeometryNode::primitive(
            "ground",
            PrimitiveShape::Box,
            dims.overall,
            Transform::at(Vec3::new(0.0, -dims.overall.height / 2.0, 0.0)),
            StructuralRole::Base,
        ));
        // Edge markers delimit the usable zone at each side midpoint
        let hw = dims.overall.width / 2.0;
        let hd = dims.overall.depth / 2.0;
        let mut markers = GeometryNode::group("zone-markers");
        for (i, (x, z)) in [(0.0, hd), (0.0, -hd), (hw, 0.0), (-hw, 0.0)].iter().enumerate() {
            markers.push(GeometryNode::primitive(
                format!("marker-{i}"),
                PrimitiveShape::Cylinder,
                Dimensions::new(0.08, 0.4, 0.08),
                Transform::at(Vec3::new(*x, 0.2, *z)),
                StructuralRole::Accessory,
            ));
        }
        root.push(markers);
        if params.common.venue == Venue::Outdoor {
            root.push(GeometryNode::primitive(
                "drainage-bed",
                PrimitiveShape::Box,
                Dimensions::new(dims.overall.width, 0.03, dims.overall.depth),
                Transform::at(Vec3::new(0.0, -dims.overall.height - 0.015, 0.0)),
                StructuralRole::Base,
            ));
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &EnvironmentParams) {
        let ground = if params.common.venue == Venue::Outdoor {
            MaterialAssignment::structural(Material::Stone, Finish::Natural)
        } else {
            MaterialAssignment::structural(params.common.material, params.finish)
        };
        root.visit_primitives_mut(&mut |_, _, _, material| {
            *material = Some(ground);
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &EnvironmentParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3)
    }

    fn metadata_extensions(
        &self,
        dims: &DimensionSet,
        _params: &EnvironmentParams,
    ) -> Vec<(String, String)> {
        vec![("ground_area_m2".into(), format!("{:.1}", dims.overall.footprint_m2()))]
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
    fn ground_plane_scales_with_headcount() {
        let ctx = make_ctx();
        let profile = ctx.cultures.profile(&CultureId::new("french")).unwrap();
        let generic =
            ParametricParameters::new(ArtifactKind::Environment, CultureId::new("french"))
                .with_capacity(16);
        let converted = EnvironmentGenerator.convert(&ctx, &generic, profile).unwrap();
        let mut adjusted = converted.clone();
        let _ = adjusted.common.apply_standard_adjustments(&generic, profile);
        let dims = EnvironmentGenerator.calculate_dimensions(&adjusted, profile);
        assert!(dims.overall.footprint_m2() >= 16.0 * PER_GUEST_AREA_M2 - 1e-9);
    }

    #[test]
    fn outdoor_ground_adds_drainage() {
        let ctx = make_ctx();
        let indoor =
            ParametricParameters::new(ArtifactKind::Environment, CultureId::new("japanese"));
        let outdoor = indoor.clone().with_venue(Venue::Outdoor);
        let a = EnvironmentGenerator.generate(&ctx, &indoor).unwrap();
        let b = EnvironmentGenerator.generate(&ctx, &outdoor).unwrap();
        assert_eq!(b.component_count(), a.component_count() + 1);
    }
}
