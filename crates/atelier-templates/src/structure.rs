//! Structure generator: pavilions and tent frames that enclose a scene.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use crate::DECORATIVE_THRESHOLD;
use atelier_culture::CulturalProfile;
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, Material, MaterialAssignment,
    ParametricParameters, PrimitiveShape, StructuralRole, Transform, Vec3,
};
use std::collections::BTreeMap;

const COST_RATE_PER_M3: f64 = 90.0;
/// Covered area per sheltered guest.
const PER_GUEST_COVER_M2: f64 = 1.5;

pub struct StructureGenerator;

#[derive(Clone, Debug)]
pub struct StructureParams {
    pub common: CommonSpec,
    /// Fabric tent rather than a rigid pavilion
    pub tented: bool,
    pub finish: Finish,
    pub motifs: Vec<String>,
}

impl TemplatePipeline for StructureGenerator {
    type Params = StructureParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Structure
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<StructureParams, GeneratorError> {
        Ok(StructureParams {
            common: CommonSpec::from_generic(generic, profile)?,
            tented: generic.extras.get("structure").map(String::as_str) == Some("tent"),
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
            motifs: profile.decorative_motifs.clone(),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: StructureParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<StructureParams>, GeneratorError> {
        // Capacity means guests sheltered; skip the single-piece clamp
        let capacity = params.common.capacity;
        let mut warnings = params.common.apply_standard_adjustments(generic, profile);
        warnings.retain(|w| w.field != "capacity");
        params.common.capacity = capacity;
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &StructureParams,
        profile: &CulturalProfile,
    ) -> DimensionSet {
        let mut overall = params.common.scaled_dimensions(ArtifactKind::Structure, profile);
        if params.common.dimension_override.is_none() {
            let needed = f64::from(params.common.capacity) * PER_GUEST_COVER_M2;
            if needed > overall.footprint_m2() {
                let scale = (needed / overall.footprint_m2()).sqrt();
                overall.width *= scale;
                overall.depth *= scale;
            }
        }
        let mut extras = BTreeMap::new();
        extras.insert("eave_height".into(), overall.height * 0.75);
        DimensionSet {
            overall,
            surface_height: None,
            leg_thickness_m: 0.15,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &StructureParams,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let mut root = GeometryNode::group("structure");
        let eave = dims.extra("eave_height").unwrap_or(dims.overall.height * 0.75);
        let t = dims.leg_thickness_m;
        let dx = dims.overall.width / 2.0 - t;
        let dz = dims.overall.depth / 2.0 - t;

        let mut posts = GeometryNode::group("posts");
        for (i, (x, z)) in [(-dx, dz), (dx, dz), (-dx, -dz), (dx, -dz)].iter().enumerate() {
            posts.push(GeometryNode::primitive(
                format!("post-{i}"),
                PrimitiveShape::Cylinder,
                Dimensions::new(t, eave, t),
                Transform::at(Vec3::new(*x, eave / 2.0, *z)),
                StructuralRole::Support,
            ));
        }
        root.push(posts);

        root.push(GeometryNode::primitive(
            "roof",
            if params.tented { PrimitiveShape::Cone } else { PrimitiveShape::Panel },
            Dimensions::new(
                dims.overall.width * 1.1,
                dims.overall.height - eave,
                dims.overall.depth * 1.1,
            ),
            Transform::at(Vec3::new(0.0, eave + (dims.overall.height - eave) / 2.0, 0.0)),
            StructuralRole::Canopy,
        ));

        if params.common.decorative_intensity >= DECORATIVE_THRESHOLD {
            let count = (params.common.decorative_intensity * 4.0).round() as usize;
            let mut finials = GeometryNode::group("finials");
            for i in 0..count {
                let motif = jitter.pick(&params.motifs).map(String::as_str).unwrap_or("finial");
                finials.push(GeometryNode::ornament(
                    format!("{motif}-{i}"),
                    PrimitiveShape::Cone,
                    Dimensions::new(0.12, 0.25, 0.12),
                    Transform::at(Vec3::new(
                        jitter.offset(dims.overall.width * 0.45),
                        dims.overall.height + 0.1,
                        jitter.offset(dims.overall.depth * 0.45),
                    )),
                ));
            }
            root.push(finials);
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &StructureParams) {
        let frame = MaterialAssignment::structural(params.common.material, params.finish);
        let roof = if params.tented {
            MaterialAssignment::structural(Material::Fabric, Finish::Natural)
        } else {
            frame
        };
        root.visit_primitives_mut(&mut |name, _, decorative, material| {
            *material = Some(if name == "roof" {
                roof
            } else if decorative {
                MaterialAssignment::accent(params.common.material, Finish::Lacquered)
            } else {
                frame
            });
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &StructureParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3)
    }

    fn metadata_extensions(
        &self,
        dims: &DimensionSet,
        params: &StructureParams,
    ) -> Vec<(String, String)> {
        vec![
            ("style".into(), if params.tented { "tent" } else { "pavilion" }.into()),
            ("covered_area_m2".into(), format!("{:.1}", dims.overall.footprint_m2())),
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
    fn tent_roof_is_fabric() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Structure, CultureId::new("indian"))
            .with_extra("structure", "tent");
        let mut artifact = StructureGenerator.generate(&ctx, &params).unwrap();
        let mut roof = None;
        artifact.root.visit_primitives_mut(&mut |name, _, _, material| {
            if name == "roof" {
                roof = material.map(|m| m.material);
            }
        });
        assert_eq!(roof, Some(Material::Fabric));
    }

    #[test]
    fn cover_grows_with_capacity() {
        let ctx = make_ctx();
        let profile = ctx.cultures.profile(&CultureId::new("mexican")).unwrap();
        let generic =
            ParametricParameters::new(ArtifactKind::Structure, CultureId::new("mexican"))
                .with_capacity(10);
        let converted = StructureGenerator.convert(&ctx, &generic, profile).unwrap();
        let dims = StructureGenerator.calculate_dimensions(&converted, profile);
        assert!(dims.overall.footprint_m2() >= 10.0 * PER_GUEST_COVER_M2 - 1e-9);
    }
}
