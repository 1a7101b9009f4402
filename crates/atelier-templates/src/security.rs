//! Security generator: crowd barriers and perimeter fencing.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use atelier_culture::CulturalProfile;
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, Material, MaterialAssignment,
    ParametricParameters, PrimitiveShape, StructuralRole, Transform, Vec3,
};
use std::collections::BTreeMap;

const COST_RATE_PER_M3: f64 = 350.0;
/// Guests one barrier run (segment) manages along a perimeter.
const GUESTS_PER_SEGMENT: u32 = 20;

pub struct SecurityGenerator;

#[derive(Clone, Debug)]
pub struct SecurityParams {
    pub common: CommonSpec,
    pub segment_count: u32,
    /// Leave a gap every n segments for access
    pub access_gaps: u32,
    pub finish: Finish,
}

impl TemplatePipeline for SecurityGenerator {
    type Params = SecurityParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Security
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<SecurityParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        let segment_count = common.capacity.div_ceil(GUESTS_PER_SEGMENT).max(4);
        Ok(SecurityParams {
            common,
            segment_count,
            access_gaps: segment_count.div_ceil(8).max(2),
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: SecurityParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<SecurityParams>, GeneratorError> {
        // Capacity means guests managed, not sitters; the single-piece
        // clamp does not apply
        let capacity = params.common.capacity;
        let mut warnings = params.common.apply_standard_adjustments(generic, profile);
        warnings.retain(|w| w.field != "capacity");
        params.common.capacity = capacity;
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &SecurityParams,
        profile: &CulturalProfile,
    ) -> DimensionSet {
        let overall = params.common.scaled_dimensions(ArtifactKind::Security, profile);
        let mut extras = BTreeMap::new();
        extras.insert("segment_count".into(), f64::from(params.segment_count));
        DimensionSet {
            overall,
            surface_height: None,
            leg_thickness_m: 0.05,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &SecurityParams,
        _jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let mut root = GeometryNode::group("security");
        let gap_every = (params.segment_count / params.access_gaps.max(1)).max(2);
        let mut placed = 0u32;
        for i in 0..params.segment_count {
            // Access gap: skip the segment but keep the rhythm
            if (i + 1) % gap_every == 0 {
                continue;
            }
            let x = f64::from(i) * (dims.overall.width + 0.1);
            let mut segment = GeometryNode::group(format!("segment-{placed}"));
            segment.transform_mut().position = Vec3::new(x, 0.0, 0.0);
            segment.push(GeometryNode::primitive(
                "panel",
                PrimitiveShape::Panel,
                dims.overall,
                Transform::at(Vec3::new(0.0, dims.overall.height / 2.0, 0.0)),
                StructuralRole::Barrier,
            ));
            for (j, foot_x) in [-dims.overall.width / 2.0, dims.overall.width / 2.0]
                .iter()
                .enumerate()
            {
                segment.push(GeometryNode::primitive(
                    format!("foot-{j}"),
                    PrimitiveShape::Box,
                    Dimensions::new(0.3, 0.05, 0.3),
                    Transform::at(Vec3::new(*foot_x, 0.025, 0.0)),
                    StructuralRole::Base,
                ));
            }
            root.push(segment);
            placed += 1;
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &SecurityParams) {
        let barrier = MaterialAssignment::structural(Material::Steel, params.finish);
        root.visit_primitives_mut(&mut |_, _, _, material| {
            *material = Some(barrier);
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &SecurityParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3) * f64::from(params.segment_count)
    }

    fn metadata_extensions(
        &self,
        _dims: &DimensionSet,
        params: &SecurityParams,
    ) -> Vec<(String, String)> {
        vec![
            ("segment_count".into(), params.segment_count.to_string()),
            ("access_gaps".into(), params.access_gaps.to_string()),
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
    fn segment_count_tracks_crowd_size() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Security, CultureId::new("french"))
            .with_capacity(150);
        let artifact = SecurityGenerator.generate(&ctx, &params).unwrap();
        assert_eq!(artifact.metadata.extensions["segment_count"], "8");
    }

    #[test]
    fn perimeter_always_leaves_access_gaps() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Security, CultureId::new("japanese"))
            .with_capacity(200);
        let artifact = SecurityGenerator.generate(&ctx, &params).unwrap();
        let segments: u32 = artifact.metadata.extensions["segment_count"].parse().unwrap();
        // Placed segments are fewer than the nominal count because gaps are
        // skipped
        let groups = artifact.root.children().len() as u32;
        assert!(groups < segments);
    }
}
