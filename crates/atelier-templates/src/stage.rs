//! Stage generator: raised performance decks with steps, skirting, and an
//! optional backdrop.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use crate::DECORATIVE_THRESHOLD;
use atelier_culture::CulturalProfile;
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, MaterialAssignment, ParametricParameters,
    PrimitiveShape, StructuralRole, Transform, Vec3, Venue,
};
use std::collections::BTreeMap;

const DECK_THICKNESS_M: f64 = 0.08;
/// Decks above this height get a rear guard rail.
const GUARD_RAIL_DECK_M: f64 = 0.6;
/// Performers the base deck area accommodates.
const BASE_PERFORMERS: u32 = 4;
const COST_RATE_PER_M3: f64 = 700.0;

pub struct StageGenerator;

#[derive(Clone, Debug)]
pub struct StageParams {
    pub common: CommonSpec,
    pub has_backdrop: bool,
    pub has_canopy: bool,
    pub finish: Finish,
    pub motifs: Vec<String>,
}

impl TemplatePipeline for StageGenerator {
    type Params = StageParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Stage
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<StageParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        Ok(StageParams {
            common,
            has_backdrop: generic.extras.get("backdrop").map(String::as_str) != Some("false"),
            has_canopy: generic.venue == Venue::Outdoor,
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
            motifs: profile.decorative_motifs.clone(),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: StageParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<StageParams>, GeneratorError> {
        let warnings = params.common.apply_standard_adjustments(generic, profile);
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(&self, params: &StageParams, profile: &CulturalProfile) -> DimensionSet {
        let ratios = profile.proportions_for(ArtifactKind::Stage);
        let mut overall = params.common.scaled_dimensions(ArtifactKind::Stage, profile);
        if params.common.capacity > BASE_PERFORMERS && params.common.dimension_override.is_none() {
            let scale =
                (f64::from(params.common.capacity) / f64::from(BASE_PERFORMERS)).sqrt();
            overall.width *= scale;
            overall.depth *= scale;
        }
        let surface_height = params.common.scaled_surface_height(ArtifactKind::Stage, profile);
        let mut extras = BTreeMap::new();
        extras.insert("deck_thickness".into(), DECK_THICKNESS_M);
        if params.has_backdrop {
            extras.insert("backdrop_height".into(), 2.2);
        }
        DimensionSet {
            overall,
            surface_height,
            leg_thickness_m: 0.1 * ratios.leg_thickness_ratio,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &StageParams,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let deck_y = dims.surface_height.unwrap_or(dims.overall.height);
        let mut root = GeometryNode::group("stage");

        root.push(GeometryNode::primitive(
            "deck",
            PrimitiveShape::Box,
            Dimensions::new(dims.overall.width, DECK_THICKNESS_M, dims.overall.depth),
            Transform::at(Vec3::new(0.0, deck_y, 0.0)),
            StructuralRole::Surface,
        ));
        root.push(GeometryNode::primitive(
            "skirt",
            PrimitiveShape::Panel,
            Dimensions::new(dims.overall.width, deck_y, 0.02),
            Transform::at(Vec3::new(0.0, deck_y / 2.0, dims.overall.depth / 2.0)),
            StructuralRole::Base,
        ));

        // Corner posts carry the deck
        let t = dims.leg_thickness_m;
        let dx = dims.overall.width / 2.0 - t;
        let dz = dims.overall.depth / 2.0 - t;
        let mut posts = GeometryNode::group("posts");
        for (i, (x, z)) in [(-dx, dz), (dx, dz), (-dx, -dz), (dx, -dz)].iter().enumerate() {
            posts.push(GeometryNode::primitive(
                format!("post-{i}"),
                PrimitiveShape::Box,
                Dimensions::new(t, deck_y, t),
                Transform::at(Vec3::new(*x, deck_y / 2.0, *z)),
                StructuralRole::Support,
            ));
        }
        root.push(posts);

        // Front steps, one tread per 0.2m of rise
        let treads = (deck_y / 0.2).ceil().max(1.0) as usize;
        let mut steps = GeometryNode::group("steps");
        for i in 0..treads {
            let rise = deck_y * (i as f64 + 1.0) / treads as f64;
            steps.push(GeometryNode::primitive(
                format!("tread-{i}"),
                PrimitiveShape::Box,
                Dimensions::new(1.0, 0.04, 0.3),
                Transform::at(Vec3::new(
                    0.0,
                    rise,
                    dims.overall.depth / 2.0 + 0.3 * (treads - i) as f64,
                )),
                StructuralRole::Accessory,
            ));
        }
        root.push(steps);

        if deck_y > GUARD_RAIL_DECK_M {
            root.push(GeometryNode::primitive(
                "guard-rail",
                PrimitiveShape::Panel,
                Dimensions::new(dims.overall.width, 0.9, 0.03),
                Transform::at(Vec3::new(0.0, deck_y + 0.45, -dims.overall.depth / 2.0)),
                StructuralRole::Barrier,
            ));
        }

        if params.has_backdrop {
            let backdrop_height = dims.extra("backdrop_height").unwrap_or(2.2);
            root.push(GeometryNode::primitive(
                "backdrop",
                PrimitiveShape::Panel,
                Dimensions::new(dims.overall.width, backdrop_height, 0.05),
                Transform::at(Vec3::new(
                    0.0,
                    deck_y + backdrop_height / 2.0,
                    -dims.overall.depth / 2.0 + 0.05,
                )),
                StructuralRole::Back,
            ));
        }

        if params.has_canopy {
            root.push(GeometryNode::primitive(
                "canopy",
                PrimitiveShape::Panel,
                Dimensions::new(dims.overall.width * 1.1, 0.05, dims.overall.depth * 1.1),
                Transform::at(Vec3::new(0.0, deck_y + 3.0, 0.0)),
                StructuralRole::Canopy,
            ));
        }

        if params.common.decorative_intensity >= DECORATIVE_THRESHOLD {
            let count = (params.common.decorative_intensity * 5.0).round() as usize;
            let mut banners = GeometryNode::group("banners");
            for i in 0..count {
                let motif = jitter.pick(&params.motifs).map(String::as_str).unwrap_or("banner");
                banners.push(GeometryNode::ornament(
                    format!("{motif}-{i}"),
                    PrimitiveShape::Panel,
                    Dimensions::new(0.3, 0.6, 0.01),
                    Transform::at(Vec3::new(
                        jitter.offset(dims.overall.width * 0.45),
                        deck_y + 1.2,
                        -dims.overall.depth / 2.0 + 0.1,
                    )),
                ));
            }
            root.push(banners);
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &StageParams) {
        let structural = MaterialAssignment::structural(params.common.material, params.finish);
        let fabric = MaterialAssignment::accent(atelier_types::Material::Fabric, Finish::Natural);
        root.visit_primitives_mut(&mut |name, _, decorative, material| {
            *material = Some(if decorative || name == "backdrop" || name == "canopy" {
                fabric
            } else {
                structural
            });
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &StageParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3)
    }

    fn metadata_extensions(
        &self,
        dims: &DimensionSet,
        _params: &StageParams,
    ) -> Vec<(String, String)> {
        vec![(
            "deck_height_m".into(),
            format!("{:.2}", dims.surface_height.unwrap_or(0.0)),
        )]
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

    fn has_node(root: &GeometryNode, name: &str) -> bool {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.name() == name {
                return true;
            }
            stack.extend(node.children());
        }
        false
    }

    #[test]
    fn outdoor_stage_gets_a_canopy() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Stage, CultureId::new("french"))
            .with_venue(Venue::Outdoor);
        let artifact = StageGenerator.generate(&ctx, &params).unwrap();
        assert!(has_node(&artifact.root, "canopy"));
    }

    #[test]
    fn french_raised_deck_carries_guard_rail() {
        let ctx = make_ctx();
        // French stages scale above the 0.6m base deck
        let params = ParametricParameters::new(ArtifactKind::Stage, CultureId::new("french"))
            .with_formality(atelier_types::Formality::Ceremonial);
        let artifact = StageGenerator.generate(&ctx, &params).unwrap();
        assert!(has_node(&artifact.root, "guard-rail"));
    }

    #[test]
    fn capacity_grows_deck_area_not_height() {
        let ctx = make_ctx();
        let profile = ctx.cultures.profile(&CultureId::new("mexican")).unwrap();
        let small = ParametricParameters::new(ArtifactKind::Stage, CultureId::new("mexican"));
        let large = small.clone().with_capacity(12);
        let d_small = StageGenerator
            .calculate_dimensions(&StageGenerator.convert(&ctx, &small, profile).unwrap(), profile);
        let d_large = StageGenerator
            .calculate_dimensions(&StageGenerator.convert(&ctx, &large, profile).unwrap(), profile);
        assert!(d_large.overall.footprint_m2() > d_small.overall.footprint_m2());
        assert_eq!(d_large.surface_height, d_small.surface_height);
    }
}
