//! Lighting generator: lanterns, standing fixtures, and string-light posts.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use crate::DECORATIVE_THRESHOLD;
use atelier_culture::CulturalProfile;
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, Material, MaterialAssignment,
    ParametricParameters, PrimitiveShape, StructuralRole, Transform, Vec3, Venue,
};
use std::collections::BTreeMap;

const COST_RATE_PER_M3: f64 = 2400.0;

/// Fixture families the generator realizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixtureStyle {
    /// Enclosed shade on a short base (floor or tabletop lantern)
    Lantern,
    /// Tall pole with a head, for walkway and perimeter light
    Standing,
    /// Post pair intended to carry string lights between artifacts
    StringPost,
}

impl FixtureStyle {
    fn as_str(&self) -> &'static str {
        match self {
            FixtureStyle::Lantern => "lantern",
            FixtureStyle::Standing => "standing",
            FixtureStyle::StringPost => "string-post",
        }
    }
}

pub struct LightingGenerator;

#[derive(Clone, Debug)]
pub struct LightingParams {
    pub common: CommonSpec,
    pub fixture: FixtureStyle,
    /// Outdoor fixtures carry a weather canopy over the shade
    pub weather_shielded: bool,
    pub finish: Finish,
    pub motifs: Vec<String>,
}

impl TemplatePipeline for LightingGenerator {
    type Params = LightingParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Lighting
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<LightingParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        let fixture = match generic.extras.get("fixture").map(String::as_str) {
            Some("lantern") => FixtureStyle::Lantern,
            Some("string-post") | Some("string") => FixtureStyle::StringPost,
            Some("standing") | None => FixtureStyle::Standing,
            Some(other) => {
                return Err(GeneratorError::InvalidParameters {
                    kind: ArtifactKind::Lighting,
                    message: format!("unknown fixture style '{other}'"),
                })
            }
        };
        Ok(LightingParams {
            common,
            fixture,
            weather_shielded: generic.venue == Venue::Outdoor,
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
            motifs: profile.decorative_motifs.clone(),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: LightingParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<LightingParams>, GeneratorError> {
        let warnings = params.common.apply_standard_adjustments(generic, profile);
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &LightingParams,
        profile: &CulturalProfile,
    ) -> DimensionSet {
        let ratios = profile.proportions_for(ArtifactKind::Lighting);
        let mut overall = params.common.scaled_dimensions(ArtifactKind::Lighting, profile);
        if params.common.dimension_override.is_none() {
            match params.fixture {
                FixtureStyle::Lantern => overall.height *= 0.45,
                FixtureStyle::StringPost => overall.height *= 1.4,
                FixtureStyle::Standing => {}
            }
        }
        let mut extras = BTreeMap::new();
        extras.insert("shade_height".into(), overall.height * 0.25);
        DimensionSet {
            overall,
            surface_height: None,
            leg_thickness_m: 0.05 * ratios.leg_thickness_ratio,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &LightingParams,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let mut root = GeometryNode::group("lighting");
        let shade_height = dims.extra("shade_height").unwrap_or(0.3);
        let pole_height = dims.overall.height - shade_height;
        let t = dims.leg_thickness_m;

        root.push(GeometryNode::primitive(
            "base",
            PrimitiveShape::Cylinder,
            Dimensions::new(dims.overall.width, 0.05, dims.overall.depth),
            Transform::at(Vec3::new(0.0, 0.025, 0.0)),
            StructuralRole::Base,
        ));
        root.push(GeometryNode::primitive(
            "pole",
            PrimitiveShape::Cylinder,
            Dimensions::new(t, pole_height, t),
            Transform::at(Vec3::new(0.0, pole_height / 2.0, 0.0)),
            StructuralRole::Support,
        ));
        root.push(GeometryNode::primitive(
            "shade",
            match params.fixture {
                FixtureStyle::Lantern => PrimitiveShape::Box,
                FixtureStyle::Standing => PrimitiveShape::Cylinder,
                FixtureStyle::StringPost => PrimitiveShape::Sphere,
            },
            Dimensions::new(dims.overall.width * 0.8, shade_height, dims.overall.depth * 0.8),
            Transform::at(Vec3::new(0.0, pole_height + shade_height / 2.0, 0.0)),
            StructuralRole::Accessory,
        ));
        if params.weather_shielded {
            root.push(GeometryNode::primitive(
                "weather-cap",
                PrimitiveShape::Cone,
                Dimensions::new(dims.overall.width, 0.08, dims.overall.depth),
                Transform::at(Vec3::new(0.0, dims.overall.height + 0.04, 0.0)),
                StructuralRole::Canopy,
            ));
        }

        if params.common.decorative_intensity >= DECORATIVE_THRESHOLD {
            let count = (params.common.decorative_intensity * 3.0).round() as usize;
            let mut trims = GeometryNode::group("trims");
            for i in 0..count {
                let motif = jitter.pick(&params.motifs).map(String::as_str).unwrap_or("trim");
                trims.push(GeometryNode::ornament(
                    format!("{motif}-{i}"),
                    PrimitiveShape::Panel,
                    Dimensions::new(0.06, 0.1, 0.01),
                    Transform::at(Vec3::new(0.0, pole_height * (0.3 + 0.2 * i as f64), t))
                        .with_rotation(jitter.rotation()),
                ));
            }
            root.push(trims);
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &LightingParams) {
        let structural = MaterialAssignment::structural(params.common.material, params.finish);
        // Shades diffuse: paper for wood fixtures, glass otherwise
        let shade_material = if params.common.material.is_wood() {
            Material::Paper
        } else {
            Material::Glass
        };
        let shade = MaterialAssignment::accent(shade_material, Finish::Natural);
        root.visit_primitives_mut(&mut |name, _role, decorative, material| {
            *material = Some(if name == "shade" {
                shade
            } else if decorative {
                MaterialAssignment::accent(params.common.material, Finish::Lacquered)
            } else {
                structural
            });
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &LightingParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3)
    }

    fn metadata_extensions(
        &self,
        dims: &DimensionSet,
        params: &LightingParams,
    ) -> Vec<(String, String)> {
        vec![
            ("fixture".into(), params.fixture.as_str().into()),
            ("height_m".into(), format!("{:.2}", dims.overall.height)),
        ]
    }
}
