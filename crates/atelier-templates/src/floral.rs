//! Floral generator: centerpieces, garlands, and standing arrangements.
//!
//! Floral work is decoration-first: the structural vessel is a small part of
//! the artifact and most primitives are ornaments drawn from the culture's
//! ceremonial palette.

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

const COST_RATE_PER_M3: f64 = 3200.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrangementStyle {
    /// Low tabletop arrangement
    Centerpiece,
    /// Horizontal strand for rails and doorways
    Garland,
    /// Free-standing pedestal arrangement
    Standing,
}

impl ArrangementStyle {
    fn as_str(&self) -> &'static str {
        match self {
            ArrangementStyle::Centerpiece => "centerpiece",
            ArrangementStyle::Garland => "garland",
            ArrangementStyle::Standing => "standing",
        }
    }
}

pub struct FloralGenerator;

#[derive(Clone, Debug)]
pub struct FloralParams {
    pub common: CommonSpec,
    pub arrangement: ArrangementStyle,
    /// Ceremonial palette when the occasion calls for it, everyday palette
    /// otherwise
    pub colors: Vec<String>,
    pub finish: Finish,
    pub motifs: Vec<String>,
}

impl TemplatePipeline for FloralGenerator {
    type Params = FloralParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Floral
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<FloralParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        let arrangement = match generic.extras.get("arrangement").map(String::as_str) {
            Some("centerpiece") => ArrangementStyle::Centerpiece,
            Some("garland") => ArrangementStyle::Garland,
            Some("standing") | None => ArrangementStyle::Standing,
            Some(other) => {
                return Err(GeneratorError::InvalidParameters {
                    kind: ArtifactKind::Floral,
                    message: format!("unknown arrangement style '{other}'"),
                })
            }
        };
        let ceremonial = generic
            .extras
            .get("occasion")
            .is_some_and(|o| o == "ceremonial" || o == "ceremony");
        let colors = if ceremonial && !profile.ceremonial.ceremonial_colors.is_empty() {
            profile.ceremonial.ceremonial_colors.clone()
        } else {
            profile.palette.clone()
        };
        Ok(FloralParams {
            common,
            arrangement,
            colors,
            finish: Finish::Natural,
            motifs: profile.decorative_motifs.clone(),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: FloralParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<FloralParams>, GeneratorError> {
        let warnings = params.common.apply_standard_adjustments(generic, profile);
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &FloralParams,
        profile: &CulturalProfile,
    ) -> DimensionSet {
        let mut overall = params.common.scaled_dimensions(ArtifactKind::Floral, profile);
        if params.common.dimension_override.is_none() {
            match params.arrangement {
                ArrangementStyle::Centerpiece => overall.height *= 0.35,
                ArrangementStyle::Garland => {
                    overall.width *= 4.0;
                    overall.height *= 0.2;
                }
                ArrangementStyle::Standing => {}
            }
        }
        let mut extras = BTreeMap::new();
        extras.insert("vessel_height".into(), overall.height * 0.3);
        DimensionSet {
            overall,
            surface_height: None,
            leg_thickness_m: 0.03,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &FloralParams,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let mut root = GeometryNode::group("floral");
        let vessel_height = dims.extra("vessel_height").unwrap_or(0.2);

        if params.arrangement != ArrangementStyle::Garland {
            root.push(GeometryNode::primitive(
                "vessel",
                PrimitiveShape::Cylinder,
                Dimensions::new(dims.overall.width * 0.4, vessel_height, dims.overall.depth * 0.4),
                Transform::at(Vec3::new(0.0, vessel_height / 2.0, 0.0)),
                StructuralRole::Base,
            ));
        } else {
            root.push(GeometryNode::primitive(
                "strand",
                PrimitiveShape::Cylinder,
                Dimensions::new(dims.overall.width, 0.02, 0.02),
                Transform::at(Vec3::new(0.0, dims.overall.height, 0.0)),
                StructuralRole::Support,
            ));
        }

        // Blooms always attach; intensity drives density, floor of three so
        // even a restrained arrangement reads as floral
        let count = 3 + (params.common.decorative_intensity * 9.0).round() as usize;
        let mut blooms = GeometryNode::group("blooms");
        for i in 0..count {
            let motif = jitter.pick(&params.motifs).map(String::as_str).unwrap_or("bloom");
            let y = match params.arrangement {
                ArrangementStyle::Garland => dims.overall.height + jitter.offset(0.05),
                _ => vessel_height + (dims.overall.height - vessel_height) * 0.6
                    + jitter.offset(dims.overall.height * 0.2),
            };
            blooms.push(GeometryNode::ornament(
                format!("{motif}-{i}"),
                PrimitiveShape::Sphere,
                Dimensions::new(0.1, 0.1, 0.1),
                Transform::at(Vec3::new(
                    jitter.offset(dims.overall.width * 0.45),
                    y,
                    jitter.offset(dims.overall.depth * 0.3),
                )),
            ));
        }
        root.push(blooms);
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &FloralParams) {
        let vessel = MaterialAssignment::structural(Material::Ceramic, params.finish);
        let bloom = MaterialAssignment::accent(Material::Silk, Finish::Natural);
        root.visit_primitives_mut(&mut |_, role, decorative, material| {
            *material = Some(if decorative {
                bloom
            } else if role == StructuralRole::Base {
                vessel
            } else {
                MaterialAssignment::structural(params.common.material, params.finish)
            });
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &FloralParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3)
    }

    fn metadata_extensions(
        &self,
        _dims: &DimensionSet,
        params: &FloralParams,
    ) -> Vec<(String, String)> {
        vec![
            ("arrangement".into(), params.arrangement.as_str().into()),
            ("palette".into(), params.colors.join(",")),
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
    fn ceremonial_occasion_switches_to_ceremonial_palette() {
        let ctx = make_ctx();
        let profile = ctx.cultures.profile(&CultureId::new("indian")).unwrap();
        let plain = ParametricParameters::new(ArtifactKind::Floral, CultureId::new("indian"));
        let ceremonial = plain.clone().with_extra("occasion", "ceremonial");
        let a = FloralGenerator.convert(&ctx, &plain, profile).unwrap();
        let b = FloralGenerator.convert(&ctx, &ceremonial, profile).unwrap();
        assert_eq!(a.colors, profile.palette);
        assert_eq!(b.colors, profile.ceremonial.ceremonial_colors);
    }

    #[test]
    fn restrained_arrangement_still_has_blooms() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Floral, CultureId::new("japanese"))
            .with_decorative_intensity(0.0);
        let artifact = FloralGenerator.generate(&ctx, &params).unwrap();
        assert!(artifact.decorative_count() >= 3);
    }

    #[test]
    fn garland_is_wide_and_flat() {
        let ctx = make_ctx();
        let profile = ctx.cultures.profile(&CultureId::new("mexican")).unwrap();
        let generic = ParametricParameters::new(ArtifactKind::Floral, CultureId::new("mexican"))
            .with_extra("arrangement", "garland");
        let converted = FloralGenerator.convert(&ctx, &generic, profile).unwrap();
        let dims = FloralGenerator.calculate_dimensions(&converted, profile);
        assert!(dims.overall.width > dims.overall.height * 4.0);
    }
}
