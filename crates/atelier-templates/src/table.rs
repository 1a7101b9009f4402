//! Table generator: dining, ceremonial, and low floor tables.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use crate::DECORATIVE_THRESHOLD;
use atelier_culture::{CulturalProfile, EdgeStyle, GroupOrientation, LegStyle};
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, MaterialAssignment, ParametricParameters,
    PrimitiveShape, StructuralRole, Transform, Vec3,
};
use std::collections::BTreeMap;

const TOP_THICKNESS_M: f64 = 0.04;
const BASE_LEG_THICKNESS_M: f64 = 0.07;
/// Sitters the base tabletop comfortably serves.
const BASE_SEATS: u32 = 6;
const COST_RATE_PER_M3: f64 = 1100.0;

pub struct TableGenerator;

#[derive(Clone, Debug)]
pub struct TableParams {
    pub common: CommonSpec,
    pub leg_style: LegStyle,
    pub edge_style: EdgeStyle,
    /// Round tabletop for circular-orientation cultures
    pub round_top: bool,
    pub finish: Finish,
    pub motifs: Vec<String>,
}

impl TemplatePipeline for TableGenerator {
    type Params = TableParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Table
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<TableParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        let round_top = match generic.extras.get("top_shape").map(String::as_str) {
            Some("round") => true,
            Some(_) => false,
            None => profile.group_orientation == Some(GroupOrientation::Circular),
        };
        Ok(TableParams {
            common,
            leg_style: profile.styles.leg_style,
            edge_style: profile.styles.edge_style,
            round_top,
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
            motifs: profile.decorative_motifs.clone(),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: TableParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<TableParams>, GeneratorError> {
        let warnings = params.common.apply_standard_adjustments(generic, profile);
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(&self, params: &TableParams, profile: &CulturalProfile) -> DimensionSet {
        let ratios = profile.proportions_for(ArtifactKind::Table);
        let mut overall = params.common.scaled_dimensions(ArtifactKind::Table, profile);
        if params.common.capacity > BASE_SEATS && params.common.dimension_override.is_none() {
            let seat_scale = f64::from(params.common.capacity) / f64::from(BASE_SEATS);
            if params.round_top {
                // Round tops grow in both plan directions
                let radial = seat_scale.sqrt();
                overall.width *= radial;
                overall.depth *= radial;
            } else {
                overall.width *= seat_scale;
            }
        }
        let surface_height = params.common.scaled_surface_height(ArtifactKind::Table, profile);
        let mut extras = BTreeMap::new();
        extras.insert("top_thickness".into(), TOP_THICKNESS_M);
        DimensionSet {
            overall,
            surface_height,
            leg_thickness_m: BASE_LEG_THICKNESS_M * ratios.leg_thickness_ratio,
            back_angle_deg: 0.0,
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &TableParams,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let top_y = dims.surface_height.unwrap_or(dims.overall.height);
        let mut root = GeometryNode::group("table");

        root.push(GeometryNode::primitive(
            "tabletop",
            if params.round_top { PrimitiveShape::Cylinder } else { PrimitiveShape::Box },
            Dimensions::new(dims.overall.width, TOP_THICKNESS_M, dims.overall.depth),
            Transform::at(Vec3::new(0.0, top_y, 0.0)),
            StructuralRole::Surface,
        ));
        root.push(supports(dims, top_y, params));

        if params.edge_style == EdgeStyle::Ornate {
            root.push(GeometryNode::ornament(
                "edge-trim",
                PrimitiveShape::Panel,
                Dimensions::new(dims.overall.width, 0.03, 0.02),
                Transform::at(Vec3::new(0.0, top_y - 0.03, dims.overall.depth / 2.0)),
            ));
        }

        if params.common.decorative_intensity >= DECORATIVE_THRESHOLD {
            let count = (params.common.decorative_intensity * 3.0).round() as usize;
            let mut inlays = GeometryNode::group("inlays");
            for i in 0..count {
                let motif =
                    jitter.pick(&params.motifs).map(String::as_str).unwrap_or("inlay");
                inlays.push(GeometryNode::ornament(
                    format!("{motif}-{i}"),
                    PrimitiveShape::Panel,
                    Dimensions::new(0.12, 0.005, 0.12),
                    Transform::at(Vec3::new(
                        jitter.offset(dims.overall.width * 0.3),
                        top_y + TOP_THICKNESS_M / 2.0,
                        jitter.offset(dims.overall.depth * 0.3),
                    )),
                ));
            }
            root.push(inlays);
        }
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &TableParams) {
        let structural = MaterialAssignment::structural(params.common.material, params.finish);
        let accent = MaterialAssignment::accent(params.common.material, Finish::Lacquered);
        root.visit_primitives_mut(&mut |_, _, decorative, material| {
            *material = Some(if decorative { accent } else { structural });
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &TableParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3)
    }

    fn metadata_extensions(
        &self,
        dims: &DimensionSet,
        params: &TableParams,
    ) -> Vec<(String, String)> {
        vec![
            ("leg_style".into(), params.leg_style.as_str().into()),
            (
                "top_shape".into(),
                if params.round_top { "round" } else { "rectangular" }.into(),
            ),
            (
                "surface_height_m".into(),
                format!("{:.2}", dims.surface_height.unwrap_or(0.0)),
            ),
        ]
    }
}

fn supports(dims: &DimensionSet, top_y: f64, params: &TableParams) -> GeometryNode {
    let mut group = GeometryNode::group("supports");
    let height = top_y - TOP_THICKNESS_M / 2.0;
    let t = dims.leg_thickness_m;
    match params.leg_style {
        LegStyle::Pedestal => group.push(GeometryNode::primitive(
            "pedestal",
            PrimitiveShape::Cylinder,
            Dimensions::new(t * 4.0, height, t * 4.0),
            Transform::at(Vec3::new(0.0, height / 2.0, 0.0)),
            StructuralRole::Support,
        )),
        LegStyle::Trestle => {
            for (name, x_sign) in [("trestle-left", -1.0), ("trestle-right", 1.0)] {
                group.push(GeometryNode::primitive(
                    name,
                    PrimitiveShape::Panel,
                    Dimensions::new(t, height, dims.overall.depth * 0.85),
                    Transform::at(Vec3::new(
                        x_sign * (dims.overall.width / 2.0 - t * 2.0),
                        height / 2.0,
                        0.0,
                    )),
                    StructuralRole::Support,
                ));
            }
        }
        style => {
            let shape = match style {
                LegStyle::Tapered | LegStyle::Splayed => PrimitiveShape::Cone,
                LegStyle::Turned | LegStyle::Cabriole => PrimitiveShape::Cylinder,
                _ => PrimitiveShape::Box,
            };
            let dx = dims.overall.width / 2.0 - t;
            let dz = dims.overall.depth / 2.0 - t;
            for (i, (x, z)) in [(-dx, dz), (dx, dz), (-dx, -dz), (dx, -dz)].iter().enumerate() {
                group.push(GeometryNode::primitive(
                    format!("leg-{i}"),
                    shape,
                    Dimensions::new(t, height, t),
                    Transform::at(Vec3::new(*x, height / 2.0, *z)),
                    StructuralRole::Support,
                ));
            }
        }
    }
    group
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

    fn top_height(root: &GeometryNode) -> f64 {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.name() == "tabletop" {
                return node.transform().position.y;
            }
            stack.extend(node.children());
        }
        panic!("tabletop primitive missing");
    }

    #[test]
    fn japanese_table_is_floor_level() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Table, CultureId::new("japanese"));
        let artifact = TableGenerator.generate(&ctx, &params).unwrap();
        let y = top_height(&artifact.root);
        // 0.75 base x 0.89 ratio x 0.52 kind scale
        assert!(y < 0.4, "expected a low table, got {y}");
    }

    #[test]
    fn french_table_stays_at_dining_height() {
        let ctx = make_ctx();
        let params = ParametricParameters::new(ArtifactKind::Table, CultureId::new("french"));
        let artifact = TableGenerator.generate(&ctx, &params).unwrap();
        assert!(top_height(&artifact.root) > 0.6);
    }

    #[test]
    fn circular_culture_defaults_to_round_top() {
        let ctx = make_ctx();
        let profile = ctx.cultures.profile(&CultureId::new("moroccan")).unwrap();
        let generic = ParametricParameters::new(ArtifactKind::Table, CultureId::new("moroccan"));
        let converted = TableGenerator.convert(&ctx, &generic, profile).unwrap();
        assert!(converted.round_top);
    }

    #[test]
    fn capacity_scales_tabletop() {
        let ctx = make_ctx();
        let profile = ctx.cultures.profile(&CultureId::new("french")).unwrap();
        let small = ParametricParameters::new(ArtifactKind::Table, CultureId::new("french"));
        let large = small.clone().with_capacity(12);
        let d_small = TableGenerator.calculate_dimensions(
            &TableGenerator.convert(&ctx, &small, profile).unwrap(),
            profile,
        );
        let d_large = TableGenerator.calculate_dimensions(
            &TableGenerator.convert(&ctx, &large, profile).unwrap(),
            profile,
        );
        assert!(d_large.overall.width > d_small.overall.width);
        assert_eq!(d_large.surface_height, d_small.surface_height);
    }
}
