//! Seating generator: chairs, benches, and floor seating.
//!
//! Capacity above one widens the piece into a bench rather than producing
//! multiple pieces; multi-piece arrangements are the orchestrator's job.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use crate::pipeline::{
    volume_cost, Adjusted, CommonSpec, DimensionSet, GeneratorContext, TemplatePipeline,
};
use crate::DECORATIVE_THRESHOLD;
use atelier_culture::{BackStyle, CulturalProfile, LegStyle, SeatStyle};
use atelier_types::{
    ArtifactKind, Dimensions, Finish, GeometryNode, Material, MaterialAssignment,
    ParametricParameters, PrimitiveShape, StructuralRole, Transform, Vec3,
};
use std::collections::BTreeMap;

const SEAT_THICKNESS_M: f64 = 0.05;
const BASE_LEG_THICKNESS_M: f64 = 0.05;
const COST_RATE_PER_M3: f64 = 900.0;

pub struct SeatingGenerator;

#[derive(Clone, Debug)]
pub struct SeatingParams {
    pub common: CommonSpec,
    pub leg_style: LegStyle,
    pub back_style: BackStyle,
    pub seat_style: SeatStyle,
    pub has_back: bool,
    pub has_armrests: bool,
    pub finish: Finish,
    pub motifs: Vec<String>,
}

impl TemplatePipeline for SeatingGenerator {
    type Params = SeatingParams;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Seating
    }

    fn convert(
        &self,
        _ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<SeatingParams, GeneratorError> {
        let common = CommonSpec::from_generic(generic, profile)?;
        Ok(SeatingParams {
            common,
            leg_style: profile.styles.leg_style,
            back_style: profile.styles.back_style,
            seat_style: profile.styles.seat_style,
            has_back: generic.extras.get("backless").map(String::as_str) != Some("true"),
            has_armrests: generic.extras.get("armrests").map(String::as_str) == Some("true"),
            finish: profile.materials.finishes.first().copied().unwrap_or(Finish::Natural),
            motifs: profile.decorative_motifs.clone(),
        })
    }

    fn validate_and_adjust(
        &self,
        _ctx: &GeneratorContext,
        mut params: SeatingParams,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<SeatingParams>, GeneratorError> {
        let warnings = params.common.apply_standard_adjustments(generic, profile);
        Ok(Adjusted { params, warnings })
    }

    fn calculate_dimensions(
        &self,
        params: &SeatingParams,
        profile: &CulturalProfile,
    ) -> DimensionSet {
        let ratios = profile.proportions_for(ArtifactKind::Seating);
        let mut overall = params.common.scaled_dimensions(ArtifactKind::Seating, profile);
        // Bench widening: each extra sitter adds one seat width
        if params.common.capacity > 1 && params.common.dimension_override.is_none() {
            overall.width *= f64::from(params.common.capacity);
        }
        let surface_height = params.common.scaled_surface_height(ArtifactKind::Seating, profile);
        let seat_y = surface_height.unwrap_or(overall.height * 0.5);

        let mut extras = BTreeMap::new();
        extras.insert("seat_thickness".into(), SEAT_THICKNESS_M);
        if params.has_back {
            extras.insert("back_height".into(), (overall.height - seat_y).max(0.1));
        }
        DimensionSet {
            overall,
            surface_height,
            leg_thickness_m: BASE_LEG_THICKNESS_M * ratios.leg_thickness_ratio,
            back_angle_deg: if params.has_back { ratios.back_angle_deg } else { 0.0 },
            extras,
        }
    }

    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &SeatingParams,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode {
        let seat_y = dims.surface_height.unwrap_or(dims.overall.height * 0.5);
        let mut root = GeometryNode::group("seating");

        root.push(GeometryNode::primitive(
            "seat",
            seat_shape(params.seat_style),
            Dimensions::new(dims.overall.width, SEAT_THICKNESS_M, dims.overall.depth),
            Transform::at(Vec3::new(0.0, seat_y, 0.0)),
            StructuralRole::Surface,
        ));

        root.push(support_group(dims, seat_y, params.leg_style));

        if params.has_back {
            let back_height = dims.extra("back_height").unwrap_or(0.3);
            root.push(GeometryNode::primitive(
                "back",
                back_shape(params.back_style),
                Dimensions::new(dims.overall.width, back_height, 0.03),
                Transform::at(Vec3::new(0.0, seat_y + back_height / 2.0, -dims.overall.depth / 2.0))
                    .with_rotation(dims.back_angle_deg),
                StructuralRole::Back,
            ));
        }

        if params.has_armrests {
            let arm_y = seat_y + 0.22;
            for (name, x_sign) in [("armrest-left", -1.0), ("armrest-right", 1.0)] {
                root.push(GeometryNode::primitive(
                    name,
                    PrimitiveShape::Box,
                    Dimensions::new(0.05, 0.04, dims.overall.depth * 0.8),
                    Transform::at(Vec3::new(x_sign * dims.overall.width / 2.0, arm_y, 0.0)),
                    StructuralRole::Accessory,
                ));
            }
        }

        attach_ornaments(&mut root, dims, params, jitter);
        root
    }

    fn apply_materials(&self, root: &mut GeometryNode, params: &SeatingParams) {
        let structural = MaterialAssignment::structural(params.common.material, params.finish);
        let accent = accent_for(params.common.material, params.finish);
        root.visit_primitives_mut(&mut |_, _, decorative, material| {
            *material = Some(if decorative { accent } else { structural });
        });
    }

    fn estimate_cost(&self, dims: &DimensionSet, params: &SeatingParams) -> f64 {
        volume_cost(dims, &params.common, COST_RATE_PER_M3)
    }

    fn metadata_extensions(
        &self,
        _dims: &DimensionSet,
        params: &SeatingParams,
    ) -> Vec<(String, String)> {
        vec![
            ("leg_style".into(), params.leg_style.as_str().into()),
            ("back_style".into(), params.back_style.as_str().into()),
            ("capacity".into(), params.common.capacity.to_string()),
        ]
    }
}

fn seat_shape(style: SeatStyle) -> PrimitiveShape {
    match style {
        SeatStyle::Flat | SeatStyle::Woven => PrimitiveShape::Box,
        SeatStyle::Contoured => PrimitiveShape::Panel,
        SeatStyle::Upholstered | SeatStyle::Cushioned => PrimitiveShape::Box,
    }
}

fn back_shape(style: BackStyle) -> PrimitiveShape {
    match style {
        BackStyle::Straight | BackStyle::Ladder | BackStyle::Slat => PrimitiveShape::Panel,
        BackStyle::Curved | BackStyle::Carved | BackStyle::Open => PrimitiveShape::Panel,
    }
}

/// Four corner legs for leg styles, a single pedestal or paired trestles
/// otherwise.
fn support_group(dims: &DimensionSet, seat_y: f64, style: LegStyle) -> GeometryNode {
    let mut supports = GeometryNode::group("supports");
    let leg_height = seat_y - SEAT_THICKNESS_M / 2.0;
    let t = dims.leg_thickness_m;
    match style {
        LegStyle::Pedestal => {
            supports.push(GeometryNode::primitive(
                "pedestal",
                PrimitiveShape::Cylinder,
                Dimensions::new(t * 3.0, leg_height, t * 3.0),
                Transform::at(Vec3::new(0.0, leg_height / 2.0, 0.0)),
                StructuralRole::Support,
            ));
        }
        LegStyle::Trestle => {
            for (name, z_sign) in [("trestle-front", 1.0), ("trestle-rear", -1.0)] {
                supports.push(GeometryNode::primitive(
                    name,
                    PrimitiveShape::Panel,
                    Dimensions::new(dims.overall.width * 0.9, leg_height, t),
                    Transform::at(Vec3::new(
                        0.0,
                        leg_height / 2.0,
                        z_sign * (dims.overall.depth / 2.0 - t),
                    )),
                    StructuralRole::Support,
                ));
            }
        }
        _ => {
            let shape = match style {
                LegStyle::Tapered | LegStyle::Splayed => PrimitiveShape::Cone,
                LegStyle::Turned | LegStyle::Cabriole => PrimitiveShape::Cylinder,
                _ => PrimitiveShape::Box,
            };
            let dx = dims.overall.width / 2.0 - t;
            let dz = dims.overall.depth / 2.0 - t;
            for (i, (x, z)) in [(-dx, dz), (dx, dz), (-dx, -dz), (dx, -dz)].iter().enumerate() {
                supports.push(GeometryNode::primitive(
                    format!("leg-{i}"),
                    shape,
                    Dimensions::new(t, leg_height, t),
                    Transform::at(Vec3::new(*x, leg_height / 2.0, *z)),
                    StructuralRole::Support,
                ));
            }
        }
    }
    supports
}

fn attach_ornaments(
    root: &mut GeometryNode,
    dims: &DimensionSet,
    params: &SeatingParams,
    jitter: &mut DecorativeJitter,
) {
    if params.common.decorative_intensity < DECORATIVE_THRESHOLD {
        return;
    }
    let count = (params.common.decorative_intensity * 4.0).round() as usize;
    let mut ornaments = GeometryNode::group("ornaments");
    for i in 0..count {
        let motif = jitter
            .pick(&params.motifs)
            .map(String::as_str)
            .unwrap_or("carving");
        let mut node = GeometryNode::ornament(
            format!("{motif}-{i}"),
            PrimitiveShape::Panel,
            Dimensions::new(0.08, 0.08, 0.01),
            Transform::at(Vec3::new(
                jitter.offset(dims.overall.width * 0.4),
                dims.surface_height.unwrap_or(0.4) + 0.1,
                -dims.overall.depth / 2.0 + 0.02,
            )),
        );
        node.transform_mut().rotation_y_deg = jitter.offset(8.0);
        ornaments.push(node);
    }
    root.push(ornaments);
}

fn accent_for(structural: Material, finish: Finish) -> MaterialAssignment {
    // Accent with a contrasting family: wood gets lacquered detail, anything
    // else gets natural wood trim
    if structural.is_wood() {
        MaterialAssignment::accent(structural, Finish::Lacquered)
    } else {
        MaterialAssignment::accent(Material::Walnut, finish)
    }
}
