//! Placement algorithms and layout derivation.

use crate::error::LayoutError;
use atelier_culture::{CulturalProfile, GroupOrientation};
use atelier_types::{ArtifactKind, Dimensions, SpaceDimensions, Vec3};
use serde::{Deserialize, Serialize};

/// Clear margin kept between neighbouring clearance cells, metres.
const SPACING_MARGIN_M: f64 = 0.5;

/// Width of derived pathways; sized for wheelchair passage.
const PATHWAY_WIDTH_M: f64 = 1.2;

/// One instance the planner must place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementInstance {
    pub kind: ArtifactKind,
    pub footprint: Dimensions,
    /// Clear-and-safe radius required around the instance; 0 when none
    pub fall_zone_radius_m: f64,
}

impl PlacementInstance {
    pub fn new(kind: ArtifactKind, footprint: Dimensions) -> Self {
        Self { kind, footprint, fall_zone_radius_m: 0.0 }
    }

    pub fn with_fall_zone(mut self, radius_m: f64) -> Self {
        self.fall_zone_radius_m = radius_m.max(0.0);
        self
    }

    /// Radius of the clearance circle that must stay inside the space and
    /// clear of other instances: the larger of the fall zone and the
    /// footprint's circumscribed radius.
    fn clearance_radius(&self) -> f64 {
        let half_diagonal =
            (self.footprint.width.hypot(self.footprint.depth)) / 2.0;
        self.fall_zone_radius_m.max(half_diagonal)
    }

    /// Square cell edge used for spacing arithmetic.
    fn cell_edge(&self) -> f64 {
        self.clearance_radius() * 2.0 + SPACING_MARGIN_M
    }
}

/// A placed instance: where it goes and which way it faces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index into the input instance list
    pub index: usize,
    pub kind: ArtifactKind,
    pub position: Vec3,
    pub rotation_y_deg: f64,
}

/// A clear-and-safe circle recorded in the layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FallZone {
    pub center: Vec3,
    pub radius_m: f64,
}

/// A derived circulation path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub start: Vec3,
    pub end: Vec3,
    pub width_m: f64,
}

/// The algorithm actually used for a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementAlgorithm {
    Circular,
    Linear,
    Conversational,
    RowPacking,
}

/// The planner's output: positions, safety circles, circulation, access.
/// Derived per orchestration call and discarded after assembly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub algorithm: PlacementAlgorithm,
    pub placements: Vec<Placement>,
    pub fall_zones: Vec<FallZone>,
    pub pathways: Vec<Pathway>,
    /// Accessibility access points on the space perimeter
    pub access_points: Vec<Vec3>,
}

/// Place every instance inside `space` using the culture's preferred group
/// orientation, falling back to deterministic row packing.
///
/// The coordinate frame is centred on the space: x spans ±width/2, z spans
/// ±depth/2, y is up. Fails with the computed minimum footprint when the
/// instances cannot fit.
pub fn compute_layout(
    instances: &[PlacementInstance],
    space: SpaceDimensions,
    profile: &CulturalProfile,
) -> Result<Layout, LayoutError> {
    ensure_total_fit(instances, space)?;

    let algorithm = match profile.group_orientation {
        Some(GroupOrientation::Circular) => PlacementAlgorithm::Circular,
        Some(GroupOrientation::Linear) => PlacementAlgorithm::Linear,
        Some(GroupOrientation::Conversational) => PlacementAlgorithm::Conversational,
        None => PlacementAlgorithm::RowPacking,
    };

    let placements = match algorithm {
        PlacementAlgorithm::Circular => place_circular(instances, space)?,
        PlacementAlgorithm::Linear => place_linear(instances, space)?,
        PlacementAlgorithm::Conversational => {
            place_conversational(instances, space, profile.social_distance_m)?
        }
        PlacementAlgorithm::RowPacking => place_rows(instances, space)?,
    };

    let fall_zones = instances
        .iter()
        .zip(&placements)
        .filter(|(inst, _)| inst.fall_zone_radius_m > 0.0)
        .map(|(inst, placement)| FallZone {
            center: placement.position,
            radius_m: inst.fall_zone_radius_m,
        })
        .collect();

    let layout = Layout {
        algorithm,
        placements,
        fall_zones,
        pathways: derive_pathways(space),
        access_points: derive_access_points(space),
    };

    debug_assert!(fall_zones_disjoint(&layout.fall_zones));
    tracing::debug!(
        algorithm = ?layout.algorithm,
        placed = layout.placements.len(),
        "layout computed"
    );
    Ok(layout)
}

/// Quick aggregate feasibility check before any placement runs. Cheap
/// fail-fast: total cell area (split 4:3) must fit the space.
fn ensure_total_fit(
    instances: &[PlacementInstance],
    space: SpaceDimensions,
) -> Result<(), LayoutError> {
    let total_area: f64 = instances.iter().map(|i| i.cell_edge().powi(2)).sum();
    if total_area <= 0.0 {
        return Ok(());
    }
    let width = (total_area * 4.0 / 3.0).sqrt();
    let required = SpaceDimensions::new(width, total_area / width);
    if space.area_m2() + 1e-9 < total_area {
        return Err(LayoutError::InsufficientSpace { required, available: space });
    }
    Ok(())
}

/// Equal angular spacing around the space centre, facing inward.
fn place_circular(
    instances: &[PlacementInstance],
    space: SpaceDimensions,
) -> Result<Vec<Placement>, LayoutError> {
    let n = instances.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let max_cell = instances.iter().map(PlacementInstance::cell_edge).fold(0.0, f64::max);
    if n == 1 {
        // A lone instance sits at the centre; its clearance cell still has
        // to fit the space in both dimensions
        if max_cell > space.width_m || max_cell > space.depth_m {
            return Err(LayoutError::InsufficientSpace {
                required: SpaceDimensions::new(max_cell, max_cell),
                available: space,
            });
        }
        return Ok(vec![Placement {
            index: 0,
            kind: instances[0].kind,
            position: Vec3::ZERO,
            rotation_y_deg: 0.0,
        }]);
    }

    // Ring must give neighbours a full cell of chord distance
    let half_angle = std::f64::consts::PI / n as f64;
    let radius = (max_cell / (2.0 * half_angle.sin())).max(max_cell);

    let max_clearance =
        instances.iter().map(PlacementInstance::clearance_radius).fold(0.0, f64::max);
    let needed = 2.0 * (radius + max_clearance) + SPACING_MARGIN_M;
    if needed > space.width_m.min(space.depth_m) {
        return Err(LayoutError::InsufficientSpace {
            required: SpaceDimensions::new(needed, needed),
            available: space,
        });
    }

    Ok(instances
        .iter()
        .enumerate()
        .map(|(i, inst)| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            let position = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
            // Face the centroid
            let rotation_y_deg = (angle.to_degrees() + 180.0) % 360.0;
            Placement { index: i, kind: inst.kind, position, rotation_y_deg }
        })
        .collect())
}

/// Equal spacing along the x axis, all facing +z.
fn place_linear(
    instances: &[PlacementInstance],
    space: SpaceDimensions,
) -> Result<Vec<Placement>, LayoutError> {
    let total_width: f64 = instances.iter().map(PlacementInstance::cell_edge).sum();
    let max_depth = instances
        .iter()
        .map(|i| i.clearance_radius() * 2.0)
        .fold(0.0, f64::max);
    if total_width > space.width_m || max_depth > space.depth_m {
        return Err(LayoutError::InsufficientSpace {
            required: SpaceDimensions::new(total_width, max_depth),
            available: space,
        });
    }

    let mut placements = Vec::with_capacity(instances.len());
    let mut cursor = -total_width / 2.0;
    for (i, inst) in instances.iter().enumerate() {
        let cell = inst.cell_edge();
        placements.push(Placement {
            index: i,
            kind: inst.kind,
            position: Vec3::new(cursor + cell / 2.0, 0.0, 0.0),
            rotation_y_deg: 0.0,
        });
        cursor += cell;
    }
    Ok(placements)
}

/// Facing pairs across the culture's social distance, pairs laid out along
/// the x axis.
fn place_conversational(
    instances: &[PlacementInstance],
    space: SpaceDimensions,
    social_distance_m: f64,
) -> Result<Vec<Placement>, LayoutError> {
    let pair_count = instances.len().div_ceil(2);
    let max_cell = instances.iter().map(PlacementInstance::cell_edge).fold(0.0, f64::max);
    let total_width = max_cell * pair_count as f64;
    let needed_depth = social_distance_m + 2.0 * max_cell;
    if total_width > space.width_m || needed_depth > space.depth_m {
        return Err(LayoutError::InsufficientSpace {
            required: SpaceDimensions::new(total_width, needed_depth),
            available: space,
        });
    }

    let offset = social_distance_m / 2.0 + max_cell / 2.0;
    Ok(instances
        .iter()
        .enumerate()
        .map(|(i, inst)| {
            let pair = (i / 2) as f64;
            let x = -total_width / 2.0 + max_cell / 2.0 + pair * max_cell;
            let (z, rotation) = if i % 2 == 0 {
                (-offset, 0.0) // facing +z, toward its partner
            } else {
                (offset, 180.0)
            };
            Placement {
                index: i,
                kind: inst.kind,
                position: Vec3::new(x, 0.0, z),
                rotation_y_deg: rotation,
            }
        })
        .collect())
}

/// Deterministic row packing: fill a row until the space width is exhausted,
/// then start the next row one aisle further along z.
fn place_rows(
    instances: &[PlacementInstance],
    space: SpaceDimensions,
) -> Result<Vec<Placement>, LayoutError> {
    let mut placements = Vec::with_capacity(instances.len());
    let mut cursor_x = -space.width_m / 2.0;
    let mut cursor_z = -space.depth_m / 2.0;
    let mut row_depth: f64 = 0.0;

    for (i, inst) in instances.iter().enumerate() {
        let cell = inst.cell_edge();
        // A cell wider than the space would survive the row reset below and
        // spill past +x; reject it outright
        if cell > space.width_m || cell > space.depth_m {
            return Err(LayoutError::InsufficientSpace {
                required: SpaceDimensions::new(cell, cell),
                available: space,
            });
        }
        if cursor_x + cell > space.width_m / 2.0 {
            // Next row
            cursor_x = -space.width_m / 2.0;
            cursor_z += row_depth + PATHWAY_WIDTH_M;
            row_depth = 0.0;
        }
        if cursor_z + cell > space.depth_m / 2.0 {
            let required_depth = cursor_z + cell + space.depth_m / 2.0;
            return Err(LayoutError::InsufficientSpace {
                required: SpaceDimensions::new(space.width_m, required_depth),
                available: space,
            });
        }
        placements.push(Placement {
            index: i,
            kind: inst.kind,
            position: Vec3::new(cursor_x + cell / 2.0, 0.0, cursor_z + cell / 2.0),
            rotation_y_deg: 0.0,
        });
        cursor_x += cell;
        row_depth = row_depth.max(cell);
    }
    Ok(placements)
}

/// One central circulation path along the depth axis.
fn derive_pathways(space: SpaceDimensions) -> Vec<Pathway> {
    vec![Pathway {
        start: Vec3::new(0.0, 0.0, -space.depth_m / 2.0),
        end: Vec3::new(0.0, 0.0, space.depth_m / 2.0),
        width_m: PATHWAY_WIDTH_M,
    }]
}

/// Access points at the midpoint of each perimeter edge.
fn derive_access_points(space: SpaceDimensions) -> Vec<Vec3> {
    let half_w = space.width_m / 2.0;
    let half_d = space.depth_m / 2.0;
    vec![
        Vec3::new(0.0, 0.0, -half_d),
        Vec3::new(0.0, 0.0, half_d),
        Vec3::new(-half_w, 0.0, 0.0),
        Vec3::new(half_w, 0.0, 0.0),
    ]
}

fn fall_zones_disjoint(zones: &[FallZone]) -> bool {
    for (i, a) in zones.iter().enumerate() {
        for b in zones.iter().skip(i + 1) {
            if a.center.distance_xz(&b.center) < a.radius_m + b.radius_m {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_culture::canonical;

    fn chairs(n: usize) -> Vec<PlacementInstance> {
        (0..n)
            .map(|_| {
                PlacementInstance::new(
                    ArtifactKind::Seating,
                    Dimensions::new(0.5, 0.9, 0.5),
                )
            })
            .collect()
    }

    fn play_equipment() -> Vec<PlacementInstance> {
        vec![
            PlacementInstance::new(ArtifactKind::Playground, Dimensions::new(3.0, 2.0, 3.0))
                .with_fall_zone(1.83),
            PlacementInstance::new(ArtifactKind::Playground, Dimensions::new(2.0, 2.0, 2.0))
                .with_fall_zone(2.4),
        ]
    }

    #[test]
    fn circular_culture_gets_a_circular_layout() {
        let profile = canonical::moroccan_profile();
        let layout =
            compute_layout(&chairs(6), SpaceDimensions::new(20.0, 20.0), &profile).unwrap();
        assert_eq!(layout.algorithm, PlacementAlgorithm::Circular);
        assert_eq!(layout.placements.len(), 6);

        // Everyone equidistant from the centroid
        let r0 = layout.placements[0].position.distance_xz(&Vec3::ZERO);
        for p in &layout.placements {
            assert!((p.position.distance_xz(&Vec3::ZERO) - r0).abs() < 1e-9);
        }
    }

    #[test]
    fn linear_culture_lines_instances_up() {
        let profile = canonical::japanese_profile();
        let layout =
            compute_layout(&chairs(4), SpaceDimensions::new(20.0, 10.0), &profile).unwrap();
        assert_eq!(layout.algorithm, PlacementAlgorithm::Linear);
        for p in &layout.placements {
            assert!(p.position.z.abs() < 1e-9, "linear layout keeps z at 0");
        }
        // Strictly increasing x
        for pair in layout.placements.windows(2) {
            assert!(pair[0].position.x < pair[1].position.x);
        }
    }

    #[test]
    fn conversational_pairs_face_each_other() {
        let profile = canonical::scandinavian_profile();
        let layout =
            compute_layout(&chairs(4), SpaceDimensions::new(20.0, 12.0), &profile).unwrap();
        assert_eq!(layout.algorithm, PlacementAlgorithm::Conversational);
        let a = &layout.placements[0];
        let b = &layout.placements[1];
        assert!((a.rotation_y_deg - b.rotation_y_deg).abs() == 180.0);
        assert!(
            a.position.distance_xz(&b.position) >= profile.social_distance_m - 1e-9,
            "pair closer than the social distance"
        );
    }

    #[test]
    fn no_preference_falls_back_to_row_packing() {
        let mut profile = canonical::mexican_profile();
        profile.group_orientation = None;
        let layout =
            compute_layout(&chairs(8), SpaceDimensions::new(8.0, 12.0), &profile).unwrap();
        assert_eq!(layout.algorithm, PlacementAlgorithm::RowPacking);
        assert_eq!(layout.placements.len(), 8);
    }

    #[test]
    fn fall_zones_never_overlap() {
        let mut profile = canonical::mexican_profile();
        profile.group_orientation = None;
        let layout =
            compute_layout(&play_equipment(), SpaceDimensions::new(25.0, 25.0), &profile)
                .unwrap();
        assert_eq!(layout.fall_zones.len(), 2);
        assert!(fall_zones_disjoint(&layout.fall_zones));
    }

    #[test]
    fn undersized_space_names_the_minimum() {
        let profile = canonical::moroccan_profile();
        let err = compute_layout(&play_equipment(), SpaceDimensions::new(3.0, 3.0), &profile)
            .unwrap_err();
        match err {
            LayoutError::InsufficientSpace { required, available } => {
                assert!(required.width_m > available.width_m);
            }
        }
    }

    #[test]
    fn pathways_and_access_points_are_derived() {
        let profile = canonical::french_profile();
        let layout =
            compute_layout(&chairs(2), SpaceDimensions::new(10.0, 10.0), &profile).unwrap();
        assert_eq!(layout.pathways.len(), 1);
        assert!(layout.pathways[0].width_m >= 1.2, "pathway must be wheelchair passable");
        assert_eq!(layout.access_points.len(), 4);
    }

    #[test]
    fn layout_is_deterministic() {
        let profile = canonical::moroccan_profile();
        let a = compute_layout(&chairs(5), SpaceDimensions::new(20.0, 20.0), &profile).unwrap();
        let b = compute_layout(&chairs(5), SpaceDimensions::new(20.0, 20.0), &profile).unwrap();
        assert_eq!(a, b);
    }

    fn bulky_playground() -> Vec<PlacementInstance> {
        vec![
            PlacementInstance::new(ArtifactKind::Playground, Dimensions::new(3.0, 2.0, 3.0))
                .with_fall_zone(2.25),
        ]
    }

    #[test]
    fn narrow_space_rejects_a_lone_oversized_instance() {
        // Total area fits, but the clearance cell is wider than the space
        let profile = canonical::moroccan_profile();
        let err = compute_layout(&bulky_playground(), SpaceDimensions::new(3.0, 30.0), &profile)
            .unwrap_err();
        match err {
            LayoutError::InsufficientSpace { required, available } => {
                assert!(required.width_m > available.width_m);
            }
        }
    }

    #[test]
    fn row_packing_rejects_a_cell_wider_than_the_space() {
        let mut profile = canonical::mexican_profile();
        profile.group_orientation = None;
        let err = compute_layout(&bulky_playground(), SpaceDimensions::new(3.0, 30.0), &profile)
            .unwrap_err();
        match err {
            LayoutError::InsufficientSpace { required, available } => {
                assert!(required.width_m > available.width_m);
            }
        }
    }

    #[test]
    fn placements_and_clearances_stay_inside_the_space() {
        let mut rows = canonical::mexican_profile();
        rows.group_orientation = None;
        let cases: Vec<(Vec<PlacementInstance>, SpaceDimensions, CulturalProfile)> = vec![
            (chairs(6), SpaceDimensions::new(20.0, 20.0), canonical::moroccan_profile()),
            (bulky_playground(), SpaceDimensions::new(12.0, 12.0), canonical::moroccan_profile()),
            (chairs(4), SpaceDimensions::new(20.0, 10.0), canonical::japanese_profile()),
            (chairs(4), SpaceDimensions::new(20.0, 12.0), canonical::scandinavian_profile()),
            (play_equipment(), SpaceDimensions::new(25.0, 25.0), rows),
        ];
        for (instances, space, profile) in cases {
            let layout = compute_layout(&instances, space, &profile).unwrap();
            for p in &layout.placements {
                let clearance = instances[p.index].clearance_radius();
                assert!(
                    p.position.x.abs() + clearance <= space.width_m / 2.0 + 1e-9,
                    "{:?} placement at x={} with clearance {} leaves a {}m wide space",
                    layout.algorithm,
                    p.position.x,
                    clearance,
                    space.width_m
                );
                assert!(
                    p.position.z.abs() + clearance <= space.depth_m / 2.0 + 1e-9,
                    "{:?} placement at z={} with clearance {} leaves a {}m deep space",
                    layout.algorithm,
                    p.position.z,
                    clearance,
                    space.depth_m
                );
            }
        }
    }

    #[test]
    fn empty_instance_list_is_fine() {
        let profile = canonical::moroccan_profile();
        let layout = compute_layout(&[], SpaceDimensions::new(5.0, 5.0), &profile).unwrap();
        assert!(layout.placements.is_empty());
        assert!(layout.fall_zones.is_empty());
    }
}
