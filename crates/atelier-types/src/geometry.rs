//! Geometry tree: the hierarchical group/primitive structure every generator
//! produces.
//!
//! The tree is deliberately renderer-agnostic. A primitive is a shape, a size,
//! a transform, and a structural role; an external export layer maps these to
//! whatever 3D format it serializes. The engine itself only ever walks the
//! tree to count components, assign materials, and apply composition-time
//! adjustments.

use crate::material::MaterialAssignment;
use serde::{Deserialize, Serialize};

/// A point or offset in scene space. Y is up; units are metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Horizontal (XZ-plane) distance to another point.
    pub fn distance_xz(&self, other: &Vec3) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Width × height × depth, metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self { width, height, depth }
    }

    pub fn scaled(&self, factor: f64) -> Dimensions {
        Dimensions::new(self.width * factor, self.height * factor, self.depth * factor)
    }

    pub fn footprint_m2(&self) -> f64 {
        self.width * self.depth
    }

    /// All three extents strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.depth > 0.0
    }
}

/// Placement of a node relative to its parent group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation about the vertical axis, degrees
    pub rotation_y_deg: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_y_deg: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_y_deg = degrees;
        self
    }
}

/// Renderer-agnostic primitive shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveShape {
    Box,
    Cylinder,
    Panel,
    Sphere,
    Cone,
}

/// The structural role a primitive plays inside its artifact.
///
/// Material assignment is keyed by role: supports get the structural
/// material, ornaments get the accent material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralRole {
    /// Primary working surface (seat, tabletop, deck)
    Surface,
    /// Legs, pedestals, trestles, posts
    Support,
    /// Backrest or rear panel
    Back,
    /// Armrests, storage, shelves
    Accessory,
    /// Culturally tagged decorative element
    Ornament,
    /// Safety barrier or railing
    Barrier,
    /// Overhead cover
    Canopy,
    /// Ground-contact base or platform
    Base,
}

/// One node of the geometry tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum GeometryNode {
    Group {
        name: String,
        transform: Transform,
        children: Vec<GeometryNode>,
    },
    Primitive {
        name: String,
        shape: PrimitiveShape,
        dimensions: Dimensions,
        transform: Transform,
        role: StructuralRole,
        /// Decorative sub-parts receive accent materials and count toward
        /// the decorative-intensity budget
        decorative: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        material: Option<MaterialAssignment>,
    },
}

impl GeometryNode {
    /// Create an empty named group at the origin.
    pub fn group(name: impl Into<String>) -> Self {
        GeometryNode::Group {
            name: name.into(),
            transform: Transform::default(),
            children: Vec::new(),
        }
    }

    /// Create a structural (non-decorative) primitive.
    pub fn primitive(
        name: impl Into<String>,
        shape: PrimitiveShape,
        dimensions: Dimensions,
        transform: Transform,
        role: StructuralRole,
    ) -> Self {
        GeometryNode::Primitive {
            name: name.into(),
            shape,
            dimensions,
            transform,
            role,
            decorative: false,
            material: None,
        }
    }

    /// Create a decorative primitive (culturally tagged ornament).
    pub fn ornament(
        name: impl Into<String>,
        shape: PrimitiveShape,
        dimensions: Dimensions,
        transform: Transform,
    ) -> Self {
        GeometryNode::Primitive {
            name: name.into(),
            shape,
            dimensions,
            transform,
            role: StructuralRole::Ornament,
            decorative: true,
            material: None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            GeometryNode::Group { name, .. } | GeometryNode::Primitive { name, .. } => name,
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            GeometryNode::Group { transform, .. }
            | GeometryNode::Primitive { transform, .. } => transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            GeometryNode::Group { transform, .. }
            | GeometryNode::Primitive { transform, .. } => transform,
        }
    }

    /// Append a child; no-op with a debug assertion on primitives.
    pub fn push(&mut self, child: GeometryNode) {
        match self {
            GeometryNode::Group { children, .. } => children.push(child),
            GeometryNode::Primitive { .. } => {
                debug_assert!(false, "push called on a primitive node");
            }
        }
    }

    pub fn children(&self) -> &[GeometryNode] {
        match self {
            GeometryNode::Group { children, .. } => children,
            GeometryNode::Primitive { .. } => &[],
        }
    }

    /// Total primitive count in this subtree.
    pub fn component_count(&self) -> usize {
        match self {
            GeometryNode::Primitive { .. } => 1,
            GeometryNode::Group { children, .. } => {
                children.iter().map(GeometryNode::component_count).sum()
            }
        }
    }

    /// Count of decorative primitives in this subtree.
    pub fn decorative_count(&self) -> usize {
        match self {
            GeometryNode::Primitive { decorative, .. } => usize::from(*decorative),
            GeometryNode::Group { children, .. } => {
                children.iter().map(GeometryNode::decorative_count).sum()
            }
        }
    }

    /// Walk every primitive mutably. Used by the material stage and by the
    /// orchestrator's composition-time overrides.
    pub fn visit_primitives_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&str, StructuralRole, bool, &mut Option<MaterialAssignment>),
    {
        match self {
            GeometryNode::Primitive { name, role, decorative, material, .. } => {
                visit(name, *role, *decorative, material);
            }
            GeometryNode::Group { children, .. } => {
                for child in children {
                    child.visit_primitives_mut(visit);
                }
            }
        }
    }

    /// Find a direct or nested child group by name.
    pub fn find_group(&self, name: &str) -> Option<&GeometryNode> {
        match self {
            GeometryNode::Group { name: own, children, .. } => {
                if own == name {
                    return Some(self);
                }
                children.iter().find_map(|c| c.find_group(name))
            }
            GeometryNode::Primitive { .. } => None,
        }
    }

    /// Uniformly scale this node and its subtree.
    pub fn scale_subtree(&mut self, factor: f64) {
        self.transform_mut().scale *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chair_tree() -> GeometryNode {
        let mut root = GeometryNode::group("chair");
        root.push(GeometryNode::primitive(
            "seat",
            PrimitiveShape::Box,
            Dimensions::new(0.45, 0.05, 0.45),
            Transform::default(),
            StructuralRole::Surface,
        ));
        let mut legs = GeometryNode::group("legs");
        for i in 0..4 {
            legs.push(GeometryNode::primitive(
                format!("leg-{i}"),
                PrimitiveShape::Cylinder,
                Dimensions::new(0.04, 0.42, 0.04),
                Transform::default(),
                StructuralRole::Support,
            ));
        }
        root.push(legs);
        root.push(GeometryNode::ornament(
            "carving",
            PrimitiveShape::Panel,
            Dimensions::new(0.2, 0.1, 0.01),
            Transform::default(),
        ));
        root
    }

    #[test]
    fn component_count_walks_nested_groups() {
        assert_eq!(make_chair_tree().component_count(), 6);
    }

    #[test]
    fn decorative_count_only_counts_ornaments() {
        assert_eq!(make_chair_tree().decorative_count(), 1);
    }

    #[test]
    fn find_group_descends() {
        let tree = make_chair_tree();
        assert!(tree.find_group("legs").is_some());
        assert!(tree.find_group("missing").is_none());
    }

    #[test]
    fn visit_primitives_reaches_every_leaf() {
        let mut tree = make_chair_tree();
        let mut seen = 0;
        tree.visit_primitives_mut(&mut |_, _, _, _| seen += 1);
        assert_eq!(seen, 6);
    }

    #[test]
    fn distance_xz_ignores_height() {
        let a = Vec3::new(0.0, 5.0, 0.0);
        let b = Vec3::new(3.0, 0.0, 4.0);
        assert!((a.distance_xz(&b) - 5.0).abs() < 1e-9);
    }
}
