//! Material and finish vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed material vocabulary generators assign to structural roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Oak,
    Walnut,
    Pine,
    Cedar,
    Teak,
    Bamboo,
    Rattan,
    Paper,
    Silk,
    Fabric,
    Leather,
    Metal,
    Steel,
    WroughtIron,
    Brass,
    Plastic,
    Stone,
    Marble,
    Ceramic,
    Glass,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Oak => "oak",
            Material::Walnut => "walnut",
            Material::Pine => "pine",
            Material::Cedar => "cedar",
            Material::Teak => "teak",
            Material::Bamboo => "bamboo",
            Material::Rattan => "rattan",
            Material::Paper => "paper",
            Material::Silk => "silk",
            Material::Fabric => "fabric",
            Material::Leather => "leather",
            Material::Metal => "metal",
            Material::Steel => "steel",
            Material::WroughtIron => "wrought_iron",
            Material::Brass => "brass",
            Material::Plastic => "plastic",
            Material::Stone => "stone",
            Material::Marble => "marble",
            Material::Ceramic => "ceramic",
            Material::Glass => "glass",
        }
    }

    /// Metals retain heat outdoors; the safety layer flags them for the
    /// youngest age groups.
    pub fn is_metal(&self) -> bool {
        matches!(
            self,
            Material::Metal | Material::Steel | Material::WroughtIron | Material::Brass
        )
    }

    pub fn is_wood(&self) -> bool {
        matches!(
            self,
            Material::Oak
                | Material::Walnut
                | Material::Pine
                | Material::Cedar
                | Material::Teak
                | Material::Bamboo
                | Material::Rattan
        )
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized material names.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized material: {0}")]
pub struct UnknownMaterial(pub String);

impl FromStr for Material {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        let material = match normalized.as_str() {
            "oak" => Material::Oak,
            "walnut" => Material::Walnut,
            "pine" => Material::Pine,
            "cedar" => Material::Cedar,
            "teak" => Material::Teak,
            "bamboo" => Material::Bamboo,
            "rattan" | "wicker" => Material::Rattan,
            "paper" | "washi" => Material::Paper,
            "silk" => Material::Silk,
            "fabric" | "textile" | "cotton" | "linen" => Material::Fabric,
            "leather" => Material::Leather,
            "metal" => Material::Metal,
            "steel" => Material::Steel,
            "wrought_iron" | "iron" => Material::WroughtIron,
            "brass" => Material::Brass,
            "plastic" => Material::Plastic,
            "stone" => Material::Stone,
            "marble" => Material::Marble,
            "ceramic" | "tile" => Material::Ceramic,
            "glass" => Material::Glass,
            other => return Err(UnknownMaterial(other.to_string())),
        };
        Ok(material)
    }
}

/// Surface finish applied per structural role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    #[default]
    Natural,
    Oiled,
    Lacquered,
    Painted,
    Stained,
    Waxed,
    Gilded,
}

impl Finish {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finish::Natural => "natural",
            Finish::Oiled => "oiled",
            Finish::Lacquered => "lacquered",
            Finish::Painted => "painted",
            Finish::Stained => "stained",
            Finish::Waxed => "waxed",
            Finish::Gilded => "gilded",
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The material + finish assigned to one primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialAssignment {
    pub material: Material,
    pub finish: Finish,
    /// Accent assignments mark ceremonial/ornamental sub-parts
    pub accent: bool,
}

impl MaterialAssignment {
    pub fn structural(material: Material, finish: Finish) -> Self {
        Self { material, finish, accent: false }
    }

    pub fn accent(material: Material, finish: Finish) -> Self {
        Self { material, finish, accent: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_and_spacing() {
        assert_eq!("Wrought Iron".parse::<Material>().unwrap(), Material::WroughtIron);
        assert_eq!("wicker".parse::<Material>().unwrap(), Material::Rattan);
        assert_eq!("washi".parse::<Material>().unwrap(), Material::Paper);
    }

    #[test]
    fn rejects_unknown_material() {
        let err = "unobtanium".parse::<Material>().unwrap_err();
        assert_eq!(err, UnknownMaterial("unobtanium".into()));
    }

    #[test]
    fn metal_classification() {
        assert!(Material::Steel.is_metal());
        assert!(!Material::Bamboo.is_metal());
        assert!(Material::Bamboo.is_wood());
    }

    #[test]
    fn accent_assignment_flags_accent() {
        let a = MaterialAssignment::accent(Material::Brass, Finish::Gilded);
        assert!(a.accent);
        let s = MaterialAssignment::structural(Material::Oak, Finish::Oiled);
        assert!(!s.accent);
    }
}
