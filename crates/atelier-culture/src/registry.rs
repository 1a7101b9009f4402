//! The culture registry: build-once, validated, immutable thereafter.

use crate::canonical;
use crate::error::CultureError;
use crate::profile::{CulturalProfile, ProportionSet};
use atelier_types::{ArtifactKind, CultureId, Material};
use std::collections::BTreeMap;

/// Immutable lookup table of cultural profiles.
///
/// Built once (validating every entry), then shared read-only behind an
/// `Arc`; generators and the orchestrator receive it explicitly rather
/// than reaching through global state.
#[derive(Clone, Debug)]
pub struct CultureRegistry {
    profiles: BTreeMap<CultureId, CulturalProfile>,
}

impl CultureRegistry {
    /// Build the registry from the canonical built-in profiles.
    pub fn builtin() -> Result<Self, CultureError> {
        Self::from_profiles(canonical::all_profiles())
    }

    /// Build a registry from an explicit profile list, validating each
    /// entry. Used by tests and by callers shipping their own tables.
    pub fn from_profiles(profiles: Vec<CulturalProfile>) -> Result<Self, CultureError> {
        let mut table = BTreeMap::new();
        for profile in profiles {
            profile.validate().map_err(|(field, message)| CultureError::InvalidProfile {
                culture: profile.culture.clone(),
                field,
                message,
            })?;
            tracing::debug!(culture = %profile.culture, "culture profile loaded");
            table.insert(profile.culture.clone(), profile);
        }
        Ok(Self { profiles: table })
    }

    /// Look up a culture's profile.
    pub fn profile(&self, culture: &CultureId) -> Result<&CulturalProfile, CultureError> {
        self.profiles
            .get(culture)
            .ok_or_else(|| CultureError::UnknownCulture { culture: culture.clone() })
    }

    /// Kind-adapted proportions for a culture.
    pub fn proportions(
        &self,
        culture: &CultureId,
        kind: ArtifactKind,
    ) -> Result<ProportionSet, CultureError> {
        Ok(self.profile(culture)?.proportions_for(kind))
    }

    /// Whether a material is on the culture's preferred or traditional list.
    pub fn is_material_appropriate(
        &self,
        material: Material,
        culture: &CultureId,
    ) -> Result<bool, CultureError> {
        Ok(self.profile(culture)?.materials.is_appropriate(material))
    }

    /// Every registered culture id.
    pub fn cultures(&self) -> impl Iterator<Item = &CultureId> {
        self.profiles.keys()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_loads_all_canonical_cultures() {
        let registry = CultureRegistry::builtin().unwrap();
        assert_eq!(registry.len(), canonical::all_profiles().len());
        assert!(registry.profile(&CultureId::new("japanese")).is_ok());
    }

    #[test]
    fn unknown_culture_is_a_typed_error() {
        let registry = CultureRegistry::builtin().unwrap();
        let err = registry.profile(&CultureId::new("atlantean")).unwrap_err();
        assert!(matches!(err, CultureError::UnknownCulture { .. }));
    }

    #[test]
    fn invalid_profile_fails_registry_construction() {
        let mut profile = canonical::japanese_profile();
        profile.palette.clear();
        let err = CultureRegistry::from_profiles(vec![profile]).unwrap_err();
        match err {
            CultureError::InvalidProfile { field, .. } => assert_eq!(field, "palette"),
            other => panic!("expected InvalidProfile, got {other:?}"),
        }
    }

    #[test]
    fn proportions_are_positive_and_bounded_for_all_cultures_and_kinds() {
        let registry = CultureRegistry::builtin().unwrap();
        for culture in registry.cultures() {
            let (min, max) = registry.profile(culture).unwrap().ratio_bounds;
            for kind in ArtifactKind::ALL {
                let p = registry.proportions(culture, kind).unwrap();
                for ratio in
                    [p.width_ratio, p.height_ratio, p.depth_ratio, p.leg_thickness_ratio]
                {
                    assert!(ratio > 0.0, "{culture}/{kind}: ratio not positive");
                    assert!(
                        (min..=max).contains(&ratio),
                        "{culture}/{kind}: ratio {ratio} outside [{min}, {max}]"
                    );
                }
            }
        }
    }

    #[test]
    fn material_appropriateness_uses_both_lists() {
        let registry = CultureRegistry::builtin().unwrap();
        let japanese = CultureId::new("japanese");
        assert!(registry.is_material_appropriate(Material::Cedar, &japanese).unwrap());
        assert!(registry.is_material_appropriate(Material::Paper, &japanese).unwrap());
        assert!(!registry.is_material_appropriate(Material::Plastic, &japanese).unwrap());
    }
}
