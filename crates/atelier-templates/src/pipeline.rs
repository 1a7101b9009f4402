//! The shared five-stage pipeline contract and its driver.
//!
//! Each generator implements [`TemplatePipeline`] with its own specialized
//! parameter type; the blanket [`ArtifactGenerator`] impl drives the stages
//! in order and assembles the final [`GeneratedArtifact`]. The driver is the
//! only place that sequences stages, so stage purity (each stage returns a
//! new value) is enforced structurally.

use crate::error::GeneratorError;
use crate::jitter::DecorativeJitter;
use atelier_culture::{AuthenticityScorer, CulturalProfile, CultureRegistry, ProportionSet};
use atelier_safety::SafetyRegistry;
use atelier_types::{
    AdjustmentWarning, AgeGroup, ArtifactKind, ArtifactMetadata, CultureId, Dimensions,
    ErgonomicProfile, Formality, GeneratedArtifact, GeometryNode, Material,
    ParametricParameters, Venue,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared read-only context every generator receives.
///
/// Registries are built once and shared without locking; nothing here is
/// mutated during generation.
#[derive(Clone)]
pub struct GeneratorContext {
    pub cultures: Arc<CultureRegistry>,
    pub safety: Arc<SafetyRegistry>,
    pub scorer: Arc<AuthenticityScorer>,
}

impl GeneratorContext {
    pub fn new(cultures: Arc<CultureRegistry>, safety: Arc<SafetyRegistry>) -> Self {
        Self {
            cultures,
            safety,
            scorer: Arc::new(AuthenticityScorer::default()),
        }
    }
}

/// Output of stage 2: the adjusted parameters plus every recorded override.
#[derive(Clone, Debug)]
pub struct Adjusted<P> {
    pub params: P,
    pub warnings: Vec<AdjustmentWarning>,
}

impl<P> Adjusted<P> {
    pub fn clean(params: P) -> Self {
        Self { params, warnings: Vec::new() }
    }
}

/// Output of stage 3: concrete sizes the geometry stage realizes.
/// Serializable so callers can log or persist the sizing decision alongside
/// the artifact.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DimensionSet {
    /// Overall bounding dimensions
    pub overall: Dimensions,
    /// Height of the primary working surface, where the kind has one
    pub surface_height: Option<f64>,
    /// Support member thickness, metres
    pub leg_thickness_m: f64,
    /// Backrest rake, degrees from vertical
    pub back_angle_deg: f64,
    /// Kind-specific named measurements
    pub extras: BTreeMap<String, f64>,
}

impl DimensionSet {
    pub fn extra(&self, key: &str) -> Option<f64> {
        self.extras.get(key).copied()
    }
}

/// The generic fields every specialized parameter set carries, after
/// cultural defaults have been filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct CommonSpec {
    pub culture: CultureId,
    pub age: AgeGroup,
    pub ergonomics: ErgonomicProfile,
    pub formality: Formality,
    pub capacity: u32,
    pub material: Material,
    pub decorative_intensity: f64,
    pub venue: Venue,
    pub dimension_override: Option<Dimensions>,
}

impl CommonSpec {
    /// Stage-1 conversion of the generic record, deriving the material from
    /// the culture's preferred list when the caller left it unset.
    pub fn from_generic(
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Self, GeneratorError> {
        let material = match generic.material {
            Some(material) => material,
            None => *profile.materials.preferred.first().ok_or_else(|| {
                GeneratorError::InvalidParameters {
                    kind: generic.kind,
                    message: format!("culture {} has no preferred materials", generic.culture),
                }
            })?,
        };
        Ok(Self {
            culture: generic.culture.clone(),
            age: generic.target_age,
            ergonomics: generic.ergonomic_profile,
            formality: generic.formality,
            capacity: generic.capacity.max(1),
            material,
            decorative_intensity: generic.decorative_intensity.clamp(0.0, 1.0),
            venue: generic.venue,
            dimension_override: generic.dimension_override,
        })
    }

    /// The adjustments every kind applies in stage 2, each with a recorded
    /// warning: unsafe material swapped, capacity clamped, formality raised
    /// to the culture's ceremonial minimum.
    pub fn apply_standard_adjustments(
        &mut self,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Vec<AdjustmentWarning> {
        let mut warnings = Vec::new();

        if self.material.is_metal() && self.age == AgeGroup::Toddler && self.venue == Venue::Outdoor
        {
            if let Some(safe) = profile
                .materials
                .preferred
                .iter()
                .find(|m| !m.is_metal())
                .copied()
            {
                warnings.push(AdjustmentWarning::new(
                    "material",
                    self.material,
                    safe,
                    "metal surfaces are a heat hazard for toddlers outdoors",
                ));
                self.material = safe;
            }
        }

        if self.capacity > profile.max_single_piece_capacity {
            warnings.push(AdjustmentWarning::new(
                "capacity",
                self.capacity,
                profile.max_single_piece_capacity,
                "capacity clamped to the culture's largest single-piece size",
            ));
            self.capacity = profile.max_single_piece_capacity;
        }

        let is_ceremonial_occasion = generic
            .extras
            .get("occasion")
            .is_some_and(|o| o == "ceremonial" || o == "ceremony");
        let minimum = profile.ceremonial.minimum_ceremonial_formality;
        if is_ceremonial_occasion && self.formality < minimum {
            warnings.push(AdjustmentWarning::new(
                "formality",
                self.formality.as_str(),
                minimum.as_str(),
                "raised to the culture's minimum for ceremonial occasions",
            ));
            self.formality = minimum;
        }

        warnings
    }

    /// Culturally scaled overall dimensions for a kind: base size x cultural
    /// ratios x age/ergonomic/formality factors. An explicit caller override
    /// is taken as final.
    pub fn scaled_dimensions(&self, kind: ArtifactKind, profile: &CulturalProfile) -> Dimensions {
        if let Some(overridden) = self.dimension_override {
            return overridden;
        }
        let base = kind.base_dimensions();
        let ratios = profile.proportions_for(kind);
        Dimensions::new(
            base.width * ratios.width_ratio * self.ergonomics.width_factor(),
            base.height
                * ratios.height_ratio
                * self.age.size_factor()
                * self.ergonomics.height_factor()
                * self.formality.dimension_adjustment(),
            base.depth * ratios.depth_ratio,
        )
    }

    /// Culturally scaled primary surface height for a kind, when it has one.
    pub fn scaled_surface_height(
        &self,
        kind: ArtifactKind,
        profile: &CulturalProfile,
    ) -> Option<f64> {
        let base = kind.base_surface_height()?;
        let ratios = profile.proportions_for(kind);
        Some(
            base * ratios.height_ratio
                * self.age.size_factor()
                * self.ergonomics.height_factor()
                * self.formality.dimension_adjustment(),
        )
    }
}

/// The typed five-stage pipeline each generator implements.
pub trait TemplatePipeline {
    /// The generator's specialized parameter set.
    type Params;

    fn kind(&self) -> ArtifactKind;

    /// Auxiliary pre-check on the raw generic record.
    fn validate_parameters(&self, generic: &ParametricParameters) -> Result<(), GeneratorError> {
        if generic.kind != self.kind() {
            return Err(GeneratorError::InvalidParameters {
                kind: self.kind(),
                message: format!("parameter record is for kind {}", generic.kind),
            });
        }
        Ok(())
    }

    /// Stage 1: adapt the generic record into the specialized set.
    fn convert(
        &self,
        ctx: &GeneratorContext,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Self::Params, GeneratorError>;

    /// Stage 2: safety-driven overrides, recorded as warnings; unresolvable
    /// combinations error with a full violation list.
    fn validate_and_adjust(
        &self,
        ctx: &GeneratorContext,
        params: Self::Params,
        generic: &ParametricParameters,
        profile: &CulturalProfile,
    ) -> Result<Adjusted<Self::Params>, GeneratorError>;

    /// Stage 3: concrete dimensions from the adjusted parameters and the
    /// cultural ratio set.
    fn calculate_dimensions(&self, params: &Self::Params, profile: &CulturalProfile)
        -> DimensionSet;

    /// Stage 4: compose the geometry tree.
    fn generate_geometry(
        &self,
        dims: &DimensionSet,
        params: &Self::Params,
        jitter: &mut DecorativeJitter,
    ) -> GeometryNode;

    /// Stage 5: assign materials per structural role.
    fn apply_materials(&self, root: &mut GeometryNode, params: &Self::Params);

    /// Auxiliary: cost estimate feeding the orchestrator's budget tracking.
    fn estimate_cost(&self, dims: &DimensionSet, params: &Self::Params) -> f64;

    /// Auxiliary: kind-specific metadata extensions.
    fn metadata_extensions(
        &self,
        _dims: &DimensionSet,
        _params: &Self::Params,
    ) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Object-safe generator contract the registry and orchestrator dispatch
/// through.
pub trait ArtifactGenerator: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    /// Run the full pipeline for one parameter record.
    fn generate(
        &self,
        ctx: &GeneratorContext,
        params: &ParametricParameters,
    ) -> Result<GeneratedArtifact, GeneratorError>;

    /// Cost estimate without generating geometry.
    fn estimate_cost(
        &self,
        ctx: &GeneratorContext,
        params: &ParametricParameters,
    ) -> Result<f64, GeneratorError>;

    /// Introspection: the culture-adapted proportions this generator would
    /// apply.
    fn cultural_proportions(
        &self,
        ctx: &GeneratorContext,
        culture: &CultureId,
    ) -> Result<ProportionSet, GeneratorError>;
}

impl<T> ArtifactGenerator for T
where
    T: TemplatePipeline + Send + Sync,
{
    fn kind(&self) -> ArtifactKind {
        TemplatePipeline::kind(self)
    }

    fn generate(
        &self,
        ctx: &GeneratorContext,
        generic: &ParametricParameters,
    ) -> Result<GeneratedArtifact, GeneratorError> {
        self.validate_parameters(generic)?;
        let profile = ctx.cultures.profile(&generic.culture)?;

        let specialized = self.convert(ctx, generic, profile)?;
        let Adjusted { params: adjusted, warnings } =
            self.validate_and_adjust(ctx, specialized, generic, profile)?;
        let dims = self.calculate_dimensions(&adjusted, profile);

        let mut jitter = DecorativeJitter::new(generic.jitter_seed);
        let mut root = self.generate_geometry(&dims, &adjusted, &mut jitter);
        self.apply_materials(&mut root, &adjusted);

        let mut metadata =
            ArtifactMetadata::new(TemplatePipeline::kind(self), generic.culture.clone());
        for (key, value) in self.metadata_extensions(&dims, &adjusted) {
            metadata.extensions.insert(key, value);
        }
        // Stage 2 errors on unresolvable violations, so reaching this point
        // means the adjusted design is compliant.
        metadata.safety_compliant = true;

        let mut artifact = GeneratedArtifact::new(metadata, root);
        artifact.warnings = warnings;
        artifact.estimated_cost = self.estimate_cost(&dims, &adjusted);
        artifact.metadata.authenticity_score = ctx.scorer.score(generic, &artifact, profile);

        tracing::debug!(
            kind = %artifact.metadata.kind,
            culture = %artifact.metadata.culture,
            components = artifact.component_count(),
            authenticity = artifact.metadata.authenticity_score,
            "artifact generated"
        );
        Ok(artifact)
    }

    fn estimate_cost(
        &self,
        ctx: &GeneratorContext,
        generic: &ParametricParameters,
    ) -> Result<f64, GeneratorError> {
        self.validate_parameters(generic)?;
        let profile = ctx.cultures.profile(&generic.culture)?;
        let specialized = self.convert(ctx, generic, profile)?;
        let Adjusted { params: adjusted, .. } =
            self.validate_and_adjust(ctx, specialized, generic, profile)?;
        let dims = self.calculate_dimensions(&adjusted, profile);
        Ok(TemplatePipeline::estimate_cost(self, &dims, &adjusted))
    }

    fn cultural_proportions(
        &self,
        ctx: &GeneratorContext,
        culture: &CultureId,
    ) -> Result<ProportionSet, GeneratorError> {
        Ok(ctx
            .cultures
            .proportions(culture, TemplatePipeline::kind(self))?)
    }
}

/// Relative cost index per material, 1.0 = pine.
///
/// Feeds the per-kind cost estimates; the orchestrator treats the resulting
/// figures as comparable across kinds, not as market prices.
pub fn material_cost_index(material: Material) -> f64 {
    match material {
        Material::Pine | Material::Plastic | Material::Paper => 1.0,
        Material::Fabric | Material::Bamboo | Material::Rattan => 1.2,
        Material::Oak | Material::Cedar | Material::Ceramic => 1.5,
        Material::Metal | Material::Steel | Material::Glass => 1.8,
        Material::Walnut | Material::Leather | Material::WroughtIron => 2.2,
        Material::Teak | Material::Brass | Material::Stone => 2.6,
        Material::Silk | Material::Marble => 3.5,
    }
}

/// Volume-and-material cost model shared by the furniture-scale generators.
pub fn volume_cost(dims: &DimensionSet, common: &CommonSpec, rate_per_m3: f64) -> f64 {
    let volume = dims.overall.width * dims.overall.height * dims.overall.depth;
    let decoration = 1.0 + 0.5 * common.decorative_intensity;
    volume * rate_per_m3 * material_cost_index(common.material) * decoration
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_culture::canonical;

    fn make_ctx() -> GeneratorContext {
        GeneratorContext::new(
            Arc::new(CultureRegistry::builtin().unwrap()),
            Arc::new(SafetyRegistry::builtin()),
        )
    }

    fn make_generic(kind: ArtifactKind) -> ParametricParameters {
        ParametricParameters::new(kind, CultureId::new("japanese"))
    }

    #[test]
    fn convert_fills_material_from_culture() {
        let profile = canonical::japanese_profile();
        let generic = make_generic(ArtifactKind::Seating);
        let common = CommonSpec::from_generic(&generic, &profile).unwrap();
        assert_eq!(common.material, Material::Cedar);
    }

    #[test]
    fn metal_for_outdoor_toddlers_is_swapped_with_warning() {
        let profile = canonical::japanese_profile();
        let generic = make_generic(ArtifactKind::Seating)
            .with_material(Material::Steel)
            .with_target_age(AgeGroup::Toddler)
            .with_venue(Venue::Outdoor);
        let mut common = CommonSpec::from_generic(&generic, &profile).unwrap();
        let warnings = common.apply_standard_adjustments(&generic, &profile);
        assert!(!common.material.is_metal());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "material");
    }

    #[test]
    fn ceremonial_occasion_raises_formality() {
        let profile = canonical::japanese_profile();
        let generic = make_generic(ArtifactKind::Seating).with_extra("occasion", "ceremonial");
        let mut common = CommonSpec::from_generic(&generic, &profile).unwrap();
        let warnings = common.apply_standard_adjustments(&generic, &profile);
        assert_eq!(common.formality, Formality::Formal);
        assert!(warnings.iter().any(|w| w.field == "formality"));
    }

    #[test]
    fn capacity_is_clamped_to_cultural_maximum() {
        let profile = canonical::japanese_profile();
        let generic = make_generic(ArtifactKind::Seating).with_capacity(50);
        let mut common = CommonSpec::from_generic(&generic, &profile).unwrap();
        common.apply_standard_adjustments(&generic, &profile);
        assert_eq!(common.capacity, profile.max_single_piece_capacity);
    }

    #[test]
    fn dimension_override_is_final() {
        let profile = canonical::japanese_profile();
        let mut generic = make_generic(ArtifactKind::Table);
        generic.dimension_override = Some(Dimensions::new(2.0, 1.0, 1.0));
        let common = CommonSpec::from_generic(&generic, &profile).unwrap();
        let dims = common.scaled_dimensions(ArtifactKind::Table, &profile);
        assert_eq!(dims, Dimensions::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn surface_height_reflects_cultural_ratio() {
        let profile = canonical::japanese_profile();
        let generic = make_generic(ArtifactKind::Table);
        let common = CommonSpec::from_generic(&generic, &profile).unwrap();
        let table = common.scaled_surface_height(ArtifactKind::Table, &profile).unwrap();
        // Japanese tables sit far lower than the 0.75m western base
        assert!(table < 0.5, "expected a low table, got {table}");
    }

    #[test]
    fn proportions_introspection_matches_registry() {
        let ctx = make_ctx();
        let generator = crate::SeatingGenerator;
        let culture = CultureId::new("moroccan");
        let via_generator = generator.cultural_proportions(&ctx, &culture).unwrap();
        let via_registry = ctx.cultures.proportions(&culture, ArtifactKind::Seating).unwrap();
        assert_eq!(via_generator, via_registry);
    }

    #[test]
    fn dimension_set_round_trips_through_json() {
        let mut extras = BTreeMap::new();
        extras.insert("tread_count".to_string(), 3.0);
        let dims = DimensionSet {
            overall: Dimensions::new(6.0, 0.6, 4.0),
            surface_height: Some(0.6),
            leg_thickness_m: 0.1,
            back_angle_deg: 0.0,
            extras,
        };
        let json = serde_json::to_string(&dims).unwrap();
        let back: DimensionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dims);
    }
}
