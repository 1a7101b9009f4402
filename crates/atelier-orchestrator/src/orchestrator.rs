//! The orchestration master: eight atomic phases from event request to
//! composite scene.
//!
//! 1. cultural framework  2. master plan (space feasibility)  3. template
//! strategy  4. parameter generation  5. instantiation (dependency waves,
//! concurrent within a wave)  6. ecosystem integration  7. validation and
//! enhancement  8. assembly and report.
//!
//! Phases 1–2 fail fast before any geometry. Phase 5 aborts on critical
//! kinds and degrades gracefully on everything else. Dropping the
//! [`Orchestrator::orchestrate`] future cancels in-flight instantiation
//! tasks; no partial composite is ever observable.

use crate::error::OrchestrationError;
use crate::framework::{self, CulturalFramework};
use crate::plan::{self, OrchestrationPlan};
use crate::scoring::{self, OrchestratorConfig};
use atelier_culture::CultureRegistry;
use atelier_layout::{compute_layout, Layout, PlacementInstance};
use atelier_safety::{calculate_minimum_space, SafetyRegistry};
use atelier_templates::{GeneratorContext, GeneratorRegistry};
use atelier_types::{
    AgeGroup, ArtifactKind, CompositeArtifact, CultureId, DegradationNote, Dimensions,
    ErgonomicProfile, EventRequest, EventType, Formality, GeneratedArtifact, GeometryNode,
    OrchestrationReport, ParametricParameters, RelationshipKind, Vec3,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Fraction of the venue a playground zone may claim.
const PLAYGROUND_ZONE_FRACTION: f64 = 0.6;
/// Guests per stage performer slot.
const GUESTS_PER_PERFORMER: u32 = 25;

/// Everything one orchestration produces. Serializable as a unit so export
/// layers can ship the scene, its layout, and its report together.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OrchestrationOutcome {
    pub composite: CompositeArtifact,
    pub report: OrchestrationReport,
    pub layout: Layout,
}

/// The orchestration master. Cheap to share: all tables live behind `Arc`.
pub struct Orchestrator {
    ctx: GeneratorContext,
    generators: Arc<GeneratorRegistry>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Orchestrator over the built-in culture, safety, and generator tables.
    pub fn builtin() -> Result<Self, OrchestrationError> {
        let cultures = Arc::new(CultureRegistry::builtin()?);
        let safety = Arc::new(SafetyRegistry::builtin());
        Ok(Self {
            ctx: GeneratorContext::new(cultures, safety),
            generators: Arc::new(GeneratorRegistry::builtin()),
            config: OrchestratorConfig::default(),
        })
    }

    pub fn new(
        ctx: GeneratorContext,
        generators: Arc<GeneratorRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        Self { ctx, generators, config }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the full eight-phase orchestration under the configured deadline.
    pub async fn orchestrate(
        &self,
        request: &EventRequest,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        let timeout_ms = self.config.timeout.as_millis() as u64;
        tokio::time::timeout(self.config.timeout, self.run(request))
            .await
            .map_err(|_| OrchestrationError::Timeout { timeout_ms })?
    }

    async fn run(
        &self,
        request: &EventRequest,
    ) -> Result<OrchestrationOutcome, OrchestrationError> {
        let started = Instant::now();

        // Phase 1: cultural framework, before any geometry
        let framework = framework::establish(&self.ctx.cultures, request)?;

        // Phase 2: master plan, space feasibility first
        let required = calculate_minimum_space(request.guests.total, 0, 0.0);
        if !request.space.fits(&required) {
            return Err(OrchestrationError::InsufficientSpace {
                required_width_m: required.width_m,
                required_depth_m: required.depth_m,
                available_width_m: request.space.width_m,
                available_depth_m: request.space.depth_m,
            });
        }

        // Phase 3: template strategy
        let plan = plan::build_plan(request);
        tracing::info!(
            event = %request.event_type,
            culture = %request.primary_culture,
            required = plan.required.len(),
            optional = plan.optional.len(),
            "orchestration plan built"
        );

        // Phase 4: parameter generation per selected kind
        let parameters: BTreeMap<ArtifactKind, ParametricParameters> = plan
            .selected()
            .into_iter()
            .map(|kind| (kind, self.parameters_for(kind, request, &framework)))
            .collect();

        // Phase 5: instantiation in dependency waves
        let (mut artifacts, mut degradations) =
            self.instantiate(&plan, &parameters).await?;

        // Phase 6: ecosystem integration: spatial layout, then
        // relationship adjustments
        let layout = self.place(&mut artifacts, request, &framework)?;
        apply_relationships(&plan, &mut artifacts);

        // Phase 7: validation and enhancement
        let mut coherence = scoring::coherence_score(&collect(&artifacts));
        if coherence < self.config.coherence_threshold {
            self.corrective_pass(&mut artifacts, &parameters);
            coherence = scoring::coherence_score(&collect(&artifacts));
        }
        let accessibility = scoring::accessibility_score(request, &layout);
        let sustainability = scoring::sustainability_score();
        let spent: f64 = artifacts.values().map(|a| a.estimated_cost).sum();
        let budget_utilization = if request.budget.total > 0.0 {
            spent / request.budget.total
        } else {
            0.0
        };
        let experience = scoring::experience_score(
            &self.config.weights,
            coherence,
            accessibility,
            budget_utilization,
        );

        let mut recommendations = Vec::new();
        if budget_utilization > 1.0 {
            recommendations.push(format!(
                "estimated cost exceeds budget by {:.0}%; reduce decorative intensity or drop optional kinds",
                (budget_utilization - 1.0) * 100.0
            ));
        }
        if coherence < self.config.coherence_threshold {
            recommendations.push(format!(
                "cultural coherence {coherence:.0} is below {:.0}; prefer {} materials throughout",
                self.config.coherence_threshold,
                framework.primary.culture
            ));
        }
        for note in &degradations {
            recommendations.push(format!("{} was skipped: {}", note.kind, note.reason));
        }
        // Stage-2 adjustments belong in the report, not just the artifact
        for artifact in artifacts.values() {
            for warning in &artifact.warnings {
                recommendations.push(format!(
                    "{}: {} adjusted from {} to {} ({})",
                    artifact.metadata.kind,
                    warning.field,
                    warning.original,
                    warning.adjusted,
                    warning.reason
                ));
            }
        }

        // Phase 8: assembly in fixed z-order plus the aggregate report
        degradations.sort_by_key(|n| n.kind.assembly_layer());
        let report = OrchestrationReport {
            template_count: artifacts.len(),
            cultural_authenticity: coherence,
            sustainability_score: sustainability,
            accessibility_score: accessibility,
            experience_score: experience,
            budget_utilization,
            generation_time_ms: started.elapsed().as_millis() as u64,
            recommendations,
            cultural_notes: framework.guidelines.clone(),
            degradations,
        };
        let name = format!("{}-{}", request.primary_culture, request.event_type);
        let composite = CompositeArtifact::new(name, artifacts.into_values().collect());

        tracing::info!(
            layers = composite.layers.len(),
            coherence,
            elapsed_ms = report.generation_time_ms,
            "composite assembled"
        );
        Ok(OrchestrationOutcome { composite, report, layout })
    }

    /// Phase 4: one generic parameter record per kind, derived from the
    /// request and the framework.
    fn parameters_for(
        &self,
        kind: ArtifactKind,
        request: &EventRequest,
        framework: &CulturalFramework,
    ) -> ParametricParameters {
        // Fusion events hand the decorative kinds to the secondary culture
        let culture: CultureId = match (&framework.secondary, kind) {
            (Some(secondary), ArtifactKind::Floral | ArtifactKind::Lighting) => {
                secondary.culture.clone()
            }
            _ => framework.primary.culture.clone(),
        };
        let max_piece = framework.primary.max_single_piece_capacity;
        let capacity = match kind {
            ArtifactKind::Seating | ArtifactKind::Table => request.guests.total.min(max_piece),
            ArtifactKind::Stage => (request.guests.total / GUESTS_PER_PERFORMER).max(4),
            ArtifactKind::Playground => request.guests.children.max(4),
            ArtifactKind::Lighting | ArtifactKind::Floral => 1,
            _ => request.guests.total.max(1),
        };
        let age = if kind == ArtifactKind::Playground {
            AgeGroup::Child
        } else {
            AgeGroup::Adult
        };

        let mut params = ParametricParameters::new(kind, culture)
            .with_target_age(age)
            .with_capacity(capacity.max(1))
            .with_formality(request.formality)
            .with_venue(request.venue)
            .with_decorative_intensity(request.decorative_intensity)
            .with_jitter_seed(
                request
                    .jitter_seed
                    .wrapping_mul(31)
                    .wrapping_add(kind_ordinal(kind) + 1),
            );
        if let Some(material) = framework.lead_material() {
            params = params.with_material(material);
        }
        if request.event_type == EventType::Wedding || request.formality >= Formality::Formal {
            params = params.with_extra("occasion", "ceremonial");
        }
        if request.accessibility_required {
            params.ergonomic_profile = ErgonomicProfile::Accessible;
        }
        if kind == ArtifactKind::Playground {
            params = params
                .with_extra(
                    "space_width_m",
                    format!("{:.2}", request.space.width_m * PLAYGROUND_ZONE_FRACTION),
                )
                .with_extra(
                    "space_depth_m",
                    format!("{:.2}", request.space.depth_m * PLAYGROUND_ZONE_FRACTION),
                )
                .with_extra("equipment", "slide,swing,climbing_frame");
        }
        params
    }

    /// Phase 5: instantiate wave by wave. Kinds inside one wave run
    /// concurrently; a wave only starts after every `depends-on` primary in
    /// earlier waves succeeded.
    async fn instantiate(
        &self,
        plan: &OrchestrationPlan,
        parameters: &BTreeMap<ArtifactKind, ParametricParameters>,
    ) -> Result<(BTreeMap<ArtifactKind, GeneratedArtifact>, Vec<DegradationNote>), OrchestrationError>
    {
        let mut artifacts: BTreeMap<ArtifactKind, GeneratedArtifact> = BTreeMap::new();
        let mut degradations: Vec<DegradationNote> = Vec::new();

        for wave in plan.instantiation_waves() {
            let mut tasks: JoinSet<(
                ArtifactKind,
                Result<GeneratedArtifact, atelier_templates::GeneratorError>,
            )> = JoinSet::new();

            for kind in wave {
                // A failed (degraded) primary takes its non-critical
                // dependents with it; critical kinds are built regardless
                if let Some(failed) = plan
                    .relationships
                    .iter()
                    .filter(|r| {
                        r.kind == RelationshipKind::DependsOn
                            && r.secondary == kind
                            && !plan.critical.contains(&kind)
                    })
                    .find(|r| {
                        degradations.iter().any(|note| note.kind == r.primary)
                    })
                {
                    degradations.push(DegradationNote {
                        kind,
                        reason: format!("dependency {} was not instantiated", failed.primary),
                    });
                    continue;
                }
                let Some(params) = parameters.get(&kind).cloned() else { continue };
                let ctx = self.ctx.clone();
                let generators = Arc::clone(&self.generators);
                tasks.spawn(async move {
                    let result = match generators.get(kind) {
                        Some(generator) => generator.generate(&ctx, &params),
                        None => Err(atelier_templates::GeneratorError::InvalidParameters {
                            kind,
                            message: "no generator registered".into(),
                        }),
                    };
                    (kind, result)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                let (kind, result) = joined.map_err(|e| OrchestrationError::TaskAborted {
                    message: e.to_string(),
                })?;
                match result {
                    Ok(artifact) => {
                        artifacts.insert(kind, artifact);
                    }
                    Err(source) if plan.critical.contains(&kind) => {
                        // Dropping the JoinSet cancels the rest of the wave
                        return Err(OrchestrationError::TemplateInstantiation { kind, source });
                    }
                    Err(source) => {
                        tracing::warn!(kind = %kind, error = %source, "kind degraded");
                        degradations.push(DegradationNote {
                            kind,
                            reason: source.to_string(),
                        });
                    }
                }
            }
        }
        Ok((artifacts, degradations))
    }

    /// Phase 6a: spatial layout over the placeable kinds.
    fn place(
        &self,
        artifacts: &mut BTreeMap<ArtifactKind, GeneratedArtifact>,
        request: &EventRequest,
        framework: &CulturalFramework,
    ) -> Result<Layout, OrchestrationError> {
        let placeable: Vec<ArtifactKind> = artifacts
            .keys()
            .copied()
            .filter(|kind| {
                !matches!(
                    kind,
                    ArtifactKind::Environment | ArtifactKind::Structure | ArtifactKind::Security
                )
            })
            .collect();

        let instances: Vec<PlacementInstance> = placeable
            .iter()
            .map(|kind| {
                let artifact = &artifacts[kind];
                let mut instance = PlacementInstance::new(*kind, bounding_box(&artifact.root));
                if kind.has_fall_zone() {
                    if let Some(radius) = artifact
                        .metadata
                        .extensions
                        .get("fall_zone_radius_m")
                        .and_then(|raw| raw.parse::<f64>().ok())
                    {
                        instance = instance.with_fall_zone(radius);
                    }
                }
                instance
            })
            .collect();

        let layout = compute_layout(&instances, request.space, &framework.primary)?;
        for placement in &layout.placements {
            if let Some(artifact) = artifacts.get_mut(&placement.kind) {
                let transform = artifact.root.transform_mut();
                transform.position = placement.position;
                transform.rotation_y_deg = placement.rotation_y_deg;
            }
        }
        Ok(layout)
    }

    /// Phase 7 corrective pass: regenerate the least authentic artifact
    /// with the culture's decoration turned up, keeping the better result.
    fn corrective_pass(
        &self,
        artifacts: &mut BTreeMap<ArtifactKind, GeneratedArtifact>,
        parameters: &BTreeMap<ArtifactKind, ParametricParameters>,
    ) {
        let Some((kind, previous_score)) = artifacts
            .iter()
            .map(|(kind, a)| (*kind, a.metadata.authenticity_score))
            .min_by(|a, b| a.1.total_cmp(&b.1))
        else {
            return;
        };
        let Some(params) = parameters.get(&kind) else { return };
        let mut boosted = params.clone();
        boosted.decorative_intensity = boosted.decorative_intensity.max(0.75);
        boosted.material = None; // let the culture's preferred material win

        let Some(generator) = self.generators.get(kind) else { return };
        match generator.generate(&self.ctx, &boosted) {
            Ok(regenerated) if regenerated.metadata.authenticity_score > previous_score => {
                tracing::info!(
                    kind = %kind,
                    from = previous_score,
                    to = regenerated.metadata.authenticity_score,
                    "corrective pass improved authenticity"
                );
                // Keep the placement the first pass was given
                if let Some(existing) = artifacts.get(&kind) {
                    let transform = *existing.root.transform();
                    let mut replacement = regenerated;
                    *replacement.root.transform_mut() = transform;
                    artifacts.insert(kind, replacement);
                }
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(kind = %kind, %error, "corrective pass failed; keeping original");
            }
        }
    }
}

/// Phase 6b: apply non-dependency relationship adjustments where both
/// endpoints were instantiated.
fn apply_relationships(
    plan: &OrchestrationPlan,
    artifacts: &mut BTreeMap<ArtifactKind, GeneratedArtifact>,
) {
    for rel in &plan.relationships {
        if rel.kind == RelationshipKind::DependsOn {
            continue;
        }
        if !artifacts.contains_key(&rel.primary) || !artifacts.contains_key(&rel.secondary) {
            continue;
        }
        let primary_position = artifacts[&rel.primary].root.transform().position;

        let secondary = artifacts
            .get_mut(&rel.secondary)
            .expect("checked contains_key above");
        match rel.kind {
            RelationshipKind::ConflictsWith => {
                let clearance = rel.spatial.map_or(0.0, |s| s.min_clearance_m);
                let position = secondary.root.transform().position;
                let distance = position.distance_xz(&primary_position);
                if distance < clearance {
                    // Push the secondary out along x past the clearance ring
                    let push = clearance - distance + 0.5;
                    secondary.root.transform_mut().position =
                        position.add(&Vec3::new(push, 0.0, 0.0));
                }
            }
            RelationshipKind::Complements
            | RelationshipKind::Enhances
            | RelationshipKind::IntegratesWith => {
                let offset = rel.adjustment.position_offset;
                let scaled = Vec3::new(
                    offset.x * rel.strength,
                    offset.y * rel.strength,
                    offset.z * rel.strength,
                );
                let transform = secondary.root.transform_mut();
                transform.position = transform.position.add(&scaled);
                if (rel.adjustment.scale_factor - 1.0).abs() > f64::EPSILON {
                    let factor = 1.0 + (rel.adjustment.scale_factor - 1.0) * rel.strength;
                    secondary.root.scale_subtree(factor);
                }
                for (key, value) in &rel.adjustment.property_overrides {
                    secondary
                        .metadata
                        .extensions
                        .insert(key.clone(), value.clone());
                }
            }
            RelationshipKind::DependsOn => unreachable!("filtered above"),
        }
    }
}

/// Position of a kind in the declaration order; distinct per kind, unlike
/// the assembly layer, which Seating and Table share.
fn kind_ordinal(kind: ArtifactKind) -> u64 {
    ArtifactKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(0) as u64
}

fn collect(artifacts: &BTreeMap<ArtifactKind, GeneratedArtifact>) -> Vec<GeneratedArtifact> {
    artifacts.values().cloned().collect()
}

/// Axis-aligned bounding box of a geometry tree, rotation ignored. Used
/// only for placement footprints.
fn bounding_box(root: &GeometryNode) -> Dimensions {
    fn walk(node: &GeometryNode, origin: Vec3, max: &mut Vec3) {
        let position = origin.add(&node.transform().position);
        match node {
            GeometryNode::Primitive { dimensions, .. } => {
                max.x = max.x.max(position.x.abs() + dimensions.width / 2.0);
                max.y = max.y.max(position.y + dimensions.height / 2.0);
                max.z = max.z.max(position.z.abs() + dimensions.depth / 2.0);
            }
            GeometryNode::Group { children, .. } => {
                for child in children {
                    walk(child, position, max);
                }
            }
        }
    }
    let mut max = Vec3::new(0.1, 0.1, 0.1);
    walk(root, Vec3::ZERO, &mut max);
    Dimensions::new(max.x * 2.0, max.y, max.z * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_types::{PrimitiveShape, StructuralRole, Transform};

    #[test]
    fn bounding_box_spans_offset_primitives() {
        let mut root = GeometryNode::group("scene");
        root.push(GeometryNode::primitive(
            "a",
            PrimitiveShape::Box,
            Dimensions::new(1.0, 0.5, 1.0),
            Transform::at(Vec3::new(2.0, 0.25, 0.0)),
            StructuralRole::Base,
        ));
        let bbox = bounding_box(&root);
        assert!((bbox.width - 5.0).abs() < 1e-9);
        assert!((bbox.height - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parameters_inherit_request_wide_settings() {
        let orchestrator = Orchestrator::builtin().unwrap();
        let request = EventRequest::new(
            EventType::Wedding,
            CultureId::new("japanese"),
            atelier_types::SpaceDimensions::new(40.0, 30.0),
        )
        .with_formality(Formality::Ceremonial);
        let framework =
            crate::framework::establish(&orchestrator.ctx.cultures, &request).unwrap();
        let params =
            orchestrator.parameters_for(ArtifactKind::Seating, &request, &framework);
        assert_eq!(params.formality, Formality::Ceremonial);
        assert_eq!(params.extras.get("occasion").map(String::as_str), Some("ceremonial"));
        assert_eq!(params.material, Some(atelier_types::Material::Cedar));
    }

    #[test]
    fn per_kind_seeds_differ_but_are_deterministic() {
        let orchestrator = Orchestrator::builtin().unwrap();
        let request = EventRequest::new(
            EventType::CommunityEvent,
            CultureId::new("french"),
            atelier_types::SpaceDimensions::new(20.0, 20.0),
        );
        let framework =
            crate::framework::establish(&orchestrator.ctx.cultures, &request).unwrap();
        let seating = orchestrator.parameters_for(ArtifactKind::Seating, &request, &framework);
        let table = orchestrator.parameters_for(ArtifactKind::Table, &request, &framework);
        let seating_again =
            orchestrator.parameters_for(ArtifactKind::Seating, &request, &framework);
        assert_ne!(seating.jitter_seed, table.jitter_seed);
        assert_eq!(seating.jitter_seed, seating_again.jitter_seed);
    }
}
