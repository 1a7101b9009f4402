//! Phases 2–3: master plan and template strategy.
//!
//! The plan decides which kinds the event needs, which are merely nice to
//! have, which are critical enough to abort on, how the budget splits, and
//! which relationship edges apply. It is pure data: no geometry yet.

use crate::relationships::builtin_relationships;
use atelier_types::{
    ArtifactKind, EventRequest, EventType, RelationshipKind, TemplateRelationship, Venue,
};
use std::collections::{BTreeMap, BTreeSet};

/// Fraction of the total budget each kind bids for before caps and
/// normalization.
fn budget_weight(kind: ArtifactKind) -> f64 {
    match kind {
        ArtifactKind::Environment => 0.08,
        ArtifactKind::Structure => 0.18,
        ArtifactKind::Climate => 0.07,
        ArtifactKind::Security => 0.06,
        ArtifactKind::Stage => 0.14,
        ArtifactKind::Seating => 0.16,
        ArtifactKind::Table => 0.12,
        ArtifactKind::Lighting => 0.08,
        ArtifactKind::Floral => 0.06,
        ArtifactKind::Playground => 0.15,
    }
}

/// The complete instantiation strategy for one event.
#[derive(Clone, Debug)]
pub struct OrchestrationPlan {
    /// Kinds the event cannot do without
    pub required: Vec<ArtifactKind>,
    /// Kinds pulled in by goals, demographics, or budget headroom
    pub optional: Vec<ArtifactKind>,
    /// Kinds whose failure aborts the whole orchestration
    pub critical: BTreeSet<ArtifactKind>,
    /// Budget slice per selected kind; the sum never exceeds the total
    pub budget_allocation: BTreeMap<ArtifactKind, f64>,
    /// Relationship edges with both endpoints selected
    pub relationships: Vec<TemplateRelationship>,
}

impl OrchestrationPlan {
    /// Required and optional kinds together, deduplicated, in assembly order.
    pub fn selected(&self) -> Vec<ArtifactKind> {
        let set: BTreeSet<ArtifactKind> =
            self.required.iter().chain(&self.optional).copied().collect();
        let mut kinds: Vec<ArtifactKind> = set.into_iter().collect();
        kinds.sort_by_key(|k| k.assembly_layer());
        kinds
    }

    /// The `depends-on` edges among selected kinds.
    pub fn dependencies(&self) -> impl Iterator<Item = &TemplateRelationship> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::DependsOn)
    }

    /// Group selected kinds into instantiation waves: every kind in a wave
    /// has all of its `depends-on` primaries in earlier waves. Within a
    /// wave, instantiation runs concurrently.
    pub fn instantiation_waves(&self) -> Vec<Vec<ArtifactKind>> {
        let selected = self.selected();
        let mut remaining: BTreeSet<ArtifactKind> = selected.into_iter().collect();
        let mut done: BTreeSet<ArtifactKind> = BTreeSet::new();
        let mut waves = Vec::new();
        while !remaining.is_empty() {
            let ready: Vec<ArtifactKind> = remaining
                .iter()
                .filter(|kind| {
                    self.dependencies()
                        .filter(|r| r.secondary == **kind)
                        .all(|r| done.contains(&r.primary))
                })
                .copied()
                .collect();
            // The static table is acyclic; if nothing is ready the filter
            // left a foreign edge in, which is a bug worth halting on in
            // debug builds. Release falls back to breaking the tie.
            debug_assert!(!ready.is_empty(), "dependency cycle among {remaining:?}");
            let wave = if ready.is_empty() {
                remaining.iter().copied().collect()
            } else {
                ready
            };
            for kind in &wave {
                remaining.remove(kind);
                done.insert(*kind);
            }
            waves.push(wave);
        }
        waves
    }
}

/// Build the plan for a request: event-type strategy, conditional kinds,
/// criticality, budget split, filtered relationships.
pub fn build_plan(request: &EventRequest) -> OrchestrationPlan {
    let mut required: BTreeSet<ArtifactKind> = BTreeSet::new();
    let mut critical: BTreeSet<ArtifactKind> = BTreeSet::new();
    required.insert(ArtifactKind::Environment);
    critical.insert(ArtifactKind::Environment);

    match request.event_type {
        EventType::Wedding => {
            required.extend([
                ArtifactKind::Seating,
                ArtifactKind::Table,
                ArtifactKind::Floral,
                ArtifactKind::Lighting,
                ArtifactKind::Stage,
            ]);
            critical.insert(ArtifactKind::Seating);
        }
        EventType::BirthdayParty => {
            required.extend([
                ArtifactKind::Seating,
                ArtifactKind::Table,
                ArtifactKind::Floral,
            ]);
            critical.insert(ArtifactKind::Seating);
        }
        EventType::CulturalFestival => {
            required.extend([
                ArtifactKind::Stage,
                ArtifactKind::Lighting,
                ArtifactKind::Floral,
                ArtifactKind::Seating,
            ]);
            critical.insert(ArtifactKind::Stage);
        }
        EventType::CorporateGathering => {
            required.extend([
                ArtifactKind::Seating,
                ArtifactKind::Table,
                ArtifactKind::Lighting,
            ]);
            critical.insert(ArtifactKind::Seating);
            if request.technology_required {
                required.insert(ArtifactKind::Stage);
            }
        }
        EventType::CommunityEvent => {
            required.extend([ArtifactKind::Seating, ArtifactKind::Table]);
            critical.insert(ArtifactKind::Seating);
        }
        EventType::PlaygroundBuild => {
            required.extend([ArtifactKind::Playground, ArtifactKind::Seating]);
            critical.insert(ArtifactKind::Playground);
        }
    }

    if request.venue == Venue::Outdoor {
        required.insert(ArtifactKind::Climate);
        required.insert(ArtifactKind::Structure);
    }
    if request.security_required || request.guests.total > 100 {
        required.insert(ArtifactKind::Security);
    }

    let mut optional: BTreeSet<ArtifactKind> = BTreeSet::new();
    let has_goal = |goal: &str| request.goals.iter().any(|g| g == goal);
    if has_goal("photo_backdrop") {
        optional.insert(ArtifactKind::Stage);
    }
    if has_goal("kids_entertainment")
        || (request.guests.children > 0 && request.guests.children * 3 >= request.guests.total)
    {
        optional.insert(ArtifactKind::Playground);
    }
    if has_goal("evening") {
        optional.insert(ArtifactKind::Lighting);
    }
    // Generous per-head budgets buy decoration
    if request.guests.total > 0 && request.budget.total / f64::from(request.guests.total) > 80.0 {
        optional.insert(ArtifactKind::Floral);
    }
    for kind in &required {
        optional.remove(kind);
    }

    let required: Vec<ArtifactKind> = required.into_iter().collect();
    let optional: Vec<ArtifactKind> = optional.into_iter().collect();

    let selected: Vec<ArtifactKind> =
        required.iter().chain(&optional).copied().collect();
    let relationships: Vec<TemplateRelationship> = builtin_relationships()
        .into_iter()
        .filter(|r| r.applies_to(&selected))
        .collect();

    let budget_allocation = allocate_budget(request, &selected);

    OrchestrationPlan { required, optional, critical, budget_allocation, relationships }
}

/// Split the budget across selected kinds by weight, honoring per-category
/// caps. Capped remainder is not redistributed, so the sum stays at or
/// below the total.
fn allocate_budget(
    request: &EventRequest,
    selected: &[ArtifactKind],
) -> BTreeMap<ArtifactKind, f64> {
    let weight_sum: f64 = selected.iter().map(|k| budget_weight(*k)).sum();
    if weight_sum <= 0.0 {
        return BTreeMap::new();
    }
    selected
        .iter()
        .map(|kind| {
            let share = request.budget.total * budget_weight(*kind) / weight_sum;
            let capped = request
                .budget
                .category_caps
                .get(kind.as_str())
                .map_or(share, |cap| share.min(*cap));
            (*kind, capped)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_types::{BudgetBreakdown, CultureId, GuestProfile, SpaceDimensions};

    fn make_request(event_type: EventType) -> EventRequest {
        EventRequest::new(
            event_type,
            CultureId::new("mexican"),
            SpaceDimensions::new(40.0, 30.0),
        )
    }

    #[test]
    fn wedding_for_150_guests_selects_the_full_celebration_set() {
        let request = make_request(EventType::Wedding)
            .with_venue(Venue::Outdoor)
            .with_guests(GuestProfile { total: 150, children: 10, seniors: 20, accessibility_needs: 2 });
        let plan = build_plan(&request);
        for kind in [
            ArtifactKind::Floral,
            ArtifactKind::Lighting,
            ArtifactKind::Stage,
            ArtifactKind::Security,
            ArtifactKind::Climate,
            ArtifactKind::Structure,
        ] {
            assert!(plan.required.contains(&kind), "{kind} missing from wedding plan");
        }
    }

    #[test]
    fn table_wave_precedes_seating_wave() {
        let plan = build_plan(&make_request(EventType::CommunityEvent));
        let waves = plan.instantiation_waves();
        let wave_of = |kind| waves.iter().position(|w| w.contains(&kind)).unwrap();
        assert!(wave_of(ArtifactKind::Table) < wave_of(ArtifactKind::Seating));
    }

    #[test]
    fn child_heavy_guest_list_pulls_in_play_equipment() {
        let request = make_request(EventType::BirthdayParty)
            .with_guests(GuestProfile { total: 30, children: 15, seniors: 0, accessibility_needs: 0 });
        let plan = build_plan(&request);
        assert!(plan.optional.contains(&ArtifactKind::Playground));
    }

    #[test]
    fn budget_allocation_never_exceeds_total() {
        let request = make_request(EventType::Wedding)
            .with_budget(BudgetBreakdown::new(20_000.0).with_cap("floral", 500.0))
            .with_guests(GuestProfile { total: 120, children: 0, seniors: 0, accessibility_needs: 0 });
        let plan = build_plan(&request);
        let spent: f64 = plan.budget_allocation.values().sum();
        assert!(spent <= 20_000.0 + 1e-9);
        assert!(plan.budget_allocation[&ArtifactKind::Floral] <= 500.0);
    }

    #[test]
    fn playground_build_marks_playground_critical() {
        let plan = build_plan(&make_request(EventType::PlaygroundBuild));
        assert!(plan.critical.contains(&ArtifactKind::Playground));
        assert!(!plan.critical.contains(&ArtifactKind::Table));
    }

    #[test]
    fn relationships_are_filtered_to_selection() {
        let plan = build_plan(&make_request(EventType::CommunityEvent));
        let selected = plan.selected();
        for rel in &plan.relationships {
            assert!(rel.applies_to(&selected));
        }
    }
}
