//! End-to-end orchestration: request in, composite scene out.

use atelier_orchestrator::{OrchestrationError, Orchestrator, OrchestratorConfig};
use atelier_types::{
    ArtifactKind, CultureId, EventRequest, EventType, Formality, GuestProfile, SpaceDimensions,
    Venue,
};
use std::time::Duration;

fn wedding_request() -> EventRequest {
    EventRequest::new(
        EventType::Wedding,
        CultureId::new("japanese"),
        SpaceDimensions::new(40.0, 30.0),
    )
    .with_guests(GuestProfile {
        total: 150,
        children: 10,
        seniors: 20,
        accessibility_needs: 2,
    })
    .with_venue(Venue::Outdoor)
    .with_formality(Formality::Ceremonial)
}

#[tokio::test]
async fn outdoor_wedding_produces_the_full_celebration_scene() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let outcome = orchestrator.orchestrate(&wedding_request()).await.unwrap();

    let kinds = outcome.composite.kinds();
    for kind in [
        ArtifactKind::Environment,
        ArtifactKind::Structure,
        ArtifactKind::Climate,
        ArtifactKind::Security,
        ArtifactKind::Stage,
        ArtifactKind::Seating,
        ArtifactKind::Table,
        ArtifactKind::Lighting,
        ArtifactKind::Floral,
    ] {
        assert!(kinds.contains(&kind), "{kind} missing from wedding composite");
    }
    assert!(outcome.report.degradations.is_empty());
    assert_eq!(outcome.report.template_count, outcome.composite.layers.len());
}

#[tokio::test]
async fn composite_layers_follow_assembly_order() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let outcome = orchestrator.orchestrate(&wedding_request()).await.unwrap();
    let layers: Vec<u8> = outcome
        .composite
        .layers
        .iter()
        .map(|a| a.metadata.kind.assembly_layer())
        .collect();
    let mut sorted = layers.clone();
    sorted.sort_unstable();
    assert_eq!(layers, sorted);
}

#[tokio::test]
async fn report_scores_stay_in_range() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let outcome = orchestrator.orchestrate(&wedding_request()).await.unwrap();
    let report = &outcome.report;
    for (name, value) in [
        ("cultural_authenticity", report.cultural_authenticity),
        ("sustainability_score", report.sustainability_score),
        ("accessibility_score", report.accessibility_score),
        ("experience_score", report.experience_score),
    ] {
        assert!((0.0..=100.0).contains(&value), "{name} out of range: {value}");
    }
    assert!(report.budget_utilization > 0.0);
    assert!(!report.cultural_notes.is_empty());
}

#[tokio::test]
async fn placements_are_applied_to_artifact_roots() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let outcome = orchestrator.orchestrate(&wedding_request()).await.unwrap();
    for placement in &outcome.layout.placements {
        let artifact = outcome
            .composite
            .artifact_of_kind(placement.kind)
            .expect("placed kind present in composite");
        let position = artifact.root.transform().position;
        // Relationship adjustments may nudge the root after placement, so
        // only require it left the origin
        assert!(
            position.x.abs() + position.z.abs() > 0.0
                || (placement.position.x == 0.0 && placement.position.z == 0.0),
            "{} still at the origin",
            placement.kind
        );
    }
}

#[tokio::test]
async fn cramped_playground_degrades_instead_of_failing() {
    let orchestrator = Orchestrator::builtin().unwrap();
    // Child-heavy party: the plan pulls playground in as optional, but the
    // venue leaves it no compliant site
    let request = EventRequest::new(
        EventType::BirthdayParty,
        CultureId::new("mexican"),
        SpaceDimensions::new(16.0, 12.0),
    )
    .with_guests(GuestProfile {
        total: 30,
        children: 15,
        seniors: 0,
        accessibility_needs: 0,
    });
    let outcome = orchestrator.orchestrate(&request).await.unwrap();
    assert!(outcome
        .report
        .degradations
        .iter()
        .any(|note| note.kind == ArtifactKind::Playground));
    assert!(outcome
        .composite
        .artifact_of_kind(ArtifactKind::Playground)
        .is_none());
    // The rest of the party still stands
    assert!(outcome
        .composite
        .artifact_of_kind(ArtifactKind::Seating)
        .is_some());
}

#[tokio::test]
async fn undersized_venue_is_rejected_before_generation() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let request = EventRequest::new(
        EventType::CommunityEvent,
        CultureId::new("scandinavian"),
        SpaceDimensions::new(10.0, 10.0),
    )
    .with_guests(GuestProfile { total: 200, children: 0, seniors: 0, accessibility_needs: 0 });
    let err = orchestrator.orchestrate(&request).await.unwrap_err();
    assert!(matches!(err, OrchestrationError::InsufficientSpace { .. }));
}

#[tokio::test]
async fn unknown_culture_fails_fast() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let request = EventRequest::new(
        EventType::CommunityEvent,
        CultureId::new("atlantean"),
        SpaceDimensions::new(20.0, 20.0),
    );
    let err = orchestrator.orchestrate(&request).await.unwrap_err();
    assert!(matches!(err, OrchestrationError::Culture(_)));
}

#[tokio::test]
async fn incoherent_fusion_fails_fast() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let request = EventRequest::new(
        EventType::Wedding,
        CultureId::new("japanese"),
        SpaceDimensions::new(40.0, 30.0),
    )
    .with_secondary_culture(CultureId::new("indian"));
    let err = orchestrator.orchestrate(&request).await.unwrap_err();
    assert!(matches!(err, OrchestrationError::CulturalFramework { .. }));
}

#[tokio::test]
async fn fusion_hands_decor_kinds_to_the_secondary_culture() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let request = wedding_request().with_secondary_culture(CultureId::new("scandinavian"));
    let outcome = orchestrator.orchestrate(&request).await.unwrap();
    let floral = outcome
        .composite
        .artifact_of_kind(ArtifactKind::Floral)
        .unwrap();
    assert_eq!(floral.metadata.culture, CultureId::new("scandinavian"));
    let seating = outcome
        .composite
        .artifact_of_kind(ArtifactKind::Seating)
        .unwrap();
    assert_eq!(seating.metadata.culture, CultureId::new("japanese"));
}

#[tokio::test]
async fn outcome_serializes_as_one_document() {
    let orchestrator = Orchestrator::builtin().unwrap();
    let outcome = orchestrator.orchestrate(&wedding_request()).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json.get("composite").is_some());
    assert!(json.get("layout").is_some());
    assert!(json.get("report").is_some());
}

#[tokio::test]
async fn zero_deadline_times_out() {
    let orchestrator = Orchestrator::builtin().unwrap().with_config(OrchestratorConfig {
        timeout: Duration::ZERO,
        ..OrchestratorConfig::default()
    });
    let err = orchestrator.orchestrate(&wedding_request()).await.unwrap_err();
    assert!(matches!(err, OrchestrationError::Timeout { .. }));
}
