//! Event requests: the structured record the orchestrator consumes.
//!
//! An external parameter-extraction layer (out of scope for the core) turns
//! whatever the user said into one of these.

use crate::params::{CultureId, Formality, SpaceDimensions, Venue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The event classes the orchestrator has strategies for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Wedding,
    BirthdayParty,
    CulturalFestival,
    CorporateGathering,
    CommunityEvent,
    PlaygroundBuild,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Wedding => "wedding",
            EventType::BirthdayParty => "birthday_party",
            EventType::CulturalFestival => "cultural_festival",
            EventType::CorporateGathering => "corporate_gathering",
            EventType::CommunityEvent => "community_event",
            EventType::PlaygroundBuild => "playground_build",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guest demographics for an event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestProfile {
    pub total: u32,
    pub children: u32,
    pub seniors: u32,
    /// Guests requiring wheelchair or mobility accommodation
    pub accessibility_needs: u32,
}

impl GuestProfile {
    pub fn adults(&self) -> u32 {
        self.total.saturating_sub(self.children)
    }
}

/// Budget total plus optional per-category caps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub total: f64,
    /// Category caps keyed by artifact-kind name; unlisted kinds share the
    /// remainder
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub category_caps: HashMap<String, f64>,
}

impl BudgetBreakdown {
    pub fn new(total: f64) -> Self {
        Self { total, category_caps: HashMap::new() }
    }

    pub fn with_cap(mut self, category: impl Into<String>, cap: f64) -> Self {
        self.category_caps.insert(category.into(), cap);
        self
    }
}

/// One structured event request: the orchestrator's entire input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRequest {
    pub event_type: EventType,
    pub primary_culture: CultureId,
    /// Optional secondary culture for fusion events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_culture: Option<CultureId>,
    pub venue: Venue,
    pub space: SpaceDimensions,
    pub guests: GuestProfile,
    pub budget: BudgetBreakdown,
    pub formality: Formality,
    /// How many ornamental sub-parts to attach across the scene, 0.0–1.0
    pub decorative_intensity: f64,
    /// Stated goals (e.g. "photo_backdrop", "kids_entertainment") that pull
    /// in optional kinds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    pub technology_required: bool,
    pub accessibility_required: bool,
    pub security_required: bool,
    /// Seed for all decorative jitter in this orchestration
    pub jitter_seed: u64,
}

impl EventRequest {
    pub fn new(event_type: EventType, primary_culture: CultureId, space: SpaceDimensions) -> Self {
        Self {
            event_type,
            primary_culture,
            secondary_culture: None,
            venue: Venue::Indoor,
            space,
            guests: GuestProfile::default(),
            budget: BudgetBreakdown::new(10_000.0),
            formality: Formality::Casual,
            decorative_intensity: 0.5,
            goals: Vec::new(),
            technology_required: false,
            accessibility_required: false,
            security_required: false,
            jitter_seed: 0,
        }
    }

    pub fn with_guests(mut self, guests: GuestProfile) -> Self {
        self.guests = guests;
        self
    }

    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.venue = venue;
        self
    }

    pub fn with_budget(mut self, budget: BudgetBreakdown) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = formality;
        self
    }

    pub fn with_secondary_culture(mut self, culture: CultureId) -> Self {
        self.secondary_culture = Some(culture);
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goals.push(goal.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adults_never_underflows() {
        let guests = GuestProfile { total: 5, children: 9, seniors: 0, accessibility_needs: 0 };
        assert_eq!(guests.adults(), 0);
    }

    #[test]
    fn budget_caps_accumulate() {
        let budget = BudgetBreakdown::new(5000.0)
            .with_cap("floral", 800.0)
            .with_cap("lighting", 600.0);
        assert_eq!(budget.category_caps.len(), 2);
    }
}
