//! Phase 1: the cultural framework every later phase designs within.
//!
//! Establishing the framework is the first thing orchestration does and the
//! cheapest point of failure: an unknown culture or an incoherent fusion
//! aborts here, before any geometry exists.

use crate::error::OrchestrationError;
use atelier_culture::{CulturalProfile, CultureRegistry};
use atelier_types::{EventRequest, Material};

/// The validated cultural frame for one orchestration.
#[derive(Clone, Debug)]
pub struct CulturalFramework {
    pub primary: CulturalProfile,
    pub secondary: Option<CulturalProfile>,
    /// Materials appropriate to every participating culture
    pub shared_materials: Vec<Material>,
    /// Notes surfaced in the final report
    pub guidelines: Vec<String>,
}

impl CulturalFramework {
    /// The material the whole scene defaults to.
    pub fn lead_material(&self) -> Option<Material> {
        self.shared_materials
            .first()
            .copied()
            .or_else(|| self.primary.materials.preferred.first().copied())
    }
}

/// Validate the requested culture combination and derive shared guidelines.
///
/// A fusion is rejected when the two cultures share no appropriate material
/// at all: there is no honest way to build one scene both traditions would
/// recognize.
pub fn establish(
    cultures: &CultureRegistry,
    request: &EventRequest,
) -> Result<CulturalFramework, OrchestrationError> {
    let primary = cultures.profile(&request.primary_culture)?.clone();

    let secondary = match &request.secondary_culture {
        None => None,
        Some(id) if *id == request.primary_culture => {
            return Err(OrchestrationError::CulturalFramework {
                message: format!("secondary culture duplicates the primary ({id})"),
            })
        }
        Some(id) => Some(cultures.profile(id)?.clone()),
    };

    let mut guidelines = Vec::new();
    let shared_materials = match &secondary {
        None => primary.materials.preferred.clone(),
        Some(other) => {
            let shared: Vec<Material> = primary
                .materials
                .preferred
                .iter()
                .chain(&primary.materials.traditional)
                .filter(|m| other.materials.is_appropriate(**m))
                .copied()
                .collect();
            if shared.is_empty() {
                return Err(OrchestrationError::CulturalFramework {
                    message: format!(
                        "{} and {} share no appropriate materials",
                        primary.culture, other.culture
                    ),
                });
            }
            guidelines.push(format!(
                "fusion of {} and {}: build in {}",
                primary.culture,
                other.culture,
                shared
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            shared
        }
    };

    if request.formality >= primary.ceremonial.minimum_ceremonial_formality {
        guidelines.push(format!(
            "{} ceremonial conventions apply at this formality",
            primary.culture
        ));
    }
    if let Some(orientation) = primary.group_orientation {
        guidelines.push(format!("group orientation: {orientation:?}").to_lowercase());
    }

    tracing::info!(
        culture = %primary.culture,
        fusion = secondary.is_some(),
        materials = shared_materials.len(),
        "cultural framework established"
    );
    Ok(CulturalFramework { primary, secondary, shared_materials, guidelines })
}
