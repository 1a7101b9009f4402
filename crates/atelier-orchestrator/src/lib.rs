//! Event orchestration: from a structured event request to a composite,
//! culturally coherent 3D scene.
//!
//! The crate sits on top of the template generator family and adds the
//! event-level concerns no single generator sees:
//!
//! - **framework**: validate the culture combination and derive shared
//!   materials and guidelines (phase 1)
//! - **plan**: select template kinds per event type, mark critical ones,
//!   allocate budget, and order instantiation by dependency (phases 2-3)
//! - **relationships**: the static cross-kind interaction table
//! - **orchestrator**: the eight-phase master covering parameter generation,
//!   concurrent instantiation, spatial layout, relationship adjustments,
//!   scoring with one corrective pass, and final assembly
//! - **scoring**: composite-level score functions and the orchestrator
//!   configuration
//!
//! ```no_run
//! use atelier_orchestrator::Orchestrator;
//! use atelier_types::{CultureId, EventRequest, EventType, GuestProfile, SpaceDimensions};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::builtin()?;
//! let request = EventRequest::new(
//!     EventType::Wedding,
//!     CultureId::new("japanese"),
//!     SpaceDimensions::new(40.0, 30.0),
//! )
//! .with_guests(GuestProfile { total: 120, ..Default::default() });
//! let outcome = orchestrator.orchestrate(&request).await?;
//! println!("{} layers", outcome.composite.layers.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod framework;
pub mod orchestrator;
pub mod plan;
pub mod relationships;
pub mod scoring;

pub use error::OrchestrationError;
pub use framework::{establish, CulturalFramework};
pub use orchestrator::{OrchestrationOutcome, Orchestrator};
pub use plan::{build_plan, OrchestrationPlan};
pub use relationships::builtin_relationships;
pub use scoring::{ExperienceWeights, OrchestratorConfig};
