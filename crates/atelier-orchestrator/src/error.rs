use atelier_culture::CultureError;
use atelier_layout::LayoutError;
use atelier_templates::GeneratorError;
use atelier_types::ArtifactKind;
use thiserror::Error;

/// Errors surfaced by the orchestration master.
///
/// Framework and space failures are cheap and happen before any geometry is
/// generated. Instantiation failures carry the failing kind; only critical
/// kinds propagate them, everything else degrades into a report note.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error(transparent)]
    Culture(#[from] CultureError),

    /// The requested culture combination cannot produce one coherent scene.
    #[error("cultural framework rejected: {message}")]
    CulturalFramework { message: String },

    /// The declared space cannot hold the event at all.
    #[error(
        "insufficient space: event needs {required_width_m:.1}x{required_depth_m:.1}m, \
         venue offers {available_width_m:.1}x{available_depth_m:.1}m"
    )]
    InsufficientSpace {
        required_width_m: f64,
        required_depth_m: f64,
        available_width_m: f64,
        available_depth_m: f64,
    },

    /// A critical kind failed to instantiate.
    #[error("instantiation failed for {kind}: {source}")]
    TemplateInstantiation {
        kind: ArtifactKind,
        #[source]
        source: GeneratorError,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The full orchestration exceeded its deadline. Distinct from every
    /// validation error so callers can retry with a longer budget.
    #[error("orchestration timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// An instantiation task panicked or was cancelled underneath us.
    #[error("instantiation task aborted: {message}")]
    TaskAborted { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_space_names_both_footprints() {
        let err = OrchestrationError::InsufficientSpace {
            required_width_m: 31.6,
            required_depth_m: 23.7,
            available_width_m: 10.0,
            available_depth_m: 8.0,
        };
        let text = err.to_string();
        assert!(text.contains("31.6x23.7"));
        assert!(text.contains("10.0x8.0"));
    }
}
