use atelier_types::CultureId;
use thiserror::Error;

/// Errors from the cultural knowledge base.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CultureError {
    #[error("unknown culture: {culture}")]
    UnknownCulture { culture: CultureId },

    #[error("invalid profile for {culture}: {field}: {message}")]
    InvalidProfile {
        culture: CultureId,
        field: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_culture_names_the_culture() {
        let err = CultureError::UnknownCulture { culture: CultureId::new("atlantean") };
        assert!(err.to_string().contains("atlantean"));
    }
}
