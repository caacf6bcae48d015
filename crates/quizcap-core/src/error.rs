//! Configuration error states.
//!
//! A question whose payload cannot drive its variant is not a failure of the
//! host's render pass. The engine renders the question in an error state
//! carrying one of these values instead.

use thiserror::Error;

/// Reasons a variant cannot render its interaction surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Fill-blank question with neither a legacy blank list nor a template
    /// whose placeholders pair with blank descriptors.
    #[error("invalid fill-blank question configuration: no blank answers found")]
    NoBlanks,

    /// Matching question missing items on one or both sides.
    #[error("invalid matching question configuration: {left} left item(s), {right} right item(s)")]
    EmptyMatchingItems { left: usize, right: usize },
}

impl ConfigError {
    /// Short machine-friendly code, used in CLI tables and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::NoBlanks => "no_blanks",
            ConfigError::EmptyMatchingItems { .. } => "empty_matching_items",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert!(ConfigError::NoBlanks.to_string().contains("no blank answers"));
        let err = ConfigError::EmptyMatchingItems { left: 0, right: 3 };
        assert_eq!(
            err.to_string(),
            "invalid matching question configuration: 0 left item(s), 3 right item(s)"
        );
        assert_eq!(err.code(), "empty_matching_items");
    }
}
