//! Error types for Horizon Drawer.

/// Result type alias for drawer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or configuring a drawer.
///
/// Everything else the drawer encounters at runtime (re-entrant calls during
/// a transition, out-of-order touch samples, disposing twice) is a silent
/// no-op rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The construction target does not resolve to an element in the host document.
    #[error("Drawer target '{target}' was not found in the document")]
    NotFound { target: String },

    /// A configuration source carried a value that could not be parsed.
    #[error("Invalid value '{value}' for drawer option '{option}'")]
    InvalidOption { option: String, value: String },
}

impl Error {
    /// Create a not-found error.
    pub fn not_found(target: impl Into<String>) -> Self {
        Self::NotFound {
            target: target.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(option: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if this is a [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("#menu");
        assert_eq!(
            err.to_string(),
            "Drawer target '#menu' was not found in the document"
        );
        assert!(err.is_not_found());

        let err = Error::invalid_option("swipeThreshold", "far");
        assert_eq!(
            err.to_string(),
            "Invalid value 'far' for drawer option 'swipeThreshold'"
        );
        assert!(!err.is_not_found());
    }
}
