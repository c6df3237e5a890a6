//! Common error infrastructure shared by the puzzle modules.
//!
//! Domain errors (`GridError`, `DeckError`, `ObstacleError`) live beside
//! the types they guard; this module provides the shared severity
//! classification the runtime consults when deciding how loudly to log a
//! failure.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; retrying or choosing another action can succeed.
    ///
    /// Examples: no tile in the requested direction, empty deck on a deal
    Recoverable,

    /// Invalid input; rejecting without retry is correct.
    ///
    /// Examples: out-of-range deck index, misaligned path query
    Validation,

    /// Unexpected state inconsistency that indicates a bug.
    Internal,

    /// Unrecoverable error; the session cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Uniform classification interface for puzzle errors.
///
/// All domain error enums implement this; `thiserror` supplies the
/// Display/Error impls while this trait adds the severity used by logging.
pub trait GameError: std::fmt::Display + std::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error type, used in metrics and tests.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use crate::board::GridError;
    use crate::deck::DeckError;
    use crate::state::{Coordinate, ObstacleError};

    use super::*;

    #[test]
    fn domain_errors_classify_uniformly() {
        let errors: Vec<Box<dyn GameError>> = vec![
            Box::new(DeckError::IndexOutOfRange { index: 9, len: 3 }),
            Box::new(GridError::NotAligned {
                origin: Coordinate::ORIGIN,
                target: Coordinate::new(1, 2),
            }),
            Box::new(ObstacleError::NotFound {
                coordinate: Coordinate::ORIGIN,
            }),
        ];
        for error in &errors {
            assert!(!error.error_code().is_empty());
            assert!(!error.to_string().is_empty());
        }
        assert_eq!(errors[0].severity(), ErrorSeverity::Validation);
        assert_eq!(errors[1].severity(), ErrorSeverity::Validation);
        assert!(errors[2].severity().is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
    }
}
