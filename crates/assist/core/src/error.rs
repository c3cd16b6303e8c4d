//! Common error infrastructure for assist-core.
//!
//! Domain errors (`ResolveError`, `SelectError`, `ConfigError`) live next to
//! the code that raises them. This module only carries the shared
//! classification used by the runtime to decide between re-prompting the
//! user and aborting the invocation.

/// Severity level of an error, used to pick a recovery strategy.
///
/// - **Recoverable**: the user can retry with a different pick
/// - **Validation**: the input is wrong and must be corrected before retrying
/// - **Internal**: a collaborator handed us inconsistent data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retry with another pick (e.g. anchor outside the highlighted range).
    Recoverable,

    /// Invalid configuration or expression; do not retry unchanged.
    Validation,

    /// Missing or inconsistent collaborator data.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if the user may simply try again.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all assist-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by what the caller should do next, not by impact
pub trait AssistError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and assertions in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
