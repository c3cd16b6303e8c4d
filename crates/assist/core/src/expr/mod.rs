//! N-value expressions: how many targets an N-type item picks.
//!
//! Designers write the count as a small expression instead of a fixed
//! number so it can scale with item levels:
//!
//! ```text
//! 3              literal
//! [level]        the invoking effect's own level
//! [level]+1      arithmetic over references
//! [Fireball]*2   level of the combo constituent named "Fireball"
//! ```
//!
//! Resolution substitutes every `[reference]` textually, then evaluates the
//! result with a restricted arithmetic evaluator. The substituted text must
//! pass an allow-list (digits, `+ - * / ( ) .`, whitespace) before the
//! evaluator ever sees it.

pub mod evaluate;
pub mod reference;

pub use evaluate::{EvalError, evaluate, is_allowed};
pub use reference::{Reference, find_references};

use crate::error::{AssistError, ErrorSeverity};
use crate::item::ResolutionContext;

// ============================================================================
// NValue
// ============================================================================

/// Target count, always in `1..=99`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct NValue(u8);

impl NValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 99;

    /// Returns `Some` if `value` is a valid target count.
    pub fn new(value: i64) -> Option<Self> {
        (i64::from(Self::MIN)..=i64::from(Self::MAX))
            .contains(&value)
            .then(|| Self(value as u8))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for NValue {
    type Error = ResolveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value)).ok_or(ResolveError::OutOfRange {
            value: i64::from(value),
        })
    }
}

impl From<NValue> for u8 {
    fn from(value: NValue) -> Self {
        value.0
    }
}

impl core::fmt::Display for NValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why an N-value expression could not be resolved.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("N value is empty")]
    Empty,

    #[error("N value {value} is outside 1..=99")]
    OutOfRange { value: i64 },

    #[error("reference [{0}] cannot be resolved")]
    UnresolvedReference(String),

    #[error("character {0:?} is not allowed in an N value expression")]
    DisallowedCharacter(char),

    #[error("N value expression failed to evaluate")]
    Evaluation(#[source] EvalError),

    #[error("N value must be a number, a reference, or an arithmetic expression")]
    Malformed,
}

impl AssistError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "RESOLVE_EMPTY",
            Self::OutOfRange { .. } => "RESOLVE_OUT_OF_RANGE",
            Self::UnresolvedReference(_) => "RESOLVE_UNRESOLVED_REFERENCE",
            Self::DisallowedCharacter(_) => "RESOLVE_DISALLOWED_CHARACTER",
            Self::Evaluation(_) => "RESOLVE_EVALUATION",
            Self::Malformed => "RESOLVE_MALFORMED",
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves `expression` to a target count for the item described by `ctx`.
pub fn resolve(expression: &str, ctx: &ResolutionContext) -> Result<NValue, ResolveError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::Empty);
    }

    if is_bare_integer(trimmed) {
        return parse_count(trimmed);
    }

    let references = find_references(trimmed);
    let mut substituted = trimmed.to_string();
    for reference in &references {
        let level = reference
            .resolve(ctx)
            .ok_or_else(|| ResolveError::UnresolvedReference(reference.name.clone()))?;
        substituted = substituted.replacen(&reference.raw, &format_level(level), 1);
    }

    let has_operator = substituted.contains(['+', '-', '*', '/']);
    if references.is_empty() && !has_operator {
        return Err(match first_disallowed(&substituted) {
            Some(c) => ResolveError::DisallowedCharacter(c),
            None => ResolveError::Malformed,
        });
    }

    if references.len() == 1 && !has_operator && is_bare_integer(substituted.trim()) {
        return parse_count(substituted.trim());
    }

    if let Some(c) = first_disallowed(&substituted) {
        return Err(ResolveError::DisallowedCharacter(c));
    }

    let value = evaluate(&substituted).map_err(ResolveError::Evaluation)?;
    let floored = value.floor();
    // Saturating float-to-int cast keeps huge results out of range.
    let count = floored as i64;
    NValue::new(count).ok_or(ResolveError::OutOfRange { value: count })
}

fn is_bare_integer(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_count(digits: &str) -> Result<NValue, ResolveError> {
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    NValue::new(value).ok_or(ResolveError::OutOfRange { value })
}

fn first_disallowed(text: &str) -> Option<char> {
    text.chars().find(|c| !is_allowed(*c))
}

fn format_level(level: f64) -> String {
    format!("{level}")
}
