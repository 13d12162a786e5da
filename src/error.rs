//! Unified error taxonomy for sigma-translate (spec §7).
//!
//! The kinds are flat and stable: every component returns its own kind, and
//! the orchestrator only ever adds location context, never remaps one kind
//! to another.

use thiserror::Error;

/// The crate's error type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// YAML syntax error encountered before any Sigma-specific validation.
    #[error("invalid YAML: {0}")]
    InvalidYaml(String),

    /// Sigma structural violation; `path` is a dotted location such as
    /// `detection.selection.Image`.
    #[error("invalid Sigma rule at {path}: {reason}")]
    InvalidSigma { path: String, reason: String },

    /// Specialization of `InvalidSigma`: a field modifier that isn't in the
    /// recognized set.
    #[error("unknown modifier `{modifier}` on field `{field}` at {path}")]
    UnknownModifier {
        path: String,
        field: String,
        modifier: String,
    },

    /// Specialization of `InvalidSigma`: a condition expression references a
    /// selection name that doesn't exist.
    #[error("unresolved selection `{selection}` in condition at {path}")]
    UnresolvedSelection { path: String, selection: String },

    /// Reverse recognizer (C9) hit SPL outside the supported grammar.
    #[error("unsupported SPL fragment at offset {offset}: {fragment}")]
    UnsupportedSpl { fragment: String, offset: usize },

    /// A referenced profile/mapping/config id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate profile name, or a concurrent default/active toggle
    /// conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Only returned from `text_to_sigma` when no LLM adapter is configured.
    #[error("LLM assistant unavailable")]
    LlmUnavailable,

    /// Invariant violation — a programmer error, not a user input error.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[must_use]
    pub fn invalid_sigma(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSigma {
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unknown_modifier(
        path: impl Into<String>,
        field: impl Into<String>,
        modifier: impl Into<String>,
    ) -> Self {
        Self::UnknownModifier {
            path: path.into(),
            field: field.into(),
            modifier: modifier.into(),
        }
    }

    #[must_use]
    pub fn unresolved_selection(path: impl Into<String>, selection: impl Into<String>) -> Self {
        Self::UnresolvedSelection {
            path: path.into(),
            selection: selection.into(),
        }
    }

    #[must_use]
    pub fn unsupported_spl(fragment: impl Into<String>, offset: usize) -> Self {
        Self::UnsupportedSpl {
            fragment: fragment.into(),
            offset,
        }
    }

    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    #[must_use]
    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    #[must_use]
    pub fn internal(what: impl Into<String>) -> Self {
        Self::Internal(what.into())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::InvalidYaml(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Extension trait for chaining human-readable context onto an error,
/// mirroring the teacher's `ErrorContext` but kept deliberately small:
/// only `InvalidSigma`/`Internal` carry free-text that benefits from
/// chaining, so other variants pass through unchanged.
pub trait ErrorContext<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx = context.into();
        self.map_err(|e| add_context(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context(e.into(), &ctx)
        })
    }
}

fn add_context(err: Error, new_ctx: &str) -> Error {
    match err {
        Error::InvalidSigma { path, reason } => Error::InvalidSigma {
            path,
            reason: chain_context(new_ctx, &reason),
        },
        Error::Internal(msg) => Error::Internal(chain_context(new_ctx, &msg)),
        Error::NotFound(msg) => Error::NotFound(chain_context(new_ctx, &msg)),
        Error::Conflict(msg) => Error::Conflict(chain_context(new_ctx, &msg)),
        other => other,
    }
}

fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait converting `Option::None` into a contextualized error.
pub trait OptionContext<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| Error::Internal(context.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_chains_on_invalid_sigma() {
        let result: Result<()> = Err(Error::invalid_sigma("detection.selection", "base error"));
        let chained = result.context("while compiling condition");
        match chained {
            Err(Error::InvalidSigma { reason, .. }) => {
                assert!(reason.contains("base error"));
                assert!(reason.contains("while compiling condition"));
            }
            _ => panic!("expected InvalidSigma"),
        }
    }

    #[test]
    fn other_variants_pass_through_context() {
        let result: Result<()> = Err(Error::LlmUnavailable);
        let chained = result.context("irrelevant");
        assert!(matches!(chained, Err(Error::LlmUnavailable)));
    }

    #[test]
    fn option_context_none_produces_internal() {
        let none: Option<i32> = None;
        let err = none.context_none("missing selection").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
