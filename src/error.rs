use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::diagnostics::SourceSpan;
use crate::fix::FixError;

/// Result alias for errors emitted by Sharp Clippy internals.
pub type ClippyResult<T> = Result<T, ClippyError>;

/// Structured error type for Sharp Clippy subsystems.
#[derive(Debug, Error)]
pub enum ClippyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse failure: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// The caller's cancellation token fired; no result was produced.
    #[error("analysis cancelled")]
    Cancelled,

    /// A fix could not find the node it is supposed to rewrite.
    #[error("`{lint}`: no fix anchor at {}..{}", .span.start, .span.end())]
    AnchorNotFound { lint: &'static str, span: SourceSpan },

    #[error(transparent)]
    Fix(#[from] FixError),

    #[error("rule `{lint}` failed: {message}")]
    Rule { lint: &'static str, message: String },

    #[error("{0}")]
    Other(String),
}

impl ClippyError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn rule(lint: &'static str, msg: impl Into<String>) -> Self {
        Self::Rule {
            lint,
            message: msg.into(),
        }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Convert to anyhow::Error for interop with anyhow-based code.
    pub fn into_anyhow(self) -> AnyhowError {
        AnyhowError::new(self)
    }
}

impl From<AnyhowError> for ClippyError {
    fn from(err: AnyhowError) -> Self {
        // `{:#}` keeps the context chain on one line.
        ClippyError::other(format!("{err:#}"))
    }
}

/// Convenience macro mirroring `anyhow::bail!` but returning ClippyError.
#[macro_export]
macro_rules! clippy_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::ClippyError::other(format!($($arg)*)));
    };
}

/// Convenience macro mirroring `anyhow::ensure!`.
#[macro_export]
macro_rules! clippy_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::clippy_bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guarded(n: usize) -> ClippyResult<usize> {
        clippy_ensure!(n > 2, "expected more than two, got {n}");
        Ok(n)
    }

    #[test]
    fn ensure_macro_returns_other() {
        let err = guarded(1).unwrap_err();
        assert_eq!(err.to_string(), "expected more than two, got 1");
        assert_eq!(guarded(3).unwrap(), 3);
    }

    #[test]
    fn anchor_not_found_mentions_range() {
        let err = ClippyError::AnchorNotFound {
            lint: "hides_inherited_member",
            span: SourceSpan::new(10, 3),
        };
        assert_eq!(
            err.to_string(),
            "`hides_inherited_member`: no fix anchor at 10..13"
        );
    }
}
