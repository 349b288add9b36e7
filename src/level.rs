use serde::{Deserialize, Serialize};

/// Severity attached to an emitted diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hidden => "hidden",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Level a lint is configured to, as written in `sharp-clippy.toml`.
///
/// `None` turns the lint off entirely; the other variants override the
/// descriptor's default severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintLevel {
    None,
    Hidden,
    Info,
    Warning,
    Error,
}

impl LintLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintLevel::None => "none",
            LintLevel::Hidden => "hidden",
            LintLevel::Info => "info",
            LintLevel::Warning => "warning",
            LintLevel::Error => "error",
        }
    }

    /// Severity reported for this level, or `None` when the lint is off.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            LintLevel::None => None,
            LintLevel::Hidden => Some(Severity::Hidden),
            LintLevel::Info => Some(Severity::Info),
            LintLevel::Warning => Some(Severity::Warning),
            LintLevel::Error => Some(Severity::Error),
        }
    }
}

impl From<Severity> for LintLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Hidden => LintLevel::Hidden,
            Severity::Info => LintLevel::Info,
            Severity::Warning => LintLevel::Warning,
            Severity::Error => LintLevel::Error,
        }
    }
}
