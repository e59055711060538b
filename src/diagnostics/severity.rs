//! Diagnostic severity levels

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Normal narration
    Info = 1,
    /// Recoverable anomaly
    Warn = 2,
    /// Operation failure
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// ANSI color used for the console tag
    pub(crate) fn ansi_color(&self) -> &'static str {
        match self {
            Severity::Info => "\x1b[1;34m",
            Severity::Warn => "\x1b[1;33m",
            Severity::Error => "\x1b[1;31m",
        }
    }

    /// CSS color used for the markup badge
    pub(crate) fn css_color(&self) -> &'static str {
        match self {
            Severity::Info => "blue",
            Severity::Warn => "#fc0",
            Severity::Error => "#c33",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
