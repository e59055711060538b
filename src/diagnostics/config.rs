//! Diagnostics configuration
//!
//! Injected by the host when an object is constructed. The per-instance
//! debug override set later through the object takes precedence over
//! `debug_level`.

use serde::{Deserialize, Serialize};

/// Where interactive diagnostics go when log mode is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputContext {
    /// Terminal: ANSI colored lines on stderr
    #[default]
    Console,
    /// Server-rendered page: markup lines on stdout
    Server,
}

/// Configuration for an object's diagnostics sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Verbosity threshold; 0 silences every call site
    #[serde(default)]
    pub debug_level: u8,
    /// Route diagnostics to the log destination regardless of context
    #[serde(default)]
    pub log_mode: bool,
    /// Interactive destination chosen by the host
    #[serde(default)]
    pub context: OutputContext,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            debug_level: 0,
            log_mode: false,
            context: OutputContext::Console,
        }
    }
}

impl DiagnosticsConfig {
    /// Config emitting every call site up to `level`.
    pub fn verbose(level: u8) -> Self {
        Self {
            debug_level: level,
            ..Self::default()
        }
    }

    pub fn with_log_mode(mut self, log_mode: bool) -> Self {
        self.log_mode = log_mode;
        self
    }

    pub fn with_context(mut self, context: OutputContext) -> Self {
        self.context = context;
        self
    }

    /// Check if any call site can emit.
    pub fn is_enabled(&self) -> bool {
        self.debug_level > 0
    }
}
