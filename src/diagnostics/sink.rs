//! Per-instance diagnostics sink
//!
//! Routing:
//! 1. log mode on → log destination
//! 2. otherwise → the interactive destination picked from the configured
//!    output context (console or markup)
//!
//! A call at level `n` is emitted only when `n <= debug_level()`.

use chrono::{DateTime, Utc};
use tracing::trace;

use super::config::{DiagnosticsConfig, OutputContext};
use super::destination::{OutputDestination, WriterDestination};
use super::severity::Severity;

/// Category used by the `set_error` / `set_warning` wrappers.
pub const GENERAL_CATEGORY: &str = "general";

/// One emitted diagnostic. Ephemeral; the sink does not keep it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Name of the emitting object type
    pub type_name: String,
}

impl Diagnostic {
    /// Timestamp as `seconds.millis`
    pub fn epoch_seconds(&self) -> String {
        format!(
            "{}.{:03}",
            self.timestamp.timestamp(),
            self.timestamp.timestamp_subsec_millis()
        )
    }
}

/// Which destination a call would currently be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Log,
    Interactive,
}

/// Leveled, destination-aware diagnostics for one object instance.
pub struct Diagnostics {
    type_name: String,
    config: DiagnosticsConfig,
    level_override: Option<u8>,
    log_mode: bool,
    log: Box<dyn OutputDestination>,
    interactive: Box<dyn OutputDestination>,
}

impl Diagnostics {
    /// Creates a sink writing log lines to stderr and interactive lines to
    /// the stream matching the configured context.
    pub fn new(type_name: impl Into<String>, config: DiagnosticsConfig) -> Self {
        let interactive: Box<dyn OutputDestination> = match config.context {
            OutputContext::Console => Box::new(WriterDestination::stderr_console()),
            OutputContext::Server => Box::new(WriterDestination::stdout_markup()),
        };

        Self {
            type_name: type_name.into(),
            log_mode: config.log_mode,
            config,
            level_override: None,
            log: Box::new(WriterDestination::stderr_log()),
            interactive,
        }
    }

    /// Replace the log destination
    pub fn with_log_destination(mut self, destination: impl OutputDestination + 'static) -> Self {
        self.log = Box::new(destination);
        self
    }

    /// Replace the interactive destination
    pub fn with_interactive_destination(
        mut self,
        destination: impl OutputDestination + 'static,
    ) -> Self {
        self.interactive = Box::new(destination);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    /// Effective debug level: instance override, else the configured level.
    pub fn debug_level(&self) -> u8 {
        self.level_override.unwrap_or(self.config.debug_level)
    }

    /// Override the debug level for this instance only.
    pub fn set_debug_level(&mut self, level: u8) {
        self.level_override = Some(level);
    }

    /// Drop the instance override, falling back to the configured level.
    pub fn clear_debug_override(&mut self) {
        self.level_override = None;
    }

    pub fn log_mode(&self) -> bool {
        self.log_mode
    }

    pub fn set_log_mode(&mut self, log_mode: bool) {
        self.log_mode = log_mode;
    }

    pub fn route(&self) -> Route {
        if self.log_mode {
            Route::Log
        } else {
            Route::Interactive
        }
    }

    /// Emit at the default call-site level (1).
    pub fn emit(&mut self, message: &str, severity: Severity, category: &str) -> bool {
        self.show(message, 1, severity, category)
    }

    /// Emit a message requested at `level`. A message gated out by the level
    /// is not written and still counts as accepted.
    pub fn show(&mut self, message: &str, level: u8, severity: Severity, category: &str) -> bool {
        let debug_level = self.debug_level();
        if level > debug_level {
            trace!(type_name = %self.type_name, level, debug_level, "diagnostic below threshold");
            return true;
        }

        let diagnostic = Diagnostic {
            severity,
            category: category.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            type_name: self.type_name.clone(),
        };

        match self.route() {
            Route::Log => self.log.deliver(&diagnostic, debug_level),
            Route::Interactive => self.interactive.deliver(&diagnostic, debug_level),
        }
    }

    /// Narrate an error. Always returns false so callers can `return` it.
    pub fn set_error(&mut self, message: &str) -> bool {
        self.emit(message, Severity::Error, GENERAL_CATEGORY);
        false
    }

    /// Narrate a warning, returning the sink's acknowledgement.
    pub fn set_warning(&mut self, message: &str) -> bool {
        self.emit(message, Severity::Warn, GENERAL_CATEGORY)
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("type_name", &self.type_name)
            .field("config", &self.config)
            .field("level_override", &self.level_override)
            .field("log_mode", &self.log_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::super::destination::MemoryDestination;
    use super::*;

    fn sink(level: u8) -> (Diagnostics, MemoryDestination, MemoryDestination) {
        let log = MemoryDestination::new();
        let interactive = MemoryDestination::new();
        let diagnostics = Diagnostics::new("Session", DiagnosticsConfig::verbose(level))
            .with_log_destination(log.clone())
            .with_interactive_destination(interactive.clone());
        (diagnostics, log, interactive)
    }

    #[test]
    fn test_level_zero_is_silent() {
        let (mut d, log, interactive) = sink(0);
        assert!(d.set_warning("quiet"));
        assert!(log.is_empty());
        assert!(interactive.is_empty());
    }

    #[test]
    fn test_threshold_gates_by_level() {
        let (mut d, _log, interactive) = sink(2);
        d.show("one", 1, Severity::Info, "t");
        d.show("two", 2, Severity::Info, "t");
        d.show("three", 3, Severity::Info, "t");

        let messages: Vec<_> = interactive.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }

    #[test]
    fn test_log_mode_routes_to_log() {
        let (mut d, log, interactive) = sink(1);
        d.set_log_mode(true);
        assert_eq!(d.route(), Route::Log);

        d.emit("to the log", Severity::Info, "t");
        assert_eq!(log.len(), 1);
        assert!(interactive.is_empty());
    }

    #[test]
    fn test_override_takes_precedence() {
        let (mut d, _log, _interactive) = sink(1);
        d.set_debug_level(4);
        assert_eq!(d.debug_level(), 4);
        d.clear_debug_override();
        assert_eq!(d.debug_level(), 1);
    }

    #[test]
    fn test_set_error_returns_false() {
        let (mut d, _log, interactive) = sink(1);
        assert!(!d.set_error("broken"));

        let records = interactive.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(records[0].category, GENERAL_CATEGORY);
        assert_eq!(records[0].type_name, "Session");
    }

    #[test]
    fn test_set_warning_acknowledges() {
        let (mut d, _log, interactive) = sink(1);
        assert!(d.set_warning("heads up"));
        assert_eq!(interactive.records()[0].severity, Severity::Warn);
    }

    struct ClosedStream;

    impl std::io::Write for ClosedStream {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_set_warning_reports_failed_write() {
        let mut d = Diagnostics::new("Session", DiagnosticsConfig::verbose(1))
            .with_interactive_destination(WriterDestination::console(ClosedStream));

        assert!(!d.set_warning("lost"));
        // Gated-out calls never touch the writer
        assert!(d.show("quiet", 2, Severity::Info, "t"));
    }

    #[test]
    fn test_config_log_mode_initializes_route() {
        let d = Diagnostics::new("T", DiagnosticsConfig::verbose(1).with_log_mode(true));
        assert_eq!(d.route(), Route::Log);
    }
}
