//! Diagnostics sink for object instances
//!
//! Provides:
//! - Leveled emission gated by the instance debug level
//! - Log, console, and markup destinations
//! - `set_error` / `set_warning` narration helpers
//!
//! # Principles
//!
//! 1. Diagnostics never influence control flow
//! 2. Emission never fails the caller
//! 3. Destination is chosen by the host, not sniffed from the environment
//! 4. Nothing is retained by the sink itself
//!
//! # Usage
//!
//! ```ignore
//! use uobject::diagnostics::{Diagnostics, DiagnosticsConfig, Severity};
//!
//! let mut diagnostics = Diagnostics::new("Session", DiagnosticsConfig::verbose(1));
//! diagnostics.emit("loaded", Severity::Info, "lifecycle");
//! diagnostics.set_warning("stale cache");
//! ```

mod config;
mod destination;
mod severity;
mod sink;

pub use config::{DiagnosticsConfig, OutputContext};
pub use destination::{LineStyle, MemoryDestination, OutputDestination, WriterDestination};
pub use severity::Severity;
pub use sink::{Diagnostic, Diagnostics, Route, GENERAL_CATEGORY};
