//! CLI module for uobject
//!
//! Provides command-line access to:
//! - build: normalize a bundle against a schema
//! - reconcile: merge a bundle onto declared properties
//! - check-schema: validate a schema document

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ContextArg};
pub use commands::{build, check_schema, init_tracing, reconcile, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
