//! CLI argument definitions using clap
//!
//! Commands:
//! - uobject build
//! - uobject reconcile
//! - uobject check-schema
//!
//! Every command reads one JSON request line on stdin.

use clap::{Parser, Subcommand, ValueEnum};

use crate::diagnostics::{DiagnosticsConfig, OutputContext};

/// uobject - schema-driven instance data for data objects
#[derive(Parser, Debug)]
#[command(name = "uobject")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Diagnostics verbosity; 0 silences them
    #[arg(long, global = true, env = "UOBJECT_DEBUG", default_value_t = 0)]
    pub debug: u8,

    /// Route diagnostics to the log destination
    #[arg(long, global = true)]
    pub log_mode: bool,

    /// Interactive diagnostics style when log mode is off
    #[arg(long, global = true, value_enum, default_value_t = ContextArg::Console)]
    pub context: ContextArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContextArg {
    /// ANSI colored lines
    Console,
    /// HTML markup lines
    Server,
}

impl From<ContextArg> for OutputContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Console => OutputContext::Console,
            ContextArg::Server => OutputContext::Server,
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Build a normalized record from {"schema", "bundle"}
    Build,

    /// Reconcile {"bundle"} onto {"properties"} using {"schema"}
    Reconcile,

    /// Check a schema document
    CheckSchema,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Diagnostics configuration requested on the command line
    pub fn diagnostics_config(&self) -> DiagnosticsConfig {
        DiagnosticsConfig::verbose(self.debug)
            .with_log_mode(self.log_mode)
            .with_context(self.context.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_defaults() {
        let cli = Cli::try_parse_from(["uobject", "build"]).unwrap();
        assert_eq!(cli.command, Command::Build);
        assert_eq!(cli.diagnostics_config(), DiagnosticsConfig::default());
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "uobject",
            "reconcile",
            "--debug",
            "2",
            "--log-mode",
            "--context",
            "server",
        ])
        .unwrap();

        let config = cli.diagnostics_config();
        assert_eq!(cli.command, Command::Reconcile);
        assert_eq!(config.debug_level, 2);
        assert!(config.log_mode);
        assert_eq!(config.context, OutputContext::Server);
    }

    #[test]
    fn test_parse_check_schema() {
        let cli = Cli::try_parse_from(["uobject", "check-schema"]).unwrap();
        assert_eq!(cli.command, Command::CheckSchema);
    }
}
