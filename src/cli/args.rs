//! Command-line argument parsing for the container app CLI
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{Expectation, FieldPath};

/// Create and inspect container apps from YAML/JSON manifests
#[derive(Parser, Debug)]
#[command(
    name = "containerapp",
    version,
    about = "Create and inspect container apps from YAML/JSON manifests",
    long_about = "Submits a declarative manifest to the management API, merged with command-line overrides.
Values in the manifest always win; a differing override only produces a warning."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - only errors are logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update a container app from a manifest
    Create(CreateArgs),

    /// Show a container app
    Show(ShowArgs),

    /// Check fields of a container app against expected values
    Verify(VerifyArgs),

    /// Manage persisted defaults
    Configure(ConfigureArgs),
}

/// Arguments that address one container app
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Container app name
    #[arg(short, long)]
    pub name: String,

    /// Resource group (defaults to the configured group)
    #[arg(short = 'g', long)]
    pub resource_group: Option<String>,

    /// Subscription id (defaults to CONTAINERAPP_SUBSCRIPTION or the configured subscription)
    #[arg(long)]
    pub subscription: Option<String>,
}

/// Arguments for the create command
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Path to the YAML or JSON manifest
    #[arg(long, value_name = "FILE")]
    pub yaml: PathBuf,

    /// Managed environment name or resource id
    #[arg(long)]
    pub environment: Option<String>,

    /// Location used when the manifest has none
    #[arg(short, long)]
    pub location: Option<String>,

    /// Extra override, e.g. properties.template.scale.minReplicas=1
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub set: Vec<String>,

    /// Return without waiting for provisioning to finish
    #[arg(long)]
    pub no_wait: bool,

    /// Print the resolved manifest without submitting it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the show command
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print only the value at this path, e.g. properties.provisioningState
    #[arg(long, value_name = "PATH")]
    pub query: Option<FieldPath>,
}

/// Arguments for the verify command
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Expected value; VALUE is read as JSON when it parses, else as a string
    #[arg(long = "check", value_name = "PATH=VALUE", required = true)]
    pub checks: Vec<Expectation>,

    /// Report every mismatch instead of stopping at the first
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the configure command
#[derive(Args, Debug, Clone)]
pub struct ConfigureArgs {
    /// Defaults to persist: location, group, subscription. An empty value clears one.
    #[arg(long, value_name = "KEY=VALUE", num_args = 1..)]
    pub defaults: Vec<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Level requested by a verbosity flag, if any
    pub fn explicit_log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        self.explicit_log_level().unwrap_or(tracing::Level::WARN)
    }
}
