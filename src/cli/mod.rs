//! Command-line interface components
//!
//! This module contains CLI-specific code for the container app tool,
//! including argument parsing, command handlers and the provisioning spinner.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    Cli, Commands, ConfigureArgs, CreateArgs, GlobalArgs, ShowArgs, TargetArgs, VerifyArgs,
};
pub use commands::{handle_configure, handle_create, handle_show, handle_verify};
pub use progress::WaitSpinner;
