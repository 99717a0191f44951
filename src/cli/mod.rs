//! Interactive and scripted command shell over a finance book.

pub mod commands;
pub mod context;
pub mod output;
pub mod registry;
pub mod shell;

pub use context::{CliMode, CommandError, CommandResult, LoopControl, ShellContext};
pub use shell::run_cli;
