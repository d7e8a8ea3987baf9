//! Command-line interface module.

mod args;
pub mod generate;
pub mod replay;
pub mod signal;

pub use args::{Cli, Commands, GenerateArgs, ReplayArgs, SignalArgs};
