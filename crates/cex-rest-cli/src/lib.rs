/*
[INPUT]:  Configuration sources and parsed subcommands
[OUTPUT]: Public API for the cex-rest binary
[POS]:    CLI crate root
[UPDATE]: When adding modules or changing exports
*/

pub mod commands;
pub mod config;

pub use commands::{Command, OutputFormat, run};
pub use config::{CliConfig, ExchangeConfig};
