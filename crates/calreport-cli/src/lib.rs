//! calreport command-line interface
//!
//! This crate provides the `calreport` binary: the owner, event listing and
//! daily updated events reports, plus `auth` and `config` helpers.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
