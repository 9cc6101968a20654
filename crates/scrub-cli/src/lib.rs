//! Command-line surface for the anonymization client: argument parsing,
//! command dispatch, and result rendering.

pub mod cli;
pub mod commands;
pub mod output;
pub mod validation;

pub use cli::run;
