//! Subcommand implementations.

pub mod batch;
pub mod doctor;
pub mod extract;
pub mod generate;
