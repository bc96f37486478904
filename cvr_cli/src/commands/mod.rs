//! CLI subcommand implementations.

pub mod company;
pub mod export;
pub mod lookup;
pub mod search;
