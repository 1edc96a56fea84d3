//! CLI commands.

pub mod config;
pub mod inspect;
pub mod transform;
