//! CLI library components for the CARG converter.

pub mod logging;
pub mod settings;
