//! Python bindings (feature `python`)

pub mod orchestrator;
pub mod types;
