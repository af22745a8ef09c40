//! Backend bridge modules for UI command dispatch and runtime wiring.

pub mod commands;
pub mod runtime;
