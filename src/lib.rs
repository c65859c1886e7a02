//! Strand Vault - Post-Apocalyptic Vault Management Simulation

pub mod campaign;
pub mod core;
pub mod llm;
pub mod simulation;
pub mod vault;
