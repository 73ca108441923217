//! # fk-protocol
//!
//! Core protocol definitions and data models for fitkit.
//!
//! This crate defines all shared data structures used for:
//! - Routine definitions as stored by the hosted backend
//! - Ephemeral per-exercise execution progress
//! - Completion history records and meal plans
//! - Configuration file parsing (`.fitkit/config.toml`)
//! - Communication between the TUI and the core
//!
//! ## Modules
//!
//! - [`routine_models`]: Routines, exercise definitions and weekdays
//! - [`progress_models`]: Per-exercise execution progress
//! - [`completion_models`]: Completion history records
//! - [`meal_models`]: Daily meal plans
//! - [`config_models`]: Global configuration from config.toml
//! - [`ipc`]: Operations and Events for Core-TUI communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, chrono and uuid
//! - TypeScript generation: All types derive `TS` for web client compatibility
//! - Independent compilation: No dependencies on other fitkit crates

pub mod completion_models;
pub mod config_models;
pub mod ipc;
pub mod meal_models;
pub mod progress_models;
pub mod routine_models;

// Re-export all public types for convenience
pub use completion_models::*;
pub use config_models::*;
pub use ipc::*;
pub use meal_models::*;
pub use progress_models::*;
pub use routine_models::*;
