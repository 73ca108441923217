//! # fk-core
//!
//! Workout execution core for fitkit.
//!
//! This crate provides:
//! - The per-exercise set tracker and rest countdown engine
//! - The derived "workout completed" aggregate and the finalize action
//! - The persistence collaborator trait with in-memory and REST adapters
//! - Configuration loading from the `.fitkit/` directory
//! - Routine validation and meal plan upserts
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`engine`]: Op/Event loop driving one workout execution
//! - [`logging`]: tracing subscriber setup
//! - [`meals`]: Meal plan parsing and persistence
//! - [`routines`]: Routine validation and lookup
//! - [`session`]: Explicit user session context
//! - [`store`]: Persistence collaborator trait and adapters
//! - [`workout`]: Execution state machine

pub mod config;
pub mod engine;
pub mod logging;
pub mod meals;
pub mod routines;
pub mod session;
pub mod store;
pub mod workout;
