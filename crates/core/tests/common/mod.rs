//! Common test utilities shared by the core integration tests.
//!
//! This module provides:
//! - Test fixtures (routines, projects on disk, engine wiring)
//! - Event assertions

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
