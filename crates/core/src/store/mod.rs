//! Persistence collaborator.
//!
//! This module provides the `Store` trait (Adapter Pattern) over the three
//! logical collections the application uses, plus three adapters:
//! - `FileStore`: local tables in `.fitkit/data.json`
//! - `RestStore`: the hosted backend
//! - `MemoryStore`: an in-process double with failure injection

pub mod base;
pub mod factory;
pub mod file;
pub mod memory;
pub mod rest;

pub use base::{collections, Store, StoreError, StoreResult};
pub use factory::open_store;
pub use file::FileStore;
pub use memory::{MemoryStore, StoreOperation};
pub use rest::RestStore;
