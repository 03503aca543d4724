// src/task/mod.rs

//! Minimal task namespace that job specs hang off.
//!
//! - [`registry`] owns qualified task names, their scopes and prerequisite
//!   lists, and implements nearest-enclosing-scope lookup.

pub mod registry;

pub use registry::{DependencyResolver, TaskId, TaskRegistry, SCOPE_SEPARATOR};
