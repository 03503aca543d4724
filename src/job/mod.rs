// src/job/mod.rs

//! Job specifications and the registry that owns them.
//!
//! - [`spec`] is the in-memory description of one job.
//! - [`variant`] holds the per-kind strategy table (argument defaults,
//!   primary-resource key, lock-option handling).
//! - [`registry`] attaches specs to tasks and exposes the declaration API.
//! - [`validate`] checks the resolved prerequisite graph for cycles.

pub mod registry;
pub mod spec;
pub mod validate;
pub mod variant;

pub use registry::{JobBuilder, JobDefaults, JobRegistry};
pub use spec::{JobSpec, LockOptions};
pub use validate::check_acyclic;
pub use variant::{Variant, variant_for};
