// src/properties/mod.rs

//! Rendering job specs into Azkaban's `key=value` files.
//!
//! - [`serializer`] turns one spec into a file name and content.
//! - [`writer`] puts rendered files into the output directory.

pub mod serializer;
pub mod writer;

pub use serializer::{PropertiesFile, render_jvm_args, serialize};
pub use writer::{PropertiesWriter, render_all};
