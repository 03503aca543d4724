// src/deploy/mod.rs

//! Uploading a job archive to an Azkaban server.
//!
//! Two wire protocols exist, picked by the server generation:
//!
//! - [`redirect`]: session-less upload; the outcome is encoded in the
//!   `Location` of a 302 response.
//! - [`session`]: explicit login returning a session id, then an upload
//!   whose failure is signalled through a `Set-Cookie` header.
//!
//! Neither variant retries and neither creates the target project.

pub mod client;
pub mod mime;
pub mod redirect;
pub mod session;

pub use client::{ArchiveSource, DEFAULT_UPLOAD_TIMEOUT, DeployOptions, build_client};
pub use mime::mime_for_path;
pub use redirect::{RedirectDeployer, interpret_location};
pub use session::{SessionDeployer, SessionId};
