//! Workspace materialization for SiteForge.
//!
//! A single workspace directory holds the latest generated project. The
//! [`Materializer`] replaces it wholesale per generation and mints a
//! [`GenerationId`] fingerprint; [`archive`] packages it for download.

pub mod archive;
mod default_project;
mod error;
mod materializer;

pub use default_project::default_artifacts;
pub use error::{WorkspaceError, WorkspaceResult};
pub use materializer::{GenerationId, Materializer};
