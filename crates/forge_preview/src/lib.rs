//! Preview supervision for SiteForge.
//!
//! [`PreviewSupervisor`] owns the dependency install and the single live
//! dev-server process for the workspace; [`port`] probes the preview port;
//! [`ReadinessPoller`] decides whether clients get the dev server or the
//! static fallback.

mod config;
mod error;
pub mod port;
mod readiness;
mod supervisor;

pub use config::PreviewConfig;
pub use error::{PreviewError, PreviewResult};
pub use readiness::{PreviewTarget, ReadinessPoller};
pub use supervisor::{PreviewSupervisor, StartOutcome, SupervisorState};
