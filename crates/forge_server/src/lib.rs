//! HTTP surface for SiteForge.
//!
//! Wires the coordinator behind an axum router: `POST /generate`,
//! `GET /download-zip`, `GET /preview-fallback/{*path}`, `GET /health`.

pub mod config;
pub mod routes;
pub mod state;
