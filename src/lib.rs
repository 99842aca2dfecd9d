//! Pulseboard - team performance dashboard service
//!
//! Serves monthly project status and KPI metrics per team member, accepts
//! authenticated monthly updates, and generates a natural-language summary
//! of the team data via an external text-generation service.
//!
//! ## Services
//!
//! - **Dashboard**: joins member, project, and KPI rows into per-member,
//!   per-month report views
//! - **Reports**: authenticated monthly update submission
//! - **Insight**: AI summary of a month's team performance
//! - **Seed**: sample dataset loading for fresh deployments

pub mod auth;
pub mod config;
pub mod db;
pub mod report;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{PulseError, Result};
