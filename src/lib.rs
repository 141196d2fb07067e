//! TrendLens - Climate justice social media trend dashboard
//!
//! Demo data generation, CSV normalization and date filtering feed a desktop
//! dashboard, a static PNG report and a JSON summary.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod pipeline;
pub mod stats;

pub use config::DashboardConfig;
pub use pipeline::{Dashboard, DashboardInputs, DashboardView, DataSource, PipelineError};
