//! Stats module - dashboard KPIs

mod kpi;

pub use kpi::{KpiCalculator, Kpis, NO_HASHTAG};
