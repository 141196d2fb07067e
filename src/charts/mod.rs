//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{report_size_is_valid, RenderError, StaticChartRenderer, MAX_REPORT_SIDE};
