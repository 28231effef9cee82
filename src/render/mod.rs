//! Page rendering with plotters.
//!
//! Pages are drawn onto a generic [`DrawingBackend`] and serialised with the
//! SVG backend into a `String`, so no system fonts or native libraries are
//! needed.
//!
//! [`DrawingBackend`]: plotters::prelude::DrawingBackend

pub mod chart;
pub mod marker;
pub mod table;

use std::fmt::Display;

use crate::error::ReportError;

pub use chart::{render_chart_page, ChartPage, ChartPanel, ChartSeries, LegendEntry};
pub use table::{render_description_page, DescriptionTable};

pub(crate) fn render_err<E: Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

/// Sans-serif font tuple at a pixel size.
pub(crate) fn font(px: f64) -> (&'static str, f64) {
    ("sans-serif", px)
}
