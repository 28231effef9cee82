//! Overview reports for tabular experiment results.
//!
//! Each input file is a delimited table whose first column is the x-axis,
//! followed by `PARAM:<name>` columns (constant per file) and
//! `MEASURE:<name>` columns. A report draws one subplot per measure with
//! every file overlaid, paginates the subplots with a shared legend per
//! page, and appends tables describing each file's parameters.
//!
//! ```no_run
//! use overview_report::{ReportConfig, ReportContext};
//! use std::path::Path;
//!
//! let ctx = ReportContext::new(ReportConfig::default()).unwrap();
//! let summary = ctx
//!     .write_report(&["runs/forest.csv", "runs/chain.csv"], Path::new("out"), "yeast")
//!     .unwrap();
//! println!("{} chart pages", summary.chart_pages);
//! ```

pub mod color;
pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod layout;
pub mod naming;
pub mod render;
pub mod report;
pub mod style;

pub use config::{ParamPolicy, ReportConfig};
pub use data::loader::{load_table, read_table};
pub use data::model::{Cell, Column, ColumnRole, Table, XAxis, MEASURE_PREFIX, PARAM_PREFIX};
pub use document::{HtmlDocument, MemorySink, PageKind, PageSink, RenderedPage};
pub use error::ReportError;
pub use report::{ReportContext, ReportSummary};
pub use style::StyleOverflow;
