//! Inline charts and tables for SQL query results.
//!
//! Results arrive as JSON row objects and are converted to typed [`Cell`]s.
//! The chart picks a label and a value column, then lays out bars, pie
//! wedges or a line in SVG units.

mod component;
/// Chart layout in SVG units.
pub mod geometry;
mod table;

pub use component::{InlineChart, ResultTableView};
pub use geometry::{ChartFrame, ChartKind, DataPoint};
pub use table::{Cell, ChartColumns, PlotResult, ResultTable};
