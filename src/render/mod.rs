//! Read-only presentation of a [`crate::Binomial`]: text tables and charts.
//!
//! Renderers borrow the distribution immutably and never touch its state.

pub mod chart;
pub mod table;

pub use chart::{render_chart, ChartKind, ChartOptions};
pub use table::{format_probability, render_table};
