//! GPUI integration for touch_linegraph.
//!
//! This module provides a GPUI view that renders a [`LineGraph`](crate::graph::LineGraph),
//! feeds mouse input into its gesture resolver and drives the long-press timer
//! from animation frames.

mod paint;
mod text;
mod view;

pub use view::GpuiLineGraphView;
