//! touch_linegraph draws scrollable, pinch-zoomable line graphs with
//! long-press-then-drag point selection.
//!
//! The core is backend-agnostic: it maps data to screen space, resolves touch
//! gestures and records draw commands into a [`RenderList`]. The optional
//! `gpui` feature adds a GPUI view that replays those commands.

#![forbid(unsafe_code)]

pub mod axis;
pub mod config;
pub mod error;
pub mod geom;
pub mod gesture;
pub mod graph;
pub mod layout;
pub mod render;
pub mod selection;
pub mod series;
pub mod style;
pub mod transform;
pub mod viewport;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{Axis, AxisFormatter, AxisScale, XAxisConfig, YAxisConfig, compute_scale};
pub use config::GraphConfig;
pub use error::{ChartError, ChartResult};
pub use geom::{DataPoint, Insets, ScreenPoint, ScreenRect, Size};
#[cfg(feature = "gpui")]
pub use gpui_backend::GpuiLineGraphView;
pub use gesture::{
    GestureConfig, GestureEvent, GestureInput, GesturePhase, GestureResolver, GestureSession,
    PointerEvent, PointerId, PointerPhase, transition,
};
pub use graph::{Frame, LineGraph, LineGraphBuilder, LineGraphHandle, SelectionListener};
pub use layout::{
    ChartLayout, Margins, MonospaceMeasurer, PlacedLabel, TextMeasurer, chart_layout,
    layout_x_labels, layout_y_labels,
};
pub use render::{
    DefaultRenderer, DrawSurface, Paint, RenderCommand, RenderList, Stroke, StyleRenderer,
    area_outline, dash_segments,
};
pub use selection::{LockedPoint, ProjectedLine, Selection, SelectionLock, resolve_locks};
pub use series::{Line, LineId};
pub use style::{
    AreaStyle, Color, ConnectionStyle, DrawStyle, GridStyle, HighlightStyle, IntersectionStyle,
    SelectionStyle, StrokeCap, Theme,
};
pub use transform::Transform;
pub use viewport::ViewportState;
