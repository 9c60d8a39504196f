//! Line graph entry points and builders.
//!
//! [`LineGraph`] owns the lines, the viewport and the gesture session of one
//! graph. Every mutation goes through `&mut self`; [`LineGraph::frame`] reads a
//! consistent snapshot and records draw commands without touching state.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, trace};

use crate::axis::{Axis, AxisFormatter, AxisScale, compute_scale};
use crate::config::GraphConfig;
use crate::error::{ChartError, ChartResult};
use crate::geom::{DataPoint, ScreenPoint, ScreenRect, Size};
use crate::gesture::{GestureEvent, GestureInput, GesturePhase, GestureResolver, PointerEvent};
use crate::layout::{
    ChartLayout, MonospaceMeasurer, PlacedLabel, TextMeasurer, chart_layout, layout_x_labels,
    layout_y_labels,
};
use crate::render::{DefaultRenderer, RenderCommand, RenderList, StyleRenderer, area_outline};
use crate::selection::{ProjectedLine, Selection, SelectionLock, resolve_locks};
use crate::series::Line;
use crate::style::GridStyle;
use crate::transform::Transform;
use crate::viewport::ViewportState;

/// Receives drag selection notifications.
///
/// Closures `FnMut(f32, &[DataPoint])` implement this trait and only observe
/// [`SelectionListener::on_selection`].
pub trait SelectionListener: Send + Sync {
    /// A long press was recognized and a selection drag started.
    fn on_selection_start(&mut self) {}

    /// Called once per rendered frame while dragging, with the guide x and
    /// the locked points (one per line).
    fn on_selection(&mut self, x: f32, points: &[DataPoint]);

    /// The selection drag ended or was cancelled.
    fn on_selection_end(&mut self) {}
}

impl<F> SelectionListener for F
where
    F: FnMut(f32, &[DataPoint]) + Send + Sync,
{
    fn on_selection(&mut self, x: f32, points: &[DataPoint]) {
        self(x, points);
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Ordered draw commands.
    pub commands: RenderList,
    /// Placed X axis labels.
    pub x_labels: Vec<PlacedLabel>,
    /// Placed Y axis labels.
    pub y_labels: Vec<PlacedLabel>,
    /// Label column, label row and plot insets.
    pub layout: ChartLayout,
    /// Selection snapshot while dragging with at least one locked point.
    pub selection: Option<Selection>,
}

struct Geometry {
    layout: ChartLayout,
    transform: Transform,
    x_ticks: Vec<(String, f64)>,
    y_ticks: Vec<(String, f64)>,
}

/// A scrollable, zoomable line graph.
pub struct LineGraph {
    lines: Vec<Line>,
    scales: Option<(AxisScale, AxisScale)>,
    config: GraphConfig,
    x_formatter: AxisFormatter,
    y_formatter: AxisFormatter,
    viewport: ViewportState,
    gestures: GestureResolver,
    canvas: Size,
    drag_x: Option<f32>,
    /// Label layout from the last measured render.
    measured_layout: Option<ChartLayout>,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    renderer: Arc<dyn StyleRenderer + Send + Sync>,
    listener: Option<Box<dyn SelectionListener>>,
}

impl fmt::Debug for LineGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineGraph")
            .field("lines", &self.lines)
            .field("scales", &self.scales)
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("gestures", &self.gestures)
            .field("canvas", &self.canvas)
            .field("drag_x", &self.drag_x)
            .finish_non_exhaustive()
    }
}

impl LineGraph {
    /// Create a graph with default configuration.
    pub fn new(lines: Vec<Line>) -> ChartResult<Self> {
        Self::builder().lines(lines).build()
    }

    /// Start building a graph with custom configuration.
    pub fn builder() -> LineGraphBuilder {
        LineGraphBuilder::default()
    }

    /// Access the lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Access the configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// Disabling selection ends an active or pending selection drag.
    pub fn set_config(&mut self, config: GraphConfig) -> ChartResult<()> {
        self.scales = Some(compute_scales(&self.lines, &config)?);
        let bounds = self.gestures.config().bounds;
        *self.gestures.config_mut() = config.gesture_config(bounds);
        self.config = config;
        self.measured_layout = None;
        if !self.config.selection.enabled {
            let selecting = matches!(
                self.gestures.phase(),
                GesturePhase::AwaitingLongPress | GesturePhase::Dragging
            );
            if selecting {
                for event in self.gestures.reset() {
                    self.apply_gesture_event(event);
                }
            }
        }
        self.refresh_scroll_bound();
        Ok(())
    }

    /// Access the scroll and zoom state.
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// X and Y scales of the installed lines.
    pub fn scales(&self) -> Option<(AxisScale, AxisScale)> {
        self.scales
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Current gesture phase.
    pub fn gesture_phase(&self) -> GesturePhase {
        self.gestures.phase()
    }

    /// Drag x while a selection drag is active.
    pub fn drag_x(&self) -> Option<f32> {
        self.drag_x
    }

    /// When the host should deliver the next [`LineGraph::tick`].
    pub fn next_deadline(&self) -> Option<Duration> {
        self.gestures.deadline()
    }

    /// Install a selection listener.
    pub fn set_listener(&mut self, listener: impl SelectionListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Remove the selection listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Replace the text measurer used for label layout.
    pub fn set_measurer(&mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) {
        self.measurer = measurer;
        self.measured_layout = None;
        self.refresh_scroll_bound();
    }

    /// Replace the lines.
    ///
    /// Fails without changing the graph when the list or a line is empty, or
    /// a point is not finite.
    pub fn set_lines(&mut self, lines: Vec<Line>) -> ChartResult<()> {
        validate_lines(&lines)?;
        self.scales = Some(compute_scales(&lines, &self.config)?);
        debug!(
            lines = lines.len(),
            points = lines.iter().map(|line| line.points().len()).sum::<usize>(),
            "lines installed"
        );
        self.lines = lines;
        self.refresh_scroll_bound();
        Ok(())
    }

    /// Update the canvas size.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas = size;
        let bounds = size
            .is_valid()
            .then(|| ScreenRect::from_origin_size(ScreenPoint::new(0.0, 0.0), size));
        self.gestures.config_mut().bounds = bounds;
        self.refresh_scroll_bound();
    }

    /// Apply a native scroll delta and return the consumed part.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        self.viewport.pan(delta)
    }

    /// Multiply the zoom factor.
    pub fn zoom_by(&mut self, factor: f32) {
        self.viewport.zoom_by(factor);
        self.refresh_scroll_bound();
    }

    /// Feed a pointer event into the gesture resolver.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<GestureEvent> {
        self.dispatch(GestureInput::Pointer(event))
    }

    /// Deliver a timer tick for a pending long press.
    pub fn tick(&mut self, at: Duration) -> Vec<GestureEvent> {
        self.dispatch(GestureInput::Tick(at))
    }

    /// Cancel the current gesture.
    pub fn cancel_gesture(&mut self, at: Duration) -> Vec<GestureEvent> {
        self.dispatch(GestureInput::Cancel(at))
    }

    fn dispatch(&mut self, input: GestureInput) -> Vec<GestureEvent> {
        let events = self.gestures.handle(input);
        for event in &events {
            self.apply_gesture_event(*event);
        }
        events
    }

    fn apply_gesture_event(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Zoom(factor) => self.zoom_by(factor),
            GestureEvent::DragStart(position) => {
                self.drag_x = Some(position.x);
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_selection_start();
                }
            }
            GestureEvent::DragMove(position) => self.drag_x = Some(position.x),
            GestureEvent::DragEnd => {
                self.drag_x = None;
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_selection_end();
                }
            }
            GestureEvent::Abandoned => trace!("long press abandoned"),
        }
    }

    /// Recompute the scroll bound, preferring the label layout of the last
    /// measured render over the graph's own measurer.
    fn refresh_scroll_bound(&mut self) {
        let layout = match self.measured_layout {
            Some(layout) => Some(layout),
            None => {
                let measurer = Arc::clone(&self.measurer);
                self.geometry(measurer.as_ref()).map(|geometry| geometry.layout)
            }
        };
        if let Some(layout) = layout {
            self.apply_scroll_bound(layout);
        }
    }

    fn apply_scroll_bound(&mut self, layout: ChartLayout) {
        let Some((x_scale, y_scale)) = self.scales else {
            return;
        };
        let Some(transform) = Transform::new(
            &self.viewport,
            self.canvas,
            layout.insets,
            x_scale,
            y_scale,
            &self.config.x_axis,
        ) else {
            return;
        };
        let before = self.viewport.max_scroll_offset();
        let content = transform.content_width(x_scale.max);
        self.viewport.update_scroll_bound(content, self.canvas.width);
        let after = self.viewport.max_scroll_offset();
        if before != after {
            debug!(before, after, "max scroll offset changed");
        }
    }

    fn geometry(&self, measurer: &dyn TextMeasurer) -> Option<Geometry> {
        let (x_scale, y_scale) = self.scales?;
        if !self.canvas.is_valid() {
            return None;
        }
        let x_ticks: Vec<(String, f64)> = x_scale
            .ticks_until_max()
            .into_iter()
            .map(|value| (self.x_formatter.format(value), value))
            .collect();
        let y_ticks: Vec<(String, f64)> = y_scale
            .ticks()
            .into_iter()
            .map(|value| (self.y_formatter.format(value), value))
            .collect();
        let x_texts: Vec<String> = x_ticks.iter().map(|(text, _)| text.clone()).collect();
        let y_texts: Vec<String> = y_ticks.iter().map(|(text, _)| text.clone()).collect();

        let layout = chart_layout(
            measurer,
            &x_texts,
            &y_texts,
            self.config.theme.label_size,
            &self.config.x_axis,
            &self.config.y_axis,
            self.config.margins(),
        );
        let transform = Transform::new(
            &self.viewport,
            self.canvas,
            layout.insets,
            x_scale,
            y_scale,
            &self.config.x_axis,
        )?;
        Some(Geometry {
            layout,
            transform,
            x_ticks,
            y_ticks,
        })
    }

    /// Build the current frame with the graph's own text measurer.
    pub fn frame(&self) -> Frame {
        self.frame_with(self.measurer.as_ref())
    }

    /// Build the current frame, measuring labels with `measurer`.
    ///
    /// Returns an empty frame when the canvas has no area.
    pub fn frame_with(&self, measurer: &dyn TextMeasurer) -> Frame {
        let Some(geometry) = self.geometry(measurer) else {
            return Frame::default();
        };
        let Geometry {
            layout,
            transform,
            x_ticks,
            y_ticks,
        } = geometry;
        let renderer = self.renderer.as_ref();
        let canvas = self.canvas;
        let insets = layout.insets;
        let plot_right = canvas.width - insets.right;
        let mut commands = RenderList::new();

        if let Some(grid) = self.config.grid.as_ref() {
            for value in grid_values(grid, transform.y_scale(), &y_ticks) {
                let y = transform.y_to_screen(value);
                if y >= insets.top && y <= transform.bottom() {
                    renderer.grid_line(&mut commands, insets.left, plot_right, y, grid);
                }
            }
        }

        let projected: Vec<Vec<ScreenPoint>> = self
            .lines
            .iter()
            .map(|line| {
                line.points()
                    .iter()
                    .map(|point| transform.data_to_screen(*point))
                    .collect()
            })
            .collect();

        let lock = match self.drag_x {
            Some(drag_x) => resolve_locks(
                drag_x,
                transform.point_pitch_px() * 0.5,
                self.lines
                    .iter()
                    .zip(&projected)
                    .map(|(line, screen)| ProjectedLine {
                        id: line.id(),
                        points: line.points(),
                        screen,
                    }),
            ),
            None => SelectionLock::default(),
        };

        for (line, screen) in self.lines.iter().zip(&projected) {
            if let Some(area) = line.area() {
                renderer.area(&mut commands, area_outline(screen, transform.bottom()), area);
            }
            if let Some(connection) = line.connection() {
                for pair in screen.windows(2) {
                    renderer.connection(&mut commands, pair[0], pair[1], connection);
                }
            }
            if let Some(intersection) = line.intersection() {
                for (index, (offset, point)) in screen.iter().zip(line.points()).enumerate() {
                    if !lock.is_locked(line.id(), index) {
                        renderer.intersection(&mut commands, *offset, *point, intersection);
                    }
                }
            }
        }

        let background = self.config.theme.background;
        commands.push(RenderCommand::Rect {
            rect: ScreenRect::new(
                ScreenPoint::new(0.0, 0.0),
                ScreenPoint::new(layout.column_width, canvas.height),
            ),
            color: background,
        });
        if insets.right > 0.0 {
            commands.push(RenderCommand::Rect {
                rect: ScreenRect::new(
                    ScreenPoint::new(plot_right, 0.0),
                    ScreenPoint::new(canvas.width, canvas.height),
                ),
                color: background,
            });
        }

        let visible = |x: f32| x >= layout.column_width && x <= plot_right;
        let mut selection = None;
        if self.drag_x.is_some() {
            if let (Some(x), Some(guide)) = (lock.guide_x(), self.config.selection.guide.as_ref()) {
                if visible(x) {
                    renderer.guide(
                        &mut commands,
                        ScreenPoint::new(x, transform.bottom()),
                        ScreenPoint::new(x, 0.0),
                        guide,
                    );
                }
            }
            for locked in lock.locks() {
                let highlight = self
                    .lines
                    .iter()
                    .find(|line| line.id() == locked.line)
                    .and_then(Line::highlight);
                if let Some(highlight) = highlight {
                    if visible(locked.offset.x) {
                        renderer.highlight(&mut commands, locked.offset, highlight);
                    }
                }
            }
            selection = lock.guide_x().map(|x| Selection {
                x,
                points: lock.points(),
            });
        }

        let label_size = self.config.theme.label_size;
        let y_labels = layout_y_labels(
            measurer,
            y_ticks
                .into_iter()
                .map(|(text, value)| (text, transform.y_to_screen(value))),
            label_size,
            &layout,
            &self.config.y_axis,
        );
        let x_labels = layout_x_labels(
            measurer,
            x_ticks
                .into_iter()
                .map(|(text, value)| (text, transform.x_to_screen(value))),
            label_size,
            &layout,
            canvas,
            &self.config.x_axis,
        );

        Frame {
            commands,
            x_labels,
            y_labels,
            layout,
            selection,
        }
    }

    /// Build the current frame and report the selection to the listener.
    pub fn render(&mut self) -> Frame {
        let measurer = Arc::clone(&self.measurer);
        self.render_with(measurer.as_ref())
    }

    /// Like [`LineGraph::render`], measuring labels with `measurer`.
    ///
    /// The measured label layout is kept and used for scroll clamping until
    /// the next render, so scrolling and zooming between frames agree with
    /// what was drawn.
    pub fn render_with(&mut self, measurer: &dyn TextMeasurer) -> Frame {
        if let Some(geometry) = self.geometry(measurer) {
            self.measured_layout = Some(geometry.layout);
            self.apply_scroll_bound(geometry.layout);
        }
        let frame = self.frame_with(measurer);
        let selection = frame.selection.as_ref();
        if let (Some(selection), Some(listener)) = (selection, self.listener.as_mut()) {
            listener.on_selection(selection.x, &selection.points);
        }
        frame
    }
}

fn grid_values(grid: &GridStyle, y_scale: AxisScale, y_ticks: &[(String, f64)]) -> Vec<f64> {
    match grid.steps {
        None => y_ticks.iter().map(|(_, value)| *value).collect(),
        Some(0) => Vec::new(),
        Some(1) => vec![y_scale.min],
        Some(steps) => {
            let span = y_scale.labeled_span();
            let intervals = (steps - 1) as f64;
            (0..steps)
                .map(|index| y_scale.min + span * index as f64 / intervals)
                .collect()
        }
    }
}

fn validate_lines(lines: &[Line]) -> ChartResult<()> {
    if lines.is_empty() {
        return Err(ChartError::InvalidInput("no lines"));
    }
    for (line_index, line) in lines.iter().enumerate() {
        if line.points().is_empty() {
            return Err(ChartError::InvalidInput("line has no points"));
        }
        if let Some(index) = line.points().iter().position(|point| !point.is_finite()) {
            return Err(ChartError::NonFinite {
                line: line_index,
                index,
            });
        }
    }
    Ok(())
}

fn compute_scales(lines: &[Line], config: &GraphConfig) -> ChartResult<(AxisScale, AxisScale)> {
    let points = || lines.iter().flat_map(|line| line.points());
    let x = compute_scale(
        points(),
        Axis::X,
        config.x_axis.steps,
        config.x_axis.round_to_int,
    )?;
    let y = compute_scale(
        points(),
        Axis::Y,
        config.y_axis.steps,
        config.y_axis.round_to_int,
    )?;
    Ok((x, y))
}

/// Builder for configuring a graph before construction.
#[derive(Default)]
pub struct LineGraphBuilder {
    lines: Vec<Line>,
    config: GraphConfig,
    x_formatter: AxisFormatter,
    y_formatter: AxisFormatter,
    canvas: Option<Size>,
    measurer: Option<Arc<dyn TextMeasurer + Send + Sync>>,
    renderer: Option<Arc<dyn StyleRenderer + Send + Sync>>,
    listener: Option<Box<dyn SelectionListener>>,
}

impl LineGraphBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a line.
    pub fn line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// Add several lines.
    pub fn lines(mut self, lines: impl IntoIterator<Item = Line>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Set the X label formatter.
    pub fn x_formatter(mut self, formatter: AxisFormatter) -> Self {
        self.x_formatter = formatter;
        self
    }

    /// Set the Y label formatter.
    pub fn y_formatter(mut self, formatter: AxisFormatter) -> Self {
        self.y_formatter = formatter;
        self
    }

    /// Set the initial canvas size.
    pub fn canvas_size(mut self, size: Size) -> Self {
        self.canvas = Some(size);
        self
    }

    /// Set the text measurer used for label layout.
    pub fn measurer(mut self, measurer: impl TextMeasurer + Send + Sync + 'static) -> Self {
        self.measurer = Some(Arc::new(measurer));
        self
    }

    /// Set the style renderer.
    pub fn renderer(mut self, renderer: impl StyleRenderer + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Set the selection listener.
    pub fn listener(mut self, listener: impl SelectionListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Build the graph, validating the lines.
    pub fn build(self) -> ChartResult<LineGraph> {
        let gestures = GestureResolver::new(self.config.gesture_config(None));
        let mut graph = LineGraph {
            lines: Vec::new(),
            scales: None,
            config: self.config,
            x_formatter: self.x_formatter,
            y_formatter: self.y_formatter,
            viewport: ViewportState::new(),
            gestures,
            canvas: Size::default(),
            drag_x: None,
            measured_layout: None,
            measurer: self
                .measurer
                .unwrap_or_else(|| Arc::new(MonospaceMeasurer::default())),
            renderer: self.renderer.unwrap_or_else(|| Arc::new(DefaultRenderer)),
            listener: self.listener,
        };
        graph.set_lines(self.lines)?;
        if let Some(size) = self.canvas {
            graph.set_canvas_size(size);
        }
        Ok(graph)
    }
}

/// A cloneable handle sharing one graph between a view and async tasks.
///
/// The graph is locked for the duration of each callback.
#[derive(Clone)]
pub struct LineGraphHandle {
    graph: Arc<RwLock<LineGraph>>,
}

impl LineGraphHandle {
    /// Wrap a graph.
    pub fn new(graph: LineGraph) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
        }
    }

    /// Read the graph.
    pub fn read<R>(&self, f: impl FnOnce(&LineGraph) -> R) -> R {
        let graph = self.graph.read().unwrap_or_else(PoisonError::into_inner);
        f(&graph)
    }

    /// Mutate the graph.
    pub fn write<R>(&self, f: impl FnOnce(&mut LineGraph) -> R) -> R {
        let mut graph = self.graph.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut graph)
    }

    /// Replace the lines.
    pub fn set_lines(&self, lines: Vec<Line>) -> ChartResult<()> {
        self.write(|graph| graph.set_lines(lines))
    }
}
