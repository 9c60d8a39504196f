//! Rendering primitives and style rendering.
//!
//! These types are backend-agnostic: the graph records a [`RenderList`] and a
//! backend (such as the GPUI backend) replays it onto a [`DrawSurface`]. The
//! core never rasterizes.

use crate::geom::{DataPoint, ScreenPoint, ScreenRect};
use crate::style::{
    AreaStyle, Color, ConnectionStyle, DrawStyle, GridStyle, HighlightStyle, IntersectionStyle,
    StrokeCap,
};

/// Stroke parameters for lines and outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke color, alpha already applied.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
    /// End cap.
    pub cap: StrokeCap,
    /// Optional `[on, off]` dash pattern.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    /// Create a solid stroke with butt caps.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: StrokeCap::Butt,
            dash: None,
        }
    }
}

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Solid fill.
    Fill(Color),
    /// Outline.
    Stroke(Stroke),
}

impl Paint {
    fn from_draw_style(color: Color, alpha: f32, style: DrawStyle) -> Self {
        let color = color.with_alpha(alpha);
        match style {
            DrawStyle::Fill => Self::Fill(color),
            DrawStyle::Stroke { width } => Self::Stroke(Stroke::solid(color, width)),
        }
    }
}

/// Render command list.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Draw a straight segment.
    Line {
        /// Segment start.
        start: ScreenPoint,
        /// Segment end.
        end: ScreenPoint,
        /// Stroke styling.
        stroke: Stroke,
    },
    /// Draw a circle.
    Circle {
        /// Circle center.
        center: ScreenPoint,
        /// Circle radius in pixels.
        radius: f32,
        /// Fill or outline.
        paint: Paint,
    },
    /// Draw a polygonal path.
    Path {
        /// Path vertices.
        points: Vec<ScreenPoint>,
        /// Close the path back to the first vertex.
        closed: bool,
        /// Fill or outline.
        paint: Paint,
    },
    /// Fill a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Fill color.
        color: Color,
    },
}

/// Aggregated render commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replay every command, in order, onto a surface.
    pub fn replay<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                RenderCommand::Line { start, end, stroke } => {
                    surface.draw_line(*start, *end, stroke);
                }
                RenderCommand::Circle {
                    center,
                    radius,
                    paint,
                } => surface.draw_circle(*center, *radius, paint),
                RenderCommand::Path {
                    points,
                    closed,
                    paint,
                } => surface.draw_path(points, *closed, paint),
                RenderCommand::Rect { rect, color } => surface.draw_rect(*rect, *color),
            }
        }
    }
}

/// Retained-mode drawing target.
pub trait DrawSurface {
    /// Draw a straight segment.
    fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint, stroke: &Stroke);
    /// Draw a circle.
    fn draw_circle(&mut self, center: ScreenPoint, radius: f32, paint: &Paint);
    /// Draw a polygonal path.
    fn draw_path(&mut self, points: &[ScreenPoint], closed: bool, paint: &Paint);
    /// Fill a rectangle.
    fn draw_rect(&mut self, rect: ScreenRect, color: Color);
}

/// Turns style records into render commands.
///
/// Override individual methods to change how one element is drawn; the
/// defaults produce the stock look.
pub trait StyleRenderer {
    /// Segment between two adjacent points of a line.
    fn connection(
        &self,
        out: &mut RenderList,
        start: ScreenPoint,
        end: ScreenPoint,
        style: &ConnectionStyle,
    ) {
        out.push(RenderCommand::Line {
            start,
            end,
            stroke: connection_stroke(style),
        });
    }

    /// Marker for an unselected point.
    fn intersection(
        &self,
        out: &mut RenderList,
        center: ScreenPoint,
        _point: DataPoint,
        style: &IntersectionStyle,
    ) {
        out.push(RenderCommand::Circle {
            center,
            radius: style.radius,
            paint: Paint::from_draw_style(style.color, style.alpha, style.style),
        });
    }

    /// Marker for a point locked by the drag selection.
    fn highlight(&self, out: &mut RenderList, center: ScreenPoint, style: &HighlightStyle) {
        out.push(RenderCommand::Circle {
            center,
            radius: style.radius,
            paint: Paint::from_draw_style(style.color, style.alpha, style.style),
        });
    }

    /// Region between a line and the chart bottom.
    fn area(&self, out: &mut RenderList, outline: Vec<ScreenPoint>, style: &AreaStyle) {
        out.push(RenderCommand::Path {
            points: outline,
            closed: true,
            paint: Paint::from_draw_style(style.color, style.alpha, style.style),
        });
    }

    /// Horizontal gridline.
    fn grid_line(&self, out: &mut RenderList, left: f32, right: f32, y: f32, style: &GridStyle) {
        out.push(RenderCommand::Line {
            start: ScreenPoint::new(left, y),
            end: ScreenPoint::new(right, y),
            stroke: Stroke::solid(style.color, style.line_width),
        });
    }

    /// Vertical selection guide.
    fn guide(
        &self,
        out: &mut RenderList,
        start: ScreenPoint,
        end: ScreenPoint,
        style: &ConnectionStyle,
    ) {
        out.push(RenderCommand::Line {
            start,
            end,
            stroke: connection_stroke(style),
        });
    }
}

/// Stock style renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl StyleRenderer for DefaultRenderer {}

fn connection_stroke(style: &ConnectionStyle) -> Stroke {
    Stroke {
        color: style.color.with_alpha(style.alpha),
        width: style.stroke_width,
        cap: style.cap,
        dash: style.dash,
    }
}

/// Outline of the area under a line: the line itself, then down to `bottom`
/// below the last point and back below the first point.
pub fn area_outline(points: &[ScreenPoint], bottom: f32) -> Vec<ScreenPoint> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let mut outline = Vec::with_capacity(points.len() + 2);
    outline.extend_from_slice(points);
    outline.push(ScreenPoint::new(last.x, bottom));
    outline.push(ScreenPoint::new(first.x, bottom));
    outline
}

/// Shortest dash period, in pixels, that is split into runs.
const MIN_DASH_PERIOD: f32 = 0.5;
/// Most runs a single segment is split into.
const MAX_DASH_RUNS: f32 = 4096.0;

/// Split a segment into the visible runs of an `[on, off]` dash pattern.
///
/// Surfaces without native dash support stroke each run separately. A pattern
/// without a positive `on` length, a period under half a pixel, or one that
/// would need more than 4096 runs yields the whole segment.
pub fn dash_segments(
    start: ScreenPoint,
    end: ScreenPoint,
    pattern: [f32; 2],
) -> Vec<(ScreenPoint, ScreenPoint)> {
    let [on, off] = pattern;
    let length = start.distance(end);
    let period = on + off;
    let valid = on.is_finite()
        && off.is_finite()
        && length.is_finite()
        && on > 0.0
        && off >= 0.0
        && period >= MIN_DASH_PERIOD
        && length / period <= MAX_DASH_RUNS;
    if !valid || length <= on {
        return vec![(start, end)];
    }
    let at = |distance: f32| {
        let t = distance / length;
        ScreenPoint::new(
            start.x + (end.x - start.x) * t,
            start.y + (end.y - start.y) * t,
        )
    };
    let mut runs = Vec::new();
    let mut cursor = 0.0_f32;
    while cursor < length {
        let run_end = (cursor + on).min(length);
        runs.push((at(cursor), at(run_end)));
        let next = run_end + off;
        if next <= cursor {
            // f32 no longer advances at this distance
            break;
        }
        cursor = next;
    }
    runs
}
