use gpui::{
    App, BorderStyle, Bounds, Corners, Edges, PathBuilder, Pixels, TextRun, Window, font, point,
    px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::graph::Frame;
use crate::layout::PlacedLabel;
use crate::render::{DrawSurface, Paint, Stroke, dash_segments};
use crate::style::{Color, Theme};

use super::text::LABEL_FONT;

/// Paints canvas-local draw commands at `origin` in window space.
struct GpuiSurface<'a> {
    window: &'a mut Window,
    origin: ScreenPoint,
}

impl GpuiSurface<'_> {
    fn point(&self, local: ScreenPoint) -> gpui::Point<Pixels> {
        point(px(self.origin.x + local.x), px(self.origin.y + local.y))
    }

    fn bounds(&self, rect: ScreenRect) -> Bounds<Pixels> {
        Bounds::from_corners(self.point(rect.min), self.point(rect.max))
    }
}

impl DrawSurface for GpuiSurface<'_> {
    fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint, stroke: &Stroke) {
        let runs = match stroke.dash {
            Some(pattern) => dash_segments(start, end, pattern),
            None => vec![(start, end)],
        };
        let mut builder = PathBuilder::stroke(px(stroke.width.max(0.5)));
        for (from, to) in runs {
            builder.move_to(self.point(from));
            builder.line_to(self.point(to));
        }
        if let Ok(path) = builder.build() {
            self.window.paint_path(path, to_rgba(stroke.color));
        }
    }

    fn draw_circle(&mut self, center: ScreenPoint, radius: f32, paint: &Paint) {
        let radius = radius.max(0.5);
        let bounds = Bounds::from_corners(
            self.point(ScreenPoint::new(center.x - radius, center.y - radius)),
            self.point(ScreenPoint::new(center.x + radius, center.y + radius)),
        );
        let (fill, border, border_width) = match paint {
            Paint::Fill(color) => (*color, *color, 0.0),
            Paint::Stroke(stroke) => (Color::new(0.0, 0.0, 0.0, 0.0), stroke.color, stroke.width),
        };
        self.window.paint_quad(quad(
            bounds,
            Corners::all(px(radius)),
            to_rgba(fill),
            Edges::all(px(border_width)),
            to_rgba(border),
            BorderStyle::default(),
        ));
    }

    fn draw_path(&mut self, points: &[ScreenPoint], closed: bool, paint: &Paint) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let (mut builder, color) = match paint {
            Paint::Fill(color) => (PathBuilder::fill(), *color),
            Paint::Stroke(stroke) => (PathBuilder::stroke(px(stroke.width.max(0.5))), stroke.color),
        };
        builder.move_to(self.point(*first));
        for vertex in rest {
            builder.line_to(self.point(*vertex));
        }
        if closed {
            builder.line_to(self.point(*first));
        }
        if let Ok(path) = builder.build() {
            self.window.paint_path(path, to_rgba(color));
        }
    }

    fn draw_rect(&mut self, rect: ScreenRect, color: Color) {
        self.window.paint_quad(quad(
            self.bounds(rect),
            Corners::all(px(0.0)),
            to_rgba(color),
            Edges::all(px(0.0)),
            to_rgba(color),
            BorderStyle::default(),
        ));
    }
}

pub(crate) fn paint_frame(
    frame: &Frame,
    origin: ScreenPoint,
    theme: &Theme,
    window: &mut Window,
    cx: &mut App,
) {
    let mut surface = GpuiSurface {
        window: &mut *window,
        origin,
    };
    frame.commands.replay(&mut surface);

    for label in frame.y_labels.iter().chain(&frame.x_labels) {
        paint_label(window, cx, origin, label, theme);
    }
}

fn paint_label(
    window: &mut Window,
    cx: &mut App,
    origin: ScreenPoint,
    label: &PlacedLabel,
    theme: &Theme,
) {
    if label.text.is_empty() {
        return;
    }
    let run = TextRun {
        len: label.text.len(),
        font: font(LABEL_FONT),
        color: to_hsla(theme.label),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window.text_system().shape_line(
        label.text.clone().into(),
        px(theme.label_size),
        &[run],
        None,
    );
    let line_height = shaped.ascent + shaped.descent;
    let position = point(
        px(origin.x + label.origin.x),
        px(origin.y + label.origin.y),
    );
    let _ = shaped.paint(position, line_height, window, cx);
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}
