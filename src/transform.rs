//! Coordinate transforms between data and screen space.

use crate::axis::{AxisScale, XAxisConfig};
use crate::geom::{DataPoint, Insets, ScreenPoint, ScreenRect, Size};
use crate::viewport::ViewportState;

/// Data-to-screen mapping for one frame.
///
/// X has a fixed pixel pitch per unit (`step_size * zoom / unit`) and is
/// shifted by the scroll offset. Y is stretched so the labeled range of the
/// Y scale fills the space between the top and bottom insets, and is
/// inverted so values grow upward.
#[derive(Debug, Clone)]
pub struct Transform {
    canvas: Size,
    insets: Insets,
    x_scale: AxisScale,
    y_scale: AxisScale,
    scroll_offset: f32,
    zoom: f32,
    px_per_unit_x: f64,
    px_per_unit_y: f64,
}

impl Transform {
    /// Create a transform for the given viewport snapshot and canvas.
    ///
    /// Returns `None` when the canvas is empty or the X pitch is not positive.
    pub fn new(
        viewport: &ViewportState,
        canvas: Size,
        insets: Insets,
        x_scale: AxisScale,
        y_scale: AxisScale,
        x_axis: &XAxisConfig,
    ) -> Option<Self> {
        if !canvas.is_valid() {
            return None;
        }
        let px_per_unit_x = x_axis.step_size as f64 * viewport.zoom() as f64 / x_axis.unit;
        if !px_per_unit_x.is_finite() || px_per_unit_x <= 0.0 {
            return None;
        }
        let available = (canvas.height - insets.bottom - insets.top) as f64;
        let span = y_scale.labeled_span();
        let px_per_unit_y = if span > 0.0 && available > 0.0 {
            available / span
        } else {
            0.0
        };
        Some(Self {
            canvas,
            insets,
            x_scale,
            y_scale,
            scroll_offset: viewport.scroll_offset(),
            zoom: viewport.zoom(),
            px_per_unit_x,
            px_per_unit_y,
        })
    }

    /// Access the canvas size.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Access the insets.
    pub fn insets(&self) -> Insets {
        self.insets
    }

    /// Access the X scale.
    pub fn x_scale(&self) -> AxisScale {
        self.x_scale
    }

    /// Access the Y scale.
    pub fn y_scale(&self) -> AxisScale {
        self.y_scale
    }

    /// Zoom factor captured from the viewport.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Region between the insets.
    pub fn plot_rect(&self) -> ScreenRect {
        ScreenRect::new(
            ScreenPoint::new(self.insets.left, self.insets.top),
            ScreenPoint::new(
                self.canvas.width - self.insets.right,
                self.canvas.height - self.insets.bottom,
            ),
        )
    }

    /// Screen y of the chart bottom (the Y minimum).
    pub fn bottom(&self) -> f32 {
        self.canvas.height - self.insets.bottom
    }

    /// Pixel distance between points one unit apart at the current zoom.
    pub fn point_pitch_px(&self) -> f32 {
        self.px_per_unit_x as f32
    }

    /// Pixel width of one X tick at the current zoom.
    pub fn x_step_px(&self) -> f32 {
        (self.px_per_unit_x * self.x_scale.step) as f32
    }

    /// Map an x value into screen space.
    pub fn x_to_screen(&self, x: f64) -> f32 {
        ((x - self.x_scale.min) * self.px_per_unit_x + self.insets.left as f64
            - self.scroll_offset as f64) as f32
    }

    /// Map a y value into screen space.
    pub fn y_to_screen(&self, y: f64) -> f32 {
        (self.bottom() as f64 - (y - self.y_scale.min) * self.px_per_unit_y) as f32
    }

    /// Map a data point into screen space.
    pub fn data_to_screen(&self, point: DataPoint) -> ScreenPoint {
        ScreenPoint::new(self.x_to_screen(point.x), self.y_to_screen(point.y))
    }

    /// Map a screen point back into data space.
    ///
    /// With a degenerate Y range every screen y maps to the Y minimum.
    pub fn screen_to_data(&self, point: ScreenPoint) -> DataPoint {
        let x = (point.x as f64 + self.scroll_offset as f64 - self.insets.left as f64)
            / self.px_per_unit_x
            + self.x_scale.min;
        let y = if self.px_per_unit_y > 0.0 {
            (self.bottom() as f64 - point.y as f64) / self.px_per_unit_y + self.y_scale.min
        } else {
            self.y_scale.min
        };
        DataPoint::new(x, y)
    }

    /// Total content width for a rightmost x value, ignoring the scroll offset.
    pub fn content_width(&self, rightmost_x: f64) -> f32 {
        self.x_to_screen(rightmost_x) + self.scroll_offset + self.insets.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(min: f64, max: f64, step: f64, step_count: usize) -> AxisScale {
        AxisScale {
            min,
            max,
            step,
            step_count,
        }
    }

    fn transform(viewport: &ViewportState, insets: Insets) -> Transform {
        Transform::new(
            viewport,
            Size::new(300.0, 200.0),
            insets,
            scale(0.0, 20.0, 3.0, 10),
            scale(0.0, 75.0, 25.0, 4),
            &XAxisConfig::default(),
        )
        .expect("valid transform")
    }

    #[test]
    fn linear_roundtrip() {
        let viewport = ViewportState::new();
        let transform = transform(&viewport, Insets::new(30.0, 16.0, 0.0, 24.0));
        for point in [
            DataPoint::new(0.0, 0.0),
            DataPoint::new(3.5, 12.25),
            DataPoint::new(20.0, 75.0),
        ] {
            let screen = transform.data_to_screen(point);
            let roundtrip = transform.screen_to_data(screen);
            assert!((roundtrip.x - point.x).abs() < 1e-3);
            assert!((roundtrip.y - point.y).abs() < 1e-3);
        }
    }

    #[test]
    fn y_is_inverted_and_fills_plot_height() {
        let viewport = ViewportState::new();
        let transform = transform(&viewport, Insets::new(0.0, 20.0, 0.0, 30.0));
        assert_eq!(transform.y_to_screen(0.0), 170.0);
        assert_eq!(transform.y_to_screen(75.0), 20.0);
    }

    #[test]
    fn x_follows_zoom_and_scroll() {
        let mut viewport = ViewportState::new();
        viewport.zoom_by(2.0);
        viewport.update_scroll_bound(1000.0, 300.0);
        viewport.set_scroll_offset(15.0);
        let transform = transform(&viewport, Insets::new(10.0, 0.0, 0.0, 0.0));
        assert_eq!(transform.x_to_screen(3.0), 3.0 * 40.0 + 10.0 - 15.0);
        assert_eq!(transform.point_pitch_px(), 40.0);
        assert_eq!(transform.x_step_px(), 120.0);
    }

    #[test]
    fn scroll_bound_from_rightmost_point() {
        let viewport = ViewportState::new();
        let transform = transform(&viewport, Insets::default());
        let content = transform.content_width(20.0);
        assert_eq!(content, 400.0);
        let mut next = viewport;
        next.update_scroll_bound(content, transform.canvas().width);
        assert_eq!(next.max_scroll_offset(), 100.0);
    }

    #[test]
    fn degenerate_y_maps_to_bottom() {
        let viewport = ViewportState::new();
        let transform = Transform::new(
            &viewport,
            Size::new(100.0, 100.0),
            Insets::new(0.0, 10.0, 0.0, 10.0),
            scale(0.0, 1.0, 1.0, 1),
            scale(5.0, 5.0, 0.0, 5),
            &XAxisConfig::default(),
        )
        .unwrap();
        assert_eq!(transform.y_to_screen(5.0), 90.0);
        assert_eq!(transform.screen_to_data(ScreenPoint::new(0.0, 12.0)).y, 5.0);
    }

    #[test]
    fn unit_scales_pitch() {
        let viewport = ViewportState::new();
        let config = XAxisConfig {
            unit: 0.1,
            ..XAxisConfig::default()
        };
        let transform = Transform::new(
            &viewport,
            Size::new(100.0, 100.0),
            Insets::default(),
            scale(0.0, 1.0, 0.1, 10),
            scale(0.0, 1.0, 0.25, 5),
            &config,
        )
        .unwrap();
        assert!((transform.x_to_screen(0.5) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn empty_canvas_has_no_transform() {
        let viewport = ViewportState::new();
        let transform = Transform::new(
            &viewport,
            Size::new(0.0, 100.0),
            Insets::default(),
            scale(0.0, 1.0, 1.0, 1),
            scale(0.0, 1.0, 1.0, 1),
            &XAxisConfig::default(),
        );
        assert!(transform.is_none());
    }
}
