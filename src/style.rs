//! Style records for lines, points, fills and the selection guide.
//!
//! Styles are plain data. How a style turns into draw commands is decided by
//! a [`StyleRenderer`](crate::render::StyleRenderer), so the records stay
//! serializable and the drawing strategy can be swapped independently.

use serde::{Deserialize, Serialize};

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Return the color with its alpha multiplied by `alpha`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (self.a * alpha).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque gray.
    pub const GRAY: Self = Self::new(0.53, 0.53, 0.53, 1.0);
    /// Light gray used for gridlines.
    pub const LIGHT_GRAY: Self = Self::new(0.8, 0.8, 0.8, 1.0);
}

/// Treatment applied to the ends of a stroked segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeCap {
    /// Flat end exactly at the endpoint.
    #[default]
    Butt,
    /// Rounded end.
    Round,
    /// Flat end extended by half the stroke width.
    Square,
}

/// Whether a shape is filled or outlined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DrawStyle {
    /// Solid fill.
    #[default]
    Fill,
    /// Outline with the given stroke width.
    Stroke {
        /// Stroke width in pixels.
        width: f32,
    },
}

/// Segment styling for the connection between two adjacent points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// End cap.
    pub cap: StrokeCap,
    /// Optional dash pattern as `[on, off]` lengths in pixels.
    pub dash: Option<[f32; 2]>,
    /// Opacity multiplier.
    pub alpha: f32,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            stroke_width: 3.0,
            cap: StrokeCap::Butt,
            dash: None,
            alpha: 1.0,
        }
    }
}

/// Circle styling for an unselected data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionStyle {
    /// Circle color.
    pub color: Color,
    /// Circle radius in pixels.
    pub radius: f32,
    /// Opacity multiplier.
    pub alpha: f32,
    /// Fill or outline.
    pub style: DrawStyle,
}

impl Default for IntersectionStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            radius: 6.0,
            alpha: 1.0,
            style: DrawStyle::Fill,
        }
    }
}

/// Circle styling for a point locked by the drag selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// Circle color.
    pub color: Color,
    /// Circle radius in pixels.
    pub radius: f32,
    /// Opacity multiplier.
    pub alpha: f32,
    /// Fill or outline.
    pub style: DrawStyle,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            radius: 6.0,
            alpha: 1.0,
            style: DrawStyle::Fill,
        }
    }
}

/// Fill styling for the region between a line and the chart bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaStyle {
    /// Fill color.
    pub color: Color,
    /// Opacity multiplier.
    pub alpha: f32,
    /// Fill or outline.
    pub style: DrawStyle,
}

impl Default for AreaStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            alpha: 0.1,
            style: DrawStyle::Fill,
        }
    }
}

/// Horizontal gridline styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub line_width: f32,
    /// Number of lines spread evenly over the labeled Y range, bottom and
    /// top included. `None` draws one line per Y tick.
    pub steps: Option<usize>,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            color: Color::LIGHT_GRAY,
            line_width: 1.0,
            steps: None,
        }
    }
}

/// Drag selection behaviour and the vertical guide line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionStyle {
    /// Enables long-press-then-drag selection.
    pub enabled: bool,
    /// Guide line style; `None` hides the guide.
    pub guide: Option<ConnectionStyle>,
    /// Long-press duration in milliseconds before a drag starts.
    pub detection_time_ms: u64,
}

impl Default for SelectionStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            guide: Some(ConnectionStyle {
                color: Color::RED,
                stroke_width: 2.0,
                dash: Some([40.0, 20.0]),
                ..ConnectionStyle::default()
            }),
            detection_time_ms: 100,
        }
    }
}

/// Visual theme for the graph surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Surface background, also used to mask content under the label column.
    pub background: Color,
    /// Axis label color.
    pub label: Color,
    /// Axis label font size in pixels.
    pub label_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            label: Color::new(0.1, 0.1, 0.1, 1.0),
            label_size: 12.0,
        }
    }
}

impl Theme {
    /// Create the default light theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::new(0.07, 0.08, 0.09, 1.0),
            label: Color::new(0.85, 0.87, 0.9, 1.0),
            label_size: 12.0,
        }
    }
}
