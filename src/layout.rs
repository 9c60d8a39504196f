//! Axis label measurement and placement.
//!
//! Layout is a pure function of label texts, their tick positions and a
//! [`TextMeasurer`]; backends supply a measurer that shapes real text, tests
//! use [`MonospaceMeasurer`].

use crate::axis::{XAxisConfig, YAxisConfig};
use crate::geom::{Insets, ScreenPoint, Size};

/// Measures rendered text.
pub trait TextMeasurer {
    /// Return `(width, height)` of `text` at font `size`, in pixels.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);
}

/// Measurer that assumes every glyph has the same advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Glyph advance as a fraction of the font size.
    pub advance: f32,
    /// Line height as a fraction of the font size.
    pub line_height: f32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.25,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let glyphs = text.chars().count() as f32;
        (glyphs * size * self.advance, size * self.line_height)
    }
}

/// Fixed space around the plot that does not depend on label text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    /// Space above the plot.
    pub top: f32,
    /// Space right of the plot, masked over scrolled content.
    pub right: f32,
    /// Gap between the label column and the first point.
    pub extra_left: f32,
}

/// Label column and row sizes, and the insets they produce.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartLayout {
    /// Width of the Y label column.
    pub column_width: f32,
    /// Height of the X label row.
    pub row_height: f32,
    /// Insets used by the transform.
    pub insets: Insets,
}

/// A label with its top-left position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    /// Label text.
    pub text: String,
    /// Top-left corner of the text box.
    pub origin: ScreenPoint,
    /// Measured text box.
    pub size: Size,
}

/// Compute the label column, label row and plot insets.
pub fn chart_layout<M>(
    measurer: &M,
    x_labels: &[String],
    y_labels: &[String],
    label_size: f32,
    x_axis: &XAxisConfig,
    y_axis: &YAxisConfig,
    margins: Margins,
) -> ChartLayout
where
    M: TextMeasurer + ?Sized,
{
    let widest = y_labels
        .iter()
        .map(|text| measurer.measure(text, label_size).0)
        .fold(0.0_f32, f32::max);
    let tallest = x_labels
        .iter()
        .map(|text| measurer.measure(text, label_size).1)
        .fold(0.0_f32, f32::max);

    let column_width = y_axis.padding_start + widest + y_axis.padding_end;
    let row_height = x_axis.padding_top + tallest + x_axis.padding_bottom;
    ChartLayout {
        column_width,
        row_height,
        insets: Insets::new(
            column_width + margins.extra_left,
            margins.top,
            margins.right,
            row_height,
        ),
    }
}

/// Place Y labels right-aligned in the column, centred on their tick y.
pub fn layout_y_labels<M>(
    measurer: &M,
    labels: impl IntoIterator<Item = (String, f32)>,
    label_size: f32,
    layout: &ChartLayout,
    y_axis: &YAxisConfig,
) -> Vec<PlacedLabel>
where
    M: TextMeasurer + ?Sized,
{
    let right = layout.column_width - y_axis.padding_end;
    labels
        .into_iter()
        .map(|(text, tick_y)| {
            let (width, height) = measurer.measure(&text, label_size);
            PlacedLabel {
                origin: ScreenPoint::new(right - width, tick_y - height * 0.5),
                size: Size::new(width, height),
                text,
            }
        })
        .collect()
}

/// Place X labels centred on their tick x inside the label row.
///
/// Labels whose tick lies outside `[column_width, canvas width - right margin]`
/// are clipped away.
pub fn layout_x_labels<M>(
    measurer: &M,
    labels: impl IntoIterator<Item = (String, f32)>,
    label_size: f32,
    layout: &ChartLayout,
    canvas: Size,
    x_axis: &XAxisConfig,
) -> Vec<PlacedLabel>
where
    M: TextMeasurer + ?Sized,
{
    let top = canvas.height - layout.row_height + x_axis.padding_top;
    let left = layout.column_width;
    let right = canvas.width - layout.insets.right;
    labels
        .into_iter()
        .filter(|(_, tick_x)| *tick_x >= left && *tick_x <= right)
        .map(|(text, tick_x)| {
            let (width, height) = measurer.measure(&text, label_size);
            PlacedLabel {
                origin: ScreenPoint::new(tick_x - width * 0.5, top),
                size: Size::new(width, height),
                text,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn layout() -> ChartLayout {
        chart_layout(
            &MonospaceMeasurer::default(),
            &strings(&["0", "10"]),
            &strings(&["0", "250"]),
            10.0,
            &XAxisConfig::default(),
            &YAxisConfig::default(),
            Margins {
                top: 16.0,
                right: 4.0,
                extra_left: 6.0,
            },
        )
    }

    #[test]
    fn insets_follow_widest_and_tallest_label() {
        let layout = layout();
        // 16 + 3 glyphs * 5px + 8
        assert_eq!(layout.column_width, 39.0);
        // 8 + 12.5 + 8
        assert_eq!(layout.row_height, 28.5);
        assert_eq!(layout.insets, Insets::new(45.0, 16.0, 4.0, 28.5));
    }

    #[test]
    fn y_labels_are_right_aligned_and_centred() {
        let layout = layout();
        let placed = layout_y_labels(
            &MonospaceMeasurer::default(),
            vec![("5".to_string(), 100.0), ("250".to_string(), 40.0)],
            10.0,
            &layout,
            &YAxisConfig::default(),
        );
        assert_eq!(placed[0].origin, ScreenPoint::new(26.0, 93.75));
        assert_eq!(placed[1].origin, ScreenPoint::new(16.0, 33.75));
        assert_eq!(placed[1].origin.x + placed[1].size.width, 31.0);
    }

    #[test]
    fn x_labels_outside_plot_band_are_clipped() {
        let layout = layout();
        let placed = layout_x_labels(
            &MonospaceMeasurer::default(),
            vec![
                ("0".to_string(), 20.0),
                ("1".to_string(), 60.0),
                ("9".to_string(), 197.0),
            ],
            10.0,
            &layout,
            Size::new(200.0, 150.0),
            &XAxisConfig::default(),
        );
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "1");
        assert_eq!(placed[0].origin, ScreenPoint::new(57.5, 129.5));
    }

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(MonospaceMeasurer::default().measure("", 12.0), (0.0, 0.0));
    }
}
