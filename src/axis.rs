//! Axis scale calculation, configuration, and label formatting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::geom::DataPoint;

/// Which axis a scale is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl Axis {
    fn value(self, point: &DataPoint) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }
}

/// Derived scale for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    /// Smallest value on the axis.
    pub min: f64,
    /// Largest value on the axis.
    pub max: f64,
    /// Value distance between adjacent ticks. Zero for a degenerate range.
    pub step: f64,
    /// Number of ticks requested, at least one.
    pub step_count: usize,
}

impl AxisScale {
    /// Number of intervals between the first and the last tick.
    pub fn effective_steps(&self) -> usize {
        if self.step_count > 1 {
            self.step_count - 1
        } else {
            1
        }
    }

    /// Value range covered by the labeled ticks.
    pub fn labeled_span(&self) -> f64 {
        self.step * self.effective_steps() as f64
    }

    /// Tick values `min + i * step` for every tick.
    ///
    /// A zero step yields the single `min` tick.
    pub fn ticks(&self) -> Vec<f64> {
        if self.step <= 0.0 {
            return vec![self.min];
        }
        (0..self.step_count)
            .map(|index| self.min + index as f64 * self.step)
            .collect()
    }

    /// Tick values for a label row that stops after the first value past `max`.
    pub fn ticks_until_max(&self) -> Vec<f64> {
        if self.step <= 0.0 {
            return vec![self.min];
        }
        let needed = ((self.max - self.min) / self.step).max(0.0) as usize;
        let mut ticks = Vec::with_capacity(self.step_count.min(needed.saturating_add(2)));
        for index in 0..self.step_count {
            let value = self.min + index as f64 * self.step;
            ticks.push(value);
            if value > self.max {
                break;
            }
        }
        ticks
    }
}

/// Compute the scale of one axis across the aggregate point set.
///
/// `desired_steps` below one is treated as one. On Y the range is split into
/// `desired_steps - 1` intervals; on X the span is inclusive of both ends, so
/// points at x = 0..=23 span 24 logical ticks. With `round_to_int` the step
/// is rounded up to the next integer.
pub fn compute_scale<'a, I>(
    points: I,
    axis: Axis,
    desired_steps: i32,
    round_to_int: bool,
) -> ChartResult<AxisScale>
where
    I: IntoIterator<Item = &'a DataPoint>,
{
    let mut bounds: Option<(f64, f64)> = None;
    for point in points {
        let value = axis.value(point);
        if !value.is_finite() {
            return Err(ChartError::InvalidInput("non-finite axis value"));
        }
        bounds = Some(match bounds {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }
    let (min, max) = bounds.ok_or(ChartError::InvalidInput("empty point set"))?;

    let step_count = desired_steps.max(1) as usize;
    let raw = match axis {
        Axis::Y => {
            let effective = if step_count > 1 { step_count - 1 } else { 1 };
            (max - min) / effective as f64
        }
        Axis::X => ((max - min) + 1.0) / step_count as f64,
    };
    let step = if round_to_int { raw.ceil() } else { raw };

    Ok(AxisScale {
        min,
        max,
        step,
        step_count,
    })
}

/// Formatter for axis tick labels.
#[derive(Clone, Default)]
pub enum AxisFormatter {
    /// At most one decimal, trailing zeros dropped (`25`, `2.5`).
    #[default]
    Default,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl AxisFormatter {
    /// Format a value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Default => format_one_decimal(value),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl std::fmt::Debug for AxisFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "AxisFormatter::Default"),
            Self::Custom(_) => write!(f, "AxisFormatter::Custom(..)"),
        }
    }
}

fn format_one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// X axis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XAxisConfig {
    /// Pixel distance between two adjacent x units at zoom 1.
    pub step_size: f32,
    /// Number of labels requested.
    pub steps: i32,
    /// Data value represented by one step (1.0 → 0, 1, 2 ...; 0.1 → 0, 0.1, 0.2 ...).
    pub unit: f64,
    /// Space above the labels.
    pub padding_top: f32,
    /// Space below the labels.
    pub padding_bottom: f32,
    /// Round the label step up to an integer.
    pub round_to_int: bool,
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            step_size: 20.0,
            steps: 10,
            unit: 1.0,
            padding_top: 8.0,
            padding_bottom: 8.0,
            round_to_int: true,
        }
    }
}

/// Y axis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YAxisConfig {
    /// Number of labels requested.
    pub steps: i32,
    /// Round the label step up to an integer.
    pub round_to_int: bool,
    /// Space left of the labels.
    pub padding_start: f32,
    /// Space right of the labels.
    pub padding_end: f32,
}

impl Default for YAxisConfig {
    fn default() -> Self {
        Self {
            steps: 5,
            round_to_int: true,
            padding_start: 16.0,
            padding_end: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(f64, f64)]) -> Vec<DataPoint> {
        values.iter().copied().map(DataPoint::from).collect()
    }

    #[test]
    fn y_scale_splits_into_steps_minus_one() {
        let pts = points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 25.0), (3.0, 75.0)]);
        let scale = compute_scale(&pts, Axis::Y, 4, false).unwrap();
        assert_eq!(
            scale,
            AxisScale {
                min: 0.0,
                max: 75.0,
                step: 25.0,
                step_count: 4
            }
        );
        assert_eq!(scale.ticks(), vec![0.0, 25.0, 50.0, 75.0]);
    }

    #[test]
    fn x_scale_is_inclusive_of_both_ends() {
        let pts: Vec<DataPoint> = (0..24).map(|x| DataPoint::new(x as f64, 1.0)).collect();
        let scale = compute_scale(&pts, Axis::X, 10, false).unwrap();
        assert!((scale.step - 2.4).abs() < 1e-12);
        let rounded = compute_scale(&pts, Axis::X, 10, true).unwrap();
        assert_eq!(rounded.step, 3.0);
    }

    #[test]
    fn rounding_ceils_the_y_step() {
        let pts = points(&[(0.0, 0.0), (1.0, 10.0)]);
        let scale = compute_scale(&pts, Axis::Y, 4, true).unwrap();
        assert_eq!(scale.step, 4.0);
        assert_eq!(scale.labeled_span(), 12.0);
    }

    #[test]
    fn non_positive_steps_treated_as_one() {
        let pts = points(&[(0.0, 2.0), (4.0, 6.0)]);
        let y = compute_scale(&pts, Axis::Y, 0, false).unwrap();
        assert_eq!(y.step_count, 1);
        assert_eq!(y.step, 4.0);
        let x = compute_scale(&pts, Axis::X, -3, false).unwrap();
        assert_eq!(x.step, 5.0);
    }

    #[test]
    fn degenerate_range_has_zero_step() {
        let pts = points(&[(0.0, 3.0), (1.0, 3.0)]);
        let scale = compute_scale(&pts, Axis::Y, 5, true).unwrap();
        assert_eq!(scale.step, 0.0);
        assert_eq!(scale.ticks(), vec![3.0]);
    }

    #[test]
    fn empty_set_is_invalid_input() {
        let empty: Vec<DataPoint> = Vec::new();
        let err = compute_scale(&empty, Axis::Y, 5, false).unwrap_err();
        assert!(matches!(err, ChartError::InvalidInput(_)));
    }

    #[test]
    fn label_row_stops_after_max() {
        let scale = AxisScale {
            min: 0.0,
            max: 5.0,
            step: 2.0,
            step_count: 10,
        };
        assert_eq!(scale.ticks_until_max(), vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn label_row_with_huge_step_count_stays_small() {
        let pts = points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let scale = compute_scale(&pts, Axis::X, i32::MAX, true).unwrap();
        assert_eq!(scale.step, 1.0);
        assert_eq!(scale.ticks_until_max(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);

        let unbounded = AxisScale {
            min: 0.0,
            max: 3.0,
            step: 1.5,
            step_count: usize::MAX,
        };
        assert_eq!(unbounded.ticks_until_max(), vec![0.0, 1.5, 3.0, 4.5]);
    }

    #[test]
    fn default_formatter_keeps_one_decimal() {
        let formatter = AxisFormatter::default();
        assert_eq!(formatter.format(25.0), "25");
        assert_eq!(formatter.format(2.54), "2.5");
        assert_eq!(formatter.format(-0.01), "0");
        assert_eq!(formatter.format(0.30000000000000004), "0.3");
    }

    #[test]
    fn scale_bounds_are_ordered() {
        let pts = points(&[(3.0, -7.5), (-2.0, 12.0), (8.0, 0.5)]);
        for steps in -2..12 {
            for round in [false, true] {
                for axis in [Axis::X, Axis::Y] {
                    let scale = compute_scale(&pts, axis, steps, round).unwrap();
                    assert!(scale.max >= scale.min);
                    assert!(scale.step >= 0.0);
                    assert!(scale.step_count >= 1);
                }
            }
        }
    }
}
