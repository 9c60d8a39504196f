//! Graph configuration.
//!
//! Every section has defaults, so a partial JSON document only overrides the
//! fields it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::axis::{XAxisConfig, YAxisConfig};
use crate::error::ChartResult;
use crate::geom::ScreenRect;
use crate::gesture::GestureConfig;
use crate::layout::Margins;
use crate::style::{GridStyle, SelectionStyle, Theme};

/// Configuration shared by every line of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// X axis scale and label row.
    pub x_axis: XAxisConfig,
    /// Y axis scale and label column.
    pub y_axis: YAxisConfig,
    /// Horizontal gridlines; `None` draws no grid.
    pub grid: Option<GridStyle>,
    /// Drag selection behaviour.
    pub selection: SelectionStyle,
    /// Allow pinch zoom.
    pub zoom_allowed: bool,
    /// Space above the plot.
    pub padding_top: f32,
    /// Space right of the plot.
    pub padding_right: f32,
    /// Extra space left of the first point so edge markers are not cropped.
    pub horizontal_extra_space: f32,
    /// Pinch motion in pixels before zooming starts.
    pub touch_slop: f32,
    /// Surface colors and label size.
    pub theme: Theme,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            x_axis: XAxisConfig::default(),
            y_axis: YAxisConfig::default(),
            grid: None,
            selection: SelectionStyle::default(),
            zoom_allowed: true,
            padding_top: 16.0,
            padding_right: 0.0,
            horizontal_extra_space: 6.0,
            touch_slop: 8.0,
            theme: Theme::default(),
        }
    }
}

impl GraphConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Gesture settings derived from this configuration.
    pub fn gesture_config(&self, bounds: Option<ScreenRect>) -> GestureConfig {
        GestureConfig {
            zoom_allowed: self.zoom_allowed,
            drag_allowed: self.selection.enabled,
            long_press_timeout: Duration::from_millis(self.selection.detection_time_ms),
            touch_slop: self.touch_slop,
            bounds,
        }
    }

    /// Text-independent margins around the plot.
    pub fn margins(&self) -> Margins {
        Margins {
            top: self.padding_top,
            right: self.padding_right,
            extra_left: self.horizontal_extra_space,
        }
    }
}
