//! Scroll and zoom state of a graph.

/// Horizontal scroll offset and zoom factor owned by one graph.
///
/// `scroll_offset` always stays within `[0, max_scroll_offset]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    scroll_offset: f32,
    zoom: f32,
    max_scroll_offset: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// Create an unscrolled viewport at zoom 1.
    pub fn new() -> Self {
        Self {
            scroll_offset: 0.0,
            zoom: 1.0,
            max_scroll_offset: 0.0,
        }
    }

    /// Current scroll offset in pixels.
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll_offset(&self) -> f32 {
        self.max_scroll_offset
    }

    /// Scroll by a native scroll delta and return the consumed delta.
    ///
    /// A positive delta moves the content right (towards the start), matching
    /// platform scroll conventions, so the offset decreases.
    pub fn pan(&mut self, delta: f32) -> f32 {
        let before = self.scroll_offset;
        self.set_scroll_offset(self.scroll_offset - delta);
        before - self.scroll_offset
    }

    /// Set the scroll offset, clamped to the valid range.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(0.0, self.max_scroll_offset)
        };
    }

    /// Multiply the zoom factor.
    ///
    /// Non-finite or non-positive factors are ignored. The caller must refresh
    /// the scroll bound afterwards.
    pub fn zoom_by(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom *= factor;
        }
    }

    /// Replace the zoom factor. Non-finite or non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    /// Recompute the scroll bound from content and visible widths and clamp.
    pub fn update_scroll_bound(&mut self, content_width: f32, visible_width: f32) {
        let bound = content_width - visible_width;
        self.max_scroll_offset = if bound.is_finite() { bound.max(0.0) } else { 0.0 };
        self.set_scroll_offset(self.scroll_offset);
    }
}
