//! Line series: points plus per-series styling.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::geom::DataPoint;
use crate::style::{AreaStyle, ConnectionStyle, HighlightStyle, IntersectionStyle};

static LINE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    fn next() -> Self {
        Self(LINE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A plotted sequence of points with its own visual style.
///
/// Points are kept sorted by x. Construction stable-sorts the input, so
/// points sharing an x keep their relative order.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: String,
    points: Vec<DataPoint>,
    connection: Option<ConnectionStyle>,
    intersection: Option<IntersectionStyle>,
    highlight: Option<HighlightStyle>,
    area: Option<AreaStyle>,
}

impl Line {
    /// Create a line with default connection and intersection styles.
    pub fn new<I>(name: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DataPoint>,
    {
        let name = name.into();
        let mut points: Vec<DataPoint> = points.into_iter().map(Into::into).collect();
        if !points.is_sorted_by(|a, b| a.x <= b.x) {
            debug!(line = %name, "sorting points by x");
            points.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
        Self {
            id: LineId::next(),
            name,
            points,
            connection: Some(ConnectionStyle::default()),
            intersection: Some(IntersectionStyle::default()),
            highlight: Some(HighlightStyle::default()),
            area: None,
        }
    }

    /// Build a line from y values at x = 0, 1, 2, ...
    pub fn from_iter_y<I, T>(name: impl Into<String>, iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        Self::new(
            name,
            iter.into_iter()
                .enumerate()
                .map(|(index, y)| DataPoint::new(index as f64, y.into())),
        )
    }

    /// Set or clear the connection style.
    pub fn with_connection(mut self, style: Option<ConnectionStyle>) -> Self {
        self.connection = style;
        self
    }

    /// Set or clear the intersection style.
    pub fn with_intersection(mut self, style: Option<IntersectionStyle>) -> Self {
        self.intersection = style;
        self
    }

    /// Set or clear the highlight style.
    pub fn with_highlight(mut self, style: Option<HighlightStyle>) -> Self {
        self.highlight = style;
        self
    }

    /// Set or clear the area fill style.
    pub fn with_area(mut self, style: Option<AreaStyle>) -> Self {
        self.area = style;
        self
    }

    /// Access the line identifier.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Access the line name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access the points, sorted by x.
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Access the connection style.
    pub fn connection(&self) -> Option<&ConnectionStyle> {
        self.connection.as_ref()
    }

    /// Access the intersection style.
    pub fn intersection(&self) -> Option<&IntersectionStyle> {
        self.intersection.as_ref()
    }

    /// Access the highlight style.
    pub fn highlight(&self) -> Option<&HighlightStyle> {
        self.highlight.as_ref()
    }

    /// Access the area style.
    pub fn area(&self) -> Option<&AreaStyle> {
        self.area.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsorted_points_are_sorted_stably() {
        let line = Line::new(
            "mixed",
            [(2.0, 1.0), (0.0, 5.0), (2.0, 2.0), (1.0, 3.0)],
        );
        let xs: Vec<f64> = line.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 2.0]);
        assert_eq!(line.points()[2].y, 1.0);
        assert_eq!(line.points()[3].y, 2.0);
    }

    #[test]
    fn ids_are_unique() {
        let a = Line::from_iter_y("a", [1.0, 2.0]);
        let b = Line::from_iter_y("b", [1.0, 2.0]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.points()[1], DataPoint::new(1.0, 2.0));
    }
}
