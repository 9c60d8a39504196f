//! Drag selection: which point of each line sits under the drag position.

use crate::geom::{DataPoint, ScreenPoint};
use crate::series::LineId;

/// A line's points together with their screen positions for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedLine<'a> {
    /// Line identity.
    pub id: LineId,
    /// Data points in x order.
    pub points: &'a [DataPoint],
    /// Screen positions, index-aligned with `points`.
    pub screen: &'a [ScreenPoint],
}

/// One locked point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockedPoint {
    /// Line the point belongs to.
    pub line: LineId,
    /// Index of the point within the line.
    pub index: usize,
    /// The data point.
    pub point: DataPoint,
    /// Screen position of the point.
    pub offset: ScreenPoint,
}

/// Points locked under the drag position, at most one per line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionLock {
    locks: Vec<LockedPoint>,
}

impl SelectionLock {
    /// Check whether nothing is locked.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Locked points in line order.
    pub fn locks(&self) -> &[LockedPoint] {
        &self.locks
    }

    /// Lock held on a line, if any.
    pub fn lock_for(&self, line: LineId) -> Option<&LockedPoint> {
        self.locks.iter().find(|lock| lock.line == line)
    }

    /// Check whether a specific point is locked.
    pub fn is_locked(&self, line: LineId, index: usize) -> bool {
        self.lock_for(line).is_some_and(|lock| lock.index == index)
    }

    /// Screen x of the guide line: the first lock across all lines.
    pub fn guide_x(&self) -> Option<f32> {
        self.locks.first().map(|lock| lock.offset.x)
    }

    /// Locked data points in line order.
    pub fn points(&self) -> Vec<DataPoint> {
        self.locks.iter().map(|lock| lock.point).collect()
    }
}

/// Lock, for each line, the first point whose screen x lies strictly within
/// `half_window` pixels of `drag_x`.
pub fn resolve_locks<'a, I>(drag_x: f32, half_window: f32, lines: I) -> SelectionLock
where
    I: IntoIterator<Item = ProjectedLine<'a>>,
{
    let mut locks = Vec::new();
    if !drag_x.is_finite() || half_window.is_nan() || half_window <= 0.0 {
        return SelectionLock { locks };
    }
    for line in lines {
        let hit = line
            .screen
            .iter()
            .zip(line.points)
            .enumerate()
            .find(|(_, (offset, _))| {
                offset.x - half_window < drag_x && drag_x < offset.x + half_window
            });
        if let Some((index, (offset, point))) = hit {
            locks.push(LockedPoint {
                line: line.id,
                index,
                point: *point,
                offset: *offset,
            });
        }
    }
    SelectionLock { locks }
}

/// Selection reported for one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Screen x of the guide line.
    pub x: f32,
    /// Locked points, one per line that has a lock.
    pub points: Vec<DataPoint>,
}
