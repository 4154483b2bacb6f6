//! Snap points for timeline magnetism
//!
//! A marker model feeds its positions, as frame indices, into any number of
//! snap targets it holds weakly. `SnapIndex` is the standard target: a
//! reference-counted point set a timeline view queries to align its cursor.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Capability interface a marker model notifies on topology changes.
///
/// Implementations take `&self`; targets are shared between the timeline
/// view and the models feeding them.
pub trait SnapTarget: Send + Sync {
    /// A point appeared at `frame`
    fn add_point(&self, frame: i64);

    /// A point at `frame` disappeared.
    ///
    /// # Panics
    /// Panics if no point exists at `frame`; removals must mirror earlier
    /// additions.
    fn remove_point(&self, frame: i64);
}

/// Reference-counted set of snap frames with nearest-point queries.
///
/// Points are counted, not deduplicated: two feeders adding the same frame
/// must both remove it before the frame stops snapping.
#[derive(Default)]
pub struct SnapIndex {
    points: Mutex<BTreeMap<i64, usize>>,
}

impl SnapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if at least one point exists at `frame`
    pub fn contains(&self, frame: i64) -> bool {
        self.points.lock().unwrap().contains_key(&frame)
    }

    /// Number of distinct snap frames
    pub fn len(&self) -> usize {
        self.points.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.lock().unwrap().is_empty()
    }

    /// The point nearest to `frame`, or `None` on an empty index.
    ///
    /// Ties resolve to the earlier point.
    pub fn closest_point(&self, frame: i64) -> Option<i64> {
        let points = self.points.lock().unwrap();
        let before = points.range(..=frame).next_back().map(|(f, _)| *f);
        let after = points.range(frame + 1..).next().map(|(f, _)| *f);
        match (before, after) {
            (Some(b), Some(a)) => {
                if frame - b <= a - frame {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (Some(b), None) => Some(b),
            (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }

    /// The nearest point within `tolerance` frames, or `None` when nothing
    /// is close enough to snap to
    pub fn snap_to(&self, frame: i64, tolerance: i64) -> Option<i64> {
        self.closest_point(frame)
            .filter(|p| (p - frame).abs() <= tolerance)
    }
}

impl SnapTarget for SnapIndex {
    fn add_point(&self, frame: i64) {
        let mut points = self.points.lock().unwrap();
        *points.entry(frame).or_insert(0) += 1;
    }

    fn remove_point(&self, frame: i64) {
        let mut points = self.points.lock().unwrap();
        let count = points
            .get_mut(&frame)
            .unwrap_or_else(|| panic!("SnapIndex: no point to remove at frame {}", frame));
        *count -= 1;
        if *count == 0 {
            points.remove(&frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_point() {
        let index = SnapIndex::new();
        index.add_point(50);
        assert!(index.contains(50));
        assert_eq!(index.len(), 1);

        index.remove_point(50);
        assert!(!index.contains(50));
        assert!(index.is_empty());
    }

    #[test]
    fn test_points_are_reference_counted() {
        let index = SnapIndex::new();
        index.add_point(10);
        index.add_point(10);

        index.remove_point(10);
        assert!(index.contains(10));
        index.remove_point(10);
        assert!(!index.contains(10));
    }

    #[test]
    #[should_panic(expected = "no point to remove")]
    fn test_remove_missing_point_panics() {
        let index = SnapIndex::new();
        index.remove_point(7);
    }

    #[test]
    fn test_closest_point() {
        let index = SnapIndex::new();
        assert_eq!(index.closest_point(10), None);

        index.add_point(10);
        index.add_point(20);
        assert_eq!(index.closest_point(12), Some(10));
        assert_eq!(index.closest_point(17), Some(20));
        assert_eq!(index.closest_point(10), Some(10));
        // Ties resolve to the earlier point
        assert_eq!(index.closest_point(15), Some(10));
    }

    #[test]
    fn test_snap_to_respects_tolerance() {
        let index = SnapIndex::new();
        index.add_point(100);
        assert_eq!(index.snap_to(103, 5), Some(100));
        assert_eq!(index.snap_to(110, 5), None);
    }
}
