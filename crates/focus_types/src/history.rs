//! Rolling history of derived focus points
//!
//! Live monitoring keeps a bounded window of recent points so the display
//! stays fixed-width; labeled recording keeps every point. Eviction is
//! strict FIFO with O(1) amortized appends.

use std::collections::VecDeque;

use crate::data::HistoryPoint;

/// Ordered series of history points with an optional capacity bound.
#[derive(Debug, Clone)]
pub struct FocusHistory {
    points: VecDeque<HistoryPoint>,
    capacity: Option<usize>,
}

impl FocusHistory {
    /// History that retains at most `capacity` points, dropping the oldest
    /// first. A zero capacity is clamped to one.
    pub fn bounded(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// History that retains every point appended to it.
    pub fn unbounded() -> Self {
        Self {
            points: VecDeque::new(),
            capacity: None,
        }
    }

    /// Append a point, evicting the oldest one once the bound is reached.
    pub fn push(&mut self, point: HistoryPoint) {
        if let Some(capacity) = self.capacity {
            while self.points.len() >= capacity {
                self.points.pop_front();
            }
        }
        self.points.push_back(point);
    }

    /// Copy of the current contents in append order.
    pub fn snapshot(&self) -> Vec<HistoryPoint> {
        self.points.iter().copied().collect()
    }

    /// Most recently appended point, if any.
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(n: usize) -> HistoryPoint {
        HistoryPoint::new(n as f32, 1.0, 2.0, false)
    }

    #[test]
    fn test_bounded_evicts_oldest_first() {
        let mut history = FocusHistory::bounded(50);
        for n in 0..60 {
            history.push(point(n));
        }
        assert_eq!(history.len(), 50);

        let snapshot = history.snapshot();
        assert_eq!(snapshot.first().map(|p| p.elapsed_secs), Some(10.0));
        assert_eq!(snapshot.last().map(|p| p.elapsed_secs), Some(59.0));

        // Appends stay in order after eviction
        for window in snapshot.windows(2) {
            assert!(window[0].elapsed_secs < window[1].elapsed_secs);
        }
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut history = FocusHistory::unbounded();
        for n in 0..500 {
            history.push(point(n));
        }
        assert_eq!(history.len(), 500);
        assert_eq!(history.latest().map(|p| p.elapsed_secs), Some(499.0));
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut history = FocusHistory::bounded(3);
        history.push(point(0));
        let first = history.snapshot();
        let second = history.snapshot();
        assert_eq!(first, second);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut history = FocusHistory::bounded(0);
        history.push(point(0));
        history.push(point(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|p| p.elapsed_secs), Some(1.0));
    }
}
