//! Bounded per-stage chart series

use clinker_shared::ChartPoint;
use std::collections::VecDeque;

/// Points kept per stage chart
pub const CHART_CAPACITY: usize = 20;

/// Ordered (label, value) series with FIFO eviction once full
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeries {
    capacity: usize,
    points: VecDeque<ChartPoint>,
}

impl Default for RollingSeries {
    fn default() -> Self {
        Self::with_capacity(CHART_CAPACITY)
    }
}

impl RollingSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series holding at most `capacity` points (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append a point, returning the evicted oldest point when over capacity
    pub fn push(&mut self, point: ChartPoint) -> Option<ChartPoint> {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points oldest first
    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> + '_ {
        self.points.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn latest(&self) -> Option<&ChartPoint> {
        self.points.back()
    }

    pub fn oldest(&self) -> Option<&ChartPoint> {
        self.points.front()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: usize) -> ChartPoint {
        ChartPoint::new(format!("t{i}"), i as f64)
    }

    #[test]
    fn test_length_is_min_of_pushes_and_capacity() {
        let mut series = RollingSeries::new();
        for n in 1..=45 {
            series.push(point(n));
            assert_eq!(series.len(), n.min(CHART_CAPACITY));
        }
    }

    #[test]
    fn test_fifo_eviction() {
        let mut series = RollingSeries::new();
        for n in 0..CHART_CAPACITY {
            assert!(series.push(point(n)).is_none());
        }

        let evicted = series.push(point(CHART_CAPACITY)).unwrap();
        assert_eq!(evicted.label, "t0");
        assert_eq!(series.oldest().unwrap().label, "t1");
        assert_eq!(series.latest().unwrap().label, format!("t{CHART_CAPACITY}"));

        let values = series.values();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_capacity_keeps_one_point() {
        let mut series = RollingSeries::with_capacity(0);
        series.push(point(1));
        series.push(point(2));
        assert_eq!(series.len(), 1);
        assert_eq!(series.labels(), vec!["t2"]);
    }
}
