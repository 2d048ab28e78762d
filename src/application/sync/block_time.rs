use std::collections::VecDeque;

const DEFAULT_WINDOW: usize = 100;

/// Rolling average of the spacing between consecutive block timestamps
#[derive(Debug, Clone)]
pub struct BlockTimeTracker {
    intervals: VecDeque<i64>,
    window: usize,
    last_timestamp: Option<i64>,
}

impl BlockTimeTracker {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            intervals: VecDeque::with_capacity(window.max(1)),
            window: window.max(1),
            last_timestamp: None,
        }
    }

    pub fn record(&mut self, timestamp: i64) {
        if let Some(previous) = self.last_timestamp {
            if self.intervals.len() == self.window {
                self.intervals.pop_front();
            }
            self.intervals.push_back(timestamp - previous);
        }
        self.last_timestamp = Some(timestamp);
    }

    /// Mean interval in seconds, once two blocks have been seen
    pub fn average(&self) -> Option<f64> {
        if self.intervals.is_empty() {
            return None;
        }
        let total: i64 = self.intervals.iter().sum();
        Some(total as f64 / self.intervals.len() as f64)
    }
}

impl Default for BlockTimeTracker {
    fn default() -> Self {
        Self::new()
    }
}
