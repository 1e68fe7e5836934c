//! Wall-clock source and time labels

use chrono::{DateTime, Duration, FixedOffset, Local};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local time of the host (browser time zone on wasm)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// `HH:MM:SS`, used for chart point labels
pub fn chart_label(at: &DateTime<FixedOffset>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// `Time: HH:MM:SS`
pub fn clock_text(at: &DateTime<FixedOffset>) -> String {
    format!("Time: {}", chart_label(at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_labels() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T09:05:07+01:00").unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(chart_label(&clock.now()), "09:05:07");
        assert_eq!(clock_text(&clock.now()), "Time: 09:05:07");

        clock.advance(Duration::seconds(60));
        assert_eq!(chart_label(&clock.now()), "09:06:07");

        let shared = Rc::new(clock);
        assert_eq!(clock_text(&shared.now()), "Time: 09:06:07");
    }

    #[test]
    fn test_system_clock_format() {
        let text = clock_text(&SystemClock.now());
        assert_eq!(text.len(), "Time: HH:MM:SS".len());
        assert!(text.starts_with("Time: "));
    }
}
