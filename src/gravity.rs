//! Fall timing
//!
//! The fall interval shrinks linearly with level. Ticks carry the timer
//! generation they were scheduled under; restarting bumps the generation so
//! a tick scheduled for the previous session is dropped instead of moving a
//! piece in the new one.

use crate::settings::SpeedSettings;
use std::time::{Duration, Instant};

/// Fall interval for a level: `base * (1 - level * factor)`, floored at the minimum
pub fn fall_interval(speed: &SpeedSettings, level: u32) -> Duration {
    let scale = 1.0 - level as f64 * speed.speed_factor;
    let ms = speed.base_interval_ms as f64 * scale;
    let ms = ms.max(speed.min_interval_ms as f64);
    Duration::from_micros((ms * 1000.0).round() as u64)
}

/// Identifies one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

/// Gravity timer
#[derive(Debug, Clone)]
pub struct FallTimer {
    generation: u64,
    due: Instant,
}

impl FallTimer {
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            generation: 0,
            due: now + interval,
        }
    }

    /// Returns a tick if the deadline has passed, and schedules the next one
    pub fn poll(&mut self, now: Instant, interval: Duration) -> Option<Tick> {
        if now < self.due {
            return None;
        }
        self.due = now + interval;
        Some(Tick {
            generation: self.generation,
        })
    }

    /// Invalidate every outstanding tick and start over
    pub fn reset(&mut self, now: Instant, interval: Duration) {
        self.generation += 1;
        self.due = now + interval;
    }

    /// True if `tick` belongs to the current generation
    pub fn is_current(&self, tick: Tick) -> bool {
        tick.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_shrinks_with_level() {
        let speed = SpeedSettings::default();
        assert_eq!(fall_interval(&speed, 0), Duration::from_millis(500));
        assert_eq!(fall_interval(&speed, 5), Duration::from_millis(250));
        assert!(fall_interval(&speed, 3) < fall_interval(&speed, 2));
    }

    #[test]
    fn test_interval_is_clamped() {
        let speed = SpeedSettings::default();
        assert_eq!(fall_interval(&speed, 10), Duration::from_millis(50));
        assert_eq!(fall_interval(&speed, 40), Duration::from_millis(50));
    }

    #[test]
    fn test_poll_fires_after_interval() {
        let start = Instant::now();
        let interval = Duration::from_millis(100);
        let mut timer = FallTimer::new(start, interval);

        assert!(timer.poll(start + Duration::from_millis(50), interval).is_none());
        let tick = timer.poll(start + Duration::from_millis(100), interval);
        assert!(tick.is_some_and(|t| timer.is_current(t)));
        assert!(timer.poll(start + Duration::from_millis(150), interval).is_none());
    }

    #[test]
    fn test_reset_invalidates_old_ticks() {
        let start = Instant::now();
        let interval = Duration::from_millis(10);
        let mut timer = FallTimer::new(start, interval);
        let stale = timer.poll(start + interval, interval).unwrap();

        timer.reset(start + interval, interval);
        assert!(!timer.is_current(stale));
        assert!(timer.poll(start + interval, interval).is_none());
    }
}
