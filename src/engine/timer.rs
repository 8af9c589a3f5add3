use std::time::Duration;

/// Per-turn countdown. Time advances only through explicit `tick` calls
/// driven by the event loop, so tests can feed synthetic durations.
///
/// The expiry signal fires exactly once per armed period: after `tick`
/// returns true the timer stays inert until `start` or `reset` re-arms it.
#[derive(Clone, Debug)]
pub struct CountdownTimer {
    duration: Duration,
    remaining: Duration,
    running: bool,
    paused: bool,
    expired: bool,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            duration: Duration::ZERO,
            remaining: Duration::ZERO,
            running: false,
            paused: false,
            expired: false,
        }
    }

    pub fn start(&mut self, duration: Duration) {
        self.duration = duration;
        self.remaining = duration;
        self.running = true;
        self.paused = false;
        self.expired = false;
    }

    /// Re-arm with a fresh period. Identical to `start`; calling it
    /// repeatedly with the same duration is idempotent.
    pub fn reset(&mut self, duration: Duration) {
        self.start(duration);
    }

    pub fn pause(&mut self) {
        if self.running && !self.expired {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    /// Advance the countdown by `elapsed`. Returns true exactly once, at
    /// the tick where `remaining` reaches zero while running and unpaused.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.running || self.paused || self.expired {
            return false;
        }
        if elapsed >= self.remaining {
            self.remaining = Duration::ZERO;
            self.expired = true;
            self.running = false;
            true
        } else {
            self.remaining -= elapsed;
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Whole seconds left, rounded up so the display never shows 0 while
    /// time remains.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining.as_secs_f64().ceil() as u64
    }

    pub fn display(&self) -> String {
        let secs = self.remaining_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// Fraction of the period still left, for gauge rendering.
    pub fn fraction_remaining(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.remaining.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_expires_exactly_once() {
        let mut timer = CountdownTimer::new();
        timer.start(secs(20));
        // 25s in 5s ticks: fires on the crossing tick, then stays quiet
        let mut fired = 0;
        for _ in 0..5 {
            if timer.tick(secs(5)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(timer.has_expired());
        assert!(!timer.tick(secs(5)));
    }

    #[test]
    fn test_overshoot_in_single_tick_fires_once() {
        let mut timer = CountdownTimer::new();
        timer.start(secs(20));
        assert!(timer.tick(secs(25)));
        assert!(!timer.tick(secs(25)));
    }

    #[test]
    fn test_pause_freezes_remaining() {
        let mut timer = CountdownTimer::new();
        timer.start(secs(10));
        assert!(!timer.tick(secs(4)));
        timer.pause();
        assert!(!timer.tick(secs(100)));
        assert_eq!(timer.remaining(), secs(6));

        timer.resume();
        assert!(!timer.tick(secs(3)));
        assert_eq!(timer.remaining(), secs(3));
        assert!(timer.tick(secs(3)));
    }

    #[test]
    fn test_reset_rearms_after_expiry() {
        let mut timer = CountdownTimer::new();
        timer.start(secs(5));
        assert!(timer.tick(secs(5)));
        // Inert until explicitly re-armed
        assert!(!timer.tick(secs(5)));
        timer.reset(secs(5));
        assert!(!timer.has_expired());
        assert!(timer.tick(secs(5)));
    }

    #[test]
    fn test_stop_prevents_expiry() {
        let mut timer = CountdownTimer::new();
        timer.start(secs(5));
        timer.stop();
        assert!(!timer.tick(secs(10)));
        assert!(!timer.has_expired());
    }

    #[test]
    fn test_tick_before_start_is_inert() {
        let mut timer = CountdownTimer::new();
        assert!(!timer.tick(secs(60)));
    }

    #[test]
    fn test_display_rounds_up() {
        let mut timer = CountdownTimer::new();
        timer.start(secs(90));
        assert_eq!(timer.display(), "1:30");
        timer.tick(Duration::from_millis(500));
        // 89.5s left displays as 90
        assert_eq!(timer.display(), "1:30");
        timer.tick(secs(80));
        assert_eq!(timer.display(), "0:10");
    }

    #[test]
    fn test_fraction_remaining() {
        let mut timer = CountdownTimer::new();
        assert_eq!(timer.fraction_remaining(), 0.0);
        timer.start(secs(10));
        assert_eq!(timer.fraction_remaining(), 1.0);
        timer.tick(secs(5));
        assert!((timer.fraction_remaining() - 0.5).abs() < 1e-9);
    }
}
