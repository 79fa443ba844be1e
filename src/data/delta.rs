use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub frame: u64,
    /// Time since the clock started. Never decreases.
    pub timestamp: Duration,
}

pub struct FrameClock {
    start: Instant,
    last_call: Instant,
    frame: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_call: start,
            frame: 0,
        }
    }

    pub fn tick(&mut self) -> Tick {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Tick {
        let now = now.max(self.last_call);
        self.last_call = now;
        self.frame += 1;

        Tick {
            frame: self.frame,
            timestamp: now.duration_since(self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_count_up_and_stay_monotonic() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let a = clock.tick_at(start + Duration::from_millis(16));
        let b = clock.tick_at(start + Duration::from_millis(33));
        // A clock going backwards must not move the timestamp back.
        let c = clock.tick_at(start + Duration::from_millis(20));

        assert_eq!((a.frame, b.frame, c.frame), (1, 2, 3));
        assert!(a.timestamp < b.timestamp);
        assert_eq!(c.timestamp, b.timestamp);
    }

    #[test]
    fn timestamps_measure_from_start() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let t = clock.tick_at(start + Duration::from_secs(30));
        assert_eq!(t.frame, 1);
        assert_eq!(t.timestamp, Duration::from_secs(30));
    }
}
