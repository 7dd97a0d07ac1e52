use std::time::Instant;

// CLOCK COMPONENT -------------------------------------------------------------

/// Monotonic elapsed-time source for the engine. All channel timestamps are
/// expressed in seconds relative to `origin`.
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Seconds since the last reset. Non-decreasing between resets.
    pub fn elapsed(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    pub fn reset(&mut self) {
        self.origin = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn elapsed_is_near_zero_after_reset() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(20));
        clock.reset();
        let t = clock.elapsed();
        assert!(t >= 0.0);
        assert!(t < 0.01, "elapsed right after reset was {}", t);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let clock = Clock::new();
        let t1 = clock.elapsed();
        thread::sleep(Duration::from_millis(5));
        let t2 = clock.elapsed();
        assert!(t2 >= t1);
    }
}
