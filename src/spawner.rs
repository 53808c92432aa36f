//! Fixed-interval obstacle timer driven by accumulated frame time.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Spawner {
    interval: Duration,
    elapsed: Duration,
}

impl Spawner {
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero());
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Adds `dt` and returns how many ticks came due. The remainder carries
    /// over, so a long frame can fire more than once.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let mut ticks = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            ticks += 1;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    #[cfg(test)]
    fn until_next(&self) -> Duration {
        self.interval - self.elapsed
    }
}
