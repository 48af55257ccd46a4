//! Simulated "thinking" latency. Injected into the engine so tests can pin the timing.

use std::time::Duration;

use rand::Rng;

/// Produces the cosmetic delay shown as a typing indicator before a reply.
pub trait DelayGenerator: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Uniform delay in `[min, max)`. Collapses to `min` when the range is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDelay {
    pub min: Duration,
    pub max: Duration,
}

impl RandomDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }
}

impl Default for RandomDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1000),
            max: Duration::from_millis(2000),
        }
    }
}

impl DelayGenerator for RandomDelay {
    fn next_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }
}

/// Always the same delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl DelayGenerator for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

impl<D: DelayGenerator + ?Sized> DelayGenerator for Box<D> {
    fn next_delay(&self) -> Duration {
        (**self).next_delay()
    }
}
