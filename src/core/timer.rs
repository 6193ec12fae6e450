/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// Create throttled timer with minimum interval in seconds
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Accumulate delta, returns true once per elapsed interval
    pub fn try_tick(&mut self, delta: f32) -> bool {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            self.time_since_last = 0.0;
            true
        } else {
            false
        }
    }

    /// Seconds accumulated since the last fire
    pub fn elapsed(&self) -> f32 {
        self.time_since_last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttled_waits_for_interval() {
        let mut timer = Throttled::new(1.0);

        assert!(!timer.try_tick(0.5));
        assert_eq!(timer.elapsed(), 0.5);
        assert!(timer.try_tick(0.5));
        assert_eq!(timer.elapsed(), 0.0);
        assert!(!timer.try_tick(0.9));
    }
}
