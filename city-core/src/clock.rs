use crate::types::Tick;

/// Monotonic step counter used to timestamp roads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    now: Tick,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Advances the clock by one step and returns the new time.
    #[inline]
    pub fn tick(&mut self) -> Tick {
        self.now += 1;
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_ticks_by_one() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.tick(), 2);
        assert_eq!(clock.now(), 2);
    }
}
