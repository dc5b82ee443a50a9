//! Wall-clock to tick mapping.

use crate::error::{SimError, SimResult};

/// Relative slack on the tick count, so a tick whose boundary is reached by
/// summing rounded frame times is not lost.
const TICK_SLACK: f64 = 1e-9;

/// Converts elapsed real time into a count of due ticks.
///
/// The clock only counts; whoever owns it runs the ticks it reports, in
/// order, before returning control.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Seconds per tick.
    tick_period: f64,
    /// Seconds accumulated through [`SimulationClock::advance`].
    elapsed: f64,
    /// Ticks already handed out.
    ticks_taken: u64,
}

impl SimulationClock {
    /// # Errors
    ///
    /// `tick_period` must be positive and finite.
    pub fn new(tick_period: f64) -> SimResult<Self> {
        if !(tick_period.is_finite() && tick_period > 0.0) {
            return Err(SimError::InvalidArg {
                what: "tick period must be positive and finite",
            });
        }
        Ok(Self {
            tick_period,
            elapsed: 0.0,
            ticks_taken: 0,
        })
    }

    pub fn from_frequency(ticks_per_second: f64) -> SimResult<Self> {
        if !(ticks_per_second.is_finite() && ticks_per_second > 0.0) {
            return Err(SimError::InvalidArg {
                what: "tick frequency must be positive and finite",
            });
        }
        Self::new(1.0 / ticks_per_second)
    }

    pub fn tick_period(&self) -> f64 {
        self.tick_period
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks_taken(&self) -> u64 {
        self.ticks_taken
    }

    /// Ticks due at the current elapsed time that have not been handed out.
    pub fn ticks_due(&self) -> u64 {
        self.total_ticks().saturating_sub(self.ticks_taken)
    }

    /// Add `dt` seconds and hand out every tick that became due.
    ///
    /// Negative or non-finite `dt` is ignored.
    pub fn advance(&mut self, dt: f64) -> u64 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let due = self.ticks_due();
        self.ticks_taken += due;
        due
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.ticks_taken = 0;
    }

    fn total_ticks(&self) -> u64 {
        let ticks = self.elapsed / self.tick_period;
        (ticks + TICK_SLACK * ticks.max(1.0)).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_period() {
        assert!(SimulationClock::new(0.0).is_err());
        assert!(SimulationClock::new(-1.0).is_err());
        assert!(SimulationClock::new(f64::NAN).is_err());
        assert!(SimulationClock::from_frequency(0.0).is_err());
    }

    #[test]
    fn catches_up_after_a_long_frame() {
        let mut clock = SimulationClock::new(0.25).unwrap();
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.2), 1);
        assert_eq!(clock.advance(1.0), 4);
        assert_eq!(clock.ticks_taken(), 5);
        assert_eq!(clock.ticks_due(), 0);
    }

    #[test]
    fn rounded_frame_times_keep_every_tick() {
        let mut clock = SimulationClock::new(0.1).unwrap();
        let taken: u64 = (0..10).map(|_| clock.advance(0.1)).sum();
        assert_eq!(taken, 10);

        let mut clock = SimulationClock::from_frequency(60.0).unwrap();
        let taken: u64 = (0..600).map(|_| clock.advance(1.0 / 60.0)).sum();
        assert_eq!(taken, 600);
        assert_eq!(clock.advance(0.5 / 60.0), 0);
    }

    #[test]
    fn frequency_and_reset() {
        let mut clock = SimulationClock::from_frequency(100.0).unwrap();
        assert!((clock.tick_period() - 0.01).abs() < 1e-15);
        clock.advance(0.5);
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.ticks_taken(), 0);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut clock = SimulationClock::new(1.0).unwrap();
        clock.advance(1.5);
        assert_eq!(clock.advance(-10.0), 0);
        assert_eq!(clock.elapsed(), 1.5);
    }
}
