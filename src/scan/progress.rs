//! Simulated progress while a scan request is outstanding
//!
//! The service gives no progress feedback, so the bar is an estimate: it
//! creeps forward by a random amount on every tick, stops at the plateau,
//! and is only completed by the session once the real response arrives.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::ControlFlow;
use std::time::Duration;

use super::timer::ScopedTask;

/// Completed value the session snaps to on resolution
pub const COMPLETE: f64 = 100.0;

/// Tuning for the progress estimate
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSettings {
    pub tick: Duration,
    pub max_increment: f64,
    pub plateau: f64,
    /// Time the bar is held at 100% before the result is shown
    pub grace: Duration,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(200),
            max_increment: 15.0,
            plateau: 95.0,
            grace: Duration::from_millis(500),
        }
    }
}

pub struct ProgressSimulator {
    settings: ProgressSettings,
    rng: StdRng,
}

impl ProgressSimulator {
    pub fn new(settings: ProgressSettings) -> Self {
        Self {
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic increments, for tests and reproducible demos
    pub fn with_seed(settings: ProgressSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next estimate after one tick
    ///
    /// Never decreases and never crosses the plateau. Once the plateau is
    /// reached the value is returned unchanged.
    pub fn advance(&mut self, current: f64) -> f64 {
        let plateau = self.settings.plateau;
        if current >= plateau {
            return current;
        }

        let increment = if self.settings.max_increment > 0.0 {
            self.rng.gen_range(0.0..=self.settings.max_increment)
        } else {
            0.0
        };
        (current + increment).min(plateau)
    }

    /// Hand the simulator to a periodic task that calls `step` on every tick
    ///
    /// `step` decides where the estimate is stored and whether the episode it
    /// belongs to is still running.
    pub fn spawn<F>(mut self, mut step: F) -> ScopedTask
    where
        F: FnMut(&mut Self) -> ControlFlow<()> + Send + 'static,
    {
        let period = self.settings.tick;
        ScopedTask::every(period, move || step(&mut self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_advance_is_bounded_and_monotonic() {
        let mut sim = ProgressSimulator::with_seed(ProgressSettings::default(), 7);
        let mut current = 0.0;

        for _ in 0..500 {
            let next = sim.advance(current);
            assert!(next >= current, "{next} < {current}");
            assert!(next - current <= 15.0);
            assert!(next <= 95.0);
            current = next;
        }
        assert_eq!(current, 95.0);
    }

    #[test]
    fn test_plateau_holds() {
        let mut sim = ProgressSimulator::with_seed(ProgressSettings::default(), 1);
        assert_eq!(sim.advance(95.0), 95.0);
        assert_eq!(sim.advance(99.0), 99.0);
    }

    #[test]
    fn test_zero_increment_never_moves() {
        let settings = ProgressSettings { max_increment: 0.0, ..ProgressSettings::default() };
        let mut sim = ProgressSimulator::with_seed(settings, 3);
        assert_eq!(sim.advance(10.0), 10.0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ProgressSimulator::with_seed(ProgressSettings::default(), 42);
        let mut b = ProgressSimulator::with_seed(ProgressSettings::default(), 42);
        let (mut x, mut y) = (0.0, 0.0);
        for _ in 0..10 {
            x = a.advance(x);
            y = b.advance(y);
        }
        assert_eq!(x, y);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_simulator_ticks_on_schedule() {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let mut current = 0.0;

        let task = ProgressSimulator::with_seed(ProgressSettings::default(), 9).spawn(move |sim| {
            current = sim.advance(current);
            sink.lock().unwrap().push(current);
            ControlFlow::Continue(())
        });

        tokio::time::sleep(Duration::from_millis(1010)).await;
        drop(task);
        assert_eq!(values.lock().unwrap().len(), 5);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(values.lock().unwrap().len(), 5);
    }
}
