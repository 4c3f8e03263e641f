use std::ops::ControlFlow;
use std::time::Duration;

use super::timer::ScopedTask;

/// Status lines shown while waiting for the service, in emission order
pub const STATUS_LINES: &[&str] = &[
    "Initializing scan engine...",
    "Resolving target host...",
    "Establishing secure connection...",
    "Fetching response headers...",
    "Analyzing security headers...",
    "Checking SSL/TLS configuration...",
    "Probing for exposed files and directories...",
    "Evaluating detected weaknesses...",
    "Calculating severity score...",
    "Compiling vulnerability report...",
];

/// Emits a fixed, finite sequence of status lines, one per cadence
#[derive(Debug, Clone)]
pub struct LogEmitter {
    cadence: Duration,
    lines: &'static [&'static str],
    next: usize,
}

impl LogEmitter {
    pub fn new(cadence: Duration) -> Self {
        Self::with_lines(cadence, STATUS_LINES)
    }

    pub fn with_lines(cadence: Duration, lines: &'static [&'static str]) -> Self {
        Self { cadence, lines, next: 0 }
    }

    /// Next line in sequence, `None` once every line has been emitted
    pub fn next_line(&mut self) -> Option<&'static str> {
        let line = self.lines.get(self.next).copied()?;
        self.next += 1;
        Some(line)
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.lines.len()
    }

    /// Hand the emitter to a periodic task that calls `step` every cadence
    pub fn spawn<F>(mut self, mut step: F) -> ScopedTask
    where
        F: FnMut(&mut Self) -> ControlFlow<()> + Send + 'static,
    {
        let period = self.cadence;
        ScopedTask::every(period, move || step(&mut self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_in_order_without_repeats() {
        let mut emitter = LogEmitter::new(Duration::from_millis(400));
        let mut emitted = Vec::new();
        while let Some(line) = emitter.next_line() {
            emitted.push(line);
        }

        assert_eq!(emitted, STATUS_LINES.to_vec());
        assert!(emitter.is_exhausted());
        assert_eq!(emitter.next_line(), None);
    }

    #[test]
    fn test_empty_list_is_exhausted() {
        let mut emitter = LogEmitter::with_lines(Duration::from_millis(1), &[]);
        assert!(emitter.is_exhausted());
        assert_eq!(emitter.next_line(), None);
    }
}
