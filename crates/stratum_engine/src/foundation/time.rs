//! Time management utilities

use std::time::Instant;

/// Wall-clock frame timer
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Fixed-timestep accumulator.
///
/// Variable frame time is added to an accumulator; every whole `step` it
/// contains is consumed as one simulation step. Whatever is left over, divided
/// by the step, is the interpolation fraction between the last two steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// Default step of 1/60 s
    pub const DEFAULT_STEP: f32 = 1.0 / 60.0;

    /// Create an accumulator consuming `step` seconds per simulation step,
    /// running at most `max_steps` steps in a single frame.
    pub fn new(step: f32, max_steps: u32) -> Self {
        let step = if step > 0.0 && step.is_finite() {
            step
        } else {
            log::error!("Invalid fixed timestep {step}, falling back to {}", Self::DEFAULT_STEP);
            Self::DEFAULT_STEP
        };
        Self {
            step,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Seconds per simulation step
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Add elapsed frame time and return how many steps are due.
    ///
    /// At most `max_steps` are returned; whole steps beyond that are dropped
    /// and only the partial remainder is kept. Negative or non-finite frame
    /// times count as zero.
    pub fn accumulate(&mut self, delta_time: f32) -> u32 {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.accumulator += delta_time;
        }

        let mut steps = 0;
        while steps < self.max_steps && self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            log::warn!(
                "Dropping {:.0} fixed steps after a {:.3}s frame",
                (self.accumulator / self.step).floor(),
                delta_time
            );
            self.accumulator %= self.step;
            if !self.accumulator.is_finite() {
                self.accumulator = 0.0;
            }
        }
        steps
    }

    /// Remaining accumulated time as a fraction of one step, in `[0, 1)`
    pub fn fraction(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Discard accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accumulator_consumes_whole_steps() {
        let mut timestep = FixedTimestep::new(0.01, 10);
        assert_eq!(timestep.accumulate(0.025), 2);
        assert_relative_eq!(timestep.fraction(), 0.5, epsilon = 1e-3);

        // leftover carries into the next frame
        assert_eq!(timestep.accumulate(0.006), 1);
        assert_relative_eq!(timestep.fraction(), 0.1, epsilon = 1e-3);
    }

    #[test]
    fn test_short_frames_run_no_steps() {
        let mut timestep = FixedTimestep::new(0.1, 10);
        assert_eq!(timestep.accumulate(0.05), 0);
        assert_relative_eq!(timestep.fraction(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut timestep = FixedTimestep::new(0.01, 3);
        assert_eq!(timestep.accumulate(1.0), 3);
        assert!(timestep.fraction() < 1.0);
        assert_eq!(timestep.accumulate(0.0), 0);

        let mut timestep = FixedTimestep::new(1.0 / 60.0, 5);
        assert_eq!(timestep.accumulate(1.0e6), 5);
        assert!((0.0..1.0).contains(&timestep.fraction()));
        assert_eq!(timestep.accumulate(0.0), 0);
    }

    #[test]
    fn test_non_finite_frames_are_ignored() {
        let mut timestep = FixedTimestep::new(0.01, 4);
        assert_eq!(timestep.accumulate(f32::INFINITY), 0);
        assert_eq!(timestep.accumulate(f32::NAN), 0);
        assert_eq!(timestep.accumulate(-1.0), 0);
        assert_relative_eq!(timestep.fraction(), 0.0);
        assert_eq!(timestep.accumulate(0.025), 2);
    }

    #[test]
    fn test_invalid_step_falls_back() {
        let timestep = FixedTimestep::new(0.0, 1);
        assert_relative_eq!(timestep.step(), FixedTimestep::DEFAULT_STEP);
    }
}
