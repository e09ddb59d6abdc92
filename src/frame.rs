//! Frame pacing: the running/stopped state machine and the host scheduler seam.

/// Time added per tick. Playback speed follows the display refresh rate.
pub const TIME_STEP: f32 = 0.05;

/// Asks the host to run one more tick at its next display refresh.
///
/// With winit this is `Window::request_redraw`; tests count the calls.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopped,
}

/// Owns the time counter and whether ticks advance it.
///
/// Time is derived from the number of running ticks, so `n` ticks always
/// read as exactly `n × step` with no accumulated rounding.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    state: DriverState,
    ticks: u64,
    step: f32,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(TIME_STEP)
    }
}

impl FrameDriver {
    /// A running driver at time zero.
    pub fn new(step: f32) -> Self {
        Self {
            state: DriverState::Running,
            ticks: 0,
            step,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn time(&self) -> f32 {
        self.ticks as f32 * self.step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance by one step and return the new time, or `None` while stopped.
    pub fn advance(&mut self) -> Option<f32> {
        if !self.is_running() {
            return None;
        }
        self.ticks += 1;
        Some(self.time())
    }

    /// Stop advancing. Returns `true` if the driver was running.
    pub fn pause(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = DriverState::Stopped;
        was_running
    }

    /// Start advancing again. Returns `true` if the driver was stopped.
    pub fn resume(&mut self) -> bool {
        let was_stopped = !self.is_running();
        self.state = DriverState::Running;
        was_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running_at_zero() {
        let driver = FrameDriver::default();
        assert!(driver.is_running());
        assert_eq!(driver.time(), 0.0);
    }

    #[test]
    fn time_is_step_times_ticks() {
        let mut driver = FrameDriver::default();
        for n in 1..=1000u32 {
            let time = driver.advance().unwrap();
            assert_eq!(time, n as f32 * TIME_STEP);
        }
        assert_eq!(driver.ticks(), 1000);
    }

    #[test]
    fn stopped_driver_does_not_advance() {
        let mut driver = FrameDriver::default();
        driver.advance();
        assert!(driver.pause());
        assert!(!driver.pause());

        for _ in 0..5 {
            assert_eq!(driver.advance(), None);
        }
        assert_eq!(driver.ticks(), 1);

        assert!(driver.resume());
        assert!(!driver.resume());
        assert_eq!(driver.advance(), Some(2.0 * TIME_STEP));
    }
}
