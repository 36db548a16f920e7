//! Fixed-timestep accumulator

use cadence_core::{require_positive, FramesPerSecond, Result, Seconds};

/// Largest value [`FixedTimestep::interpolation_alpha`] reports.
const MAX_ALPHA: f64 = 1.0 - f64::EPSILON;

/// Banks wall-clock time and hands it out in constant-size simulation steps.
///
/// The accumulator is drained by the caller:
///
/// ```ignore
/// timestep.accumulate(frame_time);
/// while timestep.should_fixed_update() {
///     simulate(timestep.fixed_delta_time());
///     timestep.consume_fixed_step();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    simulation_rate: FramesPerSecond,
    fixed_delta_time: Seconds,
    max_frame_time: Seconds,
    /// Time banked but not yet consumed by a fixed step
    accumulator: Seconds,
    /// Sum of all consumed fixed steps
    simulation_time: Seconds,
}

impl FixedTimestep {
    /// Create a timestep running at `simulation_rate` steps per second that
    /// clamps each banked delta to `max_frame_time`.
    pub fn new(simulation_rate: FramesPerSecond, max_frame_time: Seconds) -> Result<Self> {
        require_positive("simulation_rate", simulation_rate)?;
        require_positive("max_frame_time", max_frame_time)?;
        Ok(Self {
            simulation_rate,
            fixed_delta_time: 1.0 / simulation_rate,
            max_frame_time,
            accumulator: 0.0,
            simulation_time: 0.0,
        })
    }

    /// Change the step frequency. Banked time is kept.
    pub fn set_simulation_rate(&mut self, fps: FramesPerSecond) -> Result<()> {
        require_positive("simulation_rate", fps)?;
        self.simulation_rate = fps;
        self.fixed_delta_time = 1.0 / fps;
        Ok(())
    }

    pub fn simulation_rate(&self) -> FramesPerSecond {
        self.simulation_rate
    }

    pub fn fixed_delta_time(&self) -> Seconds {
        self.fixed_delta_time
    }

    pub fn max_frame_time(&self) -> Seconds {
        self.max_frame_time
    }

    pub fn accumulator(&self) -> Seconds {
        self.accumulator
    }

    pub fn simulation_time(&self) -> Seconds {
        self.simulation_time
    }

    /// Bank a measured frame delta and return the amount actually banked.
    ///
    /// Negative deltas count as zero and large ones are clamped to
    /// `max_frame_time` so a stall cannot trigger an unbounded catch-up.
    pub fn accumulate(&mut self, frame_time: Seconds) -> Seconds {
        let frame_time = frame_time.clamp(0.0, self.max_frame_time);
        self.accumulator += frame_time;
        frame_time
    }

    /// Returns true if there's enough accumulated time for a fixed update step
    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_delta_time
    }

    /// Consume one fixed timestep from the accumulator
    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_delta_time;
        self.simulation_time += self.fixed_delta_time;
    }

    /// Get the interpolation alpha for rendering between fixed steps, in `[0, 1)`
    pub fn interpolation_alpha(&self) -> f64 {
        (self.accumulator / self.fixed_delta_time).clamp(0.0, MAX_ALPHA)
    }
}

/// Timing snapshot handed to hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Size of every fixed step
    pub fixed_delta_time: Seconds,
    /// Clamped wall-clock delta banked by the most recent tick
    pub frame_time: Seconds,
    /// Blend factor between the last two simulation steps
    pub interpolation_alpha: f64,
    /// Total simulated time
    pub simulation_time: Seconds,
    /// Index of the frame in progress, starting at 0
    pub frame_index: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self {
            fixed_delta_time: 0.01,
            frame_time: 0.0,
            interpolation_alpha: 0.0,
            simulation_time: 0.0,
            frame_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::CadenceError;

    fn drain(timestep: &mut FixedTimestep) -> u32 {
        let mut steps = 0;
        while timestep.should_fixed_update() {
            timestep.consume_fixed_step();
            steps += 1;
        }
        steps
    }

    #[test]
    fn test_defaults() {
        let timestep = FixedTimestep::new(100.0, 0.25).unwrap();
        assert!((timestep.fixed_delta_time() - 0.01).abs() < 1e-12);
        assert_eq!(timestep.accumulator(), 0.0);
        assert_eq!(timestep.simulation_time(), 0.0);
    }

    #[test]
    fn test_rejects_bad_rate() {
        assert!(matches!(
            FixedTimestep::new(0.0, 0.25),
            Err(CadenceError::InvalidArgument(_))
        ));
        let mut timestep = FixedTimestep::new(60.0, 0.25).unwrap();
        assert!(timestep.set_simulation_rate(-5.0).is_err());
        assert!(timestep.set_simulation_rate(f64::INFINITY).is_err());
        assert_eq!(timestep.simulation_rate(), 60.0);
    }

    #[test]
    fn test_set_rate_recomputes_delta() {
        let mut timestep = FixedTimestep::new(60.0, 0.25).unwrap();
        timestep.set_simulation_rate(30.0).unwrap();
        assert!((timestep.fixed_delta_time() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_logic() {
        let mut timestep = FixedTimestep::new(60.0, 0.25).unwrap();
        timestep.accumulate(1.0 / 30.0); // Two fixed steps worth

        assert!(timestep.should_fixed_update());
        timestep.consume_fixed_step();
        assert!(timestep.should_fixed_update());
        timestep.consume_fixed_step();
        assert!(!timestep.should_fixed_update());
    }

    #[test]
    fn test_quarter_frame_leaves_remainder() {
        let mut timestep = FixedTimestep::new(100.0, 0.25).unwrap();
        timestep.accumulate(0.025);
        assert_eq!(drain(&mut timestep), 2);
        assert!((timestep.accumulator() - 0.005).abs() < 1e-9);
        assert!((timestep.simulation_time() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_spike_is_clamped() {
        let mut timestep = FixedTimestep::new(64.0, 0.25).unwrap();
        let banked = timestep.accumulate(2.0);
        assert_eq!(banked, 0.25);
        assert_eq!(drain(&mut timestep), 16);
    }

    #[test]
    fn test_negative_delta_banks_nothing() {
        let mut timestep = FixedTimestep::new(100.0, 0.25).unwrap();
        assert_eq!(timestep.accumulate(-1.0), 0.0);
        assert_eq!(timestep.accumulator(), 0.0);
    }

    #[test]
    fn test_step_count_matches_floor() {
        // Binary fractions keep the arithmetic exact.
        let mut timestep = FixedTimestep::new(64.0, 0.25).unwrap();
        let dt = timestep.fixed_delta_time();
        let deltas = [0.03125, 0.0078125, 0.5, 0.01171875, 0.0, 0.2421875];

        let mut steps = 0;
        let mut banked = 0.0;
        for delta in deltas {
            banked += timestep.accumulate(delta);
            steps += drain(&mut timestep);
            assert!(timestep.accumulator() >= 0.0);
            assert!(timestep.accumulator() < dt);
        }

        assert_eq!(steps as f64, (banked / dt).floor());
        assert_eq!(timestep.accumulator(), banked % dt);
        assert_eq!(timestep.simulation_time(), steps as f64 * dt);
    }

    #[test]
    fn test_interpolation_alpha() {
        let mut timestep = FixedTimestep::new(60.0, 0.25).unwrap();
        timestep.accumulate(timestep.fixed_delta_time() * 0.5);
        assert!((timestep.interpolation_alpha() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_alpha_stays_below_one() {
        let mut timestep = FixedTimestep::new(10.0, 0.25).unwrap();
        timestep.accumulate(0.09);
        // Shrinking the step leaves more than one step banked until drained.
        timestep.set_simulation_rate(100.0).unwrap();
        let alpha = timestep.interpolation_alpha();
        assert!((0.0..1.0).contains(&alpha));
    }
}
