//! Frame scheduler: fixed-timestep loop around a [`Host`]

use crate::clock::{ClockSource, SystemClock};
use crate::fps::FpsCounter;
use crate::host::Host;
use crate::timestep::{FixedTimestep, FrameTiming};
use cadence_core::{
    exit_code, require_positive, CadenceError, ErrorPolicy, FramesPerSecond, LoopConfig, Result,
    Seconds,
};

/// Running flag and exit code of a frame loop.
#[derive(Debug, Clone)]
pub struct LoopControl {
    running: bool,
    exit_code: i32,
    pending_rate: Option<FramesPerSecond>,
}

impl LoopControl {
    /// A running loop with exit code [`exit_code::SUCCESS`].
    pub fn new() -> Self {
        Self {
            running: true,
            exit_code: exit_code::SUCCESS,
            pending_rate: None,
        }
    }

    /// Stop the loop with `code`. A later call overrides an earlier code.
    pub fn stop(&mut self, code: i32) {
        if self.running {
            log::debug!("frame loop stopping with exit code {code}");
        } else if self.exit_code != code {
            log::debug!("exit code overridden: {} -> {code}", self.exit_code);
        }
        self.running = false;
        self.exit_code = code;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Meaningful once the loop has stopped.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

/// What a host sees of the scheduler while one of its hooks runs.
pub struct FrameContext<'a> {
    control: &'a mut LoopControl,
    timing: FrameTiming,
}

impl<'a> FrameContext<'a> {
    pub fn new(control: &'a mut LoopControl, timing: FrameTiming) -> Self {
        Self { control, timing }
    }

    /// Stop the loop once the current fixed step (or tick) completes.
    pub fn stop(&mut self, code: i32) {
        self.control.stop(code);
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    pub fn exit_code(&self) -> i32 {
        self.control.exit_code()
    }

    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    pub fn fixed_delta_time(&self) -> Seconds {
        self.timing.fixed_delta_time
    }

    pub fn interpolation_alpha(&self) -> f64 {
        self.timing.interpolation_alpha
    }

    pub fn simulation_time(&self) -> Seconds {
        self.timing.simulation_time
    }

    pub fn frame_index(&self) -> u64 {
        self.timing.frame_index
    }

    /// Request a new simulation rate, applied at the start of the next tick.
    pub fn set_simulation_rate(&mut self, fps: FramesPerSecond) -> Result<()> {
        require_positive("simulation_rate", fps)?;
        self.control.pending_rate = Some(fps);
        Ok(())
    }
}

/// Turns irregular wall-clock polling into fixed-size simulation steps.
///
/// Either hand the loop over with [`run`](Self::run), or call
/// [`start`](Self::start) once and then [`tick`](Self::tick) from an external
/// frame pump (a windowing event loop, for example) until
/// [`is_running`](Self::is_running) turns false, then [`finish`](Self::finish).
pub struct FrameScheduler<C: ClockSource = SystemClock> {
    clock: C,
    timestep: FixedTimestep,
    control: LoopControl,
    error_policy: ErrorPolicy,
    fps: FpsCounter,
    started: bool,
    shut_down: bool,
    /// Clock reading at the previous tick
    last_time: Seconds,
    /// Clamped delta banked by the previous tick
    frame_time: Seconds,
    /// Frames completed since start
    frame_count: u64,
}

impl FrameScheduler<SystemClock> {
    /// Create a scheduler timed by the system clock
    pub fn new(config: LoopConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: ClockSource> FrameScheduler<C> {
    /// Create a scheduler timed by `clock`
    pub fn with_clock(config: LoopConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            clock,
            timestep: FixedTimestep::new(config.simulation_rate, config.max_frame_time)?,
            control: LoopControl::new(),
            error_policy: config.error_policy,
            fps: FpsCounter::new(config.fps_reporting_period),
            started: false,
            shut_down: false,
            last_time: 0.0,
            frame_time: 0.0,
            frame_count: 0,
        })
    }

    /// Initialize the host and set the timing baseline.
    ///
    /// Fails with `LifecycleViolation` when called twice and with
    /// `HostInitFailure` when the host's `init` returns false; in the latter
    /// case the loop is already stopped with [`exit_code::HOST_INIT_FAILED`].
    pub fn start<H: Host>(&mut self, host: &mut H, args: &[String]) -> Result<()> {
        if self.started {
            return Err(CadenceError::LifecycleViolation(
                "frame scheduler already started".into(),
            ));
        }
        self.started = true;

        match host.init(&mut self.context(), args) {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("host declined to initialize");
                self.control.stop(exit_code::HOST_INIT_FAILED);
                return Err(CadenceError::HostInitFailure);
            }
            Err(e) => {
                self.control.stop(e.exit_code());
                return Err(e);
            }
        }

        if !self.control.is_running() {
            log::debug!("host stopped the loop during init");
        }
        self.last_time = self.clock.now();
        self.fps.reset(self.last_time);
        log::debug!(
            "frame loop started at {} steps/s (dt = {}s, max frame time = {}s)",
            self.timestep.simulation_rate(),
            self.timestep.fixed_delta_time(),
            self.timestep.max_frame_time()
        );
        Ok(())
    }

    /// Run one frame: `frame_start`, the due fixed updates, `frame_end`.
    pub fn tick<H: Host>(&mut self, host: &mut H) -> Result<()> {
        if !self.started {
            return Err(CadenceError::LifecycleViolation(
                "tick called before start".into(),
            ));
        }
        if self.shut_down {
            return Err(CadenceError::LifecycleViolation(
                "tick called after finish".into(),
            ));
        }
        if let Some(rate) = self.control.pending_rate.take() {
            self.timestep.set_simulation_rate(rate)?;
            log::debug!("simulation rate changed to {rate} steps/s");
        }

        host.frame_start(&mut self.context())?;

        let now = self.clock.now();
        let elapsed = now - self.last_time;
        self.last_time = now;
        self.frame_time = self.timestep.accumulate(elapsed);
        if elapsed > self.frame_time {
            log::trace!("frame time {elapsed}s clamped to {}s", self.frame_time);
        }

        while self.control.is_running() && self.timestep.should_fixed_update() {
            let dt = self.timestep.fixed_delta_time();
            host.fixed_update(&mut self.context(), dt)?;
            self.timestep.consume_fixed_step();
        }

        host.frame_end(&mut self.context())?;

        self.frame_count += 1;
        if let Some(fps) = self.fps.frame(self.clock.now()) {
            log::debug!("runtime fps: {fps:.1}");
            host.on_fps_report(fps);
        }
        Ok(())
    }

    /// Start the host, tick until stopped, shut the host down.
    ///
    /// Returns the exit code. A host that declines to initialize yields
    /// [`exit_code::HOST_INIT_FAILED`] without running any frame. Hook
    /// errors are returned as-is under [`ErrorPolicy::Propagate`] (the host
    /// is not shut down; the caller decides how to finish) and mapped to
    /// their exit code under [`ErrorPolicy::ExitCode`].
    pub fn run<H: Host>(&mut self, host: &mut H, args: &[String]) -> Result<i32> {
        match self.start(host, args) {
            Ok(()) => {}
            Err(CadenceError::HostInitFailure) => return Ok(self.finish(host)),
            Err(e) => return self.fail(host, e),
        }

        while self.control.is_running() {
            if let Err(e) = self.tick(host) {
                return self.fail(host, e);
            }
        }

        Ok(self.finish(host))
    }

    /// Call the host's `shutdown` hook once and return the exit code.
    ///
    /// A loop that is still running is stopped with its current code.
    pub fn finish<H: Host>(&mut self, host: &mut H) -> i32 {
        self.control.running = false;
        if !self.shut_down {
            self.shut_down = true;
            log::debug!(
                "frame loop finished after {} frames, exit code {}",
                self.frame_count,
                self.control.exit_code
            );
            host.shutdown(self.control.exit_code);
        }
        self.control.exit_code
    }

    /// Stop the loop with `code`. The last call wins.
    pub fn stop(&mut self, code: i32) {
        self.control.stop(code);
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    pub fn exit_code(&self) -> i32 {
        self.control.exit_code()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn simulation_rate(&self) -> FramesPerSecond {
        self.timestep.simulation_rate()
    }

    /// Change the simulation rate immediately.
    pub fn set_simulation_rate(&mut self, fps: FramesPerSecond) -> Result<()> {
        self.timestep.set_simulation_rate(fps)
    }

    pub fn fixed_delta_time(&self) -> Seconds {
        self.timestep.fixed_delta_time()
    }

    pub fn max_frame_time(&self) -> Seconds {
        self.timestep.max_frame_time()
    }

    pub fn accumulator(&self) -> Seconds {
        self.timestep.accumulator()
    }

    pub fn interpolation_alpha(&self) -> f64 {
        self.timestep.interpolation_alpha()
    }

    pub fn simulation_time(&self) -> Seconds {
        self.timestep.simulation_time()
    }

    /// Frames completed since start
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The most recent runtime frame rate, once a reporting period has closed
    pub fn runtime_fps(&self) -> Option<FramesPerSecond> {
        self.fps.last()
    }

    pub fn timing(&self) -> FrameTiming {
        FrameTiming {
            fixed_delta_time: self.timestep.fixed_delta_time(),
            frame_time: self.frame_time,
            interpolation_alpha: self.timestep.interpolation_alpha(),
            simulation_time: self.timestep.simulation_time(),
            frame_index: self.frame_count,
        }
    }

    fn context(&mut self) -> FrameContext<'_> {
        let timing = self.timing();
        FrameContext::new(&mut self.control, timing)
    }

    fn fail<H: Host>(&mut self, host: &mut H, error: CadenceError) -> Result<i32> {
        match self.error_policy {
            ErrorPolicy::Propagate => Err(error),
            ErrorPolicy::ExitCode => {
                log::debug!("frame loop failed: {error}");
                self.control.stop(error.exit_code());
                Ok(self.finish(host))
            }
        }
    }
}

/// Run `host` to completion on the system clock and return its exit code.
pub fn run_host<H: Host>(host: &mut H, config: LoopConfig, args: &[String]) -> Result<i32> {
    FrameScheduler::new(config)?.run(host, args)
}
