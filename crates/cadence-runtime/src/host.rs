//! Host trait driven by the frame scheduler

use crate::scheduler::FrameContext;
use cadence_core::{FramesPerSecond, Result, Seconds};

/// The application object a [`FrameScheduler`](crate::FrameScheduler) drives.
///
/// Within one tick the scheduler calls `frame_start` once, `fixed_update`
/// zero or more times with a constant `dt`, then `frame_end` once. Rendering
/// belongs in `frame_end`, since `fixed_update` may run several times per
/// frame. Errors returned from any hook propagate out of the scheduler.
pub trait Host {
    /// Called once before the first frame. Returning `false` aborts startup.
    ///
    /// Stopping the loop through `ctx` here ends the run before any frame.
    fn init(&mut self, ctx: &mut FrameContext<'_>, args: &[String]) -> Result<bool> {
        let _ = (ctx, args);
        Ok(true)
    }

    /// Called at the beginning of every frame
    fn frame_start(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called at a fixed rate for deterministic simulation
    fn fixed_update(&mut self, ctx: &mut FrameContext<'_>, dt: Seconds) -> Result<()>;

    /// Called at the end of every frame
    fn frame_end(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called once when the loop has ended, with the exit code it ended with
    fn shutdown(&mut self, exit_code: i32) {
        let _ = exit_code;
    }

    /// Called whenever a frame-rate reporting period closes
    fn on_fps_report(&mut self, fps: FramesPerSecond) {
        let _ = fps;
    }
}
