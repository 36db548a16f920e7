//! Ready-made host that drives a [`StateStack`] from the frame scheduler

use crate::host::Host;
use crate::scheduler::FrameContext;
use crate::stack::StateStack;
use crate::state::{State, TransitionMode};
use cadence_core::{FramesPerSecond, Result, Seconds};

/// Application data shared by every state on a [`StackHost`]'s stack.
///
/// Each frame hook runs before the same hook is dispatched to the states.
pub trait Game: Sized {
    /// Called once before the first frame. Returning `false` aborts startup.
    fn init(&mut self, args: &[String]) -> Result<bool> {
        let _ = args;
        Ok(true)
    }

    /// State the stack is reset to on startup and by [`StackHost::reset`].
    fn initial_state(&mut self) -> Option<Box<dyn State<Self>>> {
        None
    }

    fn frame_start(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &mut FrameContext<'_>, dt: Seconds) -> Result<()> {
        let _ = (ctx, dt);
        Ok(())
    }

    fn frame_end(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called after the stack was cleared, with the loop's exit code.
    fn shutdown(&mut self, exit_code: i32) {
        let _ = exit_code;
    }

    fn on_fps_report(&mut self, fps: FramesPerSecond) {
        let _ = fps;
    }
}

/// [`Host`] that owns a game and the stack of states operating on it.
///
/// `frame_end` also renders the stack, so states see `frame_start`, their
/// fixed `update`s, `frame_end` and `render` in that order every frame.
/// Exit codes passed to [`StateContext::quit`](crate::StateContext::quit)
/// stop the scheduler.
pub struct StackHost<G: Game> {
    stack: StateStack<G>,
}

impl<G: Game> StackHost<G> {
    pub fn new(game: G) -> Self {
        Self {
            stack: StateStack::new(game),
        }
    }

    pub fn stack(&self) -> &StateStack<G> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut StateStack<G> {
        &mut self.stack
    }

    pub fn game(&self) -> &G {
        self.stack.game()
    }

    pub fn game_mut(&mut self) -> &mut G {
        self.stack.game_mut()
    }

    /// Replace the whole stack with the game's initial state, if it has one.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(state) = self.stack.game_mut().initial_state() {
            self.stack.push_boxed(state, TransitionMode::ResetAll)?;
        }
        Ok(())
    }

    fn forward_quit(&mut self, ctx: &mut FrameContext<'_>) {
        if let Some(code) = self.stack.take_quit_request() {
            ctx.stop(code);
        }
    }
}

impl<G: Game> Host for StackHost<G> {
    fn init(&mut self, ctx: &mut FrameContext<'_>, args: &[String]) -> Result<bool> {
        if !self.stack.game_mut().init(args)? {
            return Ok(false);
        }
        self.reset()?;
        self.forward_quit(ctx);
        Ok(true)
    }

    fn frame_start(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        self.stack.game_mut().frame_start(ctx)?;
        self.stack.frame_start(ctx.timing())?;
        self.forward_quit(ctx);
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &mut FrameContext<'_>, dt: Seconds) -> Result<()> {
        self.stack.game_mut().fixed_update(ctx, dt)?;
        self.stack.update(ctx.timing(), dt)?;
        self.forward_quit(ctx);
        Ok(())
    }

    fn frame_end(&mut self, ctx: &mut FrameContext<'_>) -> Result<()> {
        self.stack.game_mut().frame_end(ctx)?;
        let timing = ctx.timing();
        self.stack.frame_end(timing)?;
        self.stack.render(timing)?;
        self.forward_quit(ctx);
        Ok(())
    }

    fn shutdown(&mut self, exit_code: i32) {
        if let Err(e) = self.stack.clear() {
            log::warn!("state stack failed to clear on shutdown: {e}");
        }
        self.stack.game_mut().shutdown(exit_code);
    }

    fn on_fps_report(&mut self, fps: FramesPerSecond) {
        self.stack.game_mut().on_fps_report(fps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::LoopControl;
    use crate::state::StateContext;
    use crate::timestep::FrameTiming;

    #[derive(Default)]
    struct Arcade {
        log: Vec<String>,
        decline: bool,
        quit_on_init: Option<i32>,
        quit_after: Option<u32>,
        updates: u32,
        shutdown_code: Option<i32>,
    }

    impl Game for Arcade {
        fn init(&mut self, _args: &[String]) -> Result<bool> {
            self.log.push("game:init".into());
            Ok(!self.decline)
        }

        fn initial_state(&mut self) -> Option<Box<dyn State<Self>>> {
            Some(Box::new(Level))
        }

        fn fixed_update(&mut self, _ctx: &mut FrameContext<'_>, _dt: Seconds) -> Result<()> {
            self.log.push("game:update".into());
            Ok(())
        }

        fn frame_end(&mut self, _ctx: &mut FrameContext<'_>) -> Result<()> {
            self.log.push("game:end".into());
            Ok(())
        }

        fn shutdown(&mut self, exit_code: i32) {
            self.shutdown_code = Some(exit_code);
        }
    }

    struct Level;

    impl State<Arcade> for Level {
        fn init(&mut self, ctx: &mut StateContext<'_, Arcade>) -> Result<()> {
            ctx.game_mut().log.push("level:init".into());
            if let Some(code) = ctx.game().quit_on_init {
                ctx.quit(code);
            }
            Ok(())
        }

        fn update(&mut self, ctx: &mut StateContext<'_, Arcade>, _dt: Seconds) -> Result<()> {
            let game = ctx.game_mut();
            game.log.push("level:update".into());
            game.updates += 1;
            if game.quit_after == Some(game.updates) {
                ctx.quit(3);
            }
            Ok(())
        }

        fn frame_end(&mut self, ctx: &mut StateContext<'_, Arcade>) -> Result<()> {
            ctx.game_mut().log.push("level:end".into());
            Ok(())
        }

        fn render(&mut self, ctx: &mut StateContext<'_, Arcade>, _alpha: f64) -> Result<()> {
            ctx.game_mut().log.push("level:render".into());
            Ok(())
        }

        fn unload_resources(&mut self, ctx: &mut StateContext<'_, Arcade>) {
            ctx.game_mut().log.push("level:unload".into());
        }
    }

    fn init_host(host: &mut StackHost<Arcade>) -> Result<bool> {
        let mut control = LoopControl::new();
        host.init(&mut FrameContext::new(&mut control, FrameTiming::default()), &[])
    }

    #[test]
    fn test_init_pushes_initial_state() {
        let mut host = StackHost::new(Arcade::default());
        assert!(init_host(&mut host).unwrap());
        assert_eq!(host.stack().len(), 1);
        assert_eq!(host.game().log, vec!["game:init", "level:init"]);
    }

    #[test]
    fn test_quit_during_init_stops_loop() {
        let mut host = StackHost::new(Arcade {
            quit_on_init: Some(9),
            ..Default::default()
        });
        let mut control = LoopControl::new();
        let mut ctx = FrameContext::new(&mut control, FrameTiming::default());
        assert!(host.init(&mut ctx, &[]).unwrap());
        assert!(!ctx.is_running());
        assert_eq!(ctx.exit_code(), 9);
        assert_eq!(host.stack_mut().take_quit_request(), None);
    }

    #[test]
    fn test_declined_init_pushes_nothing() {
        let mut host = StackHost::new(Arcade {
            decline: true,
            ..Default::default()
        });
        assert!(!init_host(&mut host).unwrap());
        assert!(host.stack().is_empty());
    }

    #[test]
    fn test_game_runs_before_states() {
        let mut host = StackHost::new(Arcade::default());
        init_host(&mut host).unwrap();
        host.game_mut().log.clear();

        let mut control = LoopControl::new();
        let mut ctx = FrameContext::new(&mut control, FrameTiming::default());
        host.fixed_update(&mut ctx, 0.01).unwrap();
        host.frame_end(&mut ctx).unwrap();

        assert_eq!(
            host.game().log,
            vec![
                "game:update",
                "level:update",
                "game:end",
                "level:end",
                "level:render"
            ]
        );
    }

    #[test]
    fn test_state_quit_stops_loop() {
        let mut host = StackHost::new(Arcade {
            quit_after: Some(2),
            ..Default::default()
        });
        init_host(&mut host).unwrap();

        let mut control = LoopControl::new();
        let mut ctx = FrameContext::new(&mut control, FrameTiming::default());
        host.fixed_update(&mut ctx, 0.01).unwrap();
        assert!(ctx.is_running());
        host.fixed_update(&mut ctx, 0.01).unwrap();
        assert!(!ctx.is_running());
        assert_eq!(ctx.exit_code(), 3);
    }

    #[test]
    fn test_shutdown_clears_then_notifies_game() {
        let mut host = StackHost::new(Arcade::default());
        init_host(&mut host).unwrap();
        host.shutdown(0);

        assert!(host.stack().is_empty());
        assert_eq!(host.game().log.last().map(String::as_str), Some("level:unload"));
        assert_eq!(host.game().shutdown_code, Some(0));
    }

    #[test]
    fn test_reset_replaces_stack() {
        let mut host = StackHost::new(Arcade::default());
        init_host(&mut host).unwrap();
        let first = host.stack().top_id();

        host.reset().unwrap();
        assert_eq!(host.stack().len(), 1);
        assert_ne!(host.stack().top_id(), first);
    }
}
