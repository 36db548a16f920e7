//! States - units of application behavior held by a [`StateStack`](crate::StateStack).
//!
//! A state is pushed with a [`TransitionMode`] that decides how it coexists
//! with the states beneath it. Every hook receives a [`StateContext`] that
//! reaches the stack's shared game data and lets the state request further
//! transitions; those requests are applied once the current stack operation
//! completes.

use crate::timestep::FrameTiming;
use cadence_core::{Result, Seconds, StateId};

/// How a newly pushed state coexists with the state(s) beneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransitionMode {
    /// Pop the current top, then push. The new state replaces it.
    #[default]
    Exclusive,
    /// Clear the whole stack, then push.
    ResetAll,
    /// Keep the current top but pause it; the new state receives frame events alone.
    Layered,
    /// Keep the current top active; frame events pass through the new state
    /// to the states beneath it.
    LayeredTransparent,
}

impl TransitionMode {
    /// True if dispatch continues past an entry pushed with this mode.
    pub fn is_transparent(self) -> bool {
        self == TransitionMode::LayeredTransparent
    }
}

/// A unit of application behavior with a resource and activity lifecycle.
///
/// Lifecycle: `load_resources` → `init` → `on_resume` → repeated frames of
/// `frame_start`, `update`*, `frame_end`, `render` (interleaved with
/// `on_pause`/`on_resume` while other states cover it) → `unload_resources`.
/// Every hook defaults to a no-op.
pub trait State<G> {
    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn load_resources(&mut self, ctx: &mut StateContext<'_, G>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn init(&mut self, ctx: &mut StateContext<'_, G>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn frame_start(&mut self, ctx: &mut StateContext<'_, G>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Fixed-rate simulation step; may run several times per frame.
    fn update(&mut self, ctx: &mut StateContext<'_, G>, dt: Seconds) -> Result<()> {
        let _ = (ctx, dt);
        Ok(())
    }

    fn frame_end(&mut self, ctx: &mut StateContext<'_, G>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Draw pass, after `frame_end`. `alpha` blends the last two simulation steps.
    fn render(&mut self, ctx: &mut StateContext<'_, G>, alpha: f64) -> Result<()> {
        let _ = (ctx, alpha);
        Ok(())
    }

    /// Another state was layered on top of this one.
    fn on_pause(&mut self, ctx: &mut StateContext<'_, G>) {
        let _ = ctx;
    }

    /// This state became the top again (or was just pushed).
    fn on_resume(&mut self, ctx: &mut StateContext<'_, G>) {
        let _ = ctx;
    }

    fn unload_resources(&mut self, ctx: &mut StateContext<'_, G>) {
        let _ = ctx;
    }
}

/// A stack change requested from inside a state hook.
pub(crate) enum StackCommand<G> {
    Push(Box<dyn State<G>>, TransitionMode),
    Pop,
    Remove(StateId),
    Clear,
}

/// Everything a state can reach while one of its hooks runs.
pub struct StateContext<'a, G> {
    game: &'a mut G,
    commands: &'a mut Vec<StackCommand<G>>,
    quit_request: &'a mut Option<i32>,
    id: StateId,
    timing: FrameTiming,
}

impl<'a, G> StateContext<'a, G> {
    pub(crate) fn new(
        game: &'a mut G,
        commands: &'a mut Vec<StackCommand<G>>,
        quit_request: &'a mut Option<i32>,
        id: StateId,
        timing: FrameTiming,
    ) -> Self {
        Self {
            game,
            commands,
            quit_request,
            id,
            timing,
        }
    }

    /// Id of the state receiving this hook
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn game(&self) -> &G {
        self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        self.game
    }

    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    pub fn interpolation_alpha(&self) -> f64 {
        self.timing.interpolation_alpha
    }

    /// Push `state` once the current stack operation completes.
    pub fn push(&mut self, state: impl State<G> + 'static, mode: TransitionMode) {
        self.push_boxed(Box::new(state), mode);
    }

    pub fn push_boxed(&mut self, state: Box<dyn State<G>>, mode: TransitionMode) {
        self.commands.push(StackCommand::Push(state, mode));
    }

    /// Pop the top state once the current stack operation completes.
    pub fn pop(&mut self) {
        self.commands.push(StackCommand::Pop);
    }

    /// Remove the state `id` once the current stack operation completes.
    pub fn remove(&mut self, id: StateId) {
        self.commands.push(StackCommand::Remove(id));
    }

    /// Remove the receiving state itself.
    pub fn remove_self(&mut self) {
        let id = self.id;
        self.remove(id);
    }

    pub fn clear(&mut self) {
        self.commands.push(StackCommand::Clear);
    }

    /// Ask the host to stop the frame loop with `code`. The last request wins.
    pub fn quit(&mut self, code: i32) {
        *self.quit_request = Some(code);
    }
}
