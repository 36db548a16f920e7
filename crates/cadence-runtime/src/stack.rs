//! State stack - an owning, ordered collection of [`State`]s.
//!
//! The stack owns the application data `G` every state operates on and hands
//! it to each hook through a [`StateContext`]. Frame events are dispatched
//! from the top down and stop at the first entry that was not pushed with
//! [`TransitionMode::LayeredTransparent`].

use crate::listener::{ListenerId, ListenerRegistry, StackEvent, StackListener};
use crate::state::{StackCommand, State, StateContext, TransitionMode};
use crate::timestep::FrameTiming;
use cadence_core::{Result, Seconds, StateId};
use std::cell::RefCell;
use std::rc::Rc;

/// Where an entry is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Initializing,
    Active,
    Paused,
    Unloading,
}

impl Phase {
    fn accepts_frames(self) -> bool {
        matches!(self, Phase::Active | Phase::Paused)
    }
}

struct Entry<G> {
    id: StateId,
    mode: TransitionMode,
    phase: Phase,
    state: Box<dyn State<G>>,
}

/// Pushdown stack of states sharing one `G`.
///
/// Bottom is index 0, the top is the last entry. Dropping the stack clears
/// it, so every remaining state gets its `unload_resources` call.
pub struct StateStack<G> {
    game: G,
    entries: Vec<Entry<G>>,
    listeners: ListenerRegistry,
    /// Transitions requested from inside hooks, applied after the current operation
    commands: Vec<StackCommand<G>>,
    quit_request: Option<i32>,
    /// Timing handed to hooks; refreshed by every dispatch
    timing: FrameTiming,
}

impl<G> StateStack<G> {
    /// Creates an empty stack owning `game`.
    pub fn new(game: G) -> Self {
        Self {
            game,
            entries: Vec::new(),
            listeners: ListenerRegistry::new(),
            commands: Vec::new(),
            quit_request: None,
            timing: FrameTiming::default(),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Push `state` as the new top and return its id.
    ///
    /// If its `load_resources` or `init` fails the state is taken off again
    /// and the error returned; a state paused by a `Layered` push is resumed.
    pub fn push(
        &mut self,
        state: impl State<G> + 'static,
        mode: TransitionMode,
    ) -> Result<StateId> {
        self.push_boxed(Box::new(state), mode)
    }

    pub fn push_boxed(
        &mut self,
        state: Box<dyn State<G>>,
        mode: TransitionMode,
    ) -> Result<StateId> {
        match self.push_now(state, mode) {
            Ok(id) => {
                self.apply_commands()?;
                Ok(id)
            }
            Err(e) => {
                self.commands.clear();
                Err(e)
            }
        }
    }

    /// Pop the top state. Does nothing on an empty stack.
    ///
    /// The new top is resumed unless the popped state was layered transparently.
    pub fn pop(&mut self) -> Result<()> {
        self.pop_now(true);
        self.apply_commands()
    }

    /// Remove the state `id` wherever it sits. Returns false if it is not on the stack.
    ///
    /// No other state is paused or resumed.
    pub fn remove(&mut self, id: StateId) -> Result<bool> {
        let removed = self.remove_now(id);
        self.apply_commands()?;
        Ok(removed)
    }

    /// Unload and drop every state, top first.
    pub fn clear(&mut self) -> Result<()> {
        self.clear_now();
        self.apply_commands()
    }

    pub fn frame_start(&mut self, timing: FrameTiming) -> Result<()> {
        self.dispatch(timing, |state, ctx| state.frame_start(ctx))
    }

    pub fn update(&mut self, timing: FrameTiming, dt: Seconds) -> Result<()> {
        self.dispatch(timing, |state, ctx| state.update(ctx, dt))
    }

    pub fn frame_end(&mut self, timing: FrameTiming) -> Result<()> {
        self.dispatch(timing, |state, ctx| state.frame_end(ctx))
    }

    pub fn render(&mut self, timing: FrameTiming) -> Result<()> {
        let alpha = timing.interpolation_alpha;
        self.dispatch(timing, |state, ctx| state.render(ctx, alpha))
    }

    /// Register a weak observer of stack transitions.
    pub fn add_listener<L: StackListener + 'static>(
        &mut self,
        listener: &Rc<RefCell<L>>,
    ) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Take the exit code a state asked to quit with, if any.
    pub fn take_quit_request(&mut self) -> Option<i32> {
        self.quit_request.take()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_id(&self) -> Option<StateId> {
        self.entries.last().map(|e| e.id)
    }

    /// Ids from bottom to top
    pub fn ids(&self) -> Vec<StateId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// State names from bottom to top
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.state.name()).collect()
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.position(id).is_some()
    }

    /// Mode the state `id` was pushed with
    pub fn mode_of(&self, id: StateId) -> Option<TransitionMode> {
        self.position(id).map(|i| self.entries[i].mode)
    }

    pub fn is_paused(&self, id: StateId) -> bool {
        self.position(id)
            .map(|i| self.entries[i].phase == Phase::Paused)
            .unwrap_or(false)
    }

    fn position(&self, id: StateId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Run `hook` on the entry at `index` with a context borrowing the rest of the stack.
    fn call<R>(
        &mut self,
        index: usize,
        hook: impl FnOnce(&mut dyn State<G>, &mut StateContext<'_, G>) -> R,
    ) -> R {
        let Self {
            game,
            entries,
            commands,
            quit_request,
            timing,
            ..
        } = self;
        let entry = &mut entries[index];
        let mut ctx = StateContext::new(game, commands, quit_request, entry.id, *timing);
        hook(entry.state.as_mut(), &mut ctx)
    }

    /// Indices receiving frame events, top first.
    fn dispatch_targets(&self) -> Vec<usize> {
        let mut targets = Vec::new();
        for (index, entry) in self.entries.iter().enumerate().rev() {
            targets.push(index);
            if !entry.mode.is_transparent() {
                break;
            }
        }
        targets
    }

    fn dispatch(
        &mut self,
        timing: FrameTiming,
        hook: impl Fn(&mut dyn State<G>, &mut StateContext<'_, G>) -> Result<()>,
    ) -> Result<()> {
        self.timing = timing;
        for index in self.dispatch_targets() {
            debug_assert!(
                self.entries[index].phase.accepts_frames(),
                "frame event sent to a state that is {:?}",
                self.entries[index].phase
            );
            if let Err(e) = self.call(index, &hook) {
                self.commands.clear();
                return Err(e);
            }
        }
        self.apply_commands()
    }

    /// Apply deferred transitions in the order they were requested.
    fn apply_commands(&mut self) -> Result<()> {
        loop {
            let batch = std::mem::take(&mut self.commands);
            if batch.is_empty() {
                return Ok(());
            }
            for command in batch {
                let result = match command {
                    StackCommand::Push(state, mode) => self.push_now(state, mode).map(|_| ()),
                    StackCommand::Pop => {
                        self.pop_now(true);
                        Ok(())
                    }
                    StackCommand::Remove(id) => {
                        self.remove_now(id);
                        Ok(())
                    }
                    StackCommand::Clear => {
                        self.clear_now();
                        Ok(())
                    }
                };
                if let Err(e) = result {
                    self.commands.clear();
                    return Err(e);
                }
            }
        }
    }

    fn push_now(&mut self, state: Box<dyn State<G>>, mode: TransitionMode) -> Result<StateId> {
        let id = StateId::next();
        self.listeners.notify(&StackEvent::WillBePushed { id, mode });

        let mut paused = None;
        match mode {
            TransitionMode::Exclusive => self.pop_now(false),
            TransitionMode::ResetAll => self.clear_now(),
            TransitionMode::Layered => {
                if let Some(index) = self.entries.len().checked_sub(1) {
                    if self.entries[index].phase == Phase::Active {
                        self.entries[index].phase = Phase::Paused;
                        self.call(index, |state, ctx| state.on_pause(ctx));
                        paused = Some(self.entries[index].id);
                    }
                }
            }
            TransitionMode::LayeredTransparent => {}
        }

        log::debug!("pushing state '{}' ({id}) as {mode:?}", state.name());
        self.entries.push(Entry {
            id,
            mode,
            phase: Phase::Loading,
            state,
        });
        let index = self.entries.len() - 1;

        if let Err(e) = self.call(index, |state, ctx| state.load_resources(ctx)) {
            log::debug!("state {id} failed to load resources: {e}");
            self.entries.pop();
            self.resume_after_failed_push(paused);
            return Err(e);
        }

        self.entries[index].phase = Phase::Initializing;
        if let Err(e) = self.call(index, |state, ctx| state.init(ctx)) {
            log::debug!("state {id} failed to initialize: {e}");
            self.entries[index].phase = Phase::Unloading;
            self.call(index, |state, ctx| state.unload_resources(ctx));
            self.entries.pop();
            self.resume_after_failed_push(paused);
            return Err(e);
        }

        self.entries[index].phase = Phase::Active;
        self.call(index, |state, ctx| state.on_resume(ctx));
        self.listeners.notify(&StackEvent::WasPushed { id, mode });
        Ok(id)
    }

    fn resume_after_failed_push(&mut self, paused: Option<StateId>) {
        if let Some(index) = paused.and_then(|id| self.position(id)) {
            self.entries[index].phase = Phase::Active;
            self.call(index, |state, ctx| state.on_resume(ctx));
        }
    }

    fn pop_now(&mut self, resume_below: bool) {
        let Some(top) = self.entries.last() else {
            return;
        };
        let id = top.id;
        let mode = top.mode;
        self.listeners.notify(&StackEvent::WillBePopped { id });
        self.unload_at(self.entries.len() - 1);

        if resume_below && !mode.is_transparent() {
            if let Some(index) = self.entries.len().checked_sub(1) {
                self.entries[index].phase = Phase::Active;
                self.call(index, |state, ctx| state.on_resume(ctx));
            }
        }
    }

    fn remove_now(&mut self, id: StateId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.listeners.notify(&StackEvent::WillBeRemoved { id });
        self.unload_at(index);
        true
    }

    fn clear_now(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.listeners.notify(&StackEvent::WillBeCleared);
        log::debug!("clearing {} state(s)", self.entries.len());
        while !self.entries.is_empty() {
            self.unload_at(self.entries.len() - 1);
        }
    }

    /// Unload the entry at `index`, then take it off the stack and drop it.
    fn unload_at(&mut self, index: usize) {
        self.entries[index].phase = Phase::Unloading;
        self.call(index, |state, ctx| state.unload_resources(ctx));
        let entry = self.entries.remove(index);
        log::debug!("removed state '{}' ({})", entry.state.name(), entry.id);
    }
}

impl<G> Drop for StateStack<G> {
    fn drop(&mut self) {
        self.clear_now();
        self.commands.clear();
    }
}
