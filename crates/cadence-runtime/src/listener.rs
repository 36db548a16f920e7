//! Stack change notifications

use crate::state::TransitionMode;
use cadence_core::StateId;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A change about to happen, or just made, to a [`StateStack`](crate::StateStack).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEvent {
    /// Sent before the transition runs.
    WillBePushed { id: StateId, mode: TransitionMode },
    /// Sent once the pushed state has loaded, initialized and resumed.
    WasPushed { id: StateId, mode: TransitionMode },
    /// Sent before the top state is popped.
    WillBePopped { id: StateId },
    /// Sent before a specific state is removed by id.
    WillBeRemoved { id: StateId },
    /// Sent once before the whole stack is cleared.
    WillBeCleared,
}

/// Observer of stack transitions.
pub trait StackListener {
    fn on_stack_event(&mut self, event: &StackEvent);
}

impl<F: FnMut(&StackEvent)> StackListener for F {
    fn on_stack_event(&mut self, event: &StackEvent) {
        self(event)
    }
}

/// Handle returned by [`ListenerRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Non-owning list of listeners, notified in registration order.
///
/// Listeners are held weakly; one whose last `Rc` was dropped is pruned on
/// the next notification.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<(ListenerId, Weak<RefCell<dyn StackListener>>)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<L: StackListener + 'static>(&mut self, listener: &Rc<RefCell<L>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let listener: Rc<RefCell<dyn StackListener>> = listener.clone();
        self.listeners.push((id, Rc::downgrade(&listener)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every live listener.
    pub fn notify(&mut self, event: &StackEvent) {
        self.listeners.retain(|(_, listener)| listener.strong_count() > 0);
        for (_, listener) in &self.listeners {
            if let Some(listener) = listener.upgrade() {
                match listener.try_borrow_mut() {
                    Ok(mut listener) => listener.on_stack_event(event),
                    Err(_) => log::warn!("stack listener busy, skipped {event:?}"),
                }
            }
        }
    }

    /// Number of registered listeners that are still alive
    pub fn len(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(_, listener)| listener.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
