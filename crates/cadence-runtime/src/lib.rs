//! Cadence Runtime - Frame loop infrastructure
//!
//! Provides the building blocks of a fixed-timestep application:
//! - `FrameScheduler` - drives a `Host` with frame-start, fixed updates and frame-end
//! - `FixedTimestep` - accumulator turning wall-clock deltas into constant steps
//! - `StateStack` - owning stack of `State`s with transition modes and listeners
//! - `StackHost` - a `Host` that runs a `Game` and its state stack
//! - `SystemClock` / `ManualClock` - wall-clock sources

mod clock;
mod fps;
mod host;
mod listener;
mod scheduler;
mod stack;
mod stack_host;
mod state;
mod timestep;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use fps::FpsCounter;
pub use host::Host;
pub use listener::{ListenerId, ListenerRegistry, StackEvent, StackListener};
pub use scheduler::{run_host, FrameContext, FrameScheduler, LoopControl};
pub use stack::StateStack;
pub use stack_host::{Game, StackHost};
pub use state::{State, StateContext, TransitionMode};
pub use timestep::{FixedTimestep, FrameTiming};
