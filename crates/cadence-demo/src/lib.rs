//! Cadence Demo - headless showcase of the frame loop and state stack
//!
//! A bouncing-ball "game" that starts on a menu, switches to gameplay with a
//! transparent HUD layered on top, and periodically layers a pause screen.

mod game;
pub mod logging;
mod states;

pub use game::{Ball, DemoGame, DemoSettings};
pub use states::{Gameplay, Hud, Menu, Pause};
