//! Demo game data shared by every state

use crate::states::Menu;
use cadence_core::{FramesPerSecond, Result, Seconds};
use cadence_runtime::{FrameContext, Game, State};
use std::time::Duration;

const GRAVITY: f64 = -9.81;
const RESTITUTION: f64 = 0.8;

/// Timings of the scripted session.
#[derive(Debug, Clone)]
pub struct DemoSettings {
    /// Simulated seconds spent on the menu before gameplay starts
    pub menu_time: Seconds,
    /// Simulated seconds of gameplay before the demo quits
    pub play_time: Seconds,
    /// Gameplay seconds between pause screens
    pub pause_every: Seconds,
    /// How long each pause screen stays up
    pub pause_time: Seconds,
    /// Sleep after each frame to roughly hold this rate; `None` runs unpaced
    pub target_fps: Option<FramesPerSecond>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            menu_time: 0.5,
            play_time: 3.0,
            pause_every: 1.0,
            pause_time: 0.25,
            target_fps: Some(60.0),
        }
    }
}

/// A ball dropped from a height, bouncing on the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub height: f64,
    pub velocity: f64,
    /// Height before the latest step, for interpolation
    pub previous_height: f64,
    pub bounces: u32,
}

impl Ball {
    pub fn dropped_from(height: f64) -> Self {
        Self {
            height,
            velocity: 0.0,
            previous_height: height,
            bounces: 0,
        }
    }

    /// Semi-implicit Euler step with a bounce at height 0.
    pub fn step(&mut self, dt: Seconds) {
        self.previous_height = self.height;
        self.velocity += GRAVITY * dt;
        self.height += self.velocity * dt;
        if self.height < 0.0 {
            self.height = -self.height * RESTITUTION;
            self.velocity = -self.velocity * RESTITUTION;
            self.bounces += 1;
        }
    }

    /// Height blended between the last two steps.
    pub fn interpolated_height(&self, alpha: f64) -> f64 {
        self.previous_height + (self.height - self.previous_height) * alpha
    }
}

pub struct DemoGame {
    pub settings: DemoSettings,
    pub ball: Ball,
    pub pauses: u32,
    pub frames: u64,
    pub last_fps: Option<FramesPerSecond>,
    pub exit_code: Option<i32>,
}

impl DemoGame {
    pub fn new(settings: DemoSettings) -> Self {
        Self {
            settings,
            ball: Ball::dropped_from(10.0),
            pauses: 0,
            frames: 0,
            last_fps: None,
            exit_code: None,
        }
    }
}

impl Game for DemoGame {
    fn init(&mut self, args: &[String]) -> Result<bool> {
        log::debug!("demo starting with args {args:?}");
        Ok(true)
    }

    fn initial_state(&mut self) -> Option<Box<dyn State<Self>>> {
        Some(Box::new(Menu::new()))
    }

    fn frame_end(&mut self, _ctx: &mut FrameContext<'_>) -> Result<()> {
        self.frames += 1;
        if let Some(fps) = self.settings.target_fps {
            std::thread::sleep(Duration::from_secs_f64(1.0 / fps));
        }
        Ok(())
    }

    fn shutdown(&mut self, exit_code: i32) {
        log::info!(
            "demo finished after {} frames: {} bounces, {} pauses",
            self.frames,
            self.ball.bounces,
            self.pauses
        );
        self.exit_code = Some(exit_code);
    }

    fn on_fps_report(&mut self, fps: FramesPerSecond) {
        log::info!("{fps:.1} fps");
        self.last_fps = Some(fps);
    }
}
