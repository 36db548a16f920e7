//! Scripted demo states: menu, gameplay, HUD overlay and pause screen

use crate::game::DemoGame;
use cadence_core::{exit_code, Result, Seconds};
use cadence_runtime::{State, StateContext, TransitionMode};

/// Waits `menu_time`, then hands over to [`Gameplay`].
pub struct Menu {
    waited: Seconds,
}

impl Menu {
    pub fn new() -> Self {
        Self { waited: 0.0 }
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl State<DemoGame> for Menu {
    fn name(&self) -> &str {
        "menu"
    }

    fn init(&mut self, _ctx: &mut StateContext<'_, DemoGame>) -> Result<()> {
        log::info!("menu shown");
        Ok(())
    }

    fn update(&mut self, ctx: &mut StateContext<'_, DemoGame>, dt: Seconds) -> Result<()> {
        self.waited += dt;
        if self.waited >= ctx.game().settings.menu_time {
            ctx.push(Gameplay::new(), TransitionMode::Exclusive);
        }
        Ok(())
    }
}

/// Simulates the ball, layers a pause screen on a timer, quits when done.
pub struct Gameplay {
    elapsed: Seconds,
    since_pause: Seconds,
    done: bool,
}

impl Gameplay {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            since_pause: 0.0,
            done: false,
        }
    }
}

impl Default for Gameplay {
    fn default() -> Self {
        Self::new()
    }
}

impl State<DemoGame> for Gameplay {
    fn name(&self) -> &str {
        "gameplay"
    }

    fn init(&mut self, ctx: &mut StateContext<'_, DemoGame>) -> Result<()> {
        log::info!("gameplay started");
        ctx.push(Hud::new(), TransitionMode::LayeredTransparent);
        Ok(())
    }

    fn update(&mut self, ctx: &mut StateContext<'_, DemoGame>, dt: Seconds) -> Result<()> {
        if self.done {
            return Ok(());
        }
        ctx.game_mut().ball.step(dt);
        self.elapsed += dt;
        self.since_pause += dt;

        let settings = &ctx.game().settings;
        let (play_time, pause_every) = (settings.play_time, settings.pause_every);
        if self.elapsed >= play_time {
            self.done = true;
            ctx.quit(exit_code::SUCCESS);
        } else if self.since_pause >= pause_every {
            self.since_pause = 0.0;
            ctx.push(Pause::new(), TransitionMode::Layered);
        }
        Ok(())
    }

    fn render(&mut self, ctx: &mut StateContext<'_, DemoGame>, alpha: f64) -> Result<()> {
        log::trace!(
            "ball drawn at {:.3} m",
            ctx.game().ball.interpolated_height(alpha)
        );
        Ok(())
    }

    fn unload_resources(&mut self, _ctx: &mut StateContext<'_, DemoGame>) {
        log::info!("gameplay ended after {:.2}s", self.elapsed);
    }
}

/// Transparent overlay reporting the ball once per simulated second.
pub struct Hud {
    until_report: Seconds,
}

impl Hud {
    pub fn new() -> Self {
        Self { until_report: 1.0 }
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl State<DemoGame> for Hud {
    fn name(&self) -> &str {
        "hud"
    }

    fn update(&mut self, ctx: &mut StateContext<'_, DemoGame>, dt: Seconds) -> Result<()> {
        self.until_report -= dt;
        if self.until_report <= 0.0 {
            self.until_report += 1.0;
            let ball = &ctx.game().ball;
            log::info!(
                "hud: height {:.2} m, {} bounces, t = {:.2}s",
                ball.height,
                ball.bounces,
                ctx.timing().simulation_time
            );
        }
        Ok(())
    }

    fn on_pause(&mut self, _ctx: &mut StateContext<'_, DemoGame>) {
        log::debug!("hud hidden");
    }

    fn on_resume(&mut self, _ctx: &mut StateContext<'_, DemoGame>) {
        log::debug!("hud visible");
    }
}

/// Covers everything beneath it for `pause_time`, then pops itself.
pub struct Pause {
    remaining: Seconds,
}

impl Pause {
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }
}

impl Default for Pause {
    fn default() -> Self {
        Self::new()
    }
}

impl State<DemoGame> for Pause {
    fn name(&self) -> &str {
        "pause"
    }

    fn init(&mut self, ctx: &mut StateContext<'_, DemoGame>) -> Result<()> {
        let game = ctx.game_mut();
        game.pauses += 1;
        self.remaining = game.settings.pause_time;
        log::info!("paused");
        Ok(())
    }

    fn update(&mut self, ctx: &mut StateContext<'_, DemoGame>, dt: Seconds) -> Result<()> {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            ctx.pop();
        }
        Ok(())
    }

    fn unload_resources(&mut self, _ctx: &mut StateContext<'_, DemoGame>) {
        log::info!("resumed");
    }
}
