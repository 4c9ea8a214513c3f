//! Arcade games.
//!
//! Each game is a small fixed-timestep simulation behind the [`Game`]
//! trait. [`GameActivity`] adapts one to the activity lifecycle: it owns
//! the step clock, the score strip, the exit gesture and the result screen.

mod breakout;
mod flappy;
mod memory;
mod pong;
mod snake;

pub use breakout::Breakout;
pub use flappy::Flappy;
pub use memory::Memory;
pub use pong::Pong;
pub use snake::Snake;

use alloc::format;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::GameTimings;
use crate::input::{Button, InputFrame};
use crate::mode::Mode;
use crate::ui::theme::{layout, ui_font_small};
use crate::ui::{palette, Activity, Banner, Context};

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GameOver,
    Win,
}

pub trait Game {
    const TITLE: &'static str;
    const MODE: Mode;

    /// Fresh round.
    fn new(rng: &mut SmallRng) -> Self;

    fn step_ms(timings: &GameTimings) -> u64;

    /// Whether Back leaves the game. Snake steers with it instead.
    fn back_exits() -> bool {
        true
    }

    /// React to this tick's edges. Runs every tick, between steps too.
    fn handle_input(&mut self, input: &InputFrame, rng: &mut SmallRng) -> Option<Outcome>;

    /// Advance one fixed step.
    fn step(&mut self, rng: &mut SmallRng) -> Option<Outcome>;

    fn score(&self) -> u32;

    /// Draw everything below the score strip.
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error>;
}

pub struct GameActivity<G: Game> {
    game: Option<G>,
    rng: SmallRng,
    rounds: u64,
    last_step_ms: u64,
    /// Set once the round ends; the result screen is up since `.1`.
    result: Option<(Outcome, u64)>,
}

impl<G: Game> GameActivity<G> {
    pub fn new() -> Self {
        Self {
            game: None,
            rng: SmallRng::seed_from_u64(0),
            rounds: 0,
            last_step_ms: 0,
            result: None,
        }
    }

    pub fn game(&self) -> Option<&G> {
        self.game.as_ref()
    }

    pub fn result(&self) -> Option<Outcome> {
        self.result.map(|(outcome, _)| outcome)
    }

    fn finish<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        ctx: &mut Context<'_, D>,
        outcome: Outcome,
    ) -> Result<(), D::Error> {
        let score = self.game.as_ref().map_or(0, G::score);
        log::info!("{} ended: {:?}, score {}", G::TITLE, outcome, score);
        self.result = Some((outcome, ctx.now_ms));
        let (title, color) = match outcome {
            Outcome::GameOver => ("GAME OVER", palette::ERROR),
            Outcome::Win => ("YOU WIN!", palette::SUCCESS),
        };
        let detail = format!("Score: {}", score);
        Banner::new(title, color).detail(&detail).render(ctx.display)
    }

    fn redraw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let Some(game) = &self.game else {
            return Ok(());
        };
        let width = display.bounding_box().size.width;
        Rectangle::new(
            Point::zero(),
            Size::new(width, layout::PLAYFIELD_TOP as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(palette::BACKGROUND))
        .draw(display)?;
        let style = MonoTextStyle::new(ui_font_small(), palette::TEXT);
        Text::new(G::TITLE, Point::new(2, 10), style).draw(display)?;
        let score = format!("{}", game.score());
        Text::with_alignment(&score, Point::new(width as i32 - 2, 10), style, Alignment::Right)
            .draw(display)?;
        game.draw(display)
    }
}

impl<G: Game> Default for GameActivity<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game, D: DrawTarget<Color = Rgb565>> Activity<D> for GameActivity<G> {
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        self.rounds = self.rounds.wrapping_add(1);
        self.rng = SmallRng::seed_from_u64(ctx.now_ms ^ self.rounds.rotate_left(32));
        self.game = Some(G::new(&mut self.rng));
        self.result = None;
        self.last_step_ms = ctx.now_ms;
        ctx.display.clear(palette::BACKGROUND)?;
        self.redraw(ctx.display)
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        let config = ctx.config;
        let timings = &config.games;
        if let Some((_, since)) = self.result {
            let timed_out = ctx.now_ms.saturating_sub(since) >= timings.game_over_ms;
            if timed_out || ctx.input.any_pressed() {
                ctx.request_transition(G::MODE.parent());
            }
            return Ok(());
        }

        let leave = if G::back_exits() {
            ctx.input.pressed(Button::Back)
        } else {
            ctx.input.any_held_for(timings.exit_hold_ms)
        };
        if leave {
            ctx.request_transition(G::MODE.parent());
            return Ok(());
        }

        let step_ms = G::step_ms(timings);
        let Some(game) = self.game.as_mut() else {
            return Ok(());
        };
        let mut outcome = game.handle_input(ctx.input, &mut self.rng);
        let mut dirty = outcome.is_some();
        if outcome.is_none() && ctx.now_ms.saturating_sub(self.last_step_ms) >= step_ms {
            self.last_step_ms = ctx.now_ms;
            outcome = game.step(&mut self.rng);
            dirty = true;
        }

        match outcome {
            Some(outcome) => self.finish(ctx, outcome),
            None if dirty => self.redraw(ctx.display),
            None => Ok(()),
        }
    }

    fn exit(&mut self, _devices: &mut crate::devices::Devices) {
        self.game = None;
        self.result = None;
    }
}

/// Clear the area below the score strip.
pub(crate) fn clear_playfield<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
) -> Result<(), D::Error> {
    let bounds = display.bounding_box();
    Rectangle::new(
        Point::new(0, layout::PLAYFIELD_TOP),
        Size::new(
            bounds.size.width,
            bounds.size.height.saturating_sub(layout::PLAYFIELD_TOP as u32),
        ),
    )
    .into_styled(PrimitiveStyle::with_fill(palette::BACKGROUND))
    .draw(display)
}

/// Filled square or rectangle in game coordinates.
pub(crate) fn fill_rect<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    color: Rgb565,
) -> Result<(), D::Error> {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}

/// Bottom paddle shared by Pong and Breakout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paddle {
    pub x: i32,
}

impl Paddle {
    pub const WIDTH: i32 = 20;
    pub const Y: i32 = 150;
    const STEP: i32 = 8;

    pub fn new() -> Self {
        Self { x: 56 }
    }

    /// Up moves left, Down moves right, while held.
    pub fn steer(&mut self, input: &InputFrame) {
        if input.is_down(Button::Up) && self.x > 8 {
            self.x -= Self::STEP;
        }
        if input.is_down(Button::Down) && self.x < 100 {
            self.x += Self::STEP;
        }
    }

    pub fn covers(&self, x: i32) -> bool {
        x >= self.x && x <= self.x + Self::WIDTH
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        fill_rect(display, self.x, Self::Y, Self::WIDTH as u32, 4, palette::TEXT)
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonLevels;
    use crate::mock::ActivityRig;

    #[test]
    fn back_leaves_for_game_menu() {
        let mut rig = ActivityRig::new();
        let mut pong = GameActivity::<Pong>::new();
        rig.enter(&mut pong);
        assert_eq!(rig.press(&mut pong, Button::Back), Some(Mode::GameMenu));
    }

    #[test]
    fn snake_leaves_only_on_long_hold() {
        let mut rig = ActivityRig::new();
        let mut snake = GameActivity::<Snake>::new();
        rig.enter(&mut snake);
        assert_eq!(rig.press(&mut snake, Button::Back), None);

        let hold = ButtonLevels::NONE.with(Button::Down);
        let mut left = None;
        for _ in 0..50 {
            left = rig.step(&mut snake, hold);
            if left.is_some() {
                break;
            }
        }
        // Steering down from the start does not hit a wall within 2 s.
        assert_eq!(left, Some(Mode::GameMenu));
        assert!(rig.now_ms >= 2000);
    }

    #[test]
    fn result_screen_returns_after_timeout() {
        let mut rig = ActivityRig::new();
        let mut pong = GameActivity::<Pong>::new();
        rig.enter(&mut pong);
        let mut guard = 0;
        while pong.result().is_none() {
            rig.idle(&mut pong);
            guard += 1;
            assert!(guard < 10_000, "pong never ended");
        }
        assert_eq!(pong.result(), Some(Outcome::GameOver));
        assert_eq!(rig.idle_for(&mut pong, 2900), None);
        assert_eq!(rig.idle_for(&mut pong, 200), Some(Mode::GameMenu));
    }

    #[test]
    fn result_screen_returns_on_any_button() {
        let mut rig = ActivityRig::new();
        let mut memory = GameActivity::<Memory>::new();
        rig.enter(&mut memory);
        while !memory.game().is_some_and(Memory::awaiting_input) {
            rig.idle(&mut memory);
        }
        let first = memory.game().map_or(0, |game| game.sequence()[0]);
        rig.press(&mut memory, Memory::button_for((first + 1) % 3));
        assert_eq!(memory.result(), Some(Outcome::GameOver));
        assert_eq!(rig.press(&mut memory, Button::Select), Some(Mode::GameMenu));
    }
}
