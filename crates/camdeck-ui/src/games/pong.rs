use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use rand::rngs::SmallRng;

use super::{clear_playfield, fill_rect, Game, Outcome, Paddle};
use crate::config::GameTimings;
use crate::input::InputFrame;
use crate::mode::Mode;
use crate::ui::palette;

pub struct Pong {
    paddle: Paddle,
    ball: (i32, i32),
    velocity: (i32, i32),
    score: u32,
}

impl Pong {
    pub fn ball(&self) -> (i32, i32) {
        self.ball
    }
}

impl Game for Pong {
    const TITLE: &'static str = "PONG";
    const MODE: Mode = Mode::Pong;

    fn new(_rng: &mut SmallRng) -> Self {
        Self {
            paddle: Paddle::new(),
            ball: (64, 80),
            velocity: (2, 2),
            score: 0,
        }
    }

    fn step_ms(timings: &GameTimings) -> u64 {
        timings.pong_step_ms
    }

    fn handle_input(&mut self, input: &InputFrame, _rng: &mut SmallRng) -> Option<Outcome> {
        self.paddle.steer(input);
        None
    }

    fn step(&mut self, _rng: &mut SmallRng) -> Option<Outcome> {
        let (x, y) = (self.ball.0 + self.velocity.0, self.ball.1 + self.velocity.1);
        self.ball = (x, y);

        if x <= 2 || x >= 124 {
            self.velocity.0 = -self.velocity.0;
        }
        if y <= 16 {
            self.velocity.1 = self.velocity.1.abs();
        }
        if y >= 147 && self.velocity.1 > 0 && self.paddle.covers(x) {
            self.velocity.1 = -self.velocity.1;
            self.score += 1;
        }
        if y > 160 {
            return Some(Outcome::GameOver);
        }
        None
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        clear_playfield(display)?;
        self.paddle.draw(display)?;
        fill_rect(display, self.ball.0, self.ball.1, 4, 4, palette::WARNING)
    }
}
