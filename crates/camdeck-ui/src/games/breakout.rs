use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use rand::rngs::SmallRng;

use super::{clear_playfield, fill_rect, Game, Outcome, Paddle};
use crate::config::GameTimings;
use crate::input::InputFrame;
use crate::mode::Mode;
use crate::ui::palette;

const COLS: usize = 8;
const ROWS: usize = 6;
const BRICK_W: i32 = 16;
const BRICK_H: i32 = 8;
const BRICKS_TOP: i32 = 20;

pub struct Breakout {
    bricks: [[bool; COLS]; ROWS],
    paddle: Paddle,
    ball: (i32, i32),
    velocity: (i32, i32),
    score: u32,
}

impl Breakout {
    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().flatten().filter(|alive| **alive).count()
    }

    /// Brick under `(x, y)`, if the point is inside the wall.
    fn brick_at(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < BRICKS_TOP {
            return None;
        }
        let col = (x / BRICK_W) as usize;
        let row = ((y - BRICKS_TOP) / BRICK_H) as usize;
        (col < COLS && row < ROWS).then_some((row, col))
    }

    fn row_color(row: usize) -> Rgb565 {
        match row {
            0 | 1 => palette::ERROR,
            2 | 3 => palette::WARNING,
            _ => palette::SUCCESS,
        }
    }
}

impl Game for Breakout {
    const TITLE: &'static str = "BREAKOUT";
    const MODE: Mode = Mode::Breakout;

    fn new(_rng: &mut SmallRng) -> Self {
        Self {
            bricks: [[true; COLS]; ROWS],
            paddle: Paddle::new(),
            ball: (64, 100),
            velocity: (2, -2),
            score: 0,
        }
    }

    fn step_ms(timings: &GameTimings) -> u64 {
        timings.breakout_step_ms
    }

    fn handle_input(&mut self, input: &InputFrame, _rng: &mut SmallRng) -> Option<Outcome> {
        self.paddle.steer(input);
        None
    }

    fn step(&mut self, _rng: &mut SmallRng) -> Option<Outcome> {
        let (x, y) = (self.ball.0 + self.velocity.0, self.ball.1 + self.velocity.1);
        self.ball = (x, y);

        if x <= 0 || x >= 123 {
            self.velocity.0 = -self.velocity.0;
        }
        if y <= 16 {
            self.velocity.1 = self.velocity.1.abs();
        }
        if y >= 145 && self.velocity.1 > 0 && self.paddle.covers(x) {
            self.velocity.1 = -self.velocity.1;
        }
        if let Some((row, col)) = Self::brick_at(x, y) {
            if self.bricks[row][col] {
                self.bricks[row][col] = false;
                self.velocity.1 = -self.velocity.1;
                self.score += 10;
                if self.bricks_left() == 0 {
                    return Some(Outcome::Win);
                }
            }
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
        for (row, bricks) in self.bricks.iter().enumerate() {
            for (col, alive) in bricks.iter().enumerate() {
                if *alive {
                    fill_rect(
                        display,
                        col as i32 * BRICK_W,
                        BRICKS_TOP + row as i32 * BRICK_H,
                        14,
                        6,
                        Self::row_color(row),
                    )?;
                }
            }
        }
        self.paddle.draw(display)?;
        fill_rect(display, self.ball.0, self.ball.1, 3, 3, palette::TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn breakout() -> (Breakout, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(3);
        (Breakout::new(&mut rng), rng)
    }

    #[test]
    fn starts_with_full_wall() {
        let (breakout, _) = breakout();
        assert_eq!(breakout.bricks_left(), 48);
    }

    #[test]
    fn hitting_a_brick_removes_it_and_bounces() {
        let (mut breakout, mut rng) = breakout();
        breakout.ball = (34, 68);
        breakout.step(&mut rng);
        assert_eq!(breakout.ball, (36, 66));
        assert_eq!(breakout.bricks_left(), 47);
        assert!(!breakout.bricks[5][2]);
        assert_eq!(breakout.score(), 10);
        assert!(breakout.velocity.1 > 0);
    }

    #[test]
    fn last_brick_wins() {
        let (mut breakout, mut rng) = breakout();
        breakout.bricks = [[false; COLS]; ROWS];
        breakout.bricks[0][0] = true;
        breakout.ball = (6, 24);
        assert_eq!(breakout.step(&mut rng), Some(Outcome::Win));
    }

    #[test]
    fn brick_lookup_ignores_points_outside_the_wall() {
        assert_eq!(Breakout::brick_at(10, 10), None);
        assert_eq!(Breakout::brick_at(10, 70), None);
        assert_eq!(Breakout::brick_at(127, 20), Some((0, 7)));
    }
}
