use alloc::collections::VecDeque;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use rand::rngs::SmallRng;
use rand::Rng;

use super::{clear_playfield, fill_rect, Game, Outcome};
use crate::config::GameTimings;
use crate::input::{Button, InputFrame};
use crate::mode::Mode;
use crate::ui::palette;

const CELL: i32 = 4;
const MIN_X: i32 = 0;
const MAX_X: i32 = 124;
const MIN_Y: i32 = 16;
const MAX_Y: i32 = 156;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Right,
    Down,
    Left,
    Up,
}

impl Heading {
    fn delta(self) -> (i32, i32) {
        match self {
            Heading::Right => (CELL, 0),
            Heading::Down => (0, CELL),
            Heading::Left => (-CELL, 0),
            Heading::Up => (0, -CELL),
        }
    }

    fn opposite(self) -> Heading {
        match self {
            Heading::Right => Heading::Left,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Up => Heading::Down,
        }
    }
}

pub struct Snake {
    /// Head first.
    body: VecDeque<(i32, i32)>,
    heading: Heading,
    /// Last steer since the previous step; applied on the next step.
    queued: Heading,
    food: (i32, i32),
    score: u32,
}

impl Snake {
    pub fn head(&self) -> (i32, i32) {
        self.body.front().copied().unwrap_or((0, 0))
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    fn place_food(&mut self, rng: &mut SmallRng) {
        self.food = (rng.gen_range(8..120), rng.gen_range(16..144));
    }

    fn eats(&self, (x, y): (i32, i32)) -> bool {
        (x - self.food.0).abs() < CELL && (y - self.food.1).abs() < CELL
    }
}

impl Game for Snake {
    const TITLE: &'static str = "SNAKE";
    const MODE: Mode = Mode::Snake;

    fn new(rng: &mut SmallRng) -> Self {
        let mut snake = Self {
            body: [(64, 80), (60, 80), (56, 80)].into_iter().collect(),
            heading: Heading::Right,
            queued: Heading::Right,
            food: (0, 0),
            score: 0,
        };
        snake.place_food(rng);
        snake
    }

    fn step_ms(timings: &GameTimings) -> u64 {
        timings.snake_step_ms
    }

    fn back_exits() -> bool {
        false
    }

    fn handle_input(&mut self, input: &InputFrame, _rng: &mut SmallRng) -> Option<Outcome> {
        let steer = [
            (Button::Up, Heading::Up),
            (Button::Down, Heading::Down),
            (Button::Select, Heading::Right),
            (Button::Back, Heading::Left),
        ];
        for (button, heading) in steer {
            if input.pressed(button) && heading != self.heading.opposite() {
                self.queued = heading;
            }
        }
        None
    }

    fn step(&mut self, rng: &mut SmallRng) -> Option<Outcome> {
        self.heading = self.queued;
        let (dx, dy) = self.heading.delta();
        let (x, y) = self.head();
        let next = (x + dx, y + dy);

        if next.0 < MIN_X || next.0 > MAX_X || next.1 < MIN_Y || next.1 > MAX_Y {
            return Some(Outcome::GameOver);
        }
        let grows = self.eats(next);
        // The tail cell frees up this step unless the snake grows.
        let solid = if grows {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        if self.body.iter().take(solid).any(|cell| *cell == next) {
            return Some(Outcome::GameOver);
        }

        self.body.push_front(next);
        if grows {
            self.score += 1;
            self.place_food(rng);
        } else {
            self.body.pop_back();
        }
        None
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        clear_playfield(display)?;
        fill_rect(display, self.food.0, self.food.1, 4, 4, palette::ERROR)?;
        for (i, (x, y)) in self.body.iter().enumerate() {
            let color = if i == 0 {
                palette::WARNING
            } else {
                palette::SUCCESS
            };
            fill_rect(display, *x, *y, 4, 4, color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonLevels, InputTracker};
    use rand::SeedableRng;

    fn snake() -> (Snake, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut snake = Snake::new(&mut rng);
        // Park the food out of the way.
        snake.food = (8, 144);
        (snake, rng)
    }

    fn press(snake: &mut Snake, rng: &mut SmallRng, button: Button) {
        let mut tracker = InputTracker::new(1000);
        let frame = tracker.sample(ButtonLevels::NONE.with(button), 0);
        snake.handle_input(&frame, rng);
    }

    #[test]
    fn moves_one_cell_per_step() {
        let (mut snake, mut rng) = snake();
        assert_eq!(snake.step(&mut rng), None);
        assert_eq!(snake.head(), (68, 80));
        assert_eq!(snake.length(), 3);
    }

    #[test]
    fn cannot_reverse() {
        let (mut snake, mut rng) = snake();
        press(&mut snake, &mut rng, Button::Back);
        snake.step(&mut rng);
        assert_eq!(snake.heading(), Heading::Right);

        press(&mut snake, &mut rng, Button::Up);
        snake.step(&mut rng);
        assert_eq!(snake.heading(), Heading::Up);
        assert_eq!(snake.head(), (68, 76));
    }

    #[test]
    fn wall_ends_the_game() {
        let (mut snake, mut rng) = snake();
        let mut outcome = None;
        for _ in 0..20 {
            outcome = snake.step(&mut rng);
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(Outcome::GameOver));
        assert_eq!(snake.head(), (124, 80));
    }

    #[test]
    fn eating_grows_and_scores() {
        let (mut snake, mut rng) = snake();
        snake.food = (69, 81);
        snake.step(&mut rng);
        assert_eq!(snake.length(), 4);
        assert_eq!(snake.score(), 1);
        assert_ne!(snake.food, (69, 81));
    }
}
