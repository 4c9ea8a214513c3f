use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use rand::rngs::SmallRng;
use rand::Rng;

use super::{clear_playfield, fill_rect, Game, Outcome};
use crate::config::GameTimings;
use crate::input::{Button, InputFrame};
use crate::mode::Mode;
use crate::ui::palette;

const BIRD_X: i32 = 18;
const BIRD_SIZE: u32 = 6;
const PIPE_W: i32 = 20;
const PIPE_START_X: i32 = 128;
const GAP_HALF: i32 = 15;
const FLAP: i32 = -4;

pub struct Flappy {
    bird_y: i32,
    velocity: i32,
    pipe_x: i32,
    gap_y: i32,
    started: bool,
    score: u32,
}

impl Flappy {
    pub fn started(&self) -> bool {
        self.started
    }

    pub fn bird_y(&self) -> i32 {
        self.bird_y
    }

    fn hits_pipe(&self) -> bool {
        let overlaps = self.pipe_x > -PIPE_W && self.pipe_x < PIPE_W;
        overlaps && (self.bird_y < self.gap_y - GAP_HALF || self.bird_y > self.gap_y + GAP_HALF)
    }
}

impl Game for Flappy {
    const TITLE: &'static str = "FLAPPY";
    const MODE: Mode = Mode::FlappyBird;

    fn new(rng: &mut SmallRng) -> Self {
        Self {
            bird_y: 80,
            velocity: 0,
            pipe_x: PIPE_START_X,
            gap_y: rng.gen_range(40..100),
            started: false,
            score: 0,
        }
    }

    fn step_ms(timings: &GameTimings) -> u64 {
        timings.flappy_step_ms
    }

    fn handle_input(&mut self, input: &InputFrame, _rng: &mut SmallRng) -> Option<Outcome> {
        if input.pressed(Button::Up) {
            self.velocity = FLAP;
            self.started = true;
        }
        None
    }

    fn step(&mut self, rng: &mut SmallRng) -> Option<Outcome> {
        if !self.started {
            return None;
        }
        self.velocity += 1;
        self.bird_y += self.velocity;

        self.pipe_x -= 3;
        if self.pipe_x < -PIPE_W {
            self.pipe_x = PIPE_START_X;
            self.gap_y = rng.gen_range(40..100);
            self.score += 1;
        }

        if self.bird_y < 16 || self.bird_y > 150 || self.hits_pipe() {
            return Some(Outcome::GameOver);
        }
        None
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        clear_playfield(display)?;
        let gap_top = self.gap_y - GAP_HALF;
        let gap_bottom = self.gap_y + GAP_HALF;
        if gap_top > 16 {
            fill_rect(
                display,
                self.pipe_x,
                16,
                PIPE_W as u32,
                (gap_top - 16) as u32,
                palette::SUCCESS,
            )?;
        }
        if gap_bottom < 160 {
            fill_rect(
                display,
                self.pipe_x,
                gap_bottom,
                PIPE_W as u32,
                (160 - gap_bottom) as u32,
                palette::SUCCESS,
            )?;
        }
        fill_rect(display, BIRD_X, self.bird_y, BIRD_SIZE, BIRD_SIZE, palette::WARNING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonLevels, InputTracker};
    use rand::SeedableRng;

    fn flappy() -> (Flappy, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(11);
        (Flappy::new(&mut rng), rng)
    }

    fn flap(flappy: &mut Flappy, rng: &mut SmallRng) {
        let mut tracker = InputTracker::new(1000);
        let frame = tracker.sample(ButtonLevels::NONE.with(Button::Up), 0);
        flappy.handle_input(&frame, rng);
    }

    #[test]
    fn waits_for_first_flap() {
        let (mut flappy, mut rng) = flappy();
        for _ in 0..10 {
            assert_eq!(flappy.step(&mut rng), None);
        }
        assert!(!flappy.started());
        assert_eq!(flappy.bird_y(), 80);
    }

    #[test]
    fn flap_lifts_then_gravity_pulls() {
        let (mut flappy, mut rng) = flappy();
        flap(&mut flappy, &mut rng);
        flappy.step(&mut rng);
        assert_eq!(flappy.bird_y(), 77);
        flappy.step(&mut rng);
        flappy.step(&mut rng);
        flappy.step(&mut rng);
        assert_eq!(flappy.bird_y(), 77 - 2 - 1);
    }

    #[test]
    fn falling_to_the_floor_ends_the_game() {
        let (mut flappy, mut rng) = flappy();
        flap(&mut flappy, &mut rng);
        // Keep the pipe out of the way.
        flappy.gap_y = 80;
        let mut outcome = None;
        for _ in 0..30 {
            outcome = flappy.step(&mut rng);
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(Outcome::GameOver));
        assert!(flappy.bird_y() > 95);
    }

    #[test]
    fn passing_a_pipe_scores() {
        let (mut flappy, mut rng) = flappy();
        flappy.started = true;
        flappy.pipe_x = -19;
        flappy.velocity = -1;
        assert_eq!(flappy.step(&mut rng), None);
        assert_eq!(flappy.pipe_x, PIPE_START_X);
        assert_eq!(flappy.score(), 1);
    }
}
