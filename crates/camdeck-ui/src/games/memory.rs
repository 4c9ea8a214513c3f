use alloc::vec::Vec;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use rand::rngs::SmallRng;
use rand::Rng;

use super::{clear_playfield, Game, Outcome};
use crate::config::GameTimings;
use crate::input::{Button, InputFrame};
use crate::mode::Mode;
use crate::ui::palette;

const WIN_LENGTH: usize = 20;
const PAD_SIZE: u32 = 30;

/// Pads in button order: Up, Down, Select.
const PADS: [(Button, Point, Rgb565); 3] = [
    (Button::Up, Point::new(20, 50), palette::ERROR),
    (Button::Down, Point::new(78, 50), palette::SUCCESS),
    (Button::Select, Point::new(49, 100), palette::HIGHLIGHT),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Playing back the sequence; `lit` alternates with a dark gap.
    Showing { index: usize, lit: bool },
    /// Waiting for the player to repeat up to `pos`.
    Repeating { pos: usize },
}

pub struct Memory {
    sequence: Vec<u8>,
    phase: Phase,
    /// Pad the player pressed last, drawn lit until the next step.
    echo: Option<u8>,
    score: u32,
}

impl Memory {
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn awaiting_input(&self) -> bool {
        matches!(self.phase, Phase::Repeating { .. })
    }

    /// Button that enters `pad`.
    pub fn button_for(pad: u8) -> Button {
        PADS[usize::from(pad) % PADS.len()].0
    }

    fn lit_pad(&self) -> Option<u8> {
        match self.phase {
            Phase::Showing { index, lit: true } => self.sequence.get(index).copied(),
            _ => self.echo,
        }
    }

    fn extend(&mut self, rng: &mut SmallRng) {
        self.sequence.push(rng.gen_range(0..PADS.len() as u8));
        self.phase = Phase::Showing {
            index: 0,
            lit: false,
        };
    }
}

impl Game for Memory {
    const TITLE: &'static str = "MEMORY";
    const MODE: Mode = Mode::Memory;

    fn new(rng: &mut SmallRng) -> Self {
        let mut memory = Self {
            sequence: Vec::with_capacity(WIN_LENGTH),
            phase: Phase::Repeating { pos: 0 },
            echo: None,
            score: 0,
        };
        memory.extend(rng);
        memory
    }

    fn step_ms(timings: &GameTimings) -> u64 {
        timings.memory_flash_ms
    }

    fn handle_input(&mut self, input: &InputFrame, rng: &mut SmallRng) -> Option<Outcome> {
        let Phase::Repeating { pos } = self.phase else {
            return None;
        };
        let pad = PADS
            .iter()
            .position(|(button, _, _)| input.pressed(*button))? as u8;
        self.echo = Some(pad);

        if self.sequence.get(pos) != Some(&pad) {
            return Some(Outcome::GameOver);
        }
        let pos = pos + 1;
        if pos < self.sequence.len() {
            self.phase = Phase::Repeating { pos };
            return None;
        }

        self.score += 1;
        if self.sequence.len() >= WIN_LENGTH {
            return Some(Outcome::Win);
        }
        self.extend(rng);
        None
    }

    fn step(&mut self, _rng: &mut SmallRng) -> Option<Outcome> {
        self.echo = None;
        if let Phase::Showing { index, lit } = self.phase {
            self.phase = match (lit, index + 1 < self.sequence.len()) {
                (false, _) => Phase::Showing { index, lit: true },
                (true, true) => Phase::Showing {
                    index: index + 1,
                    lit: false,
                },
                (true, false) => Phase::Repeating { pos: 0 },
            };
        }
        None
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        clear_playfield(display)?;
        let lit = self.lit_pad();
        for (pad, (_, top_left, color)) in PADS.iter().enumerate() {
            let rect = Rectangle::new(*top_left, Size::new(PAD_SIZE, PAD_SIZE));
            let style = if lit == Some(pad as u8) {
                PrimitiveStyle::with_fill(*color)
            } else {
                PrimitiveStyle::with_stroke(*color, 2)
            };
            rect.into_styled(style).draw(display)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonLevels, InputTracker};
    use rand::SeedableRng;

    fn enter_pad(memory: &mut Memory, rng: &mut SmallRng, pad: u8) -> Option<Outcome> {
        let mut tracker = InputTracker::new(1000);
        let frame = tracker.sample(ButtonLevels::NONE.with(Memory::button_for(pad)), 0);
        memory.handle_input(&frame, rng)
    }

    fn play_back(memory: &mut Memory, rng: &mut SmallRng) {
        let mut guard = 0;
        while !memory.awaiting_input() {
            memory.step(rng);
            guard += 1;
            assert!(guard < 100);
        }
    }

    #[test]
    fn sequence_is_shown_one_pad_per_two_steps() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut memory = Memory::new(&mut rng);
        assert_eq!(memory.sequence().len(), 1);
        memory.step(&mut rng);
        assert_eq!(memory.lit_pad(), Some(memory.sequence()[0]));
        memory.step(&mut rng);
        assert!(memory.awaiting_input());
    }

    #[test]
    fn sequence_only_uses_enterable_pads() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut memory = Memory::new(&mut rng);
        for _ in 0..200 {
            memory.extend(&mut rng);
        }
        assert!(memory.sequence().iter().all(|pad| usize::from(*pad) < PADS.len()));
    }

    #[test]
    fn correct_round_extends_the_sequence() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut memory = Memory::new(&mut rng);
        play_back(&mut memory, &mut rng);
        let pad = memory.sequence()[0];
        assert_eq!(enter_pad(&mut memory, &mut rng, pad), None);
        assert_eq!(memory.sequence().len(), 2);
        assert_eq!(memory.score(), 1);
        assert!(!memory.awaiting_input());
    }

    #[test]
    fn wrong_pad_ends_the_game() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut memory = Memory::new(&mut rng);
        play_back(&mut memory, &mut rng);
        let wrong = (memory.sequence()[0] + 1) % 3;
        assert_eq!(
            enter_pad(&mut memory, &mut rng, wrong),
            Some(Outcome::GameOver)
        );
    }

    #[test]
    fn completing_twenty_wins() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut memory = Memory::new(&mut rng);
        let mut outcome = None;
        while outcome.is_none() {
            play_back(&mut memory, &mut rng);
            let sequence = memory.sequence().to_vec();
            for pad in sequence {
                outcome = enter_pad(&mut memory, &mut rng, pad);
            }
        }
        assert_eq!(outcome, Some(Outcome::Win));
        assert_eq!(memory.sequence().len(), 20);
        assert_eq!(memory.score(), 20);
    }
}
