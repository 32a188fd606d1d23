//! Walking characters with speech bubbles

#![allow(clippy::arithmetic_side_effects)] // screen-sized i32 coordinates and frame timers

use super::assets::{self, CHARACTER_HEIGHT, CHARACTER_WIDTH, MIRROR_FRAME_START, STAND_FRAME};
use super::random::Random;
use crate::draw::SpriteSheet;
use crate::text::{Alignment, TextRenderer};
use crate::video::BackBuffer;

/// Characters on screen.
pub const CHARACTER_COUNT: usize = 8;

/// Sheet frames of one walk cycle.
pub const WALK_CYCLE: [usize; 18] = [5, 6, 7, 8, 9, 8, 7, 6, 5, 0, 1, 2, 3, 4, 3, 2, 1, 0];

/// Animation ticks per walk cycle step.
pub const WALK_FRAME_DELAY: i32 = 4;

/// What the characters shout.
pub const MESSAGES: [&str; 5] = [
    "I'll get you!",
    "Come back here!",
    "Ayeeeee!",
    "You can't escape!",
    "Take this!",
];

/// Ticks before a message timer runs out at which the message appears.
const MESSAGE_SHOW_AT: i32 = 180;

const WHITE: u8 = 0x3f;
const BLACK: u8 = 0x00;

/// One walking character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal speed.
    pub dx: i32,
    /// Vertical speed.
    pub dy: i32,
    /// Animation tick within the walk cycle.
    pub frame: i32,
    /// Sheet frame to draw.
    pub sprite: usize,
    /// Message being shown.
    pub message: Option<usize>,
    /// Ticks until the message state changes.
    pub message_frame: i32,
}

impl Character {
    fn walk_sprite(frame: i32, dx: i32) -> usize {
        let step = usize::try_from(frame / WALK_FRAME_DELAY).unwrap_or(0);
        let pose = WALK_CYCLE.get(step).copied().unwrap_or(STAND_FRAME);
        if dx < 0 {
            pose + MIRROR_FRAME_START
        } else {
            pose
        }
    }
}

/// The demo scene: a background and [`CHARACTER_COUNT`] characters.
pub struct Scene<R: Random> {
    characters: [Character; CHARACTER_COUNT],
    sheet: SpriteSheet<'static>,
    rng: R,
    width: i32,
    height: i32,
}

impl<R: Random> Scene<R> {
    /// Scatter the characters over a `width` x `height` screen.
    pub fn new(mut rng: R, width: i32, height: i32) -> Self {
        let mut characters = [Character {
            x: 0,
            y: 0,
            dx: 0,
            dy: 0,
            frame: 0,
            sprite: STAND_FRAME,
            message: None,
            message_frame: 0,
        }; CHARACTER_COUNT];

        for (i, ch) in (0i32..).zip(characters.iter_mut()) {
            ch.x = below(&mut rng, width - CHARACTER_WIDTH);
            ch.y = below(&mut rng, height - CHARACTER_HEIGHT);
            ch.dx = (1 + below(&mut rng, 3)) * sign(&mut rng);
            ch.dy = (1 + below(&mut rng, 2)) * sign(&mut rng);
            ch.frame = i * (WALK_FRAME_DELAY + 1);
            ch.sprite = Character::walk_sprite(ch.frame, ch.dx);
            ch.message_frame = 120 + 300 * i + below(&mut rng, 1200);
        }

        Self {
            characters,
            sheet: assets::character_sheet(),
            rng,
            width,
            height,
        }
    }

    /// The characters.
    pub fn characters(&self) -> &[Character; CHARACTER_COUNT] {
        &self.characters
    }

    /// Advance every character by one tick.
    pub fn step(&mut self) {
        for ch in &mut self.characters {
            ch.x += ch.dx;
            if ch.x < -CHARACTER_WIDTH / 2 {
                ch.dx = 1 + below(&mut self.rng, 3);
            }
            if ch.x >= self.width - CHARACTER_WIDTH / 2 {
                ch.dx = -(1 + below(&mut self.rng, 3));
            }

            ch.y += ch.dy;
            if ch.y < -CHARACTER_HEIGHT / 2 {
                ch.dy = 1 + below(&mut self.rng, 2);
            }
            if ch.y >= self.height - CHARACTER_HEIGHT / 2 {
                ch.dy = -(1 + below(&mut self.rng, 2));
            }

            let remaining = ch.message_frame;
            ch.message_frame -= 1;
            if remaining < 0 {
                ch.message = None;
                ch.message_frame = 600 + below(&mut self.rng, 1200);
            } else if ch.message_frame == MESSAGE_SHOW_AT {
                ch.message = usize::try_from(below(&mut self.rng, 5)).ok();
            }

            ch.frame += 1;
            if ch.frame / WALK_FRAME_DELAY >= WALK_CYCLE.len() as i32 {
                ch.frame = 0;
            }
            ch.sprite = Character::walk_sprite(ch.frame, ch.dx);
        }
    }

    /// Draw the scene and the frame rate into `target`.
    ///
    /// Only the first character with a message gets a speech bubble; the
    /// others drop theirs.
    pub fn render(&mut self, target: &mut BackBuffer<'_>, text: &mut TextRenderer<'_>, fps: u32) {
        target.draw_sprite(&assets::background_sprite(), 0, 0, false);

        let mut has_message = false;
        for ch in &mut self.characters {
            if let Some(sprite) = self.sheet.frame(ch.sprite) {
                target.draw_sprite(&sprite, ch.x, ch.y, true);
            }
            let Some(message) = ch.message else {
                continue;
            };
            if has_message {
                ch.message = None;
                continue;
            }
            if let Some(line) = MESSAGES.get(message) {
                text.align(Alignment::Center);
                let (x, y) = (ch.x + CHARACTER_WIDTH / 2, ch.y - 10);
                text.draw_outlined(target, x, y, WHITE, BLACK, line);
                has_message = true;
            }
        }

        text.align(Alignment::Left);
        text.move_to(10, 10);
        text.set_color(WHITE);
        text.print(target, format_args!("{fps} fps"));
    }
}

/// Random value in `0..bound`, 0 for an empty range.
fn below<R: Random>(rng: &mut R, bound: i32) -> i32 {
    match u32::try_from(bound) {
        Ok(bound) if bound > 0 => i32::try_from(rng.next_u32() % bound).unwrap_or(0),
        _ => 0,
    }
}

fn sign<R: Random>(rng: &mut R) -> i32 {
    if rng.next_u32() & 1 == 1 {
        -1
    } else {
        1
    }
}
