//! Procedurally generated demo artwork
//!
//! Both tables are built at compile time into flash. Every byte carries the
//! idle sync bits of the 320x240 mode, so they can be blitted unchanged.
//!
//! The character sheet holds 22 frames of 16x24 pixels:
//!
//! | Frames  | Pose                                    |
//! |---------|-----------------------------------------|
//! | 0-4     | stride from feet together to wide, left |
//! | 5-9     | the same stride with the legs swapped   |
//! | 10      | standing                                |
//! | 11-21   | frames 0-10 mirrored (walking left)     |

#![allow(clippy::arithmetic_side_effects)] // const loops over fixed table sizes
#![allow(clippy::indexing_slicing)] // const fn: indices bounded by the loop limits
#![allow(clippy::manual_range_contains)] // RangeInclusive::contains is not const

use crate::draw::{Sprite, SpriteSheet, TRANSPARENT};

const SYNC: u8 = 0xc0;

/// Background width in pixels.
pub const BACKGROUND_WIDTH: i32 = 320;
/// Background height in lines.
pub const BACKGROUND_HEIGHT: i32 = 240;
const BACKGROUND_STRIDE: usize = 80;

/// Character frame width in pixels.
pub const CHARACTER_WIDTH: i32 = 16;
/// Character frame height in lines.
pub const CHARACTER_HEIGHT: i32 = 24;
/// Frames in the character sheet.
pub const CHARACTER_FRAMES: usize = 22;
/// First mirrored frame.
pub const MIRROR_FRAME_START: usize = 11;
/// The standing pose.
pub const STAND_FRAME: usize = 10;
const CHARACTER_STRIDE: usize = 4;
const FRAME_WORDS: usize = CHARACTER_STRIDE * CHARACTER_HEIGHT as usize;

static BACKGROUND: [u32; BACKGROUND_STRIDE * BACKGROUND_HEIGHT as usize] = background();
static CHARACTERS: [u32; FRAME_WORDS * CHARACTER_FRAMES] = characters();

/// The full-screen backdrop.
pub fn background_sprite() -> Sprite<'static> {
    Sprite::new(BACKGROUND_WIDTH, BACKGROUND_HEIGHT, BACKGROUND_STRIDE, &BACKGROUND)
}

/// The walking character.
pub fn character_sheet() -> SpriteSheet<'static> {
    SpriteSheet::new(CHARACTER_WIDTH, CHARACTER_HEIGHT, CHARACTER_STRIDE, &CHARACTERS)
}

const fn background_color(x: usize, y: usize) -> u8 {
    const HORIZON: usize = 150;
    if y < HORIZON {
        // Sky bands getting lighter toward the horizon, with a sun.
        let dx = if x > 250 { x - 250 } else { 250 - x };
        let dy = if y > 40 { y - 40 } else { 40 - y };
        if dx * dx + dy * dy < 18 * 18 {
            return 0x3c;
        }
        match y * 4 / HORIZON {
            0 => 0x02,
            1 => 0x03,
            2 => 0x07,
            _ => 0x17,
        }
    } else {
        // Ground in two shades of green-brown tiles; pure green is the
        // transparency color, so it is avoided.
        let tile = (x / 20 + (y - HORIZON) / 10) % 2;
        if tile == 0 {
            0x14
        } else {
            0x18
        }
    }
}

const fn background() -> [u32; BACKGROUND_STRIDE * BACKGROUND_HEIGHT as usize] {
    let mut words = [0u32; BACKGROUND_STRIDE * BACKGROUND_HEIGHT as usize];
    let mut y = 0;
    while y < BACKGROUND_HEIGHT as usize {
        let mut w = 0;
        while w < BACKGROUND_STRIDE {
            // One color per word keeps the compile-time evaluation short.
            let byte = SYNC | background_color(w * 4 + 2, y);
            words[y * BACKGROUND_STRIDE + w] = u32::from_le_bytes([byte; 4]);
            w += 1;
        }
        y += 1;
    }
    words
}

const SKIN: u8 = 0x3e;
const HAIR: u8 = 0x24;
const SHIRT: u8 = 0x30;
const JEANS: u8 = 0x02;
const SHOES: u8 = 0x15;
const EYE: u8 = 0x00;

/// Leg spread of an unmirrored frame, negative when the legs are swapped.
const fn stride_of(frame: usize) -> i32 {
    match frame {
        0..=4 => frame as i32 - 2,
        5..=9 => 2 - (frame as i32 - 5),
        _ => 0,
    }
}

/// Color of an unmirrored frame facing right, `None` where transparent.
const fn character_color(frame: usize, x: i32, y: i32) -> Option<u8> {
    let spread = stride_of(frame);
    match y {
        0..=1 if x >= 5 && x <= 10 => Some(HAIR),
        2..=7 if x >= 5 && x <= 10 => {
            if y == 2 && x <= 6 {
                Some(HAIR)
            } else if y == 4 && x == 9 {
                Some(EYE)
            } else {
                Some(SKIN)
            }
        }
        8..=15 => {
            if x >= 5 && x <= 10 {
                Some(SHIRT)
            } else if (x == 4 || x == 11) && y < 14 {
                // Arms swing opposite to the legs.
                let arm_down = if x == 4 { spread <= 0 } else { spread >= 0 };
                if arm_down || y < 12 {
                    Some(SKIN)
                } else {
                    None
                }
            } else {
                None
            }
        }
        16..=23 => {
            let reach = (y - 15) * spread / 8;
            let left = 6 - reach;
            let right = 9 + reach;
            let color = if y == 23 { SHOES } else { JEANS };
            if (x >= left && x <= left + 1) || (x >= right - 1 && x <= right) {
                Some(color)
            } else {
                None
            }
        }
        _ => None,
    }
}

const fn characters() -> [u32; FRAME_WORDS * CHARACTER_FRAMES] {
    let mut words = [0u32; FRAME_WORDS * CHARACTER_FRAMES];
    let mut frame = 0;
    while frame < CHARACTER_FRAMES {
        let mut y = 0;
        while y < CHARACTER_HEIGHT {
            let mut x = 0;
            while x < CHARACTER_WIDTH {
                let color = if frame < MIRROR_FRAME_START {
                    character_color(frame, x, y)
                } else {
                    character_color(frame - MIRROR_FRAME_START, CHARACTER_WIDTH - 1 - x, y)
                };
                let byte = match color {
                    Some(color) => SYNC | color,
                    None => SYNC | TRANSPARENT,
                };
                let index = frame * FRAME_WORDS + y as usize * CHARACTER_STRIDE + x as usize / 4;
                words[index] |= (byte as u32) << (8 * (x as u32 % 4));
                x += 1;
            }
            y += 1;
        }
        frame += 1;
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_pixels(frame: usize) -> Vec<u8> {
        let sprite = character_sheet().frame(frame).unwrap();
        (0..24)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .map(|(x, y)| sprite.pixel(x, y).unwrap())
            .collect()
    }

    #[test]
    fn sheet_shape() {
        let sheet = character_sheet();
        assert_eq!(sheet.len(), CHARACTER_FRAMES);
        let background = background_sprite();
        assert_eq!(background.rows_available(), 240);
    }

    #[test]
    fn every_byte_carries_the_sync_bits() {
        assert!(BACKGROUND.iter().flat_map(|w| w.to_le_bytes()).all(|b| b & 0xc0 == 0xc0));
        assert!(CHARACTERS.iter().flat_map(|w| w.to_le_bytes()).all(|b| b & 0xc0 == 0xc0));
    }

    #[test]
    fn background_is_fully_opaque() {
        assert!(BACKGROUND
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .all(|b| b & 0x3f != TRANSPARENT));
    }

    #[test]
    fn frames_have_a_transparent_surround_and_a_body() {
        for frame in 0..CHARACTER_FRAMES {
            let pixels = frame_pixels(frame);
            assert_eq!(pixels[0] & 0x3f, TRANSPARENT, "frame {frame} corner");
            assert!(pixels.iter().any(|&b| b & 0x3f == SHIRT), "frame {frame} body");
        }
    }

    #[test]
    fn mirrored_frames_flip_horizontally() {
        for frame in 0..MIRROR_FRAME_START {
            let right = frame_pixels(frame);
            let left = frame_pixels(frame + MIRROR_FRAME_START);
            for y in 0..24 {
                for x in 0..16 {
                    assert_eq!(right[y * 16 + x], left[y * 16 + 15 - x]);
                }
            }
        }
    }

    #[test]
    fn walk_frames_differ_from_standing() {
        assert_ne!(frame_pixels(0), frame_pixels(STAND_FRAME));
        assert_eq!(frame_pixels(2), frame_pixels(STAND_FRAME));
    }
}
