//! Sprite views over packed pixel tables

#![allow(clippy::arithmetic_side_effects)] // row offsets checked against data length

/// Rectangular image of packed pixel words, four pixels per word.
///
/// Each source line starts `stride` words after the previous one, so a
/// sprite can be a window onto a wider sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite<'a> {
    width: i32,
    height: i32,
    stride: usize,
    data: &'a [u32],
}

impl<'a> Sprite<'a> {
    /// View `data` as a `width` x `height` image with `stride` words per line.
    pub const fn new(width: i32, height: i32, stride: usize, data: &'a [u32]) -> Self {
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Width in pixels.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in lines.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Words per source line.
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Packed words.
    pub const fn data(&self) -> &'a [u32] {
        self.data
    }

    /// Complete source lines present in `data`.
    pub fn rows_available(&self) -> usize {
        self.data.len().checked_div(self.stride).unwrap_or(0)
    }

    /// Words of source line `y`, if fully present.
    pub fn row(&self, y: usize) -> Option<&'a [u32]> {
        let start = y.checked_mul(self.stride)?;
        self.data.get(start..start.checked_add(self.stride)?)
    }

    /// Pixel byte at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        let word = self.row(y)?.get(x / 4)?;
        word.to_le_bytes().get(x % 4).copied()
    }
}

/// Equal-sized frames stored one after another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet<'a> {
    width: i32,
    height: i32,
    stride: usize,
    data: &'a [u32],
}

impl<'a> SpriteSheet<'a> {
    /// Sheet of `width` x `height` frames with `stride` words per line.
    pub const fn new(width: i32, height: i32, stride: usize, data: &'a [u32]) -> Self {
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Words taken by one frame.
    pub fn frame_words(&self) -> usize {
        self.stride * usize::try_from(self.height).unwrap_or(0)
    }

    /// Number of complete frames.
    pub fn len(&self) -> usize {
        self.data.len().checked_div(self.frame_words()).unwrap_or(0)
    }

    /// Whether the sheet holds no complete frame.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frame `index`.
    pub fn frame(&self, index: usize) -> Option<Sprite<'a>> {
        let words = self.frame_words();
        let start = index.checked_mul(words)?;
        let data = self.data.get(start..start.checked_add(words)?)?;
        Some(Sprite::new(self.width, self.height, self.stride, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [u32; 4] = [0x0302_0100, 0x0706_0504, 0x0b0a_0908, 0x0f0e_0d0c];

    #[test]
    fn pixels_are_little_endian_within_a_word() {
        let sprite = Sprite::new(8, 2, 2, &DATA);
        assert_eq!(sprite.pixel(0, 0), Some(0x00));
        assert_eq!(sprite.pixel(5, 0), Some(0x05));
        assert_eq!(sprite.pixel(3, 1), Some(0x0b));
        assert_eq!(sprite.pixel(8, 0), None);
    }

    #[test]
    fn stride_wider_than_width() {
        let sprite = Sprite::new(4, 2, 2, &DATA);
        assert_eq!(sprite.row(1), Some(&DATA[2..]));
        assert_eq!(sprite.rows_available(), 2);
    }

    #[test]
    fn zero_stride_has_no_rows() {
        let sprite = Sprite::new(4, 2, 0, &DATA);
        assert_eq!(sprite.rows_available(), 0);
    }

    #[test]
    fn sheet_frames() {
        let sheet = SpriteSheet::new(4, 1, 1, &DATA);
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.frame(2).map(|s| s.data()), Some(&DATA[2..3]));
        assert!(sheet.frame(4).is_none());
    }
}
