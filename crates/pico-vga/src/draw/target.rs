//! embedded-graphics support for the back buffer

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::{RawData, RawU8};
use embedded_graphics::pixelcolor::{PixelColor, Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

use crate::video::BackBuffer;

/// Six-bit color: blue in bits 0-1, green in 2-3, red in 4-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb222(u8);

impl Rgb222 {
    /// Black.
    pub const BLACK: Self = Self(0x00);
    /// White.
    pub const WHITE: Self = Self(0x3f);
    /// Full red.
    pub const RED: Self = Self(0x30);
    /// Full green (also the transparency sentinel when blitting).
    pub const GREEN: Self = Self(0x0c);
    /// Full blue.
    pub const BLUE: Self = Self(0x03);

    /// Color from 2-bit channels; higher bits are dropped.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r & 3) << 4) | ((g & 3) << 2) | (b & 3))
    }

    /// Color from the low six bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x3f)
    }

    /// The six color bits.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl PixelColor for Rgb222 {
    type Raw = RawU8;
}

impl From<RawU8> for Rgb222 {
    fn from(raw: RawU8) -> Self {
        Self::from_bits(raw.into_inner())
    }
}

impl From<Rgb222> for RawU8 {
    fn from(color: Rgb222) -> Self {
        RawU8::new(color.0)
    }
}

impl From<Rgb888> for Rgb222 {
    fn from(color: Rgb888) -> Self {
        Self::new(color.r() >> 6, color.g() >> 6, color.b() >> 6)
    }
}

impl DrawTarget for BackBuffer<'_> {
    type Color = Rgb222;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sync_bits = self.sync_bits();
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            self.set_pixel(x, y, sync_bits | color.bits());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.bits());
        Ok(())
    }
}

impl OriginDimensions for BackBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(
            u32::try_from(self.width()).unwrap_or(u32::MAX),
            u32::try_from(self.height()).unwrap_or(u32::MAX),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::Screen;
    use embedded_graphics::prelude::{Point, Primitive};
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_graphics::Drawable;

    const SCREEN: Screen = Screen {
        width: 8,
        height: 4,
        sync_bits: 0xc0,
    };

    #[test]
    fn channels_pack_into_six_bits() {
        assert_eq!(Rgb222::new(3, 0, 0), Rgb222::RED);
        assert_eq!(Rgb222::new(0, 3, 0), Rgb222::GREEN);
        assert_eq!(Rgb222::new(0, 0, 3), Rgb222::BLUE);
        assert_eq!(Rgb222::from(Rgb888::WHITE), Rgb222::WHITE);
        assert_eq!(Rgb222::from(Rgb888::new(0x80, 0x40, 0x3f)), Rgb222::new(2, 1, 0));
    }

    #[test]
    fn raw_conversion_drops_sync_bits() {
        assert_eq!(Rgb222::from(RawU8::new(0xd5)), Rgb222::from_bits(0x15));
        assert_eq!(RawU8::from(Rgb222::RED).into_inner(), 0x30);
    }

    #[test]
    fn rectangle_fill_stays_inside_and_keeps_sync_bits() {
        let mut words = [0u32; 8];
        let mut buffer = BackBuffer::new(&mut words, SCREEN);
        Rectangle::new(Point::new(6, 2), Size::new(5, 5))
            .into_styled(PrimitiveStyle::with_fill(Rgb222::BLUE))
            .draw(&mut buffer)
            .unwrap();

        assert_eq!(buffer.pixel(6, 2), Some(0xc3));
        assert_eq!(buffer.pixel(7, 3), Some(0xc3));
        assert_eq!(buffer.pixel(5, 2), Some(0x00));
        assert_eq!(buffer.size(), Size::new(8, 4));
    }

    #[test]
    fn clear_fills_with_sync_bits() {
        let mut words = [0u32; 8];
        let mut buffer = BackBuffer::new(&mut words, SCREEN);
        DrawTarget::clear(&mut buffer, Rgb222::WHITE).unwrap();
        assert!(buffer.words().iter().all(|&w| w == 0xffff_ffff));
    }
}
