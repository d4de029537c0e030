//! Display surface abstraction
//!
//! The appliance draws on a fixed 16x7 grid of RGB pixels. Everything above
//! this trait is hardware-agnostic; a deployment implements [`Matrix`] over
//! its actual pixel driver (Unicorn pack, WS2812 chain, ...) and wires it up
//! in `main`.

/// Grid width in pixels (one column per week of history)
pub const WIDTH: usize = 16;
/// Grid height in pixels (one row per weekday)
pub const HEIGHT: usize = 7;

/// An RGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// An addressable 2D grid of RGB pixels
pub trait Matrix {
    /// Set a single pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb);

    /// Turn off every pixel
    fn clear(&mut self) {
        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                self.set_pixel(x, y, Rgb::BLACK);
            }
        }
    }

    /// Latch the current frame onto the physical surface.
    ///
    /// Drivers that push pixels immediately can leave this as the no-op
    /// default.
    fn flush(&mut self) {}
}
