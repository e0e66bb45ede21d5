//! Drawing surface of the pixel matrix.

/// Color of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const MAGENTA: Self = Self::new(255, 0, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Dim the color, `amount` of 1.0 keeps it intact, 0.0 turns it black.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub fn scaled(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let scale = |x: u8| (f32::from(x) * amount) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Display with a fixed dimension, addressed from the top-left corner.
///
/// Implementors must silently ignore pixels outside of the display.
/// Nothing needs to be visible until `present` is called.
pub trait Canvas {
    fn width(&self) -> u16;

    fn height(&self) -> u16;

    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    fn set_brightness(&mut self, brightness: u8);

    fn present(&mut self);

    /// Bresenham's line, both ends included.
    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Color) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let step_x = if x < to.0 { 1 } else { -1 };
        let step_y = if y < to.1 { 1 } else { -1 };
        let mut error = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        for row in y..y + height {
            for column in x..x + width {
                self.set_pixel(column, row, color);
            }
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (right, bottom) = (x + width - 1, y + height - 1);
        self.draw_line((x, y), (right, y), color);
        self.draw_line((x, bottom), (right, bottom), color);
        self.draw_line((x, y), (x, bottom), color);
        self.draw_line((right, y), (right, bottom), color);
    }

    fn clear(&mut self) {
        let (width, height) = (i32::from(self.width()), i32::from(self.height()));
        self.fill_rect(0, 0, width, height, Color::BLACK);
    }
}

/// Canvas kept in memory.
///
/// It may serve as a back buffer to be flushed to the LEDs, or to inspect
/// rendered frames in simulation.
#[derive(Debug, Clone)]
pub struct FrameBuffer<const W: usize, const H: usize> {
    pixels: [[Color; W]; H],
    brightness: u8,
    presented: u32,
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self {
            pixels: [[Color::BLACK; W]; H],
            brightness: u8::MAX,
            presented: 0,
        }
    }
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    #[must_use]
    pub fn rows(&self) -> &[[Color; W]; H] {
        &self.pixels
    }

    /// Number of pixels that are not black.
    #[must_use]
    pub fn lit(&self) -> usize {
        self.pixels
            .iter()
            .flatten()
            .filter(|c| **c != Color::BLACK)
            .count()
    }

    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// How many frames were presented so far.
    #[must_use]
    pub fn presented(&self) -> u32 {
        self.presented
    }
}

impl<const W: usize, const H: usize> Canvas for FrameBuffer<W, H> {
    #[allow(clippy::cast_possible_truncation)]
    fn width(&self) -> u16 {
        W as u16
    }

    #[allow(clippy::cast_possible_truncation)]
    fn height(&self) -> u16 {
        H as u16
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(pixel) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *pixel = color;
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn present(&mut self) {
        self.presented = self.presented.wrapping_add(1);
    }
}
