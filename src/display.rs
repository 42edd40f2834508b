//! # display
//!
//! The 64x32 monochrome framebuffer the interpreter draws into. Sprites are
//! XORed on; anything falling off the right or bottom edge is clipped, not
//! wrapped. Renderers only ever get a copy via `snapshot`.

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// a full copy of the pixel grid, row-major
pub type Frame = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

pub struct Display {
    pixels: Frame,
}

impl Display {
    pub fn new() -> Self {
        Display {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.fill(false);
        }
    }

    /// XOR a sprite on at (x, y), one byte per row, MSB leftmost. Returns true
    /// if any lit pixel got turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: impl IntoIterator<Item = u8>) -> bool {
        let mut collision = false;
        for (row, byte) in (y..DISPLAY_HEIGHT).zip(rows) {
            for (bit, column) in (x..DISPLAY_WIDTH).take(8).enumerate() {
                if (byte >> (7 - bit)) & 1 == 0 {
                    continue;
                }
                let px = &mut self.pixels[row][column];
                collision |= *px;
                *px = !*px;
            }
        }
        collision
    }

    pub fn snapshot(&self) -> Frame {
        self.pixels
    }

    /// NB. out of range reads are just dark
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// how many pixels are lit
    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .map(|row| row.iter().filter(|&&px| px).count())
            .sum()
    }
}

impl Default for Display {
    fn default() -> Self {
        Display::new()
    }
}
