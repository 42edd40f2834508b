use crate::error::MachineError;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// get a r/w slice of the underlying memory, if it's all in range
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], MachineError>;

    /// get a r/o slice of the underlying memory, if it's all in range
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], MachineError>;

    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), MachineError> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a two-byte big-endian word (instructions)
    fn get_word(&self, addr: u16) -> Result<u16, MachineError> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(((word[0] as u16) << 8) | (word[1] as u16))
    }

    fn get_byte(&self, addr: u16) -> Result<u8, MachineError> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }
}

/// Defines the CHIP-8 memory map, 4K configuration:
///   0x0000-0x01ff  interpreter (font baked in at 0x0050)
///   0x0200-0x0fff  program
///
/// the stack lives in the interpreter rather than in memory
pub struct Chip8Memory {
    bytes: Box<[u8]>,
}

/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// the biggest program that fits
pub const MAX_PROGRAM_SIZE: usize = RAM_SIZE_BYTES - PROGRAM_ADDR as usize;

/// where the hex digit glyphs live
pub const FONT_ADDR: u16 = 0x050;

/// bytes per font glyph
pub const FONT_GLYPH_BYTES: u16 = 5;

impl MemoryMap for Chip8Memory {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], MachineError> {
        let range = checked_range(addr, len)?;
        Ok(&mut self.bytes[range])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], MachineError> {
        let range = checked_range(addr, len)?;
        Ok(&self.bytes[range])
    }
}

/// NB. reports the first address that falls off the end
fn checked_range(addr: u16, len: usize) -> Result<std::ops::Range<usize>, MachineError> {
    let a = addr as usize;
    if a + len > RAM_SIZE_BYTES {
        let bad = a.max(RAM_SIZE_BYTES);
        return Err(MachineError::AddressOutOfBounds(bad.min(u16::MAX as usize) as u16));
    }
    Ok(a..(a + len))
}

impl Chip8Memory {
    /// zeroed RAM with the font in place
    pub fn new() -> Self {
        let mut bytes = vec![0u8; RAM_SIZE_BYTES].into_boxed_slice();
        let font = FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8Memory { bytes }
    }

    /// copy a program image in at 0x200
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), MachineError> {
        self.write(image, PROGRAM_ADDR)
    }

    /// address of the glyph for a digit
    pub fn glyph_addr(digit: u8) -> u16 {
        FONT_ADDR + FONT_GLYPH_BYTES * digit as u16
    }
}

impl Default for Chip8Memory {
    fn default() -> Self {
        Chip8Memory::new()
    }
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8Memory::new();
        // NB. memory is zeroed from 0x200 because before that we bake in the
        //     font
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
        assert_eq!(m.bytes[..0x50], [0; 0x50]);
    }

    #[test]
    fn test_font_in_place() {
        let m = Chip8Memory::new();
        assert_eq!(m.get_ro_slice(FONT_ADDR, 80).unwrap(), &CHIP8_FONT);
        assert_eq!(Chip8Memory::glyph_addr(0), 0x050);
        assert_eq!(Chip8Memory::glyph_addr(0xF), 0x09b);
        assert_eq!(m.get_byte(Chip8Memory::glyph_addr(1)).unwrap(), 0x20);
    }

    #[test]
    fn test_write_slice_ok() {
        let mut dst = Chip8Memory::new();
        let src: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
        dst.write(src, 8).unwrap();
        assert_eq!(
            dst.bytes[..16],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
    }

    #[test]
    fn test_read_word() {
        let mut m = Chip8Memory::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x300).unwrap();
        assert_eq!(m.get_word(0x304), Ok(0x0405));
    }

    #[test]
    fn test_last_word_readable() {
        let mut m = Chip8Memory::new();
        m.write(&[0xAB, 0xCD], 0xFFE).unwrap();
        assert_eq!(m.get_word(0xFFE), Ok(0xABCD));
        assert_eq!(m.get_word(0xFFF), Err(MachineError::AddressOutOfBounds(0x1000)));
    }

    #[test]
    fn test_write_too_much_rejected_untouched() {
        let mut dst = Chip8Memory::new();
        let res = dst.write(&[0xFF; 8], 4089);
        assert_eq!(res, Err(MachineError::AddressOutOfBounds(0x1000)));
        assert_eq!(dst.bytes[4089..], [0; 7]);
    }

    #[test]
    fn test_read_past_end() {
        let m = Chip8Memory::new();
        assert_eq!(
            m.get_ro_slice(0x2000, 1),
            Err(MachineError::AddressOutOfBounds(0x2000))
        );
    }

    #[test]
    fn test_program_load_ok() {
        let mut dst = Chip8Memory::new();
        let prog: &[u8] = &[0x00, 0xe0]; // clear screen
        dst.load_program(prog).unwrap();
        assert_eq!(dst.get_ro_slice(0x200, 2).unwrap(), &[0x00, 0xe0]);
    }

    #[test]
    fn test_largest_program_fits() {
        let mut dst = Chip8Memory::new();
        dst.load_program(&[0x12; MAX_PROGRAM_SIZE]).unwrap();
        assert_eq!(dst.get_byte(0xFFF), Ok(0x12));
    }
}
