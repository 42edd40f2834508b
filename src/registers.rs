use crate::memory::PROGRAM_ADDR;

pub const REG_COUNT: usize = 16;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG: usize = 0xF;

/// the programmer-visible registers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    /// V0-VF
    pub v: [u8; REG_COUNT],
    /// I
    pub i: u16,
    pub pc: u16,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; REG_COUNT],
            i: 0,
            pc: PROGRAM_ADDR,
        }
    }

    /// store a result, then the flag; when x is VF the flag wins
    pub fn set_with_flag(&mut self, x: usize, value: u8, flag: bool) {
        self.v[x] = value;
        self.v[FLAG] = flag as u8;
    }

    /// step over the next instruction
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Registers::new()
    }
}
