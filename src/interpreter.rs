//! # interpreter
//!
//! The machine as a CHIP-8 program sees it:
//!  * 4K of RAM, font at 0x050, program loaded at 0x200
//!  * V0-VF                    -- 8bit; VF doubles as carry/borrow/collision
//!  * I                        -- 16bit index, used by draw, bcd and block ops
//!  * PC                       -- starts at 0x200
//!  * return stack             -- 16 deep; running off either end is an error
//!  * delay and sound timers   -- wall clock deadlines, read back in 1/60s
//!  * 64x32 display            -- owned here, snapshotted by whoever renders
//!  * keypad                   -- borrowed; the host keeps it up to date
//!
//! `step` runs exactly one instruction. PC is advanced before the instruction
//! executes so jumps, calls and skips simply overwrite it. Anything that goes
//! wrong comes back as a `MachineError` with the machine left as it was after
//! the fetch, so the caller can log it and carry on.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::display::{Display, Frame, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::MachineError;
use crate::input::Input;
use crate::instruction::{Instruction, Opcode};
use crate::memory::{Chip8Memory, MemoryMap, PROGRAM_ADDR};
use crate::program::Program;
use crate::quirks::{self, Quirks, Variant};
use crate::registers::{Registers, FLAG};
use crate::timer::Timer;

/// how many return addresses fit on the stack
pub const STACK_DEPTH: usize = 16;

pub struct Chip8Interpreter<'a> {
    memory: Chip8Memory,
    regs: Registers,
    stack: Vec<u16>,
    display: Display,
    delay_timer: Timer,
    sound_timer: Timer,
    input: &'a dyn Input,
    quirks: Box<dyn Quirks>,
    rng: StdRng,
    awaiting_key: bool,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(input: &'a dyn Input, variant: Variant) -> Chip8Interpreter<'a> {
        Self::with_rng(input, variant, StdRng::from_entropy())
    }

    /// same as `new`, but cxnn produces a repeatable sequence
    pub fn with_seed(input: &'a dyn Input, variant: Variant, seed: u64) -> Chip8Interpreter<'a> {
        Self::with_rng(input, variant, StdRng::seed_from_u64(seed))
    }

    fn with_rng(input: &'a dyn Input, variant: Variant, rng: StdRng) -> Chip8Interpreter<'a> {
        log::debug!("new {} interpreter", variant);
        Chip8Interpreter {
            memory: Chip8Memory::new(),
            regs: Registers::new(),
            stack: Vec::with_capacity(STACK_DEPTH),
            display: Display::new(),
            delay_timer: Timer::new(),
            sound_timer: Timer::new(),
            input,
            quirks: quirks::for_variant(variant),
            rng,
            awaiting_key: false,
        }
    }

    /// load a chip8 program at 0x200 and point PC at it
    pub fn load_program(&mut self, program: &Program) -> Result<(), MachineError> {
        self.memory.load_program(program.as_bytes())?;
        self.regs.pc = PROGRAM_ADDR;
        log::debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// fetch, advance, decode and execute one instruction
    pub fn step(&mut self) -> Result<(), MachineError> {
        let addr = self.regs.pc;
        let op = Opcode(self.memory.get_word(addr)?);
        self.regs.pc = addr.wrapping_add(2);
        let instr = Instruction::decode(op).ok_or(MachineError::UnimplementedInstruction(op.0))?;
        log::trace!("{:03x}: {} {}", addr, op, instr);
        self.execute(instr)
    }

    fn execute(&mut self, instr: Instruction) -> Result<(), MachineError> {
        use Instruction::*;
        self.awaiting_key = false;
        let regs = &mut self.regs;
        match instr {
            Sys(addr) => log::debug!("ignoring machine code call to {:03x}", addr),
            Cls => self.display.clear(),
            Ret => regs.pc = self.stack.pop().ok_or(MachineError::StackUnderflow)?,
            Jp(addr) => regs.pc = addr,
            Call(addr) => {
                if self.stack.len() >= STACK_DEPTH {
                    return Err(MachineError::StackOverflow(self.stack.len()));
                }
                self.stack.push(regs.pc);
                regs.pc = addr;
            }
            SeByte(x, byte) => {
                if regs.v[x] == byte {
                    regs.skip();
                }
            }
            SneByte(x, byte) => {
                if regs.v[x] != byte {
                    regs.skip();
                }
            }
            SeReg(x, y) => {
                if regs.v[x] == regs.v[y] {
                    regs.skip();
                }
            }
            SneReg(x, y) => {
                if regs.v[x] != regs.v[y] {
                    regs.skip();
                }
            }
            LdByte(x, byte) => regs.v[x] = byte,
            // NB. no carry flag for the immediate add
            AddByte(x, byte) => regs.v[x] = regs.v[x].wrapping_add(byte),
            LdReg(x, y) => regs.v[x] = regs.v[y],
            Logic(op, x, y) => self.quirks.logic(regs, op, x, y),
            AddReg(x, y) => {
                let sum = regs.v[x] as u16 + regs.v[y] as u16;
                regs.set_with_flag(x, sum as u8, sum > 0xFF);
            }
            Sub(x, y) => {
                let (a, b) = (regs.v[x], regs.v[y]);
                regs.set_with_flag(x, a.wrapping_sub(b), a >= b);
            }
            Subn(x, y) => {
                let (a, b) = (regs.v[y], regs.v[x]);
                regs.set_with_flag(x, a.wrapping_sub(b), a >= b);
            }
            Shift(op, x, y) => self.quirks.shift(regs, op, x, y),
            LdI(addr) => regs.i = addr,
            JpOffset(x, addr) => self.quirks.jump_with_offset(regs, x, addr),
            Rnd(x, mask) => regs.v[x] = self.rng.gen::<u8>() & mask,
            Drw(x, y, n) => {
                let sprite = self.memory.get_ro_slice(regs.i, n as usize)?;
                let origin_x = regs.v[x] as usize % DISPLAY_WIDTH;
                let origin_y = regs.v[y] as usize % DISPLAY_HEIGHT;
                let collision = self
                    .display
                    .draw_sprite(origin_x, origin_y, sprite.iter().copied());
                regs.v[FLAG] = collision as u8;
            }
            Skp(x) => {
                if self.input.is_pressed(regs.v[x] & 0xF) {
                    regs.skip();
                }
            }
            Sknp(x) => {
                if !self.input.is_pressed(regs.v[x] & 0xF) {
                    regs.skip();
                }
            }
            LdRegDt(x) => regs.v[x] = self.delay_timer.units(),
            LdKey(x) => match self.input.first_pressed() {
                Some(key) => regs.v[x] = key,
                None => {
                    // go round again next cycle until something is held
                    regs.pc = regs.pc.wrapping_sub(2);
                    self.awaiting_key = true;
                }
            },
            LdDtReg(x) => self.delay_timer.arm_units(regs.v[x]),
            LdSt(x) => self.sound_timer.arm_units(regs.v[x]),
            AddI(x) => {
                // NB. the flag on overflow past 0xfff is an Amiga interpreter
                //     extension some programs rely on
                let sum = regs.i as u32 + regs.v[x] as u32;
                regs.i = regs.i.wrapping_add(regs.v[x] as u16);
                regs.v[FLAG] = (sum > 0xFFF) as u8;
            }
            LdF(x) => regs.i = Chip8Memory::glyph_addr(regs.v[x]),
            LdB(x) => {
                let value = regs.v[x];
                self.memory
                    .write(&[value / 100, value / 10 % 10, value % 10], regs.i)?;
            }
            Block(dir, x) => self
                .quirks
                .block_transfer(regs, &mut self.memory, dir, x)?,
        }
        Ok(())
    }

    pub fn variant(&self) -> Variant {
        self.quirks.variant()
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn program_counter(&self) -> u16 {
        self.regs.pc
    }

    pub fn index(&self) -> u16 {
        self.regs.i
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn memory(&self) -> &Chip8Memory {
        &self.memory
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// copy of the framebuffer for rendering
    pub fn snapshot(&self) -> Frame {
        self.display.snapshot()
    }

    /// the tone should be playing
    pub fn sound_active(&self) -> bool {
        !self.sound_timer.expired()
    }

    pub fn delay_units(&self) -> u8 {
        self.delay_timer.units()
    }

    pub fn sound_units(&self) -> u8 {
        self.sound_timer.units()
    }

    /// the last cycle was an fx0a with nothing held, so it'll run again
    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key
    }
}
