//! # quirks
//!
//! The COSMAC VIP interpreter and the later SUPER-CHIP disagree about a
//! handful of instructions, and programs are written against one or the
//! other. Everything that differs lives behind `Quirks`; the interpreter
//! never checks which variant it is running.
//!
//! | op              | Legacy (VIP)            | Extended (SUPER-CHIP)  |
//! |-----------------|-------------------------|------------------------|
//! | 8xy6 / 8xye     | shifts VY into VX       | shifts VX in place     |
//! | bnnn            | jumps to nnn + V0       | jumps to nnn + VX      |
//! | fx55 / fx65     | I ends up at I + x + 1  | I is left alone        |
//! | 8xy1 / 2 / 3    | VF untouched            | VF cleared             |
use std::fmt;

use crate::error::MachineError;
use crate::instruction::{LogicOp, ShiftOp, Transfer};
use crate::memory::MemoryMap;
use crate::registers::Registers;

/// which flavour of the architecture to emulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// original COSMAC VIP behaviour
    #[default]
    Legacy,
    /// SUPER-CHIP behaviour
    Extended,
}

impl Variant {
    /// look up a variant by name; anything unrecognised is Legacy
    pub fn from_name(name: &str) -> Variant {
        match name.trim().to_ascii_lowercase().as_str() {
            "legacy" | "chip8" | "chip-8" | "vip" => Variant::Legacy,
            "extended" | "schip" | "superchip" | "super-chip" => Variant::Extended,
            other => {
                log::warn!("unknown variant {:?}; falling back to legacy", other);
                Variant::Legacy
            }
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Legacy => write!(f, "legacy"),
            Variant::Extended => write!(f, "extended"),
        }
    }
}

/// the instructions whose behaviour depends on the variant
pub trait Quirks {
    fn variant(&self) -> Variant;

    /// 8xy6 / 8xye
    fn shift(&self, regs: &mut Registers, op: ShiftOp, x: usize, y: usize);

    /// 8xy1 / 8xy2 / 8xy3
    fn logic(&self, regs: &mut Registers, op: LogicOp, x: usize, y: usize);

    /// bnnn; x is the instruction's own x field
    fn jump_with_offset(&self, regs: &mut Registers, x: usize, addr: u16);

    /// fx55 / fx65, registers V0 to VX inclusive. Nothing is touched if the
    /// range runs off the end of memory.
    fn block_transfer(
        &self,
        regs: &mut Registers,
        memory: &mut dyn MemoryMap,
        dir: Transfer,
        x: usize,
    ) -> Result<(), MachineError>;
}

/// pick the behaviour set for a variant
pub fn for_variant(variant: Variant) -> Box<dyn Quirks> {
    match variant {
        Variant::Legacy => Box::new(Legacy),
        Variant::Extended => Box::new(Extended),
    }
}

/// COSMAC VIP
pub struct Legacy;

/// SUPER-CHIP
pub struct Extended;

impl Quirks for Legacy {
    fn variant(&self) -> Variant {
        Variant::Legacy
    }

    fn shift(&self, regs: &mut Registers, op: ShiftOp, x: usize, y: usize) {
        let (value, out) = shifted(op, regs.v[y]);
        regs.set_with_flag(x, value, out);
    }

    fn logic(&self, regs: &mut Registers, op: LogicOp, x: usize, y: usize) {
        regs.v[x] = combine(op, regs.v[x], regs.v[y]);
    }

    fn jump_with_offset(&self, regs: &mut Registers, _x: usize, addr: u16) {
        regs.pc = addr + regs.v[0] as u16;
    }

    fn block_transfer(
        &self,
        regs: &mut Registers,
        memory: &mut dyn MemoryMap,
        dir: Transfer,
        x: usize,
    ) -> Result<(), MachineError> {
        transfer(regs, memory, dir, x)?;
        regs.i = regs.i.wrapping_add(x as u16 + 1);
        Ok(())
    }
}

impl Quirks for Extended {
    fn variant(&self) -> Variant {
        Variant::Extended
    }

    fn shift(&self, regs: &mut Registers, op: ShiftOp, x: usize, _y: usize) {
        let (value, out) = shifted(op, regs.v[x]);
        regs.set_with_flag(x, value, out);
    }

    fn logic(&self, regs: &mut Registers, op: LogicOp, x: usize, y: usize) {
        let value = combine(op, regs.v[x], regs.v[y]);
        regs.set_with_flag(x, value, false);
    }

    fn jump_with_offset(&self, regs: &mut Registers, x: usize, addr: u16) {
        regs.pc = addr + regs.v[x] as u16;
    }

    fn block_transfer(
        &self,
        regs: &mut Registers,
        memory: &mut dyn MemoryMap,
        dir: Transfer,
        x: usize,
    ) -> Result<(), MachineError> {
        transfer(regs, memory, dir, x)
    }
}

/// shifted value and the bit that fell out
fn shifted(op: ShiftOp, value: u8) -> (u8, bool) {
    match op {
        ShiftOp::Right => (value >> 1, value & 0x01 != 0),
        ShiftOp::Left => (value << 1, value & 0x80 != 0),
    }
}

fn combine(op: LogicOp, a: u8, b: u8) -> u8 {
    match op {
        LogicOp::Or => a | b,
        LogicOp::And => a & b,
        LogicOp::Xor => a ^ b,
    }
}

/// copy V0..=VX to or from memory at I, leaving I alone
fn transfer(
    regs: &mut Registers,
    memory: &mut dyn MemoryMap,
    dir: Transfer,
    x: usize,
) -> Result<(), MachineError> {
    match dir {
        Transfer::Store => memory
            .get_rw_slice(regs.i, x + 1)?
            .copy_from_slice(&regs.v[..=x]),
        Transfer::Load => regs.v[..=x].copy_from_slice(memory.get_ro_slice(regs.i, x + 1)?),
    }
    Ok(())
}
