//! # instruction
//!
//! Opcode field extraction and the category -> operation table. Decoding is
//! pure; whether an operation does anything variant-specific is the
//! interpreter's business, not this module's.
use std::fmt;

/// a raw 16 bit instruction, big-endian in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// top nibble
    pub fn category(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn x(self) -> usize {
        ((self.0 >> 8) & 0xF) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 >> 4) & 0xF) as usize
    }

    /// low nibble
    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// low byte
    pub fn nn(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// low 12 bits
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

/// which way a shift goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    Or,
    And,
    Xor,
}

/// direction of a block register <-> memory transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Store,
    Load,
}

/// every instruction the interpreter knows about; register operands are
/// indices 0x0-0xf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: machine code routine on the original hardware; ignored
    Sys(u16),
    /// 00e0
    Cls,
    /// 00ee
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SeByte(usize, u8),
    /// 4xnn
    SneByte(usize, u8),
    /// 5xy0
    SeReg(usize, usize),
    /// 6xnn
    LdByte(usize, u8),
    /// 7xnn
    AddByte(usize, u8),
    /// 8xy0
    LdReg(usize, usize),
    /// 8xy1, 8xy2, 8xy3
    Logic(LogicOp, usize, usize),
    /// 8xy4
    AddReg(usize, usize),
    /// 8xy5: vx = vx - vy
    Sub(usize, usize),
    /// 8xy6, 8xye
    Shift(ShiftOp, usize, usize),
    /// 8xy7: vx = vy - vx
    Subn(usize, usize),
    /// 9xy0
    SneReg(usize, usize),
    /// annn
    LdI(u16),
    /// bnnn / bxnn; x is carried for the variants that use it
    JpOffset(usize, u16),
    /// cxnn
    Rnd(usize, u8),
    /// dxyn
    Drw(usize, usize, u8),
    /// ex9e
    Skp(usize),
    /// exa1
    Sknp(usize),
    /// fx07
    LdRegDt(usize),
    /// fx0a
    LdKey(usize),
    /// fx15
    LdDtReg(usize),
    /// fx18
    LdSt(usize),
    /// fx1e
    AddI(usize),
    /// fx29
    LdF(usize),
    /// fx33
    LdB(usize),
    /// fx55, fx65
    Block(Transfer, usize),
}

impl Instruction {
    /// map an opcode to an operation; None means nothing is defined for it
    pub fn decode(op: Opcode) -> Option<Instruction> {
        use Instruction::*;
        let (x, y) = (op.x(), op.y());
        let instr = match op.category() {
            0x0 => match op.0 {
                0x00E0 => Cls,
                0x00EE => Ret,
                _ => Sys(op.nnn()),
            },
            0x1 => Jp(op.nnn()),
            0x2 => Call(op.nnn()),
            0x3 => SeByte(x, op.nn()),
            0x4 => SneByte(x, op.nn()),
            0x5 => SeReg(x, y),
            0x6 => LdByte(x, op.nn()),
            0x7 => AddByte(x, op.nn()),
            0x8 => match op.n() {
                0x0 => LdReg(x, y),
                0x1 => Logic(LogicOp::Or, x, y),
                0x2 => Logic(LogicOp::And, x, y),
                0x3 => Logic(LogicOp::Xor, x, y),
                0x4 => AddReg(x, y),
                0x5 => Sub(x, y),
                0x6 => Shift(ShiftOp::Right, x, y),
                0x7 => Subn(x, y),
                0xE => Shift(ShiftOp::Left, x, y),
                _ => return None,
            },
            0x9 => SneReg(x, y),
            0xA => LdI(op.nnn()),
            0xB => JpOffset(x, op.nnn()),
            0xC => Rnd(x, op.nn()),
            0xD => Drw(x, y, op.n()),
            0xE => match op.nn() {
                0x9E => Skp(x),
                0xA1 => Sknp(x),
                _ => return None,
            },
            0xF => match op.nn() {
                0x07 => LdRegDt(x),
                0x0A => LdKey(x),
                0x15 => LdDtReg(x),
                0x18 => LdSt(x),
                0x1E => AddI(x),
                0x29 => LdF(x),
                0x33 => LdB(x),
                0x55 => Block(Transfer::Store, x),
                0x65 => Block(Transfer::Load, x),
                _ => return None,
            },
            _ => unreachable!("category is a nibble"),
        };
        Some(instr)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys(a) => write!(f, "SYS {:03x}", a),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(a) => write!(f, "JP {:03x}", a),
            Call(a) => write!(f, "CALL {:03x}", a),
            SeByte(x, b) => write!(f, "SE V{:X}, {:02x}", x, b),
            SneByte(x, b) => write!(f, "SNE V{:X}, {:02x}", x, b),
            SeReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte(x, b) => write!(f, "LD V{:X}, {:02x}", x, b),
            AddByte(x, b) => write!(f, "ADD V{:X}, {:02x}", x, b),
            LdReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Logic(op, x, y) => {
                let name = match op {
                    LogicOp::Or => "OR",
                    LogicOp::And => "AND",
                    LogicOp::Xor => "XOR",
                };
                write!(f, "{} V{:X}, V{:X}", name, x, y)
            }
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shift(ShiftOp::Right, x, y) => write!(f, "SHR V{:X}, V{:X}", x, y),
            Shift(ShiftOp::Left, x, y) => write!(f, "SHL V{:X}, V{:X}", x, y),
            Subn(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            SneReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(a) => write!(f, "LD I, {:03x}", a),
            JpOffset(x, a) => write!(f, "JP V0/V{:X}, {:03x}", x, a),
            Rnd(x, b) => write!(f, "RND V{:X}, {:02x}", x, b),
            Drw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {:x}", x, y, n),
            Skp(x) => write!(f, "SKP V{:X}", x),
            Sknp(x) => write!(f, "SKNP V{:X}", x),
            LdRegDt(x) => write!(f, "LD V{:X}, DT", x),
            LdKey(x) => write!(f, "LD V{:X}, K", x),
            LdDtReg(x) => write!(f, "LD DT, V{:X}", x),
            LdSt(x) => write!(f, "LD ST, V{:X}", x),
            AddI(x) => write!(f, "ADD I, V{:X}", x),
            LdF(x) => write!(f, "LD F, V{:X}", x),
            LdB(x) => write!(f, "LD B, V{:X}", x),
            Block(Transfer::Store, x) => write!(f, "LD [I], V0-V{:X}", x),
            Block(Transfer::Load, x) => write!(f, "LD V0-V{:X}, [I]", x),
        }
    }
}
