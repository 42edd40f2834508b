//!
//! ## Design
//!
//! * bit-exact CHIP-8 instruction semantics; the display is where mistakes show
//! * two variants, COSMAC VIP ("legacy") and SUPER-CHIP ("extended"), which
//!   disagree about shifts, bnnn, fx55/fx65 and the logic ops' flag. These
//!   live behind one trait so the shared interpreter never branches on them
//! * one `step()` == one instruction; the host decides how often to call it
//! * timers are wall clock deadlines rather than things that need ticking
//! * the interpreter owns its display; renderers get snapshots
//! * the keypad is owned by the host and only read by the interpreter
//! * nothing that goes wrong in a cycle is fatal; errors are values
//!
//! Model
//!
//! Host (main.rs)
//!  |-- program(file)            -- too big / unreadable is fatal, up front
//!  |-- keypad                   -- shared; TermInput pumps crossterm events in
//!  |-- interpreter(keypad, variant)
//!  |    |-- memory, registers, stack, display, timers
//!  |    |-- instruction decode  -- opcode -> Instruction, or unimplemented
//!  |    `-- quirks(variant)     -- the variant-specific instructions
//!  |-- screen                   -- TUI canvas
//!  `-- driver
//!       |-- pump input; interpreter.step(); log any error and carry on
//!       |-- every 1/refresh seconds: screen.draw(interpreter.snapshot())
//!       `-- spin_sleep until the next cycle is due
pub mod display;
pub mod driver;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod program;
pub mod quirks;
pub mod registers;
pub mod screen;
pub mod timer;

pub use error::{LoadError, MachineError};
pub use interpreter::Chip8Interpreter;
pub use program::Program;
pub use quirks::Variant;
