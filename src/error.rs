use std::io;
use thiserror::Error;

/// Problems raised while executing a single cycle. None of these are fatal:
/// the machine is left as it was after fetch/advance, and the caller may log
/// the error and keep stepping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error("unimplemented instruction 0x{0:04x}")]
    UnimplementedInstruction(u16),

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("call stack overflow (depth {0})")]
    StackOverflow(usize),

    #[error("address 0x{0:04x} is outside of memory")]
    AddressOutOfBounds(u16),
}

/// Problems loading a program image. These stop startup before any cycle runs.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("program is {size} bytes; at most {max} bytes fit in memory")]
    TooLarge { size: usize, max: usize },

    #[error("can't read program: {0}")]
    Unreadable(#[from] io::Error),
}
