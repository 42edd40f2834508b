use clap::Parser;
use std::path::PathBuf;

use chip8::driver::{DEFAULT_REFRESH_HZ, DEFAULT_SPEED_HZ};

#[derive(Parser, Debug)]
#[command(
    name = "chip8",
    about = "CHIP-8 interpreter for the terminal",
    long_about = "Runs a CHIP-8 program in the terminal.\n\
                  Keys 1234/qwer/asdf/zxcv map onto the hex keypad; esc quits.",
    version
)]
pub struct Cli {
    /// ROM file to run
    pub rom: PathBuf,

    /// Which interpreter to emulate: legacy (COSMAC VIP) or extended (SUPER-CHIP)
    #[arg(short = 'V', long, default_value = "legacy")]
    pub variant: String,

    /// Instructions per second
    #[arg(short = 's', long, default_value_t = DEFAULT_SPEED_HZ)]
    pub speed: u32,

    /// Screen refreshes per second
    #[arg(short = 'r', long, default_value_t = DEFAULT_REFRESH_HZ)]
    pub refresh: u32,

    /// Stop after this many instructions
    #[arg(short = 'c', long)]
    pub cycles: Option<u64>,

    /// Seed for the random number instruction
    #[arg(long)]
    pub seed: Option<u64>,
}
