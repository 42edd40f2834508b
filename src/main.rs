use clap::Parser;
use std::error::Error;

use chip8::driver::Driver;
use chip8::input::{Keypad, TermInput};
use chip8::interpreter::Chip8Interpreter;
use chip8::program::Program;
use chip8::quirks::Variant;
use chip8::screen::MonoTermScreen;

mod cli;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    let cli = cli::Cli::parse();

    // load a program; nothing else gets set up if this fails
    let program = Program::open(&cli.rom)?;
    let variant = Variant::from_name(&cli.variant);

    // initialise
    let keypad = Keypad::new();
    let mut interpreter = match cli.seed {
        Some(seed) => Chip8Interpreter::with_seed(&keypad, variant, seed),
        None => Chip8Interpreter::new(&keypad, variant),
    };
    interpreter.load_program(&program)?;

    let mut screen = MonoTermScreen::new(&format!("CHIP-8 [{}]", variant))?;
    let mut input = TermInput::new()?;

    let stats = Driver::new(cli.speed, cli.refresh)
        .with_max_cycles(cli.cycles)
        .run(&mut interpreter, &mut screen, || input.pump(&keypad))?;

    // put the terminal back before saying anything
    drop(input);
    drop(screen);
    if stats.errors > 0 {
        eprintln!(
            "{} instructions failed; rerun with RUST_LOG=warn 2>chip8.log to see which",
            stats.errors
        );
    }
    Ok(())
}
