//! # driver
//!
//! Runs an interpreter at a fixed instruction rate and hands frames to a
//! screen at a (usually lower) refresh rate. Errors from individual cycles are
//! logged and counted, never fatal; only I/O failures from the host end a run.
use std::io;
use std::time::{Duration, Instant};

use crate::interpreter::Chip8Interpreter;
use crate::screen::Screen;

/// original interpreters ran somewhere around here
pub const DEFAULT_SPEED_HZ: u32 = 700;
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// if we fall further behind than this we stop trying to catch up
const MAX_LAG: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Driver {
    cycle_period: Duration,
    refresh_period: Duration,
    max_cycles: Option<u64>,
}

/// what happened during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub cycles: u64,
    pub frames: u64,
    pub errors: u64,
    /// stopped because the host asked to, rather than running out of cycles
    pub quit: bool,
}

impl Driver {
    /// speed is instructions per second, refresh is frames per second; both
    /// are clamped to at least 1
    pub fn new(speed_hz: u32, refresh_hz: u32) -> Self {
        Driver {
            cycle_period: period(speed_hz),
            refresh_period: period(refresh_hz),
            max_cycles: None,
        }
    }

    /// stop after this many cycles
    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// step `interpreter` until `pump` asks to quit or the cycle limit is hit.
    /// `pump` is called before every cycle and is where the host should feed
    /// key events into the keypad; returning true ends the run.
    pub fn run(
        &self,
        interpreter: &mut Chip8Interpreter,
        screen: &mut dyn Screen,
        mut pump: impl FnMut() -> Result<bool, io::Error>,
    ) -> Result<RunStats, io::Error> {
        let mut stats = RunStats::default();
        let start = Instant::now();
        let mut next_cycle = start;
        let mut next_frame = start;

        loop {
            if self.max_cycles.map_or(false, |max| stats.cycles >= max) {
                break;
            }
            if pump()? {
                stats.quit = true;
                break;
            }

            let pc = interpreter.program_counter();
            if let Err(e) = interpreter.step() {
                log::warn!("{:03x}: {}", pc, e);
                stats.errors += 1;
            }
            stats.cycles += 1;

            let now = Instant::now();
            if now >= next_frame {
                screen.draw(&interpreter.snapshot())?;
                stats.frames += 1;
                next_frame += self.refresh_period;
                if next_frame < now {
                    next_frame = now + self.refresh_period;
                }
            }

            next_cycle += self.cycle_period;
            let now = Instant::now();
            if next_cycle > now {
                spin_sleep::sleep(next_cycle - now);
            } else if now - next_cycle > MAX_LAG {
                log::debug!("running {:?} behind; skipping ahead", now - next_cycle);
                next_cycle = now;
            }
        }

        // whatever was drawn last should be on screen when we stop
        screen.draw(&interpreter.snapshot())?;
        stats.frames += 1;
        log::info!(
            "ran {} cycles, {} frames, {} errors in {:?}",
            stats.cycles,
            stats.frames,
            stats.errors,
            start.elapsed()
        );
        Ok(stats)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new(DEFAULT_SPEED_HZ, DEFAULT_REFRESH_HZ)
    }
}

fn period(hz: u32) -> Duration {
    Duration::from_secs(1) / hz.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Keypad;
    use crate::program::Program;
    use crate::quirks::Variant;
    use crate::screen::HeadlessScreen;

    fn interpreter<'a>(keypad: &'a Keypad, bytes: &[u8]) -> Chip8Interpreter<'a> {
        let mut i = Chip8Interpreter::with_seed(keypad, Variant::Legacy, 1);
        i.load_program(&Program::from_bytes(bytes.to_vec()).unwrap())
            .unwrap();
        i
    }

    #[test]
    fn test_period() {
        assert_eq!(period(1), Duration::from_secs(1));
        assert_eq!(period(1000), Duration::from_millis(1));
        assert_eq!(period(0), Duration::from_secs(1));
    }

    #[test]
    fn test_runs_to_cycle_limit() -> Result<(), io::Error> {
        let keypad = Keypad::new();
        // ld v0, 1; add v0, 1 ... jp 202
        let mut i = interpreter(&keypad, &[0x60, 0x01, 0x70, 0x01, 0x12, 0x02]);
        let mut screen = HeadlessScreen::new();
        let stats = Driver::new(100_000, 60)
            .with_max_cycles(Some(9))
            .run(&mut i, &mut screen, || Ok(false))?;
        assert_eq!(stats.cycles, 9);
        assert_eq!(stats.errors, 0);
        assert!(!stats.quit);
        assert!(stats.frames >= 2);
        assert_eq!(screen.frames as u64, stats.frames);
        assert_eq!(i.registers().v[0], 5);
        Ok(())
    }

    #[test]
    fn test_errors_counted_not_fatal() -> Result<(), io::Error> {
        let keypad = Keypad::new();
        // e0ff is undefined; 6001 still runs after it
        let mut i = interpreter(&keypad, &[0xE0, 0xFF, 0x60, 0x01, 0x12, 0x04]);
        let mut screen = HeadlessScreen::new();
        let stats = Driver::new(100_000, 60)
            .with_max_cycles(Some(3))
            .run(&mut i, &mut screen, || Ok(false))?;
        assert_eq!(stats.errors, 1);
        assert_eq!(i.registers().v[0], 1);
        Ok(())
    }

    #[test]
    fn test_pump_can_quit() -> Result<(), io::Error> {
        let keypad = Keypad::new();
        let mut i = interpreter(&keypad, &[0x12, 0x00]);
        let mut screen = HeadlessScreen::new();
        let mut calls = 0;
        let stats = Driver::new(100_000, 60).run(&mut i, &mut screen, || {
            calls += 1;
            Ok(calls > 4)
        })?;
        assert!(stats.quit);
        assert_eq!(stats.cycles, 4);
        Ok(())
    }

    #[test]
    fn test_pump_feeds_keypad() -> Result<(), io::Error> {
        let keypad = Keypad::new();
        // ld v5, k; jp 202
        let mut i = interpreter(&keypad, &[0xF5, 0x0A, 0x12, 0x02]);
        let mut screen = HeadlessScreen::new();
        let mut calls = 0;
        Driver::new(100_000, 60)
            .with_max_cycles(Some(10))
            .run(&mut i, &mut screen, || {
                calls += 1;
                if calls == 5 {
                    keypad.press(0x7);
                }
                Ok(false)
            })?;
        assert_eq!(i.registers().v[5], 0x7);
        assert_eq!(i.program_counter(), 0x202);
        Ok(())
    }

    #[test]
    fn test_last_frame_drawn() -> Result<(), io::Error> {
        let keypad = Keypad::new();
        // ld i, font 0 (v0 = 0); drw v0, v0, 5; jp 204
        let mut i = interpreter(&keypad, &[0xF0, 0x29, 0xD0, 0x05, 0x12, 0x04]);
        let mut screen = HeadlessScreen::new();
        Driver::new(100_000, 1)
            .with_max_cycles(Some(3))
            .run(&mut i, &mut screen, || Ok(false))?;
        let last = screen.last.expect("a frame was drawn");
        assert!(last[0][0..4].iter().all(|&px| px));
        Ok(())
    }
}
