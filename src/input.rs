use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use std::cell::Cell;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// number of keys on the COSMAC hex keypad
pub const KEY_COUNT: u8 = 16;

/// map of characters read from the terminal to the hex keypad, using the
/// left-hand side of a qwerty keyboard:
///
///   1 2 3 C      1 2 3 4
///   4 5 6 D  <-  q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
pub const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// live view of which keys are held, as read by the interpreter
pub trait Input {
    /// is key 0x0-0xf held right now
    fn is_pressed(&self, key: u8) -> bool;

    /// lowest numbered key that's held, if any
    fn first_pressed(&self) -> Option<u8> {
        (0..KEY_COUNT).find(|&k| self.is_pressed(k))
    }
}

/// keypad state shared between whoever produces key events and the
/// interpreter. Updates go through `&self`, so the host can keep changing it
/// while the interpreter holds a reference.
#[derive(Debug, Default)]
pub struct Keypad {
    held: Cell<u16>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            held: Cell::new(0),
        }
    }

    pub fn set(&self, key: u8, pressed: bool) {
        if key >= KEY_COUNT {
            log::debug!("ignoring key 0x{:02x}; not on the keypad", key);
            return;
        }
        let bit = 1u16 << key;
        let held = self.held.get();
        self.held.set(if pressed { held | bit } else { held & !bit });
    }

    pub fn press(&self, key: u8) {
        self.set(key, true)
    }

    pub fn release(&self, key: u8) {
        self.set(key, false)
    }

    pub fn release_all(&self) {
        self.held.set(0);
    }
}

impl Input for Keypad {
    fn is_pressed(&self, key: u8) -> bool {
        key < KEY_COUNT && self.held.get() & (1u16 << key) != 0
    }
}

/// terminals only tell us about key-down (and auto-repeat), so a key counts as
/// held until this long after the last event for it
const TERM_HOLD: Duration = Duration::from_millis(150);

/// pumps crossterm key events into a `Keypad`
pub struct TermInput {
    keymap: HashMap<char, u8>,
    last_seen: [Option<Instant>; KEY_COUNT as usize],
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            last_seen: [None; KEY_COUNT as usize],
        })
    }

    /// drain pending terminal events into the keypad; true means the user
    /// asked to quit (esc or ctrl-c)
    pub fn pump(&mut self, keypad: &Keypad) -> Result<bool, io::Error> {
        let now = Instant::now();
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(&mapped_key) => {
                            keypad.press(mapped_key);
                            self.last_seen[mapped_key as usize] = Some(now);
                        }
                        None => log::debug!("can't map {:?} to a COSMAC key", key),
                    },
                    other => log::debug!("ignoring key event {:?}", other),
                }
            }
        }
        self.expire(keypad, now);
        Ok(false)
    }

    fn expire(&mut self, keypad: &Keypad, now: Instant) {
        for (key, seen) in self.last_seen.iter_mut().enumerate() {
            if let Some(at) = *seen {
                if now.duration_since(at) >= TERM_HOLD {
                    keypad.release(key as u8);
                    *seen = None;
                }
            }
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("couldn't restore terminal: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_starts_released() {
        let k = Keypad::new();
        for key in 0..KEY_COUNT {
            assert!(!k.is_pressed(key));
        }
        assert_eq!(k.first_pressed(), None);
    }

    #[test]
    fn test_press_release() {
        let k = Keypad::new();
        k.press(0xA);
        assert!(k.is_pressed(0xA));
        assert!(!k.is_pressed(0xB));
        k.release(0xA);
        assert!(!k.is_pressed(0xA));
    }

    #[test]
    fn test_first_pressed_is_lowest() {
        let k = Keypad::new();
        k.press(0xE);
        k.press(0x3);
        assert_eq!(k.first_pressed(), Some(0x3));
        k.release_all();
        assert_eq!(k.first_pressed(), None);
    }

    #[test]
    fn test_out_of_range_keys_ignored() {
        let k = Keypad::new();
        k.press(0x10);
        assert!(!k.is_pressed(0x10));
        assert_eq!(k.first_pressed(), None);
    }

    #[test]
    fn test_keymap_covers_keypad() {
        let map = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        let mut keys: Vec<u8> = map.values().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..KEY_COUNT).collect::<Vec<_>>());
    }
}
