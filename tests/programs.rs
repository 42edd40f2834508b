use chip8::display::{Frame, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8::input::Keypad;
use chip8::memory::CHIP8_FONT;
use chip8::{Chip8Interpreter, LoadError, MachineError, Program, Variant};

fn boot<'a>(keypad: &'a Keypad, variant: Variant, bytes: &[u8]) -> Chip8Interpreter<'a> {
    let mut m = Chip8Interpreter::with_seed(keypad, variant, 0xC8);
    m.load_program(&Program::from_bytes(bytes.to_vec()).unwrap())
        .unwrap();
    m
}

#[test]
fn draws_font_zero_in_the_corner() {
    let keypad = Keypad::new();
    // cls; ld v0, 0; ld f, v0; drw v0, v0, 5; jp 208
    let mut m = boot(
        &keypad,
        Variant::Legacy,
        &[0x00, 0xE0, 0x60, 0x00, 0xF0, 0x29, 0xD0, 0x05, 0x12, 0x08],
    );
    for _ in 0..4 {
        m.step().unwrap();
    }
    assert_eq!(m.program_counter(), 0x208);
    for _ in 0..2 {
        m.step().unwrap();
        assert_eq!(m.program_counter(), 0x208);
    }

    let mut expected: Frame = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    for (row, &byte) in CHIP8_FONT[0..5].iter().enumerate() {
        for bit in 0..8 {
            expected[row][bit] = (byte << bit) & 0x80 != 0;
        }
    }
    assert_eq!(m.snapshot(), expected);
    assert_eq!(m.display().lit_count(), 14);
    assert_eq!(m.registers().v[0xF], 0);
}

#[test]
fn index_picks_up_register() {
    let keypad = Keypad::new();
    let mut m = boot(&keypad, Variant::Extended, &[0x6A, 0x05, 0xFA, 0x1E]);
    m.step().unwrap();
    m.step().unwrap();
    assert_eq!(m.index(), 5);
    assert_eq!(m.registers().v[0xF], 0);
}

#[test]
fn return_without_call_is_recoverable() {
    let keypad = Keypad::new();
    let mut m = boot(&keypad, Variant::Legacy, &[0x00, 0xEE, 0x61, 0x2A]);
    assert_eq!(m.step(), Err(MachineError::StackUnderflow));
    m.step().unwrap();
    assert_eq!(m.registers().v[1], 0x2A);
}

#[test]
fn undefined_instruction_reports_opcode() {
    let keypad = Keypad::new();
    let mut m = boot(&keypad, Variant::Legacy, &[0xE1, 0xFF]);
    let before = m.registers().clone();
    assert_eq!(m.step(), Err(MachineError::UnimplementedInstruction(0xE1FF)));
    assert_eq!(m.registers().v, before.v);
    assert_eq!(m.program_counter(), 0x202);
}

#[test]
fn subroutine_round_trip() {
    let keypad = Keypad::new();
    // 200: call 208; 202: add v0, 1; 204: jp 204; 206: -; 208: ld v0, 10; 20a: ret
    let mut m = boot(
        &keypad,
        Variant::Legacy,
        &[0x22, 0x08, 0x70, 0x01, 0x12, 0x04, 0x00, 0x00, 0x60, 0x10, 0x00, 0xEE],
    );
    for _ in 0..5 {
        m.step().unwrap();
    }
    assert_eq!(m.registers().v[0], 0x11);
    assert_eq!(m.program_counter(), 0x204);
    assert_eq!(m.stack_depth(), 0);
}

#[test]
fn key_wait_resumes_on_press() {
    let keypad = Keypad::new();
    // ld v2, k; skp v2
    let mut m = boot(&keypad, Variant::Legacy, &[0xF2, 0x0A, 0xE2, 0x9E]);
    m.step().unwrap();
    assert!(m.is_awaiting_key());
    assert_eq!(m.program_counter(), 0x200);
    keypad.press(0xD);
    m.step().unwrap();
    m.step().unwrap();
    assert_eq!(m.registers().v[2], 0xD);
    assert_eq!(m.program_counter(), 0x206);
}

#[test]
fn oversized_image_rejected() {
    let err = Program::from_bytes(vec![0; 0xE01]).unwrap_err();
    assert!(matches!(err, LoadError::TooLarge { .. }));
}
