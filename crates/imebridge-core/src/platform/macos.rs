//! macOS virtual key codes (`kVK_*`, ANSI layout) and `NSEvent` modifier
//! flags, as delivered to an InputMethodKit controller.

use crate::native::{ModifierKey, ModifierKind, NamedKey, NativeKey, NativeModifiers, OemKey, Side};

pub const KVK_RETURN: u16 = 0x24;
pub const KVK_TAB: u16 = 0x30;
pub const KVK_SPACE: u16 = 0x31;
pub const KVK_DELETE: u16 = 0x33;
pub const KVK_ESCAPE: u16 = 0x35;
pub const KVK_RIGHT_COMMAND: u16 = 0x36;
pub const KVK_COMMAND: u16 = 0x37;
pub const KVK_SHIFT: u16 = 0x38;
pub const KVK_CAPS_LOCK: u16 = 0x39;
pub const KVK_OPTION: u16 = 0x3A;
pub const KVK_CONTROL: u16 = 0x3B;
pub const KVK_RIGHT_SHIFT: u16 = 0x3C;
pub const KVK_RIGHT_OPTION: u16 = 0x3D;
pub const KVK_RIGHT_CONTROL: u16 = 0x3E;
/// Labelled Help on Apple keyboards, Insert on PC keyboards.
pub const KVK_HELP: u16 = 0x72;
pub const KVK_HOME: u16 = 0x73;
pub const KVK_PAGE_UP: u16 = 0x74;
pub const KVK_FORWARD_DELETE: u16 = 0x75;
pub const KVK_END: u16 = 0x77;
pub const KVK_PAGE_DOWN: u16 = 0x79;
pub const KVK_LEFT_ARROW: u16 = 0x7B;
pub const KVK_RIGHT_ARROW: u16 = 0x7C;
pub const KVK_DOWN_ARROW: u16 = 0x7D;
pub const KVK_UP_ARROW: u16 = 0x7E;

// Key codes follow physical position, not the alphabet.
const LETTERS: &[(u16, u8)] = &[
    (0x00, b'A'),
    (0x01, b'S'),
    (0x02, b'D'),
    (0x03, b'F'),
    (0x04, b'H'),
    (0x05, b'G'),
    (0x06, b'Z'),
    (0x07, b'X'),
    (0x08, b'C'),
    (0x09, b'V'),
    (0x0B, b'B'),
    (0x0C, b'Q'),
    (0x0D, b'W'),
    (0x0E, b'E'),
    (0x0F, b'R'),
    (0x10, b'Y'),
    (0x11, b'T'),
    (0x1F, b'O'),
    (0x20, b'U'),
    (0x22, b'I'),
    (0x23, b'P'),
    (0x25, b'L'),
    (0x26, b'J'),
    (0x28, b'K'),
    (0x2D, b'N'),
    (0x2E, b'M'),
];

const DIGITS: &[(u16, u8)] = &[
    (0x12, 1),
    (0x13, 2),
    (0x14, 3),
    (0x15, 4),
    (0x17, 5),
    (0x16, 6),
    (0x1A, 7),
    (0x1C, 8),
    (0x19, 9),
    (0x1D, 0),
];

const OEM: &[(u16, OemKey)] = &[
    (0x29, OemKey::Semicolon),
    (0x18, OemKey::Equals),
    (0x2B, OemKey::Comma),
    (0x1B, OemKey::Minus),
    (0x2F, OemKey::Period),
    (0x2C, OemKey::Slash),
    (0x32, OemKey::Backtick),
    (0x21, OemKey::LeftBracket),
    (0x2A, OemKey::Backslash),
    (0x1E, OemKey::RightBracket),
    (0x27, OemKey::Quote),
];

const FUNCTION_KEYS: &[(u16, u8)] = &[
    (0x7A, 1),
    (0x78, 2),
    (0x63, 3),
    (0x76, 4),
    (0x60, 5),
    (0x61, 6),
    (0x62, 7),
    (0x64, 8),
    (0x65, 9),
    (0x6D, 10),
    (0x67, 11),
    (0x6F, 12),
    (0x69, 13),
    (0x6B, 14),
    (0x71, 15),
    (0x6A, 16),
    (0x40, 17),
    (0x4F, 18),
    (0x50, 19),
    (0x5A, 20),
];

fn lookup<T: Copy>(table: &[(u16, T)], code: u16) -> Option<T> {
    table.iter().find(|(c, _)| *c == code).map(|(_, v)| *v)
}

pub fn from_key_code(code: u16) -> NativeKey {
    if let Some(c) = lookup(LETTERS, code) {
        return NativeKey::Letter(c);
    }
    if let Some(d) = lookup(DIGITS, code) {
        return NativeKey::Digit(d);
    }
    if let Some(oem) = lookup(OEM, code) {
        return NativeKey::Oem(oem);
    }
    if let Some(n) = lookup(FUNCTION_KEYS, code) {
        return NativeKey::Function(n);
    }

    let named = |k| NativeKey::Named(k);
    let modifier = |kind, side| NativeKey::Modifier(ModifierKey::new(kind, side));
    match code {
        KVK_RETURN => named(NamedKey::Enter),
        KVK_TAB => named(NamedKey::Tab),
        KVK_SPACE => named(NamedKey::Space),
        KVK_DELETE => named(NamedKey::Backspace),
        KVK_ESCAPE => named(NamedKey::Escape),
        KVK_HELP => named(NamedKey::Insert),
        KVK_HOME => named(NamedKey::Home),
        KVK_PAGE_UP => named(NamedKey::PageUp),
        KVK_FORWARD_DELETE => named(NamedKey::Delete),
        KVK_END => named(NamedKey::End),
        KVK_PAGE_DOWN => named(NamedKey::PageDown),
        KVK_LEFT_ARROW => named(NamedKey::Left),
        KVK_RIGHT_ARROW => named(NamedKey::Right),
        KVK_DOWN_ARROW => named(NamedKey::Down),
        KVK_UP_ARROW => named(NamedKey::Up),

        KVK_SHIFT => modifier(ModifierKind::Shift, Side::Left),
        KVK_RIGHT_SHIFT => modifier(ModifierKind::Shift, Side::Right),
        KVK_CONTROL => modifier(ModifierKind::Control, Side::Left),
        KVK_RIGHT_CONTROL => modifier(ModifierKind::Control, Side::Right),
        KVK_OPTION => modifier(ModifierKind::Alt, Side::Left),
        KVK_RIGHT_OPTION => modifier(ModifierKind::Alt, Side::Right),
        KVK_COMMAND => modifier(ModifierKind::Meta, Side::Left),
        KVK_RIGHT_COMMAND => modifier(ModifierKind::Meta, Side::Right),
        KVK_CAPS_LOCK => modifier(ModifierKind::CapsLock, Side::Either),

        other => NativeKey::Other(u32::from(other)),
    }
}

// NSEventModifierFlags, device-independent part.
pub const NS_CAPS_LOCK: u64 = 1 << 16;
pub const NS_SHIFT: u64 = 1 << 17;
pub const NS_CONTROL: u64 = 1 << 18;
pub const NS_OPTION: u64 = 1 << 19;
pub const NS_COMMAND: u64 = 1 << 20;

// Device-dependent bits (NX_DEVICE*KEYMASK) carried in the low word.
pub const NX_DEVICE_LCONTROL: u64 = 0x0000_0001;
pub const NX_DEVICE_LSHIFT: u64 = 0x0000_0002;
pub const NX_DEVICE_RSHIFT: u64 = 0x0000_0004;
pub const NX_DEVICE_LCOMMAND: u64 = 0x0000_0008;
pub const NX_DEVICE_RCOMMAND: u64 = 0x0000_0010;
pub const NX_DEVICE_LALT: u64 = 0x0000_0020;
pub const NX_DEVICE_RALT: u64 = 0x0000_0040;
pub const NX_DEVICE_RCONTROL: u64 = 0x0000_2000;

const FLAG_BITS: [(u64, NativeModifiers); 13] = [
    (NS_CAPS_LOCK, NativeModifiers::CAPS_LOCK),
    (NS_SHIFT, NativeModifiers::SHIFT),
    (NS_CONTROL, NativeModifiers::CONTROL),
    (NS_OPTION, NativeModifiers::ALT),
    (NS_COMMAND, NativeModifiers::META),
    (NX_DEVICE_LCONTROL, NativeModifiers::LCONTROL),
    (NX_DEVICE_LSHIFT, NativeModifiers::LSHIFT),
    (NX_DEVICE_RSHIFT, NativeModifiers::RSHIFT),
    (NX_DEVICE_LCOMMAND, NativeModifiers::LMETA),
    (NX_DEVICE_RCOMMAND, NativeModifiers::RMETA),
    (NX_DEVICE_LALT, NativeModifiers::LALT),
    (NX_DEVICE_RALT, NativeModifiers::RALT),
    (NX_DEVICE_RCONTROL, NativeModifiers::RCONTROL),
];

/// Maps `NSEvent.modifierFlags` to [`NativeModifiers`].
pub fn modifiers_from_flags(flags: u64) -> NativeModifiers {
    FLAG_BITS
        .iter()
        .filter(|(mask, _)| flags & mask != 0)
        .fold(NativeModifiers::empty(), |acc, (_, bit)| acc | *bit)
}
