use crate::native::{NamedKey, OemKey};
use crate::types::CanonicalKey;

pub const SPACE: u32 = 0x0020;
pub const BACKSPACE: u32 = 0xff08;
pub const TAB: u32 = 0xff09;
pub const RETURN: u32 = 0xff0d;
pub const ESCAPE: u32 = 0xff1b;
pub const HOME: u32 = 0xff50;
pub const LEFT: u32 = 0xff51;
pub const UP: u32 = 0xff52;
pub const RIGHT: u32 = 0xff53;
pub const DOWN: u32 = 0xff54;
pub const PAGE_UP: u32 = 0xff55;
pub const PAGE_DOWN: u32 = 0xff56;
pub const END: u32 = 0xff57;
pub const INSERT: u32 = 0xff63;
pub const DELETE: u32 = 0xffff;

/// F1. F2..F12 follow consecutively.
pub const F1: u32 = 0xffbe;
pub const FUNCTION_KEY_COUNT: u8 = 12;
pub const F12: u32 = F1 + FUNCTION_KEY_COUNT as u32 - 1;

const FUNCTION_KEY_NAMES: [&str; FUNCTION_KEY_COUNT as usize] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

/// Fixed codes for keys whose meaning never depends on modifiers.
pub const NAMED_KEYSYMS: &[(NamedKey, u32)] = &[
    (NamedKey::Enter, RETURN),
    (NamedKey::Backspace, BACKSPACE),
    (NamedKey::Escape, ESCAPE),
    (NamedKey::Tab, TAB),
    (NamedKey::Space, SPACE),
    (NamedKey::Left, LEFT),
    (NamedKey::Up, UP),
    (NamedKey::Right, RIGHT),
    (NamedKey::Down, DOWN),
    (NamedKey::PageUp, PAGE_UP),
    (NamedKey::PageDown, PAGE_DOWN),
    (NamedKey::Home, HOME),
    (NamedKey::End, END),
    (NamedKey::Delete, DELETE),
    (NamedKey::Insert, INSERT),
];

pub const fn named_keysym(key: NamedKey) -> u32 {
    match key {
        NamedKey::Enter => RETURN,
        NamedKey::Backspace => BACKSPACE,
        NamedKey::Escape => ESCAPE,
        NamedKey::Tab => TAB,
        NamedKey::Space => SPACE,
        NamedKey::Left => LEFT,
        NamedKey::Up => UP,
        NamedKey::Right => RIGHT,
        NamedKey::Down => DOWN,
        NamedKey::PageUp => PAGE_UP,
        NamedKey::PageDown => PAGE_DOWN,
        NamedKey::Home => HOME,
        NamedKey::End => END,
        NamedKey::Delete => DELETE,
        NamedKey::Insert => INSERT,
    }
}

/// Punctuation key as (unshifted, shifted) characters on a US layout.
pub const fn oem_pair(key: OemKey) -> (char, char) {
    match key {
        OemKey::Semicolon => (';', ':'),
        OemKey::Equals => ('=', '+'),
        OemKey::Comma => (',', '<'),
        OemKey::Minus => ('-', '_'),
        OemKey::Period => ('.', '>'),
        OemKey::Slash => ('/', '?'),
        OemKey::Backtick => ('`', '~'),
        OemKey::LeftBracket => ('[', '{'),
        OemKey::Backslash => ('\\', '|'),
        OemKey::RightBracket => (']', '}'),
        OemKey::Quote => ('\'', '"'),
    }
}

/// Human-readable name of a canonical key, for logs.
pub fn keysym_name(key: CanonicalKey) -> Option<&'static str> {
    match key.code() {
        SPACE => Some("space"),
        RETURN => Some("Return"),
        BACKSPACE => Some("BackSpace"),
        ESCAPE => Some("Escape"),
        TAB => Some("Tab"),
        LEFT => Some("Left"),
        UP => Some("Up"),
        RIGHT => Some("Right"),
        DOWN => Some("Down"),
        PAGE_UP => Some("Page_Up"),
        PAGE_DOWN => Some("Page_Down"),
        HOME => Some("Home"),
        END => Some("End"),
        DELETE => Some("Delete"),
        INSERT => Some("Insert"),
        code @ F1..=F12 => FUNCTION_KEY_NAMES.get((code - F1) as usize).copied(),
        _ => None,
    }
}

pub fn name_to_keysym(name: &str) -> Option<CanonicalKey> {
    // Reverse search; the named range is small.
    NAMED_KEYSYMS
        .iter()
        .map(|(_, code)| *code)
        .chain((0..u32::from(FUNCTION_KEY_COUNT)).map(|i| F1 + i))
        .map(CanonicalKey::new)
        .find(|key| keysym_name(*key) == Some(name))
}

/// Formats a canonical key for logs: the keysym name, the printable
/// character, or the hex code.
pub fn describe(key: CanonicalKey) -> String {
    if let Some(name) = keysym_name(key) {
        return name.to_string();
    }
    match char::from_u32(key.code()) {
        Some(c) if c.is_ascii_graphic() => c.to_string(),
        _ => format!("{:#06x}", key.code()),
    }
}
