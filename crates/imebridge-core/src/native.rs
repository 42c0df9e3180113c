//! The single native key space shared by both host frameworks.
//!
//! Platform adapters in [`crate::platform`] map their own integer codes into
//! [`NativeKey`] and [`NativeModifiers`]; everything downstream only sees these
//! types.

use crate::types::KeyEdge;

/// Keys with a fixed, modifier-independent canonical code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Backspace,
    Escape,
    Tab,
    Space,
    Left,
    Up,
    Right,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Insert,
}

impl NamedKey {
    pub const ALL: [NamedKey; 15] = [
        NamedKey::Enter,
        NamedKey::Backspace,
        NamedKey::Escape,
        NamedKey::Tab,
        NamedKey::Space,
        NamedKey::Left,
        NamedKey::Up,
        NamedKey::Right,
        NamedKey::Down,
        NamedKey::PageUp,
        NamedKey::PageDown,
        NamedKey::Home,
        NamedKey::End,
        NamedKey::Delete,
        NamedKey::Insert,
    ];

    pub const fn is_arrow(self) -> bool {
        matches!(self, Self::Left | Self::Up | Self::Right | Self::Down)
    }

    pub const fn is_paging(self) -> bool {
        matches!(self, Self::PageUp | Self::PageDown)
    }
}

/// US-layout punctuation keys ("OEM" keys on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OemKey {
    Semicolon,
    Equals,
    Comma,
    Minus,
    Period,
    Slash,
    Backtick,
    LeftBracket,
    Backslash,
    RightBracket,
    Quote,
}

impl OemKey {
    pub const ALL: [OemKey; 11] = [
        OemKey::Semicolon,
        OemKey::Equals,
        OemKey::Comma,
        OemKey::Minus,
        OemKey::Period,
        OemKey::Slash,
        OemKey::Backtick,
        OemKey::LeftBracket,
        OemKey::Backslash,
        OemKey::RightBracket,
        OemKey::Quote,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Shift,
    Control,
    Alt,
    /// Windows key / Command key.
    Meta,
    CapsLock,
}

/// Which physical key of a left/right pair, when the host tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierKey {
    pub kind: ModifierKind,
    pub side: Side,
}

impl ModifierKey {
    pub const fn new(kind: ModifierKind, side: Side) -> Self {
        Self { kind, side }
    }
}

/// A physical key, independent of the host framework that reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKey {
    /// Uppercase ASCII letter identifier, `b'A'..=b'Z'`.
    Letter(u8),
    /// Main-row digit, `0..=9`.
    Digit(u8),
    Oem(OemKey),
    /// Function key by number, `F1` is `1`.
    Function(u8),
    Named(NamedKey),
    Modifier(ModifierKey),
    /// Anything the adapters do not classify, with the raw platform code.
    Other(u32),
}

impl NativeKey {
    /// Builds a letter key from any ASCII letter.
    pub fn letter(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Self::Letter(c.to_ascii_uppercase() as u8))
    }

    pub fn digit(d: u8) -> Option<Self> {
        (d <= 9).then_some(Self::Digit(d))
    }

    pub const fn is_letter(self) -> bool {
        matches!(self, Self::Letter(b'A'..=b'Z'))
    }

    pub const fn is_modifier(self) -> bool {
        matches!(self, Self::Modifier(_))
    }
}

bitflags::bitflags! {
    /// Raw modifier state as the host reports it.
    ///
    /// Generic and side-specific bits are kept apart; hosts set whichever they
    /// know about. Only the translator collapses them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NativeModifiers: u32 {
        const SHIFT = 1 << 0;
        const LSHIFT = 1 << 1;
        const RSHIFT = 1 << 2;
        const CONTROL = 1 << 3;
        const LCONTROL = 1 << 4;
        const RCONTROL = 1 << 5;
        const ALT = 1 << 6;
        const LALT = 1 << 7;
        const RALT = 1 << 8;
        const META = 1 << 9;
        const LMETA = 1 << 10;
        const RMETA = 1 << 11;
        const CAPS_LOCK = 1 << 12;

        const ANY_SHIFT = Self::SHIFT.bits() | Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const ANY_CONTROL = Self::CONTROL.bits() | Self::LCONTROL.bits() | Self::RCONTROL.bits();
        const ANY_ALT = Self::ALT.bits() | Self::LALT.bits() | Self::RALT.bits();
        const ANY_META = Self::META.bits() | Self::LMETA.bits() | Self::RMETA.bits();
    }
}

impl NativeModifiers {
    pub const fn shift(self) -> bool {
        self.intersects(Self::ANY_SHIFT)
    }

    pub const fn meta(self) -> bool {
        self.intersects(Self::ANY_META)
    }
}

/// One key transition delivered by a host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeKeyEvent {
    pub key: NativeKey,
    pub modifiers: NativeModifiers,
    pub edge: KeyEdge,
}

impl NativeKeyEvent {
    pub const fn down(key: NativeKey, modifiers: NativeModifiers) -> Self {
        Self {
            key,
            modifiers,
            edge: KeyEdge::Down,
        }
    }

    pub const fn up(key: NativeKey, modifiers: NativeModifiers) -> Self {
        Self {
            key,
            modifiers,
            edge: KeyEdge::Up,
        }
    }
}
