//! Windows virtual-key codes (as delivered to TSF key sinks).

use crate::native::{ModifierKey, ModifierKind, NamedKey, NativeKey, NativeModifiers, OemKey, Side};

pub const VK_BACK: u16 = 0x08;
pub const VK_TAB: u16 = 0x09;
pub const VK_RETURN: u16 = 0x0D;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_CAPITAL: u16 = 0x14;
pub const VK_ESCAPE: u16 = 0x1B;
pub const VK_SPACE: u16 = 0x20;
pub const VK_PRIOR: u16 = 0x21;
pub const VK_NEXT: u16 = 0x22;
pub const VK_END: u16 = 0x23;
pub const VK_HOME: u16 = 0x24;
pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;
pub const VK_INSERT: u16 = 0x2D;
pub const VK_DELETE: u16 = 0x2E;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_RWIN: u16 = 0x5C;
pub const VK_F1: u16 = 0x70;
pub const VK_F24: u16 = 0x87;
pub const VK_LSHIFT: u16 = 0xA0;
pub const VK_RSHIFT: u16 = 0xA1;
pub const VK_LCONTROL: u16 = 0xA2;
pub const VK_RCONTROL: u16 = 0xA3;
pub const VK_LMENU: u16 = 0xA4;
pub const VK_RMENU: u16 = 0xA5;
pub const VK_OEM_1: u16 = 0xBA;
pub const VK_OEM_PLUS: u16 = 0xBB;
pub const VK_OEM_COMMA: u16 = 0xBC;
pub const VK_OEM_MINUS: u16 = 0xBD;
pub const VK_OEM_PERIOD: u16 = 0xBE;
pub const VK_OEM_2: u16 = 0xBF;
pub const VK_OEM_3: u16 = 0xC0;
pub const VK_OEM_4: u16 = 0xDB;
pub const VK_OEM_5: u16 = 0xDC;
pub const VK_OEM_6: u16 = 0xDD;
pub const VK_OEM_7: u16 = 0xDE;

/// Scan code of the right Shift key; generic `VK_SHIFT` does not say which.
const SC_RSHIFT: u16 = 0x36;

/// Maps a virtual key to the native key space.
///
/// `scan_code` and `extended` come from the key message's `lParam` and are
/// only used to tell left from right for the generic modifier codes.
pub fn from_virtual_key(vk: u16, scan_code: u16, extended: bool) -> NativeKey {
    let side_by_ext = if extended { Side::Right } else { Side::Left };
    match vk {
        0x41..=0x5A => NativeKey::Letter(vk as u8),
        0x30..=0x39 => NativeKey::Digit((vk - 0x30) as u8),
        VK_F1..=VK_F24 => NativeKey::Function((vk - VK_F1 + 1) as u8),

        VK_RETURN => NativeKey::Named(NamedKey::Enter),
        VK_BACK => NativeKey::Named(NamedKey::Backspace),
        VK_ESCAPE => NativeKey::Named(NamedKey::Escape),
        VK_TAB => NativeKey::Named(NamedKey::Tab),
        VK_SPACE => NativeKey::Named(NamedKey::Space),
        VK_LEFT => NativeKey::Named(NamedKey::Left),
        VK_UP => NativeKey::Named(NamedKey::Up),
        VK_RIGHT => NativeKey::Named(NamedKey::Right),
        VK_DOWN => NativeKey::Named(NamedKey::Down),
        VK_PRIOR => NativeKey::Named(NamedKey::PageUp),
        VK_NEXT => NativeKey::Named(NamedKey::PageDown),
        VK_HOME => NativeKey::Named(NamedKey::Home),
        VK_END => NativeKey::Named(NamedKey::End),
        VK_DELETE => NativeKey::Named(NamedKey::Delete),
        VK_INSERT => NativeKey::Named(NamedKey::Insert),

        VK_OEM_1 => NativeKey::Oem(OemKey::Semicolon),
        VK_OEM_PLUS => NativeKey::Oem(OemKey::Equals),
        VK_OEM_COMMA => NativeKey::Oem(OemKey::Comma),
        VK_OEM_MINUS => NativeKey::Oem(OemKey::Minus),
        VK_OEM_PERIOD => NativeKey::Oem(OemKey::Period),
        VK_OEM_2 => NativeKey::Oem(OemKey::Slash),
        VK_OEM_3 => NativeKey::Oem(OemKey::Backtick),
        VK_OEM_4 => NativeKey::Oem(OemKey::LeftBracket),
        VK_OEM_5 => NativeKey::Oem(OemKey::Backslash),
        VK_OEM_6 => NativeKey::Oem(OemKey::RightBracket),
        VK_OEM_7 => NativeKey::Oem(OemKey::Quote),

        VK_SHIFT => {
            let side = if scan_code == SC_RSHIFT { Side::Right } else { Side::Left };
            modifier(ModifierKind::Shift, side)
        }
        VK_LSHIFT => modifier(ModifierKind::Shift, Side::Left),
        VK_RSHIFT => modifier(ModifierKind::Shift, Side::Right),
        VK_CONTROL => modifier(ModifierKind::Control, side_by_ext),
        VK_LCONTROL => modifier(ModifierKind::Control, Side::Left),
        VK_RCONTROL => modifier(ModifierKind::Control, Side::Right),
        VK_MENU => modifier(ModifierKind::Alt, side_by_ext),
        VK_LMENU => modifier(ModifierKind::Alt, Side::Left),
        VK_RMENU => modifier(ModifierKind::Alt, Side::Right),
        VK_LWIN => modifier(ModifierKind::Meta, Side::Left),
        VK_RWIN => modifier(ModifierKind::Meta, Side::Right),
        VK_CAPITAL => modifier(ModifierKind::CapsLock, Side::Either),

        other => NativeKey::Other(u32::from(other)),
    }
}

fn modifier(kind: ModifierKind, side: Side) -> NativeKey {
    NativeKey::Modifier(ModifierKey::new(kind, side))
}

/// Builds the modifier state from a key-state probe.
///
/// `is_down(vk)` reports whether a key is held; `VK_CAPITAL` is probed for its
/// toggle state instead.
pub fn modifiers_from_key_state(is_down: impl Fn(u16) -> bool) -> NativeModifiers {
    const PROBES: [(u16, NativeModifiers); 12] = [
        (VK_SHIFT, NativeModifiers::SHIFT),
        (VK_LSHIFT, NativeModifiers::LSHIFT),
        (VK_RSHIFT, NativeModifiers::RSHIFT),
        (VK_CONTROL, NativeModifiers::CONTROL),
        (VK_LCONTROL, NativeModifiers::LCONTROL),
        (VK_RCONTROL, NativeModifiers::RCONTROL),
        (VK_MENU, NativeModifiers::ALT),
        (VK_LMENU, NativeModifiers::LALT),
        (VK_RMENU, NativeModifiers::RALT),
        (VK_LWIN, NativeModifiers::LMETA),
        (VK_RWIN, NativeModifiers::RMETA),
        (VK_CAPITAL, NativeModifiers::CAPS_LOCK),
    ];
    PROBES
        .iter()
        .filter(|(vk, _)| is_down(*vk))
        .fold(NativeModifiers::empty(), |acc, (_, bit)| acc | *bit)
}

#[cfg(windows)]
pub use live::{current_modifiers, MonitorWorkAreas};

#[cfg(windows)]
mod live {
    use super::{modifiers_from_key_state, VK_CAPITAL};
    use crate::native::NativeModifiers;
    use crate::positioner::WorkAreaProvider;
    use crate::types::WorkArea;
    use tracing::warn;
    use ::windows::Win32::Foundation::POINT;
    use ::windows::Win32::Graphics::Gdi::{
        GetMonitorInfoW, MonitorFromPoint, MONITORINFO, MONITOR_DEFAULTTONEAREST,
    };
    use ::windows::Win32::UI::Input::KeyboardAndMouse::GetKeyState;

    /// Modifier state of the thread handling the current key message.
    pub fn current_modifiers() -> NativeModifiers {
        modifiers_from_key_state(|vk| {
            let state = unsafe { GetKeyState(i32::from(vk)) } as u16;
            if vk == VK_CAPITAL {
                state & 0x0001 != 0
            } else {
                state & 0x8000 != 0
            }
        })
    }

    /// Work areas straight from the desktop, queried on every call.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct MonitorWorkAreas;

    impl WorkAreaProvider for MonitorWorkAreas {
        fn work_area_at(&self, x: i32, y: i32) -> Option<WorkArea> {
            unsafe {
                let monitor = MonitorFromPoint(POINT { x, y }, MONITOR_DEFAULTTONEAREST);
                if monitor.is_invalid() {
                    warn!("No monitor found for ({}, {})", x, y);
                    return None;
                }
                let mut info = MONITORINFO {
                    cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                    ..Default::default()
                };
                if !GetMonitorInfoW(monitor, &mut info).as_bool() {
                    warn!("GetMonitorInfoW failed for ({}, {})", x, y);
                    return None;
                }
                let rc = info.rcWork;
                Some(WorkArea::new(rc.left, rc.top, rc.right, rc.bottom))
            }
        }
    }
}
