//! Consume-or-pass decision for a single key press.

use crate::native::{NamedKey, NativeKey, NativeModifiers};
use crate::translator::translate_modifiers;
use crate::types::SessionMode;

/// Why the input method takes a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptReason {
    /// Letter typed with no composition open.
    StartComposition,
    /// Letter typed into an open composition.
    Compose,
    /// Digit 1-9 picks a candidate on the current page.
    SelectCandidate(u8),
    /// Digit 0 while composing. Forwarded verbatim as `'0'`; the engine
    /// decides what it means.
    DigitZero,
    /// Space, Enter, Escape or Backspace: commit, cancel or edit.
    Edit(NamedKey),
    /// Page Up / Page Down through the candidate list.
    Page(NamedKey),
    /// Arrow keys move the candidate highlight.
    Navigate(NamedKey),
}

/// Returns `true` when the key should go to the engine instead of the host.
pub fn should_intercept(
    key: NativeKey,
    modifiers: NativeModifiers,
    mode: SessionMode,
    composing: bool,
) -> bool {
    intercept_reason(key, modifiers, mode, composing).is_some()
}

/// The decision table, first match wins.
pub fn intercept_reason(
    key: NativeKey,
    modifiers: NativeModifiers,
    mode: SessionMode,
    composing: bool,
) -> Option<InterceptReason> {
    if key.is_modifier() {
        return None;
    }
    if mode == SessionMode::English {
        return None;
    }
    if translate_modifiers(modifiers).has_host_shortcut() {
        return None;
    }

    if !composing {
        return key
            .is_letter()
            .then_some(InterceptReason::StartComposition);
    }

    match key {
        NativeKey::Letter(b'A'..=b'Z') => Some(InterceptReason::Compose),
        NativeKey::Digit(0) => Some(InterceptReason::DigitZero),
        NativeKey::Digit(d @ 1..=9) => Some(InterceptReason::SelectCandidate(d)),
        NativeKey::Named(
            named @ (NamedKey::Space | NamedKey::Enter | NamedKey::Escape | NamedKey::Backspace),
        ) => Some(InterceptReason::Edit(named)),
        NativeKey::Named(named) if named.is_paging() => Some(InterceptReason::Page(named)),
        NativeKey::Named(named) if named.is_arrow() => Some(InterceptReason::Navigate(named)),
        _ => None,
    }
}
