//! Native key + modifier flags to the engine's canonical key space.

use crate::keysym;
use crate::native::{NativeKey, NativeModifiers};
use crate::types::{CanonicalKey, CanonicalModifiers};

/// Translates one native keystroke.
///
/// Pure and total: keys outside the known tables yield
/// [`CanonicalKey::NO_MAPPING`]. Modifiers only pick the letter case and the
/// shifted punctuation variant, never the table a key belongs to.
pub fn translate(key: NativeKey, modifiers: NativeModifiers) -> (CanonicalKey, CanonicalModifiers) {
    let mods = translate_modifiers(modifiers);
    (translate_key(key, mods.contains(CanonicalModifiers::SHIFT)), mods)
}

/// Collapses left/right/generic variants into one bit each.
///
/// Meta and Caps Lock have no canonical bit.
pub fn translate_modifiers(modifiers: NativeModifiers) -> CanonicalModifiers {
    let mut mods = CanonicalModifiers::empty();
    if modifiers.intersects(NativeModifiers::ANY_SHIFT) {
        mods |= CanonicalModifiers::SHIFT;
    }
    if modifiers.intersects(NativeModifiers::ANY_CONTROL) {
        mods |= CanonicalModifiers::CONTROL;
    }
    if modifiers.intersects(NativeModifiers::ANY_ALT) {
        mods |= CanonicalModifiers::ALT;
    }
    mods
}

pub fn translate_key(key: NativeKey, shift: bool) -> CanonicalKey {
    match key {
        NativeKey::Named(named) => CanonicalKey::new(keysym::named_keysym(named)),
        NativeKey::Letter(c @ b'A'..=b'Z') => {
            let c = if shift { c } else { c.to_ascii_lowercase() };
            CanonicalKey::new(u32::from(c))
        }
        NativeKey::Digit(d @ 0..=9) => CanonicalKey::new(u32::from(b'0' + d)),
        NativeKey::Oem(oem) => {
            let (plain, shifted) = keysym::oem_pair(oem);
            CanonicalKey::new(u32::from(if shift { shifted } else { plain }))
        }
        NativeKey::Function(n @ 1..=keysym::FUNCTION_KEY_COUNT) => {
            CanonicalKey::new(keysym::F1 + u32::from(n - 1))
        }
        _ => CanonicalKey::NO_MAPPING,
    }
}
