use imebridge_core::native::NativeKeyEvent;
use imebridge_core::platform::{macos, windows};
use imebridge_core::positioner::{Monitor, MonitorLayout};
use imebridge_core::{
    CanonicalKey, CanonicalModifiers, CompositionEngine, CursorAnchor, EngineResponse, KeyAction,
    NativeModifiers, PanelOrigin, PanelPositioner, PanelSize, Session, SessionConfig,
    SessionHandle, SessionMode, WorkArea,
};
use std::time::{Duration, Instant};

/// Records everything it is sent and keeps a plain pinyin buffer.
#[derive(Default)]
struct RecordingEngine {
    buffer: String,
    seen: Vec<u32>,
}

impl CompositionEngine for RecordingEngine {
    fn process_key(&mut self, key: CanonicalKey, _modifiers: CanonicalModifiers) -> EngineResponse {
        self.seen.push(key.code());
        match char::from_u32(key.code()) {
            Some(c) if c.is_ascii_lowercase() => {
                self.buffer.push(c);
                EngineResponse::composing()
            }
            Some(c) if c.is_ascii_digit() || c == ' ' => {
                let text = format!("[{}]", std::mem::take(&mut self.buffer));
                EngineResponse::committed(text)
            }
            _ if !self.buffer.is_empty() => EngineResponse::composing(),
            _ => EngineResponse::rejected(),
        }
    }

    fn clear_composition(&mut self) {
        self.buffer.clear();
    }

    fn commit_raw_input(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.buffer);
        (!text.is_empty()).then_some(text)
    }

    fn set_ascii_mode(&mut self, _ascii: bool) {}
}

fn vk_down(vk: u16, mods: NativeModifiers) -> NativeKeyEvent {
    NativeKeyEvent::down(windows::from_virtual_key(vk, 0, false), mods)
}

fn vk_up(vk: u16, mods: NativeModifiers) -> NativeKeyEvent {
    NativeKeyEvent::up(windows::from_virtual_key(vk, 0, false), mods)
}

fn run_and_collect(handle: &SessionHandle<RecordingEngine>, events: &[NativeKeyEvent]) -> Vec<KeyAction> {
    events.iter().map(|e| handle.process_key(*e)).collect()
}

fn commits(actions: &[KeyAction]) -> Vec<String> {
    actions
        .iter()
        .filter_map(|a| match a {
            KeyAction::Consume { commit: Some(text) } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn windows_stream_composes_pages_and_commits() {
    let handle = SessionHandle::new(Session::new(RecordingEngine::default(), SessionConfig::default()));
    let none = NativeModifiers::empty();

    let actions = run_and_collect(
        &handle,
        &[
            vk_down(0x4E, none), // N
            vk_up(0x4E, none),
            vk_down(0x49, none), // I
            vk_up(0x49, none),
            vk_down(windows::VK_NEXT, none), // page down
            vk_up(windows::VK_NEXT, none),
            vk_down(windows::VK_RIGHT, none),
            vk_up(windows::VK_RIGHT, none),
            vk_down(0x33, none), // 3
            vk_up(0x33, none),
            vk_down(0x33, none), // 3 again, nothing composing
        ],
    );

    let consumed: Vec<bool> = actions.iter().map(KeyAction::is_consumed).collect();
    assert_eq!(
        consumed,
        vec![true, false, true, false, true, false, true, false, true, false, false]
    );
    assert_eq!(commits(&actions), vec!["[ni]".to_string()]);

    let seen = handle.with_session(|s| s.engine().seen.clone());
    assert_eq!(seen, vec![u32::from(b'n'), u32::from(b'i'), 0xff56, 0xff53, u32::from(b'3')]);
}

#[test]
fn shift_tap_mid_composition_commits_pinyin_then_switches() {
    let handle = SessionHandle::new(Session::new(RecordingEngine::default(), SessionConfig::default()));
    let none = NativeModifiers::empty();
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    for (i, vk) in [0x4Eu16, 0x49].into_iter().enumerate() {
        let ms = 40 * i as u64;
        handle.process_key_at(vk_down(vk, none), at(ms));
        handle.process_key_at(vk_up(vk, none), at(ms + 20));
    }

    // Held past the tap window: nothing changes.
    handle.process_key_at(vk_down(windows::VK_LSHIFT, NativeModifiers::LSHIFT), at(100));
    handle.process_key_at(vk_down(windows::VK_LSHIFT, NativeModifiers::LSHIFT), at(400));
    let action = handle.process_key_at(vk_up(windows::VK_LSHIFT, none), at(900));
    assert_eq!(action, KeyAction::Pass);
    assert_eq!(handle.snapshot(), (SessionMode::Chinese, true));

    // A quick tap hands the raw letters to the host and switches.
    handle.process_key_at(vk_down(windows::VK_LSHIFT, NativeModifiers::LSHIFT), at(1000));
    let action = handle.process_key_at(vk_up(windows::VK_LSHIFT, none), at(1080));
    assert_eq!(
        action,
        KeyAction::Consume {
            commit: Some("ni".to_string())
        }
    );
    assert_eq!(handle.snapshot(), (SessionMode::English, false));
    assert!(handle.with_session(|s| s.engine().buffer.is_empty()));
}

#[test]
fn control_chord_never_reaches_engine() {
    let handle = SessionHandle::new(Session::new(RecordingEngine::default(), SessionConfig::default()));
    let ctrl = windows::modifiers_from_key_state(|vk| vk == windows::VK_CONTROL || vk == windows::VK_LCONTROL);

    let actions = run_and_collect(
        &handle,
        &[
            vk_down(windows::VK_LCONTROL, ctrl),
            vk_down(0x43, ctrl), // C
            vk_up(0x43, ctrl),
            vk_up(windows::VK_LCONTROL, NativeModifiers::empty()),
        ],
    );
    assert!(actions.iter().all(|a| *a == KeyAction::Pass));
    assert!(handle.with_session(|s| s.engine().seen.is_empty()));
}

#[test]
fn shift_tap_from_mac_switches_to_english() {
    let handle = SessionHandle::new(Session::new(RecordingEngine::default(), SessionConfig::default()));
    let shift_flags = macos::modifiers_from_flags(macos::NS_SHIFT | macos::NX_DEVICE_LSHIFT);

    handle.process_key(NativeKeyEvent::down(macos::from_key_code(macos::KVK_SHIFT), shift_flags));
    let action = handle.process_key(NativeKeyEvent::up(
        macos::from_key_code(macos::KVK_SHIFT),
        NativeModifiers::empty(),
    ));
    assert_eq!(action, KeyAction::consumed());
    assert_eq!(handle.snapshot(), (SessionMode::English, false));

    // 'a' on macOS is key code 0x00; it now goes straight to the host.
    let action = handle.process_key(NativeKeyEvent::down(macos::from_key_code(0x00), NativeModifiers::empty()));
    assert_eq!(action, KeyAction::Pass);
}

#[test]
fn panel_follows_cursor_across_monitors() {
    let handle = SessionHandle::new(Session::new(RecordingEngine::default(), SessionConfig::default()));
    let layout = MonitorLayout::new(vec![
        Monitor::new(WorkArea::new(0, 0, 2560, 1440), WorkArea::new(0, 0, 2560, 1400)),
        Monitor::new(WorkArea::new(-1920, 200, 0, 1280), WorkArea::new(-1920, 200, 0, 1280)),
    ]);
    let positioner = PanelPositioner::default();
    let size = PanelSize::new(320, 180);

    handle.process_key(vk_down(0x48, NativeModifiers::empty())); // H

    let on_primary = handle.with_session(|s| {
        s.panel_origin(&positioner, CursorAnchor::new(2500, 100, 24), size, &layout)
    });
    assert_eq!(on_primary, Some(PanelOrigin::new(2240, 126)));

    // Bottom-right of the left monitor: clamp right to x = 0 and flip up.
    let on_left = handle.with_session(|s| {
        s.panel_origin(&positioner, CursorAnchor::new(-20, 1250, 24), size, &layout)
    });
    assert_eq!(on_left, Some(PanelOrigin::new(-320, 1065)));
}
