use crate::config::SessionConfig;
use crate::decider::{intercept_reason, InterceptReason};
use crate::keysym;
use crate::native::{ModifierKind, NativeKey, NativeKeyEvent, NativeModifiers};
use crate::positioner::{PanelPositioner, WorkAreaProvider};
use crate::translator::translate;
use crate::types::{
    CanonicalKey, CanonicalModifiers, CursorAnchor, KeyAction, KeyEdge, PanelOrigin, PanelSize,
    SessionMode,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Read side of the session state the decision core depends on.
pub trait SessionState {
    fn current_mode(&self) -> SessionMode;
    fn is_composing(&self) -> bool;
}

/// Engine feedback for one forwarded key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineResponse {
    /// The engine handled the key. A rejected key goes back to the host.
    pub accepted: bool,
    /// A composition is open after this key.
    pub composing: bool,
    /// Text committed by this key.
    pub commit: Option<String>,
}

impl EngineResponse {
    pub fn rejected() -> Self {
        Self::default()
    }

    pub fn composing() -> Self {
        Self {
            accepted: true,
            composing: true,
            commit: None,
        }
    }

    pub fn committed(text: impl Into<String>) -> Self {
        Self {
            accepted: true,
            composing: false,
            commit: Some(text.into()),
        }
    }
}

/// The composing-input engine behind the bridge.
pub trait CompositionEngine {
    fn process_key(&mut self, key: CanonicalKey, modifiers: CanonicalModifiers) -> EngineResponse;
    /// Drops the current composition without committing it.
    fn clear_composition(&mut self);
    /// Ends the composition, returning the letters typed so far as plain
    /// text. `None` when nothing was typed.
    fn commit_raw_input(&mut self) -> Option<String>;
    fn set_ascii_mode(&mut self, ascii: bool);
}

/// Tracks a Shift press with nothing else typed before its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftTap {
    Idle,
    Armed { pressed_at: Instant },
}

/// One focused text-input session.
///
/// Owns the mode and composing flag and feeds native key events through the
/// decider, translator and engine. Callers serialize access, one event at a
/// time; use [`SessionHandle`] to share a session across threads.
pub struct Session<E> {
    engine: E,
    config: SessionConfig,
    mode: SessionMode,
    composing: bool,
    focused: bool,
    shift_tap: ShiftTap,
    on_mode_change: Option<Box<dyn Fn(SessionMode) + Send + Sync>>,
}

impl<E: CompositionEngine> Session<E> {
    pub fn new(mut engine: E, config: SessionConfig) -> Self {
        let mode = config.initial_mode;
        engine.set_ascii_mode(mode == SessionMode::English);
        Self {
            engine,
            config,
            mode,
            composing: false,
            focused: true,
            shift_tap: ShiftTap::Idle,
            on_mode_change: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_on_mode_change(&mut self, cb: impl Fn(SessionMode) + Send + Sync + 'static) {
        self.on_mode_change = Some(Box::new(cb));
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn composing(&self) -> bool {
        self.composing
    }

    pub fn set_mode(&mut self, mode: SessionMode) {
        if self.mode == mode {
            return;
        }
        if self.composing {
            debug!("Dropping open composition before mode switch");
            self.engine.clear_composition();
            self.composing = false;
        }
        self.engine.set_ascii_mode(mode == SessionMode::English);
        self.mode = mode;
        info!("Session mode switched to {:?}", mode);
        if let Some(ref cb) = self.on_mode_change {
            cb(mode);
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Focus moved into (`true`) or out of (`false`) the text field.
    pub fn focus_changed(&mut self, focused: bool) {
        self.focused = focused;
        self.shift_tap = ShiftTap::Idle;
        if !focused && self.composing {
            debug!("Focus lost, aborting composition");
            self.engine.clear_composition();
            self.composing = false;
        }
    }

    pub fn process_key(&mut self, event: NativeKeyEvent) -> KeyAction {
        self.process_key_at(event, Instant::now())
    }

    /// [`Session::process_key`] with an explicit event time, for hosts that
    /// timestamp events themselves.
    pub fn process_key_at(&mut self, event: NativeKeyEvent, now: Instant) -> KeyAction {
        if !self.focused {
            return KeyAction::Pass;
        }
        match event.edge {
            KeyEdge::Down => self.key_down(event.key, event.modifiers, now),
            KeyEdge::Up => self.key_up(event.key, now),
        }
    }

    fn key_down(&mut self, key: NativeKey, modifiers: NativeModifiers, now: Instant) -> KeyAction {
        self.track_shift_down(key, modifiers, now);

        // Win / Command chords belong to the host like Control and Alt.
        if modifiers.meta() {
            return KeyAction::Pass;
        }

        let Some(reason) = intercept_reason(key, modifiers, self.mode, self.composing) else {
            return KeyAction::Pass;
        };

        let (code, mods) = translate(key, modifiers);
        if !code.is_mapped() {
            return KeyAction::Pass;
        }
        if reason == InterceptReason::DigitZero {
            debug!("Digit 0 while composing, forwarding as an engine command");
        }

        let response = self.engine.process_key(code, mods);
        debug!(
            "key={} mods={:?} reason={:?} -> accepted={} composing={}",
            keysym::describe(code),
            mods,
            reason,
            response.accepted,
            response.composing
        );
        self.composing = response.composing;

        if response.accepted {
            KeyAction::Consume {
                commit: response.commit,
            }
        } else {
            KeyAction::Pass
        }
    }

    fn key_up(&mut self, key: NativeKey, now: Instant) -> KeyAction {
        if !is_shift(key) {
            return KeyAction::Pass;
        }
        let tap = std::mem::replace(&mut self.shift_tap, ShiftTap::Idle);
        let ShiftTap::Armed { pressed_at } = tap else {
            return KeyAction::Pass;
        };
        if !self.config.shift_toggles_mode {
            return KeyAction::Pass;
        }
        let held = now.saturating_duration_since(pressed_at);
        if held >= Duration::from_millis(self.config.shift_tap_max_ms) {
            debug!("Shift held for {:?}, not a tap", held);
            return KeyAction::Pass;
        }

        // Typed letters go to the host as plain text before the switch.
        let commit = if self.composing {
            self.composing = false;
            self.engine.commit_raw_input()
        } else {
            None
        };
        self.toggle_mode();
        KeyAction::Consume { commit }
    }

    fn track_shift_down(&mut self, key: NativeKey, modifiers: NativeModifiers, now: Instant) {
        if is_shift(key) {
            // Auto-repeat keeps an armed tap armed with its first press time.
            let others_held = modifiers.difference(NativeModifiers::ANY_SHIFT | NativeModifiers::CAPS_LOCK);
            if others_held.is_empty() && self.shift_tap == ShiftTap::Idle {
                self.shift_tap = ShiftTap::Armed { pressed_at: now };
            }
        } else {
            self.shift_tap = ShiftTap::Idle;
        }
    }

    /// Where the candidate panel goes, or `None` while it should be hidden.
    pub fn panel_origin<P>(
        &self,
        positioner: &PanelPositioner,
        anchor: CursorAnchor,
        size: PanelSize,
        provider: &P,
    ) -> Option<PanelOrigin>
    where
        P: WorkAreaProvider + ?Sized,
    {
        (self.focused && self.composing).then(|| positioner.place(anchor, size, provider))
    }
}

impl<E: CompositionEngine> SessionState for Session<E> {
    fn current_mode(&self) -> SessionMode {
        self.mode
    }

    fn is_composing(&self) -> bool {
        self.composing
    }
}

fn is_shift(key: NativeKey) -> bool {
    matches!(key, NativeKey::Modifier(m) if m.kind == ModifierKind::Shift)
}

/// A session shared between the host's event thread and its observers.
///
/// Each call takes the lock once, so a key event always sees one consistent
/// (mode, composing) pair.
pub struct SessionHandle<E> {
    inner: Arc<Mutex<Session<E>>>,
}

impl<E> Clone for SessionHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: CompositionEngine> SessionHandle<E> {
    pub fn new(session: Session<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn process_key(&self, event: NativeKeyEvent) -> KeyAction {
        self.inner.lock().process_key(event)
    }

    pub fn process_key_at(&self, event: NativeKeyEvent, now: Instant) -> KeyAction {
        self.inner.lock().process_key_at(event, now)
    }

    /// (mode, composing) read under one lock.
    pub fn snapshot(&self) -> (SessionMode, bool) {
        let session = self.inner.lock();
        (session.mode, session.composing)
    }

    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session<E>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

/// Each accessor locks on its own, so two calls may straddle a key event.
/// Use [`SessionHandle::snapshot`] to read mode and composing together.
impl<E: CompositionEngine> SessionState for SessionHandle<E> {
    fn current_mode(&self) -> SessionMode {
        self.inner.lock().mode
    }

    fn is_composing(&self) -> bool {
        self.inner.lock().composing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{ModifierKey, NamedKey, Side};
    use crate::positioner::MonitorLayout;
    use crate::types::WorkArea;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Buffers letters, commits on Space / digits, cancels on Escape.
    #[derive(Default)]
    struct FakeEngine {
        buffer: String,
        ascii: bool,
        keys: Vec<(CanonicalKey, CanonicalModifiers)>,
        clears: usize,
    }

    impl CompositionEngine for FakeEngine {
        fn process_key(&mut self, key: CanonicalKey, modifiers: CanonicalModifiers) -> EngineResponse {
            self.keys.push((key, modifiers));
            let code = key.code();
            match char::from_u32(code) {
                Some(c) if c.is_ascii_alphabetic() => {
                    self.buffer.push(c);
                    EngineResponse::composing()
                }
                Some(c @ '1'..='9') if !self.buffer.is_empty() => {
                    let text = format!("{}#{}", self.buffer, c);
                    self.buffer.clear();
                    EngineResponse::committed(text)
                }
                Some(' ') if !self.buffer.is_empty() => {
                    let text = std::mem::take(&mut self.buffer);
                    EngineResponse::committed(text)
                }
                _ if code == keysym::ESCAPE => {
                    self.buffer.clear();
                    EngineResponse {
                        accepted: true,
                        ..EngineResponse::default()
                    }
                }
                _ if code == keysym::BACKSPACE => {
                    self.buffer.pop();
                    EngineResponse {
                        accepted: true,
                        composing: !self.buffer.is_empty(),
                        commit: None,
                    }
                }
                _ if !self.buffer.is_empty() => EngineResponse::composing(),
                _ => EngineResponse::rejected(),
            }
        }

        fn clear_composition(&mut self) {
            self.buffer.clear();
            self.clears += 1;
        }

        fn commit_raw_input(&mut self) -> Option<String> {
            let text = std::mem::take(&mut self.buffer);
            (!text.is_empty()).then_some(text)
        }

        fn set_ascii_mode(&mut self, ascii: bool) {
            self.ascii = ascii;
        }
    }

    fn session() -> Session<FakeEngine> {
        Session::new(FakeEngine::default(), SessionConfig::default())
    }

    fn press(s: &mut Session<FakeEngine>, key: NativeKey, mods: NativeModifiers) -> KeyAction {
        let action = s.process_key(NativeKeyEvent::down(key, mods));
        s.process_key(NativeKeyEvent::up(key, mods));
        action
    }

    fn type_letters(s: &mut Session<FakeEngine>, text: &str) {
        for c in text.chars() {
            let key = NativeKey::letter(c).expect("letter");
            assert!(press(s, key, NativeModifiers::empty()).is_consumed());
        }
    }

    const LSHIFT_KEY: NativeKey = NativeKey::Modifier(ModifierKey {
        kind: ModifierKind::Shift,
        side: Side::Left,
    });

    #[test]
    fn test_compose_and_commit_with_space() {
        let mut s = session();
        type_letters(&mut s, "nihao");
        assert!(s.composing());

        let action = press(&mut s, NativeKey::Named(NamedKey::Space), NativeModifiers::empty());
        assert_eq!(
            action,
            KeyAction::Consume {
                commit: Some("nihao".to_string())
            }
        );
        assert!(!s.composing());

        // Space with nothing composed goes to the host.
        let action = press(&mut s, NativeKey::Named(NamedKey::Space), NativeModifiers::empty());
        assert_eq!(action, KeyAction::Pass);
    }

    #[test]
    fn test_candidate_selection_only_while_composing() {
        let mut s = session();
        assert_eq!(press(&mut s, NativeKey::Digit(2), NativeModifiers::empty()), KeyAction::Pass);
        type_letters(&mut s, "ma");
        let action = press(&mut s, NativeKey::Digit(2), NativeModifiers::empty());
        assert_eq!(
            action,
            KeyAction::Consume {
                commit: Some("ma#2".to_string())
            }
        );
    }

    #[test]
    fn test_digit_zero_forwarded_verbatim() {
        let mut s = session();
        type_letters(&mut s, "a");
        assert!(press(&mut s, NativeKey::Digit(0), NativeModifiers::empty()).is_consumed());
        let (key, _) = *s.engine().keys.last().expect("forwarded");
        assert_eq!(key.code(), u32::from(b'0'));
    }

    #[test]
    fn test_shift_letter_forwards_uppercase() {
        let mut s = session();
        press(&mut s, NativeKey::Letter(b'H'), NativeModifiers::LSHIFT);
        let (key, mods) = s.engine().keys[0];
        assert_eq!(key.code(), u32::from(b'H'));
        assert_eq!(mods, CanonicalModifiers::SHIFT);
    }

    #[test]
    fn test_host_shortcuts_pass() {
        let mut s = session();
        for mods in [NativeModifiers::LCONTROL, NativeModifiers::RALT, NativeModifiers::LMETA] {
            assert_eq!(press(&mut s, NativeKey::Letter(b'C'), mods), KeyAction::Pass);
        }
        assert!(s.engine().keys.is_empty());
    }

    #[test]
    fn test_escape_cancels() {
        let mut s = session();
        type_letters(&mut s, "zhong");
        let action = press(&mut s, NativeKey::Named(NamedKey::Escape), NativeModifiers::empty());
        assert_eq!(action, KeyAction::consumed());
        assert!(!s.composing());
    }

    #[test]
    fn test_backspace_empties_composition() {
        let mut s = session();
        type_letters(&mut s, "a");
        assert!(press(&mut s, NativeKey::Named(NamedKey::Backspace), NativeModifiers::empty()).is_consumed());
        assert!(!s.composing());
        assert_eq!(
            press(&mut s, NativeKey::Named(NamedKey::Backspace), NativeModifiers::empty()),
            KeyAction::Pass
        );
    }

    #[test]
    fn test_rejected_key_passes() {
        let mut s = session();
        type_letters(&mut s, "a");
        s.engine_mut().buffer.clear();
        // The engine no longer has a composition and refuses Enter.
        assert_eq!(
            press(&mut s, NativeKey::Named(NamedKey::Enter), NativeModifiers::empty()),
            KeyAction::Pass
        );
        assert!(!s.composing());
    }

    #[test]
    fn test_shift_tap_toggles_mode() {
        let mut s = session();
        let changes = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&changes);
        s.set_on_mode_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(s.process_key(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT)), KeyAction::Pass);
        // Auto-repeat.
        s.process_key(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT));
        let action = s.process_key(NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::empty()));
        assert_eq!(action, KeyAction::consumed());
        assert_eq!(s.mode(), SessionMode::English);
        assert!(s.engine().ascii);
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        // English mode: letters go to the host.
        assert_eq!(press(&mut s, NativeKey::Letter(b'A'), NativeModifiers::empty()), KeyAction::Pass);
    }

    #[test]
    fn test_long_shift_hold_does_not_toggle() {
        let mut s = session();
        let t0 = Instant::now();
        s.process_key_at(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT), t0);
        for i in 1..=50u64 {
            let t = t0 + Duration::from_millis(30 * i);
            s.process_key_at(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT), t);
        }
        let action = s.process_key_at(
            NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::empty()),
            t0 + Duration::from_millis(1600),
        );
        assert_eq!(action, KeyAction::Pass);
        assert_eq!(s.mode(), SessionMode::Chinese);

        // Released just inside the window still counts as a tap.
        let t1 = t0 + Duration::from_secs(5);
        s.process_key_at(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT), t1);
        let action = s.process_key_at(
            NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::empty()),
            t1 + Duration::from_millis(499),
        );
        assert_eq!(action, KeyAction::consumed());
        assert_eq!(s.mode(), SessionMode::English);
    }

    #[test]
    fn test_shift_tap_window_is_configurable() {
        let config = SessionConfig {
            shift_tap_max_ms: 100,
            ..SessionConfig::default()
        };
        let mut s = Session::new(FakeEngine::default(), config);
        let t0 = Instant::now();
        s.process_key_at(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT), t0);
        let action = s.process_key_at(
            NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::empty()),
            t0 + Duration::from_millis(150),
        );
        assert_eq!(action, KeyAction::Pass);
        assert_eq!(s.mode(), SessionMode::Chinese);
    }

    #[test]
    fn test_shift_tap_while_composing_commits_raw_input() {
        let mut s = session();
        type_letters(&mut s, "ni");
        assert!(s.composing());

        s.process_key(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT));
        let action = s.process_key(NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::empty()));
        assert_eq!(
            action,
            KeyAction::Consume {
                commit: Some("ni".to_string())
            }
        );
        assert!(!s.composing());
        assert_eq!(s.mode(), SessionMode::English);
        assert!(s.engine().buffer.is_empty());
        // Committed, not cleared.
        assert_eq!(s.engine().clears, 0);
    }

    #[test]
    fn test_shift_chord_does_not_toggle() {
        let mut s = session();
        s.process_key(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT));
        s.process_key(NativeKeyEvent::down(NativeKey::Letter(b'A'), NativeModifiers::LSHIFT));
        s.process_key(NativeKeyEvent::up(NativeKey::Letter(b'A'), NativeModifiers::LSHIFT));
        let action = s.process_key(NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::empty()));
        assert_eq!(action, KeyAction::Pass);
        assert_eq!(s.mode(), SessionMode::Chinese);

        // Ctrl+Shift is a host shortcut, not a tap.
        s.process_key(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT | NativeModifiers::LCONTROL));
        let action = s.process_key(NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::LCONTROL));
        assert_eq!(action, KeyAction::Pass);
        assert_eq!(s.mode(), SessionMode::Chinese);
    }

    #[test]
    fn test_shift_toggle_can_be_disabled() {
        let config = SessionConfig {
            shift_toggles_mode: false,
            ..SessionConfig::default()
        };
        let mut s = Session::new(FakeEngine::default(), config);
        s.process_key(NativeKeyEvent::down(LSHIFT_KEY, NativeModifiers::LSHIFT));
        let action = s.process_key(NativeKeyEvent::up(LSHIFT_KEY, NativeModifiers::empty()));
        assert_eq!(action, KeyAction::Pass);
        assert_eq!(s.mode(), SessionMode::Chinese);
    }

    #[test]
    fn test_mode_switch_clears_composition() {
        let mut s = session();
        type_letters(&mut s, "pin");
        s.set_mode(SessionMode::English);
        assert!(!s.composing());
        assert_eq!(s.engine().clears, 1);
        assert!(s.engine().buffer.is_empty());

        // Same mode again is a no-op.
        s.set_mode(SessionMode::English);
        assert_eq!(s.engine().clears, 1);
    }

    #[test]
    fn test_focus_loss_aborts_and_passes() {
        let mut s = session();
        type_letters(&mut s, "ab");
        s.focus_changed(false);
        assert!(!s.composing());
        assert_eq!(press(&mut s, NativeKey::Letter(b'C'), NativeModifiers::empty()), KeyAction::Pass);
        s.focus_changed(true);
        assert!(press(&mut s, NativeKey::Letter(b'C'), NativeModifiers::empty()).is_consumed());
    }

    #[test]
    fn test_initial_english_mode() {
        let config = SessionConfig {
            initial_mode: SessionMode::English,
            ..SessionConfig::default()
        };
        let s = Session::new(FakeEngine::default(), config);
        assert_eq!(s.current_mode(), SessionMode::English);
        assert!(s.engine().ascii);
    }

    #[test]
    fn test_panel_only_while_composing() {
        let mut s = session();
        let layout = MonitorLayout::new(vec![crate::positioner::Monitor::new(
            WorkArea::new(0, 0, 1920, 1080),
            WorkArea::new(0, 0, 1920, 1040),
        )]);
        let positioner = PanelPositioner::default();
        let anchor = CursorAnchor::new(1800, 1000, 20);
        let size = PanelSize::new(300, 120);

        assert_eq!(s.panel_origin(&positioner, anchor, size, &layout), None);
        type_letters(&mut s, "x");
        assert_eq!(
            s.panel_origin(&positioner, anchor, size, &layout),
            Some(PanelOrigin::new(1620, 875))
        );
    }

    #[test]
    fn test_handle_snapshot() {
        let handle = SessionHandle::new(session());
        let other = handle.clone();
        handle.process_key(NativeKeyEvent::down(NativeKey::Letter(b'A'), NativeModifiers::empty()));
        assert_eq!(other.snapshot(), (SessionMode::Chinese, true));
        assert!(other.is_composing());
        other.with_session(|s| s.set_mode(SessionMode::English));
        assert_eq!(handle.current_mode(), SessionMode::English);
        assert!(!handle.is_composing());
    }
}
