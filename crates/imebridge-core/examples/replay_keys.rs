//! Replays a typed sequence of Windows virtual keys through a session and
//! prints what the host would be told, plus where the panel would go.

use imebridge_core::keysym;
use imebridge_core::platform::windows;
use imebridge_core::positioner::{Monitor, MonitorLayout};
use imebridge_core::{
    CanonicalKey, CanonicalModifiers, CompositionEngine, Config, CursorAnchor, EngineResponse,
    KeyAction, NativeKeyEvent, NativeModifiers, PanelPositioner, PanelSize, Session, WorkArea,
};
use std::path::Path;

/// Echo engine: composes letters, commits on Space or a digit.
#[derive(Default)]
struct EchoEngine {
    buffer: String,
}

impl CompositionEngine for EchoEngine {
    fn process_key(&mut self, key: CanonicalKey, _modifiers: CanonicalModifiers) -> EngineResponse {
        match char::from_u32(key.code()) {
            Some(c) if c.is_ascii_alphabetic() => {
                self.buffer.push(c);
                EngineResponse::composing()
            }
            Some(c) if (c == ' ' || c.is_ascii_digit()) && !self.buffer.is_empty() => {
                EngineResponse::committed(std::mem::take(&mut self.buffer))
            }
            _ if key.code() == keysym::ESCAPE => {
                self.buffer.clear();
                EngineResponse {
                    accepted: true,
                    ..EngineResponse::default()
                }
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

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    println!("Using {:?}", config);

    let mut session = Session::new(EchoEngine::default(), config.session.clone());
    session.set_on_mode_change(|mode| println!("  mode -> {:?}", mode));
    let positioner = PanelPositioner::new(config.positioner.clone());
    let layout = MonitorLayout::new(vec![
        Monitor::new(WorkArea::new(0, 0, 1920, 1080), WorkArea::new(0, 0, 1920, 1040)),
        Monitor::new(WorkArea::new(-1920, 0, 0, 1080), WorkArea::new(-1920, 0, 0, 1080)),
    ]);

    // "ni", page down, pick 2, Shift tap, "ok".
    let script = [
        0x4E,
        0x49,
        windows::VK_NEXT,
        0x32,
        windows::VK_LSHIFT,
        0x4F,
        0x4B,
    ];
    let anchor = CursorAnchor::new(-40, 1050, 20);
    let size = PanelSize::new(280, 160);

    for vk in script {
        let key = windows::from_virtual_key(vk, 0, false);
        let mods = if vk == windows::VK_LSHIFT {
            NativeModifiers::LSHIFT
        } else {
            NativeModifiers::empty()
        };
        let down = session.process_key(NativeKeyEvent::down(key, mods));
        let up = session.process_key(NativeKeyEvent::up(key, NativeModifiers::empty()));
        let name = keysym::describe(imebridge_core::translate(key, mods).0);
        println!("{:>10}: down={} up={}", name, describe(&down), describe(&up));
        if let Some(origin) = session.panel_origin(&positioner, anchor, size, &layout) {
            println!("            panel at ({}, {})", origin.x, origin.y);
        }
    }

    if let Some(key) = keysym::name_to_keysym("Page_Down") {
        println!("Page_Down is {:#06x}", key.code());
    }
    Ok(())
}

fn describe(action: &KeyAction) -> String {
    match action {
        KeyAction::Pass => "pass".to_string(),
        KeyAction::Consume { commit: None } => "eat".to_string(),
        KeyAction::Consume { commit: Some(text) } => format!("eat+commit({})", text),
    }
}
