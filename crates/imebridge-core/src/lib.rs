pub mod config;
pub mod decider;
pub mod error;
pub mod keysym;
pub mod native;
pub mod platform;
pub mod positioner;
pub mod session;
pub mod translator;
pub mod types;

pub use config::{Config, SessionConfig};
pub use decider::{intercept_reason, should_intercept, InterceptReason};
pub use error::{Error, Result};
pub use native::{NativeKey, NativeKeyEvent, NativeModifiers};
pub use positioner::{position, PanelPositioner, PositionerConfig, WorkAreaProvider};
pub use session::{CompositionEngine, EngineResponse, Session, SessionHandle, SessionState};
pub use translator::translate;
pub use types::{
    CanonicalKey, CanonicalModifiers, CursorAnchor, KeyAction, PanelOrigin, PanelSize, SessionMode,
    WorkArea,
};
