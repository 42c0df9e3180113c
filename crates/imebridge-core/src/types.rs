use serde::{Deserialize, Serialize};

/// Key code in the engine's unified key space.
///
/// Printable keys carry their ASCII value, everything else a fixed keysym
/// (see [`crate::keysym`]). `0` means the native key has no mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CanonicalKey(pub u32);

impl CanonicalKey {
    pub const NO_MAPPING: Self = Self(0);

    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> u32 {
        self.0
    }

    pub const fn is_mapped(self) -> bool {
        self.0 != 0
    }
}

bitflags::bitflags! {
    /// Modifier mask handed to the engine.
    ///
    /// Bit positions follow the engine's own mask layout, which is why bit 1 is
    /// unused.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CanonicalModifiers: u32 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 2;
        const ALT = 1 << 3;
    }
}

impl CanonicalModifiers {
    /// Control or Alt is held. Such chords belong to the host application.
    pub const fn has_host_shortcut(self) -> bool {
        self.intersects(Self::CONTROL.union(Self::ALT))
    }
}

/// Which logical keyboard layer is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionMode {
    Chinese,
    English,
}

impl Default for SessionMode {
    fn default() -> Self {
        Self::Chinese
    }
}

impl SessionMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Chinese => Self::English,
            Self::English => Self::Chinese,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Down,
    Up,
}

/// What the host framework should do with a native key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Return the event to the host application untouched.
    Pass,
    /// The input method ate the event. `commit` carries text the engine
    /// finished composing, if any.
    Consume { commit: Option<String> },
}

impl KeyAction {
    pub const fn consumed() -> Self {
        Self::Consume { commit: None }
    }

    pub const fn is_consumed(&self) -> bool {
        matches!(self, Self::Consume { .. })
    }
}

/// Text cursor rectangle reported by the host, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorAnchor {
    pub x: i32,
    pub y: i32,
    pub height: i32,
}

impl CursorAnchor {
    pub const fn new(x: i32, y: i32, height: i32) -> Self {
        Self { x, y, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSize {
    pub width: i32,
    pub height: i32,
}

impl PanelSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner the panel should be moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelOrigin {
    pub x: i32,
    pub y: i32,
}

impl PanelOrigin {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle with exclusive `right`/`bottom` edges.
///
/// Used both for a monitor's full bounds and for its usable work area.
/// Coordinates are negative for monitors left of or above the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WorkArea {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Whether a panel of `size` at `origin` lies fully inside.
    pub const fn contains_panel(&self, origin: PanelOrigin, size: PanelSize) -> bool {
        origin.x >= self.left
            && origin.y >= self.top
            && origin.x.saturating_add(size.width) <= self.right
            && origin.y.saturating_add(size.height) <= self.bottom
    }

    /// Squared distance from a point to the rectangle, `0` when inside.
    pub fn distance_sq(&self, x: i32, y: i32) -> i64 {
        let (x, y) = (i64::from(x), i64::from(y));
        let dx = if x < i64::from(self.left) {
            i64::from(self.left) - x
        } else if x >= i64::from(self.right) {
            x - i64::from(self.right) + 1
        } else {
            0
        };
        let dy = if y < i64::from(self.top) {
            i64::from(self.top) - y
        } else if y >= i64::from(self.bottom) {
            y - i64::from(self.bottom) + 1
        } else {
            0
        };
        dx * dx + dy * dy
    }
}
