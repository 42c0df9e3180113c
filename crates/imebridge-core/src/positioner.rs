//! Candidate panel placement.
//!
//! The panel goes below the cursor, flips above it when there is no room
//! below, and is finally clamped into the work area of the monitor holding the
//! cursor.

use crate::types::{CursorAnchor, PanelOrigin, PanelSize, WorkArea};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionerConfig {
    /// Space between the bottom of the cursor and the panel.
    #[serde(default = "default_gap_below")]
    pub gap_below: i32,
    /// Space between the panel and the top of the cursor after a flip.
    #[serde(default = "default_gap_above")]
    pub gap_above: i32,
    /// Offset applied to the anchor before placement.
    pub cursor_offset_x: i32,
    pub cursor_offset_y: i32,
}

fn default_gap_below() -> i32 {
    2
}

fn default_gap_above() -> i32 {
    5
}

impl Default for PositionerConfig {
    fn default() -> Self {
        Self {
            gap_below: default_gap_below(),
            gap_above: default_gap_above(),
            cursor_offset_x: 0,
            cursor_offset_y: 0,
        }
    }
}

/// Host capability: the work area of the monitor showing a screen point.
///
/// Called on every placement, never cached, because monitors come and go
/// while the input method is running.
pub trait WorkAreaProvider {
    fn work_area_at(&self, x: i32, y: i32) -> Option<WorkArea>;
}

impl<F> WorkAreaProvider for F
where
    F: Fn(i32, i32) -> Option<WorkArea>,
{
    fn work_area_at(&self, x: i32, y: i32) -> Option<WorkArea> {
        self(x, y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PanelPositioner {
    config: PositionerConfig,
}

impl PanelPositioner {
    pub fn new(config: PositionerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PositionerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PositionerConfig) {
        self.config = config;
    }

    /// Places the panel inside `area`.
    ///
    /// Whenever the panel fits in `area`, the result is fully contained no
    /// matter where the anchor is. A panel larger than `area` keeps its
    /// top-left corner inside.
    pub fn position(&self, anchor: CursorAnchor, size: PanelSize, area: WorkArea) -> PanelOrigin {
        let mut x = anchor.x;
        let mut y = anchor
            .y
            .saturating_add(anchor.height)
            .saturating_add(self.config.gap_below);

        if x.saturating_add(size.width) > area.right {
            x = area.right.saturating_sub(size.width);
        }
        if x < area.left {
            x = area.left;
        }

        if y.saturating_add(size.height) > area.bottom {
            let top_y = anchor
                .y
                .saturating_sub(size.height)
                .saturating_sub(self.config.gap_above);
            // The second check only matters for an anchor below the area.
            if top_y >= area.top && top_y.saturating_add(size.height) <= area.bottom {
                y = top_y;
            } else {
                y = area.bottom.saturating_sub(size.height);
            }
        }
        if y < area.top {
            y = area.top;
        }

        PanelOrigin::new(x, y)
    }

    /// Looks up the monitor under the (offset) anchor and places the panel
    /// there. Without a monitor the unclamped below-cursor origin is used.
    pub fn place<P>(&self, anchor: CursorAnchor, size: PanelSize, provider: &P) -> PanelOrigin
    where
        P: WorkAreaProvider + ?Sized,
    {
        let anchor = CursorAnchor::new(
            anchor.x.saturating_add(self.config.cursor_offset_x),
            anchor.y.saturating_add(self.config.cursor_offset_y),
            anchor.height,
        );
        match provider.work_area_at(anchor.x, anchor.y) {
            Some(area) => self.position(anchor, size, area),
            None => PanelOrigin::new(
                anchor.x,
                anchor
                    .y
                    .saturating_add(anchor.height)
                    .saturating_add(self.config.gap_below),
            ),
        }
    }
}

/// [`PanelPositioner::position`] with the default gaps.
pub fn position(anchor: CursorAnchor, size: PanelSize, area: WorkArea) -> PanelOrigin {
    PanelPositioner::default().position(anchor, size, area)
}

/// One display: full bounds plus the part not covered by task bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    pub bounds: WorkArea,
    pub work_area: WorkArea,
}

impl Monitor {
    pub const fn new(bounds: WorkArea, work_area: WorkArea) -> Self {
        Self { bounds, work_area }
    }
}

/// A fixed set of monitors, resolving points the way the desktop does: the
/// monitor containing the point, otherwise the nearest one.
#[derive(Debug, Clone, Default)]
pub struct MonitorLayout {
    monitors: Vec<Monitor>,
}

impl MonitorLayout {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self { monitors }
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn monitor_at(&self, x: i32, y: i32) -> Option<&Monitor> {
        self.monitors
            .iter()
            .find(|m| m.bounds.contains(x, y))
            .or_else(|| self.monitors.iter().min_by_key(|m| m.bounds.distance_sq(x, y)))
    }
}

impl WorkAreaProvider for MonitorLayout {
    fn work_area_at(&self, x: i32, y: i32) -> Option<WorkArea> {
        self.monitor_at(x, y).map(|m| m.work_area)
    }
}
