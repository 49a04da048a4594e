use std::time::Duration;

use crate::config::AnimationConfig;
use crate::spring::Spring;

/// Scale while browsing; the toolbar is fully shown.
pub const BROWSING_SCALE: f32 = 1.0;
/// Scale while focused; the toolbar is fully hidden.
pub const FOCUSED_SCALE: f32 = 0.9;
/// Height of the action bar, which is also how far it slides out of view.
pub const TOOLBAR_HEIGHT: f32 = 70.0;
const FOCUSED_CORNER_RADIUS: f32 = 0.0;
const BROWSING_CORNER_RADIUS: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Browsing,
    Focused,
}

impl FocusMode {
    pub fn target_scale(self) -> f32 {
        match self {
            FocusMode::Browsing => BROWSING_SCALE,
            FocusMode::Focused => FOCUSED_SCALE,
        }
    }

    pub fn scroll_enabled(self) -> bool {
        self == FocusMode::Browsing
    }

    /// Toolbar actions (refresh, share, save, info) are only reachable while browsing.
    pub fn toolbar_visible(self) -> bool {
        self == FocusMode::Browsing
    }

    fn toggled(self) -> Self {
        match self {
            FocusMode::Browsing => FocusMode::Focused,
            FocusMode::Focused => FocusMode::Browsing,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FocusChange {
    pub from: FocusMode,
    pub to: FocusMode,
}

/// Browsing ⇄ Focused, with the scale value sprung toward the mode's target.
#[derive(Debug, Clone)]
pub struct FocusDriver {
    mode: FocusMode,
    spring: Spring,
}

impl FocusDriver {
    pub fn new(params: AnimationConfig) -> Self {
        Self {
            mode: FocusMode::Browsing,
            spring: Spring::at_rest(BROWSING_SCALE, params),
        }
    }

    pub fn mode(&self) -> FocusMode {
        self.mode
    }

    pub fn is_focused(&self) -> bool {
        self.mode == FocusMode::Focused
    }

    pub fn value(&self) -> f32 {
        self.spring.value()
    }

    pub fn target(&self) -> f32 {
        self.spring.target()
    }

    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    pub fn is_animating(&self) -> bool {
        !self.spring.is_settled()
    }

    /// The only edge. Retargets from whatever value the spring is at right now.
    pub fn toggle(&mut self) -> FocusChange {
        let change = FocusChange {
            from: self.mode,
            to: self.mode.toggled(),
        };
        self.mode = change.to;
        self.spring.retarget(self.mode.target_scale());
        change
    }

    /// Advance the in-process spring. Returns true once settled.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.spring.step(dt)
    }

    /// Adopt a frame produced by the animator task.
    pub fn sync_frame(&mut self, value: f32, velocity: f32) {
        self.spring.resume_from(value, velocity);
    }

    pub fn toolbar_offset(&self) -> f32 {
        toolbar_offset(self.value())
    }

    pub fn corner_radius(&self) -> f32 {
        corner_radius(self.value())
    }
}

/// Vertical toolbar offset for a scale value: 1.0 → 0, 0.9 → −70, linear between.
pub fn toolbar_offset(value: f32) -> f32 {
    interpolate(value, -TOOLBAR_HEIGHT, 0.0)
}

/// Image corner rounding. Both ends are zero, so this is flat.
pub fn corner_radius(value: f32) -> f32 {
    interpolate(value, FOCUSED_CORNER_RADIUS, BROWSING_CORNER_RADIUS)
}

// Linear map from [FOCUSED_SCALE, BROWSING_SCALE] onto [at_focused, at_browsing], clamped.
fn interpolate(value: f32, at_focused: f32, at_browsing: f32) -> f32 {
    let t = ((value - FOCUSED_SCALE) / (BROWSING_SCALE - FOCUSED_SCALE)).clamp(0.0, 1.0);
    at_focused + (at_browsing - at_focused) * t
}
