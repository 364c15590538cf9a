//! Small self-contained interaction widgets: cursor follower, magnetic
//! buttons, counters, header, menu and the contact form state.

use crate::constants::{CURSOR_LERP, HEADER_HIDE_PX, HEADER_SCROLLED_PX, MAGNETIC_DEFAULT_STRENGTH};
use glam::Vec2;

/// Custom cursor: a dot pinned to the pointer and an outline trailing it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorFollower {
    pub target: Vec2,
    pub trail: Vec2,
    enabled: bool,
    hover: bool,
    view: bool,
    visible: bool,
}

impl CursorFollower {
    pub fn new(enabled: bool) -> Self {
        Self {
            target: Vec2::ZERO,
            trail: Vec2::ZERO,
            enabled,
            hover: false,
            view: false,
            visible: true,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y);
    }

    /// One frame of trailing. Returns `(dot, outline)` positions.
    pub fn tick(&mut self) -> Option<(Vec2, Vec2)> {
        if !self.enabled {
            return None;
        }
        self.trail += (self.target - self.trail) * CURSOR_LERP;
        Some((self.target, self.trail))
    }

    pub fn hover(&self) -> bool {
        self.hover
    }

    pub fn view(&self) -> bool {
        self.view
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Returns whether the flag changed.
    pub fn set_hover(&mut self, on: bool) -> bool {
        let changed = self.hover != on;
        self.hover = on;
        changed
    }

    pub fn set_view(&mut self, on: bool) -> bool {
        let changed = self.view != on;
        self.view = on;
        changed
    }

    pub fn set_visible(&mut self, on: bool) -> bool {
        let changed = self.visible != on;
        self.visible = on;
        changed
    }
}

/// Offset of a magnetic button: a `strength` percent share of the pointer's
/// displacement from the button centre.
pub fn magnetic_offset(pointer: Vec2, rect_min: Vec2, rect_size: Vec2, strength: f32) -> Vec2 {
    let center = rect_min + rect_size * 0.5;
    (pointer - center) * (strength / 100.0)
}

/// `data-strength` as an integer prefix (`"20px"` is 20); missing, zero or
/// malformed values fall back to the default.
pub fn parse_strength(attr: Option<&str>) -> f32 {
    let Some(raw) = attr else {
        return MAGNETIC_DEFAULT_STRENGTH;
    };
    let raw = raw.trim();
    let digits_end = raw
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    match raw[..digits_end].parse::<i32>() {
        Ok(v) if v != 0 => v as f32,
        _ => MAGNETIC_DEFAULT_STRENGTH,
    }
}

/// Counter-up destination parsed from `data-value`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterTarget {
    pub value: f64,
    pub decimal: bool,
}

impl CounterTarget {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            decimal: value.fract() != 0.0,
        }
    }

    pub fn parse(attr: &str) -> Option<Self> {
        attr.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::new)
    }

    /// Whole targets render as integers, fractional ones with one decimal.
    pub fn format(&self, current: f64) -> String {
        if self.decimal {
            format!("{:.1}", current)
        } else {
            format!("{}", current.round() as i64)
        }
    }

    pub fn final_text(&self) -> String {
        self.format(self.value)
    }
}

/// Header bar reacting to scroll direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeaderState {
    last_scroll: f32,
    pub scrolled: bool,
    pub hidden: bool,
}

impl HeaderState {
    /// Feed a position; returns `(scrolled_changed, hidden_changed)`.
    pub fn update(&mut self, scroll: f32) -> (bool, bool) {
        let scrolled = scroll > HEADER_SCROLLED_PX;
        let hidden = scroll > self.last_scroll && scroll > HEADER_HIDE_PX;
        let changed = (scrolled != self.scrolled, hidden != self.hidden);
        self.scrolled = scrolled;
        self.hidden = hidden;
        self.last_scroll = scroll;
        changed
    }
}

/// Mobile menu. `Closing` lasts until the link fade-out finishes; the
/// smooth scroll stays stopped in every state but `Closed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
    Closing,
}

impl MenuState {
    #[inline]
    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    #[inline]
    pub fn holds_scroll(self) -> bool {
        self != MenuState::Closed
    }
}

/// Simulated contact-form submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Sending,
    Success,
}

/// Keys the page reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    CloseMenu,
}

#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "Escape" | "Esc" => Some(KeyAction::CloseMenu),
        _ => None,
    }
}
