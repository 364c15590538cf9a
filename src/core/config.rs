//! Breakpoint table and per-breakpoint animation configuration.

use crate::constants::{BREAKPOINT_DESKTOP, BREAKPOINT_TABLET, BREAKPOINT_WIDE};

/// Environment signals read once at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub viewport_width: f32,
    pub reduced_motion: bool,
    /// `(pointer: coarse)` matched, i.e. touch-primary device.
    pub touch_primary: bool,
}

impl Environment {
    pub fn desktop(viewport_width: f32) -> Self {
        Self {
            viewport_width,
            reduced_motion: false,
            touch_primary: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: f32) -> Self {
        BREAKPOINTS
            .iter()
            .rev()
            .find(|(min, _)| width >= *min)
            .map(|(_, bp)| *bp)
            .unwrap_or(Breakpoint::Mobile)
    }

    /// Narrow layouts: single column, batched reveals, compressed depth stack.
    #[inline]
    pub fn is_narrow(self) -> bool {
        self == Breakpoint::Mobile
    }

    /// Below the desktop breakpoint pointer effects are off.
    #[inline]
    pub fn is_handheld(self) -> bool {
        self < Breakpoint::Desktop
    }
}

const BREAKPOINTS: [(f32, Breakpoint); 4] = [
    (0.0, Breakpoint::Mobile),
    (BREAKPOINT_TABLET, Breakpoint::Tablet),
    (BREAKPOINT_DESKTOP, Breakpoint::Desktop),
    (BREAKPOINT_WIDE, Breakpoint::Wide),
];

/// Animation parameters chosen once per registration pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationConfig {
    // depth stack
    pub depth_interval: f32,
    pub fog_start: f32,
    pub fog_end: f32,
    pub fog_end_first: f32,
    pub scale_start: f32,
    pub scale_step: f32,
    pub y_offset: f32,
    pub offset_step: f32,
    pub exit_offset: f32,
    pub settle_scale: f32,
    pub peak_scale: f32,
    pub peak_enabled: bool,
    pub hover_enabled: bool,
    /// Scrub smoothing lag, seconds.
    pub scrub: f32,
    // section reveals
    pub reveal_distance: f32,
    /// Multiplier for every tween duration; 0 makes reveals instant.
    pub time_scale: f32,
    pub pointer_effects: bool,
}

impl AnimationConfig {
    pub const DESKTOP: AnimationConfig = AnimationConfig {
        depth_interval: 0.1,
        fog_start: 0.3,
        fog_end: 0.15,
        fog_end_first: 0.4,
        scale_start: 0.94,
        scale_step: 0.003,
        y_offset: 60.0,
        offset_step: 8.0,
        exit_offset: 40.0,
        settle_scale: 0.97,
        peak_scale: 1.02,
        peak_enabled: true,
        hover_enabled: true,
        scrub: 0.5,
        reveal_distance: 60.0,
        time_scale: 1.0,
        pointer_effects: true,
    };

    pub const WIDE: AnimationConfig = AnimationConfig {
        y_offset: 72.0,
        offset_step: 10.0,
        exit_offset: 48.0,
        ..Self::DESKTOP
    };

    // Tablet keeps the desktop sequencing and card hover but loses the
    // cursor and magnetic buttons.
    pub const TABLET: AnimationConfig = AnimationConfig {
        pointer_effects: false,
        ..Self::DESKTOP
    };

    pub const MOBILE: AnimationConfig = AnimationConfig {
        depth_interval: 0.06,
        fog_start: 0.5,
        fog_end: 0.35,
        fog_end_first: 0.5,
        scale_start: 0.97,
        scale_step: 0.002,
        y_offset: 30.0,
        offset_step: 4.0,
        exit_offset: 20.0,
        settle_scale: 0.985,
        peak_scale: 1.0,
        peak_enabled: false,
        hover_enabled: false,
        scrub: 0.3,
        reveal_distance: 30.0,
        time_scale: 1.0,
        pointer_effects: false,
    };

    /// Zero-effect configuration: instant, fully visible, no scale.
    pub const REDUCED: AnimationConfig = AnimationConfig {
        depth_interval: 0.0,
        fog_start: 1.0,
        fog_end: 1.0,
        fog_end_first: 1.0,
        scale_start: 1.0,
        scale_step: 0.0,
        y_offset: 0.0,
        offset_step: 0.0,
        exit_offset: 0.0,
        settle_scale: 1.0,
        peak_scale: 1.0,
        peak_enabled: false,
        hover_enabled: false,
        scrub: 0.0,
        reveal_distance: 0.0,
        time_scale: 0.0,
        pointer_effects: false,
    };

    pub fn for_breakpoint(bp: Breakpoint) -> Self {
        match bp {
            Breakpoint::Mobile => Self::MOBILE,
            Breakpoint::Tablet => Self::TABLET,
            Breakpoint::Desktop => Self::DESKTOP,
            Breakpoint::Wide => Self::WIDE,
        }
    }

    pub fn for_environment(env: &Environment) -> Self {
        if env.reduced_motion {
            return Self::REDUCED;
        }
        let mut cfg = Self::for_breakpoint(Breakpoint::from_width(env.viewport_width));
        if env.touch_primary {
            cfg.pointer_effects = false;
            cfg.hover_enabled = false;
        }
        cfg
    }

    /// Scale a nominal duration by this configuration's time scale.
    #[inline]
    pub fn dur(&self, seconds: f32) -> f32 {
        seconds * self.time_scale
    }
}
