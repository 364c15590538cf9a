use super::ease::scroll_glide;
use crate::constants::{ANCHOR_SCROLL_DURATION_SEC, SCROLL_DURATION_SEC, WHEEL_MULTIPLIER};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollToOptions {
    pub offset: f32,
    pub duration: f32,
}

impl Default for ScrollToOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            duration: ANCHOR_SCROLL_DURATION_SEC,
        }
    }
}

/// Position reported by [`SmoothScroll::raf`]. `animated` is set when the
/// adapter itself moved the page (the binding layer must write it back).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollFrame {
    pub position: f32,
    pub animated: bool,
}

#[derive(Clone, Copy, Debug)]
struct Glide {
    from: f32,
    to: f32,
    started: Option<f64>,
    duration: f32,
}

/// Eased smooth-scroll engine: wheel input and `scroll_to` requests become
/// glides along `min(1, 1.001 - 2^(-10t))`, advanced once per frame.
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    position: f32,
    target: f32,
    limit: f32,
    glide: Option<Glide>,
    running: bool,
    destroyed: bool,
    duration: f32,
    wheel_multiplier: f32,
    reported: Option<f32>,
}

impl SmoothScroll {
    pub fn new(limit: f32) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            limit: limit.max(0.0),
            glide: None,
            running: true,
            destroyed: false,
            duration: SCROLL_DURATION_SEC,
            wheel_multiplier: WHEEL_MULTIPLIER,
            reported: None,
        }
    }

    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running && !self.destroyed
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.glide.is_some()
    }

    /// Resume the loop. Returns whether anything changed.
    pub fn start(&mut self) -> bool {
        if self.destroyed || self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Halt the loop and drop any glide in progress. Returns whether
    /// anything changed.
    pub fn stop(&mut self) -> bool {
        if self.destroyed || !self.running {
            return false;
        }
        self.running = false;
        self.glide = None;
        self.target = self.position;
        true
    }

    /// Release the engine. Safe to call repeatedly.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.running = false;
        self.glide = None;
        true
    }

    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.position = self.position.min(self.limit);
        self.target = self.target.min(self.limit);
        if let Some(g) = &mut self.glide {
            g.to = g.to.min(self.limit);
        }
    }

    /// Feed a wheel delta. Returns `true` when the native scroll must be
    /// suppressed (the engine owns the page, even while stopped).
    pub fn wheel(&mut self, delta: f32) -> bool {
        if self.destroyed {
            return false;
        }
        if !self.running {
            return true;
        }
        let to = (self.target + delta * self.wheel_multiplier).clamp(0.0, self.limit);
        self.glide_to(to, self.duration);
        true
    }

    /// Glide to `target + offset`. Ignored while stopped or destroyed.
    pub fn scroll_to(&mut self, target: f32, opts: ScrollToOptions) -> bool {
        if !self.is_running() {
            return false;
        }
        let to = (target + opts.offset).clamp(0.0, self.limit);
        self.glide_to(to, opts.duration);
        true
    }

    fn glide_to(&mut self, to: f32, duration: f32) {
        self.target = to;
        self.glide = Some(Glide {
            from: self.position,
            to,
            started: None,
            duration,
        });
    }

    /// Adopt a position the page reached on its own (touch, keyboard).
    pub fn sync_native(&mut self, position: f32) {
        if self.destroyed || self.glide.is_some() {
            return;
        }
        self.position = position.clamp(0.0, self.limit);
        self.target = self.position;
    }

    /// Advance one frame; reports the position when it changed.
    pub fn raf(&mut self, now: f64) -> Option<ScrollFrame> {
        if !self.is_running() {
            return None;
        }
        let mut animated = false;
        if let Some(g) = &mut self.glide {
            let started = *g.started.get_or_insert(now);
            let t = if g.duration <= 0.0 {
                1.0
            } else {
                ((now - started) / f64::from(g.duration)) as f32
            };
            self.position = g.from + (g.to - g.from) * scroll_glide(t.min(1.0));
            animated = true;
            if t >= 1.0 {
                self.position = g.to;
                self.glide = None;
            }
        }
        if self.reported == Some(self.position) {
            return None;
        }
        self.reported = Some(self.position);
        Some(ScrollFrame {
            position: self.position,
            animated,
        })
    }
}
