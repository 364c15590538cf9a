//! Depth-stack ("fog of war") controller for the project cards.
//!
//! Every plane starts pushed back by its depth index (fainter, smaller,
//! lower) and runs its own scrubbed track: emerge, peak-focus, dissolve.
//! Exactly one plane may hold the focus flag; the most recent plane to enter
//! its focus window takes it from everyone else.

use super::{AnimationConfig, ElementId, ScrollPoint};
use crate::constants::{DEPTH_DISSOLVE_START, DEPTH_EMERGE_END, DEPTH_HOVER_BOOST};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Dormant,
    Emerging,
    Focused,
    Dissolving,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneRole {
    /// Starts emerged and fades gently.
    First,
    Middle,
    /// Settle-only track, never dissolves.
    Last,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneState {
    pub element: ElementId,
    pub depth: u32,
    pub role: PlaneRole,
    pub phase: Phase,
    pub focused: bool,
    pub opacity: f32,
    pub scale: f32,
    pub offset: f32,
    pub hovered: bool,
}

/// Pushed-back starting values `(opacity, scale, offset)` for `depth`.
pub fn initial_state(depth: u32, cfg: &AnimationConfig) -> (f32, f32, f32) {
    if depth == 0 {
        return (1.0, 1.0, 0.0);
    }
    let d = depth as f32;
    (
        (1.0 - d * cfg.depth_interval).max(cfg.fog_start),
        cfg.scale_start + d * cfg.scale_step,
        cfg.y_offset + d * cfg.offset_step,
    )
}

/// Focus moved from `previous` to `current`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<ElementId>,
    pub current: Option<ElementId>,
}

pub struct DepthStack {
    planes: Vec<PlaneState>,
    rest: Vec<(f32, f32, f32)>,
    cfg: AnimationConfig,
    reduced: bool,
    focused: Option<usize>,
}

impl DepthStack {
    /// `elements` in source order; an explicit depth overrides the index.
    pub fn new(elements: &[(ElementId, Option<u32>)], cfg: AnimationConfig, reduced: bool) -> Self {
        let count = elements.len();
        let mut planes = Vec::with_capacity(count);
        let mut rest = Vec::with_capacity(count);
        for (i, (element, depth)) in elements.iter().enumerate() {
            let depth = depth.unwrap_or(i as u32);
            let role = match i {
                0 => PlaneRole::First,
                i if i + 1 == count => PlaneRole::Last,
                _ => PlaneRole::Middle,
            };
            let start = if reduced || role == PlaneRole::First {
                (1.0, 1.0, 0.0)
            } else {
                initial_state(depth, &cfg)
            };
            let phase = if reduced || role == PlaneRole::First {
                Phase::Focused
            } else {
                Phase::Dormant
            };
            rest.push(start);
            planes.push(PlaneState {
                element: *element,
                depth,
                role,
                phase,
                focused: i == 0,
                opacity: start.0,
                scale: start.1,
                offset: start.2,
                hovered: false,
            });
        }
        let focused = (count > 0).then_some(0);
        Self {
            planes,
            rest,
            cfg,
            reduced,
            focused,
        }
    }

    pub fn planes(&self) -> &[PlaneState] {
        &self.planes
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn index_of(&self, element: ElementId) -> Option<usize> {
        self.planes.iter().position(|p| p.element == element)
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Scrub window `(start, end)` of a plane.
    pub fn thresholds(&self, index: usize) -> (ScrollPoint, ScrollPoint) {
        match self.planes.get(index).map(|p| p.role) {
            // Held longer: starts once it reaches the top band, ends well past it.
            Some(PlaneRole::First) => (ScrollPoint::top(10.0), ScrollPoint::bottom(-30.0)),
            Some(PlaneRole::Last) => (ScrollPoint::top(90.0), ScrollPoint::top(40.0)),
            _ => (ScrollPoint::top(90.0), ScrollPoint::bottom(10.0)),
        }
    }

    /// Drive plane `index` to scrub `progress`. Returns the focus change it
    /// caused, if any.
    pub fn apply_progress(&mut self, index: usize, progress: f32) -> Option<FocusChange> {
        if self.reduced {
            return None;
        }
        let cfg = self.cfg;
        let rest = *self.rest.get(index)?;
        let plane = self.planes.get_mut(index)?;
        let p = progress.clamp(0.0, 1.0);
        let old_phase = plane.phase;
        let new_phase = phase_for(plane.role, p);
        let (opacity, scale, offset) = values_for(plane.role, p, rest, &cfg);
        plane.phase = new_phase;
        plane.opacity = opacity;
        plane.scale = scale;
        plane.offset = offset;

        if new_phase == Phase::Focused && old_phase != Phase::Focused {
            return self.take_focus(index);
        }
        if old_phase == Phase::Focused && new_phase != Phase::Focused && self.focused == Some(index) {
            let element = self.planes[index].element;
            self.planes[index].focused = false;
            self.focused = None;
            return Some(FocusChange {
                previous: Some(element),
                current: None,
            });
        }
        None
    }

    fn take_focus(&mut self, index: usize) -> Option<FocusChange> {
        let previous = self.focused;
        for plane in &mut self.planes {
            plane.focused = false;
        }
        self.planes[index].focused = true;
        self.focused = Some(index);
        (previous != Some(index)).then(|| FocusChange {
            previous: previous.map(|i| self.planes[i].element),
            current: Some(self.planes[index].element),
        })
    }

    /// Toggle the hover micro-interaction; ignored where hover is disabled.
    pub fn set_hover(&mut self, index: usize, on: bool) -> bool {
        if !self.cfg.hover_enabled || self.reduced {
            return false;
        }
        match self.planes.get_mut(index) {
            Some(plane) if plane.hovered != on => {
                plane.hovered = on;
                true
            }
            _ => false,
        }
    }

    /// `(opacity, scale, offset)` to render, hover included.
    pub fn rendered(&self, index: usize) -> Option<(f32, f32, f32)> {
        let plane = self.planes.get(index)?;
        let boost = if plane.hovered {
            1.0 + DEPTH_HOVER_BOOST
        } else {
            1.0
        };
        Some((plane.opacity, plane.scale * boost, plane.offset))
    }
}

fn phase_for(role: PlaneRole, p: f32) -> Phase {
    match role {
        PlaneRole::First if p < DEPTH_DISSOLVE_START => Phase::Focused,
        PlaneRole::First => Phase::Dissolving,
        _ if p <= 0.0 => Phase::Dormant,
        _ if p < DEPTH_EMERGE_END => Phase::Emerging,
        PlaneRole::Last => Phase::Focused,
        _ if p < DEPTH_DISSOLVE_START => Phase::Focused,
        _ => Phase::Dissolving,
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn values_for(role: PlaneRole, p: f32, rest: (f32, f32, f32), cfg: &AnimationConfig) -> (f32, f32, f32) {
    if p < DEPTH_EMERGE_END && role != PlaneRole::First {
        let e = p / DEPTH_EMERGE_END;
        return (lerp(rest.0, 1.0, e), lerp(rest.1, 1.0, e), lerp(rest.2, 0.0, e));
    }
    if role == PlaneRole::Last {
        return (1.0, 1.0, 0.0);
    }
    if p < DEPTH_DISSOLVE_START {
        let scale = if cfg.peak_enabled && p >= DEPTH_EMERGE_END {
            let k = (p - DEPTH_EMERGE_END) / (DEPTH_DISSOLVE_START - DEPTH_EMERGE_END);
            1.0 + (cfg.peak_scale - 1.0) * (std::f32::consts::PI * k).sin()
        } else {
            1.0
        };
        return (1.0, scale, 0.0);
    }
    let s = (p - DEPTH_DISSOLVE_START) / (1.0 - DEPTH_DISSOLVE_START);
    let fog = if role == PlaneRole::First {
        cfg.fog_end_first
    } else {
        cfg.fog_end
    };
    (
        lerp(1.0, fog, s),
        lerp(1.0, cfg.settle_scale, s),
        lerp(0.0, -cfg.exit_offset, s),
    )
}
