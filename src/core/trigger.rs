//! Viewport trigger registry.
//!
//! Registrations bind an element and a pair of thresholds to scroll-position
//! events. The registry is fed one scroll position per frame and reports the
//! crossings of that frame as [`TriggerEvent`]s, ordered by the crossed
//! threshold in the direction of travel. Boundaries are measured lazily
//! through [`Layout`] on [`TriggerRegistry::refresh`].

use super::{Bounds, ElementId, Layout, ParseError};
use smallvec::SmallVec;
use std::str::FromStr;

/// A position inside a box (element or viewport).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offset {
    /// 0.0 is the top edge, 1.0 the bottom edge.
    Fraction(f32),
    Pixels(f32),
}

impl Offset {
    #[inline]
    fn resolve(self, extent: f32) -> f32 {
        match self {
            Offset::Fraction(f) => f * extent,
            Offset::Pixels(px) => px,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Offset::Fraction(0.0)),
            "center" => Some(Offset::Fraction(0.5)),
            "bottom" => Some(Offset::Fraction(1.0)),
            t => {
                if let Some(pct) = t.strip_suffix('%') {
                    pct.parse::<f32>().ok().map(|p| Offset::Fraction(p / 100.0))
                } else {
                    t.strip_suffix("px")
                        .unwrap_or(t)
                        .parse::<f32>()
                        .ok()
                        .map(Offset::Pixels)
                }
            }
        }
    }
}

/// "When `element` reaches `viewport`", e.g. `top 85%`: the element's top
/// edge is 85% of the way down the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold {
    pub element: Offset,
    pub viewport: Offset,
}

impl Threshold {
    /// Element top edge at `viewport_pct` percent of the viewport height.
    pub fn top(viewport_pct: f32) -> Self {
        Self {
            element: Offset::Fraction(0.0),
            viewport: Offset::Fraction(viewport_pct / 100.0),
        }
    }

    /// Element bottom edge at `viewport_pct` percent of the viewport height.
    pub fn bottom(viewport_pct: f32) -> Self {
        Self {
            element: Offset::Fraction(1.0),
            viewport: Offset::Fraction(viewport_pct / 100.0),
        }
    }
}

/// A scroll offset at which something starts or ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollPoint {
    Absolute(f32),
    /// Bottom of the scrollable extent.
    Max,
    Relative(Threshold),
}

impl ScrollPoint {
    pub fn top(viewport_pct: f32) -> Self {
        ScrollPoint::Relative(Threshold::top(viewport_pct))
    }

    pub fn bottom(viewport_pct: f32) -> Self {
        ScrollPoint::Relative(Threshold::bottom(viewport_pct))
    }

    /// Resolve to a scroll offset; `None` when an element-relative point
    /// has no measurable element.
    pub fn resolve(&self, bounds: Option<Bounds>, viewport_height: f32, max_scroll: f32) -> Option<f32> {
        match self {
            ScrollPoint::Absolute(px) => Some(*px),
            ScrollPoint::Max => Some(max_scroll),
            ScrollPoint::Relative(th) => bounds.map(|b| {
                b.top + th.element.resolve(b.height) - th.viewport.resolve(viewport_height)
            }),
        }
    }
}

impl FromStr for ScrollPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::Threshold(s.to_string());
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            ["max"] => Ok(ScrollPoint::Max),
            [single] => single
                .strip_suffix("px")
                .unwrap_or(single)
                .parse::<f32>()
                .map(ScrollPoint::Absolute)
                .map_err(|_| bad()),
            [element, viewport] => {
                let element = Offset::parse(element).ok_or_else(bad)?;
                let viewport = Offset::parse(viewport).ok_or_else(bad)?;
                Ok(ScrollPoint::Relative(Threshold { element, viewport }))
            }
            _ => Err(bad()),
        }
    }
}

/// Lifetime of a registration. `Global` ones live until teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    /// Section layout, rebuilt when the narrow layout switches on or off.
    Responsive,
    /// Depth-stack planes, rebuilt on every breakpoint change.
    Stack,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TriggerConfig {
    pub target: Option<ElementId>,
    pub start: ScrollPoint,
    pub end: Option<ScrollPoint>,
    /// Fire `Enter` once, then detach.
    pub once: bool,
    /// Report scrubbed progress, smoothed over this many seconds.
    pub scrub: Option<f32>,
    /// Report every position change.
    pub watch: bool,
    pub scope: Scope,
}

impl TriggerConfig {
    pub fn new(target: ElementId, start: ScrollPoint) -> Self {
        Self {
            target: Some(target),
            start,
            end: None,
            once: false,
            scrub: None,
            watch: false,
            scope: Scope::Global,
        }
    }

    /// Whole-page trigger spanning `0..max`.
    pub fn page() -> Self {
        Self {
            target: None,
            start: ScrollPoint::Absolute(0.0),
            end: Some(ScrollPoint::Max),
            once: false,
            scrub: None,
            watch: false,
            scope: Scope::Global,
        }
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn end(mut self, end: ScrollPoint) -> Self {
        self.end = Some(end);
        self
    }

    pub fn scrub(mut self, lag: f32) -> Self {
        self.scrub = Some(lag.max(0.0));
        self
    }

    pub fn watch(mut self) -> Self {
        self.watch = true;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchConfig {
    pub start: ScrollPoint,
    pub once: bool,
    pub scope: Scope,
}

impl BatchConfig {
    pub fn once(start: ScrollPoint, scope: Scope) -> Self {
        Self {
            start,
            once: true,
            scope,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub u32);

pub type ElementSet = SmallVec<[ElementId; 8]>;

#[derive(Clone, Debug, PartialEq)]
pub enum TriggerEvent {
    Enter(TriggerId),
    LeaveBack(TriggerId),
    Progress(TriggerId, f32),
    Update(TriggerId, f32),
    /// Every batch member that entered during one update.
    BatchEnter { batch: BatchId, elements: ElementSet },
}

#[derive(Clone, Debug)]
struct Registration {
    id: TriggerId,
    config: TriggerConfig,
    start: Option<f32>,
    end: Option<f32>,
    past: bool,
    fired: bool,
    progress: Option<f32>,
    live: bool,
}

#[derive(Clone, Debug)]
struct Member {
    element: ElementId,
    start: Option<f32>,
    past: bool,
    live: bool,
}

#[derive(Clone, Debug)]
struct Batch {
    id: BatchId,
    config: BatchConfig,
    members: Vec<Member>,
}

pub struct TriggerRegistry {
    registrations: Vec<Registration>,
    batches: Vec<Batch>,
    viewport_height: f32,
    max_scroll: Option<f32>,
    last_scroll: Option<f32>,
    next_id: u32,
    stale: bool,
}

impl Default for TriggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            batches: Vec::new(),
            viewport_height: 0.0,
            max_scroll: None,
            last_scroll: None,
            next_id: 1,
            stale: false,
        }
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a registration. It stays inert until the next [`refresh`](Self::refresh).
    pub fn register(&mut self, config: TriggerConfig) -> TriggerId {
        let id = TriggerId(self.next());
        self.registrations.push(Registration {
            id,
            config,
            start: None,
            end: None,
            past: false,
            fired: false,
            progress: None,
            live: true,
        });
        self.stale = true;
        id
    }

    /// Group `elements` under one coalesced enter event.
    pub fn batch(&mut self, elements: &[ElementId], config: BatchConfig) -> BatchId {
        let id = BatchId(self.next());
        self.batches.push(Batch {
            id,
            config,
            members: elements
                .iter()
                .map(|e| Member {
                    element: *e,
                    start: None,
                    past: false,
                    live: true,
                })
                .collect(),
        });
        self.stale = true;
        id
    }

    /// True when registrations were added since the last refresh.
    pub fn needs_refresh(&self) -> bool {
        self.stale
    }

    /// Recompute every boundary. `hard` also re-measures the scroll extent.
    pub fn refresh(&mut self, layout: &dyn Layout, hard: bool) {
        self.viewport_height = layout.viewport_height();
        if hard || self.max_scroll.is_none() {
            self.max_scroll = Some(layout.max_scroll());
        }
        let vh = self.viewport_height;
        let max = self.max_scroll.unwrap_or(0.0);
        for reg in self.registrations.iter_mut().filter(|r| r.live) {
            let bounds = reg.config.target.and_then(|t| layout.bounds(t));
            reg.start = reg.config.start.resolve(bounds, vh, max);
            reg.end = reg.config.end.and_then(|e| e.resolve(bounds, vh, max));
        }
        for batch in &mut self.batches {
            let start = batch.config.start;
            for m in batch.members.iter_mut().filter(|m| m.live) {
                m.start = start.resolve(layout.bounds(m.element), vh, max);
            }
        }
        self.stale = false;
        log::debug!(
            "[trigger] refresh hard={} triggers={} vh={:.0} max={:.0}",
            hard,
            self.live_count(),
            vh,
            max
        );
    }

    /// Evaluate all registrations against `scroll`. `dt` drives scrub lag.
    pub fn update(&mut self, scroll: f32, dt: f32, out: &mut Vec<TriggerEvent>) {
        let prev = self.last_scroll;
        let moved = prev != Some(scroll);
        let downward = prev.map_or(true, |p| scroll >= p);

        let mut crossings: Vec<(f32, TriggerEvent)> = Vec::new();
        let mut scrubbed: Vec<(f32, TriggerEvent)> = Vec::new();
        let mut watched: Vec<TriggerEvent> = Vec::new();

        for reg in self.registrations.iter_mut().filter(|r| r.live) {
            let Some(start) = reg.start else { continue };
            if let Some(lag) = reg.config.scrub {
                let target = scrub_target(scroll, start, reg.end);
                let next = match reg.progress {
                    None => target,
                    Some(p) => smooth(p, target, lag, dt),
                };
                if reg.progress.map_or(true, |p| (next - p).abs() > 1e-6) {
                    scrubbed.push((start, TriggerEvent::Progress(reg.id, next)));
                }
                reg.progress = Some(next);
            } else {
                let now_past = scroll >= start;
                if now_past && !reg.past && !(reg.config.once && reg.fired) {
                    reg.fired = true;
                    crossings.push((start, TriggerEvent::Enter(reg.id)));
                    if reg.config.once {
                        reg.live = false;
                    }
                } else if !now_past && reg.past && !reg.config.once {
                    crossings.push((start, TriggerEvent::LeaveBack(reg.id)));
                }
                reg.past = now_past;
            }
            if reg.config.watch && moved {
                watched.push(TriggerEvent::Update(reg.id, scroll));
            }
        }

        for batch in &mut self.batches {
            let mut entered = ElementSet::new();
            let mut first = f32::INFINITY;
            for m in batch.members.iter_mut().filter(|m| m.live) {
                let Some(start) = m.start else { continue };
                let now_past = scroll >= start;
                if now_past && !m.past {
                    entered.push(m.element);
                    first = first.min(start);
                    if batch.config.once {
                        m.live = false;
                    }
                }
                m.past = now_past;
            }
            if !entered.is_empty() {
                crossings.push((
                    first,
                    TriggerEvent::BatchEnter {
                        batch: batch.id,
                        elements: entered,
                    },
                ));
            }
        }

        sort_by_travel(&mut crossings, downward);
        sort_by_travel(&mut scrubbed, downward);
        out.extend(crossings.into_iter().map(|(_, e)| e));
        out.extend(scrubbed.into_iter().map(|(_, e)| e));
        out.extend(watched);
        self.last_scroll = Some(scroll);
    }

    /// Detach every registration and batch of `scope`.
    pub fn kill_scope(&mut self, scope: Scope) {
        self.registrations.retain(|r| r.config.scope != scope);
        self.batches.retain(|b| b.config.scope != scope);
    }

    pub fn kill_all(&mut self) {
        self.registrations.clear();
        self.batches.clear();
    }

    pub fn is_live(&self, id: TriggerId) -> bool {
        self.registrations.iter().any(|r| r.id == id && r.live)
    }

    pub fn has_batch(&self, id: BatchId) -> bool {
        self.batches
            .iter()
            .any(|b| b.id == id && b.members.iter().any(|m| m.live))
    }

    /// Live registrations plus live batch members.
    pub fn live_count(&self) -> usize {
        self.registrations.iter().filter(|r| r.live).count()
            + self
                .batches
                .iter()
                .map(|b| b.members.iter().filter(|m| m.live).count())
                .sum::<usize>()
    }

    pub fn max_scroll(&self) -> Option<f32> {
        self.max_scroll
    }
}

#[inline]
fn scrub_target(scroll: f32, start: f32, end: Option<f32>) -> f32 {
    match end {
        Some(end) if end > start => ((scroll - start) / (end - start)).clamp(0.0, 1.0),
        _ => {
            if scroll >= start {
                1.0
            } else {
                0.0
            }
        }
    }
}

#[inline]
fn smooth(current: f32, target: f32, lag: f32, dt: f32) -> f32 {
    if lag <= 0.0 {
        return target;
    }
    let alpha = 1.0 - (-dt.max(0.0) / lag).exp();
    let next = current + (target - current) * alpha;
    if (target - next).abs() < 1e-3 {
        target
    } else {
        next
    }
}

// Stable, so equal thresholds keep registration order.
fn sort_by_travel(events: &mut [(f32, TriggerEvent)], downward: bool) {
    events.sort_by(|a, b| {
        let ord = a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal);
        if downward {
            ord
        } else {
            ord.reverse()
        }
    });
}
