//! Time-based property tweens with stagger, overwrite and completion cues.

use super::{Ease, ElementId};
use fnv::{FnvHashMap, FnvHashSet};
use smallvec::SmallVec;

/// Animatable style properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    Opacity,
    X,
    Y,
    YPercent,
    Scale,
    WidthPct,
    HeightPct,
    /// Numeric display value (counters); rendered as text, not style.
    Value,
}

impl Prop {
    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Current visual state of one element. Only touched properties are written
/// back to the page, everything else is left to the stylesheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub y_percent: f32,
    pub scale: f32,
    pub width_pct: f32,
    pub height_pct: f32,
    pub value: f32,
    touched: u8,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            y_percent: 0.0,
            scale: 1.0,
            width_pct: 0.0,
            height_pct: 0.0,
            value: 0.0,
            touched: 0,
        }
    }
}

impl Visual {
    pub fn get(&self, prop: Prop) -> f32 {
        match prop {
            Prop::Opacity => self.opacity,
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::YPercent => self.y_percent,
            Prop::Scale => self.scale,
            Prop::WidthPct => self.width_pct,
            Prop::HeightPct => self.height_pct,
            Prop::Value => self.value,
        }
    }

    pub fn set(&mut self, prop: Prop, v: f32) {
        match prop {
            Prop::Opacity => self.opacity = v,
            Prop::X => self.x = v,
            Prop::Y => self.y = v,
            Prop::YPercent => self.y_percent = v,
            Prop::Scale => self.scale = v,
            Prop::WidthPct => self.width_pct = v,
            Prop::HeightPct => self.height_pct = v,
            Prop::Value => self.value = v,
        }
        self.touched |= prop.bit();
    }

    #[inline]
    pub fn touched(&self, prop: Prop) -> bool {
        self.touched & prop.bit() != 0
    }

    /// Anything besides the display value, i.e. something to write as style.
    pub fn has_style(&self) -> bool {
        self.touched & !Prop::Value.bit() != 0
    }

    pub fn has_transform(&self) -> bool {
        [Prop::X, Prop::Y, Prop::YPercent, Prop::Scale]
            .iter()
            .any(|p| self.touched(*p))
    }

    /// CSS `transform` for the touched transform properties.
    pub fn transform_css(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if self.touched(Prop::X) || self.touched(Prop::Y) {
            parts.push(format!("translate({}px, {}px)", self.x, self.y));
        }
        if self.touched(Prop::YPercent) {
            parts.push(format!("translateY({}%)", self.y_percent));
        }
        if self.touched(Prop::Scale) {
            parts.push(format!("scale({})", self.scale));
        }
        parts.join(" ")
    }
}

pub type Props = SmallVec<[(Prop, f32); 4]>;

#[inline]
pub fn props(values: &[(Prop, f32)]) -> Props {
    SmallVec::from_slice(values)
}

/// One tween description, applied to any number of targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub props: Props,
    pub duration: f32,
    pub ease: Ease,
    /// Extra delay per target index.
    pub stagger: f32,
    pub delay: f32,
}

impl Step {
    pub fn new(values: &[(Prop, f32)], duration: f32, ease: Ease) -> Self {
        Self {
            props: props(values),
            duration,
            ease,
            stagger: 0.0,
            delay: 0.0,
        }
    }

    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Time from the first target starting to the last one finishing.
    pub fn span(&self, count: usize) -> f32 {
        self.duration + self.stagger * count.saturating_sub(1) as f32
    }
}

/// Completion notifications, consumed by the lifecycle controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    PreloaderDone,
    PreloaderRemove,
    MenuClosed,
    /// Mark an element `active` once its entrance finished.
    Activate(ElementId),
    FormSuccess,
    FormReset,
}

#[derive(Clone, Copy, Debug)]
pub enum Completion {
    None,
    /// One cue once the whole (staggered) group has finished.
    Group(Cue),
    /// One cue per target as each finishes.
    Each(fn(ElementId) -> Cue),
}

#[derive(Clone, Copy, Debug)]
struct Track {
    prop: Prop,
    from: Option<f32>,
    to: f32,
}

#[derive(Clone, Debug)]
struct Tween {
    target: ElementId,
    tracks: SmallVec<[Track; 4]>,
    start: f64,
    duration: f32,
    ease: Ease,
    cue: Option<Cue>,
    finished: bool,
}

#[derive(Default)]
pub struct TweenEngine {
    visuals: FnvHashMap<ElementId, Visual>,
    tweens: Vec<Tween>,
    scheduled: Vec<(f64, Cue)>,
    dirty: FnvHashSet<ElementId>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visual(&self, element: ElementId) -> Visual {
        self.visuals.get(&element).copied().unwrap_or_default()
    }

    /// Set properties immediately, superseding running tweens on them.
    pub fn set(&mut self, element: ElementId, values: &[(Prop, f32)]) {
        self.overwrite(element, values);
        let visual = self.visuals.entry(element).or_default();
        for (prop, v) in values {
            visual.set(*prop, *v);
        }
        self.dirty.insert(element);
    }

    pub fn set_all(&mut self, elements: &[ElementId], values: &[(Prop, f32)]) {
        for el in elements {
            self.set(*el, values);
        }
    }

    /// Tween `targets` from their current values to `step.props`.
    pub fn to(&mut self, targets: &[ElementId], step: &Step, now: f64, done: Completion) {
        self.play(targets, step, now, done, None);
    }

    /// Jump `targets` to `from` now, then tween back to the values they had.
    pub fn from(
        &mut self,
        targets: &[ElementId],
        from: &[(Prop, f32)],
        step: &Step,
        now: f64,
        done: Completion,
    ) {
        if targets.is_empty() {
            self.play(targets, step, now, done, None);
            return;
        }
        for (i, el) in targets.iter().enumerate() {
            let current = self.visual(*el);
            let single = Step {
                props: from.iter().map(|(p, _)| (*p, current.get(*p))).collect(),
                delay: step.delay + step.stagger * i as f32,
                stagger: 0.0,
                ..step.clone()
            };
            self.set(*el, from);
            let cue = match done {
                Completion::Group(c) if i + 1 == targets.len() => Completion::Group(c),
                Completion::Each(f) => Completion::Each(f),
                _ => Completion::None,
            };
            self.play(std::slice::from_ref(el), &single, now, cue, Some(from));
        }
    }

    fn play(
        &mut self,
        targets: &[ElementId],
        step: &Step,
        now: f64,
        done: Completion,
        from: Option<&[(Prop, f32)]>,
    ) {
        if targets.is_empty() {
            if let Completion::Group(c) = done {
                self.schedule(now + f64::from(step.delay + step.duration), c);
            }
            return;
        }
        for (i, el) in targets.iter().enumerate() {
            self.overwrite(*el, &step.props);
            let tracks = step
                .props
                .iter()
                .map(|(prop, to)| Track {
                    prop: *prop,
                    from: from.and_then(|f| f.iter().find(|(p, _)| p == prop).map(|(_, v)| *v)),
                    to: *to,
                })
                .collect();
            let cue = match done {
                Completion::None => None,
                Completion::Group(c) => (i + 1 == targets.len()).then_some(c),
                Completion::Each(f) => Some(f(*el)),
            };
            self.tweens.push(Tween {
                target: *el,
                tracks,
                start: now + f64::from(step.delay + step.stagger * i as f32),
                duration: step.duration,
                ease: step.ease,
                cue,
                finished: false,
            });
        }
    }

    // Newer tweens win: strip the same properties from older tweens on the
    // element. A tween left without tracks is dropped along with its cue.
    fn overwrite(&mut self, element: ElementId, values: &[(Prop, f32)]) {
        for tween in self.tweens.iter_mut().filter(|t| t.target == element) {
            tween
                .tracks
                .retain(|tr| !values.iter().any(|(p, _)| *p == tr.prop));
        }
        self.tweens.retain(|t| !t.tracks.is_empty());
    }

    /// Fire `cue` once `at` has been reached.
    pub fn schedule(&mut self, at: f64, cue: Cue) {
        self.scheduled.push((at, cue));
    }

    /// Advance all tweens to `now`, appending finished cues to `out`.
    pub fn tick(&mut self, now: f64, out: &mut Vec<Cue>) {
        let Self {
            visuals,
            tweens,
            dirty,
            ..
        } = self;
        for tween in tweens.iter_mut() {
            if now < tween.start {
                continue;
            }
            let visual = visuals.entry(tween.target).or_default();
            let t = if tween.duration <= 0.0 {
                1.0
            } else {
                (((now - tween.start) / f64::from(tween.duration)) as f32).min(1.0)
            };
            let k = tween.ease.apply(t);
            for track in tween.tracks.iter_mut() {
                let from = *track.from.get_or_insert_with(|| visual.get(track.prop));
                visual.set(track.prop, from + (track.to - from) * k);
            }
            dirty.insert(tween.target);
            tween.finished = t >= 1.0;
        }
        out.extend(tweens.iter().filter(|t| t.finished).filter_map(|t| t.cue));
        tweens.retain(|t| !t.finished);

        if !self.scheduled.is_empty() {
            self.scheduled
                .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            let due = self.scheduled.iter().take_while(|(at, _)| *at <= now).count();
            out.extend(self.scheduled.drain(..due).map(|(_, cue)| cue));
        }
    }

    /// Visuals changed since the last call, in element order.
    pub fn take_dirty(&mut self) -> Vec<(ElementId, Visual)> {
        let mut ids: Vec<ElementId> = self.dirty.drain().collect();
        ids.sort();
        ids.into_iter().map(|id| (id, self.visual(id))).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.scheduled.is_empty()
    }

    /// Drop every running tween and pending cue. Current visuals stay.
    pub fn kill_all(&mut self) {
        self.tweens.clear();
        self.scheduled.clear();
    }
}
