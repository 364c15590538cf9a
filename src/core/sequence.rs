//! Section compositions: which elements start hidden, which trigger reveals
//! them, and with what tween. Registrations are pure data; the lifecycle
//! controller runs the [`Effect`]s when the registry reports a crossing.

use super::{
    AnimationConfig, BatchConfig, BatchId, Bindings, Breakpoint, CounterBinding, Cue, DepthStack,
    Ease, ElementId, HeroBindings, ParseError, Position, PreloaderBindings, Prop, Scope,
    ScrollPoint, Step, Timeline, TriggerConfig, TriggerId, TriggerRegistry, TweenEngine,
};
use crate::constants::TIMELINE_ITEM_SHIFT_PX;
use fnv::FnvHashMap;
use std::str::FromStr;

/// What a trigger does once it fires.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    To { targets: Vec<ElementId>, step: Step },
    Count { counter: CounterBinding, delay: f32 },
    /// Scrubbed depth-stack plane.
    Plane(usize),
    /// Scrubbed fill (height %) of a progress bar.
    Fill(ElementId),
    Header,
}

/// Tween applied to the subset of a batch that entered together.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchEffect {
    pub step: Step,
    /// Add `active` to each element once its tween completes.
    pub activate: bool,
}

/// Tween engine, trigger registry and the effect table binding them.
#[derive(Default)]
pub struct Stage {
    pub engine: TweenEngine,
    pub registry: TriggerRegistry,
    effects: FnvHashMap<TriggerId, Vec<Effect>>,
    batch_effects: FnvHashMap<BatchId, BatchEffect>,
    /// Properties a scope pushed away from rest, restored when it is killed.
    hidden: FnvHashMap<Scope, Vec<(ElementId, Prop)>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&mut self, config: TriggerConfig, effects: Vec<Effect>) -> TriggerId {
        let id = self.registry.register(config);
        self.effects.insert(id, effects);
        id
    }

    pub fn batch(
        &mut self,
        elements: &[ElementId],
        config: BatchConfig,
        effect: BatchEffect,
    ) -> Option<BatchId> {
        if elements.is_empty() {
            return None;
        }
        let id = self.registry.batch(elements, config);
        self.batch_effects.insert(id, effect);
        Some(id)
    }

    pub fn effects(&self, id: TriggerId) -> &[Effect] {
        self.effects.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn batch_effect(&self, id: BatchId) -> Option<&BatchEffect> {
        self.batch_effects.get(&id)
    }

    /// Render `elements` at `values` now and remember them under `scope`.
    pub fn hide(&mut self, scope: Scope, elements: &[ElementId], values: &[(Prop, f32)]) {
        self.engine.set_all(elements, values);
        let hidden = self.hidden.entry(scope).or_default();
        for el in elements {
            hidden.extend(values.iter().map(|(prop, _)| (*el, *prop)));
        }
    }

    /// Detach a scope, forget effects no registration can reach anymore and
    /// put everything the scope hid back at rest.
    pub fn kill_scope(&mut self, scope: Scope) {
        self.registry.kill_scope(scope);
        let registry = &self.registry;
        self.effects.retain(|id, _| registry.is_live(*id));
        self.batch_effects.retain(|id, _| registry.has_batch(*id));
        for (el, prop) in self.hidden.remove(&scope).unwrap_or_default() {
            self.engine.set(el, &[(prop, rest_value(prop))]);
        }
    }

    pub fn kill_all(&mut self) {
        self.registry.kill_all();
        self.engine.kill_all();
        self.effects.clear();
        self.batch_effects.clear();
        self.hidden.clear();
    }
}

// Section tables are written in GSAP notation; a malformed entry is logged
// and replaced by `fallback`.
fn parsed<T: FromStr<Err = ParseError>>(notation: &str, fallback: T) -> T {
    notation.parse().unwrap_or_else(|e: ParseError| {
        log::warn!("[sequence] {}", e);
        fallback
    })
}

fn ease(name: &str) -> Ease {
    parsed(name, Ease::POWER3_OUT)
}

fn at(threshold: &str) -> ScrollPoint {
    parsed(threshold, ScrollPoint::top(85.0))
}

fn pos(position: &str) -> Position {
    parsed(position, Position::Sequence)
}

fn step(cfg: &AnimationConfig, values: &[(Prop, f32)], duration: f32, easing: &str) -> Step {
    Step::new(values, cfg.dur(duration), ease(easing))
}

const SHOWN: [(Prop, f32); 2] = [(Prop::Opacity, 1.0), (Prop::Y, 0.0)];

// ---------------- Preloader & hero ----------------

/// Put the preloader counter and bar in their pre-animation state. The
/// letters are hidden by the timeline itself.
pub fn preloader_initial(engine: &mut TweenEngine, b: &PreloaderBindings) {
    if let Some(counter) = b.counter {
        engine.set(counter, &[(Prop::Value, 0.0)]);
    }
    if let Some(progress) = b.progress {
        engine.set(progress, &[(Prop::WidthPct, 0.0)]);
    }
}

/// Letters rise in, the counter runs to 100 with the progress bar, letters
/// leave upwards and the panel slides away. Completes with
/// [`Cue::PreloaderDone`].
pub fn preloader_timeline(b: &PreloaderBindings) -> Timeline {
    let mut tl = Timeline::new().on_complete(Cue::PreloaderDone);
    tl.from(
        &b.letters,
        &[(Prop::YPercent, 100.0)],
        Step::new(&[], 0.6, ease("power3.out")).stagger(0.08),
        pos(">"),
    );
    let counter: Vec<ElementId> = b.counter.into_iter().collect();
    tl.to(
        &counter,
        Step::new(&[(Prop::Value, 100.0)], 1.5, ease("power2.inOut")),
        pos("-=0.3"),
    );
    let progress: Vec<ElementId> = b.progress.into_iter().collect();
    tl.to(
        &progress,
        Step::new(&[(Prop::WidthPct, 100.0)], 1.5, ease("power2.inOut")),
        pos("<"),
    );
    tl.to(
        &b.letters,
        Step::new(&[(Prop::Y, -100.0)], 0.4, ease("power3.in")).stagger(0.03),
        pos("+=0.2"),
    );
    let panel: Vec<ElementId> = b.root.into_iter().collect();
    tl.to(
        &panel,
        Step::new(&[(Prop::YPercent, -100.0)], 0.8, ease("power3.inOut")),
        pos("-=0.2"),
    );
    tl
}

fn hero_blocks(hero: &HeroBindings) -> Vec<ElementId> {
    hero.label.into_iter().chain(hero.info).collect()
}

pub fn hero_initial(engine: &mut TweenEngine, hero: &HeroBindings, cfg: &AnimationConfig) {
    let rise = cfg.reveal_distance * 0.5;
    engine.set_all(&hero_blocks(hero), &[(Prop::Opacity, 0.0), (Prop::Y, rise)]);
    engine.set_all(&hero.title_words, &[(Prop::Opacity, 0.0), (Prop::YPercent, 100.0)]);
    if let Some(hint) = hero.scroll_hint {
        engine.set(hint, &[(Prop::Opacity, 0.0)]);
    }
}

/// Label, then staggered title words overlapping it, then info and the
/// scroll hint.
pub fn hero_timeline(hero: &HeroBindings, cfg: &AnimationConfig) -> Timeline {
    let mut tl = Timeline::new().with_delay(cfg.dur(crate::constants::HERO_DELAY_SEC));
    let label: Vec<ElementId> = hero.label.into_iter().collect();
    tl.to(&label, step(cfg, &SHOWN, 0.8, "power3.out"), pos(">"));
    tl.to(
        &hero.title_words,
        step(cfg, &[(Prop::YPercent, 0.0), (Prop::Opacity, 1.0)], 1.0, "power3.out")
            .stagger(cfg.dur(0.06)),
        pos("-=0.5"),
    );
    let info: Vec<ElementId> = hero.info.into_iter().collect();
    tl.to(&info, step(cfg, &SHOWN, 0.8, "power3.out"), pos("-=0.6"));
    let hint: Vec<ElementId> = hero.scroll_hint.into_iter().collect();
    tl.to(
        &hint,
        step(cfg, &[(Prop::Opacity, 1.0)], 0.6, "power2.out"),
        pos("-=0.4"),
    );
    tl
}

// ---------------- Scroll-driven sections ----------------

/// Header watcher over the whole page.
pub fn register_header(stage: &mut Stage, header: Option<ElementId>) {
    if header.is_some() {
        stage.trigger(TriggerConfig::page().watch(), vec![Effect::Header]);
    }
}

/// Section titles, reveal text and section numbers, on every breakpoint.
pub fn register_common(stage: &mut Stage, b: &Bindings, cfg: &AnimationConfig) {
    for word in &b.common.titles {
        stage.hide(Scope::Global, &[*word], &[(Prop::Opacity, 0.0), (Prop::YPercent, 100.0)]);
        stage.trigger(
            TriggerConfig::new(*word, at("top 85%")).once(),
            vec![Effect::To {
                targets: vec![*word],
                step: step(cfg, &[(Prop::YPercent, 0.0), (Prop::Opacity, 1.0)], 0.8, "power3.out"),
            }],
        );
    }

    stage.hide(
        Scope::Global,
        &b.common.reveal_texts,
        &[(Prop::Opacity, 0.0), (Prop::Y, cfg.reveal_distance * 0.5)],
    );
    stage.batch(
        &b.common.reveal_texts,
        BatchConfig::once(at("top 85%"), Scope::Global),
        BatchEffect {
            step: step(cfg, &SHOWN, 0.8, "power3.out").stagger(cfg.dur(0.1)),
            activate: false,
        },
    );

    stage.hide(Scope::Global, &b.common.numbers, &[(Prop::Opacity, 0.0), (Prop::Scale, 0.0)]);
    stage.batch(
        &b.common.numbers,
        BatchConfig::once(at("top 85%"), Scope::Global),
        BatchEffect {
            step: step(cfg, &[(Prop::Opacity, 1.0), (Prop::Scale, 1.0)], 0.5, "back.out(1.5)")
                .stagger(cfg.dur(0.1)),
            activate: false,
        },
    );
}

/// Breakpoint-scoped registrations. Returns the depth stack built for the
/// project cards.
pub fn register_responsive(
    stage: &mut Stage,
    b: &Bindings,
    cfg: &AnimationConfig,
    bp: Breakpoint,
) -> DepthStack {
    let stack = register_depth_stack(stage, b, cfg);
    if bp.is_narrow() {
        register_mobile(stage, b, cfg);
    } else {
        register_about(stage, b, cfg);
        register_skills(stage, b, cfg);
        register_awards(stage, b, cfg);
        register_contact(stage, b, cfg);
    }
    log::info!(
        "[sequence] registered {:?} layout, {} triggers, {} planes",
        bp,
        stage.registry.live_count(),
        stack.len()
    );
    stack
}

/// Project cards as depth planes, each scrubbed through its own window.
/// Registered under [`Scope::Stack`] so a breakpoint change can rebuild the
/// planes without touching the section layout.
pub fn register_depth_stack(stage: &mut Stage, b: &Bindings, cfg: &AnimationConfig) -> DepthStack {
    let elements: Vec<(ElementId, Option<u32>)> =
        b.projects.iter().map(|p| (p.element, p.depth)).collect();
    let stack = DepthStack::new(&elements, *cfg, false);
    for (i, plane) in stack.planes().iter().enumerate() {
        stage.hide(
            Scope::Stack,
            &[plane.element],
            &[
                (Prop::Opacity, plane.opacity),
                (Prop::Scale, plane.scale),
                (Prop::Y, plane.offset),
            ],
        );
        let (start, end) = stack.thresholds(i);
        stage.trigger(
            TriggerConfig::new(plane.element, start)
                .end(end)
                .scrub(cfg.scrub)
                .scope(Scope::Stack),
            vec![Effect::Plane(i)],
        );
    }
    stack
}

fn register_mobile(stage: &mut Stage, b: &Bindings, cfg: &AnimationConfig) {
    let mut targets: Vec<ElementId> = b.skills.iter().map(|s| s.element).collect();
    targets.extend(&b.awards.items);
    stage.hide(
        Scope::Responsive,
        &targets,
        &[(Prop::Opacity, 0.0), (Prop::Y, cfg.reveal_distance)],
    );
    stage.batch(
        &targets,
        BatchConfig::once(at("top 90%"), Scope::Responsive),
        BatchEffect {
            step: step(cfg, &SHOWN, 0.6, "power2.out").stagger(cfg.dur(0.1)),
            activate: false,
        },
    );
}

fn register_about(stage: &mut Stage, b: &Bindings, cfg: &AnimationConfig) {
    if b.about.section.is_none() {
        return;
    }
    if let Some(image) = b.about.image {
        stage.hide(Scope::Responsive, &[image], &[(Prop::Opacity, 0.0), (Prop::Scale, 0.95)]);
        stage.trigger(
            TriggerConfig::new(image, at("top 80%"))
                .once()
                .scope(Scope::Responsive),
            vec![Effect::To {
                targets: vec![image],
                step: step(cfg, &[(Prop::Opacity, 1.0), (Prop::Scale, 1.0)], 1.0, "power3.out"),
            }],
        );
    }
    for counter in &b.about.stats {
        stage.trigger(
            TriggerConfig::new(counter.element, at("top 85%"))
                .once()
                .scope(Scope::Responsive),
            vec![Effect::Count {
                counter: *counter,
                delay: 0.0,
            }],
        );
    }
}

fn register_skills(stage: &mut Stage, b: &Bindings, cfg: &AnimationConfig) {
    let categories: Vec<ElementId> = b.skills.iter().map(|s| s.element).collect();
    stage.hide(
        Scope::Responsive,
        &categories,
        &[(Prop::Opacity, 0.0), (Prop::Y, cfg.reveal_distance * 0.5)],
    );
    stage.batch(
        &categories,
        BatchConfig::once(at("top 85%"), Scope::Responsive),
        BatchEffect {
            step: step(cfg, &SHOWN, 0.6, "power3.out").stagger(cfg.dur(0.15)),
            activate: false,
        },
    );
    for skill in &b.skills {
        hide_until(
            stage,
            skill.element,
            "top 80%",
            &skill.pills,
            &[(Prop::Scale, 0.8), (Prop::Opacity, 0.0)],
            step(cfg, &[], 0.4, "back.out(1.2)").stagger(cfg.dur(0.03)),
        );
    }
}

fn register_awards(stage: &mut Stage, b: &Bindings, cfg: &AnimationConfig) {
    let awards = &b.awards;
    if let (Some(timeline), Some(progress)) = (awards.timeline, awards.progress) {
        stage.hide(Scope::Responsive, &[progress], &[(Prop::HeightPct, 0.0)]);
        stage.trigger(
            TriggerConfig::new(timeline, at("top 70%"))
                .end(at("bottom 40%"))
                .scrub(cfg.scrub)
                .scope(Scope::Responsive),
            vec![Effect::Fill(progress)],
        );
    }

    stage.hide(
        Scope::Responsive,
        &awards.items,
        &[(Prop::Opacity, 0.0), (Prop::X, TIMELINE_ITEM_SHIFT_PX)],
    );
    stage.batch(
        &awards.items,
        BatchConfig::once(at("top 80%"), Scope::Responsive),
        BatchEffect {
            step: step(cfg, &[(Prop::X, 0.0), (Prop::Opacity, 1.0)], 0.6, "power3.out")
                .stagger(cfg.dur(0.1)),
            activate: true,
        },
    );

    let Some(block) = awards.stats_block else {
        return;
    };
    if awards.stats.is_empty() {
        return;
    }
    let stats: Vec<ElementId> = awards.stats.iter().map(|s| s.element).collect();
    stage.hide(Scope::Responsive, &stats, &[(Prop::Opacity, 0.0), (Prop::Y, 20.0)]);
    let mut effects = vec![Effect::To {
        targets: stats,
        step: step(cfg, &SHOWN, 0.5, "power3.out").stagger(cfg.dur(0.08)),
    }];
    effects.extend(awards.stats.iter().enumerate().map(|(i, s)| Effect::Count {
        counter: s.number,
        delay: cfg.dur(0.08 * i as f32),
    }));
    stage.trigger(
        TriggerConfig::new(block, at("top 85%"))
            .once()
            .scope(Scope::Responsive),
        effects,
    );
}

fn register_contact(stage: &mut Stage, b: &Bindings, cfg: &AnimationConfig) {
    let c = &b.contact;
    let groups = [
        (c.title, &c.title_lines, "top 80%", [(Prop::Y, 50.0), (Prop::Opacity, 0.0)], step(cfg, &[], 0.8, "power3.out").stagger(cfg.dur(0.1))),
        (c.form, &c.groups, "top 80%", [(Prop::Y, 20.0), (Prop::Opacity, 0.0)], step(cfg, &[], 0.5, "power3.out").stagger(cfg.dur(0.08))),
        (c.info, &c.info_items, "top 85%", [(Prop::X, -20.0), (Prop::Opacity, 0.0)], step(cfg, &[], 0.5, "power3.out").stagger(cfg.dur(0.08))),
        (c.socials, &c.social_links, "top 90%", [(Prop::Scale, 0.0), (Prop::Opacity, 0.0)], step(cfg, &[], 0.4, "back.out(1.5)").stagger(cfg.dur(0.08))),
    ];
    for (anchor, targets, start, from, reveal) in groups {
        if let Some(anchor) = anchor {
            hide_until(stage, anchor, start, targets, &from, reveal);
        }
    }
}

/// Render `targets` at `from` right away and tween them back to rest once
/// `anchor` crosses `start`.
fn hide_until(
    stage: &mut Stage,
    anchor: ElementId,
    start: &str,
    targets: &[ElementId],
    from: &[(Prop, f32)],
    mut reveal: Step,
) {
    if targets.is_empty() {
        return;
    }
    stage.hide(Scope::Responsive, targets, from);
    reveal.props = from.iter().map(|(p, _)| (*p, rest_value(*p))).collect();
    stage.trigger(
        TriggerConfig::new(anchor, at(start)).once().scope(Scope::Responsive),
        vec![Effect::To {
            targets: targets.to_vec(),
            step: reveal,
        }],
    );
}

/// Value a property has when the element is untouched by animation.
pub fn rest_value(prop: Prop) -> f32 {
    match prop {
        Prop::Opacity | Prop::Scale => 1.0,
        Prop::WidthPct | Prop::HeightPct => 100.0,
        _ => 0.0,
    }
}

/// Everything an animated registration would reveal, for the static
/// reduced-motion presentation.
pub fn animated_elements(b: &Bindings) -> Vec<ElementId> {
    let mut all: Vec<ElementId> = Vec::new();
    all.extend(b.hero.label);
    all.extend(&b.hero.title_words);
    all.extend(b.hero.info);
    all.extend(b.hero.scroll_hint);
    all.extend(&b.common.titles);
    all.extend(&b.common.reveal_texts);
    all.extend(&b.common.numbers);
    all.extend(b.about.image);
    all.extend(b.projects.iter().map(|p| p.element));
    all.extend(b.skills.iter().map(|s| s.element));
    all.extend(b.skills.iter().flat_map(|s| s.pills.iter().copied()));
    all.extend(&b.awards.items);
    all.extend(b.awards.stats.iter().map(|s| s.element));
    all.extend(&b.contact.title_lines);
    all.extend(&b.contact.groups);
    all.extend(&b.contact.info_items);
    all.extend(&b.contact.social_links);
    all
}

/// Neutral, fully visible values used for reduced motion.
pub const NEUTRAL: [(Prop, f32); 5] = [
    (Prop::Opacity, 1.0),
    (Prop::X, 0.0),
    (Prop::Y, 0.0),
    (Prop::YPercent, 0.0),
    (Prop::Scale, 1.0),
];

