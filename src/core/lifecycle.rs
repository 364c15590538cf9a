//! Lifecycle controller: owns the application state and every engine, runs
//! the startup sequence, and turns browser input plus the frame clock into
//! [`Mutation`]s.

use super::{
    animated_elements, hero_initial, hero_timeline, magnetic_offset, preloader_initial,
    preloader_timeline, register_common, register_depth_stack, register_header,
    register_responsive, AnimationConfig, Bindings, Breakpoint, Completion, CounterTarget,
    CursorFollower, Cue, DepthStack, Ease, Effect, ElementId, Environment, FormPhase, HeaderState,
    Layout, MenuState, Prop, Scope, ScrollToOptions, SmoothScroll, Stage, Step, TriggerEvent,
    Visual, NEUTRAL,
};
use crate::constants::{
    COUNTER_DURATION_SEC, FORM_PRESSED_SCALE, FORM_SUBMIT_DELAY_SEC, FORM_SUCCESS_HOLD_SEC,
    MENU_LINK_SHIFT_PX, PRELOADER_REMOVE_DELAY_SEC, RESIZE_DEBOUNCE_SEC, RESIZE_MIN_DELTA_PX,
};
use fnv::FnvHashMap;
use glam::Vec2;

/// One change for the binding layer to apply to the page.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    /// Write the touched properties of `Visual` as inline style.
    Style(ElementId, Visual),
    Class {
        element: ElementId,
        class: &'static str,
        on: bool,
    },
    Text(ElementId, String),
    /// Move the window to this scroll offset.
    ScrollTo(f32),
    /// Centre a cursor part on `position` (client pixels).
    Cursor { element: ElementId, position: Vec2 },
    Remove(ElementId),
    Disabled(ElementId, bool),
    ResetForm(ElementId),
    /// Append a copy of the element's children to itself.
    DuplicateContent(ElementId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
    Created,
    Preloading,
    Running,
    TornDown,
}

/// Everything the page-level script used to keep in globals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppState {
    pub env: Environment,
    pub breakpoint: Breakpoint,
    pub config: AnimationConfig,
    pub menu: MenuState,
    /// Document hidden (tab in background).
    pub hidden: bool,
    pub phase: LifecyclePhase,
    pub form: FormPhase,
}

/// Trailing-edge debounce with a deadline polled from the frame loop.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer<T> {
    wait: f64,
    pending: Option<(f64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: f64) -> Self {
        Self { wait, pending: None }
    }

    /// Record `value`, restarting the wait.
    pub fn push(&mut self, now: f64, value: T) {
        self.pending = Some((now + self.wait, value));
    }

    /// The last pushed value once the wait has elapsed.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        match self.pending {
            Some((at, _)) if now >= at => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Ignores width changes smaller than [`RESIZE_MIN_DELTA_PX`] (mobile URL
/// bars collapsing and similar).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeGate {
    width: f32,
}

impl ResizeGate {
    pub fn new(width: f32) -> Self {
        Self { width }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn accept(&mut self, width: f32) -> bool {
        if (width - self.width).abs() < RESIZE_MIN_DELTA_PX {
            return false;
        }
        self.width = width;
        true
    }
}

pub struct Lifecycle {
    state: AppState,
    bindings: Bindings,
    stage: Stage,
    scroll: Option<SmoothScroll>,
    depth: DepthStack,
    cursor: CursorFollower,
    header: HeaderState,
    counters: FnvHashMap<ElementId, CounterTarget>,
    resize: Debouncer<f32>,
    gate: ResizeGate,
    /// `Some(hard)` when a refresh was requested for the next frame.
    pending_refresh: Option<bool>,
    pending_anchor: Option<f32>,
    native_position: f32,
    last_frame: Option<f64>,
    refreshes: u32,
    mutations: Vec<Mutation>,
}

impl Lifecycle {
    pub fn new(env: Environment, bindings: Bindings) -> Self {
        let config = AnimationConfig::for_environment(&env);
        let reduced = env.reduced_motion;
        let cursor = CursorFollower::new(config.pointer_effects && bindings.cursor.complete());
        let counters = bindings
            .about
            .stats
            .iter()
            .copied()
            .chain(bindings.awards.stats.iter().map(|s| s.number))
            .map(|c| (c.element, c.target))
            .collect();
        Self {
            state: AppState {
                env,
                breakpoint: Breakpoint::from_width(env.viewport_width),
                config,
                menu: MenuState::Closed,
                hidden: false,
                phase: LifecyclePhase::Created,
                form: FormPhase::Idle,
            },
            bindings,
            stage: Stage::new(),
            scroll: (!reduced).then(|| SmoothScroll::new(0.0)),
            depth: DepthStack::new(&[], config, reduced),
            cursor,
            header: HeaderState::default(),
            counters,
            resize: Debouncer::new(RESIZE_DEBOUNCE_SEC),
            gate: ResizeGate::new(env.viewport_width),
            pending_refresh: None,
            pending_anchor: None,
            native_position: 0.0,
            last_frame: None,
            refreshes: 0,
            mutations: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn depth(&self) -> &DepthStack {
        &self.depth
    }

    pub fn smooth_scroll(&self) -> Option<&SmoothScroll> {
        self.scroll.as_ref()
    }

    pub fn cursor_enabled(&self) -> bool {
        self.cursor.is_enabled()
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.phase == LifecyclePhase::TornDown
    }

    /// Number of registry refreshes performed so far.
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    /// Drain pending page changes, in the order they were produced.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    fn class(&mut self, element: Option<ElementId>, class: &'static str, on: bool) {
        if let Some(element) = element {
            self.mutations.push(Mutation::Class { element, class, on });
        }
    }

    // ---------------- Startup ----------------

    pub fn boot(&mut self, now: f64) {
        if self.state.phase != LifecyclePhase::Created {
            return;
        }
        self.class(self.bindings.root, "js-enabled", true);
        if let Some(track) = self.bindings.marquee {
            self.mutations.push(Mutation::DuplicateContent(track));
        }
        register_header(&mut self.stage, self.bindings.header);
        self.pending_refresh = Some(true);

        if self.state.env.reduced_motion {
            self.show_static();
            if let Some(root) = self.bindings.preloader.root {
                self.mutations.push(Mutation::Remove(root));
            }
            self.state.phase = LifecyclePhase::Running;
            log::info!("[boot] reduced motion, static presentation");
            self.flush();
            return;
        }

        let cfg = self.state.config;
        self.stage.engine.set_all(
            &self.bindings.menu.links,
            &[(Prop::Opacity, 0.0), (Prop::X, MENU_LINK_SHIFT_PX)],
        );
        hero_initial(&mut self.stage.engine, &self.bindings.hero, &cfg);
        self.register_scroll_animations();

        if self.bindings.preloader.root.is_some() {
            preloader_initial(&mut self.stage.engine, &self.bindings.preloader);
            preloader_timeline(&self.bindings.preloader).play(&mut self.stage.engine, now);
            self.state.phase = LifecyclePhase::Preloading;
            log::info!("[boot] preloader started");
        } else {
            self.handle_cue(Cue::PreloaderDone, now);
        }
        self.flush();
    }

    fn register_scroll_animations(&mut self) {
        let cfg = self.state.config;
        register_common(&mut self.stage, &self.bindings, &cfg);
        self.depth = register_responsive(&mut self.stage, &self.bindings, &cfg, self.state.breakpoint);
        let first = self.depth.planes().first().map(|p| p.element);
        self.class(first, "is-focused", true);
    }

    // Everything visible, nothing deferred.
    fn show_static(&mut self) {
        let b = &self.bindings;
        self.stage.engine.set_all(&animated_elements(b), &NEUTRAL);
        let items = b.awards.items.clone();
        for item in items {
            self.class(Some(item), "active", true);
        }
        let planes: Vec<(ElementId, Option<u32>)> =
            self.bindings.projects.iter().map(|p| (p.element, p.depth)).collect();
        self.depth = DepthStack::new(&planes, AnimationConfig::REDUCED, true);
        let first = self.depth.planes().first().map(|p| p.element);
        self.class(first, "is-focused", true);
        let finals: Vec<(ElementId, String)> = self
            .counters
            .iter()
            .map(|(id, t)| (*id, t.final_text()))
            .collect();
        for (id, text) in finals {
            self.mutations.push(Mutation::Text(id, text));
        }
    }

    // ---------------- Frame ----------------

    /// One animation frame at `now` seconds.
    pub fn frame(&mut self, now: f64, layout: &dyn Layout) {
        if self.is_torn_down() {
            return;
        }
        let dt = self.last_frame.map_or(0.0, |t| (now - t).max(0.0) as f32);
        self.last_frame = Some(now);

        if let Some(width) = self.resize.poll(now) {
            self.settle_resize(width);
        }
        self.refresh_if_needed(layout);

        let scroll = match &mut self.scroll {
            Some(smooth) => {
                if let Some(frame) = smooth.raf(now) {
                    if frame.animated {
                        self.mutations.push(Mutation::ScrollTo(frame.position));
                    }
                }
                smooth.position()
            }
            None => self.native_position,
        };

        if self.state.phase == LifecyclePhase::Running {
            let mut events = Vec::new();
            self.stage.registry.update(scroll, dt, &mut events);
            for event in events {
                self.dispatch(event, now);
            }
        }

        if let Some((dot, outline)) = self.cursor.tick() {
            let parts = &self.bindings.cursor;
            for (element, position) in [(parts.dot, dot), (parts.outline, outline)] {
                if let Some(element) = element {
                    self.mutations.push(Mutation::Cursor { element, position });
                }
            }
        }

        let mut cues = Vec::new();
        self.stage.engine.tick(now, &mut cues);
        for cue in cues {
            self.handle_cue(cue, now);
        }
        self.flush();
    }

    fn refresh_if_needed(&mut self, layout: &dyn Layout) {
        let hard = match self.pending_refresh.take() {
            Some(hard) => hard,
            None if self.stage.registry.needs_refresh() => false,
            None => return,
        };
        self.stage.registry.refresh(layout, hard);
        self.refreshes += 1;
        if let (Some(smooth), Some(max)) = (&mut self.scroll, self.stage.registry.max_scroll()) {
            smooth.set_limit(max);
        }
    }

    fn dispatch(&mut self, event: TriggerEvent, now: f64) {
        match event {
            TriggerEvent::Enter(id) => {
                let effects = self.stage.effects(id).to_vec();
                for effect in effects {
                    self.run_effect(effect, now);
                }
            }
            TriggerEvent::LeaveBack(_) => {}
            TriggerEvent::Progress(id, progress) => {
                let effects = self.stage.effects(id).to_vec();
                for effect in effects {
                    match effect {
                        Effect::Plane(index) => self.drive_plane(index, progress),
                        Effect::Fill(bar) => {
                            self.stage.engine.set(bar, &[(Prop::HeightPct, progress * 100.0)])
                        }
                        _ => {}
                    }
                }
            }
            TriggerEvent::Update(id, position) => {
                if self.stage.effects(id).contains(&Effect::Header) {
                    self.update_header(position);
                }
            }
            TriggerEvent::BatchEnter { batch, elements } => {
                let Some(effect) = self.stage.batch_effect(batch).cloned() else {
                    return;
                };
                let done = if effect.activate {
                    Completion::Each(Cue::Activate)
                } else {
                    Completion::None
                };
                self.stage.engine.to(&elements, &effect.step, now, done);
            }
        }
    }

    fn run_effect(&mut self, effect: Effect, now: f64) {
        match effect {
            Effect::To { targets, step } => {
                self.stage.engine.to(&targets, &step, now, Completion::None)
            }
            Effect::Count { counter, delay } => {
                let el = counter.element;
                self.stage.engine.set(el, &[(Prop::Value, 0.0)]);
                let step = Step::new(
                    &[(Prop::Value, counter.target.value as f32)],
                    self.state.config.dur(COUNTER_DURATION_SEC),
                    Ease::POWER2_OUT,
                )
                .delay(delay);
                self.stage.engine.to(&[el], &step, now, Completion::None);
            }
            Effect::Plane(_) | Effect::Fill(_) | Effect::Header => {}
        }
    }

    fn drive_plane(&mut self, index: usize, progress: f32) {
        if let Some(change) = self.depth.apply_progress(index, progress) {
            self.class(change.previous, "is-focused", false);
            self.class(change.current, "is-focused", true);
        }
        self.render_plane(index);
    }

    fn render_plane(&mut self, index: usize) {
        let Some(plane) = self.depth.planes().get(index) else {
            return;
        };
        let element = plane.element;
        if let Some((opacity, scale, offset)) = self.depth.rendered(index) {
            self.stage.engine.set(
                element,
                &[(Prop::Opacity, opacity), (Prop::Scale, scale), (Prop::Y, offset)],
            );
        }
    }

    fn update_header(&mut self, position: f32) {
        let Some(header) = self.bindings.header else {
            return;
        };
        let (scrolled, hidden) = self.header.update(position);
        if scrolled {
            let on = self.header.scrolled;
            self.class(Some(header), "scrolled", on);
        }
        if hidden {
            let shift = if self.header.hidden { -100.0 } else { 0.0 };
            self.stage.engine.set(header, &[(Prop::YPercent, shift)]);
        }
    }

    fn handle_cue(&mut self, cue: Cue, now: f64) {
        match cue {
            Cue::PreloaderDone => {
                if self.state.phase == LifecyclePhase::Running {
                    return;
                }
                if self.bindings.preloader.root.is_some() {
                    self.stage
                        .engine
                        .schedule(now + PRELOADER_REMOVE_DELAY_SEC, Cue::PreloaderRemove);
                }
                let cfg = self.state.config;
                hero_timeline(&self.bindings.hero, &cfg).play(&mut self.stage.engine, now);
                self.state.phase = LifecyclePhase::Running;
                log::info!("[boot] hero reveal, scroll animations live");
            }
            Cue::PreloaderRemove => {
                if let Some(root) = self.bindings.preloader.root {
                    self.mutations.push(Mutation::Remove(root));
                }
            }
            Cue::MenuClosed => {
                if self.state.menu != MenuState::Closing {
                    return;
                }
                self.state.menu = MenuState::Closed;
                self.class(self.bindings.menu.panel, "active", false);
                if !self.state.hidden {
                    if let Some(smooth) = &mut self.scroll {
                        smooth.start();
                    }
                }
                if let Some(target) = self.pending_anchor.take() {
                    self.scroll_to(target);
                }
                log::info!("[menu] closed");
            }
            Cue::Activate(element) => self.class(Some(element), "active", true),
            Cue::FormSuccess => {
                if self.state.form != FormPhase::Sending {
                    return;
                }
                let submit = self.bindings.contact.submit;
                self.class(submit, "success", true);
                if let Some(submit) = submit {
                    self.stage.engine.set(submit, &[(Prop::Scale, 1.0)]);
                }
                self.state.form = FormPhase::Success;
                self.stage
                    .engine
                    .schedule(now + FORM_SUCCESS_HOLD_SEC, Cue::FormReset);
            }
            Cue::FormReset => {
                if self.state.form != FormPhase::Success {
                    return;
                }
                let submit = self.bindings.contact.submit;
                self.class(submit, "success", false);
                if let Some(submit) = submit {
                    self.mutations.push(Mutation::Disabled(submit, false));
                }
                if let Some(form) = self.bindings.contact.form {
                    self.mutations.push(Mutation::ResetForm(form));
                }
                self.state.form = FormPhase::Idle;
            }
        }
    }

    fn flush(&mut self) {
        for (id, visual) in self.stage.engine.take_dirty() {
            if visual.has_style() {
                self.mutations.push(Mutation::Style(id, visual));
            }
            if visual.touched(Prop::Value) {
                if let Some(text) = self.counter_text(id, visual.value) {
                    self.mutations.push(Mutation::Text(id, text));
                }
            }
        }
    }

    fn counter_text(&self, element: ElementId, value: f32) -> Option<String> {
        if self.bindings.preloader.counter == Some(element) {
            return Some(format!("{}", value.round() as i64));
        }
        self.counters
            .get(&element)
            .map(|target| target.format(f64::from(value)))
    }

    // ---------------- Pointer ----------------

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.cursor.is_enabled() {
            self.cursor.pointer_move(x, y);
        }
    }

    /// Pointer entered or left a link, button or input.
    pub fn interactive_hover(&mut self, on: bool) {
        if !self.cursor.is_enabled() {
            return;
        }
        let root = self.bindings.cursor.root;
        if self.cursor.set_hover(on) {
            self.class(root, "cursor-hover", on);
        }
        if !on && self.cursor.set_view(false) {
            self.class(root, "cursor-view", false);
        }
        self.flush();
    }

    /// Pointer entered or left a `data-cursor="view"` element.
    pub fn view_hover(&mut self, on: bool) {
        if self.cursor.is_enabled() && self.cursor.set_view(on) {
            self.class(self.bindings.cursor.root, "cursor-view", on);
        }
    }

    /// Pointer left or re-entered the document.
    pub fn pointer_presence(&mut self, inside: bool) {
        if !self.cursor.is_enabled() || !self.cursor.set_visible(inside) {
            return;
        }
        if let Some(root) = self.bindings.cursor.root {
            let opacity = if inside { 1.0 } else { 0.0 };
            self.stage.engine.set(root, &[(Prop::Opacity, opacity)]);
            self.flush();
        }
    }

    /// Pointer over a magnetic button whose box is `rect_min + rect_size`.
    pub fn magnetic_move(&mut self, element: ElementId, pointer: Vec2, rect_min: Vec2, rect_size: Vec2) {
        if !self.state.config.pointer_effects {
            return;
        }
        let Some(binding) = self.bindings.magnetic.iter().find(|m| m.element == element) else {
            return;
        };
        let offset = magnetic_offset(pointer, rect_min, rect_size, binding.strength);
        self.stage
            .engine
            .set(element, &[(Prop::X, offset.x), (Prop::Y, offset.y)]);
        self.flush();
    }

    pub fn magnetic_leave(&mut self, element: ElementId) {
        if !self.state.config.pointer_effects {
            return;
        }
        self.stage.engine.set(element, &[(Prop::X, 0.0), (Prop::Y, 0.0)]);
        self.flush();
    }

    /// Hover micro-interaction on a project card.
    pub fn card_hover(&mut self, element: ElementId, on: bool) {
        let Some(index) = self.depth.index_of(element) else {
            return;
        };
        if self.depth.set_hover(index, on) {
            self.render_plane(index);
            self.flush();
        }
    }

    // ---------------- Scroll ----------------

    /// Wheel delta in pixels. Returns `true` when the native scroll must be
    /// prevented.
    pub fn wheel(&mut self, delta: f32) -> bool {
        if self.is_torn_down() {
            return false;
        }
        self.scroll.as_mut().map_or(false, |smooth| smooth.wheel(delta))
    }

    /// The window scrolled by itself (touch, keyboard, scrollbar).
    pub fn native_scroll(&mut self, position: f32) {
        self.native_position = position;
        if let Some(smooth) = &mut self.scroll {
            smooth.sync_native(position);
        }
    }

    /// In-page anchor pointing at document offset `target`. Returns `true`
    /// when the glide was taken over (prevent the native jump).
    pub fn anchor(&mut self, target: Option<f32>, now: f64) -> bool {
        let Some(target) = target else {
            return false;
        };
        if self.scroll.as_ref().map_or(true, |s| s.is_destroyed()) {
            return false;
        }
        if self.state.menu.holds_scroll() {
            self.pending_anchor = Some(target);
            self.close_menu(now);
        } else {
            self.scroll_to(target);
        }
        true
    }

    fn scroll_to(&mut self, target: f32) {
        if let Some(smooth) = &mut self.scroll {
            smooth.scroll_to(target, ScrollToOptions::default());
        }
    }

    // ---------------- Menu ----------------

    pub fn menu_toggle(&mut self, now: f64) {
        if self.state.menu.is_open() {
            self.close_menu(now);
        } else {
            self.open_menu(now);
        }
    }

    /// A link inside the menu was followed.
    pub fn menu_link(&mut self, now: f64) {
        self.close_menu(now);
    }

    pub fn escape(&mut self, now: f64) {
        self.close_menu(now);
    }

    fn open_menu(&mut self, now: f64) {
        let menu = &self.bindings.menu;
        if menu.toggle.is_none() || menu.panel.is_none() || self.is_torn_down() {
            return;
        }
        let (toggle, panel, links) = (menu.toggle, menu.panel, menu.links.clone());
        self.state.menu = MenuState::Open;
        self.pending_anchor = None;
        self.class(toggle, "active", true);
        self.class(panel, "active", true);
        if let Some(smooth) = &mut self.scroll {
            smooth.stop();
        }
        let cfg = self.state.config;
        let step = Step::new(&[(Prop::Opacity, 1.0), (Prop::X, 0.0)], cfg.dur(0.6), Ease::POWER3_OUT)
            .stagger(cfg.dur(0.08))
            .delay(cfg.dur(0.4));
        self.stage.engine.to(&links, &step, now, Completion::None);
        log::info!("[menu] open");
        self.flush();
    }

    fn close_menu(&mut self, now: f64) {
        if !self.state.menu.is_open() {
            return;
        }
        self.state.menu = MenuState::Closing;
        self.class(self.bindings.menu.toggle, "active", false);
        let cfg = self.state.config;
        let step = Step::new(
            &[(Prop::Opacity, 0.0), (Prop::X, MENU_LINK_SHIFT_PX)],
            cfg.dur(0.3),
            Ease::POWER2_IN,
        )
        .stagger(cfg.dur(0.03));
        let links = self.bindings.menu.links.clone();
        self.stage
            .engine
            .to(&links, &step, now, Completion::Group(Cue::MenuClosed));
        self.flush();
    }

    // ---------------- Form ----------------

    /// Contact form submitted. Returns `true` when the submission was taken
    /// over (prevent the native submit).
    pub fn submit_form(&mut self, now: f64) -> bool {
        if self.bindings.contact.form.is_none() {
            return false;
        }
        if self.state.form != FormPhase::Idle {
            return true;
        }
        if let Some(submit) = self.bindings.contact.submit {
            self.mutations.push(Mutation::Disabled(submit, true));
            self.stage
                .engine
                .set(submit, &[(Prop::Scale, FORM_PRESSED_SCALE)]);
        }
        self.state.form = FormPhase::Sending;
        self.stage
            .engine
            .schedule(now + FORM_SUBMIT_DELAY_SEC, Cue::FormSuccess);
        self.flush();
        true
    }

    // ---------------- Environment ----------------

    /// Window resized to `width`; settles after the debounce window.
    pub fn resize(&mut self, width: f32, now: f64) {
        if !self.is_torn_down() {
            self.resize.push(now, width);
        }
    }

    fn settle_resize(&mut self, width: f32) {
        if !self.gate.accept(width) {
            log::debug!("[resize] {:.0}px ignored", width);
            return;
        }
        self.state.env.viewport_width = width;
        let breakpoint = Breakpoint::from_width(width);
        if breakpoint.is_handheld() && self.cursor.is_enabled() {
            self.cursor.disable();
        }
        if breakpoint == self.state.breakpoint || self.state.env.reduced_motion {
            self.request_refresh(false);
            return;
        }
        log::info!("[resize] {:?} -> {:?}", self.state.breakpoint, breakpoint);
        let relayout = breakpoint.is_narrow() != self.state.breakpoint.is_narrow();
        self.state.breakpoint = breakpoint;
        self.state.config = AnimationConfig::for_environment(&self.state.env);
        let previous = self.depth.focused().map(|i| self.depth.planes()[i].element);
        self.class(previous, "is-focused", false);
        // Sections already revealed stay revealed unless the layout itself
        // switches between the section timelines and the narrow batches.
        self.stage.kill_scope(Scope::Stack);
        let cfg = self.state.config;
        self.depth = if relayout {
            self.stage.kill_scope(Scope::Responsive);
            register_responsive(&mut self.stage, &self.bindings, &cfg, breakpoint)
        } else {
            register_depth_stack(&mut self.stage, &self.bindings, &cfg)
        };
        let first = self.depth.planes().first().map(|p| p.element);
        self.class(first, "is-focused", true);
        self.request_refresh(true);
    }

    /// Recompute trigger boundaries on the next frame; `hard` also
    /// re-measures the scroll extent (load, fonts ready).
    pub fn request_refresh(&mut self, hard: bool) {
        self.pending_refresh = Some(hard || self.pending_refresh.unwrap_or(false));
    }

    pub fn visibility(&mut self, hidden: bool) {
        self.state.hidden = hidden;
        let holds = self.state.menu.holds_scroll();
        let Some(smooth) = &mut self.scroll else {
            return;
        };
        if hidden {
            smooth.stop();
        } else if !holds {
            smooth.start();
        }
    }

    /// Release everything. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.stage.kill_all();
        if let Some(smooth) = &mut self.scroll {
            smooth.destroy();
        }
        self.cursor.disable();
        self.resize.cancel();
        self.pending_refresh = None;
        self.state.phase = LifecyclePhase::TornDown;
        log::info!("[boot] torn down");
    }
}
