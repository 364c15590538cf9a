// Host-side tests for the viewport trigger registry.
// Geometry comes from a fixed table instead of the page.

use folio_motion::core::*;
use std::collections::HashMap;

struct StaticLayout {
    bounds: HashMap<ElementId, Bounds>,
    viewport: f32,
    max: f32,
}

impl StaticLayout {
    fn new(elements: &[(u32, f32, f32)]) -> Self {
        Self {
            bounds: elements
                .iter()
                .map(|(id, top, height)| (ElementId(*id), Bounds::new(*top, *height)))
                .collect(),
            viewport: 1000.0,
            max: 5000.0,
        }
    }
}

impl Layout for StaticLayout {
    fn bounds(&self, element: ElementId) -> Option<Bounds> {
        self.bounds.get(&element).copied()
    }

    fn viewport_height(&self) -> f32 {
        self.viewport
    }

    fn max_scroll(&self) -> f32 {
        self.max
    }
}

fn run(registry: &mut TriggerRegistry, positions: &[f32]) -> Vec<TriggerEvent> {
    let mut out = Vec::new();
    for p in positions {
        registry.update(*p, 1.0 / 60.0, &mut out);
    }
    out
}

#[test]
fn once_trigger_fires_exactly_once() {
    let layout = StaticLayout::new(&[(1, 1500.0, 200.0)]);
    let mut registry = TriggerRegistry::new();
    let id = registry.register(TriggerConfig::new(ElementId(1), ScrollPoint::top(85.0)).once());
    registry.refresh(&layout, true);

    // element top at 85% of a 1000px viewport: 1500 - 850
    assert!(run(&mut registry, &[0.0, 400.0, 649.0]).is_empty());
    let events = run(&mut registry, &[651.0, 300.0, 900.0, 100.0, 2000.0]);
    assert_eq!(events, vec![TriggerEvent::Enter(id)]);
    assert!(!registry.is_live(id), "once trigger must detach after firing");
}

#[test]
fn repeatable_trigger_reports_enter_and_leave_back() {
    let layout = StaticLayout::new(&[(1, 1500.0, 200.0)]);
    let mut registry = TriggerRegistry::new();
    let id = registry.register(TriggerConfig::new(ElementId(1), ScrollPoint::top(85.0)));
    registry.refresh(&layout, true);

    let events = run(&mut registry, &[0.0, 700.0, 300.0, 900.0, 100.0, 2000.0]);
    let enters = events.iter().filter(|e| **e == TriggerEvent::Enter(id)).count();
    let leaves = events
        .iter()
        .filter(|e| **e == TriggerEvent::LeaveBack(id))
        .count();
    assert_eq!(enters, 3);
    assert_eq!(leaves, 2);
}

#[test]
fn registrations_stay_inert_until_refreshed() {
    let layout = StaticLayout::new(&[(1, 100.0, 50.0)]);
    let mut registry = TriggerRegistry::new();
    let id = registry.register(TriggerConfig::new(ElementId(1), ScrollPoint::top(85.0)));
    assert!(registry.needs_refresh());
    assert!(run(&mut registry, &[0.0, 4000.0]).is_empty());

    registry.refresh(&layout, false);
    assert!(!registry.needs_refresh());
    assert_eq!(run(&mut registry, &[0.0]), vec![TriggerEvent::Enter(id)]);
}

#[test]
fn unmeasurable_element_never_fires() {
    let layout = StaticLayout::new(&[]);
    let mut registry = TriggerRegistry::new();
    registry.register(TriggerConfig::new(ElementId(9), ScrollPoint::top(85.0)));
    registry.refresh(&layout, true);
    assert!(run(&mut registry, &[0.0, 2500.0, 5000.0]).is_empty());
}

#[test]
fn batch_coalesces_members_entering_together() {
    let layout = StaticLayout::new(&[(1, 1000.0, 100.0), (2, 1100.0, 100.0), (3, 3000.0, 100.0)]);
    let mut registry = TriggerRegistry::new();
    let batch = registry.batch(
        &[ElementId(1), ElementId(2), ElementId(3)],
        BatchConfig::once(ScrollPoint::top(85.0), Scope::Global),
    );
    registry.refresh(&layout, true);

    let mut out = Vec::new();
    registry.update(0.0, 0.0, &mut out);
    assert!(out.is_empty());

    registry.update(300.0, 0.0, &mut out);
    assert_eq!(
        out,
        vec![TriggerEvent::BatchEnter {
            batch,
            elements: ElementSet::from_slice(&[ElementId(1), ElementId(2)]),
        }]
    );

    out.clear();
    registry.update(2200.0, 0.0, &mut out);
    assert_eq!(
        out,
        vec![TriggerEvent::BatchEnter {
            batch,
            elements: ElementSet::from_slice(&[ElementId(3)]),
        }]
    );

    out.clear();
    registry.update(0.0, 0.0, &mut out);
    registry.update(4000.0, 0.0, &mut out);
    assert!(out.is_empty(), "once batches never re-fire");
    assert!(!registry.has_batch(batch));
}

#[test]
fn crossings_are_ordered_by_threshold_in_travel_direction() {
    let layout = StaticLayout::new(&[(1, 2000.0, 100.0), (2, 1200.0, 100.0)]);
    let mut registry = TriggerRegistry::new();
    let far = registry.register(TriggerConfig::new(ElementId(1), ScrollPoint::top(85.0)));
    let near = registry.register(TriggerConfig::new(ElementId(2), ScrollPoint::top(85.0)));
    registry.refresh(&layout, true);

    let down = run(&mut registry, &[0.0, 1500.0]);
    assert_eq!(down, vec![TriggerEvent::Enter(near), TriggerEvent::Enter(far)]);

    let up = run(&mut registry, &[0.0]);
    assert_eq!(
        up,
        vec![TriggerEvent::LeaveBack(far), TriggerEvent::LeaveBack(near)]
    );
}

#[test]
fn equal_thresholds_keep_registration_order() {
    let layout = StaticLayout::new(&[(1, 1000.0, 100.0), (2, 1000.0, 300.0)]);
    let mut registry = TriggerRegistry::new();
    let a = registry.register(TriggerConfig::new(ElementId(1), ScrollPoint::top(50.0)));
    let b = registry.register(TriggerConfig::new(ElementId(2), ScrollPoint::top(50.0)));
    registry.refresh(&layout, true);

    let events = run(&mut registry, &[0.0, 800.0]);
    assert_eq!(events, vec![TriggerEvent::Enter(a), TriggerEvent::Enter(b)]);
}

#[test]
fn scrub_starts_at_target_then_converges() {
    let layout = StaticLayout::new(&[]);
    let mut registry = TriggerRegistry::new();
    let id = registry.register(TriggerConfig {
        target: None,
        start: ScrollPoint::Absolute(0.0),
        end: Some(ScrollPoint::Absolute(1000.0)),
        once: false,
        scrub: Some(0.5),
        watch: false,
        scope: Scope::Global,
    });
    registry.refresh(&layout, true);

    let mut out = Vec::new();
    registry.update(500.0, 0.0, &mut out);
    assert_eq!(out, vec![TriggerEvent::Progress(id, 0.5)]);

    let mut last = 0.5;
    for _ in 0..400 {
        out.clear();
        registry.update(1000.0, 1.0 / 60.0, &mut out);
        for event in &out {
            if let TriggerEvent::Progress(_, p) = event {
                assert!(*p >= last, "scrub progress went backwards: {last} -> {p}");
                last = *p;
            }
        }
    }
    assert_eq!(last, 1.0);

    out.clear();
    registry.update(1000.0, 1.0 / 60.0, &mut out);
    assert!(out.is_empty(), "settled scrub reports nothing");
}

#[test]
fn zero_lag_scrub_follows_scroll_exactly() {
    let layout = StaticLayout::new(&[(1, 2000.0, 1000.0)]);
    let mut registry = TriggerRegistry::new();
    let id = registry.register(
        TriggerConfig::new(ElementId(1), ScrollPoint::top(100.0))
            .end(ScrollPoint::bottom(0.0))
            .scrub(0.0),
    );
    registry.refresh(&layout, true);
    // start 1000, end 3000
    let events = run(&mut registry, &[1500.0]);
    assert_eq!(events, vec![TriggerEvent::Progress(id, 0.25)]);
    let events = run(&mut registry, &[9000.0]);
    assert_eq!(events, vec![TriggerEvent::Progress(id, 1.0)]);
}

#[test]
fn watch_reports_every_position_change() {
    let layout = StaticLayout::new(&[]);
    let mut registry = TriggerRegistry::new();
    let id = registry.register(TriggerConfig::page().watch());
    registry.refresh(&layout, true);

    let events: Vec<TriggerEvent> = run(&mut registry, &[0.0, 0.0, 120.0, 120.0, 80.0])
        .into_iter()
        .filter(|e| matches!(e, TriggerEvent::Update(..)))
        .collect();
    assert_eq!(
        events,
        vec![
            TriggerEvent::Update(id, 0.0),
            TriggerEvent::Update(id, 120.0),
            TriggerEvent::Update(id, 80.0),
        ]
    );
}

#[test]
fn kill_scope_only_drops_that_scope() {
    let layout = StaticLayout::new(&[(1, 1000.0, 100.0), (2, 1000.0, 100.0)]);
    let mut registry = TriggerRegistry::new();
    let global = registry.register(TriggerConfig::new(ElementId(1), ScrollPoint::top(85.0)));
    let responsive = registry.register(
        TriggerConfig::new(ElementId(2), ScrollPoint::top(85.0)).scope(Scope::Responsive),
    );
    let batch = registry.batch(
        &[ElementId(2)],
        BatchConfig::once(ScrollPoint::top(85.0), Scope::Responsive),
    );
    registry.refresh(&layout, true);
    assert_eq!(registry.live_count(), 3);

    registry.kill_scope(Scope::Responsive);
    assert!(registry.is_live(global));
    assert!(!registry.is_live(responsive));
    assert!(!registry.has_batch(batch));
    assert_eq!(registry.live_count(), 1);

    registry.kill_all();
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn killing_a_scope_puts_its_hidden_elements_back() {
    let (title, image, plane) = (ElementId(1), ElementId(2), ElementId(3));
    let mut stage = Stage::new();
    stage.hide(Scope::Global, &[title], &[(Prop::Opacity, 0.0)]);
    stage.hide(Scope::Responsive, &[image], &[(Prop::Opacity, 0.0), (Prop::Scale, 0.95)]);
    stage.hide(Scope::Stack, &[plane], &[(Prop::Y, 60.0)]);
    let reveal = Step::new(&[(Prop::Opacity, 0.5)], 1.0, Ease::Linear);
    stage.engine.to(&[image], &reveal, 0.0, Completion::None);
    stage.trigger(
        TriggerConfig::new(image, ScrollPoint::top(80.0)).once().scope(Scope::Responsive),
        Vec::new(),
    );

    stage.kill_scope(Scope::Responsive);
    assert_eq!(stage.registry.live_count(), 0);
    let v = stage.engine.visual(image);
    assert_eq!((v.opacity, v.scale), (1.0, 1.0));
    // the restore overrides the running tween
    stage.engine.tick(0.5, &mut Vec::new());
    assert_eq!(stage.engine.visual(image).opacity, 1.0);
    assert_eq!(stage.engine.visual(title).opacity, 0.0);
    assert_eq!(stage.engine.visual(plane).y, 60.0);

    // a second kill has nothing left to restore
    stage.engine.set(image, &[(Prop::Opacity, 0.3)]);
    stage.kill_scope(Scope::Responsive);
    assert_eq!(stage.engine.visual(image).opacity, 0.3);

    stage.kill_scope(Scope::Stack);
    assert_eq!(stage.engine.visual(plane).y, 0.0);
}

#[test]
fn soft_refresh_keeps_scroll_extent() {
    let mut layout = StaticLayout::new(&[]);
    let mut registry = TriggerRegistry::new();
    registry.register(TriggerConfig::page());
    registry.refresh(&layout, false);
    assert_eq!(registry.max_scroll(), Some(5000.0));

    layout.max = 7000.0;
    registry.refresh(&layout, false);
    assert_eq!(registry.max_scroll(), Some(5000.0));
    registry.refresh(&layout, true);
    assert_eq!(registry.max_scroll(), Some(7000.0));
}

#[test]
fn scroll_point_parses_threshold_notation() {
    assert_eq!("top 85%".parse::<ScrollPoint>(), Ok(ScrollPoint::top(85.0)));
    assert_eq!("bottom 40%".parse::<ScrollPoint>(), Ok(ScrollPoint::bottom(40.0)));
    assert_eq!("max".parse::<ScrollPoint>(), Ok(ScrollPoint::Max));
    assert_eq!("120px".parse::<ScrollPoint>(), Ok(ScrollPoint::Absolute(120.0)));
    assert_eq!(
        "center 100px".parse::<ScrollPoint>(),
        Ok(ScrollPoint::Relative(Threshold {
            element: Offset::Fraction(0.5),
            viewport: Offset::Pixels(100.0),
        }))
    );

    for bad in ["", "top", "sideways 10%", "top 10% extra", "top ten%"] {
        assert_eq!(
            bad.parse::<ScrollPoint>(),
            Err(ParseError::Threshold(bad.to_string())),
            "`{bad}` should not parse"
        );
    }
}

#[test]
fn relative_point_resolves_against_element_and_viewport() {
    let bounds = Some(Bounds::new(2000.0, 400.0));
    assert_eq!(ScrollPoint::top(85.0).resolve(bounds, 1000.0, 9000.0), Some(1150.0));
    assert_eq!(ScrollPoint::bottom(40.0).resolve(bounds, 1000.0, 9000.0), Some(2000.0));
    assert_eq!(ScrollPoint::Max.resolve(None, 1000.0, 9000.0), Some(9000.0));
    assert_eq!(ScrollPoint::top(85.0).resolve(None, 1000.0, 9000.0), None);
}
