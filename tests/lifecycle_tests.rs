// Host-side tests for the lifecycle controller: startup, scroll-driven
// reveals, resize handling, menu, form and teardown.
// The page is a fixed table of element boxes; time is driven by hand.

use folio_motion::core::*;
use glam::Vec2;
use std::collections::HashMap;

const FRAME: f64 = 1.0 / 60.0;

fn id(n: u32) -> ElementId {
    ElementId(n)
}

fn counter(n: u32, value: f64) -> CounterBinding {
    CounterBinding {
        element: id(n),
        target: CounterTarget::new(value),
    }
}

fn page(with_preloader: bool) -> Bindings {
    let preloader = if with_preloader {
        PreloaderBindings {
            root: Some(id(2)),
            letters: vec![id(3), id(4)],
            counter: Some(id(5)),
            progress: Some(id(6)),
        }
    } else {
        PreloaderBindings::default()
    };
    Bindings {
        root: Some(id(1)),
        preloader,
        hero: HeroBindings {
            label: Some(id(10)),
            title_words: vec![id(11), id(12)],
            info: Some(id(13)),
            scroll_hint: Some(id(14)),
        },
        marquee: Some(id(100)),
        header: Some(id(20)),
        cursor: CursorBindings {
            root: Some(id(21)),
            dot: Some(id(22)),
            outline: Some(id(23)),
        },
        interactive: vec![id(99)],
        view_targets: Vec::new(),
        magnetic: vec![MagneticBinding {
            element: id(99),
            strength: 20.0,
        }],
        menu: MenuBindings {
            toggle: Some(id(30)),
            panel: Some(id(31)),
            links: vec![id(32), id(33), id(34)],
        },
        common: CommonBindings {
            titles: vec![id(40)],
            reveal_texts: vec![id(41)],
            numbers: vec![id(42)],
        },
        about: AboutBindings {
            section: Some(id(50)),
            image: Some(id(51)),
            stats: vec![counter(52, 71.0), counter(53, 3.5)],
        },
        projects: vec![
            ProjectBinding {
                element: id(60),
                depth: None,
            },
            ProjectBinding {
                element: id(61),
                depth: None,
            },
            ProjectBinding {
                element: id(62),
                depth: None,
            },
        ],
        skills: vec![SkillBinding {
            element: id(70),
            pills: vec![id(72), id(73)],
        }],
        awards: AwardsBindings {
            timeline: Some(id(80)),
            progress: Some(id(81)),
            items: vec![id(82), id(83)],
            stats_block: Some(id(84)),
            stats: vec![AchievementBinding {
                element: id(85),
                number: counter(86, 120.0),
            }],
        },
        contact: ContactBindings {
            title: Some(id(90)),
            title_lines: vec![id(91)],
            form: Some(id(92)),
            groups: vec![id(93)],
            submit: Some(id(94)),
            info: Some(id(95)),
            info_items: vec![id(96)],
            socials: Some(id(97)),
            social_links: vec![id(98)],
        },
    }
}

struct PageLayout {
    bounds: HashMap<ElementId, Bounds>,
}

impl PageLayout {
    fn new() -> Self {
        let boxes: [(u32, f32, f32); 30] = [
            (20, 0.0, 80.0),
            (40, 1200.0, 100.0),
            (41, 1300.0, 100.0),
            (42, 1250.0, 50.0),
            (50, 2000.0, 1000.0),
            (51, 2100.0, 400.0),
            (52, 2600.0, 50.0),
            (53, 2600.0, 50.0),
            (60, 3000.0, 600.0),
            (61, 3700.0, 600.0),
            (62, 4400.0, 600.0),
            (70, 5200.0, 300.0),
            (72, 5250.0, 40.0),
            (73, 5250.0, 40.0),
            (80, 6000.0, 1000.0),
            (81, 6000.0, 0.0),
            (82, 6100.0, 200.0),
            (83, 6400.0, 200.0),
            (84, 7200.0, 200.0),
            (85, 7200.0, 200.0),
            (86, 7220.0, 50.0),
            (90, 8000.0, 200.0),
            (91, 8000.0, 100.0),
            (92, 8200.0, 400.0),
            (93, 8250.0, 50.0),
            (95, 8700.0, 100.0),
            (96, 8700.0, 40.0),
            (97, 8800.0, 50.0),
            (98, 8800.0, 40.0),
            (99, 500.0, 40.0),
        ];
        Self {
            bounds: boxes
                .iter()
                .map(|(n, top, height)| (id(*n), Bounds::new(*top, *height)))
                .collect(),
        }
    }
}

impl Layout for PageLayout {
    fn bounds(&self, element: ElementId) -> Option<Bounds> {
        self.bounds.get(&element).copied()
    }

    fn viewport_height(&self) -> f32 {
        1000.0
    }

    fn max_scroll(&self) -> f32 {
        9000.0
    }
}

fn desktop() -> Environment {
    Environment::desktop(1280.0)
}

fn booted(env: Environment, with_preloader: bool) -> (Lifecycle, PageLayout) {
    let layout = PageLayout::new();
    let mut lc = Lifecycle::new(env, page(with_preloader));
    lc.boot(0.0);
    lc.frame(0.0, &layout);
    lc.take_mutations();
    (lc, layout)
}

/// Frames from `from` to `to` seconds; every mutation they produced.
fn run(lc: &mut Lifecycle, layout: &PageLayout, from: f64, to: f64) -> Vec<Mutation> {
    let mut out = Vec::new();
    let mut t = from;
    while t <= to {
        lc.frame(t, layout);
        out.extend(lc.take_mutations());
        t += FRAME;
    }
    out
}

fn styles(muts: &[Mutation], element: ElementId) -> Vec<Visual> {
    muts.iter()
        .filter_map(|m| match m {
            Mutation::Style(e, v) if *e == element => Some(*v),
            _ => None,
        })
        .collect()
}

fn class(element: u32, class: &'static str, on: bool) -> Mutation {
    Mutation::Class {
        element: id(element),
        class,
        on,
    }
}

fn text(element: u32, s: &str) -> Mutation {
    Mutation::Text(id(element), s.to_string())
}

#[test]
fn reduced_motion_shows_everything_at_once() {
    let env = Environment {
        reduced_motion: true,
        ..desktop()
    };
    let mut lc = Lifecycle::new(env, page(true));
    lc.boot(0.0);
    let muts = lc.take_mutations();

    assert!(muts.contains(&class(1, "js-enabled", true)));
    assert!(muts.contains(&Mutation::DuplicateContent(id(100))));
    assert!(muts.contains(&Mutation::Remove(id(2))));
    assert!(muts.contains(&text(52, "71")));
    assert!(muts.contains(&text(53, "3.5")));
    assert!(muts.contains(&text(86, "120")));
    assert!(muts.contains(&class(82, "active", true)));
    assert!(muts.contains(&class(83, "active", true)));
    assert!(muts.contains(&class(60, "is-focused", true)));
    assert!(!muts.contains(&class(61, "is-focused", true)));

    for element in animated_elements(lc.bindings()) {
        let v = styles(&muts, element);
        let v = v.last().unwrap_or_else(|| panic!("{element:?} never styled"));
        assert_eq!(v.opacity, 1.0, "{element:?}");
        assert_eq!((v.x, v.y, v.y_percent, v.scale), (0.0, 0.0, 0.0, 1.0));
    }

    assert_eq!(lc.state().phase, LifecyclePhase::Running);
    assert!(lc.smooth_scroll().is_none());
    assert!(lc.stage().engine.is_idle());
    assert!(lc.depth().is_reduced());
    assert!(!lc.cursor_enabled());

    // header watcher only
    let layout = PageLayout::new();
    lc.frame(0.1, &layout);
    assert_eq!(lc.stage().registry.live_count(), 1);
    assert!(!lc.wheel(120.0));
    assert!(!lc.anchor(Some(4000.0), 0.2));
}

#[test]
fn boot_runs_once() {
    let mut lc = Lifecycle::new(desktop(), page(true));
    lc.boot(0.0);
    assert!(!lc.take_mutations().is_empty());
    lc.boot(1.0);
    assert!(lc.take_mutations().is_empty());
    assert_eq!(lc.state().phase, LifecyclePhase::Preloading);
}

#[test]
fn preloader_runs_then_hands_over_to_hero() {
    let layout = PageLayout::new();
    let mut lc = Lifecycle::new(desktop(), page(true));
    lc.boot(0.0);
    let muts = lc.take_mutations();
    assert!(muts.contains(&text(5, "0")));
    assert_eq!(styles(&muts, id(3))[0].y_percent, 100.0);
    assert_eq!(styles(&muts, id(11))[0].opacity, 0.0);
    assert_eq!(lc.state().phase, LifecyclePhase::Preloading);

    let mut counter_done = None;
    let mut removed = None;
    let mut t = 0.0;
    while t <= 5.5 {
        lc.frame(t, &layout);
        for m in lc.take_mutations() {
            if m == text(5, "100") && counter_done.is_none() {
                counter_done = Some(t);
            }
            if m == Mutation::Remove(id(2)) {
                assert!(removed.is_none(), "preloader removed twice");
                removed = Some(t);
            }
        }
        t += FRAME;
    }

    let counter_done = counter_done.expect("counter reached 100");
    let removed = removed.expect("preloader removed");
    assert!((1.75..1.95).contains(&counter_done), "counter done at {counter_done}");
    assert!((3.2..3.3).contains(&removed), "removed at {removed}");
    assert_eq!(lc.state().phase, LifecyclePhase::Running);

    let engine = &lc.stage().engine;
    for hero in [10, 11, 12, 13, 14] {
        assert_eq!(engine.visual(id(hero)).opacity, 1.0, "hero element {hero}");
    }
    assert_eq!(engine.visual(id(11)).y_percent, 0.0);
}

#[test]
fn scroll_animations_wait_for_the_preloader() {
    let (mut lc, layout) = booted(desktop(), true);
    lc.native_scroll(3000.0);
    let muts = run(&mut lc, &layout, FRAME, 1.0);
    assert!(!muts.iter().any(|m| matches!(m, Mutation::Text(e, _) if *e == id(52))));
    assert_eq!(lc.stage().engine.visual(id(40)).opacity, 0.0);
}

#[test]
fn scrolling_reveals_sections_and_runs_counters() {
    let (mut lc, layout) = booted(desktop(), false);
    assert_eq!(lc.stage().engine.visual(id(40)).opacity, 0.0);
    assert_eq!(lc.stage().engine.visual(id(51)).scale, 0.95);

    lc.native_scroll(3000.0);
    let muts = run(&mut lc, &layout, 0.1, 2.0);

    assert!(muts.contains(&text(52, "0")));
    assert!(muts.contains(&text(52, "71")));
    assert!(muts.contains(&text(53, "3.5")));
    assert!(
        !muts.iter().any(|m| matches!(m, Mutation::Text(e, _) if *e == id(86))),
        "achievement counters sit further down"
    );
    assert!(
        !muts.iter().any(|m| matches!(m, Mutation::ScrollTo(_))),
        "native scrolling is never written back"
    );

    let engine = &lc.stage().engine;
    assert_eq!(engine.visual(id(40)).opacity, 1.0);
    assert_eq!(engine.visual(id(41)).opacity, 1.0);
    assert_eq!(engine.visual(id(42)).scale, 1.0);
    assert_eq!(engine.visual(id(51)).scale, 1.0);
    assert_eq!(engine.visual(id(70)).opacity, 0.0, "skills not reached yet");
    assert!(!styles(&muts, id(61)).is_empty(), "depth planes render");
}

#[test]
fn timeline_items_activate_after_their_entrance() {
    let (mut lc, layout) = booted(desktop(), false);
    lc.native_scroll(5700.0);
    let muts = run(&mut lc, &layout, 0.1, 1.2);

    assert!(muts.contains(&class(82, "active", true)));
    assert!(muts.contains(&class(83, "active", true)));
    let engine = &lc.stage().engine;
    assert_eq!(engine.visual(id(82)).x, 0.0);
    let fill = engine.visual(id(81)).height_pct;
    assert!((fill - 400.0 / 1300.0 * 100.0).abs() < 0.1, "fill {fill}");
    assert_eq!(engine.visual(id(72)).opacity, 1.0, "skill pills revealed");
}

#[test]
fn narrow_layout_batches_instead_of_section_timelines() {
    let (mut lc, layout) = booted(Environment::desktop(500.0), false);
    assert_eq!(lc.state().breakpoint, Breakpoint::Mobile);
    assert!(!lc.cursor_enabled());
    assert_eq!(lc.depth().len(), 3);
    assert_eq!(lc.stage().engine.visual(id(70)).y, 30.0);

    lc.native_scroll(3000.0);
    let muts = run(&mut lc, &layout, 0.1, 2.0);
    assert!(!muts.iter().any(|m| matches!(m, Mutation::Text(e, _) if *e == id(52))));
}

#[test]
fn resize_settles_after_debounce_and_gate() {
    let (mut lc, layout) = booted(Environment::desktop(1100.0), false);
    assert_eq!(lc.refreshes(), 1);
    assert!(lc.cursor_enabled());

    lc.resize(1180.0, 1.0);
    lc.frame(1.1, &layout);
    assert_eq!(lc.refreshes(), 1, "still debouncing");
    lc.frame(1.25, &layout);
    assert_eq!(lc.refreshes(), 2, "same breakpoint, soft refresh");
    assert_eq!(lc.state().breakpoint, Breakpoint::Desktop);
    assert_eq!(lc.state().env.viewport_width, 1180.0);

    lc.resize(1200.0, 2.0);
    lc.frame(2.3, &layout);
    assert_eq!(lc.refreshes(), 2, "20px change is ignored");
    assert_eq!(lc.state().breakpoint, Breakpoint::Desktop);
    assert_eq!(lc.state().env.viewport_width, 1180.0);

    lc.take_mutations();
    lc.resize(700.0, 3.0);
    lc.frame(3.3, &layout);
    assert_eq!(lc.refreshes(), 3);
    assert_eq!(lc.state().breakpoint, Breakpoint::Mobile);
    assert_eq!(lc.state().config, AnimationConfig::MOBILE);
    assert!(!lc.cursor_enabled());
    let muts = lc.take_mutations();
    let off = muts.iter().position(|m| *m == class(60, "is-focused", false));
    let on = muts.iter().position(|m| *m == class(60, "is-focused", true));
    assert!(matches!((off, on), (Some(a), Some(b)) if a < b));
}

#[test]
fn resize_debounce_restarts_on_every_event() {
    let (mut lc, layout) = booted(Environment::desktop(1100.0), false);
    lc.resize(1180.0, 1.0);
    lc.resize(1190.0, 1.15);
    lc.frame(1.25, &layout);
    assert_eq!(lc.state().env.viewport_width, 1100.0);
    lc.frame(1.4, &layout);
    assert_eq!(lc.state().env.viewport_width, 1190.0);
}

#[test]
fn switching_to_narrow_restores_what_the_wide_layout_hid() {
    let (mut lc, layout) = booted(desktop(), false);
    let engine = &lc.stage().engine;
    assert_eq!(engine.visual(id(51)).opacity, 0.0);
    assert_eq!(engine.visual(id(91)).y, 50.0);

    lc.resize(500.0, 1.0);
    lc.frame(1.25, &layout);
    assert_eq!(lc.state().breakpoint, Breakpoint::Mobile);

    lc.native_scroll(8900.0);
    run(&mut lc, &layout, 1.3, 4.7);

    let engine = &lc.stage().engine;
    for n in [51, 72, 73, 85, 91, 93, 96, 98] {
        let v = engine.visual(id(n));
        assert_eq!(v.opacity, 1.0, "element {n} left hidden");
        assert_eq!((v.x, v.y, v.scale), (0.0, 0.0, 1.0), "element {n} left displaced");
    }
    assert_eq!(engine.visual(id(81)).height_pct, 100.0);
    for n in [70, 82, 83] {
        assert_eq!(engine.visual(id(n)).opacity, 1.0, "batch missed {n}");
    }
}

#[test]
fn desktop_to_wide_keeps_revealed_sections() {
    let (mut lc, layout) = booted(Environment::desktop(1180.0), false);
    lc.native_scroll(2500.0);
    let before = run(&mut lc, &layout, 0.1, 3.0);
    assert!(before.contains(&text(52, "71")));
    assert_eq!(lc.stage().engine.visual(id(51)).opacity, 1.0);
    let refreshes = lc.refreshes();

    lc.resize(1250.0, 3.1);
    let after = run(&mut lc, &layout, 3.2, 4.5);

    assert_eq!(lc.state().breakpoint, Breakpoint::Wide);
    assert_eq!(lc.state().config, AnimationConfig::WIDE);
    assert_eq!(lc.refreshes(), refreshes + 1);
    assert!(
        styles(&after, id(51)).iter().all(|v| v.opacity == 1.0),
        "about image replayed"
    );
    assert!(
        !after.iter().any(|m| matches!(m, Mutation::Text(e, _) if *e == id(52) || *e == id(53))),
        "counters replayed"
    );
    assert_eq!(lc.stage().engine.visual(id(51)).opacity, 1.0);

    // planes are rebuilt with the wide offsets
    assert_eq!(lc.depth().len(), 3);
    let off = after.iter().position(|m| *m == class(60, "is-focused", false));
    let on = after.iter().position(|m| *m == class(60, "is-focused", true));
    assert!(matches!((off, on), (Some(a), Some(b)) if a < b));
    assert!(!styles(&after, id(62)).is_empty());
}

#[test]
fn menu_holds_the_scroll_until_links_fade_out() {
    let (mut lc, layout) = booted(desktop(), false);

    lc.menu_toggle(1.0);
    assert_eq!(lc.state().menu, MenuState::Open);
    let muts = lc.take_mutations();
    assert!(muts.contains(&class(30, "active", true)));
    assert!(muts.contains(&class(31, "active", true)));
    assert!(!lc.smooth_scroll().expect("smooth").is_running());

    assert!(lc.wheel(100.0), "wheel swallowed while the menu is open");
    lc.frame(1.1, &layout);
    assert_eq!(lc.smooth_scroll().expect("smooth").position(), 0.0);

    lc.menu_toggle(2.0);
    assert_eq!(lc.state().menu, MenuState::Closing);
    assert!(lc.take_mutations().contains(&class(30, "active", false)));

    lc.frame(2.1, &layout);
    assert_eq!(lc.state().menu, MenuState::Closing);
    assert!(!lc.smooth_scroll().expect("smooth").is_running());

    lc.frame(2.45, &layout);
    assert_eq!(lc.state().menu, MenuState::Closed);
    assert!(lc.smooth_scroll().expect("smooth").is_running());
    assert!(lc.take_mutations().contains(&class(31, "active", false)));
    assert_eq!(lc.stage().engine.visual(id(32)).opacity, 0.0);
}

#[test]
fn reopening_while_closing_keeps_the_menu_open() {
    let (mut lc, layout) = booted(desktop(), false);
    lc.menu_toggle(1.0);
    lc.menu_toggle(2.0);
    lc.menu_toggle(2.1);
    assert_eq!(lc.state().menu, MenuState::Open);
    run(&mut lc, &layout, 2.2, 3.5);
    assert_eq!(lc.state().menu, MenuState::Open);
    assert!(!lc.smooth_scroll().expect("smooth").is_running());
    assert_eq!(lc.stage().engine.visual(id(34)).opacity, 1.0);
}

#[test]
fn escape_and_menu_links_close_the_menu() {
    let (mut lc, _) = booted(desktop(), false);
    lc.escape(0.5);
    assert_eq!(lc.state().menu, MenuState::Closed);

    lc.menu_toggle(1.0);
    lc.escape(1.5);
    assert_eq!(lc.state().menu, MenuState::Closing);

    let (mut lc, _) = booted(desktop(), false);
    lc.menu_toggle(1.0);
    lc.menu_link(1.2);
    assert_eq!(lc.state().menu, MenuState::Closing);
}

#[test]
fn anchors_glide_and_wait_for_the_menu() {
    let (mut lc, _) = booted(desktop(), false);
    assert!(!lc.anchor(None, 0.5));
    assert!(lc.anchor(Some(4000.0), 0.5));
    assert_eq!(lc.smooth_scroll().expect("smooth").target(), 4000.0);

    let (mut lc, layout) = booted(desktop(), false);
    lc.menu_toggle(1.0);
    assert!(lc.anchor(Some(2500.0), 1.5));
    assert_eq!(lc.state().menu, MenuState::Closing);
    assert_eq!(lc.smooth_scroll().expect("smooth").target(), 0.0);

    lc.frame(2.0, &layout);
    assert_eq!(lc.state().menu, MenuState::Closed);
    assert_eq!(lc.smooth_scroll().expect("smooth").target(), 2500.0);
}

#[test]
fn wheel_glide_is_written_back_to_the_window() {
    let (mut lc, layout) = booted(desktop(), false);
    assert!(lc.wheel(500.0));

    lc.frame(0.1, &layout);
    let first = lc.take_mutations();
    let start = first.iter().find_map(|m| match m {
        Mutation::ScrollTo(y) => Some(*y),
        _ => None,
    });
    assert!(matches!(start, Some(y) if y < 5.0));

    lc.frame(1.2, &layout);
    assert!(lc.take_mutations().contains(&Mutation::ScrollTo(500.0)));
}

#[test]
fn visibility_pauses_and_resumes_scroll() {
    let (mut lc, _) = booted(desktop(), false);
    lc.visibility(true);
    assert!(lc.state().hidden);
    assert!(!lc.smooth_scroll().expect("smooth").is_running());
    lc.visibility(false);
    assert!(lc.smooth_scroll().expect("smooth").is_running());

    lc.menu_toggle(1.0);
    lc.visibility(true);
    lc.visibility(false);
    assert!(
        !lc.smooth_scroll().expect("smooth").is_running(),
        "open menu keeps the scroll stopped"
    );
}

#[test]
fn header_reacts_to_scroll_direction() {
    let (mut lc, layout) = booted(desktop(), false);

    lc.native_scroll(100.0);
    lc.frame(0.1, &layout);
    assert!(lc.take_mutations().contains(&class(20, "scrolled", true)));

    lc.native_scroll(300.0);
    lc.frame(0.2, &layout);
    let hidden = styles(&lc.take_mutations(), id(20));
    assert_eq!(hidden.last().map(|v| v.y_percent), Some(-100.0));

    lc.native_scroll(200.0);
    lc.frame(0.3, &layout);
    let shown = styles(&lc.take_mutations(), id(20));
    assert_eq!(shown.last().map(|v| v.y_percent), Some(0.0));
}

#[test]
fn form_submission_cycles_through_success() {
    let (mut lc, layout) = booted(desktop(), false);
    assert!(lc.submit_form(1.0));
    let muts = lc.take_mutations();
    assert!(muts.contains(&Mutation::Disabled(id(94), true)));
    assert_eq!(styles(&muts, id(94)).last().map(|v| v.scale), Some(0.98));
    assert_eq!(lc.state().form, FormPhase::Sending);

    assert!(lc.submit_form(1.1), "repeat submit is swallowed");
    assert_eq!(lc.state().form, FormPhase::Sending);

    lc.frame(2.1, &layout);
    assert_eq!(lc.state().form, FormPhase::Sending);
    lc.frame(2.25, &layout);
    assert_eq!(lc.state().form, FormPhase::Success);
    assert!(lc.take_mutations().contains(&class(94, "success", true)));

    lc.frame(4.7, &layout);
    assert_eq!(lc.state().form, FormPhase::Success);
    lc.frame(4.8, &layout);
    assert_eq!(lc.state().form, FormPhase::Idle);
    let muts = lc.take_mutations();
    assert!(muts.contains(&Mutation::ResetForm(id(92))));
    assert!(muts.contains(&Mutation::Disabled(id(94), false)));
    assert!(muts.contains(&class(94, "success", false)));
}

#[test]
fn form_without_markup_is_left_alone() {
    let mut bindings = page(false);
    bindings.contact.form = None;
    let mut lc = Lifecycle::new(desktop(), bindings);
    lc.boot(0.0);
    assert!(!lc.submit_form(1.0));
}

#[test]
fn cursor_follows_pointer_and_switches_looks() {
    let (mut lc, layout) = booted(desktop(), false);
    assert!(lc.cursor_enabled());

    lc.pointer_move(100.0, 50.0);
    lc.frame(0.1, &layout);
    let muts = lc.take_mutations();
    let cursor = |part: u32| {
        muts.iter().find_map(|m| match m {
            Mutation::Cursor { element, position } if *element == id(part) => Some(*position),
            _ => None,
        })
    };
    assert_eq!(cursor(22), Some(Vec2::new(100.0, 50.0)));
    let outline = cursor(23).expect("outline moved");
    assert!(outline.abs_diff_eq(Vec2::new(15.0, 7.5), 1e-4), "outline {outline}");

    lc.interactive_hover(true);
    lc.view_hover(true);
    let muts = lc.take_mutations();
    assert!(muts.contains(&class(21, "cursor-hover", true)));
    assert!(muts.contains(&class(21, "cursor-view", true)));

    lc.interactive_hover(false);
    let muts = lc.take_mutations();
    assert!(muts.contains(&class(21, "cursor-hover", false)));
    assert!(muts.contains(&class(21, "cursor-view", false)));

    lc.pointer_presence(false);
    let muts = lc.take_mutations();
    assert_eq!(styles(&muts, id(21)).last().map(|v| v.opacity), Some(0.0));
}

#[test]
fn touch_devices_get_no_pointer_effects() {
    let env = Environment {
        touch_primary: true,
        ..desktop()
    };
    let (mut lc, layout) = booted(env, false);
    assert!(!lc.cursor_enabled());

    lc.magnetic_move(id(99), Vec2::new(200.0, 80.0), Vec2::new(100.0, 40.0), Vec2::new(100.0, 40.0));
    lc.card_hover(id(61), true);
    assert!(lc.take_mutations().is_empty());

    lc.pointer_move(100.0, 50.0);
    lc.frame(0.1, &layout);
    let muts = lc.take_mutations();
    assert!(!muts.iter().any(|m| matches!(m, Mutation::Cursor { .. })));
}

#[test]
fn magnetic_buttons_follow_and_release() {
    let (mut lc, _) = booted(desktop(), false);
    lc.magnetic_move(id(99), Vec2::new(200.0, 80.0), Vec2::new(100.0, 40.0), Vec2::new(100.0, 40.0));
    let moved = styles(&lc.take_mutations(), id(99));
    let v = moved.last().expect("styled");
    assert!((v.x - 10.0).abs() < 1e-4 && (v.y - 4.0).abs() < 1e-4);

    lc.magnetic_leave(id(99));
    let released = styles(&lc.take_mutations(), id(99));
    assert_eq!(released.last().map(|v| (v.x, v.y)), Some((0.0, 0.0)));
}

#[test]
fn card_hover_boosts_plane_scale() {
    let (mut lc, _) = booted(desktop(), false);
    let before = lc.depth().rendered(1).expect("plane").1;
    lc.card_hover(id(61), true);
    let hovered = styles(&lc.take_mutations(), id(61));
    let scale = hovered.last().expect("styled").scale;
    assert!((scale - before * 1.01).abs() < 1e-5);
    lc.card_hover(id(99), true);
    assert!(lc.take_mutations().is_empty(), "not a project card");
}

#[test]
fn teardown_releases_everything_once() {
    let (mut lc, layout) = booted(desktop(), false);
    lc.resize(600.0, 0.5);
    lc.teardown();
    assert!(lc.is_torn_down());
    assert!(lc.smooth_scroll().expect("smooth").is_destroyed());
    assert!(!lc.cursor_enabled());
    assert_eq!(lc.stage().registry.live_count(), 0);
    assert!(lc.stage().engine.is_idle());

    lc.teardown();
    assert!(!lc.wheel(100.0));
    lc.resize(400.0, 1.0);
    lc.take_mutations();
    lc.frame(2.0, &layout);
    assert!(lc.take_mutations().is_empty());
    assert_eq!(lc.state().breakpoint, Breakpoint::Wide);
}
