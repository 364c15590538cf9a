use crate::core::{
    parse_strength, AboutBindings, AchievementBinding, AwardsBindings, Bindings, Bounds,
    CommonBindings, ContactBindings, CounterBinding, CounterTarget, CursorBindings, ElementId,
    HeroBindings, Layout, MagneticBinding, MenuBindings, Mutation, PreloaderBindings, Prop,
    ProjectBinding, SkillBinding, Visual,
};
use crate::preloader;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Listen for `event` on `target`. `passive: false` allows `prevent_default`.
pub fn add_listener<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &str,
    passive: bool,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(passive);
    _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    );
    closure.forget();
}

#[inline]
pub fn media_matches(window: &web::Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

#[inline]
pub fn viewport_width(window: &web::Window) -> f32 {
    window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32
}

fn collect(list: Result<web::NodeList, JsValue>) -> Vec<web::Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .collect()
}

/// DOM nodes behind every [`ElementId`] handed to the core.
#[derive(Default)]
pub struct ElementTable {
    nodes: Vec<web::HtmlElement>,
}

impl ElementTable {
    pub fn bind(&mut self, el: web::Element) -> Option<ElementId> {
        let el = el.dyn_into::<web::HtmlElement>().ok()?;
        if let Some(i) = self.nodes.iter().position(|n| *n == el) {
            return Some(ElementId(i as u32));
        }
        self.nodes.push(el);
        Some(ElementId(self.nodes.len() as u32 - 1))
    }

    pub fn get(&self, id: ElementId) -> Option<&web::HtmlElement> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

struct Binder<'a> {
    document: &'a web::Document,
    table: &'a mut ElementTable,
}

impl Binder<'_> {
    fn raw(&self, selector: &str) -> Vec<web::Element> {
        collect(self.document.query_selector_all(selector))
    }

    fn one(&mut self, selector: &str) -> Option<ElementId> {
        let el = self.document.query_selector(selector).ok().flatten()?;
        self.table.bind(el)
    }

    fn all(&mut self, selector: &str) -> Vec<ElementId> {
        self.raw(selector)
            .into_iter()
            .filter_map(|el| self.table.bind(el))
            .collect()
    }

    fn within(&mut self, parent: &web::Element, selector: &str) -> Vec<ElementId> {
        collect(parent.query_selector_all(selector))
            .into_iter()
            .filter_map(|el| self.table.bind(el))
            .collect()
    }

    fn counter(&mut self, el: web::Element) -> Option<CounterBinding> {
        let target = CounterTarget::parse(&el.get_attribute("data-value")?)?;
        let element = self.table.bind(el)?;
        Some(CounterBinding { element, target })
    }
}

/// Resolve every selector the page animations use. Missing markup leaves
/// the binding empty.
pub fn bind_page(document: &web::Document, table: &mut ElementTable) -> Bindings {
    let mut b = Binder { document, table };
    let root = document.document_element().and_then(|el| b.table.bind(el));

    let preloader = PreloaderBindings {
        root: b.one(".preloader"),
        letters: b.all(".preloader-letter"),
        counter: b.one(".counter-number"),
        progress: b.one(".preloader-progress"),
    };
    let hero = HeroBindings {
        label: b.one(".hero-label"),
        title_words: b.all(".hero-title-word, .hero-title-accent"),
        info: b.one(".hero-info"),
        scroll_hint: b.one(".hero-scroll"),
    };
    let cursor = CursorBindings {
        root: b.one(".cursor"),
        dot: b.one(".cursor-dot"),
        outline: b.one(".cursor-outline"),
    };
    let magnetic = b
        .raw(".magnetic-btn")
        .into_iter()
        .filter_map(|el| {
            let strength = parse_strength(el.get_attribute("data-strength").as_deref());
            b.table
                .bind(el)
                .map(|element| MagneticBinding { element, strength })
        })
        .collect();
    let menu = MenuBindings {
        toggle: b.one(".menu-toggle"),
        panel: b.one(".mobile-menu"),
        links: b.all(".mobile-nav-link"),
    };
    let common = CommonBindings {
        titles: b.all(".section-title-word"),
        reveal_texts: b.all(".reveal-text"),
        numbers: b.all(".section-number"),
    };
    let about_stats = b.raw(".about-stat-number");
    let about = AboutBindings {
        section: b.one(".about"),
        image: b.one(".about-image-wrapper"),
        stats: about_stats
            .into_iter()
            .filter_map(|el| b.counter(el))
            .collect(),
    };
    let projects = b
        .raw(".project-card")
        .into_iter()
        .filter_map(|el| {
            let depth = el
                .get_attribute("data-depth")
                .and_then(|d| d.trim().parse::<u32>().ok());
            b.table
                .bind(el)
                .map(|element| ProjectBinding { element, depth })
        })
        .collect();
    let skills = b
        .raw(".skill-category")
        .into_iter()
        .filter_map(|el| {
            let pills = b.within(&el, ".skill-pill");
            b.table.bind(el).map(|element| SkillBinding { element, pills })
        })
        .collect();
    let stats = b
        .raw(".achievement-stat")
        .into_iter()
        .filter_map(|el| {
            let number = el
                .query_selector(".achievement-stat-number")
                .ok()
                .flatten()
                .and_then(|n| b.counter(n))?;
            let element = b.table.bind(el)?;
            Some(AchievementBinding { element, number })
        })
        .collect();
    let awards = AwardsBindings {
        timeline: b.one(".awards-timeline"),
        progress: b.one(".timeline-progress"),
        items: b.all(".timeline-item"),
        stats_block: b.one(".achievement-stats"),
        stats,
    };
    let form = document
        .get_element_by_id("contact-form")
        .and_then(|el| b.table.bind(el));
    let contact = ContactBindings {
        title: b.one(".contact-title"),
        title_lines: b.all(".contact-title-line"),
        form,
        groups: b.all(".form-group"),
        submit: b.one(".form-submit"),
        info: b.one(".contact-info"),
        info_items: b.all(".contact-info-item"),
        socials: b.one(".contact-socials"),
        social_links: b.all(".social-link"),
    };

    let bindings = Bindings {
        root,
        preloader,
        hero,
        marquee: b.one(".hero-marquee-track"),
        header: b.one(".header"),
        cursor,
        interactive: b.all("a, button, [role=\"button\"], input, textarea, .magnetic-btn"),
        view_targets: b.all("[data-cursor=\"view\"]"),
        magnetic,
        menu,
        common,
        about,
        projects,
        skills,
        awards,
        contact,
    };
    log::info!("[dom] bound {} elements", b.table.len());
    bindings
}

// Document offset through the offsetParent chain; ignores transforms, so
// animated offsets never move trigger boundaries.
pub fn document_top(el: &web::HtmlElement) -> f32 {
    let mut top = 0.0;
    let mut node = Some(el.clone());
    while let Some(n) = node {
        top += n.offset_top() as f32;
        node = n
            .offset_parent()
            .and_then(|p| p.dyn_into::<web::HtmlElement>().ok());
    }
    top
}

/// Live page geometry.
pub struct DomLayout<'a> {
    pub table: &'a ElementTable,
    pub window: &'a web::Window,
    pub document: &'a web::Document,
}

impl Layout for DomLayout<'_> {
    fn bounds(&self, element: ElementId) -> Option<Bounds> {
        let el = self.table.get(element)?;
        if !el.is_connected() {
            return None;
        }
        Some(Bounds::new(document_top(el), el.offset_height() as f32))
    }

    fn viewport_height(&self) -> f32 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32
    }

    fn max_scroll(&self) -> f32 {
        let height = self
            .document
            .document_element()
            .map(|el| el.scroll_height())
            .unwrap_or(0) as f32;
        (height - self.viewport_height()).max(0.0)
    }
}

fn write_style(el: &web::HtmlElement, v: &Visual) {
    let style = el.style();
    if v.touched(Prop::Opacity) {
        _ = style.set_property("opacity", &format!("{}", v.opacity));
    }
    if v.has_transform() {
        _ = style.set_property("transform", &v.transform_css());
    }
    if v.touched(Prop::WidthPct) {
        _ = style.set_property("width", &format!("{}%", v.width_pct));
    }
    if v.touched(Prop::HeightPct) {
        _ = style.set_property("height", &format!("{}%", v.height_pct));
    }
}

pub fn apply(table: &ElementTable, window: &web::Window, mutation: &Mutation) {
    match mutation {
        Mutation::ScrollTo(y) => window.scroll_to_with_x_and_y(0.0, f64::from(*y)),
        Mutation::Cursor { element, position } => {
            if let Some(el) = table.get(*element) {
                _ = el.style().set_property(
                    "transform",
                    &format!(
                        "translate({}px, {}px) translate(-50%, -50%)",
                        position.x, position.y
                    ),
                );
            }
        }
        Mutation::Style(id, visual) => {
            if let Some(el) = table.get(*id) {
                write_style(el, visual);
            }
        }
        Mutation::Class { element, class, on } => {
            if let Some(el) = table.get(*element) {
                let cl = el.class_list();
                _ = if *on { cl.add_1(class) } else { cl.remove_1(class) };
            }
        }
        Mutation::Text(id, text) => {
            if let Some(el) = table.get(*id) {
                el.set_text_content(Some(text.as_str()));
            }
        }
        Mutation::Remove(id) => {
            if let Some(el) = table.get(*id) {
                preloader::remove(el);
            }
        }
        Mutation::Disabled(id, on) => {
            if let Some(el) = table.get(*id) {
                _ = if *on {
                    el.set_attribute("disabled", "")
                } else {
                    el.remove_attribute("disabled")
                };
            }
        }
        Mutation::ResetForm(id) => {
            if let Some(form) = table
                .get(*id)
                .and_then(|el| el.dyn_ref::<web::HtmlFormElement>())
            {
                form.reset();
            }
        }
        Mutation::DuplicateContent(id) => {
            if let Some(el) = table.get(*id) {
                let content = el.inner_html();
                el.set_inner_html(&format!("{content}{content}"));
            }
        }
    }
}
