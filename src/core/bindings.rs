//! Element handles gathered by the explicit binding step. Everything is
//! optional: sections whose markup is missing are simply skipped.

use super::{CounterTarget, ElementId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterBinding {
    pub element: ElementId,
    pub target: CounterTarget,
}

#[derive(Clone, Debug, Default)]
pub struct PreloaderBindings {
    pub root: Option<ElementId>,
    pub letters: Vec<ElementId>,
    pub counter: Option<ElementId>,
    pub progress: Option<ElementId>,
}

#[derive(Clone, Debug, Default)]
pub struct HeroBindings {
    pub label: Option<ElementId>,
    /// Title words and accents, in reading order.
    pub title_words: Vec<ElementId>,
    pub info: Option<ElementId>,
    pub scroll_hint: Option<ElementId>,
}

#[derive(Clone, Debug, Default)]
pub struct CursorBindings {
    pub root: Option<ElementId>,
    pub dot: Option<ElementId>,
    pub outline: Option<ElementId>,
}

impl CursorBindings {
    pub fn complete(&self) -> bool {
        self.root.is_some() && self.dot.is_some() && self.outline.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticBinding {
    pub element: ElementId,
    pub strength: f32,
}

#[derive(Clone, Debug, Default)]
pub struct MenuBindings {
    pub toggle: Option<ElementId>,
    pub panel: Option<ElementId>,
    pub links: Vec<ElementId>,
}

#[derive(Clone, Debug, Default)]
pub struct CommonBindings {
    pub titles: Vec<ElementId>,
    pub reveal_texts: Vec<ElementId>,
    pub numbers: Vec<ElementId>,
}

#[derive(Clone, Debug, Default)]
pub struct AboutBindings {
    pub section: Option<ElementId>,
    pub image: Option<ElementId>,
    pub stats: Vec<CounterBinding>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectBinding {
    pub element: ElementId,
    pub depth: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillBinding {
    pub element: ElementId,
    pub pills: Vec<ElementId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AchievementBinding {
    pub element: ElementId,
    pub number: CounterBinding,
}

#[derive(Clone, Debug, Default)]
pub struct AwardsBindings {
    pub timeline: Option<ElementId>,
    pub progress: Option<ElementId>,
    pub items: Vec<ElementId>,
    pub stats_block: Option<ElementId>,
    pub stats: Vec<AchievementBinding>,
}

#[derive(Clone, Debug, Default)]
pub struct ContactBindings {
    pub title: Option<ElementId>,
    pub title_lines: Vec<ElementId>,
    pub form: Option<ElementId>,
    pub groups: Vec<ElementId>,
    pub submit: Option<ElementId>,
    pub info: Option<ElementId>,
    pub info_items: Vec<ElementId>,
    pub socials: Option<ElementId>,
    pub social_links: Vec<ElementId>,
}

#[derive(Clone, Debug, Default)]
pub struct Bindings {
    /// Document root, receives the `js-enabled` marker.
    pub root: Option<ElementId>,
    pub preloader: PreloaderBindings,
    pub hero: HeroBindings,
    /// Hero marquee track, duplicated once for a seamless loop.
    pub marquee: Option<ElementId>,
    pub header: Option<ElementId>,
    pub cursor: CursorBindings,
    /// Links, buttons and inputs that switch the cursor to its hover look.
    pub interactive: Vec<ElementId>,
    /// Elements with `data-cursor="view"`.
    pub view_targets: Vec<ElementId>,
    pub magnetic: Vec<MagneticBinding>,
    pub menu: MenuBindings,
    pub common: CommonBindings,
    pub about: AboutBindings,
    pub projects: Vec<ProjectBinding>,
    pub skills: Vec<SkillBinding>,
    pub awards: AwardsBindings,
    pub contact: ContactBindings,
}
