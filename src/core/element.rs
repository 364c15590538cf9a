/// Handle to an element bound during startup. The binding layer owns the
/// table that maps handles back to DOM nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Document-relative vertical extent of an element, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Geometry source used whenever trigger boundaries are (re)computed.
pub trait Layout {
    /// Bounds of a bound element, or `None` if it is detached or unknown.
    fn bounds(&self, element: ElementId) -> Option<Bounds>;
    fn viewport_height(&self) -> f32;
    /// Largest reachable scroll offset.
    fn max_scroll(&self) -> f32;
}
