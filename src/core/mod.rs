//! Platform-independent animation core.
//!
//! Nothing in here touches the browser: time is passed in as seconds, element
//! geometry comes through the [`Layout`] seam, and every visual change leaves
//! as a [`Mutation`] for the binding layer to apply.

pub mod bindings;
pub mod config;
pub mod depth;
pub mod ease;
pub mod element;
pub mod lifecycle;
pub mod scroll;
pub mod sequence;
pub mod timeline;
pub mod trigger;
pub mod tween;
pub mod widgets;

pub use bindings::*;
pub use config::*;
pub use depth::*;
pub use ease::*;
pub use element::*;
pub use lifecycle::*;
pub use scroll::*;
pub use sequence::*;
pub use timeline::*;
pub use trigger::*;
pub use tween::*;
pub use widgets::*;

/// Errors raised when parsing textual animation parameters (`data-*`
/// overrides, easing names, timeline positions).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown easing `{0}`")]
    Ease(String),
    #[error("invalid threshold `{0}`")]
    Threshold(String),
    #[error("invalid timeline position `{0}`")]
    Position(String),
}
