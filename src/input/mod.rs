pub mod click;
pub mod events;
pub mod handler;
pub mod hover;

// Re-export the essential types
pub use click::{ClickDisambiguator, ClickKind, ClickResolution, ClickScope, ClickSubject};
pub use events::{PointerEvent, PropagationGuard, Verdict};
pub use handler::{
    deliver_click, ClickCallback, ClickOutcome, FnHandler, HoverCallback, LayerHandler,
};
pub use hover::{HoverOutcome, HoverTracker};
