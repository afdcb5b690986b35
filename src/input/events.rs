use std::cell::Cell;
use std::rc::Rc;

use crate::{core::geo::LatLng, layers::geometry::GeometryRecord};

/// Pointer event delivered by the render engine for one layer.
///
/// `geometry` is the record under the pointer, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub geometry: Option<GeometryRecord>,
    pub position: LatLng,
}

impl PointerEvent {
    pub fn over(geometry: GeometryRecord, position: LatLng) -> Self {
        Self {
            geometry: Some(geometry),
            position,
        }
    }

    /// Pointer over empty map
    pub fn empty(position: LatLng) -> Self {
        Self {
            geometry: None,
            position,
        }
    }

    pub fn geometry_id(&self) -> Option<&str> {
        self.geometry.as_ref().map(|record| record.id.as_str())
    }
}

/// Result of a caller callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    Proceed,
    /// Skip the restyle that would have followed
    Veto,
}

impl Verdict {
    pub fn is_veto(&self) -> bool {
        matches!(self, Verdict::Veto)
    }
}

impl From<bool> for Verdict {
    fn from(go: bool) -> Self {
        if go {
            Verdict::Proceed
        } else {
            Verdict::Veto
        }
    }
}

impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Verdict::Proceed
    }
}

/// One-shot flag that stops a click handled by a layer from also reaching
/// the map surface underneath.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct PropagationGuard {
    stopped: Rc<Cell<bool>>,
}

impl PropagationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&self) {
        self.stopped.set(true);
    }

    /// Reads and resets the flag
    pub fn is_prevent_default(&self) -> bool {
        self.stopped.replace(false)
    }
}
