//! Hover highlighting with selection precedence.
//!
//! Pointer moves may overlap: a move can arrive while the hover callback of
//! an earlier one is still pending. Every move takes a sequence number, and a
//! callback that resolves after a newer move started does not restyle.

use std::cell::{Cell, RefCell};

use crate::{
    input::{events::PointerEvent, handler::LayerHandler},
    layers::{geometry::Geometry, style::StyleState},
    traits::{absorb, RenderLayer},
};

/// What a pointer move did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverOutcome {
    /// Tracker disabled, event ignored
    Disabled,
    /// Pointer is over no resolvable geometry
    Left,
    /// Geometry already hovered or selected, nothing to do
    Unchanged,
    /// The hover callback vetoed the restyle
    Vetoed,
    /// While the callback ran, the geometry became selected or vanished, or
    /// a newer pointer move took over
    Skipped,
    /// The geometry now shows its hover style
    Hovered(String),
}

/// Tracks the single hovered geometry of one layer
#[derive(Debug, Clone)]
pub struct HoverTracker {
    hovered: RefCell<Option<String>>,
    enabled: Cell<bool>,
    moves: Cell<u64>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self {
            hovered: RefCell::new(None),
            enabled: Cell::new(true),
            moves: Cell::new(0),
        }
    }

    pub fn hovered_id(&self) -> Option<String> {
        self.hovered.borrow().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Processes one pointer move over `layer`.
    ///
    /// No borrow of `layer` or of the tracker state is held while `handler`
    /// runs, so the handler may mutate the same layer (for example select the
    /// hovered geometry) and further moves may be processed meanwhile.
    pub async fn on_pointer_move<L, H>(
        &self,
        layer: &RefCell<L>,
        handler: &H,
        event: &PointerEvent,
    ) -> HoverOutcome
    where
        L: RenderLayer + ?Sized,
        H: LayerHandler + ?Sized,
    {
        if !self.enabled.get() {
            return HoverOutcome::Disabled;
        }
        let ticket = self.next_move();

        self.leave_previous(layer, event.geometry_id());

        let geometry = event.geometry.as_ref().and_then(Geometry::from_record);
        let Some(geometry) = geometry else {
            handler.on_hover(None, event.position).await;
            return HoverOutcome::Left;
        };

        if geometry.base_key().is_empty() || geometry.state != StyleState::Normal {
            return HoverOutcome::Unchanged;
        }

        if handler
            .on_hover(Some(&geometry), event.position)
            .await
            .is_veto()
        {
            return HoverOutcome::Vetoed;
        }

        if self.moves.get() != ticket {
            log::debug!("hover on {} superseded by a newer move", geometry.id);
            return HoverOutcome::Skipped;
        }

        // the handler may have selected or removed the geometry meanwhile
        let current = layer.borrow().geometry_by_id(&geometry.id);
        match current {
            Some(record) if !record.is_selected() => {
                let result = layer
                    .borrow_mut()
                    .update_geometries(vec![record.restyled(StyleState::Hover)]);
                absorb(result, "hover restyle");
                *self.hovered.borrow_mut() = Some(geometry.id.clone());
                HoverOutcome::Hovered(geometry.id)
            }
            _ => HoverOutcome::Skipped,
        }
    }

    fn next_move(&self) -> u64 {
        let ticket = self.moves.get().wrapping_add(1);
        self.moves.set(ticket);
        ticket
    }

    /// Reverts the previously hovered geometry unless the pointer is still on
    /// it or it is selected.
    fn leave_previous<L>(&self, layer: &RefCell<L>, under_pointer: Option<&str>)
    where
        L: RenderLayer + ?Sized,
    {
        let Some(previous) = self.hovered_id() else {
            return;
        };
        if Some(previous.as_str()) == under_pointer {
            return;
        }

        let record = layer.borrow().geometry_by_id(&previous);
        match record {
            Some(record) if record.is_selected() => {}
            Some(record) => {
                let result = layer
                    .borrow_mut()
                    .update_geometries(vec![record.restyled(StyleState::Normal)]);
                absorb(result, "hover revert");
                self.clear_hovered();
            }
            None => self.clear_hovered(),
        }
    }

    fn clear_hovered(&self) {
        *self.hovered.borrow_mut() = None;
    }

    /// Forgets `id` if it is the hovered geometry
    pub fn forget(&self, id: &str) {
        let mut hovered = self.hovered.borrow_mut();
        if hovered.as_deref() == Some(id) {
            *hovered = None;
        }
    }

    /// Clears tracked state; rendered styles are left as they are.
    ///
    /// Callbacks still pending from earlier moves will not restyle.
    pub fn clear(&self) {
        self.clear_hovered();
        self.next_move();
    }

    pub fn set_enable(&self, enable: bool) {
        self.enabled.set(enable);
        self.clear();
    }
}

impl Default for HoverTracker {
    fn default() -> Self {
        Self::new()
    }
}
