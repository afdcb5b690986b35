//! One geometry collection with click and hover interaction.
//!
//! A [`LayerController`] owns the interaction state of a single engine layer:
//! the pending click of its [`ClickDisambiguator`] and the hovered geometry of
//! its [`HoverTracker`]. The engine layer itself is shared as
//! `Rc<RefCell<L>>` so caller handlers may restyle or edit it while a callback
//! is running.
//!
//! Event entry points take `&self` and keep no borrow across a caller
//! callback, so a hover or click may be processed while the callback of an
//! earlier event is still pending. Mutations of the collection take
//! `&mut self` and therefore never overlap a pending event.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::future::Future;
use std::time::Instant;

use crate::{
    core::config::ClickTimingConfig,
    input::{
        click::{ClickDisambiguator, ClickScope},
        events::{PointerEvent, PropagationGuard},
        handler::{deliver_click, ClickOutcome, LayerHandler},
        hover::{HoverOutcome, HoverTracker},
    },
    layers::{geometry::Geometry, style::StyleState},
    traits::{absorb, RenderLayer},
};

/// Interaction switches of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    /// Route pointer moves through the hover tracker
    pub hover: bool,
    /// Route clicks through the click disambiguator
    pub click: bool,
    /// Whether the engine delivers pointer events to this layer at all
    pub interactive: bool,
    pub clicks: ClickTimingConfig,
}

impl LayerOptions {
    /// Display-only layer: no events, no interaction state
    pub fn passive() -> Self {
        Self {
            hover: false,
            click: false,
            interactive: false,
            clicks: ClickTimingConfig::default(),
        }
    }
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            hover: true,
            click: true,
            interactive: true,
            clicks: ClickTimingConfig::default(),
        }
    }
}

pub struct LayerController<L: RenderLayer> {
    id: String,
    layer: Rc<RefCell<L>>,
    options: LayerOptions,
    handler: Option<Box<dyn LayerHandler>>,
    clicks: RefCell<ClickDisambiguator>,
    hover: HoverTracker,
    guard: Option<PropagationGuard>,
}

impl<L: RenderLayer> LayerController<L> {
    pub fn new(id: impl Into<String>, layer: L, options: LayerOptions) -> Self {
        Self::from_shared(id, Rc::new(RefCell::new(layer)), options)
    }

    /// Wraps an engine layer that is already shared with other code
    pub fn from_shared(id: impl Into<String>, layer: Rc<RefCell<L>>, options: LayerOptions) -> Self {
        if !options.interactive {
            absorb(
                layer.borrow_mut().set_interactive_disable(true),
                "initial interactivity",
            );
        }

        Self {
            id: id.into(),
            clicks: RefCell::new(ClickDisambiguator::with_config(
                ClickScope::Layer,
                &options.clicks,
            )),
            hover: HoverTracker::new(),
            layer,
            options,
            handler: None,
            guard: None,
        }
    }

    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: LayerHandler + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Flags every click this layer receives so the map surface skips it
    pub fn with_guard(mut self, guard: PropagationGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &LayerOptions {
        &self.options
    }

    /// Shared handle to the engine layer
    pub fn layer(&self) -> Rc<RefCell<L>> {
        self.layer.clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.layer.borrow().is_destroyed()
    }

    pub fn hovered_id(&self) -> Option<String> {
        self.hover.hovered_id()
    }

    pub fn geometry(&self, id: &str) -> Option<Geometry> {
        self.layer
            .borrow()
            .geometry_by_id(id)
            .and_then(|record| Geometry::from_record(&record))
    }

    /// Current collection; records whose style no longer resolves are skipped
    pub fn geometries(&self) -> Vec<Geometry> {
        self.layer
            .borrow()
            .geometries()
            .iter()
            .filter_map(Geometry::from_record)
            .collect()
    }

    /// Replaces the whole collection and forgets pending interaction state
    pub fn redraw(&mut self, geometries: Vec<Geometry>) {
        self.restore_event();

        let records: Vec<_> = geometries.iter().map(Geometry::to_record).collect();
        let mut layer = self.layer.borrow_mut();
        absorb(layer.set_geometries(Vec::new()), "redraw clear");
        if !records.is_empty() {
            absorb(layer.set_geometries(records), "redraw");
        }
    }

    /// Inserts or replaces geometries by id
    pub fn update(&mut self, geometries: Vec<Geometry>) {
        if geometries.is_empty() {
            return;
        }
        let records = geometries.iter().map(Geometry::to_record).collect();
        absorb(self.layer.borrow_mut().update_geometries(records), "update");
    }

    pub fn remove<S: AsRef<str>>(&mut self, ids: &[S]) {
        let ids: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();
        for id in &ids {
            self.hover.forget(id);
        }
        absorb(self.layer.borrow_mut().remove_geometries(&ids), "remove");
    }

    /// Marks exactly the geometries in `ids` as selected; every other
    /// geometry returns to its normal style, hover included.
    pub fn selected<S: AsRef<str>>(&mut self, ids: &[S]) {
        let records = self.layer.borrow().geometries();
        if records.is_empty() {
            return;
        }

        let restyled = records
            .iter()
            .map(|record| {
                let state = if ids.iter().any(|id| id.as_ref() == record.id) {
                    StyleState::Selected
                } else {
                    StyleState::Normal
                };
                record.restyled(state)
            })
            .collect();
        absorb(self.layer.borrow_mut().update_geometries(restyled), "selection");
    }

    /// Turns engine event delivery on or off; interaction state is kept
    pub fn set_enable(&mut self, enable: bool) {
        absorb(
            self.layer.borrow_mut().set_interactive_disable(!enable),
            "set enable",
        );
    }

    pub fn set_visible(&mut self, visible: bool) {
        absorb(self.layer.borrow_mut().set_visible(visible), "set visible");
    }

    /// Drops the pending click and the hovered id
    pub fn restore_event(&mut self) {
        self.clicks.borrow_mut().clear();
        self.hover.clear();
    }

    pub fn destroy(&mut self) {
        self.restore_event();
        absorb(self.layer.borrow_mut().destroy(), "destroy");
        log::debug!("layer {} destroyed", self.id);
    }

    fn accepts(&self, wanted: bool) -> bool {
        wanted && self.handler.is_some() && !self.is_destroyed()
    }

    /// Engine `hover` event
    pub async fn handle_hover(&self, event: &PointerEvent) -> HoverOutcome {
        if !self.accepts(self.options.hover) {
            return HoverOutcome::Disabled;
        }
        let Some(handler) = self.handler.as_deref() else {
            return HoverOutcome::Disabled;
        };
        self.hover.on_pointer_move(&*self.layer, handler, event).await
    }

    /// Engine `click` event, stamped with the time of this call
    pub fn handle_click(
        &self,
        event: PointerEvent,
    ) -> impl Future<Output = Option<ClickOutcome>> + '_ {
        let now = Instant::now();
        self.handle_click_at(event, now)
    }

    /// Engine `click` event observed at `now`.
    ///
    /// Returns an outcome when this click completes a double click, or when it
    /// flushes a single click whose deadline had already passed.
    pub async fn handle_click_at(&self, event: PointerEvent, now: Instant) -> Option<ClickOutcome> {
        if !self.accepts(self.options.click) {
            return None;
        }
        if let Some(guard) = &self.guard {
            guard.prevent_default();
        }

        let resolution = self.clicks.borrow_mut().handle_click(event, now)?;
        let handler = self.handler.as_deref()?;
        Some(deliver_click(handler, resolution).await)
    }

    /// Resolves the pending click if its deadline is at or before `now`
    pub async fn fire_due_clicks(&self, now: Instant) -> Option<ClickOutcome> {
        let resolution = self.clicks.borrow_mut().poll(now)?;
        let handler = self.handler.as_deref()?;
        Some(deliver_click(handler, resolution).await)
    }

    /// Deadline of the pending click, if any
    pub fn click_deadline(&self) -> Option<Instant> {
        self.clicks.borrow().deadline()
    }

    /// Sleeps until the pending click is due, then resolves it.
    ///
    /// Returns immediately with `None` when nothing is pending. A click that
    /// arrives during the sleep and completes a double click leaves nothing
    /// to fire. Dropping the future cancels the wait without touching the
    /// pending click.
    #[cfg(feature = "tokio-runtime")]
    pub async fn wait_click_timer(&self) -> Option<ClickOutcome> {
        let deadline = self.click_deadline()?;
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        self.fire_due_clicks(deadline).await
    }
}

impl<L: RenderLayer> std::fmt::Debug for LayerController<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerController")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("has_handler", &self.handler.is_some())
            .field("clicks", &self.clicks)
            .field("hover", &self.hover)
            .finish()
    }
}
