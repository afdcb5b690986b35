use std::cell::RefCell;
use std::future::Future;
use std::time::Instant;

use crate::{
    core::config::ClickTimingConfig,
    input::{
        click::{ClickDisambiguator, ClickScope},
        events::{PointerEvent, PropagationGuard},
        handler::{deliver_click, ClickOutcome, LayerHandler},
    },
};

/// Click handling for the map surface itself.
///
/// Callbacks receive the whole pointer event ([`ClickSubject::Surface`]).
/// Clicks that a layer controller sharing the same [`PropagationGuard`]
/// already received are dropped.
///
/// [`ClickSubject::Surface`]: crate::input::click::ClickSubject::Surface
pub struct SurfaceClicks {
    clicks: RefCell<ClickDisambiguator>,
    handler: Option<Box<dyn LayerHandler>>,
    guard: PropagationGuard,
}

impl SurfaceClicks {
    pub fn new(config: &ClickTimingConfig, guard: PropagationGuard) -> Self {
        Self {
            clicks: RefCell::new(ClickDisambiguator::with_config(ClickScope::Surface, config)),
            handler: None,
            guard,
        }
    }

    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: LayerHandler + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn guard(&self) -> &PropagationGuard {
        &self.guard
    }

    /// Map click, stamped with the time of this call
    pub fn handle_click(
        &self,
        event: PointerEvent,
    ) -> impl Future<Output = Option<ClickOutcome>> + '_ {
        let now = Instant::now();
        self.handle_click_at(event, now)
    }

    pub async fn handle_click_at(&self, event: PointerEvent, now: Instant) -> Option<ClickOutcome> {
        // read the flag even without a handler so it never leaks into the next click
        if self.guard.is_prevent_default() {
            log::debug!("surface click at {:?} consumed by a layer", event.position);
            return None;
        }
        if self.handler.is_none() {
            return None;
        }

        let resolution = self.clicks.borrow_mut().handle_click(event, now)?;
        let handler = self.handler.as_deref()?;
        Some(deliver_click(handler, resolution).await)
    }

    pub async fn fire_due_clicks(&self, now: Instant) -> Option<ClickOutcome> {
        let resolution = self.clicks.borrow_mut().poll(now)?;
        let handler = self.handler.as_deref()?;
        Some(deliver_click(handler, resolution).await)
    }

    pub fn click_deadline(&self) -> Option<Instant> {
        self.clicks.borrow().deadline()
    }

    #[cfg(feature = "tokio-runtime")]
    pub async fn wait_click_timer(&self) -> Option<ClickOutcome> {
        let deadline = self.click_deadline()?;
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        self.fire_due_clicks(deadline).await
    }

    pub fn set_enable(&mut self, enable: bool) {
        self.clicks.get_mut().set_enable(enable);
    }

    pub fn clear(&mut self) {
        self.clicks.get_mut().clear();
    }
}
