//! Click versus double-click disambiguation.
//!
//! A first click is buffered and a deadline is armed. A second click before
//! the deadline resolves the pair as one double click; otherwise the deadline
//! resolves the buffered click as a single click. There is one pending
//! resolution per layer, whichever geometry was clicked.
//!
//! The state machine never reads the clock itself: callers pass `now`, and
//! the owner arms a timer for [`ClickDisambiguator::deadline`].

use std::time::{Duration, Instant};

use crate::{
    core::{config::ClickTimingConfig, geo::LatLng},
    input::events::PointerEvent,
    layers::geometry::Geometry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

/// What the clicked layer stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickScope {
    /// The whole map surface: callbacks receive the raw event
    Surface,
    /// A geometry collection: callbacks receive the geometry under the pointer
    Layer,
}

/// Data handed to click callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum ClickSubject {
    Surface(PointerEvent),
    Geometry(Geometry),
    /// Layer event without a resolvable geometry
    Nothing,
}

impl ClickSubject {
    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            ClickSubject::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickResolution {
    pub kind: ClickKind,
    pub subject: ClickSubject,
    pub position: LatLng,
}

#[derive(Debug, Clone)]
enum ClickState {
    Idle,
    AwaitingSecondClick {
        first: PointerEvent,
        deadline: Instant,
    },
}

#[derive(Debug, Clone)]
pub struct ClickDisambiguator {
    scope: ClickScope,
    window: Duration,
    state: ClickState,
    enabled: bool,
}

impl ClickDisambiguator {
    pub fn new(scope: ClickScope, window: Duration) -> Self {
        Self {
            scope,
            window,
            state: ClickState::Idle,
            enabled: true,
        }
    }

    pub fn with_config(scope: ClickScope, config: &ClickTimingConfig) -> Self {
        Self::new(scope, config.double_click_window())
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ClickState::AwaitingSecondClick { .. })
    }

    /// When the buffered click resolves as a single click
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            ClickState::Idle => None,
            ClickState::AwaitingSecondClick { deadline, .. } => Some(*deadline),
        }
    }

    /// Feeds a click observed at `now`.
    ///
    /// Returns a double-click resolution when this is the second click of a
    /// pair. A click arriving after an unserviced deadline first returns the
    /// stale single click and opens a new window for itself.
    pub fn handle_click(&mut self, event: PointerEvent, now: Instant) -> Option<ClickResolution> {
        if !self.enabled {
            return None;
        }

        match std::mem::replace(&mut self.state, ClickState::Idle) {
            ClickState::Idle => {
                self.arm(event, now);
                None
            }
            ClickState::AwaitingSecondClick { deadline, .. } if now <= deadline => {
                log::debug!("double click at {:?}", event.position);
                Some(self.resolve(ClickKind::Double, event))
            }
            ClickState::AwaitingSecondClick { first, .. } => {
                let stale = self.resolve(ClickKind::Single, first);
                self.arm(event, now);
                Some(stale)
            }
        }
    }

    /// Resolves the buffered click if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<ClickResolution> {
        match &self.state {
            ClickState::AwaitingSecondClick { deadline, .. } if now >= *deadline => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.state, ClickState::Idle) {
            ClickState::AwaitingSecondClick { first, .. } => {
                Some(self.resolve(ClickKind::Single, first))
            }
            ClickState::Idle => None,
        }
    }

    /// Drops the buffered click and its deadline
    pub fn clear(&mut self) {
        self.state = ClickState::Idle;
    }

    pub fn set_enable(&mut self, enable: bool) {
        self.enabled = enable;
        self.clear();
    }

    fn arm(&mut self, event: PointerEvent, now: Instant) {
        self.state = ClickState::AwaitingSecondClick {
            first: event,
            deadline: now + self.window,
        };
    }

    fn resolve(&self, kind: ClickKind, event: PointerEvent) -> ClickResolution {
        let position = event.position;
        let subject = match self.scope {
            ClickScope::Surface => ClickSubject::Surface(event),
            ClickScope::Layer => event
                .geometry
                .as_ref()
                .and_then(Geometry::from_record)
                .map(ClickSubject::Geometry)
                .unwrap_or(ClickSubject::Nothing),
        };
        ClickResolution {
            kind,
            subject,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(220);

    fn click_on(id: &str, lat: f64) -> PointerEvent {
        PointerEvent::over(
            Geometry::point(id, "dot", LatLng::new(lat, 0.0)).to_record(),
            LatLng::new(lat, 0.0),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_single_click_resolves_at_deadline() {
        let mut clicks = ClickDisambiguator::new(ClickScope::Layer, WINDOW);
        let t0 = Instant::now();

        assert!(clicks.handle_click(click_on("a", 1.0), t0).is_none());
        assert_eq!(clicks.deadline(), Some(t0 + WINDOW));
        assert!(clicks.poll(t0 + ms(100)).is_none());

        let resolution = clicks.poll(t0 + WINDOW).unwrap();
        assert_eq!(resolution.kind, ClickKind::Single);
        assert_eq!(resolution.subject.geometry().unwrap().id, "a");
        assert!(!clicks.is_pending());
        assert!(clicks.poll(t0 + ms(1000)).is_none());
    }

    #[test]
    fn test_double_click_reports_second_event() {
        let mut clicks = ClickDisambiguator::new(ClickScope::Layer, WINDOW);
        let t0 = Instant::now();

        clicks.handle_click(click_on("a", 1.0), t0);
        let resolution = clicks.handle_click(click_on("a", 2.0), t0 + ms(150)).unwrap();

        assert_eq!(resolution.kind, ClickKind::Double);
        assert_eq!(resolution.position, LatLng::new(2.0, 0.0));
        assert!(!clicks.is_pending());
        // the first click never resolves on its own
        assert!(clicks.poll(t0 + ms(500)).is_none());
    }

    #[test]
    fn test_clicks_spaced_beyond_window_are_independent() {
        let mut clicks = ClickDisambiguator::new(ClickScope::Layer, WINDOW);
        let t0 = Instant::now();
        let mut singles = 0;

        for i in 0..4u64 {
            let at = t0 + ms(i * 221);
            if let Some(resolution) = clicks.handle_click(click_on("a", i as f64), at) {
                assert_eq!(resolution.kind, ClickKind::Single);
                singles += 1;
            }
        }
        let last = clicks.poll(t0 + ms(3 * 221) + WINDOW).unwrap();
        assert_eq!(last.kind, ClickKind::Single);
        assert_eq!(singles + 1, 4);
    }

    #[test]
    fn test_disable_discards_pending_click() {
        let mut clicks = ClickDisambiguator::new(ClickScope::Layer, WINDOW);
        let t0 = Instant::now();

        clicks.handle_click(click_on("a", 1.0), t0);
        clicks.set_enable(false);
        assert!(clicks.deadline().is_none());
        assert!(clicks.poll(t0 + WINDOW).is_none());

        assert!(clicks.handle_click(click_on("a", 1.0), t0 + ms(300)).is_none());
        assert!(!clicks.is_pending());

        clicks.set_enable(true);
        clicks.handle_click(click_on("b", 1.0), t0 + ms(400));
        assert!(clicks.is_pending());
    }

    #[test]
    fn test_surface_scope_hands_out_event() {
        let mut clicks = ClickDisambiguator::new(ClickScope::Surface, WINDOW);
        let t0 = Instant::now();
        let event = PointerEvent::empty(LatLng::new(3.0, 4.0));

        clicks.handle_click(event.clone(), t0);
        let resolution = clicks.poll(t0 + WINDOW).unwrap();
        assert_eq!(resolution.subject, ClickSubject::Surface(event));
    }

    #[test]
    fn test_layer_click_without_geometry() {
        let mut clicks = ClickDisambiguator::new(ClickScope::Layer, WINDOW);
        let t0 = Instant::now();

        clicks.handle_click(PointerEvent::empty(LatLng::default()), t0);
        let resolution = clicks.poll(t0 + WINDOW).unwrap();
        assert_eq!(resolution.subject, ClickSubject::Nothing);
    }
}
