use async_trait::async_trait;

use crate::{
    core::geo::LatLng,
    input::{
        click::{ClickKind, ClickResolution, ClickSubject},
        events::Verdict,
    },
    layers::geometry::Geometry,
};

/// Caller callbacks for one layer.
///
/// Every method may suspend, and callbacks for different events of the same
/// layer may be pending at once, so methods take `&self`. A
/// [`Verdict::Veto`] from `on_hover` cancels the hover restyle; from the
/// click callbacks it is only reported back.
#[async_trait(?Send)]
pub trait LayerHandler {
    /// Pointer moved onto `geometry`, or off every geometry when `None`
    async fn on_hover(&self, _geometry: Option<&Geometry>, _position: LatLng) -> Verdict {
        Verdict::Proceed
    }

    async fn on_click(&self, _subject: &ClickSubject, _position: LatLng) -> Verdict {
        Verdict::Proceed
    }

    async fn on_double_click(&self, _subject: &ClickSubject, _position: LatLng) -> Verdict {
        Verdict::Proceed
    }
}

/// A resolved click and what the callback answered
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub resolution: ClickResolution,
    pub verdict: Verdict,
}

/// Hands `resolution` to the matching click callback of `handler`
pub async fn deliver_click<H>(handler: &H, resolution: ClickResolution) -> ClickOutcome
where
    H: LayerHandler + ?Sized,
{
    let verdict = match resolution.kind {
        ClickKind::Single => {
            handler
                .on_click(&resolution.subject, resolution.position)
                .await
        }
        ClickKind::Double => {
            handler
                .on_double_click(&resolution.subject, resolution.position)
                .await
        }
    };
    ClickOutcome {
        resolution,
        verdict,
    }
}

/// Hover callback type
pub type HoverCallback = Box<dyn Fn(Option<&Geometry>, LatLng) -> Verdict>;

/// Click callback type
pub type ClickCallback = Box<dyn Fn(&ClickSubject, LatLng) -> Verdict>;

/// [`LayerHandler`] built from plain closures
#[derive(Default)]
pub struct FnHandler {
    hover: Option<HoverCallback>,
    click: Option<ClickCallback>,
    double_click: Option<ClickCallback>,
}

impl FnHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_hover<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Geometry>, LatLng) -> Verdict + 'static,
    {
        self.hover = Some(Box::new(f));
        self
    }

    pub fn on_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&ClickSubject, LatLng) -> Verdict + 'static,
    {
        self.click = Some(Box::new(f));
        self
    }

    pub fn on_double_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&ClickSubject, LatLng) -> Verdict + 'static,
    {
        self.double_click = Some(Box::new(f));
        self
    }
}

#[async_trait(?Send)]
impl LayerHandler for FnHandler {
    async fn on_hover(&self, geometry: Option<&Geometry>, position: LatLng) -> Verdict {
        match self.hover.as_ref() {
            Some(f) => f(geometry, position),
            None => Verdict::Proceed,
        }
    }

    async fn on_click(&self, subject: &ClickSubject, position: LatLng) -> Verdict {
        match self.click.as_ref() {
            Some(f) => f(subject, position),
            None => Verdict::Proceed,
        }
    }

    async fn on_double_click(&self, subject: &ClickSubject, position: LatLng) -> Verdict {
        match self.double_click.as_ref() {
            Some(f) => f(subject, position),
            None => Verdict::Proceed,
        }
    }
}
