use std::ops::{Deref, DerefMut};

use crate::{
    core::geo::LatLng,
    layers::{controller::LayerController, geometry::Geometry},
    traits::RenderLayer,
};

/// Id and base style of the single pin marker
pub const PIN_ID: &str = "pin";
pub const PIN_STYLE: &str = "mark";
pub const START_ID: &str = "start";
pub const END_ID: &str = "end";

/// A marker layer: the usual controller plus a pin and route endpoints.
///
/// Dereferences to its [`LayerController`] for redraw, selection and events.
pub struct MarkerLayer<L: RenderLayer> {
    inner: LayerController<L>,
}

impl<L: RenderLayer> MarkerLayer<L> {
    pub fn new(inner: LayerController<L>) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> LayerController<L> {
        self.inner
    }

    /// Places the pin at `position`, or removes it when `None`.
    ///
    /// An invalid position removes the old pin without placing a new one.
    pub fn mark(&mut self, position: Option<LatLng>) {
        self.inner.remove(&[PIN_ID]);
        let Some(position) = position else {
            return;
        };
        if !position.is_valid() {
            log::warn!("pin position {:?} is out of range", position);
            return;
        }
        self.inner
            .update(vec![Geometry::point(PIN_ID, PIN_STYLE, position)]);
    }

    /// Places or removes the start and end markers independently
    pub fn mark_start_end(&mut self, start: Option<LatLng>, end: Option<LatLng>) {
        self.place_endpoint(START_ID, start);
        self.place_endpoint(END_ID, end);
    }

    fn place_endpoint(&mut self, id: &str, position: Option<LatLng>) {
        match position {
            Some(position) if position.is_valid() => {
                self.inner.update(vec![Geometry::point(id, id, position)]);
            }
            Some(position) => {
                log::warn!("{} marker position {:?} is out of range", id, position);
            }
            None => self.inner.remove(&[id]),
        }
    }
}

impl<L: RenderLayer> Deref for MarkerLayer<L> {
    type Target = LayerController<L>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<L: RenderLayer> DerefMut for MarkerLayer<L> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layers::controller::LayerOptions, rendering::memory::MemoryLayer};

    fn markers() -> MarkerLayer<MemoryLayer> {
        MarkerLayer::new(LayerController::new(
            "marker-1",
            MemoryLayer::new(),
            LayerOptions::default(),
        ))
    }

    #[test]
    fn test_mark_moves_and_removes_pin() {
        let mut layer = markers();

        layer.mark(Some(LatLng::new(31.0, 121.0)));
        layer.mark(Some(LatLng::new(32.0, 122.0)));
        let pins = layer.geometries();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].base_key(), PIN_STYLE);
        assert_eq!(pins[0].shape.bounds().unwrap().center(), LatLng::new(32.0, 122.0));

        layer.mark(None);
        assert!(layer.geometry(PIN_ID).is_none());
    }

    #[test]
    fn test_invalid_pin_only_removes() {
        let mut layer = markers();
        layer.mark(Some(LatLng::new(31.0, 121.0)));
        layer.mark(Some(LatLng::new(95.0, 121.0)));
        assert!(layer.geometries().is_empty());
    }

    #[test]
    fn test_start_end_markers_are_independent() {
        let mut layer = markers();

        layer.mark_start_end(Some(LatLng::new(1.0, 1.0)), Some(LatLng::new(2.0, 2.0)));
        assert_eq!(layer.geometries().len(), 2);
        assert_eq!(layer.geometry(START_ID).unwrap().style_id(), "start");

        layer.mark_start_end(Some(LatLng::new(1.5, 1.5)), None);
        assert!(layer.geometry(END_ID).is_none());
        assert!(layer.geometry(START_ID).is_some());

        layer.selected(&[START_ID]);
        assert_eq!(layer.geometry(START_ID).unwrap().style_id(), "start_selected");
    }
}
