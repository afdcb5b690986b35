use crate::{
    core::config::InteractionConfig,
    input::events::PropagationGuard,
    layers::{
        arrow::ArrowLayer,
        controller::{LayerController, LayerOptions},
        marker::MarkerLayer,
        surface::SurfaceClicks,
        tile::TileLayer,
    },
    prelude::HashMap,
    traits::RenderLayer,
};

/// Builds layers for one map.
///
/// Hands out ids of the form `"{kind}-{n}"` with one counter per kind, and
/// wires every clickable layer to the same [`PropagationGuard`] as the map
/// surface so a click on a geometry is not reported twice.
#[derive(Debug, Default)]
pub struct LayerFactory {
    config: InteractionConfig,
    counters: HashMap<String, u64>,
    guard: PropagationGuard,
}

impl LayerFactory {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            counters: HashMap::default(),
            guard: PropagationGuard::new(),
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn guard(&self) -> &PropagationGuard {
        &self.guard
    }

    /// Next id for a layer of `kind`, starting at `{kind}-1`
    pub fn next_id(&mut self, kind: &str) -> String {
        let counter = self.counters.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        format!("{}-{}", kind, counter)
    }

    /// Controller over `layer`, using the factory's click timing
    pub fn controller<L: RenderLayer>(
        &mut self,
        kind: &str,
        layer: L,
        options: LayerOptions,
    ) -> LayerController<L> {
        let id = self.next_id(kind);
        let options = LayerOptions {
            clicks: self.config.clicks.clone(),
            ..options
        };
        let clickable = options.click;

        let controller = LayerController::new(id, layer, options);
        if clickable {
            controller.with_guard(self.guard.clone())
        } else {
            controller
        }
    }

    pub fn marker_layer<L: RenderLayer>(
        &mut self,
        layer: L,
        options: LayerOptions,
    ) -> MarkerLayer<L> {
        MarkerLayer::new(self.controller("marker", layer, options))
    }

    /// Tile grid over an area layer and a label layer
    pub fn tile_layer<L: RenderLayer>(
        &mut self,
        areas: L,
        labels: L,
        options: LayerOptions,
    ) -> TileLayer<L> {
        let areas = self.controller("tile", areas, options);
        TileLayer::new(areas, labels, self.config.tiles.clone())
    }

    pub fn arrow_layer<L: RenderLayer>(&mut self, layer: L) -> ArrowLayer<L> {
        let id = self.next_id("arrow");
        ArrowLayer::new(id, layer, self.config.icons.clone())
    }

    /// Click handling for the map surface, sharing this factory's guard
    pub fn surface(&self) -> SurfaceClicks {
        SurfaceClicks::new(&self.config.clicks, self.guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{config::InteractionProfile, geo::LatLng},
        input::{events::PointerEvent, handler::FnHandler},
        layers::geometry::Geometry,
        rendering::memory::MemoryLayer,
    };
    use std::time::Instant;

    #[test]
    fn test_ids_count_per_kind() {
        let mut factory = LayerFactory::default();
        assert_eq!(factory.next_id("dot"), "dot-1");
        assert_eq!(factory.next_id("dot"), "dot-2");
        assert_eq!(factory.next_id("area"), "area-1");

        let other = LayerFactory::default();
        assert!(other.counters.is_empty());
    }

    #[test]
    fn test_factory_applies_config() {
        let mut factory = LayerFactory::new(InteractionProfile::Relaxed.resolve());

        let controller = factory.controller("dot", MemoryLayer::new(), LayerOptions::default());
        assert_eq!(controller.id(), "dot-1");
        assert_eq!(controller.options().clicks.double_click_window_ms, 350);

        let arrows = factory.arrow_layer(MemoryLayer::new());
        assert_eq!(arrows.icons().id(), "arrow-1");
        assert_eq!(arrows.config().interval_meters, 60.0);

        let tiles =
            factory.tile_layer(MemoryLayer::new(), MemoryLayer::new(), LayerOptions::default());
        assert_eq!(tiles.areas().id(), "tile-1");
        assert_eq!(tiles.labels().id(), "tile-1-labels");

        let markers = factory.marker_layer(MemoryLayer::new(), LayerOptions::passive());
        assert_eq!(markers.id(), "marker-1");
        assert!(!markers.layer().borrow().is_interactive());
    }

    #[tokio::test]
    async fn test_layer_click_does_not_reach_surface() {
        let mut factory = LayerFactory::default();
        let mut dots = factory
            .controller("dot", MemoryLayer::new(), LayerOptions::default())
            .with_handler(FnHandler::new());
        dots.redraw(vec![Geometry::point("a", "x", LatLng::default())]);
        let surface = factory.surface().with_handler(FnHandler::new());

        let t0 = Instant::now();
        let record = dots.layer().borrow().geometry_by_id("a").unwrap();
        let event = PointerEvent::over(record, LatLng::default());

        dots.handle_click_at(event.clone(), t0).await;
        surface.handle_click_at(event, t0).await;
        assert!(dots.click_deadline().is_some());
        assert!(surface.click_deadline().is_none());

        surface
            .handle_click_at(PointerEvent::empty(LatLng::default()), t0)
            .await;
        assert!(surface.click_deadline().is_some());
    }
}
