//! Direction arrows repeated along polylines.
//!
//! Icons are placed by [`place_icons_with`] and their heading is snapped to
//! the configured angle slice, so a layer only needs one style per slice:
//! `{base}_{rotation}` (for example `link_0`, `link_15`, ... `link_345`).

use serde_json::json;

use crate::{
    core::config::IconPlacementConfig,
    layers::{
        controller::{LayerController, LayerOptions},
        geometry::{Geometry, Shape},
    },
    spatial::polyline::{place_icons_with, quantize_heading, Haversine, PathMetric},
    traits::RenderLayer,
};

/// Style key of an arrow icon for `base` rotated by `rotation` degrees
pub fn arrow_style(base: &str, rotation: u32) -> String {
    format!("{}_{}", base, rotation)
}

/// Non-interactive icon layer fed from path geometries
pub struct ArrowLayer<L: RenderLayer> {
    icons: LayerController<L>,
    config: IconPlacementConfig,
    metric: Box<dyn PathMetric>,
}

impl<L: RenderLayer> ArrowLayer<L> {
    pub fn new(id: impl Into<String>, layer: L, config: IconPlacementConfig) -> Self {
        Self {
            icons: LayerController::new(id, layer, LayerOptions::passive()),
            config,
            metric: Box::new(Haversine),
        }
    }

    /// Measures paths with `metric` instead of great-circle meters
    pub fn with_metric<M>(mut self, metric: M) -> Self
    where
        M: PathMetric + 'static,
    {
        self.metric = Box::new(metric);
        self
    }

    pub fn icons(&self) -> &LayerController<L> {
        &self.icons
    }

    pub fn config(&self) -> &IconPlacementConfig {
        &self.config
    }

    /// Replaces every arrow with icons along the path geometries in `paths`
    /// and returns how many were placed.
    ///
    /// Each path's base key names the arrow style family. Non-path shapes
    /// and paths with fewer than two points are skipped.
    pub fn redraw(&mut self, paths: &[Geometry]) -> usize {
        let mut arrows = Vec::new();

        for geometry in paths {
            let Shape::Path(points) = &geometry.shape else {
                continue;
            };
            if points.len() < 2 {
                continue;
            }

            let placements =
                place_icons_with(points, self.config.interval_meters, &*self.metric);
            for (n, placement) in placements.into_iter().enumerate() {
                let rotation =
                    quantize_heading(placement.heading, self.config.angle_slice_degrees);
                let arrow = Geometry::point(
                    format!("{}-{}", geometry.id, n),
                    arrow_style(geometry.base_key(), rotation),
                    placement.position,
                )
                .with_data(json!({
                    "path": geometry.id,
                    "heading": placement.heading,
                }));
                arrows.push(arrow);
            }
        }

        let count = arrows.len();
        self.icons.redraw(arrows);
        count
    }

    pub fn set_enable(&mut self, enable: bool) {
        self.icons.set_enable(enable);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.icons.set_visible(visible);
    }

    pub fn destroy(&mut self) {
        self.icons.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LatLng, rendering::memory::MemoryLayer, spatial::polyline::Planar,
    };

    fn planar(interval: f64, slice: u32) -> ArrowLayer<MemoryLayer> {
        let config = IconPlacementConfig {
            interval_meters: interval,
            angle_slice_degrees: slice,
        };
        ArrowLayer::new("arrow-1", MemoryLayer::new(), config).with_metric(Planar)
    }

    #[test]
    fn test_arrows_follow_path_direction() {
        let mut layer = planar(4.0, 15);
        let road = Geometry::path(
            "r1",
            "link",
            vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 10.0)],
        );
        let river = Geometry::path(
            "r2",
            "link",
            vec![LatLng::new(0.0, 0.0), LatLng::new(-10.0, 0.0)],
        );

        assert_eq!(layer.redraw(&[road, river]), 6);
        let arrows = layer.icons().geometries();
        assert!(arrows[..3].iter().all(|a| a.base_key() == "link_0"));
        assert!(arrows[3..].iter().all(|a| a.base_key() == "link_90"));
        assert_eq!(arrows[0].id, "r1-0");
        assert_eq!(arrows[0].data["path"], "r1");
    }

    #[test]
    fn test_rotation_snaps_to_slice() {
        let mut layer = planar(0.5, 15);
        // south-east
        let diagonal = Geometry::path(
            "d",
            "link",
            vec![LatLng::new(0.0, 0.0), LatLng::new(-1.0, 1.0)],
        );
        assert_eq!(layer.redraw(&[diagonal]), 3);
        assert!(layer
            .icons()
            .geometries()
            .iter()
            .all(|a| a.base_key() == "link_45"));
    }

    #[test]
    fn test_short_and_non_path_input_is_skipped() {
        let mut layer = planar(4.0, 15);
        let inputs = [
            Geometry::path("p", "link", vec![LatLng::new(0.0, 0.0)]),
            Geometry::point("q", "link", LatLng::new(0.0, 0.0)),
        ];
        assert_eq!(layer.redraw(&inputs), 0);
        assert!(layer.icons().geometries().is_empty());
    }

    #[test]
    fn test_layer_is_never_interactive_by_default() {
        let layer = planar(4.0, 15);
        assert!(!layer.icons().layer().borrow().is_interactive());
    }

    #[test]
    fn test_default_config_uses_meters() {
        let mut layer =
            ArrowLayer::new("arrow-2", MemoryLayer::new(), IconPlacementConfig::default());
        // about 1113 m of meridian
        let path = Geometry::path(
            "m",
            "link",
            vec![LatLng::new(30.0, 120.0), LatLng::new(30.01, 120.0)],
        );
        assert_eq!(layer.redraw(&[path]), 37);
        assert_eq!(layer.icons().geometries()[0].base_key(), "link_270");
    }
}
