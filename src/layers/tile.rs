//! Grid overlay: one outlined area per tile cell plus its id as a label.

use serde_json::json;

use crate::{
    core::{config::TileGridConfig, geo::LatLngBounds},
    input::{
        click::ClickSubject, events::PointerEvent, handler::ClickOutcome, hover::HoverOutcome,
    },
    layers::{
        controller::{LayerController, LayerOptions},
        geometry::Geometry,
    },
    spatial::tiling::{map_level, tiles_at, TileCell, TileId, TileLevel},
    traits::{MapView, RenderLayer},
};

/// Base style of tile areas
pub const TILE_STYLE: &str = "tile";
/// Base style of tile id labels
pub const TILE_LABEL_STYLE: &str = "tileId";

/// Tile grid drawn on two engine layers.
///
/// The area layer takes hover and click events; the label layer never does.
pub struct TileLayer<L: RenderLayer> {
    areas: LayerController<L>,
    labels: LayerController<L>,
    grid: TileGridConfig,
    level: Option<TileLevel>,
}

impl<L: RenderLayer> TileLayer<L> {
    pub fn new(areas: LayerController<L>, labels: L, grid: TileGridConfig) -> Self {
        let labels = LayerController::new(
            format!("{}-labels", areas.id()),
            labels,
            LayerOptions::passive(),
        );
        Self {
            areas,
            labels,
            grid,
            level: None,
        }
    }

    pub fn areas(&self) -> &LayerController<L> {
        &self.areas
    }

    pub fn labels(&self) -> &LayerController<L> {
        &self.labels
    }

    /// Level of the last redraw
    pub fn level(&self) -> Option<TileLevel> {
        self.level
    }

    /// Redraws the grid covering `bounds` at `level` (clamped to the
    /// configured range) and returns the drawn cell ids.
    pub fn redraw(&mut self, level: i64, bounds: &LatLngBounds) -> Vec<TileId> {
        let level = TileLevel::with_config(level, &self.grid);
        let cells = tiles_at(level, bounds);

        let (areas, labels): (Vec<_>, Vec<_>) =
            cells.iter().map(|cell| draw_cell(level, cell)).unzip();
        self.areas.redraw(areas);
        self.labels.redraw(labels);
        self.level = Some(level);

        cells.into_iter().map(|cell| cell.id).collect()
    }

    /// Redraws the grid for the current viewport of `view`
    pub fn redraw_for_view<V>(&mut self, view: &V) -> Vec<TileId>
    where
        V: MapView + ?Sized,
    {
        self.redraw(map_level(view.zoom()), &view.bounds())
    }

    pub fn selected<S: AsRef<str>>(&mut self, ids: &[S]) {
        self.areas.selected(ids);
    }

    /// Toggles events on the area layer; labels stay non-interactive
    pub fn set_enable(&mut self, enable: bool) {
        self.areas.set_enable(enable);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.areas.set_visible(visible);
        self.labels.set_visible(visible);
    }

    pub fn restore_event(&mut self) {
        self.areas.restore_event();
        self.labels.restore_event();
    }

    pub fn destroy(&mut self) {
        self.areas.destroy();
        self.labels.destroy();
        self.level = None;
    }

    pub async fn handle_hover(&self, event: &PointerEvent) -> HoverOutcome {
        self.areas.handle_hover(event).await
    }

    pub async fn handle_click(&self, event: PointerEvent) -> Option<ClickOutcome> {
        self.areas.handle_click(event).await
    }
}

/// Tile id carried by a clicked tile area
pub fn clicked_tile(subject: &ClickSubject) -> Option<String> {
    subject
        .geometry()
        .and_then(|geometry| geometry.data["tile_id"].as_str())
        .map(str::to_string)
}

fn draw_cell(level: TileLevel, cell: &TileCell) -> (Geometry, Geometry) {
    let tile_id = cell.id.to_string();
    let payload = json!({
        "tile_id": tile_id,
        "level": level.get(),
        "x": cell.id.x,
        "y": cell.id.y,
        "paths": cell.boundary,
    });

    let area = Geometry::polygon(tile_id.clone(), TILE_STYLE, cell.boundary.to_vec())
        .with_data(payload.clone());
    let label = Geometry::label(tile_id.clone(), TILE_LABEL_STYLE, cell.north_west(), tile_id)
        .with_data(payload);
    (area, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::{LatLng, Point},
        input::handler::FnHandler,
        layers::geometry::Shape,
        rendering::memory::{MemoryLayer, MemoryMapView},
    };

    fn tile_layer() -> TileLayer<MemoryLayer> {
        let areas = LayerController::new("tile-1", MemoryLayer::new(), LayerOptions::default())
            .with_handler(FnHandler::new());
        TileLayer::new(areas, MemoryLayer::new(), TileGridConfig::default())
    }

    fn bounds() -> LatLngBounds {
        LatLngBounds::from_coords(31.10, 121.30, 31.35, 121.65)
    }

    #[test]
    fn test_redraw_draws_area_and_label_per_cell() {
        let mut layer = tile_layer();
        let ids = layer.redraw(12, &bounds());

        assert!(!ids.is_empty());
        assert_eq!(layer.level().map(|l| l.get()), Some(12));
        assert_eq!(layer.areas().geometries().len(), ids.len());
        assert_eq!(layer.labels().geometries().len(), ids.len());

        let first = ids[0].to_string();
        let area = layer.areas().geometry(&first).unwrap();
        assert_eq!(area.base_key(), TILE_STYLE);
        assert_eq!(area.data["tile_id"], first.as_str());
        assert_eq!(area.data["level"], 12);

        let label = layer.labels().geometry(&first).unwrap();
        match (&area.shape, &label.shape) {
            (Shape::Polygon(ring), Shape::Label { position, content }) => {
                assert_eq!(ring.len(), 4);
                assert_eq!(*position, ring[0]);
                assert_eq!(content, &first);
            }
            other => panic!("unexpected shapes {:?}", other),
        }
    }

    #[test]
    fn test_redraw_clamps_level_and_replaces_grid() {
        let mut layer = tile_layer();
        layer.redraw(12, &bounds());
        let ids = layer.redraw(3, &bounds());

        assert!(ids.iter().all(|id| id.level == 7));
        assert_eq!(layer.areas().geometries().len(), ids.len());
    }

    #[test]
    fn test_labels_stay_passive() {
        let mut layer = tile_layer();
        layer.set_enable(false);
        layer.set_enable(true);

        assert!(layer.areas().layer().borrow().is_interactive());
        assert!(!layer.labels().layer().borrow().is_interactive());
    }

    #[test]
    fn test_redraw_for_view_uses_zoom() {
        let mut layer = tile_layer();
        let view = MemoryMapView::new(LatLng::new(31.2, 121.5), 13.4, Point::new(800.0, 600.0));

        let ids = layer.redraw_for_view(&view);
        assert!(ids.iter().all(|id| id.level == 13));
        assert!(ids
            .iter()
            .any(|id| TileCell::new(*id).contains(&LatLng::new(31.2, 121.5))));
    }

    #[tokio::test]
    async fn test_click_reports_tile_id() {
        let mut layer = tile_layer();
        let ids = layer.redraw(10, &bounds());
        let id = ids[0].to_string();

        let record = layer.areas().layer().borrow().geometry_by_id(&id).unwrap();
        let t0 = std::time::Instant::now();
        layer
            .areas()
            .handle_click_at(PointerEvent::over(record, LatLng::new(31.2, 121.5)), t0)
            .await;
        let outcome = layer
            .areas()
            .fire_due_clicks(t0 + std::time::Duration::from_millis(220))
            .await
            .unwrap();

        assert_eq!(clicked_tile(&outcome.resolution.subject), Some(id));
    }

    #[test]
    fn test_destroy_releases_both_layers() {
        let mut layer = tile_layer();
        layer.redraw(12, &bounds());
        layer.destroy();

        assert!(layer.areas().is_destroyed());
        assert!(layer.labels().is_destroyed());
        assert!(layer.level().is_none());
    }
}
