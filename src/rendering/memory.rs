//! Headless in-process engine.
//!
//! [`MemoryLayer`] keeps records in insertion order and logs every mutation so
//! callers can see exactly what was pushed to the engine. [`MemoryMapView`]
//! is a Web Mercator viewport without any drawing.

use std::f64::consts::PI;

use crate::{
    core::{
        constants::TILE_SIZE,
        geo::{LatLng, LatLngBounds, Point},
    },
    layers::geometry::GeometryRecord,
    traits::{EngineError, EngineResult, MapView, RenderLayer},
};

/// A mutation observed by a [`MemoryLayer`]
#[derive(Debug, Clone, PartialEq)]
pub enum LayerOp {
    Add(Vec<String>),
    Set(Vec<String>),
    Update(Vec<String>),
    Remove(Vec<String>),
    Interactive(bool),
    Visible(bool),
    Destroy,
}

#[derive(Debug, Default)]
pub struct MemoryLayer {
    records: Vec<GeometryRecord>,
    interactive: bool,
    visible: bool,
    destroyed: bool,
    ops: Vec<LayerOp>,
}

impl MemoryLayer {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            interactive: true,
            visible: true,
            destroyed: false,
            ops: Vec::new(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Style identifier of `id`, if present
    pub fn style_of(&self, id: &str) -> Option<String> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.style_id.clone())
    }

    /// Every mutation since creation (or since [`MemoryLayer::take_ops`])
    pub fn ops(&self) -> &[LayerOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<LayerOp> {
        std::mem::take(&mut self.ops)
    }

    fn ensure_alive(&self) -> EngineResult<()> {
        if self.destroyed {
            Err(EngineError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn upsert(&mut self, record: GeometryRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
    }
}

fn ids_of(items: &[GeometryRecord]) -> Vec<String> {
    items.iter().map(|record| record.id.clone()).collect()
}

impl RenderLayer for MemoryLayer {
    fn add_geometries(&mut self, items: Vec<GeometryRecord>) -> EngineResult<()> {
        self.ensure_alive()?;
        self.ops.push(LayerOp::Add(ids_of(&items)));
        for record in items {
            self.upsert(record);
        }
        Ok(())
    }

    fn set_geometries(&mut self, items: Vec<GeometryRecord>) -> EngineResult<()> {
        self.ensure_alive()?;
        self.ops.push(LayerOp::Set(ids_of(&items)));
        self.records.clear();
        for record in items {
            self.upsert(record);
        }
        Ok(())
    }

    fn update_geometries(&mut self, items: Vec<GeometryRecord>) -> EngineResult<()> {
        self.ensure_alive()?;
        self.ops.push(LayerOp::Update(ids_of(&items)));
        for record in items {
            self.upsert(record);
        }
        Ok(())
    }

    fn remove_geometries(&mut self, ids: &[String]) -> EngineResult<()> {
        self.ensure_alive()?;
        self.ops.push(LayerOp::Remove(ids.to_vec()));
        self.records.retain(|record| !ids.contains(&record.id));
        Ok(())
    }

    fn geometry_by_id(&self, id: &str) -> Option<GeometryRecord> {
        if self.destroyed {
            return None;
        }
        self.records.iter().find(|record| record.id == id).cloned()
    }

    fn geometries(&self) -> Vec<GeometryRecord> {
        if self.destroyed {
            return Vec::new();
        }
        self.records.clone()
    }

    fn set_interactive_disable(&mut self, disabled: bool) -> EngineResult<()> {
        self.ensure_alive()?;
        self.ops.push(LayerOp::Interactive(!disabled));
        self.interactive = !disabled;
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> EngineResult<()> {
        self.ensure_alive()?;
        self.ops.push(LayerOp::Visible(visible));
        self.visible = visible;
        Ok(())
    }

    fn destroy(&mut self) -> EngineResult<()> {
        self.ensure_alive()?;
        self.ops.push(LayerOp::Destroy);
        self.records.clear();
        self.destroyed = true;
        Ok(())
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Viewport of a headless map
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMapView {
    pub center: LatLng,
    pub zoom: Option<f64>,
    /// Container size in pixels
    pub size: Point,
}

impl MemoryMapView {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: Some(zoom),
            size,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(self.zoom.unwrap_or(0.0))
    }

    /// Projects to world pixel coordinates (EPSG:3857)
    fn project(&self, lat_lng: &LatLng) -> Point {
        let scale = self.world_size();
        let lat = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * scale;
        Point::new(x, y)
    }

    fn unproject(&self, pixel: &Point) -> LatLng {
        let scale = self.world_size();
        let lng = pixel.x / scale * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * pixel.y / scale)).sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    fn pixel_origin(&self) -> Point {
        let center = self.project(&self.center);
        Point::new(center.x - self.size.x / 2.0, center.y - self.size.y / 2.0)
    }
}

impl MapView for MemoryMapView {
    fn zoom(&self) -> Option<f64> {
        self.zoom
    }

    fn bounds(&self) -> LatLngBounds {
        let nw = self.screen_to_geo(Point::new(0.0, 0.0));
        let se = self.screen_to_geo(self.size);
        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    fn screen_to_geo(&self, point: Point) -> LatLng {
        let origin = self.pixel_origin();
        self.unproject(&Point::new(point.x + origin.x, point.y + origin.y))
    }

    fn geo_to_screen(&self, lat_lng: LatLng) -> Point {
        let origin = self.pixel_origin();
        let world = self.project(&lat_lng);
        Point::new(world.x - origin.x, world.y - origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::geometry::Geometry;

    fn record(id: &str) -> GeometryRecord {
        Geometry::point(id, "dot", LatLng::default()).to_record()
    }

    #[test]
    fn test_update_upserts_by_id() {
        let mut layer = MemoryLayer::new();
        layer.set_geometries(vec![record("a"), record("b")]).unwrap();

        let mut changed = record("a");
        changed.style_id = "dot_hover".to_string();
        layer.update_geometries(vec![changed, record("c")]).unwrap();

        let ids: Vec<_> = layer.geometries().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(layer.style_of("a").as_deref(), Some("dot_hover"));
    }

    #[test]
    fn test_destroyed_layer_rejects_mutation() {
        let mut layer = MemoryLayer::new();
        layer.set_geometries(vec![record("a")]).unwrap();
        layer.destroy().unwrap();

        assert!(layer.is_destroyed());
        assert!(layer.geometry_by_id("a").is_none());
        assert_eq!(
            layer.set_geometries(vec![record("b")]),
            Err(EngineError::Destroyed)
        );
        assert_eq!(layer.destroy(), Err(EngineError::Destroyed));
    }

    #[test]
    fn test_view_round_trip() {
        let view = MemoryMapView::new(LatLng::new(31.23, 121.47), 12.0, Point::new(800.0, 600.0));

        let center = view.geo_to_screen(view.center);
        assert!((center.x - 400.0).abs() < 1e-6);
        assert!((center.y - 300.0).abs() < 1e-6);

        let back = view.screen_to_geo(Point::new(120.0, 80.0));
        let again = view.geo_to_screen(back);
        assert!((again.x - 120.0).abs() < 1e-6);
        assert!((again.y - 80.0).abs() < 1e-6);

        let bounds = view.bounds();
        assert!(bounds.contains(&view.center));
        assert!(bounds.south_west.lat < bounds.north_east.lat);
    }
}
