//! Capability surface of the external render engine.
//!
//! A [`RenderLayer`] is one geometry collection inside the engine (a marker
//! layer, a polyline layer, ...). A [`MapView`] is the map instance itself,
//! queried for the viewport and for coordinate conversion.

use crate::{
    core::geo::{LatLng, LatLngBounds, Point},
    layers::geometry::GeometryRecord,
};

/// Failures reported by an engine resource
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("layer resource has been destroyed")]
    Destroyed,
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Drops an engine failure after logging it; interaction code treats a dead
/// or incomplete engine resource as a no-op.
pub(crate) fn absorb(result: EngineResult<()>, what: &str) {
    if let Err(e) = result {
        log::debug!("{} ignored: {}", what, e);
    }
}

/// One geometry collection inside the render engine
pub trait RenderLayer {
    /// Inserts records, replacing any with the same id
    fn add_geometries(&mut self, items: Vec<GeometryRecord>) -> EngineResult<()>;

    /// Replaces the whole collection
    fn set_geometries(&mut self, items: Vec<GeometryRecord>) -> EngineResult<()>;

    /// Patches records in place by id; unknown ids are inserted
    fn update_geometries(&mut self, items: Vec<GeometryRecord>) -> EngineResult<()>;

    /// Removes records by id; unknown ids are ignored
    fn remove_geometries(&mut self, ids: &[String]) -> EngineResult<()>;

    fn geometry_by_id(&self, id: &str) -> Option<GeometryRecord>;

    /// Current collection in insertion order
    fn geometries(&self) -> Vec<GeometryRecord>;

    /// Stops (`true`) or resumes pointer-event delivery for this layer
    fn set_interactive_disable(&mut self, disabled: bool) -> EngineResult<()>;

    fn set_visible(&mut self, visible: bool) -> EngineResult<()>;

    /// Releases the engine resource; later calls report [`EngineError::Destroyed`]
    fn destroy(&mut self) -> EngineResult<()>;

    fn is_destroyed(&self) -> bool;
}

/// Map-level queries
pub trait MapView {
    /// Current zoom; engines without a settled zoom may return `None`
    fn zoom(&self) -> Option<f64>;

    fn bounds(&self) -> LatLngBounds;

    fn screen_to_geo(&self, point: Point) -> LatLng;

    fn geo_to_screen(&self, lat_lng: LatLng) -> Point;
}
