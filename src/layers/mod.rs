pub mod arrow;
pub mod controller;
pub mod geometry;
pub mod manager;
pub mod marker;
pub mod style;
pub mod surface;
pub mod tile;

pub use controller::{LayerController, LayerOptions};
pub use geometry::{Geometry, GeometryRecord, Shape};
pub use manager::LayerFactory;
pub use style::StyleState;
