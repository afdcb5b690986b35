//! # maptools
//!
//! Interaction layers that sit on top of an external vector-map engine.
//!
//! The engine owns geometry storage, projection and hit-testing; this crate
//! owns what happens when the pointer touches a geometry: telling a click from
//! a double click, hover highlighting, selection styling, and the two placement
//! algorithms used to build geometry sets (viewport tile grids and direction
//! icons along polylines).

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::InteractionConfig,
    geo::{LatLng, LatLngBounds, Point},
};

pub use crate::input::{
    click::{ClickDisambiguator, ClickKind, ClickResolution, ClickSubject},
    events::{PointerEvent, PropagationGuard, Verdict},
    handler::{ClickOutcome, FnHandler, LayerHandler},
    hover::{HoverOutcome, HoverTracker},
};

pub use crate::layers::{
    arrow::ArrowLayer,
    controller::{LayerController, LayerOptions},
    geometry::{Geometry, GeometryProperties, GeometryRecord, Shape},
    manager::LayerFactory,
    marker::MarkerLayer,
    style::{classify, derive_style, StyleState},
    surface::SurfaceClicks,
    tile::TileLayer,
};

pub use crate::spatial::{
    polyline::{place_icons, place_icons_with, Haversine, IconPlacement, PathMetric, Planar},
    tiling::{compute_tiles, tile_level_for_zoom, TileCell, TileId, TileLevel},
};

pub use crate::traits::{EngineError, MapView, RenderLayer};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
