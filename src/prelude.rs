//! Prelude module for common maptools types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maptools::prelude::*;`

pub use crate::core::{
    config::{
        ClickTimingConfig, IconPlacementConfig, InteractionConfig, InteractionProfile,
        TileGridConfig,
    },
    geo::{LatLng, LatLngBounds, Point},
};

pub use crate::input::{
    click::{ClickKind, ClickResolution, ClickSubject},
    events::{PointerEvent, PropagationGuard, Verdict},
    handler::{ClickOutcome, FnHandler, LayerHandler},
    hover::HoverOutcome,
};

pub use crate::layers::{
    arrow::ArrowLayer,
    controller::{LayerController, LayerOptions},
    geometry::{Geometry, GeometryRecord, Shape},
    manager::LayerFactory,
    marker::MarkerLayer,
    style::StyleState,
    surface::SurfaceClicks,
    tile::TileLayer,
};

pub use crate::spatial::{
    polyline::{place_icons, IconPlacement, PathMetric},
    tiling::{compute_tiles, TileCell, TileId, TileLevel},
};

pub use crate::traits::{EngineError, MapView, RenderLayer};

pub use crate::{Error as MapError, Result};

pub use std::time::{Duration, Instant};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
