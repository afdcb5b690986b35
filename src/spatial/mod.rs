pub mod polyline;
pub mod tiling;

pub use polyline::{
    heading, place_icons, place_icons_with, quantize_heading, Haversine, IconPlacement,
    PathMetric, Planar,
};
pub use tiling::{compute_tiles, tile_level_for_zoom, tiles_at, TileCell, TileId, TileLevel};
