//! Viewport tiling into Web Mercator grid cells.
//!
//! Cells follow the slippy-map scheme: at level `z` the world is split into
//! `2^z × 2^z` cells, columns counted eastward from 180°W and rows southward
//! from the northern Mercator limit.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core::{
    config::TileGridConfig,
    constants::{DEFAULT_MAP_ZOOM, MAX_TILE_LEVEL, MIN_TILE_LEVEL},
    geo::{LatLng, LatLngBounds},
};

/// Slack used when testing a point against a cell boundary (degrees)
const EDGE_TOLERANCE: f64 = 1e-9;

/// A tile level inside the supported range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileLevel(u8);

impl TileLevel {
    /// Clamps `level` into 7..=15
    pub fn new(level: i64) -> Self {
        Self(level.clamp(MIN_TILE_LEVEL as i64, MAX_TILE_LEVEL as i64) as u8)
    }

    /// Clamps `level` into the configured range, itself kept inside 7..=15
    pub fn with_config(level: i64, config: &TileGridConfig) -> Self {
        let min = Self::new(config.min_level as i64).get() as i64;
        let max = Self::new(config.max_level as i64).get() as i64;
        Self(level.min(max).max(min) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Cells per row (and per column) at this level
    pub fn span(&self) -> u32 {
        1u32 << self.0
    }
}

impl From<u8> for TileLevel {
    fn from(level: u8) -> Self {
        Self::new(level as i64)
    }
}

/// Map level for `zoom`: rounded to the nearest integer, 13 when unknown
pub fn map_level(zoom: Option<f64>) -> i64 {
    zoom.filter(|z| z.is_finite())
        .unwrap_or(DEFAULT_MAP_ZOOM)
        .round() as i64
}

/// Tile level for the current map zoom
pub fn tile_level_for_zoom(zoom: Option<f64>) -> TileLevel {
    TileLevel::new(map_level(zoom))
}

/// Identifier of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    pub level: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(level: TileLevel, x: u32, y: u32) -> Self {
        let max = level.span() - 1;
        Self {
            level: level.get(),
            x: x.min(max),
            y: y.min(max),
        }
    }

    /// Cell containing `lat_lng`; points on the antimeridian or beyond the
    /// Mercator limit fall into the outermost cell.
    pub fn from_lat_lng(lat_lng: &LatLng, level: TileLevel) -> Self {
        let n = level.span() as f64;
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let lng = lat_lng.lng.clamp(-180.0, 180.0);

        let x = ((lng + 180.0) / 360.0 * n).floor().max(0.0) as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor().max(0.0) as u32;

        Self::new(level, x, y)
    }

    /// Packs level, column and row into one integer
    pub fn as_u64(&self) -> u64 {
        ((self.level as u64) << 48) | ((self.x as u64) << 24) | self.y as u64
    }

    /// North-west corner of the cell
    fn corner(level: u8, x: u32, y: u32) -> LatLng {
        let n = 2_f64.powi(level as i32);
        let lng = x as f64 / n * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    pub fn bounds(&self) -> LatLngBounds {
        let nw = Self::corner(self.level, self.x, self.y);
        let se = Self::corner(self.level, self.x + 1, self.y + 1);
        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.level, self.x, self.y)
    }
}

/// A grid cell with its boundary ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileCell {
    pub id: TileId,
    /// Corners in order NW, NE, SE, SW; the ring closes back to NW
    pub boundary: [LatLng; 4],
}

impl TileCell {
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            boundary: id.bounds().corners(),
        }
    }

    pub fn north_west(&self) -> LatLng {
        self.boundary[0]
    }

    /// Closed-boundary containment test
    pub fn contains(&self, point: &LatLng) -> bool {
        let [nw, _, se, _] = self.boundary;
        point.lat >= se.lat - EDGE_TOLERANCE
            && point.lat <= nw.lat + EDGE_TOLERANCE
            && point.lng >= nw.lng - EDGE_TOLERANCE
            && point.lng <= se.lng + EDGE_TOLERANCE
    }
}

/// Every cell at `level` (clamped to 7..=15) touching `bounds`.
///
/// Cells come row by row from north to south, west to east within a row.
pub fn compute_tiles(level: u8, bounds: &LatLngBounds) -> Vec<TileCell> {
    tiles_at(TileLevel::from(level), bounds)
}

/// [`compute_tiles`] for an already clamped level
pub fn tiles_at(level: TileLevel, bounds: &LatLngBounds) -> Vec<TileCell> {
    let bounds = bounds.normalized();
    let north_west = LatLng::new(bounds.north_east.lat, bounds.south_west.lng);
    let south_east = LatLng::new(bounds.south_west.lat, bounds.north_east.lng);

    let first = TileId::from_lat_lng(&north_west, level);
    let last = TileId::from_lat_lng(&south_east, level);

    let mut cells =
        Vec::with_capacity(((last.x - first.x + 1) * (last.y - first.y + 1)) as usize);
    for y in first.y..=last.y {
        for x in first.x..=last.x {
            cells.push(TileCell::new(TileId::new(level, x, y)));
        }
    }

    log::debug!(
        "tiled level {} into {} cells ({}..={}, {}..={})",
        level.get(),
        cells.len(),
        first.x,
        last.x,
        first.y,
        last.y
    );
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shanghai() -> LatLngBounds {
        LatLngBounds::from_coords(31.10, 121.30, 31.35, 121.65)
    }

    #[test]
    fn test_level_clamping() {
        assert_eq!(TileLevel::new(3).get(), 7);
        assert_eq!(TileLevel::new(20).get(), 15);
        assert_eq!(TileLevel::new(11).get(), 11);
        assert_eq!(tile_level_for_zoom(Some(12.6)).get(), 13);
        assert_eq!(tile_level_for_zoom(Some(2.0)).get(), 7);
        assert_eq!(tile_level_for_zoom(None).get(), 13);
    }

    #[test]
    fn test_tile_id_from_lat_lng() {
        // Greenwich at level 7 sits just east of the central meridian
        let id = TileId::from_lat_lng(&LatLng::new(51.4779, 0.0), TileLevel::new(7));
        assert_eq!(id.x, 64);
        assert_eq!(id.y, 42);
        assert_eq!(id.to_string(), "7_64_42");
        assert_eq!(id.as_u64(), (7u64 << 48) | (64u64 << 24) | 42);

        let edge = TileId::from_lat_lng(&LatLng::new(-89.0, 180.0), TileLevel::new(7));
        assert_eq!(edge.x, 127);
        assert_eq!(edge.y, 127);
    }

    #[test]
    fn test_cell_boundary_is_ordered_ring() {
        let cell = TileCell::new(TileId::from_lat_lng(&LatLng::new(31.2, 121.5), TileLevel::new(10)));
        let [nw, ne, se, sw] = cell.boundary;

        assert_eq!(nw.lat, ne.lat);
        assert_eq!(sw.lat, se.lat);
        assert_eq!(nw.lng, sw.lng);
        assert_eq!(ne.lng, se.lng);
        assert!(nw.lat > sw.lat);
        assert!(ne.lng > nw.lng);
        assert!(cell.contains(&LatLng::new(31.2, 121.5)));
    }

    #[test]
    fn test_compute_tiles_is_deterministic() {
        let first = compute_tiles(12, &shanghai());
        let second = compute_tiles(12, &shanghai());
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_tiles_covers_bounds() {
        let bounds = shanghai();
        let cells = compute_tiles(13, &bounds);

        for i in 0..=20 {
            for j in 0..=20 {
                let lat = bounds.south_west.lat
                    + (bounds.north_east.lat - bounds.south_west.lat) * i as f64 / 20.0;
                let lng = bounds.south_west.lng
                    + (bounds.north_east.lng - bounds.south_west.lng) * j as f64 / 20.0;
                let point = LatLng::new(lat, lng);
                assert!(
                    cells.iter().any(|cell| cell.contains(&point)),
                    "{:?} not covered",
                    point
                );
            }
        }
    }

    #[test]
    fn test_compute_tiles_order_and_level_clamp() {
        let cells = compute_tiles(30, &shanghai());
        assert!(cells.iter().all(|cell| cell.id.level == 15));

        for pair in cells.windows(2) {
            let (a, b) = (pair[0].id, pair[1].id);
            assert!((a.y, a.x) < (b.y, b.x));
        }
        assert!(cells[0].north_west().lat >= cells[cells.len() - 1].north_west().lat);
    }

    #[test]
    fn test_point_bounds_yield_single_cell() {
        let point = LatLng::new(31.2, 121.5);
        let cells = compute_tiles(9, &LatLngBounds::new(point, point));
        assert_eq!(cells.len(), 1);
        assert!(cells[0].contains(&point));
    }
}
