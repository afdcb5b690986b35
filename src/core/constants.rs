//! Engine-wide magic numbers kept in one place.

/// Earth radius used by the Haversine distance (meters, WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Window during which a second click turns the first into a double click.
pub const DOUBLE_CLICK_WINDOW_MS: u64 = 220;

/// Lowest tile level with a defined grid resolution.
pub const MIN_TILE_LEVEL: u8 = 7;

/// Highest tile level with a defined grid resolution.
pub const MAX_TILE_LEVEL: u8 = 15;

/// Zoom assumed when the engine cannot report one.
pub const DEFAULT_MAP_ZOOM: f64 = 13.0;

/// Distance between direction icons along a path (meters).
pub const ICON_INTERVAL_METERS: f64 = 30.0;

/// Icon headings are snapped to multiples of this many degrees.
pub const ANGLE_SLICE_DEGREES: u32 = 15;

/// Suffix of the hover style identifier.
pub const HOVER_SUFFIX: &str = "_hover";

/// Suffix of the selected style identifier.
pub const SELECTED_SUFFIX: &str = "_selected";

/// Square tile size in pixels used by the headless viewport.
pub const TILE_SIZE: u32 = 256;
