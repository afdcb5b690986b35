//! Evenly spaced direction icons along a polyline.

use serde::{Deserialize, Serialize};

use crate::core::geo::LatLng;

/// Distance measure used to walk a path
pub trait PathMetric {
    fn distance(&self, a: &LatLng, b: &LatLng) -> f64;
}

/// Great-circle distance in meters
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl PathMetric for Haversine {
    fn distance(&self, a: &LatLng, b: &LatLng) -> f64 {
        a.distance_to(b)
    }
}

/// Euclidean distance in coordinate units, for projected or synthetic paths
#[derive(Debug, Clone, Copy, Default)]
pub struct Planar;

impl PathMetric for Planar {
    fn distance(&self, a: &LatLng, b: &LatLng) -> f64 {
        let dlat = b.lat - a.lat;
        let dlng = b.lng - a.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IconPlacement {
    pub position: LatLng,
    /// Degrees clockwise from east, in `[0, 360)`
    pub heading: f64,
}

/// Relative slack when comparing travelled distance with a target
const TARGET_TOLERANCE: f64 = 1e-9;

/// Heading from `from` to `to`: 0 is east, 90 south, 180 west, 270 north.
pub fn heading(from: &LatLng, to: &LatLng) -> f64 {
    let dx = to.lng - from.lng;
    let dy = to.lat - from.lat;
    let angle = (-dy.atan2(dx).to_degrees()).rem_euclid(360.0) + 0.0;
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}

/// Snaps `heading` to the nearest multiple of `slice` degrees, wrapping 360 to 0
pub fn quantize_heading(heading: f64, slice: u32) -> u32 {
    let slice = slice.max(1);
    let steps = (heading / slice as f64).round() as u32;
    (steps * slice) % 360
}

/// Icon positions every `interval` meters along `path`, the first one at
/// half an interval from the start.
pub fn place_icons(path: &[LatLng], interval: f64) -> Vec<IconPlacement> {
    place_icons_with(path, interval, &Haversine)
}

/// [`place_icons`] with an explicit distance measure
pub fn place_icons_with<M>(path: &[LatLng], interval: f64, metric: &M) -> Vec<IconPlacement>
where
    M: PathMetric + ?Sized,
{
    if path.len() < 2 || interval <= 0.0 || !interval.is_finite() {
        return Vec::new();
    }

    // targets sit at interval / 2 + k * interval; summed segment lengths may
    // fall a few ulps short of one that lies exactly on the path end
    let tolerance = interval * TARGET_TOLERANCE;
    let target = |k: usize| interval / 2.0 + k as f64 * interval;

    let mut placements = Vec::new();
    let mut travelled = 0.0;

    for segment in path.windows(2) {
        let (start, end) = (&segment[0], &segment[1]);
        let length = metric.distance(start, end);
        if length <= 0.0 || !length.is_finite() {
            continue;
        }
        let segment_heading = heading(start, end);

        loop {
            let next_target = target(placements.len());
            if travelled + length + tolerance < next_target {
                break;
            }
            let ratio = ((next_target - travelled) / length).clamp(0.0, 1.0);
            placements.push(IconPlacement {
                position: start.lerp(end, ratio),
                heading: segment_heading,
            });
        }

        travelled += length;
    }

    placements
}
