//! Encoding decisions over parsed geometry: operand selection, axis-order
//! normalization, and metric buffering for the DWithin fallback.

use super::{Coord, Geometry, GeometryOperand, wkt};
use crate::EARTH_MEAN_RADIUS_M;
use std::collections::BTreeSet;
use wfsq_model::version::AxisOrder;

/// Pick the most specific server-supported encoding for a geometry's shape,
/// falling back to the enclosing Envelope only when the exact shape is not
/// advertised. `None` means the server accepts neither: a capability gap the
/// compiler turns into the Invalid sentinel.
#[must_use]
pub fn choose_encoding(
    geometry: &Geometry,
    supported: &BTreeSet<GeometryOperand>,
) -> Option<GeometryOperand> {
    let exact = geometry.operand();
    if supported.contains(&exact) {
        return Some(exact);
    }

    if supported.contains(&GeometryOperand::Envelope) {
        return Some(GeometryOperand::Envelope);
    }

    None
}

/// Rewrite each coordinate pair of a WKT string into the configured axis
/// order. Each swap is its own inverse: applying this twice with the same
/// order restores the original pairing (for canonical-form input, the
/// original string).
pub fn normalize_axis_order(text: &str, order: AxisOrder) -> Result<String, wkt::WktError> {
    let geometry = wkt::parse(text)?;

    let normalized = match order {
        AxisOrder::LonLat => geometry,
        AxisOrder::LatLon => geometry.swap_axes(),
    };

    Ok(wkt::write(&normalized))
}

/// Buffer a geometry by a metric distance, approximated as degrees of
/// latitude on Earth's mean radius:
///
/// ```text
/// degrees = meters / 6_371_000 × 180 / π
/// ```
///
/// The result is the geometry's envelope expanded by that many degrees,
/// emitted as a polygon ring so shape-specific operand selection still
/// applies. Used only for the DWithin → Intersects fallback.
#[must_use]
pub fn buffer_by_meters(geometry: &Geometry, distance_meters: f64) -> Geometry {
    let degrees = meters_to_degrees(distance_meters);

    let (min, max) = geometry.bounds();
    let min = Coord::new(min.x - degrees, min.y - degrees);
    let max = Coord::new(max.x + degrees, max.y + degrees);

    Geometry::Polygon {
        shell: vec![
            min,
            Coord::new(max.x, min.y),
            max,
            Coord::new(min.x, max.y),
            min,
        ],
        holes: vec![],
    }
}

pub(crate) fn meters_to_degrees(distance_meters: f64) -> f64 {
    distance_meters / EARTH_MEAN_RADIUS_M * 180.0 / std::f64::consts::PI
}
