//! Geometry codec: WKT parsing and writing, operand encoding selection,
//! axis-order normalization, and metric buffering.
//!
//! This module does not touch capabilities directly; the predicate compiler
//! hands in the advertised operand set where a choice has to be made.

pub(crate) mod codec;
pub(crate) mod wkt;

pub use codec::{buffer_by_meters, choose_encoding, normalize_axis_order};
pub use wkt::WktError;

///
/// Coord
///
/// One x/y coordinate pair. WKT input is always x/y (lon/lat); axis-order
/// normalization swaps pairs on the way out when the server expects lat/lon.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The same pair with axes swapped. Its own inverse.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

///
/// Geometry
///
/// The geometry shapes the engine translates. Envelope appears only as an
/// encoding fallback and as the BBox operand; WKT input carries the three
/// concrete shapes.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon {
        shell: Vec<Coord>,
        holes: Vec<Vec<Coord>>,
    },
    Envelope {
        min: Coord,
        max: Coord,
    },
}

impl Geometry {
    /// Parse WKT text. Malformed input is a hard parse error, never a
    /// capability gap.
    pub fn from_wkt(text: &str) -> Result<Self, WktError> {
        wkt::parse(text)
    }

    /// Deterministic WKT rendering of this geometry.
    #[must_use]
    pub fn to_wkt(&self) -> String {
        wkt::write(self)
    }

    /// The enclosing axis-aligned envelope.
    #[must_use]
    pub fn envelope(&self) -> Self {
        let (min, max) = self.bounds();
        Self::Envelope { min, max }
    }

    /// Min/max corners of the enclosing envelope.
    pub(crate) fn bounds(&self) -> (Coord, Coord) {
        let mut coords = self.coords();
        let Some(first) = coords.next() else {
            // parsed geometry always carries at least one coordinate
            return (Coord::new(0.0, 0.0), Coord::new(0.0, 0.0));
        };

        let mut min = first;
        let mut max = first;
        for coord in coords {
            min = Coord::new(min.x.min(coord.x), min.y.min(coord.y));
            max = Coord::new(max.x.max(coord.x), max.y.max(coord.y));
        }

        (min, max)
    }

    /// The same geometry with every coordinate pair swapped. Its own inverse.
    #[must_use]
    pub fn swap_axes(&self) -> Self {
        match self {
            Self::Point(coord) => Self::Point(coord.swapped()),
            Self::LineString(coords) => {
                Self::LineString(coords.iter().map(|coord| coord.swapped()).collect())
            }
            Self::Polygon { shell, holes } => Self::Polygon {
                shell: shell.iter().map(|coord| coord.swapped()).collect(),
                holes: holes
                    .iter()
                    .map(|ring| ring.iter().map(|coord| coord.swapped()).collect())
                    .collect(),
            },
            Self::Envelope { min, max } => Self::Envelope {
                min: min.swapped(),
                max: max.swapped(),
            },
        }
    }

    /// The shape-specific operand kind for this geometry.
    #[must_use]
    pub const fn operand(&self) -> GeometryOperand {
        match self {
            Self::Point(_) => GeometryOperand::Point,
            Self::LineString(_) => GeometryOperand::LineString,
            Self::Polygon { .. } => GeometryOperand::Polygon,
            Self::Envelope { .. } => GeometryOperand::Envelope,
        }
    }

    fn coords(&self) -> Box<dyn Iterator<Item = Coord> + '_> {
        match self {
            Self::Point(coord) => Box::new(std::iter::once(*coord)),
            Self::LineString(coords) => Box::new(coords.iter().copied()),
            Self::Polygon { shell, holes } => Box::new(
                shell
                    .iter()
                    .copied()
                    .chain(holes.iter().flat_map(|ring| ring.iter().copied())),
            ),
            Self::Envelope { min, max } => Box::new([*min, *max].into_iter()),
        }
    }
}

///
/// GeometryOperand
///
/// Server-advertised geometry operand kinds, parsed from capability operand
/// names such as `gml:Envelope`.
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum GeometryOperand {
    Envelope,
    LineString,
    Point,
    Polygon,
}

impl GeometryOperand {
    /// Map a capability-document operand name to an operand kind.
    #[must_use]
    pub fn from_capability_name(name: &str) -> Option<Self> {
        let bare = name.rsplit_once(':').map_or(name, |(_, local)| local);

        match bare {
            "Envelope" | "Box" => Some(Self::Envelope),
            "LineString" => Some(Self::LineString),
            "Point" => Some(Self::Point),
            "Polygon" => Some(Self::Polygon),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_spans_all_rings_of_a_polygon() {
        let polygon = Geometry::Polygon {
            shell: vec![
                Coord::new(0.0, 0.0),
                Coord::new(4.0, 0.0),
                Coord::new(4.0, 3.0),
                Coord::new(0.0, 3.0),
                Coord::new(0.0, 0.0),
            ],
            holes: vec![],
        };

        assert_eq!(
            polygon.envelope(),
            Geometry::Envelope {
                min: Coord::new(0.0, 0.0),
                max: Coord::new(4.0, 3.0),
            }
        );
    }

    #[test]
    fn swap_axes_is_its_own_inverse() {
        let line = Geometry::LineString(vec![Coord::new(1.5, -2.0), Coord::new(3.0, 4.0)]);

        assert_ne!(line.swap_axes(), line);
        assert_eq!(line.swap_axes().swap_axes(), line);
    }

    #[test]
    fn operand_names_accept_qualified_forms() {
        assert_eq!(
            GeometryOperand::from_capability_name("gml:Envelope"),
            Some(GeometryOperand::Envelope)
        );
        assert_eq!(
            GeometryOperand::from_capability_name("Point"),
            Some(GeometryOperand::Point)
        );
        assert_eq!(GeometryOperand::from_capability_name("gml:Solid"), None);
    }
}
