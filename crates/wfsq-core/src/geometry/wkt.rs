//! Hand-rolled WKT codec over the shape subset the engine translates.
//!
//! The grammar is small and closed, so the codec is a plain scanner rather
//! than a parser framework. The writer is deterministic: shortest float
//! round-trip form, single spaces, comma-space separators.

use super::{Coord, Geometry};
use std::fmt::Write;
use thiserror::Error as ThisError;

///
/// WktError
///
/// Malformed WKT is bad caller input: a hard error, never downgraded to a
/// capability gap.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum WktError {
    #[error("malformed WKT at byte {at}: expected {expected}")]
    Malformed { at: usize, expected: &'static str },

    #[error("WKT geometry type '{keyword}' is not supported")]
    UnsupportedType { keyword: String },
}

pub(crate) fn parse(text: &str) -> Result<Geometry, WktError> {
    let mut scanner = Scanner::new(text);

    let keyword = scanner.keyword()?;
    let geometry = match keyword.to_ascii_uppercase().as_str() {
        "POINT" => {
            let ring = scanner.coord_list()?;
            match ring.as_slice() {
                [coord] => Geometry::Point(*coord),
                _ => {
                    return Err(scanner.malformed("a single coordinate pair"));
                }
            }
        }
        "LINESTRING" => {
            let coords = scanner.coord_list()?;
            if coords.len() < 2 {
                return Err(scanner.malformed("at least two coordinate pairs"));
            }
            Geometry::LineString(coords)
        }
        "POLYGON" => {
            let mut rings = scanner.ring_list()?;
            let shell = rings.remove(0);
            Geometry::Polygon {
                shell,
                holes: rings,
            }
        }
        "MULTIPOINT" | "MULTILINESTRING" | "MULTIPOLYGON" | "GEOMETRYCOLLECTION" => {
            return Err(WktError::UnsupportedType { keyword });
        }
        _ => {
            return Err(scanner.malformed("a geometry keyword"));
        }
    };

    scanner.finish()?;
    Ok(geometry)
}

pub(crate) fn write(geometry: &Geometry) -> String {
    let mut out = String::new();

    match geometry {
        Geometry::Point(coord) => {
            out.push_str("POINT (");
            write_coord(&mut out, *coord);
            out.push(')');
        }
        Geometry::LineString(coords) => {
            out.push_str("LINESTRING ");
            write_ring(&mut out, coords);
        }
        Geometry::Polygon { shell, holes } => {
            out.push_str("POLYGON (");
            write_ring(&mut out, shell);
            for hole in holes {
                out.push_str(", ");
                write_ring(&mut out, hole);
            }
            out.push(')');
        }
        // Envelope has no WKT form of its own; render the rectangle.
        Geometry::Envelope { min, max } => {
            let ring = vec![
                *min,
                Coord::new(max.x, min.y),
                *max,
                Coord::new(min.x, max.y),
                *min,
            ];
            out.push_str("POLYGON (");
            write_ring(&mut out, &ring);
            out.push(')');
        }
    }

    out
}

fn write_ring(out: &mut String, coords: &[Coord]) {
    out.push('(');
    for (idx, coord) in coords.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        write_coord(out, *coord);
    }
    out.push(')');
}

fn write_coord(out: &mut String, coord: Coord) {
    // f64 Display is the shortest round-trip form, which keeps output stable.
    let _ = write!(out, "{} {}", coord.x, coord.y);
}

///
/// Scanner
///

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn malformed(&self, expected: &'static str) -> WktError {
        WktError::Malformed {
            at: self.pos,
            expected,
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.text[self.pos..].chars().next()
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), WktError> {
        if self.peek() == Some(wanted) {
            self.pos += wanted.len_utf8();
            Ok(())
        } else {
            Err(self.malformed(expected))
        }
    }

    fn keyword(&mut self) -> Result<String, WktError> {
        self.skip_ws();
        let rest = &self.text[self.pos..];
        let end = rest
            .find(|ch: char| !ch.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.malformed("a geometry keyword"));
        }

        self.pos += end;
        Ok(rest[..end].to_string())
    }

    fn number(&mut self) -> Result<f64, WktError> {
        self.skip_ws();
        let rest = &self.text[self.pos..];
        let end = rest
            .find(|ch: char| !matches!(ch, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
            .unwrap_or(rest.len());

        let token = &rest[..end];
        let value: f64 = token.parse().map_err(|_| self.malformed("a number"))?;
        if !value.is_finite() {
            return Err(self.malformed("a finite number"));
        }

        self.pos += end;
        Ok(value)
    }

    fn coord(&mut self) -> Result<Coord, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Coord::new(x, y))
    }

    /// `( x y, x y, ... )`
    fn coord_list(&mut self) -> Result<Vec<Coord>, WktError> {
        self.expect('(', "'('")?;

        let mut coords = vec![self.coord()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            coords.push(self.coord()?);
        }

        self.expect(')', "')'")?;
        Ok(coords)
    }

    /// `( ring, ring, ... )` where each ring is a closed coordinate list.
    fn ring_list(&mut self) -> Result<Vec<Vec<Coord>>, WktError> {
        self.expect('(', "'('")?;

        let mut rings = vec![self.ring()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            rings.push(self.ring()?);
        }

        self.expect(')', "')'")?;
        Ok(rings)
    }

    fn ring(&mut self) -> Result<Vec<Coord>, WktError> {
        let coords = self.coord_list()?;
        if coords.len() < 4 || coords.first() != coords.last() {
            return Err(self.malformed("a closed ring of at least four coordinates"));
        }
        Ok(coords)
    }

    fn finish(&mut self) -> Result<(), WktError> {
        if self.peek().is_some() {
            return Err(self.malformed("end of input"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_round_trips_byte_stable() {
        let wkt = "POINT (10.5 -3.25)";
        let geometry = parse(wkt).expect("point parses");

        assert_eq!(geometry, Geometry::Point(Coord::new(10.5, -3.25)));
        assert_eq!(write(&geometry), wkt);
    }

    #[test]
    fn polygon_with_hole_round_trips() {
        let wkt = "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 4 2, 4 4, 2 2))";
        let geometry = parse(wkt).expect("polygon parses");
        assert_eq!(write(&geometry), wkt);
    }

    #[test]
    fn keywords_are_case_insensitive_and_whitespace_tolerant() {
        let geometry = parse("  point( 1   2 ) ").expect("lax input parses");
        assert_eq!(geometry, Geometry::Point(Coord::new(1.0, 2.0)));
    }

    #[test]
    fn malformed_input_is_a_hard_error() {
        assert!(matches!(
            parse("POINT (1)"),
            Err(WktError::Malformed { .. })
        ));
        assert!(matches!(
            parse("LINESTRING (1 2)"),
            Err(WktError::Malformed { .. })
        ));
        assert!(matches!(
            parse("POLYGON ((0 0, 1 0, 1 1))"),
            Err(WktError::Malformed { .. })
        ));
        assert!(matches!(parse("POINT (1 2) x"), Err(WktError::Malformed { .. })));
        assert!(matches!(parse(""), Err(WktError::Malformed { .. })));
    }

    #[test]
    fn multi_geometries_are_rejected_as_unsupported() {
        assert_eq!(
            parse("MULTIPOINT ((1 2))"),
            Err(WktError::UnsupportedType {
                keyword: "MULTIPOINT".to_string()
            })
        );
    }
}
