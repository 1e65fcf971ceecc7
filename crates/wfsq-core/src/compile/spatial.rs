//! Spatial lowering: native operators first, then the documented fallback
//! chain for each predicate kind.

use super::{
    CompileError, FilterCompiler,
    compiled::{CompiledFilter, CompiledNode, EncodedGeometry, LogicalNode, SpatialNode},
};
use crate::{
    geometry::{Geometry, GeometryOperand, buffer_by_meters, choose_encoding},
    resolve::{Resolution, resolve},
};
use tracing::debug;
use wfsq_model::{
    filter::{SpatialFilter, SpatialOp},
    version::AxisOrder,
};

pub(super) fn compile(
    cx: &FilterCompiler<'_>,
    filter: &SpatialFilter,
) -> Result<CompiledFilter, CompileError> {
    if let Some(meters) = filter.distance_meters
        && meters < 0.0
    {
        return Err(CompileError::NegativeDistance { meters });
    }
    if matches!(filter.op, SpatialOp::DWithin | SpatialOp::Beyond)
        && filter.distance_meters.is_none()
    {
        return Err(CompileError::MissingDistance {
            property: filter.property.name().to_string(),
        });
    }

    // malformed WKT is bad caller input, never a capability gap
    let geometry = Geometry::from_wkt(&filter.wkt)?;
    let geometry = match cx.config.effective_axis_order() {
        AxisOrder::LonLat => geometry,
        AxisOrder::LatLon => geometry.swap_axes(),
    };

    match resolve(cx.schema, &filter.property)? {
        Resolution::ContentType => Ok(CompiledFilter::Empty),
        Resolution::Identifier | Resolution::Unknown => Ok(CompiledFilter::Invalid),
        Resolution::Concrete(name) => Ok(lower(cx, filter, &name, &geometry)),
        Resolution::Expanded(names) => {
            if names.is_empty() {
                debug!(property = filter.property.name(), "wildcard expanded to nothing");
                return Ok(CompiledFilter::Invalid);
            }

            let mut parts = Vec::with_capacity(names.len());
            for name in &names {
                parts.push(lower(cx, filter, name, &geometry));
            }

            if parts.len() == 1 {
                return Ok(parts.remove(0));
            }
            cx.or(parts)
        }
    }
}

// One predicate kind, one fallback chain. The chain is closed: when nothing
// in it is advertised the predicate is Invalid, never an error.
fn lower(
    cx: &FilterCompiler<'_>,
    filter: &SpatialFilter,
    property: &str,
    geometry: &Geometry,
) -> CompiledFilter {
    let distance = filter.distance_meters;

    let node = match filter.op {
        SpatialOp::Beyond => native(cx, SpatialOp::Beyond, property, geometry, distance)
            .or_else(|| negated(native(cx, SpatialOp::DWithin, property, geometry, distance))),
        SpatialOp::Contains => native(cx, SpatialOp::Contains, property, geometry, None)
            .or_else(|| negated(native(cx, SpatialOp::Within, property, geometry, None))),
        SpatialOp::Disjoint => native(cx, SpatialOp::Disjoint, property, geometry, None)
            .or_else(|| negated(native(cx, SpatialOp::BBox, property, geometry, None)))
            .or_else(|| negated(native(cx, SpatialOp::Intersects, property, geometry, None))),
        SpatialOp::DWithin => native(cx, SpatialOp::DWithin, property, geometry, distance)
            .or_else(|| negated(native(cx, SpatialOp::Beyond, property, geometry, distance)))
            .or_else(|| {
                let meters = distance?;
                let buffered = buffer_by_meters(geometry, meters);
                native(cx, SpatialOp::Intersects, property, &buffered, None)
            }),
        SpatialOp::Intersects => native(cx, SpatialOp::Intersects, property, geometry, None)
            .or_else(|| native(cx, SpatialOp::BBox, property, geometry, None))
            .or_else(|| negated(native(cx, SpatialOp::Disjoint, property, geometry, None))),
        SpatialOp::Within => native(cx, SpatialOp::Within, property, geometry, None)
            .or_else(|| native(cx, SpatialOp::Contains, property, geometry, None)),
        SpatialOp::BBox | SpatialOp::Crosses | SpatialOp::Overlaps | SpatialOp::Touches => {
            native(cx, filter.op, property, geometry, None)
        }
    };

    match node {
        Some(node) => {
            if !cx.caps.supports_spatial(filter.op) {
                debug!(op = %filter.op, property, "spatial operator compiled via fallback");
            }
            CompiledFilter::Node(node)
        }
        None => {
            debug!(op = %filter.op, property, "no operator in the fallback chain is advertised");
            CompiledFilter::Invalid
        }
    }
}

// A node for one operator, if the server advertises both the operator and an
// encoding for this geometry's shape.
fn native(
    cx: &FilterCompiler<'_>,
    op: SpatialOp,
    property: &str,
    geometry: &Geometry,
    distance_meters: Option<f64>,
) -> Option<CompiledNode> {
    if !cx.caps.supports_spatial(op) {
        return None;
    }

    let geometry = encode(cx, op, geometry)?;
    Some(CompiledNode::Spatial(SpatialNode {
        op,
        property: property.to_string(),
        geometry,
        distance_meters,
    }))
}

fn encode(cx: &FilterCompiler<'_>, op: SpatialOp, geometry: &Geometry) -> Option<EncodedGeometry> {
    let srs = cx.schema.declared_srs().to_string();

    // BBOX always takes the enclosing envelope, regardless of operands.
    if op == SpatialOp::BBox {
        return Some(EncodedGeometry {
            geometry: geometry.envelope(),
            encoding: GeometryOperand::Envelope,
            srs,
        });
    }

    let encoding = choose_encoding(geometry, cx.caps.geometry_operands_for(op))?;
    let geometry = if encoding == GeometryOperand::Envelope {
        geometry.envelope()
    } else {
        geometry.clone()
    };

    Some(EncodedGeometry {
        geometry,
        encoding,
        srs,
    })
}

fn negated(node: Option<CompiledNode>) -> Option<CompiledNode> {
    node.map(|inner| CompiledNode::Logical(LogicalNode::Not(Box::new(CompiledFilter::Node(inner)))))
}
