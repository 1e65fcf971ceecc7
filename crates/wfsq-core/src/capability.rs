//! Capability model: the queryable view over a server's advertised
//! operators, operand kinds, and sort behavior.
//!
//! Built once per capability document and wholesale-replaced on refresh;
//! the build never fails and never performs I/O.

use crate::geometry::GeometryOperand;
use std::collections::{BTreeMap, BTreeSet};
use wfsq_model::capability::{CapabilityDocument, SortOrder};
use wfsq_model::filter::{ComparisonOp, SpatialOp, TemporalOp};

///
/// Capabilities
///
/// Immutable, queryable operator sets. Anything the document does not
/// advertise is simply absent: `supports_*` answers false/None and the
/// compiler degrades through its fallback tables.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Capabilities {
    logical_ops: bool,
    comparison_ops: BTreeSet<ComparisonOp>,
    spatial_ops: BTreeMap<SpatialOp, OperatorDescriptor>,
    temporal_ops: BTreeMap<TemporalOp, OperatorDescriptor>,
    geometry_operands: BTreeSet<GeometryOperand>,
    temporal_operands: BTreeSet<String>,
    sorting_supported: bool,
    allowed_sort_orders: BTreeSet<SortOrder>,
}

impl Capabilities {
    /// Build the capability model from an advertisement document.
    ///
    /// Never fails: unknown operator names are ignored and absent sections
    /// yield empty sets, meaning the server advertises nothing there.
    #[must_use]
    pub fn build(doc: &CapabilityDocument) -> Self {
        let mut comparison_ops = BTreeSet::new();
        for name in &doc.comparison_operators {
            if name == "Simple_Comparisons" {
                comparison_ops.extend(ComparisonOp::simple_comparisons());
            } else if let Some(op) = ComparisonOp::from_capability_name(name) {
                comparison_ops.insert(op);
            }
        }

        let geometry_operands: BTreeSet<GeometryOperand> = doc
            .geometry_operands
            .iter()
            .filter_map(|name| GeometryOperand::from_capability_name(name))
            .collect();

        let mut spatial_ops = BTreeMap::new();
        for operator in &doc.spatial_operators {
            let Some(op) = SpatialOp::from_capability_name(&operator.name) else {
                continue;
            };
            let operands: BTreeSet<GeometryOperand> = operator
                .operands
                .iter()
                .filter_map(|name| GeometryOperand::from_capability_name(name))
                .collect();
            spatial_ops.insert(
                op,
                OperatorDescriptor {
                    operands: if operands.is_empty() {
                        geometry_operands.clone()
                    } else {
                        operands
                    },
                },
            );
        }

        let mut temporal_ops = BTreeMap::new();
        for operator in &doc.temporal_operators {
            let Some(op) = TemporalOp::from_capability_name(&operator.name) else {
                continue;
            };
            temporal_ops.insert(
                op,
                OperatorDescriptor {
                    operands: BTreeSet::new(),
                },
            );
        }

        let temporal_operands: BTreeSet<String> = doc.temporal_operands.iter().cloned().collect();

        let (sorting_supported, allowed_sort_orders) = match &doc.sort {
            Some(sort) => (
                true,
                sort.allowed_orders
                    .iter()
                    .filter_map(|name| SortOrder::from_capability_name(name))
                    .collect(),
            ),
            None => (false, BTreeSet::new()),
        };

        Self {
            logical_ops: doc.logical_operators,
            comparison_ops,
            spatial_ops,
            temporal_ops,
            geometry_operands,
            temporal_operands,
            sorting_supported,
            allowed_sort_orders,
        }
    }

    /// True when the server advertises And/Or/Not.
    #[must_use]
    pub const fn logical_ops_supported(&self) -> bool {
        self.logical_ops
    }

    #[must_use]
    pub fn supports_comparison(&self, op: ComparisonOp) -> bool {
        self.comparison_ops.contains(&op)
    }

    #[must_use]
    pub fn spatial_descriptor(&self, op: SpatialOp) -> Option<&OperatorDescriptor> {
        self.spatial_ops.get(&op)
    }

    #[must_use]
    pub fn supports_spatial(&self, op: SpatialOp) -> bool {
        self.spatial_ops.contains_key(&op)
    }

    #[must_use]
    pub fn supports_temporal(&self, op: TemporalOp) -> bool {
        self.temporal_ops.contains_key(&op)
    }

    /// Geometry operands advertised for one spatial operator, defaulting to
    /// the server-wide operand set when the operator has no override.
    #[must_use]
    pub fn geometry_operands_for(&self, op: SpatialOp) -> &BTreeSet<GeometryOperand> {
        self.spatial_ops
            .get(&op)
            .map_or(&self.geometry_operands, |descriptor| &descriptor.operands)
    }

    #[must_use]
    pub const fn geometry_operands(&self) -> &BTreeSet<GeometryOperand> {
        &self.geometry_operands
    }

    #[must_use]
    pub const fn temporal_operands(&self) -> &BTreeSet<String> {
        &self.temporal_operands
    }

    #[must_use]
    pub const fn sorting_supported(&self) -> bool {
        self.sorting_supported
    }

    /// True when the server either did not enumerate directions or lists the
    /// requested one.
    #[must_use]
    pub fn sort_order_allowed(&self, order: SortOrder) -> bool {
        self.allowed_sort_orders.is_empty() || self.allowed_sort_orders.contains(&order)
    }
}

///
/// OperatorDescriptor
///
/// Per-operator advertisement detail. Currently the operand kinds an
/// operator accepts; empty means unconstrained.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OperatorDescriptor {
    pub operands: BTreeSet<GeometryOperand>,
}
