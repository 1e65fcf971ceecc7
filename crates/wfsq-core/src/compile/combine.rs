//! Combinator compiler: AND/OR/NOT over compiled filters.
//!
//! Rewrite rules, in order:
//! 1. Invalid poisons the whole combination; Empty children are pruned, and
//!    a fully pruned list collapses to a single Empty.
//! 2. Feature-id exclusivity: mixing an Id predicate with any other kind is
//!    structural misuse. All-id lists union their id sets — `and` and `or`
//!    both collapse to the same union, a preserved quirk.
//! 3. A lone surviving child is returned unwrapped.
//! 4. Otherwise the protocol logical node wraps the survivors; `and`
//!    additionally merges sibling reconstructed During periods first.

use super::{
    CompileError,
    compiled::{CompiledFilter, CompiledNode, IdSet, LogicalNode, TemporalNode, TimeBound},
};
use crate::capability::Capabilities;

pub(crate) fn and(
    caps: &Capabilities,
    children: Vec<CompiledFilter>,
) -> Result<CompiledFilter, CompileError> {
    combine(caps, true, children)
}

pub(crate) fn or(
    caps: &Capabilities,
    children: Vec<CompiledFilter>,
) -> Result<CompiledFilter, CompileError> {
    combine(caps, false, children)
}

pub(crate) fn not(
    caps: &Capabilities,
    child: CompiledFilter,
) -> Result<CompiledFilter, CompileError> {
    if !caps.logical_ops_supported() {
        return Err(CompileError::LogicalOpsUnsupported);
    }

    match child {
        // Invalid passes through unchanged
        CompiledFilter::Invalid => Ok(CompiledFilter::Invalid),
        // not(Empty) wraps Empty rather than absorbing it; preserved quirk
        CompiledFilter::Empty => Ok(CompiledFilter::Node(CompiledNode::Logical(
            LogicalNode::Not(Box::new(CompiledFilter::Empty)),
        ))),
        CompiledFilter::Node(CompiledNode::Id(_)) => Err(CompileError::NegatedIdFilter),
        CompiledFilter::Node(node) => Ok(CompiledFilter::Node(CompiledNode::Logical(
            LogicalNode::Not(Box::new(CompiledFilter::Node(node))),
        ))),
    }
}

fn combine(
    caps: &Capabilities,
    conjunction: bool,
    children: Vec<CompiledFilter>,
) -> Result<CompiledFilter, CompileError> {
    if !caps.logical_ops_supported() {
        return Err(CompileError::LogicalOpsUnsupported);
    }

    if children.iter().any(CompiledFilter::is_invalid) {
        return Ok(CompiledFilter::Invalid);
    }

    let nodes: Vec<CompiledNode> = children
        .into_iter()
        .filter_map(CompiledFilter::into_node)
        .collect();
    if nodes.is_empty() {
        return Ok(CompiledFilter::Empty);
    }

    let id_count = nodes
        .iter()
        .filter(|node| matches!(node, CompiledNode::Id(_)))
        .count();
    if id_count > 0 {
        if id_count != nodes.len() {
            return Err(CompileError::MixedIdFilter);
        }
        return Ok(CompiledFilter::Node(CompiledNode::Id(union_ids(nodes))));
    }

    let mut nodes = if conjunction {
        merge_defaulted_periods(nodes)
    } else {
        nodes
    };

    if nodes.len() == 1 {
        return Ok(CompiledFilter::Node(nodes.remove(0)));
    }

    let logical = if conjunction {
        LogicalNode::And(nodes)
    } else {
        LogicalNode::Or(nodes)
    };
    Ok(CompiledFilter::Node(CompiledNode::Logical(logical)))
}

fn union_ids(nodes: Vec<CompiledNode>) -> IdSet {
    let mut ids = IdSet::default();
    for node in nodes {
        if let CompiledNode::Id(more) = node {
            ids = ids.union(more);
        }
    }
    ids
}

// A conjunction of two reconstructed During periods on the same property,
// one carrying the real begin and the other the real end, collapses into one
// fully bounded During (the defaulted "now" bounds drop out).
fn merge_defaulted_periods(nodes: Vec<CompiledNode>) -> Vec<CompiledNode> {
    let mut out: Vec<CompiledNode> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let complement = half_period(&node).and_then(|(property, begin_defaulted)| {
            out.iter().position(|kept| {
                half_period(kept)
                    .is_some_and(|(kept_prop, kept_begin)| {
                        kept_prop == property && kept_begin != begin_defaulted
                    })
            })
        });

        match complement {
            Some(idx) => {
                if let Some(merged) = merge_periods(&out[idx], &node) {
                    out[idx] = merged;
                } else {
                    out.push(node);
                }
            }
            None => out.push(node),
        }
    }

    out
}

// A period with exactly one defaulted bound, keyed by property and which
// bound is the defaulted one.
fn half_period(node: &CompiledNode) -> Option<(&str, bool)> {
    match node {
        CompiledNode::Temporal(TemporalNode::Period {
            property,
            begin,
            end,
        }) if begin.defaulted != end.defaulted => Some((property, begin.defaulted)),
        _ => None,
    }
}

fn merge_periods(kept: &CompiledNode, incoming: &CompiledNode) -> Option<CompiledNode> {
    let CompiledNode::Temporal(TemporalNode::Period {
        property,
        begin: kept_begin,
        end: kept_end,
    }) = kept
    else {
        return None;
    };
    let CompiledNode::Temporal(TemporalNode::Period {
        begin: incoming_begin,
        end: incoming_end,
        ..
    }) = incoming
    else {
        return None;
    };

    let begin = real_bound(kept_begin, incoming_begin)?;
    let end = real_bound(kept_end, incoming_end)?;

    Some(CompiledNode::Temporal(TemporalNode::Period {
        property: property.clone(),
        begin: TimeBound::actual(begin.at.clone()),
        end: TimeBound::actual(end.at.clone()),
    }))
}

fn real_bound<'a>(left: &'a TimeBound, right: &'a TimeBound) -> Option<&'a TimeBound> {
    match (left.defaulted, right.defaulted) {
        (false, true) => Some(left),
        (true, false) => Some(right),
        _ => None,
    }
}
