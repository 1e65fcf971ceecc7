//! Temporal lowering: native After/Before/During, plus the one-directional
//! reconstruction of After/Before as a During range when only During is
//! advertised.
//!
//! The converse — synthesizing During from After+Before — is intentionally
//! not defined; existing server integrations depend on the asymmetry.

use super::{
    CompileError, FilterCompiler, normalize_instant,
    compiled::{CompiledFilter, CompiledNode, TemporalNode, TimeBound},
};
use crate::resolve::{Resolution, resolve};
use tracing::debug;
use wfsq_model::filter::{TemporalFilter, TemporalOp, TemporalValue};

pub(super) fn compile(
    cx: &FilterCompiler<'_>,
    filter: &TemporalFilter,
) -> Result<CompiledFilter, CompileError> {
    match resolve(cx.schema, &filter.property)? {
        Resolution::ContentType => Ok(CompiledFilter::Empty),
        // wildcards and the identifier do not address temporal properties
        Resolution::Expanded(_) | Resolution::Identifier | Resolution::Unknown => {
            Ok(CompiledFilter::Invalid)
        }
        Resolution::Concrete(name) => compile_concrete(cx, filter, &name),
    }
}

fn compile_concrete(
    cx: &FilterCompiler<'_>,
    filter: &TemporalFilter,
    property: &str,
) -> Result<CompiledFilter, CompileError> {
    match (filter.op, &filter.value) {
        (TemporalOp::After, TemporalValue::Instant(text)) => {
            let at = normalize_instant(text)?;
            if cx.caps.supports_temporal(TemporalOp::After) {
                return Ok(instant_node(TemporalOp::After, property, at));
            }
            if cx.caps.supports_temporal(TemporalOp::During) {
                debug!(property, "After not advertised; reconstructing as During");
                return Ok(period_node(
                    property,
                    TimeBound::actual(at),
                    TimeBound::defaulted_to(cx.now_instant()?),
                ));
            }
            Ok(CompiledFilter::Invalid)
        }
        (TemporalOp::Before, TemporalValue::Instant(text)) => {
            let at = normalize_instant(text)?;
            if cx.caps.supports_temporal(TemporalOp::Before) {
                return Ok(instant_node(TemporalOp::Before, property, at));
            }
            if cx.caps.supports_temporal(TemporalOp::During) {
                debug!(property, "Before not advertised; reconstructing as During");
                return Ok(period_node(
                    property,
                    TimeBound::defaulted_to(cx.now_instant()?),
                    TimeBound::actual(at),
                ));
            }
            Ok(CompiledFilter::Invalid)
        }
        (TemporalOp::During, TemporalValue::Range { begin, end }) => {
            let begin = normalize_instant(begin)?;
            let end = normalize_instant(end)?;
            if cx.caps.supports_temporal(TemporalOp::During) {
                return Ok(period_node(
                    property,
                    TimeBound::actual(begin),
                    TimeBound::actual(end),
                ));
            }
            Ok(CompiledFilter::Invalid)
        }
        (TemporalOp::After | TemporalOp::Before, TemporalValue::Range { .. })
        | (TemporalOp::During, TemporalValue::Instant(_)) => Err(CompileError::TemporalShape {
            property: property.to_string(),
        }),
    }
}

fn instant_node(op: TemporalOp, property: &str, at: String) -> CompiledFilter {
    CompiledFilter::Node(CompiledNode::Temporal(TemporalNode::Instant {
        op,
        property: property.to_string(),
        at,
    }))
}

fn period_node(property: &str, begin: TimeBound, end: TimeBound) -> CompiledFilter {
    CompiledFilter::Node(CompiledNode::Temporal(TemporalNode::Period {
        property: property.to_string(),
        begin,
        end,
    }))
}
