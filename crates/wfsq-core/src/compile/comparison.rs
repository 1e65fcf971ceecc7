//! Comparison/Like/Between lowering, including reserved-identifier handling
//! and wildcard expansion.

use super::{
    CompileError, FilterCompiler, normalize_instant,
    compiled::{ComparisonNode, CompiledFilter, CompiledNode, IdSet},
};
use crate::resolve::{Resolution, resolve};
use tracing::debug;
use wfsq_model::{
    filter::{ComparisonFilter, ComparisonOp, ComparisonOperand, IDENTIFIER, Literal},
    schema::PropertyKind,
};

pub(super) fn compile(
    cx: &FilterCompiler<'_>,
    filter: &ComparisonFilter,
) -> Result<CompiledFilter, CompileError> {
    match resolve(cx.schema, &filter.property)? {
        Resolution::ContentType => Ok(CompiledFilter::Empty),
        Resolution::Identifier => compile_identifier(cx, filter),
        Resolution::Unknown => Ok(CompiledFilter::Invalid),
        Resolution::Concrete(name) => compile_single(cx, filter, &name),
        Resolution::Expanded(names) => {
            if names.is_empty() {
                debug!(property = filter.property.name(), "wildcard expanded to nothing");
                return Ok(CompiledFilter::Invalid);
            }

            let mut parts = Vec::with_capacity(names.len());
            for name in &names {
                parts.push(compile_single(cx, filter, name)?);
            }

            if parts.len() == 1 {
                // a lone expansion needs no combinator (and no logical-op support)
                return Ok(parts.remove(0));
            }
            cx.or(parts)
        }
    }
}

fn compile_single(
    cx: &FilterCompiler<'_>,
    filter: &ComparisonFilter,
    property: &str,
) -> Result<CompiledFilter, CompileError> {
    validate_operand(filter, property)?;

    if !cx.caps.supports_comparison(filter.op) {
        debug!(op = %filter.op, property, "comparison operator not advertised");
        return Ok(CompiledFilter::Invalid);
    }

    let temporal = cx
        .schema
        .property(property)
        .is_some_and(|descriptor| descriptor.kind == PropertyKind::Temporal);

    let node = match (filter.op, &filter.operand) {
        (ComparisonOp::Between, ComparisonOperand::Bounds { lower, upper }) => {
            ComparisonNode::Between {
                property: property.to_string(),
                lower: wire_literal(lower, temporal)?,
                upper: wire_literal(upper, temporal)?,
            }
        }
        (ComparisonOp::Like, ComparisonOperand::Literal(literal)) => ComparisonNode::Like {
            property: property.to_string(),
            pattern: literal.to_string(),
            wildcard: cx.config.like.wildcard,
            single_char: cx.config.like.single_char,
            escape: cx.config.like.escape,
        },
        (op, ComparisonOperand::Literal(literal)) => ComparisonNode::Binary {
            op,
            property: property.to_string(),
            literal: wire_literal(literal, temporal)?,
        },
        // validate_operand rejects the remaining shapes
        (_, ComparisonOperand::Bounds { .. }) => {
            return Err(CompileError::MissingLiteral {
                property: property.to_string(),
            });
        }
    };

    Ok(CompiledFilter::Node(CompiledNode::Comparison(node)))
}

fn validate_operand(filter: &ComparisonFilter, property: &str) -> Result<(), CompileError> {
    match (&filter.op, &filter.operand) {
        (ComparisonOp::Between, ComparisonOperand::Bounds { lower, upper }) => {
            if lower.is_empty_text() || upper.is_empty_text() {
                return Err(CompileError::MissingBounds {
                    property: property.to_string(),
                });
            }
            Ok(())
        }
        (ComparisonOp::Between, ComparisonOperand::Literal(_)) => {
            Err(CompileError::MissingBounds {
                property: property.to_string(),
            })
        }
        (_, ComparisonOperand::Literal(literal)) => {
            if literal.is_empty_text() {
                return Err(CompileError::EmptyLiteral {
                    property: property.to_string(),
                });
            }
            Ok(())
        }
        (_, ComparisonOperand::Bounds { .. }) => Err(CompileError::MissingLiteral {
            property: property.to_string(),
        }),
    }
}

// Date literals on temporal properties normalize to ISO-8601 UTC; everything
// else passes through in Display form.
fn wire_literal(literal: &Literal, temporal: bool) -> Result<String, CompileError> {
    if temporal {
        normalize_instant(&literal.to_string())
    } else {
        Ok(literal.to_string())
    }
}

// The reserved identifier takes priority over generic comparison handling:
// an equality against `featureType.localId` becomes an Id predicate, and a
// prefix addressed to some other feature type drops out as Invalid so a
// multi-type OR can skip branches that do not apply here.
fn compile_identifier(
    cx: &FilterCompiler<'_>,
    filter: &ComparisonFilter,
) -> Result<CompiledFilter, CompileError> {
    let ComparisonOperand::Literal(literal) = &filter.operand else {
        return Ok(CompiledFilter::Invalid);
    };

    if literal.is_empty_text() {
        return Err(CompileError::EmptyLiteral {
            property: IDENTIFIER.to_string(),
        });
    }

    if filter.op != ComparisonOp::EqualTo {
        return Ok(CompiledFilter::Invalid);
    }
    let Some(text) = literal.as_text() else {
        return Ok(CompiledFilter::Invalid);
    };

    let local = match text.split_once('.') {
        Some((prefix, local)) => {
            if prefix != cx.schema.local_name() && prefix != cx.schema.type_name() {
                debug!(prefix, "identifier addresses another feature type");
                return Ok(CompiledFilter::Invalid);
            }
            local
        }
        // unprefixed ids address the current type by construction
        None => text,
    };

    let ids: IdSet = std::iter::once(local).collect();
    Ok(CompiledFilter::Node(CompiledNode::Id(ids)))
}
