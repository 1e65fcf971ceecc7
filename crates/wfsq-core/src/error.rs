use crate::{compile::CompileError, geometry::WktError, plan::PlanError, resolve::ResolveError};
use thiserror::Error as ThisError;

///
/// Error
///
/// Aggregated engine error for callers that drive compilation and planning
/// through one surface. Each variant keeps its own taxonomy:
///
/// - `Compile` — illegal input or structural misuse, aborts the query
/// - `Plan` — the query cannot be expressed for this source
/// - `Resolve` — a named property is explicitly not queryable
/// - `Wkt` — malformed geometry text from the caller
///
/// Capability gaps are never errors; they travel as the Invalid sentinel
/// inside [`crate::compile::CompiledFilter`].
///

#[derive(Clone, Debug, PartialEq, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Wkt(#[from] WktError),
}
