//! # treepath-synth
//!
//! The reverse direction of the pipeline: given predicted symbolic kinds,
//! grow a concrete tree one node at a time and repeatedly re-validate it
//! against a semantic checker.
//!
//! A synthesis session keeps a working tree plus a frontier of open nodes
//! (innermost last). Each step decodes the predicted kind through a
//! [`decode::KindRegistry`] into a minimal concrete fragment, splices it
//! under the deepest open node, and answers with the path features for
//! the next prediction. The distinguished AFTER_LAST prediction closes
//! the open node instead; once the frontier empties, the checker verdict
//! decides between success and a bounded retry.
//!
//! Sessions are persisted between steps as JSON snapshots, so the loop is
//! resumable by construction: no in-memory session survives a restart.

pub mod decode;
pub mod error;
pub mod extract;
pub mod resolve;
pub mod session;
pub mod snapshot;
pub mod types;

pub use decode::{default_registry, DecodeOutcome, KindRegistry};
pub use error::{DecodeError, SynthesisError};
pub use extract::{advance_session, build_dataset, start_session, BatchOutcome, StartedSession};
pub use session::{advance, StepResponse, SynthesisState, MAX_ATTEMPTS};
pub use types::{
    CheckReport, ScopeEntry, SemanticChecker, TypeCatalog, TypedNode, WellFormedChecker,
};
