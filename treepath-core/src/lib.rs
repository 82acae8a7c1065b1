//! # treepath-core
//!
//! Core model for AST-path extraction: an owned source-tree arena, a
//! node-kind classifier, a shadow tree with AFTER_LAST sentinels, the
//! leaf/root path extractor, the depth-biased sampler, and the dataset
//! sample model with integer vocabulary coding.
//!
//! The host compiler's concrete tree is an external collaborator; this
//! crate only ever sees it through the [`tree::SourceTree`] arena, which
//! hosts populate directly or through the `{kind, text, finished,
//! children}` JSON interchange format in [`tree::json`].
//!
//! Data flows one way through this crate:
//!
//! ```text
//! SourceTree -> ShadowTree (+ sentinels) -> paths + sampling -> DatasetSample
//! ```
//!
//! The reverse direction (decoding predicted kinds back into concrete
//! fragments and re-validating) lives in `treepath-synth`.

pub mod dataset;
pub mod error;
pub mod extraction;
pub mod kind;
pub mod paths;
pub mod sampling;
pub mod shadow;
pub mod testing;
pub mod tree;

pub use dataset::{DatasetSample, IntegerSample, Vocabulary};
pub use kind::{AFTER_LAST_KIND, DOWN_ARROW, UP_ARROW};
pub use shadow::{Origin, ShadowId, ShadowTree};
pub use tree::{NodeCategory, NodeId, SourceTree};
