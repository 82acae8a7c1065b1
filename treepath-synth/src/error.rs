//! Error types for synthesis

use std::fmt;
use std::io;

use treepath_core::error::{TreeJsonError, VocabularyError};

/// Failures of the kind -> fragment decoder.
///
/// The AFTER_LAST "stop" prediction is *not* an error; it is a normal
/// [`DecodeOutcome`](crate::decode::DecodeOutcome) variant. These are the
/// genuinely failing cases, fatal to the current sample but not to the
/// process.
#[derive(Debug)]
pub enum DecodeError {
    /// The kind is registered but has no synthesis rule.
    UnsupportedKind(String),
    /// The kind is not registered at all.
    UnknownKind(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnsupportedKind(kind) => {
                write!(f, "no synthesis rule for kind {:?}", kind)
            }
            DecodeError::UnknownKind(kind) => write!(f, "unknown kind {:?}", kind),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Registry construction failures, reported at startup rather than on
/// first use.
#[derive(Debug)]
pub enum RegistryError {
    DuplicateKind(String),
    /// AFTER_LAST is the stop signal and can never carry a rule.
    ReservedKind(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateKind(kind) => {
                write!(f, "kind registered twice: {:?}", kind)
            }
            RegistryError::ReservedKind(kind) => {
                write!(f, "kind {:?} is reserved and cannot carry a rule", kind)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Identifier resolution failures.
#[derive(Debug)]
pub enum ResolveError {
    /// No name is visible at the splice point.
    NoVisibleNames,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NoVisibleNames => write!(f, "no visible names at the splice point"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Snapshot persistence failures.
#[derive(Debug)]
pub enum SnapshotError {
    Io(io::Error),
    Json(serde_json::Error),
    Tree(TreeJsonError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "snapshot io: {}", err),
            SnapshotError::Json(err) => write!(f, "snapshot json: {}", err),
            SnapshotError::Tree(err) => write!(f, "snapshot tree: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Json(err) => Some(err),
            SnapshotError::Tree(err) => Some(err),
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(err: io::Error) -> Self {
        SnapshotError::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err)
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Top-level synthesis failures surfaced to drivers.
#[derive(Debug)]
pub enum SynthesisError {
    Decode(DecodeError),
    Resolve(ResolveError),
    Vocabulary(VocabularyError),
    Snapshot(SnapshotError),
    Json(serde_json::Error),
    /// Extraction found no usable target in the depth range.
    NoTarget,
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::Decode(err) => write!(f, "decode: {}", err),
            SynthesisError::Resolve(err) => write!(f, "resolve: {}", err),
            SynthesisError::Vocabulary(err) => write!(f, "vocabulary: {}", err),
            SynthesisError::Snapshot(err) => write!(f, "snapshot: {}", err),
            SynthesisError::Json(err) => write!(f, "json: {}", err),
            SynthesisError::NoTarget => write!(f, "no usable target in the depth range"),
        }
    }
}

impl std::error::Error for SynthesisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthesisError::Decode(err) => Some(err),
            SynthesisError::Resolve(err) => Some(err),
            SynthesisError::Vocabulary(err) => Some(err),
            SynthesisError::Snapshot(err) => Some(err),
            SynthesisError::Json(err) => Some(err),
            SynthesisError::NoTarget => None,
        }
    }
}

impl From<DecodeError> for SynthesisError {
    fn from(err: DecodeError) -> Self {
        SynthesisError::Decode(err)
    }
}

impl From<ResolveError> for SynthesisError {
    fn from(err: ResolveError) -> Self {
        SynthesisError::Resolve(err)
    }
}

impl From<VocabularyError> for SynthesisError {
    fn from(err: VocabularyError) -> Self {
        SynthesisError::Vocabulary(err)
    }
}

impl From<SnapshotError> for SynthesisError {
    fn from(err: SnapshotError) -> Self {
        SynthesisError::Snapshot(err)
    }
}

impl From<serde_json::Error> for SynthesisError {
    fn from(err: serde_json::Error) -> Self {
        SynthesisError::Json(err)
    }
}

pub type SynthesisResult<T> = Result<T, SynthesisError>;
