//! Error types for the core pipeline

use std::fmt;

/// Errors from integer-coding a sample through a vocabulary.
///
/// Missing tokens fail loudly: silently skipping them would corrupt the
/// training signal, so the vocabulary must be a closed superset of the
/// corpus before coding starts.
#[derive(Debug)]
pub enum VocabularyError {
    /// A string token has no integer id.
    MissingToken(String),
    /// An integer id has no string token.
    UnknownId(i64),
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyError::MissingToken(token) => {
                write!(f, "token not present in vocabulary: {:?}", token)
            }
            VocabularyError::UnknownId(id) => {
                write!(f, "id not present in vocabulary: {}", id)
            }
        }
    }
}

impl std::error::Error for VocabularyError {}

pub type VocabularyResult<T> = Result<T, VocabularyError>;

/// Errors from the `{kind, text, finished, children}` tree interchange.
#[derive(Debug)]
pub enum TreeJsonError {
    Json(serde_json::Error),
}

impl fmt::Display for TreeJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeJsonError::Json(err) => write!(f, "malformed tree json: {}", err),
        }
    }
}

impl std::error::Error for TreeJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeJsonError::Json(err) => Some(err),
        }
    }
}

pub type TreeJsonResult<T> = Result<T, TreeJsonError>;
