use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while classifying or rendering a component tree.
///
/// Every node-level variant carries the path of the offending node from the
/// root, e.g. `root.children[1].true_value`.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{path}: {kind} node is missing required field `{field}`")]
    MissingField {
        path: String,
        kind: &'static str,
        field: &'static str,
    },

    #[error("{path}: invalid field `{field}`: {message}")]
    InvalidField {
        path: String,
        field: &'static str,
        message: String,
    },

    #[error("{path}: match case {index} has a result but no values to match")]
    EmptyMatchCase { path: String, index: usize },

    #[error("{path}: iterable body has {count} children that render output, expected at most one")]
    AmbiguousIterableBody { path: String, count: usize },

    #[error("{path}: tag node has no children")]
    EmptyTagChildren { path: String },

    #[error("{path}: duplicate prop `{key}`")]
    DuplicateProp { path: String, key: String },

    #[error("{path}: tree is deeper than the limit of {limit}")]
    DepthLimitExceeded { path: String, limit: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    pub fn missing_field(path: impl Into<String>, kind: &'static str, field: &'static str) -> Self {
        Self::MissingField {
            path: path.into(),
            kind,
            field,
        }
    }

    pub fn invalid_field(
        path: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            path: path.into(),
            field,
            message: message.into(),
        }
    }

    /// Path of the node that caused the error, if the error is node-level.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path, .. }
            | Self::InvalidField { path, .. }
            | Self::EmptyMatchCase { path, .. }
            | Self::AmbiguousIterableBody { path, .. }
            | Self::EmptyTagChildren { path }
            | Self::DuplicateProp { path, .. }
            | Self::DepthLimitExceeded { path, .. } => Some(path),
            Self::Json(_) => None,
        }
    }
}
