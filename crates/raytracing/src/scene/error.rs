use std::path::PathBuf;

use thiserror::Error;

use super::Family;

/// Everything that can abort loading or saving a scene. None of these are
/// retried; the enclosing `Scene::load` / `Scene::save` returns the first one
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene document parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unable to access '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown {family} type: '{tag}'")]
    UnknownType { family: Family, tag: String },

    #[error("unable to find {family} '{name}'")]
    MissingReference { family: Family, name: String },

    #[error("field '{field}' should be {expected}")]
    InvalidValue {
        field: String,
        expected: &'static str,
    },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("failed to decode texture '{}'", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl SceneError {
    pub(crate) fn invalid(field: &str, expected: &'static str) -> Self {
        SceneError::InvalidValue {
            field: field.to_owned(),
            expected,
        }
    }

    pub(crate) fn parse(error: serde_json::Error) -> Self {
        SceneError::Parse {
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        }
    }
}
