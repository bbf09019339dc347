use std::path::PathBuf;
use std::{fmt, io};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A specification string could not be split into a class and its fields
    #[error("malformed specification {spec:?}: {reason}")]
    MalformedSpecification { spec: String, reason: String },

    #[error("invalid base type name {0:?}")]
    InvalidBaseName(String),

    #[error("class `{0}` is specified more than once")]
    DuplicateClass(String),

    /// A built-in template could not be compiled or rendered
    #[error("template error: {0}")]
    Template(String),

    #[error("failed to format generated output")]
    Format(#[from] fmt::Error),

    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write failed and some files moved into place earlier could not be removed
    #[error(
        "failed to write {}: {}; could not remove {:?}",
        .path.display(),
        .source,
        .leftover
    )]
    PartialWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
        leftover: Vec<PathBuf>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
