//! Error types for the generation pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Error, Debug)]
pub enum GenError {
    /// `post` mode was requested without naming the post.
    #[error("Mode 'post' requires a post name (--post <name>)")]
    MissingTarget,

    #[error("Post '{name}' was not found in {}", dir.display())]
    TargetNotFound { name: String, dir: PathBuf },

    #[error("{post} meta file does not contain a date and date assignment is disabled. Please add it manually")]
    MissingDate { post: String },

    #[error("'{extension}' is not a supported post file type ({post})")]
    UnsupportedFormat { post: String, extension: String },

    #[error("Error parsing meta file {}: {source}", path.display())]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error converting markdown of {post}: {message}")]
    Markdown { post: String, message: String },

    #[error("Error loading template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error rendering feed: {0}")]
    Feed(#[from] quick_xml::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
