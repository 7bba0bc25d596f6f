//! Error types for RDF splicing

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("No output format was given")]
    MissingOutputFormat,

    #[error("The output format \"{0}\" is unknown")]
    UnsupportedFormat(String),

    #[error("Cannot determine the RDF serialization of {0}")]
    UnknownInputFormat(PathBuf),

    #[error("No input files defined")]
    NoInputFiles,

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Invalid shared-storage path '{0}': expected shared://<relative path>")]
    InvalidSharedPath(String),

    #[error("Path {0} is not inside the shared directory")]
    OutsideSharedDirectory(PathBuf),

    #[error("Request to {url} failed: {reason}")]
    Service { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
