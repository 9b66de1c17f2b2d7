use autoregister_api::{BoxError, ClassName};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Package prefix must not be empty")]
    EmptyPrefix,
}

/// Failures that abort a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid scan configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Unable to locate the host archive: {0}")]
    Location(#[source] BoxError),
    #[error("Unable to open archive {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to read archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Misuse of the query API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Classes have not been scanned yet; run scan first")]
    NotScanned,
    #[error("Class {0} is not an annotation")]
    NotAnAnnotation(ClassName),
}
