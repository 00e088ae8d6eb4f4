// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error("failed to find blob: {0}")]
    BlobNotFound(String),
    #[error("no matching blob found for regexp: {0}")]
    NoMatchingBlob(String),
    #[error("Invalid regular expression")]
    InvalidPattern(#[from] regex::Error),
    #[error(transparent)]
    InvalidVersionFormat(#[from] crate::semi_version::InvalidVersionError),
    #[error("multiple files match glob: {0}")]
    MultipleMatches(String),
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String, #[source] glob::PatternError),
    #[error("invalid archive: {0}")]
    InvalidArchive(std::path::PathBuf),
    #[error("{0}")]
    UnpackTool(String),
    #[error("Failed to spawn {0}")]
    ProcessSpawnError(&'static str, #[source] std::io::Error),
    #[error("Failed to create file {0}")]
    FileCreateError(std::path::PathBuf, #[source] std::io::Error),
    #[error("Failed to open file {0}")]
    FileOpenError(std::path::PathBuf, #[source] std::io::Error),
    #[error("Failed to read file {0}")]
    FileReadError(std::path::PathBuf, #[source] std::io::Error),
    #[error("Failed to remove file {0}")]
    FileRemoveError(std::path::PathBuf, #[source] std::io::Error),
    #[error("must supply either versioned_file or regexp in source configuration")]
    NoTrackingMode,
    #[error(transparent)]
    #[diagnostic(forward(0))]
    Storage(#[from] azblob::Error),
    #[error("{0}")]
    String(String),
}

impl Error {
    /// Return true if this is an `InvalidArchive` error.
    #[inline]
    pub fn is_invalid_archive(&self) -> bool {
        matches!(self, Self::InvalidArchive(_))
    }
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::String(err)
    }
}
