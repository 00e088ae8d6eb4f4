// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Azure(#[from] azure_core::Error),
    #[error("Invalid snapshot timestamp: {0}")]
    InvalidSnapshotTimestamp(String, #[source] chrono::ParseError),
    #[error("Failed to read {1}")]
    StorageReadError(&'static str, std::path::PathBuf, #[source] std::io::Error),
    #[error("Failed to write {1}")]
    StorageWriteError(&'static str, std::path::PathBuf, #[source] std::io::Error),
    #[error("Timed out transferring a block of {0}")]
    TransferTimeout(String),
    #[error("Blob has no stored content: {0}")]
    UnknownBlob(String),
    #[error("{0}")]
    String(String),
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::String(err)
    }
}
