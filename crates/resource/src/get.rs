// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use azblob::{BlobStore, TransferOptions};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./get_test.rs"]
mod get_test;

/// Downloads one resolved version of the tracked artifact.
pub struct Get<S> {
    store: S,
}

impl<S: BlobStore> Get<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Download `blob_name` (at `snapshot`, when one is given) into
    /// `destination`, in sequential blocks of the configured size.
    ///
    /// The remote name is flattened to its base filename: a blob named
    /// `builds/example.json` lands at `<destination>/example.json`. Any
    /// directory structure in the remote name is intentionally discarded,
    /// matching the convention consumers of this resource rely on.
    pub async fn copy_blob_to_destination(
        &self,
        destination: &Path,
        blob_name: &str,
        snapshot: Option<DateTime<Utc>>,
        transfer: &TransferOptions,
    ) -> Result<PathBuf> {
        let filename = Path::new(blob_name)
            .file_name()
            .ok_or_else(|| Error::String(format!("blob name has no base filename: {blob_name}")))?;
        let local_path = destination.join(filename);
        let mut file = tokio::fs::File::create(&local_path)
            .await
            .map_err(|err| Error::FileCreateError(local_path.clone(), err))?;
        tracing::debug!(blob = blob_name, path = ?local_path, "downloading blob");
        self.store
            .download_to_file(blob_name, &mut file, snapshot, transfer)
            .await?;
        Ok(local_path)
    }
}
