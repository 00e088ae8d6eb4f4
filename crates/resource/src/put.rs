// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use azblob::{BlobStore, TransferOptions};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./put_test.rs"]
mod put_test;

/// Uploads a local file as a new version of the tracked artifact.
pub struct Put<S> {
    store: S,
}

impl<S: BlobStore> Put<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Upload the file selected by `file` from `source_dir` as
    /// `blob_name`, returning the final object name and, when
    /// `create_snapshot` is set, the timestamp of the snapshot taken
    /// right after the upload.
    ///
    /// `file` is resolved with shell glob semantics: no match uploads the
    /// literal path (letting the open report the failure), exactly one
    /// match uploads that file, and several matches are a configuration
    /// error. When not snapshotting, the object name is recomputed from
    /// the directory of `blob_name` and the base name of the matched
    /// file, so one glob can fan out to differently named objects in a
    /// fixed remote directory.
    pub async fn upload_file_to_blobstore(
        &self,
        source_dir: &Path,
        file: &str,
        blob_name: &str,
        create_snapshot: bool,
        transfer: &TransferOptions,
    ) -> Result<(String, Option<DateTime<Utc>>)> {
        let pattern = source_dir.join(file);
        let matches: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map_err(|err| Error::InvalidGlob(file.to_string(), err))?
            .filter_map(|entry| entry.ok())
            .collect();

        let mut blob_name = blob_name.to_string();
        let file_to_upload = match matches.as_slice() {
            [] => pattern,
            [only] => {
                if !create_snapshot {
                    blob_name = fan_out_name(&blob_name, only)?;
                }
                only.clone()
            }
            _ => return Err(Error::MultipleMatches(file.to_string())),
        };

        let mut reader = tokio::fs::File::open(&file_to_upload)
            .await
            .map_err(|err| Error::FileOpenError(file_to_upload.clone(), err))?;
        tracing::debug!(file = ?file_to_upload, blob = blob_name.as_str(), "uploading blob");
        self.store
            .upload_from_stream(&blob_name, &mut reader, transfer)
            .await?;

        let snapshot = if create_snapshot {
            Some(self.store.create_snapshot(&blob_name).await?)
        } else {
            None
        };
        Ok((blob_name, snapshot))
    }
}

/// Combine the directory of the configured object name with the base
/// name of the resolved local file.
fn fan_out_name(configured: &str, local: &Path) -> Result<String> {
    let base = local
        .file_name()
        .ok_or_else(|| Error::String(format!("file has no base name: {}", local.display())))?;
    let dir = Path::new(configured).parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(base).to_string_lossy().into_owned())
}
