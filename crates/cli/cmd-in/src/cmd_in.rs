// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use azblob::{snapshot, BlobStore};
use blobstore_resource::{unpack_blob, Get, GetRequest, MetadataField, Response, TrackingMode};
use blobstore_resource_cli_common as cli;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};

cli::main!(CmdIn);

/// Fetch one version of the tracked blob into a directory.
///
/// Reads a `{source, version, params?}` request from stdin, downloads the
/// resolved blob (unless skipped), optionally unpacks it, writes the
/// `url` and `version` files beside it and reports the fetched version
/// with its metadata on stdout.
#[derive(Debug, Parser)]
#[clap(name = "in")]
pub struct CmdIn {
    /// Make the logging more verbose
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// The directory to fetch the blob into
    #[clap(value_name = "DIR")]
    pub destination: PathBuf,
}

impl CmdIn {
    pub async fn run(&mut self) -> Result<i32> {
        let request: GetRequest = cli::read_request()?;
        let store = cli::blob_store(&request.source);
        let mode = request.source.tracking()?;

        let (blob_name, blob_snapshot) = match mode {
            TrackingMode::VersionedFile(filename) => {
                (filename.to_string(), request.version.snapshot_timestamp())
            }
            TrackingMode::Regexp(_) => {
                let Some(path) = request.version.blob_path() else {
                    miette::bail!("the requested version does not name a blob path");
                };
                (path.to_string(), None)
            }
        };

        tokio::fs::create_dir_all(&self.destination)
            .await
            .into_diagnostic()
            .wrap_err("failed to create destination directory")?;

        if !request.params.skip_download {
            let get = Get::new(store.clone());
            let local = get
                .copy_blob_to_destination(
                    &self.destination,
                    &blob_name,
                    blob_snapshot,
                    &request.params.transfer(),
                )
                .await
                .wrap_err("failed to copy blob")?;

            if request.params.unpack {
                unpack_blob(&local).await.wrap_err("failed to unpack blob")?;
            }
        }

        let mut url = store.url(&blob_name).wrap_err("failed to get blob url")?;
        if matches!(mode, TrackingMode::VersionedFile(_)) {
            let timestamp = blob_snapshot.unwrap_or_else(snapshot::zero);
            url.query_pairs_mut()
                .append_pair("snapshot", &snapshot::format(&timestamp));
        }

        tokio::fs::write(self.destination.join("url"), url.as_str())
            .await
            .into_diagnostic()
            .wrap_err("failed to write blob url to output directory")?;
        tokio::fs::write(
            self.destination.join("version"),
            request.version.sidecar_contents(),
        )
        .await
        .into_diagnostic()
        .wrap_err("failed to write blob version to output directory")?;

        let response = Response {
            version: request.version.clone(),
            metadata: vec![
                MetadataField::new("filename", blob_name.clone()),
                MetadataField::new("url", url.to_string()),
            ],
        };
        let body = serde_json::to_string(&response)
            .into_diagnostic()
            .wrap_err("failed to marshal output")?;
        println!("{body}");
        Ok(0)
    }
}
