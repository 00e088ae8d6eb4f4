// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use blobstore_resource::{Put, PutRequest, Response, TrackingMode, Version};
use blobstore_resource_cli_common as cli;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};

cli::main!(CmdOut);

/// Upload a file as a new version of the tracked blob.
///
/// Reads a `{source, params}` request from stdin, resolves the configured
/// file against the build directory, uploads it and reports the produced
/// version on stdout.
#[derive(Debug, Parser)]
#[clap(name = "out")]
pub struct CmdOut {
    /// Make the logging more verbose
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// The directory holding the build's outputs
    #[clap(value_name = "DIR")]
    pub source_dir: PathBuf,
}

impl CmdOut {
    pub async fn run(&mut self) -> Result<i32> {
        let request: PutRequest = cli::read_request()?;
        let put = Put::new(cli::blob_store(&request.source));

        let (blob_name, create_snapshot) = match request.source.tracking()? {
            TrackingMode::VersionedFile(filename) => (filename.to_string(), true),
            TrackingMode::Regexp(expr) => {
                // keep the pattern's remote directory, name the object
                // after the file being uploaded
                let dir = Path::new(expr).parent().unwrap_or_else(|| Path::new(""));
                let Some(base) = Path::new(&request.params.file).file_name() else {
                    miette::bail!("params.file does not name a file: {}", request.params.file);
                };
                (dir.join(base).to_string_lossy().into_owned(), false)
            }
        };

        let (path, taken) = put
            .upload_file_to_blobstore(
                &self.source_dir,
                &request.params.file,
                &blob_name,
                create_snapshot,
                &request.params.transfer(),
            )
            .await
            .wrap_err("failed to upload blob")?;

        // in snapshot mode the identity is the snapshot, not the path
        let version = match taken {
            Some(timestamp) => Version::snapshot(timestamp),
            None => Version::Path {
                path,
                version: None,
            },
        };

        let response = Response {
            version,
            metadata: Vec::new(),
        };
        let body = serde_json::to_string(&response)
            .into_diagnostic()
            .wrap_err("failed to marshal output")?;
        println!("{body}");
        Ok(0)
    }
}
