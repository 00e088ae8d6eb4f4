// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use azblob::snapshot;
use blobstore_resource::{Check, CheckRequest, TrackingMode, Version};
use blobstore_resource_cli_common as cli;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};

cli::main!(CmdCheck);

/// Discover new versions of the tracked blob.
///
/// Reads a `{source, version?}` request from stdin and writes the ordered
/// list of versions at or after the requested one to stdout.
#[derive(Debug, Parser)]
#[clap(name = "check")]
pub struct CmdCheck {
    /// Make the logging more verbose
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CmdCheck {
    pub async fn run(&mut self) -> Result<i32> {
        let request: CheckRequest = cli::read_request()?;
        let check = Check::new(cli::blob_store(&request.source));

        let versions = match request.source.tracking()? {
            TrackingMode::VersionedFile(filename) => {
                let baseline = request
                    .version
                    .as_ref()
                    .and_then(Version::snapshot_timestamp)
                    .unwrap_or_else(snapshot::zero);
                check
                    .versions_since(filename, baseline, request.source.initial_version.clone())
                    .await
                    .wrap_err("failed to get latest version")?
            }
            TrackingMode::Regexp(expr) => {
                let current = request
                    .version
                    .as_ref()
                    .and_then(Version::version_string)
                    .unwrap_or_default();
                check
                    .versions_since_regexp(expr, current)
                    .await
                    .wrap_err("failed to get latest version from regexp")?
            }
        };

        // the pipeline's very first check carries no version at all and
        // expects only the latest one back
        let versions: Vec<Version> = if request.version.is_none() {
            versions.into_iter().last().into_iter().collect()
        } else {
            versions
        };

        let body = serde_json::to_string(&versions)
            .into_diagnostic()
            .wrap_err("failed to marshal versions")?;
        println!("{body}");
        Ok(0)
    }
}
