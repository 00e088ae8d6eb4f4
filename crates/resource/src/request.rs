// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use azblob::TransferOptions;
use serde::Deserialize;

use crate::{Error, Result, Version};

#[cfg(test)]
#[path = "./request_test.rs"]
mod request_test;

/// The source configuration shared by all three executables.
#[derive(Clone, Debug, Deserialize)]
pub struct Source {
    pub storage_account_name: String,
    pub storage_account_key: String,
    pub container: String,
    /// Track a single blob name through its snapshot history.
    #[serde(default)]
    pub versioned_file: Option<String>,
    /// Track a family of blob names whose first (or `version`-named)
    /// capture group is the version string.
    #[serde(default)]
    pub regexp: Option<String>,
    /// Endpoint suffix for sovereign or otherwise non-public clouds.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Version to report when the tracked blob does not exist yet,
    /// bootstrapping a brand-new pipeline.
    #[serde(default)]
    pub initial_version: Option<Version>,
}

/// Which of the two discovery modes a source configures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingMode<'a> {
    VersionedFile(&'a str),
    Regexp(&'a str),
}

impl Source {
    /// The configured tracking mode. `versioned_file` wins when both are
    /// set; neither is a configuration error.
    pub fn tracking(&self) -> Result<TrackingMode<'_>> {
        if let Some(filename) = self.versioned_file.as_deref() {
            return Ok(TrackingMode::VersionedFile(filename));
        }
        if let Some(expr) = self.regexp.as_deref() {
            return Ok(TrackingMode::Regexp(expr));
        }
        Err(Error::NoTrackingMode)
    }
}

/// A duration that deserializes either from a Go-style duration string
/// (`"500ms"`, `"30s"`, `"1h30m"`) or from an integer nanosecond count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TryTimeout(pub Duration);

impl<'de> Deserialize<'de> for TryTimeout {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Nanos(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Nanos(nanos) => Ok(TryTimeout(Duration::from_nanos(nanos))),
            Raw::Text(text) => parse_duration(&text).map(TryTimeout).map_err(|_| {
                serde::de::Error::custom(format!("invalid duration string: [{text}]"))
            }),
        }
    }
}

/// Parse a sequence of `<number><unit>` terms, eg `1h30m` or `500ms`.
fn parse_duration(given: &str) -> std::result::Result<Duration, ()> {
    if given.is_empty() {
        return Err(());
    }
    let mut total = Duration::ZERO;
    let mut rest = given;
    while !rest.is_empty() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| ())?;
        rest = &rest[digits..];
        let (nanos_per_unit, len) = if rest.starts_with("ns") {
            (1, 2)
        } else if rest.starts_with("us") {
            (1_000, 2)
        } else if rest.starts_with("ms") {
            (1_000_000, 2)
        } else if rest.starts_with('s') {
            (1_000_000_000, 1)
        } else if rest.starts_with('m') {
            (60 * 1_000_000_000, 1)
        } else if rest.starts_with('h') {
            (3_600 * 1_000_000_000, 1)
        } else {
            return Err(());
        };
        rest = &rest[len..];
        total += Duration::from_nanos(value.saturating_mul(nanos_per_unit));
    }
    Ok(total)
}

/// Retry configuration forwarded to the blob client.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct RetryParams {
    #[serde(default)]
    pub try_timeout: Option<TryTimeout>,
}

fn transfer_options(block_size: Option<u64>, retry: &RetryParams) -> TransferOptions {
    TransferOptions {
        block_size: block_size.unwrap_or(azblob::DEFAULT_BLOCK_SIZE),
        // a zero timeout means "no override"
        try_timeout: retry
            .try_timeout
            .map(|timeout| timeout.0)
            .filter(|timeout| !timeout.is_zero()),
    }
}

/// Params accepted by the `in` executable.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GetParams {
    #[serde(default)]
    pub skip_download: bool,
    #[serde(default)]
    pub unpack: bool,
    #[serde(default)]
    pub block_size: Option<u64>,
    #[serde(default)]
    pub retry: RetryParams,
}

impl GetParams {
    pub fn transfer(&self) -> TransferOptions {
        transfer_options(self.block_size, &self.retry)
    }
}

/// Params accepted by the `out` executable.
#[derive(Clone, Debug, Deserialize)]
pub struct PutParams {
    /// The file to upload: a path under the build's source directory,
    /// optionally containing shell glob metacharacters.
    pub file: String,
    #[serde(default)]
    pub block_size: Option<u64>,
    #[serde(default)]
    pub retry: RetryParams,
}

impl PutParams {
    pub fn transfer(&self) -> TransferOptions {
        transfer_options(self.block_size, &self.retry)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CheckRequest {
    pub source: Source,
    #[serde(default)]
    pub version: Option<Version>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GetRequest {
    pub source: Source,
    pub version: Version,
    #[serde(default)]
    pub params: GetParams,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PutRequest {
    pub source: Source,
    pub params: PutParams,
}
