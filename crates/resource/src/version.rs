// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use azblob::snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "./version_test.rs"]
mod version_test;

/// One version of the tracked artifact as it travels through the
/// pipeline, both on stdin (the requested version) and stdout (discovered
/// and produced versions).
///
/// The two variants correspond to the two tracking modes and are mutually
/// exclusive by construction. `put` responses for regex tracking identify
/// the object by path alone, which is why the version string is optional
/// there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    /// A point-in-time snapshot of the literal tracked blob. The zero
    /// (epoch) timestamp denotes the live blob before any snapshot was
    /// taken of it.
    Snapshot {
        #[serde(with = "wire_snapshot")]
        snapshot: DateTime<Utc>,
    },
    /// An object whose name embeds a version string.
    Path {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
}

impl Version {
    pub fn snapshot(timestamp: DateTime<Utc>) -> Self {
        Version::Snapshot {
            snapshot: timestamp,
        }
    }

    pub fn path<P: Into<String>, V: Into<String>>(path: P, version: V) -> Self {
        Version::Path {
            path: path.into(),
            version: Some(version.into()),
        }
    }

    pub fn snapshot_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Version::Snapshot { snapshot } => Some(*snapshot),
            Version::Path { .. } => None,
        }
    }

    pub fn blob_path(&self) -> Option<&str> {
        match self {
            Version::Snapshot { .. } => None,
            Version::Path { path, .. } => Some(path),
        }
    }

    pub fn version_string(&self) -> Option<&str> {
        match self {
            Version::Snapshot { .. } => None,
            Version::Path { version, .. } => version.as_deref(),
        }
    }

    /// The contents of the `version` file placed beside a downloaded
    /// blob: the version string when tracking by regex, the snapshot
    /// timestamp when tracking a literal name.
    pub fn sidecar_contents(&self) -> String {
        match self {
            Version::Snapshot { snapshot: timestamp } => snapshot::format(timestamp),
            Version::Path { version, .. } => version.clone().unwrap_or_default(),
        }
    }
}

mod wire_snapshot {
    use super::*;

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&snapshot::format(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        snapshot::parse(&value).map_err(serde::de::Error::custom)
    }
}
