// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

//! Snapshot timestamp handling.
//!
//! The service identifies snapshots by a timestamp with exactly seven
//! fractional digits, eg `2017-01-01T01:01:01.0000000Z`. The zero (epoch)
//! timestamp is meaningful: it denotes a literal blob that has never been
//! snapshotted, and addresses the live blob in read operations.

use chrono::{DateTime, Utc};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./snapshot_test.rs"]
mod snapshot_test;

/// Render a timestamp in the form the service uses for snapshot
/// identifiers and `snapshot=` query parameters.
pub fn format(timestamp: &DateTime<Utc>) -> String {
    format!(
        "{}.{:07}Z",
        timestamp.format("%Y-%m-%dT%H:%M:%S"),
        timestamp.timestamp_subsec_nanos() / 100
    )
}

/// Parse a snapshot identifier or any other RFC 3339 timestamp.
pub fn parse(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| Error::InvalidSnapshotTimestamp(value.to_string(), err))
}

/// The zero snapshot value.
pub fn zero() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub fn is_zero(timestamp: &DateTime<Utc>) -> bool {
    *timestamp == zero()
}

/// Reduce an optional snapshot to one that actually addresses a snapshot,
/// treating both absence and the zero value as "the live blob".
pub fn effective(snapshot: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    snapshot.filter(|timestamp| !is_zero(timestamp))
}
