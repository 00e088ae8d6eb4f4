// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::Result;

/// The default size of a single transfer block, matching the Azure
/// SDK's block blob defaults.
pub const DEFAULT_BLOCK_SIZE: u64 = 4 * 1024 * 1024;

/// Tuning for a single chunked transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Number of bytes moved per remote round-trip.
    pub block_size: u64,
    /// Upper bound on each block round-trip, when set.
    pub try_timeout: Option<Duration>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            try_timeout: None,
        }
    }
}

/// The state of a server-side copy operation attached to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Pending,
    Success,
    Aborted,
    Failed,
}

/// One remote object as returned by a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub name: String,
    /// Set when this entry is a point-in-time snapshot of the named blob
    /// rather than its current content.
    pub snapshot: Option<DateTime<Utc>>,
    pub copy_status: Option<CopyState>,
}

impl ObjectRecord {
    /// False while a server-side copy is still running or has failed,
    /// in which case the object is not yet a stable candidate.
    pub fn is_settled(&self) -> bool {
        matches!(self.copy_status, None | Some(CopyState::Success))
    }
}

/// One page of a container listing.
#[derive(Debug, Clone, Default)]
pub struct BlobPage {
    pub blobs: Vec<ObjectRecord>,
}

/// A finite, non-restartable sequence of listing pages.
pub type PageStream = BoxStream<'static, Result<BlobPage>>;

/// Access to a single blob container.
///
/// Snapshot arguments follow the service convention that the zero (epoch)
/// timestamp addresses the live blob rather than any snapshot of it.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Lazily page through the container, including snapshot entries and
    /// copy status, optionally filtered server-side by a name prefix.
    fn pages(&self, prefix: Option<&str>) -> PageStream;

    async fn size_in_bytes(&self, name: &str, snapshot: Option<DateTime<Utc>>) -> Result<u64>;

    async fn get(&self, name: &str, snapshot: Option<DateTime<Utc>>) -> Result<Bytes>;

    /// Read `range` (half-open, in bytes) of the named object.
    async fn get_range(
        &self,
        name: &str,
        range: std::ops::Range<u64>,
        snapshot: Option<DateTime<Utc>>,
    ) -> Result<Bytes>;

    /// Download the named object into `file` in sequential bounded blocks.
    async fn download_to_file(
        &self,
        name: &str,
        file: &mut tokio::fs::File,
        snapshot: Option<DateTime<Utc>>,
        transfer: &TransferOptions,
    ) -> Result<()>;

    /// Stream `reader` into the named object in sequential bounded blocks.
    async fn upload_from_stream(
        &self,
        name: &str,
        reader: &mut (dyn tokio::io::AsyncRead + Send + Unpin),
        transfer: &TransferOptions,
    ) -> Result<()>;

    /// Create a point-in-time snapshot of the named blob, returning its
    /// service-assigned timestamp.
    async fn create_snapshot(&self, name: &str) -> Result<DateTime<Utc>>;

    /// The public address of the named blob.
    fn url(&self, name: &str) -> Result<url::Url>;
}
