// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

//! An in-memory [`BlobStore`] for engine tests.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::sync::RwLock;

use crate::store::{BlobPage, BlobStore, CopyState, ObjectRecord, PageStream, TransferOptions};
use crate::{snapshot, Error, Result};

#[cfg(test)]
#[path = "./fixtures_test.rs"]
mod fixtures_test;

#[derive(Debug, Clone)]
struct StoredObject {
    record: ObjectRecord,
    content: Bytes,
}

#[derive(Debug, Default)]
struct State {
    objects: Vec<StoredObject>,
    snapshot_clock: i64,
}

/// An in-memory container. Listings preserve insertion order and are
/// paginated at a configurable page size so that callers exercise their
/// pagination handling; snapshots get deterministic ascending timestamps.
#[derive(Debug, Clone)]
pub struct MemBlobStore {
    address: url::Url,
    page_size: usize,
    state: Arc<RwLock<State>>,
}

impl Default for MemBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self {
            address: url::Url::parse("mem://test-container/")
                .expect("a fixed container address is always a valid url"),
            page_size: 1000,
            state: Arc::default(),
        }
    }

    /// Force listings to split into pages of `page_size` records.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    /// Store the live content of a blob, replacing any previous live entry.
    pub async fn put_object(&self, name: &str, content: impl Into<Bytes>) {
        let mut state = self.state.write().await;
        let content = content.into();
        match state
            .objects
            .iter_mut()
            .find(|o| o.record.name == name && o.record.snapshot.is_none())
        {
            Some(existing) => existing.content = content,
            None => state.objects.push(StoredObject {
                record: ObjectRecord {
                    name: name.to_string(),
                    snapshot: None,
                    copy_status: None,
                },
                content,
            }),
        }
    }

    /// Store a blob that is mid-copy (or failed), as a remote replication
    /// would leave it.
    pub async fn put_object_with_copy_status(
        &self,
        name: &str,
        content: impl Into<Bytes>,
        copy_status: CopyState,
    ) {
        let mut state = self.state.write().await;
        state.objects.push(StoredObject {
            record: ObjectRecord {
                name: name.to_string(),
                snapshot: None,
                copy_status: Some(copy_status),
            },
            content: content.into(),
        });
    }

    /// Store a snapshot entry with an explicit timestamp.
    pub async fn put_snapshot(&self, name: &str, timestamp: DateTime<Utc>, content: impl Into<Bytes>) {
        let mut state = self.state.write().await;
        state.objects.push(StoredObject {
            record: ObjectRecord {
                name: name.to_string(),
                snapshot: Some(timestamp),
                copy_status: None,
            },
            content: content.into(),
        });
    }

    /// The live content last uploaded for `name`, if any.
    pub async fn object_content(&self, name: &str) -> Option<Bytes> {
        let state = self.state.read().await;
        state
            .objects
            .iter()
            .find(|o| o.record.name == name && o.record.snapshot.is_none())
            .map(|o| o.content.clone())
    }

    async fn lookup(&self, name: &str, snapshot: Option<DateTime<Utc>>) -> Result<Bytes> {
        let wanted = snapshot::effective(snapshot);
        let state = self.state.read().await;
        state
            .objects
            .iter()
            .find(|o| o.record.name == name && o.record.snapshot == wanted)
            .map(|o| o.content.clone())
            .ok_or_else(|| Error::UnknownBlob(name.to_string()))
    }
}

#[async_trait::async_trait]
impl BlobStore for MemBlobStore {
    fn pages(&self, prefix: Option<&str>) -> PageStream {
        let state = Arc::clone(&self.state);
        let page_size = self.page_size;
        let prefix = prefix.map(ToOwned::to_owned);
        futures::stream::once(async move {
            let state = state.read().await;
            let records: Vec<ObjectRecord> = state
                .objects
                .iter()
                .map(|o| o.record.clone())
                .filter(|record| match &prefix {
                    Some(prefix) => record.name.starts_with(prefix.as_str()),
                    None => true,
                })
                .collect();
            let pages: Vec<Result<BlobPage>> = records
                .chunks(page_size)
                .map(|chunk| Ok(BlobPage { blobs: chunk.to_vec() }))
                .collect();
            futures::stream::iter(pages)
        })
        .flatten()
        .boxed()
    }

    async fn size_in_bytes(&self, name: &str, snapshot: Option<DateTime<Utc>>) -> Result<u64> {
        Ok(self.lookup(name, snapshot).await?.len() as u64)
    }

    async fn get(&self, name: &str, snapshot: Option<DateTime<Utc>>) -> Result<Bytes> {
        self.lookup(name, snapshot).await
    }

    async fn get_range(
        &self,
        name: &str,
        range: std::ops::Range<u64>,
        snapshot: Option<DateTime<Utc>>,
    ) -> Result<Bytes> {
        let content = self.lookup(name, snapshot).await?;
        let start = (range.start as usize).min(content.len());
        let end = (range.end as usize).min(content.len());
        Ok(content.slice(start..end))
    }

    async fn download_to_file(
        &self,
        name: &str,
        file: &mut tokio::fs::File,
        snapshot: Option<DateTime<Utc>>,
        transfer: &TransferOptions,
    ) -> Result<()> {
        let content = self.lookup(name, snapshot).await?;
        for block in content.chunks(transfer.block_size as usize) {
            file.write_all(block)
                .await
                .map_err(|err| Error::StorageWriteError("write of downloaded block", name.into(), err))?;
        }
        file.flush()
            .await
            .map_err(|err| Error::StorageWriteError("flush of downloaded blob", name.into(), err))?;
        Ok(())
    }

    async fn upload_from_stream(
        &self,
        name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        _transfer: &TransferOptions,
    ) -> Result<()> {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .await
            .map_err(|err| Error::StorageReadError("read of upload stream", name.into(), err))?;
        self.put_object(name, content).await;
        Ok(())
    }

    async fn create_snapshot(&self, name: &str) -> Result<DateTime<Utc>> {
        let mut state = self.state.write().await;
        let content = state
            .objects
            .iter()
            .find(|o| o.record.name == name && o.record.snapshot.is_none())
            .map(|o| o.content.clone())
            .ok_or_else(|| Error::UnknownBlob(name.to_string()))?;
        state.snapshot_clock += 1;
        let timestamp = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(state.snapshot_clock);
        state.objects.push(StoredObject {
            record: ObjectRecord {
                name: name.to_string(),
                snapshot: Some(timestamp),
                copy_status: None,
            },
            content,
        });
        Ok(timestamp)
    }

    fn url(&self, name: &str) -> Result<url::Url> {
        self.address
            .join(name)
            .map_err(|err| Error::String(format!("invalid blob name for url {name}: {err}")))
    }
}
