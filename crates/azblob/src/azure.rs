// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use azure_storage::{CloudLocation, StorageCredentials};
use azure_storage_blobs::blob::{Blob, CopyStatus};
use azure_storage_blobs::prelude::*;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::store::{BlobPage, BlobStore, CopyState, ObjectRecord, PageStream, TransferOptions};
use crate::{snapshot, Error, Result};

/// Shared-key access to a single container in one storage account.
///
/// Transfers are strictly sequential: blocks are moved one at a time to
/// bound peak memory at one block, and the configured try timeout applies
/// to each block round-trip.
#[derive(Clone)]
pub struct AzureBlobStore {
    container: ContainerClient,
}

impl AzureBlobStore {
    /// Connect to `container` in the given storage account. A `base_url`
    /// selects a sovereign or otherwise non-public cloud endpoint.
    pub fn new(account: &str, access_key: &str, container: &str, base_url: Option<&str>) -> Self {
        let credentials = StorageCredentials::access_key(account.to_string(), access_key.to_string());
        let location = match base_url {
            Some(uri) => CloudLocation::Custom {
                account: account.to_string(),
                uri: uri.to_string(),
            },
            None => CloudLocation::Public {
                account: account.to_string(),
            },
        };
        let container =
            ClientBuilder::with_location(location, credentials).container_client(container.to_string());
        Self { container }
    }

    fn blob_client(&self, name: &str) -> BlobClient {
        self.container.blob_client(name.to_string())
    }

    fn versioning(snapshot: Option<DateTime<Utc>>) -> Option<BlobVersioning> {
        snapshot::effective(snapshot)
            .map(|timestamp| BlobVersioning::Snapshot(Snapshot::new(snapshot::format(&timestamp))))
    }

    /// Run one remote round-trip under the configured try timeout.
    async fn bounded<F, T>(&self, name: &str, limit: Option<Duration>, op: F) -> Result<T>
    where
        F: std::future::Future<Output = T>,
    {
        match limit {
            Some(limit) => tokio::time::timeout(limit, op)
                .await
                .map_err(|_| Error::TransferTimeout(name.to_string())),
            None => Ok(op.await),
        }
    }
}

fn object_record(blob: &Blob) -> ObjectRecord {
    let snapshot = blob.snapshot.as_ref().and_then(|timestamp| {
        let nanos = timestamp.unix_timestamp_nanos();
        DateTime::<Utc>::from_timestamp(
            nanos.div_euclid(1_000_000_000) as i64,
            nanos.rem_euclid(1_000_000_000) as u32,
        )
    });
    let copy_status = blob.properties.copy_status.as_ref().map(|status| match status {
        CopyStatus::Pending => CopyState::Pending,
        CopyStatus::Success => CopyState::Success,
        CopyStatus::Aborted => CopyState::Aborted,
        CopyStatus::Failed => CopyState::Failed,
    });
    ObjectRecord {
        name: blob.name.clone(),
        snapshot,
        copy_status,
    }
}

/// Read from `reader` until `buf` is full or the stream ends.
async fn fill_block(
    reader: &mut (dyn AsyncRead + Send + Unpin),
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let count = reader.read(&mut buf[filled..]).await?;
        if count == 0 {
            break;
        }
        filled += count;
    }
    Ok(filled)
}

#[async_trait::async_trait]
impl BlobStore for AzureBlobStore {
    fn pages(&self, prefix: Option<&str>) -> PageStream {
        let mut builder = self
            .container
            .list_blobs()
            .include_snapshots(true)
            .include_copy(true);
        if let Some(prefix) = prefix {
            builder = builder.prefix(prefix.to_string());
        }
        builder
            .into_stream()
            .map(|page| -> Result<BlobPage> {
                let page = page?;
                Ok(BlobPage {
                    blobs: page.blobs.blobs().map(object_record).collect(),
                })
            })
            .boxed()
    }

    async fn size_in_bytes(&self, name: &str, snapshot: Option<DateTime<Utc>>) -> Result<u64> {
        let mut builder = self.blob_client(name).get_properties();
        if let Some(versioning) = Self::versioning(snapshot) {
            builder = builder.blob_versioning(versioning);
        }
        let response = builder.await?;
        Ok(response.blob.properties.content_length)
    }

    async fn get(&self, name: &str, snapshot: Option<DateTime<Utc>>) -> Result<Bytes> {
        let mut builder = self.blob_client(name).get();
        if let Some(versioning) = Self::versioning(snapshot) {
            builder = builder.blob_versioning(versioning);
        }
        let mut stream = builder.into_stream();
        let mut content = Vec::new();
        while let Some(chunk) = stream.next().await {
            let data = chunk?.data.collect().await?;
            content.extend_from_slice(&data);
        }
        Ok(Bytes::from(content))
    }

    async fn get_range(
        &self,
        name: &str,
        range: std::ops::Range<u64>,
        snapshot: Option<DateTime<Utc>>,
    ) -> Result<Bytes> {
        let mut builder = self.blob_client(name).get().range(range);
        if let Some(versioning) = Self::versioning(snapshot) {
            builder = builder.blob_versioning(versioning);
        }
        let mut stream = builder.into_stream();
        let mut content = Vec::new();
        while let Some(chunk) = stream.next().await {
            let data = chunk?.data.collect().await?;
            content.extend_from_slice(&data);
        }
        Ok(Bytes::from(content))
    }

    async fn download_to_file(
        &self,
        name: &str,
        file: &mut tokio::fs::File,
        snapshot: Option<DateTime<Utc>>,
        transfer: &TransferOptions,
    ) -> Result<()> {
        let mut builder = self.blob_client(name).get().chunk_size(transfer.block_size);
        if let Some(versioning) = Self::versioning(snapshot) {
            builder = builder.blob_versioning(versioning);
        }
        let mut stream = builder.into_stream();
        while let Some(chunk) = self.bounded(name, transfer.try_timeout, stream.next()).await? {
            let chunk = chunk?;
            let data = self
                .bounded(name, transfer.try_timeout, chunk.data.collect())
                .await??;
            file.write_all(&data)
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
        transfer: &TransferOptions,
    ) -> Result<()> {
        let client = self.blob_client(name);
        let mut block_list = BlockList::default();
        let mut buf = vec![0u8; transfer.block_size as usize];
        let mut index = 0u64;
        loop {
            let filled = fill_block(reader, &mut buf)
                .await
                .map_err(|err| Error::StorageReadError("read of upload stream", name.into(), err))?;
            if filled == 0 {
                break;
            }
            // Block ids must share one length within a blob.
            let block_id = BlockId::new(format!("{index:032}"));
            let body = Bytes::copy_from_slice(&buf[..filled]);
            self.bounded(name, transfer.try_timeout, async {
                client.put_block(block_id.clone(), body).await
            })
            .await??;
            block_list.blocks.push(BlobBlockType::Uncommitted(block_id));
            index += 1;
        }
        tracing::debug!(blob = name, blocks = block_list.blocks.len(), "committing block list");
        self.bounded(name, transfer.try_timeout, async {
            client.put_block_list(block_list).await
        })
        .await??;
        Ok(())
    }

    async fn create_snapshot(&self, name: &str) -> Result<DateTime<Utc>> {
        let response = self.blob_client(name).snapshot().await?;
        snapshot::parse(&response.snapshot.to_string())
    }

    fn url(&self, name: &str) -> Result<url::Url> {
        Ok(self.blob_client(name).url()?)
    }
}
