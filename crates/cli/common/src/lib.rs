// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

//! Plumbing shared by the `check`, `in` and `out` executables.

mod args;

pub use args::configure_logging;

use azblob::AzureBlobStore;
use blobstore_resource::Source;
use miette::{IntoDiagnostic, Result, WrapErr};

/// Decode one protocol request from stdin.
pub fn read_request<T>() -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_reader(std::io::stdin().lock())
        .into_diagnostic()
        .wrap_err("failed to decode request")
}

/// Build the production client for the configured container.
pub fn blob_store(source: &Source) -> AzureBlobStore {
    AzureBlobStore::new(
        &source.storage_account_name,
        &source.storage_account_key,
        &source.container,
        source.base_url.as_deref(),
    )
}
