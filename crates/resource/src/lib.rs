// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

//! Engine logic for the `check`, `in` and `out` resource executables.
//!
//! The resource tracks a container in Azure blob storage as a versioned
//! artifact, either following the snapshot history of one literal blob
//! name or a family of blob names that embed a version string matched by
//! a regular expression.

mod archive;
mod check;
mod error;
mod get;
mod put;
mod request;
mod response;
mod semi_version;
mod version;

pub use archive::{unpack_blob, ArchiveKind};
pub use check::Check;
pub use error::{Error, Result};
pub use get::Get;
pub use put::Put;
pub use request::{
    CheckRequest,
    GetParams,
    GetRequest,
    PutParams,
    PutRequest,
    RetryParams,
    Source,
    TrackingMode,
    TryTimeout,
};
pub use response::{MetadataField, Response};
pub use semi_version::{InvalidVersionError, SemiVersion};
pub use version::Version;
