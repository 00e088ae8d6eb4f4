// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::Version;

/// One name/value pair surfaced in the pipeline UI.
#[derive(Clone, Debug, Serialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

impl MetadataField {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The stdout payload of the `in` and `out` executables.
#[derive(Clone, Debug, Serialize)]
pub struct Response {
    pub version: Version,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataField>,
}
