// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use azblob::{snapshot, BlobStore};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use regex::Regex;

use crate::semi_version::SemiVersion;
use crate::{Error, Result, Version};

#[cfg(test)]
#[path = "./check_test.rs"]
mod check_test;

/// Discovers versions of the tracked artifact at or after a baseline.
pub struct Check<S> {
    store: S,
}

impl<S: BlobStore> Check<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every snapshot of the literal `filename` taken at or after
    /// `baseline`, oldest first.
    ///
    /// A record with no snapshot is the never-snapshotted live blob and
    /// counts as the zero snapshot. When `filename` does not exist at all
    /// the `initial` version, if given, is reported as the sole version so
    /// that a brand-new pipeline has something to fetch; otherwise the
    /// blob's absence is an error.
    pub async fn versions_since(
        &self,
        filename: &str,
        baseline: DateTime<Utc>,
        initial: Option<Version>,
    ) -> Result<Vec<Version>> {
        let mut found = false;
        let mut timestamps = Vec::new();
        let mut pages = self.store.pages(Some(filename));
        while let Some(page) = pages.try_next().await? {
            for record in page.blobs {
                if !record.is_settled() {
                    // skip blobs which are still being copied
                    continue;
                }
                if record.name != filename {
                    continue;
                }
                found = true;
                let taken = record.snapshot.unwrap_or_else(snapshot::zero);
                if taken >= baseline {
                    timestamps.push(taken);
                }
            }
        }

        if !found {
            return match initial {
                Some(version) => Ok(vec![version]),
                None => Err(Error::BlobNotFound(filename.to_string())),
            };
        }

        timestamps.sort_unstable();
        Ok(timestamps.into_iter().map(Version::snapshot).collect())
    }

    /// Every object whose name matches `expr` with a version capture at
    /// or after `current`, ordered oldest first by parsed version.
    ///
    /// The version substring is the capture group named `version` when
    /// the pattern defines one, the first group otherwise. A candidate
    /// whose capture fails to parse aborts the whole call; a `current`
    /// baseline that fails to parse only disables the baseline filter.
    /// Candidates with equal versions are all retained, in listing order.
    pub async fn versions_since_regexp(&self, expr: &str, current: &str) -> Result<Vec<Version>> {
        let matcher = Regex::new(expr)?;
        let baseline = if current.is_empty() {
            None
        } else {
            SemiVersion::parse(current).ok()
        };

        let mut candidates = Vec::new();
        let mut pages = self.store.pages(None);
        while let Some(page) = pages.try_next().await? {
            for record in page.blobs {
                if !record.is_settled() {
                    continue;
                }
                let Some(captures) = matcher.captures(&record.name) else {
                    continue;
                };
                if captures.len() < 2 {
                    // no capture group, so no usable version substring
                    continue;
                }
                let matched = captures
                    .name("version")
                    .or_else(|| captures.get(1))
                    .map(|group| group.as_str())
                    .unwrap_or_default();
                let parsed = SemiVersion::parse(matched)?;
                let newer = match &baseline {
                    None => true,
                    Some(baseline) => parsed >= *baseline,
                };
                if newer {
                    candidates.push((parsed, record.name));
                }
            }
        }

        if candidates.is_empty() {
            return Err(Error::NoMatchingBlob(expr.to_string()));
        }

        // stable sort: equal versions keep their listing order
        candidates.sort_by(|left, right| left.0.cmp(&right.0));
        Ok(candidates
            .into_iter()
            .map(|(parsed, name)| Version::path(name, parsed.to_string()))
            .collect())
    }
}
