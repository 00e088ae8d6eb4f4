// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use thiserror::Error;

#[cfg(test)]
#[path = "./semi_version_test.rs"]
mod semi_version_test;

pub const VERSION_SEP: &str = ".";

/// Denotes that a version string could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid version: [{given}]")]
pub struct InvalidVersionError {
    pub given: String,
}

impl InvalidVersionError {
    fn new<S: Into<String>>(given: S) -> Self {
        Self {
            given: given.into(),
        }
    }
}

/// One dot-separated component of a version.
///
/// The derived ordering is the comparison rule: numeric segments compare
/// numerically, text segments lexically, and any numeric segment orders
/// before any text segment.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Segment {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Number(value) => write!(f, "{value}"),
            Segment::Text(value) => f.write_str(value),
        }
    }
}

/// A semi-semantic version: any positive number of dot-separated numeric
/// or alphanumeric segments.
///
/// Versions compare segment-wise from the left; when one version is a
/// prefix of the other the shorter one is lower, so `1.2 < 1.2.0`. Two
/// versions are equal only when every segment matches.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SemiVersion {
    pub segments: Vec<Segment>,
}

impl SemiVersion {
    /// Parse the given string as a version.
    ///
    /// Segments may only contain `[0-9A-Za-z_-]`; fully numeric segments
    /// are normalized, so `01.2` renders back as `1.2`.
    pub fn parse<S: AsRef<str>>(given: S) -> Result<Self, InvalidVersionError> {
        let given = given.as_ref();
        if given.is_empty() {
            return Err(InvalidVersionError::new(given));
        }
        let mut segments = Vec::new();
        for part in given.split(VERSION_SEP) {
            if part.is_empty() {
                return Err(InvalidVersionError::new(given));
            }
            if !part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(InvalidVersionError::new(given));
            }
            if part.chars().all(|c| c.is_ascii_digit()) {
                let number = part
                    .parse()
                    .map_err(|_| InvalidVersionError::new(given))?;
                segments.push(Segment::Number(number));
            } else {
                segments.push(Segment::Text(part.to_string()));
            }
        }
        Ok(SemiVersion { segments })
    }
}

impl std::fmt::Display for SemiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<_> = self.segments.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(VERSION_SEP))
    }
}

impl FromStr for SemiVersion {
    type Err = InvalidVersionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for SemiVersion {
    type Error = InvalidVersionError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Self::parse(value)
    }
}
