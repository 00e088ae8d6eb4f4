// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

//! Archive detection and extraction for downloaded blobs.
//!
//! Extraction is delegated to the system `gzip`, `tar` and `unzip` tools;
//! this module only decides which one applies and drives the two-stage
//! unpacking of gzipped tarballs.

use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./archive_test.rs"]
mod archive_test;

/// The archive formats recognized by content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    Gzip,
    Zip,
}

impl ArchiveKind {
    /// Identify the archive at `path` by its leading bytes. File
    /// extensions are never consulted.
    pub async fn sniff(path: &Path) -> Result<Option<ArchiveKind>> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|err| Error::FileOpenError(path.to_owned(), err))?;
        let mut header = [0u8; 512];
        let mut filled = 0;
        while filled < header.len() {
            let count = file
                .read(&mut header[filled..])
                .await
                .map_err(|err| Error::FileReadError(path.to_owned(), err))?;
            if count == 0 {
                break;
            }
            filled += count;
        }
        Ok(Self::from_magic(&header[..filled]))
    }

    fn from_magic(header: &[u8]) -> Option<ArchiveKind> {
        if header.len() >= 2 && header[..2] == [0x1f, 0x8b] {
            return Some(ArchiveKind::Gzip);
        }
        if header.len() >= 4 && header[..4] == *b"PK\x03\x04" {
            return Some(ArchiveKind::Zip);
        }
        // the posix tar magic sits at offset 257
        if header.len() >= 262 && &header[257..262] == b"ustar" {
            return Some(ArchiveKind::Tar);
        }
        None
    }
}

/// Unpack the archive at `path` into its containing directory and remove
/// the archive itself.
///
/// A gzip archive is decompressed in place and then unpacked once more,
/// so `.tar.gz`/`.tgz` blobs extract fully; when the decompressed content
/// is not itself an archive that terminal "invalid archive" signal is
/// swallowed and the content is left as the result.
pub async fn unpack_blob(path: &Path) -> Result<()> {
    let Some(kind) = ArchiveKind::sniff(path).await? else {
        return Err(Error::InvalidArchive(path.to_owned()));
    };
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    tracing::debug!(path = ?path, kind = ?kind, "unpacking archive");

    match kind {
        ArchiveKind::Gzip => {
            let mut cmd = Command::new("gzip");
            cmd.arg("-d").arg(path);
            run_tool("gzip", cmd).await?;
            let inner = decompressed_name(path);
            match Box::pin(unpack_blob(&inner)).await {
                Err(err) if err.is_invalid_archive() => Ok(()),
                other => other,
            }
        }
        ArchiveKind::Tar => {
            let mut cmd = Command::new("tar");
            cmd.arg("-xf").arg(path).arg("-C").arg(directory);
            run_tool("tar", cmd).await?;
            remove(path).await
        }
        ArchiveKind::Zip => {
            let mut cmd = Command::new("unzip");
            cmd.arg(path).arg("-d").arg(directory);
            run_tool("unzip", cmd).await?;
            remove(path).await
        }
    }
}

/// The path `gzip -d` leaves behind: the last extension is stripped, and
/// a `.tgz` becomes a `.tar`.
fn decompressed_name(path: &Path) -> PathBuf {
    let stem = path.file_stem().map(ToOwned::to_owned).unwrap_or_default();
    let mut inner = path.with_file_name(stem);
    if path.extension().is_some_and(|ext| ext == "tgz") {
        inner.set_extension("tar");
    }
    inner
}

async fn run_tool(name: &'static str, mut cmd: Command) -> Result<()> {
    let output = cmd
        .output()
        .await
        .map_err(|err| Error::ProcessSpawnError(name, err))?;
    if !output.status.success() {
        return Err(Error::UnpackTool(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(())
}

async fn remove(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path)
        .await
        .map_err(|err| Error::FileRemoveError(path.to_owned(), err))
}
