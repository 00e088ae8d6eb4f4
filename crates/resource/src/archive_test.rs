// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::process::Command;

use rstest::rstest;

use super::{decompressed_name, unpack_blob, ArchiveKind};
use crate::Error;

#[rstest]
#[case(&[0x1f, 0x8b, 0x08, 0x00], Some(ArchiveKind::Gzip))]
#[case(b"PK\x03\x04rest-of-zip", Some(ArchiveKind::Zip))]
#[case(b"not an archive at all", None)]
#[case(&[], None)]
fn test_sniff_by_magic(#[case] header: &[u8], #[case] expected: Option<ArchiveKind>) {
    assert_eq!(ArchiveKind::from_magic(header), expected);
}

#[rstest]
fn test_sniff_tar_magic_at_offset() {
    let mut header = vec![0u8; 512];
    header[257..262].copy_from_slice(b"ustar");
    assert_eq!(ArchiveKind::from_magic(&header), Some(ArchiveKind::Tar));
    // too short to carry the tar magic
    assert_eq!(ArchiveKind::from_magic(&header[..200]), None);
}

#[rstest]
#[case("example.tar.gz", "example.tar")]
#[case("example.tgz", "example.tar")]
#[case("example.txt.gz", "example.txt")]
#[case("example.gz", "example")]
fn test_decompressed_name(#[case] given: &str, #[case] expected: &str) {
    assert_eq!(decompressed_name(&PathBuf::from(given)), PathBuf::from(expected));
}

/// Build a `.tar.gz` holding one `payload.txt` and return its path inside
/// a fresh directory.
fn tarball_fixture(dir: &std::path::Path, archive_name: &str) -> PathBuf {
    let payload = dir.join("payload.txt");
    std::fs::write(&payload, "payload contents\n").unwrap();
    let archive = dir.join(archive_name);
    let status = Command::new("tar")
        .arg("-czf")
        .arg(&archive)
        .arg("-C")
        .arg(dir)
        .arg("payload.txt")
        .status()
        .unwrap();
    assert!(status.success());
    std::fs::remove_file(&payload).unwrap();
    archive
}

#[rstest]
#[tokio::test]
async fn test_unpack_tar_gz_extracts_and_removes_the_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = tarball_fixture(dir.path(), "example.tar.gz");

    unpack_blob(&archive).await.unwrap();

    let extracted = dir.path().join("payload.txt");
    assert_eq!(
        std::fs::read_to_string(&extracted).unwrap(),
        "payload contents\n"
    );
    assert!(!archive.exists());
    assert!(!dir.path().join("example.tar").exists());
}

#[rstest]
#[tokio::test]
async fn test_unpack_tgz_extracts_and_removes_the_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = tarball_fixture(dir.path(), "example.tgz");

    unpack_blob(&archive).await.unwrap();

    assert!(dir.path().join("payload.txt").exists());
    assert!(!archive.exists());
    assert!(!dir.path().join("example.tar").exists());
}

#[rstest]
#[tokio::test]
async fn test_unpack_plain_gzip_keeps_the_decompressed_file() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("notes.txt");
    std::fs::write(&plain, "just text\n").unwrap();
    let status = Command::new("gzip").arg(&plain).status().unwrap();
    assert!(status.success());
    let archive = dir.path().join("notes.txt.gz");
    assert!(archive.exists());

    unpack_blob(&archive).await.unwrap();

    assert_eq!(std::fs::read_to_string(&plain).unwrap(), "just text\n");
    assert!(!archive.exists());
}

#[rstest]
#[tokio::test]
async fn test_unpack_rejects_unrecognized_content() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("example.tar.gz");
    std::fs::write(&file, "this is no archive despite the name").unwrap();

    let result = unpack_blob(&file).await;

    match result {
        Err(Error::InvalidArchive(path)) => assert_eq!(path, file),
        other => panic!("expected InvalidArchive, got: {other:?}"),
    }
    // the not-an-archive file is left in place
    assert!(file.exists());
}
