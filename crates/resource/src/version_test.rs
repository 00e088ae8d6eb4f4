// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::Version;

#[rstest]
fn test_snapshot_wire_form() {
    let version: Version =
        serde_json::from_str(r#"{"snapshot": "2017-01-01T01:01:01.0000000Z"}"#).unwrap();
    let timestamp = version.snapshot_timestamp().unwrap();
    assert_eq!(timestamp.timestamp(), 1483232461);
    assert_eq!(
        serde_json::to_string(&version).unwrap(),
        r#"{"snapshot":"2017-01-01T01:01:01.0000000Z"}"#
    );
}

#[rstest]
fn test_snapshot_accepts_plain_rfc3339() {
    let version: Version = serde_json::from_str(r#"{"snapshot": "2017-01-01T01:01:01Z"}"#).unwrap();
    assert_eq!(
        serde_json::to_string(&version).unwrap(),
        r#"{"snapshot":"2017-01-01T01:01:01.0000000Z"}"#
    );
}

#[rstest]
fn test_path_wire_form() {
    let version: Version =
        serde_json::from_str(r#"{"path": "example-1.2.3.json", "version": "1.2.3"}"#).unwrap();
    assert_eq!(version.blob_path(), Some("example-1.2.3.json"));
    assert_eq!(version.version_string(), Some("1.2.3"));
    assert_eq!(
        serde_json::to_string(&version).unwrap(),
        r#"{"path":"example-1.2.3.json","version":"1.2.3"}"#
    );
}

#[rstest]
fn test_path_without_version_string() {
    let version: Version = serde_json::from_str(r#"{"path": "example.json"}"#).unwrap();
    assert_eq!(version.blob_path(), Some("example.json"));
    assert_eq!(version.version_string(), None);
    assert_eq!(
        serde_json::to_string(&version).unwrap(),
        r#"{"path":"example.json"}"#
    );
}

#[rstest]
fn test_sidecar_contents() {
    let snapshot: Version =
        serde_json::from_str(r#"{"snapshot": "2017-01-01T01:01:01.0000000Z"}"#).unwrap();
    assert_eq!(snapshot.sidecar_contents(), "2017-01-01T01:01:01.0000000Z");
    let path = Version::path("example-1.2.3.json", "1.2.3");
    assert_eq!(path.sidecar_contents(), "1.2.3");
}
