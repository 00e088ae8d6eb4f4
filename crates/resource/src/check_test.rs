// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use azblob::fixtures::MemBlobStore;
use azblob::{snapshot, CopyState};
use chrono::{DateTime, Utc};
use rstest::rstest;

use super::Check;
use crate::{Error, Version};

fn timestamp(value: &str) -> DateTime<Utc> {
    snapshot::parse(value).unwrap()
}

#[rstest]
#[tokio::test]
async fn test_versions_since_sorts_out_of_order_snapshots() {
    let store = MemBlobStore::new().with_page_size(1);
    let t1 = timestamp("2017-01-01T01:01:01.0000000Z");
    let t2 = timestamp("2017-02-02T02:02:02.0000000Z");
    let t3 = timestamp("2017-03-03T03:03:03.0000000Z");
    store.put_snapshot("example.json", t1, "one").await;
    store.put_snapshot("example.json", t3, "three").await;
    store.put_snapshot("example.json", t2, "two").await;

    let check = Check::new(store);
    let versions = check
        .versions_since("example.json", t1, None)
        .await
        .unwrap();

    assert_eq!(
        versions,
        vec![
            Version::snapshot(t1),
            Version::snapshot(t2),
            Version::snapshot(t3),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn test_versions_since_is_inclusive_of_the_baseline() {
    let store = MemBlobStore::new();
    let t1 = timestamp("2017-01-01T01:01:01.0000000Z");
    let t2 = timestamp("2017-02-02T02:02:02.0000000Z");
    store.put_snapshot("example.json", t1, "one").await;
    store.put_snapshot("example.json", t2, "two").await;

    let check = Check::new(store);
    let versions = check
        .versions_since("example.json", t2, None)
        .await
        .unwrap();

    assert_eq!(versions, vec![Version::snapshot(t2)]);
}

#[rstest]
#[tokio::test]
async fn test_versions_since_treats_unsnapshotted_blob_as_zero() {
    let store = MemBlobStore::new();
    store.put_object("example.json", "live").await;

    let check = Check::new(store);
    let versions = check
        .versions_since("example.json", snapshot::zero(), None)
        .await
        .unwrap();

    assert_eq!(versions, vec![Version::snapshot(snapshot::zero())]);
}

#[rstest]
#[tokio::test]
async fn test_versions_since_requires_an_exact_name_match() {
    let store = MemBlobStore::new();
    let t1 = timestamp("2017-01-01T01:01:01.0000000Z");
    store.put_snapshot("example.json.backup", t1, "nope").await;

    let check = Check::new(store);
    let result = check.versions_since("example.json", t1, None).await;

    match result {
        Err(Error::BlobNotFound(name)) => assert_eq!(name, "example.json"),
        other => panic!("expected BlobNotFound, got: {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_versions_since_skips_unsettled_copies() {
    let store = MemBlobStore::new();
    let t1 = timestamp("2017-01-01T01:01:01.0000000Z");
    store.put_snapshot("example.json", t1, "stable").await;
    store
        .put_object_with_copy_status("example.json", "copying", CopyState::Pending)
        .await;
    store
        .put_object_with_copy_status("example.json", "broken", CopyState::Failed)
        .await;

    let check = Check::new(store);
    let versions = check
        .versions_since("example.json", snapshot::zero(), None)
        .await
        .unwrap();

    assert_eq!(versions, vec![Version::snapshot(t1)]);
}

#[rstest]
#[tokio::test]
async fn test_versions_since_falls_back_to_the_initial_version() {
    let store = MemBlobStore::new();
    let t1 = timestamp("2017-01-01T01:01:01.0000000Z");

    let check = Check::new(store);
    let versions = check
        .versions_since("example.json", snapshot::zero(), Some(Version::snapshot(t1)))
        .await
        .unwrap();

    assert_eq!(versions, vec![Version::snapshot(t1)]);
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_filters_and_sorts() {
    let store = MemBlobStore::new().with_page_size(1);
    store.put_object("example-1.2.3.json", "c").await;
    store.put_object("example-1.0.0.json", "a").await;
    store.put_object("example-1.2.0.json", "b").await;
    store.put_object("foo.json", "x").await;

    let check = Check::new(store);
    let versions = check
        .versions_since_regexp(r"example-(.*)\.json", "1.2.0")
        .await
        .unwrap();

    assert_eq!(
        versions,
        vec![
            Version::path("example-1.2.0.json", "1.2.0"),
            Version::path("example-1.2.3.json", "1.2.3"),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_returns_everything_without_a_baseline() {
    let store = MemBlobStore::new();
    store.put_object("example-2.0.0.json", "b").await;
    store.put_object("example-1.0.0.json", "a").await;

    let check = Check::new(store);
    let versions = check
        .versions_since_regexp(r"example-(.*)\.json", "")
        .await
        .unwrap();

    assert_eq!(
        versions,
        vec![
            Version::path("example-1.0.0.json", "1.0.0"),
            Version::path("example-2.0.0.json", "2.0.0"),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_ignores_an_unparsable_baseline() {
    let store = MemBlobStore::new();
    store.put_object("example-1.0.0.json", "a").await;

    let check = Check::new(store);
    let versions = check
        .versions_since_regexp(r"example-(.*)\.json", "not a version")
        .await
        .unwrap();

    assert_eq!(versions, vec![Version::path("example-1.0.0.json", "1.0.0")]);
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_fails_on_an_unparsable_candidate() {
    let store = MemBlobStore::new();
    store.put_object("example-1.0.0.json", "a").await;
    store.put_object("example-not!a!version.json", "b").await;

    let check = Check::new(store);
    let result = check.versions_since_regexp(r"example-(.*)\.json", "").await;

    assert!(matches!(result, Err(Error::InvalidVersionFormat(_))));
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_prefers_the_named_version_group() {
    let store = MemBlobStore::new();
    store.put_object("build-7-example-1.2.3.json", "a").await;

    let check = Check::new(store);
    let versions = check
        .versions_since_regexp(r"build-(\d+)-example-(?P<version>.*)\.json", "")
        .await
        .unwrap();

    assert_eq!(
        versions,
        vec![Version::path("build-7-example-1.2.3.json", "1.2.3")]
    );
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_keeps_equal_versions_in_listing_order() {
    let store = MemBlobStore::new();
    store.put_object("b/example-1.0.0.json", "b").await;
    store.put_object("a/example-1.0.0.json", "a").await;

    let check = Check::new(store);
    let versions = check
        .versions_since_regexp(r"example-(.*)\.json", "")
        .await
        .unwrap();

    assert_eq!(
        versions,
        vec![
            Version::path("b/example-1.0.0.json", "1.0.0"),
            Version::path("a/example-1.0.0.json", "1.0.0"),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_requires_a_capture_group() {
    let store = MemBlobStore::new();
    store.put_object("example-1.0.0.json", "a").await;

    let check = Check::new(store);
    let result = check.versions_since_regexp(r"example-.*\.json", "").await;

    assert!(matches!(result, Err(Error::NoMatchingBlob(_))));
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_rejects_a_bad_pattern() {
    let store = MemBlobStore::new();

    let check = Check::new(store);
    let result = check.versions_since_regexp(r"example-(.*\.json", "").await;

    assert!(matches!(result, Err(Error::InvalidPattern(_))));
}

#[rstest]
#[tokio::test]
async fn test_versions_since_regexp_reports_nothing_matching() {
    let store = MemBlobStore::new();
    store.put_object("foo.json", "x").await;

    let check = Check::new(store);
    let result = check.versions_since_regexp(r"example-(.*)\.json", "").await;

    match result {
        Err(Error::NoMatchingBlob(expr)) => assert_eq!(expr, r"example-(.*)\.json"),
        other => panic!("expected NoMatchingBlob, got: {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_round_trip_baseline_is_inclusive() {
    let store = MemBlobStore::new();
    store.put_object("example-1.2.0.json", "a").await;
    store.put_object("example-1.2.3.json", "b").await;

    let check = Check::new(store);
    let first = check
        .versions_since_regexp(r"example-(.*)\.json", "")
        .await
        .unwrap();
    let latest = first.last().unwrap().version_string().unwrap().to_string();

    let second = check
        .versions_since_regexp(r"example-(.*)\.json", &latest)
        .await
        .unwrap();
    assert_eq!(second.first(), first.last());
}
