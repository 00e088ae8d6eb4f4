// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use rstest::rstest;

use super::{CheckRequest, GetRequest, PutRequest, TrackingMode, TryTimeout};

#[rstest]
#[case(r#""300ms""#, Duration::from_millis(300))]
#[case(r#""30s""#, Duration::from_secs(30))]
#[case(r#""5m""#, Duration::from_secs(300))]
#[case(r#""1h30m""#, Duration::from_secs(5400))]
#[case(r#""250ns""#, Duration::from_nanos(250))]
#[case("1500000000", Duration::from_nanos(1_500_000_000))]
fn test_try_timeout_forms(#[case] given: &str, #[case] expected: Duration) {
    let parsed: TryTimeout = serde_json::from_str(given).unwrap();
    assert_eq!(parsed.0, expected);
}

#[rstest]
#[case(r#""""#)]
#[case(r#""5""#)]
#[case(r#""m5""#)]
#[case(r#""5 minutes""#)]
#[case(r#""5x""#)]
fn test_try_timeout_rejects_garbage(#[case] given: &str) {
    let parsed: Result<TryTimeout, _> = serde_json::from_str(given);
    assert!(parsed.is_err(), "expected failure for {given}");
}

#[rstest]
fn test_check_request_minimal() {
    let request: CheckRequest = serde_json::from_str(
        r#"{
            "source": {
                "storage_account_name": "account",
                "storage_account_key": "key",
                "container": "ci",
                "versioned_file": "example.json"
            }
        }"#,
    )
    .unwrap();
    assert!(request.version.is_none());
    assert_eq!(
        request.source.tracking().unwrap(),
        TrackingMode::VersionedFile("example.json")
    );
}

#[rstest]
fn test_tracking_mode_requires_one_of() {
    let request: CheckRequest = serde_json::from_str(
        r#"{
            "source": {
                "storage_account_name": "account",
                "storage_account_key": "key",
                "container": "ci"
            }
        }"#,
    )
    .unwrap();
    assert!(request.source.tracking().is_err());
}

#[rstest]
fn test_get_request_params() {
    let request: GetRequest = serde_json::from_str(
        r#"{
            "source": {
                "storage_account_name": "account",
                "storage_account_key": "key",
                "container": "ci",
                "regexp": "example-(.*).json"
            },
            "version": {"path": "example-1.2.3.json", "version": "1.2.3"},
            "params": {
                "unpack": true,
                "block_size": 1048576,
                "retry": {"try_timeout": "5m"}
            }
        }"#,
    )
    .unwrap();
    assert!(request.params.unpack);
    assert!(!request.params.skip_download);
    let transfer = request.params.transfer();
    assert_eq!(transfer.block_size, 1048576);
    assert_eq!(transfer.try_timeout, Some(Duration::from_secs(300)));
}

#[rstest]
fn test_zero_timeout_means_no_override() {
    let request: PutRequest = serde_json::from_str(
        r#"{
            "source": {
                "storage_account_name": "account",
                "storage_account_key": "key",
                "container": "ci",
                "versioned_file": "example.json"
            },
            "params": {"file": "example.json", "retry": {"try_timeout": 0}}
        }"#,
    )
    .unwrap();
    let transfer = request.params.transfer();
    assert_eq!(transfer.block_size, azblob::DEFAULT_BLOCK_SIZE);
    assert_eq!(transfer.try_timeout, None);
}
