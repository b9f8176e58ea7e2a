//! Behavioral tests for object transfer flows, run against a mocked remote
//! store so every remote call is accounted for.

use std::path::Path;
use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use object_store_client::{BucketHandle, MockRemoteStore, ObjectStoreClient, ObjectStoreError};

fn client_with(source: MockRemoteStore, destination: Option<MockRemoteStore>) -> ObjectStoreClient {
    let source = BucketHandle::new("ingest", Arc::new(source));
    let destination =
        destination.map(|mock| BucketHandle::new("archive", Arc::new(mock)));
    ObjectStoreClient::from_handles(source, destination)
}

#[tokio::test]
async fn copy_without_destination_fails_before_any_remote_call() {
    // No expectations on the mock: any remote call would panic the test.
    let client = client_with(MockRemoteStore::new(), None);

    let err = client
        .copy_bucket_to_bucket("data/", "archive/")
        .await
        .unwrap_err();
    assert!(matches!(err, ObjectStoreError::DestinationNotConfigured));
    assert!(err.is_configuration());
}

#[tokio::test]
async fn list_objects_with_no_matches_is_an_empty_listing() {
    let mut source = MockRemoteStore::new();
    source
        .expect_list_objects()
        .withf(|bucket, prefix| bucket == "ingest" && prefix == "missing/")
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let client = client_with(source, None);

    let keys = client.list_objects("missing/").await.unwrap();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn copy_transfers_each_object_and_deletes_both_markers() {
    let mut source = MockRemoteStore::new();
    source
        .expect_list_objects()
        .withf(|bucket, prefix| bucket == "ingest" && prefix == "data/")
        .times(1)
        .returning(|_, _| Ok(vec!["data/1.csv".to_owned(), "data/2.csv".to_owned()]));
    source
        .expect_get_object()
        .withf(|bucket, key| bucket == "ingest" && (key == "data/1.csv" || key == "data/2.csv"))
        .times(2)
        .returning(|_, _| Ok(ByteStream::from_static(b"payload")));
    source
        .expect_delete_object()
        .withf(|bucket, key| bucket == "ingest" && key == "data/")
        .times(1)
        .returning(|_, _| Ok(()));

    let mut destination = MockRemoteStore::new();
    destination
        .expect_put_object()
        .withf(|bucket, key, _| bucket == "archive" && key == "archive/1.csv")
        .times(1)
        .returning(|_, _, _| Ok(()));
    destination
        .expect_put_object()
        .withf(|bucket, key, _| bucket == "archive" && key == "archive/2.csv")
        .times(1)
        .returning(|_, _, _| Ok(()));
    destination
        .expect_delete_object()
        .withf(|bucket, key| bucket == "archive" && key == "archive/")
        .times(1)
        .returning(|_, _| Ok(()));

    let client = client_with(source, Some(destination));
    client
        .copy_bucket_to_bucket("data/", "archive/")
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_transfer_keeps_destination_marker_and_cleans_source_marker() {
    let mut source = MockRemoteStore::new();
    source
        .expect_list_objects()
        .withf(|bucket, prefix| bucket == "ingest" && prefix == "data/")
        .times(1)
        .returning(|_, _| Ok(vec!["data/1.csv".to_owned(), "data/2.csv".to_owned()]));
    source
        .expect_get_object()
        .times(2)
        .returning(|_, _| Ok(ByteStream::from_static(b"payload")));
    source
        .expect_delete_object()
        .withf(|bucket, key| bucket == "ingest" && key == "data/")
        .times(1)
        .returning(|_, _| Ok(()));

    let mut destination = MockRemoteStore::new();
    destination
        .expect_put_object()
        .withf(|_, key, _| key == "archive/1.csv")
        .times(1)
        .returning(|_, _, _| Ok(()));
    destination
        .expect_put_object()
        .withf(|_, key, _| key == "archive/2.csv")
        .times(1)
        .returning(|_, _, _| Err(ObjectStoreError::Stream("simulated put failure".to_owned())));
    // No delete expectation: deleting the destination marker after a failed
    // copy would panic here.
    destination.expect_delete_object().times(0);

    let client = client_with(source, Some(destination));
    let err = client
        .copy_bucket_to_bucket("data/", "archive/")
        .await
        .unwrap_err();
    assert!(matches!(err, ObjectStoreError::Stream(_)));
}

#[tokio::test]
async fn copy_of_empty_prefix_reports_no_work_done() {
    let mut source = MockRemoteStore::new();
    source
        .expect_list_objects()
        .withf(|bucket, prefix| bucket == "ingest" && prefix == "data/")
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    source.expect_delete_object().times(0);

    let destination = MockRemoteStore::new();

    let client = client_with(source, Some(destination));
    let err = client
        .copy_bucket_to_bucket("data/", "archive/")
        .await
        .unwrap_err();
    match err {
        ObjectStoreError::EmptyPrefix { bucket, prefix } => {
            assert_eq!(bucket, "ingest");
            assert_eq!(prefix, "data/");
        }
        other => panic!("expected EmptyPrefix, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_object_issues_one_delete_for_the_joined_key() {
    let mut source = MockRemoteStore::new();
    source
        .expect_delete_object()
        .withf(|bucket, key| bucket == "ingest" && key == "logs/x.log")
        .times(1)
        .returning(|_, _| Ok(()));
    let client = client_with(source, None);

    client.delete_object("logs/", "x.log").await.unwrap();
}

#[tokio::test]
async fn delete_object_with_empty_file_name_deletes_the_prefix_key() {
    let mut source = MockRemoteStore::new();
    source
        .expect_delete_object()
        .withf(|bucket, key| bucket == "ingest" && key == "logs/archive.tgz")
        .times(1)
        .returning(|_, _| Ok(()));
    let client = client_with(source, None);

    client.delete_object("logs/archive.tgz", "").await.unwrap();
}

#[tokio::test]
async fn upload_targets_the_source_bucket_under_the_given_key() {
    let mut source = MockRemoteStore::new();
    source
        .expect_upload_file()
        .withf(|bucket, key, path| {
            bucket == "ingest"
                && key == "incoming/report.csv"
                && path == Path::new("/tmp/report.csv")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let client = client_with(source, None);

    client
        .upload_local_file("/tmp/report.csv", "incoming/report.csv")
        .await
        .unwrap();
}

#[tokio::test]
async fn download_joins_prefix_with_file_name_and_dir_with_file_name() {
    let mut source = MockRemoteStore::new();
    source
        .expect_download_file()
        .withf(|bucket, key, path| {
            bucket == "ingest" && key == "logs/x.log" && path == Path::new("/var/data/x.log")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let client = client_with(source, None);

    client
        .download_to_local("logs/", "x.log", "/var/data")
        .await
        .unwrap();
}

#[tokio::test]
async fn transfer_errors_surface_to_the_caller() {
    let mut source = MockRemoteStore::new();
    source
        .expect_list_objects()
        .times(1)
        .returning(|_, _| Err(ObjectStoreError::Stream("connection reset".to_owned())));
    let client = client_with(source, None);

    let err = client.list_objects("data/").await.unwrap_err();
    assert!(matches!(err, ObjectStoreError::Stream(_)));
    assert!(!err.is_configuration());
}
