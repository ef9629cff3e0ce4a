//! Tests for the dataset catalog service
//!
//! Upload validation, visibility filtering and cleanup on failure.

use bytes::Bytes;
use chrono::{Duration, Utc};
use modelabs_application::{
    ApplicationError, DatasetFilter, DatasetService, DatasetStore, DatasetUpload,
};
use modelabs_domain::{DatasetId, DatasetStatus, DatasetVisibility};
use modelabs_infrastructure::{InMemoryBlobStore, InMemoryDatasetStore};
use modelabs_testing::{fixtures::*, mocks::*, DatasetRecordBuilder};
use std::sync::Arc;

struct Harness {
    store: Arc<InMemoryDatasetStore>,
    blobs: Arc<InMemoryBlobStore>,
    service: DatasetService,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryDatasetStore::new());
    let blobs = Arc::new(InMemoryBlobStore::new());
    let service = DatasetService::new(store.clone(), blobs.clone());
    Harness {
        store,
        blobs,
        service,
    }
}

#[tokio::test]
async fn test_upload_stores_file_and_record() {
    let h = harness();

    let record = h.service.upload(csv_upload("user-1")).await.unwrap();

    assert_eq!(record.file_type, "csv");
    assert_eq!(record.status, DatasetStatus::Ready);
    assert_eq!(record.downloads, 0);
    assert_eq!(record.file_size, 28);
    assert_eq!(
        record.storage_key,
        format!("datasets/user-1/{}/scores.csv", record.id)
    );

    let blob = h.blobs.get(&record.storage_key).unwrap();
    assert_eq!(blob.content_type.as_deref(), Some("text/csv"));
    assert_eq!(h.service.get(&record.id).await.unwrap(), record);
}

#[tokio::test]
async fn test_upload_rejections() {
    let h = harness();

    let cases: Vec<(DatasetUpload, u16)> = vec![
        (
            DatasetUpload {
                user_id: None,
                ..csv_upload("user-1")
            },
            400,
        ),
        (
            DatasetUpload {
                data: Bytes::new(),
                ..csv_upload("user-1")
            },
            400,
        ),
        (
            DatasetUpload {
                file_name: "model.bin".to_string(),
                ..csv_upload("user-1")
            },
            400,
        ),
        (
            DatasetUpload {
                user_email: Some("not-an-email".to_string()),
                ..csv_upload("user-1")
            },
            422,
        ),
    ];

    for (upload, status) in cases {
        let err = h.service.upload(upload).await.unwrap_err();
        assert_eq!(err.http_status(), status, "{:?}", err);
    }

    assert!(h.store.is_empty());
    assert!(h.blobs.keys().is_empty());
}

#[tokio::test]
async fn test_upload_size_limit() {
    let store = Arc::new(InMemoryDatasetStore::new());
    let blobs = Arc::new(InMemoryBlobStore::new());
    let service = DatasetService::new(store, blobs).with_max_upload_bytes(2 * 1024 * 1024);

    let upload = DatasetUpload {
        file_name: "big.jsonl".to_string(),
        data: Bytes::from(vec![b'x'; 2 * 1024 * 1024 + 1]),
        ..csv_upload("user-1")
    };

    let err = service.upload(upload).await.unwrap_err();
    assert_eq!(
        err,
        ApplicationError::PayloadTooLarge("File size must be less than 2MB".to_string())
    );
}

#[tokio::test]
async fn test_upload_name_defaults_to_file_name() {
    let h = harness();
    let upload = DatasetUpload {
        name: None,
        file_name: "nested/dir/prompts.TXT".to_string(),
        ..csv_upload("user-1")
    };

    let record = h.service.upload(upload).await.unwrap();
    assert_eq!(record.name, "prompts.TXT");
    assert_eq!(record.file_type, "txt");
}

#[tokio::test]
async fn test_failed_record_write_removes_file() {
    let blobs = Arc::new(MockBlobStore::new());
    let service = DatasetService::new(Arc::new(FailingDatasetStore), blobs.clone());

    let err = service.upload(csv_upload("user-1")).await.unwrap_err();

    assert_eq!(err.http_status(), 500);
    assert!(blobs.keys().is_empty());
    assert_eq!(blobs.deleted_keys().len(), 1);
}

#[tokio::test]
async fn test_failed_file_write_creates_no_record() {
    let store = Arc::new(InMemoryDatasetStore::new());
    let service = DatasetService::new(store.clone(), Arc::new(MockBlobStore::failing()));

    assert!(service.upload(csv_upload("user-1")).await.is_err());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_list_filters_and_order() {
    let h = harness();
    let now = Utc::now();

    let old = DatasetRecordBuilder::new()
        .with_name("MMLU")
        .with_tag("knowledge")
        .uploaded_at(now - Duration::hours(2))
        .build();
    let new = DatasetRecordBuilder::new()
        .with_name("GSM8K")
        .with_description("Grade school math")
        .with_tag("math")
        .uploaded_at(now)
        .build();
    let private = DatasetRecordBuilder::new()
        .with_name("internal evals")
        .with_owner("user-2")
        .private()
        .uploaded_at(now - Duration::hours(1))
        .build();

    for record in [&old, &new, &private] {
        h.store.create(record).await.unwrap();
    }

    let all = h.service.list(&DatasetFilter::default()).await.unwrap();
    assert_eq!(all.iter().map(|d| d.id).collect::<Vec<_>>(), vec![new.id, old.id]);

    let owner = DatasetFilter {
        user_id: Some("user-2".to_string()),
        ..Default::default()
    };
    let owned = h.service.list(&owner).await.unwrap();
    assert_eq!(owned.iter().map(|d| d.id).collect::<Vec<_>>(), vec![new.id, private.id, old.id]);

    let search = DatasetFilter {
        search: Some("MATH".to_string()),
        ..Default::default()
    };
    assert_eq!(h.service.list(&search).await.unwrap()[0].id, new.id);

    let tag = DatasetFilter {
        tag: Some("knowledge".to_string()),
        ..Default::default()
    };
    let tagged = h.service.list(&tag).await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, old.id);
}

#[tokio::test]
async fn test_delete_removes_file_and_record() {
    let h = harness();
    let record = h.service.upload(csv_upload("user-1")).await.unwrap();

    h.service.delete(&record.id).await.unwrap();

    assert!(h.blobs.get(&record.storage_key).is_none());
    let err = h.service.get(&record.id).await.unwrap_err();
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn test_delete_unknown_dataset() {
    let h = harness();
    let err = h.service.delete(&DatasetId::new()).await.unwrap_err();
    assert_eq!(err.message(), "Dataset not found");
}

#[tokio::test]
async fn test_private_upload_visibility() {
    let h = harness();
    let upload = DatasetUpload {
        visibility: DatasetVisibility::Private,
        ..csv_upload("owner")
    };
    h.service.upload(upload).await.unwrap();

    assert!(h.service.list(&DatasetFilter::default()).await.unwrap().is_empty());
}
