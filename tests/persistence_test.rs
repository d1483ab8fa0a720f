//! Integration tests for collection persistence

mod helpers;

use std::sync::Arc;

use codebridge::{CollectionStatus, DomainError, RagService, SqliteVectorStore, VectorStore};
use helpers::embedders::CountingEmbedder;
use helpers::fixtures::{config_in, ingestion_service, scenario_documents, write_docs, DOC_B};

#[tokio::test]
async fn test_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let (store, status) = SqliteVectorStore::open_or_create(dir.path(), "code_docs", 2)
        .await
        .unwrap();
    assert_eq!(status, CollectionStatus::Created);
    assert!(dir.path().join("code_docs").join("index.db").is_file());

    let store = Arc::new(store);
    ingestion_service(Arc::new(CountingEmbedder::default()), store.clone())
        .ingest(&scenario_documents())
        .await
        .unwrap();
    assert_eq!(store.count().await.unwrap(), 4);
    store.close().await;
    drop(store);

    let (reopened, status) = SqliteVectorStore::open_or_create(dir.path(), "code_docs", 2)
        .await
        .unwrap();
    assert_eq!(status, CollectionStatus::Loaded);
    assert_eq!(reopened.count().await.unwrap(), 4);
    assert_eq!(reopened.dimension().await.unwrap(), Some(384));

    let record = reopened.get("A_1").await.unwrap().unwrap();
    assert_eq!(record.text, "Para1\n\nPara2");
    assert_eq!(record.vector.len(), 384);
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let dir = tempfile::tempdir().unwrap();

    let (react, _) = SqliteVectorStore::open_or_create(dir.path(), "react", 1).await.unwrap();
    let (swift, _) = SqliteVectorStore::open_or_create(dir.path(), "swift", 1).await.unwrap();

    let react = Arc::new(react);
    ingestion_service(Arc::new(CountingEmbedder::default()), react.clone())
        .ingest(&scenario_documents())
        .await
        .unwrap();

    assert_eq!(react.count().await.unwrap(), 4);
    assert_eq!(swift.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_collection_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = SqliteVectorStore::open_or_create(dir.path(), "../escape", 1).await;
    assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
}

#[tokio::test]
async fn test_unusable_data_dir_is_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let result = SqliteVectorStore::open_or_create(&blocker, "code_docs", 1).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_rag_service_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_docs(
        &config.ingestion.docs_dir,
        &[
            ("a.txt", "Para1\n\nPara2\n\nPara3"),
            ("b.txt", DOC_B),
        ],
    );

    let service = RagService::open(&config).await.unwrap();
    assert!(service.status().is_new());
    let report = service.ingest_configured_docs().await.unwrap();
    assert_eq!(report.documents_processed, 2);
    service.close().await;
    drop(service);

    let service = RagService::open(&config).await.unwrap();
    assert_eq!(service.status(), CollectionStatus::Loaded);
    assert_eq!(service.count().await.unwrap(), report.chunks_added);

    let results = service.query(DOC_B, Some(1)).await.unwrap();
    assert_eq!(results[0].id, "b_0");
    assert_eq!(results[0].metadata.source, "b.txt");
}
