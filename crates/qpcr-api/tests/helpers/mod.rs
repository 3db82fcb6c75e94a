//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p qpcr-api --test upload_test`.
//! No AWS access is needed: storage and repository are in-memory fakes that count calls.

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use qpcr_api::setup::routes;
use qpcr_api::state::AppState;
use qpcr_core::{Config, ExperimentRecord};
use qpcr_db::{DbError, DbResult, ExperimentRepository};
use qpcr_storage::{PresignedPost, PresignedPostRequest, Storage, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_BUCKET: &str = "qpcr-uploads-test";
pub const TEST_TABLE: &str = "qpcr-experiments-test";
pub const TEST_UPLOAD_URL: &str = "https://qpcr-uploads-test.s3.us-east-1.amazonaws.com/";

/// Storage fake that records every authorization request.
#[derive(Default)]
pub struct FakeStorage {
    fail: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<PresignedPostRequest>>,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PresignedPostRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn presigned_post(&self, request: &PresignedPostRequest) -> StorageResult<PresignedPost> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if self.fail {
            return Err(StorageError::CredentialsUnavailable(
                "credentials expired".to_string(),
            ));
        }

        let mut fields = request.metadata.clone();
        fields.insert("key".to_string(), request.key.clone());
        fields.insert("Content-Type".to_string(), request.content_type.clone());
        fields.insert("policy".to_string(), "cG9saWN5".to_string());
        fields.insert("x-amz-signature".to_string(), "0".repeat(64));

        Ok(PresignedPost {
            url: TEST_UPLOAD_URL.to_string(),
            fields,
            expires_at: chrono::Utc::now(),
        })
    }

    fn bucket(&self) -> &str {
        TEST_BUCKET
    }
}

/// Repository fake that keeps written records in memory.
#[derive(Default)]
pub struct FakeRepository {
    fail: bool,
    calls: AtomicUsize,
    records: Mutex<Vec<ExperimentRecord>>,
}

impl FakeRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<ExperimentRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExperimentRepository for FakeRepository {
    async fn put_experiment(&self, record: &ExperimentRecord) -> DbResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(DbError::WriteFailed(
                "ProvisionedThroughputExceededException".to_string(),
            ));
        }

        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.experiment_id == record.experiment_id) {
            return Err(DbError::AlreadyExists(record.experiment_id));
        }
        records.push(record.clone());
        Ok(())
    }
}

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage: Arc<FakeStorage>,
    pub repository: Arc<FakeRepository>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config::new(TEST_BUCKET, TEST_TABLE, "test")
}

pub fn production_config() -> Config {
    let mut config = Config::new(TEST_BUCKET, TEST_TABLE, "production");
    config.cors_origins = vec!["https://lab.example.org".to_string()];
    config
}

/// Setup test app with working fakes.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeStorage::default(), FakeRepository::default())
}

/// Setup test app with the given fakes (e.g. failing ones).
pub fn setup_test_app_with(storage: FakeStorage, repository: FakeRepository) -> TestApp {
    setup_test_app_with_config(test_config(), storage, repository)
}

/// Setup test app for an explicit configuration (e.g. a production environment).
pub fn setup_test_app_with_config(
    config: Config,
    storage: FakeStorage,
    repository: FakeRepository,
) -> TestApp {
    let storage = Arc::new(storage);
    let repository = Arc::new(repository);

    let state = Arc::new(AppState::new(
        config.clone(),
        storage.clone(),
        repository.clone(),
    ));
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        storage,
        repository,
    }
}
