#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use taskboard_server::auth::create_access_token;
use taskboard_server::config::Config;
use taskboard_server::routes::{create_router, AppState};
use taskboard_server::service::CommentService;
use taskboard_server::store::{CommentFilter, CommentRecord, CommentStore, TaskStore};

pub const TEST_JWT_SECRET: &str = "test-secret";

/// In-memory double for the comments collection, keyed by hex object id.
/// Mutations hold the map lock for their whole duration, mirroring the
/// single-document atomicity the real store provides.
#[derive(Default)]
pub struct MemoryCommentStore {
    records: Mutex<HashMap<String, CommentRecord>>,
}

impl MemoryCommentStore {
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

fn matches(record: &CommentRecord, filter: &CommentFilter) -> bool {
    if let Some(comment_id) = &filter.comment_id {
        let hex = record.id.map(|id| id.to_hex()).unwrap_or_default();
        if &hex != comment_id {
            return false;
        }
    }
    if let Some(task_id) = &filter.task_id {
        if &record.task_id != task_id {
            return false;
        }
    }
    if let Some(account_id) = &filter.account_id {
        if &record.account_id != account_id {
            return false;
        }
    }
    true
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn find_one(&self, filter: &CommentFilter) -> anyhow::Result<Option<CommentRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.values().find(|r| matches(r, filter)).cloned())
    }

    async fn insert_one(&self, record: &CommentRecord) -> anyhow::Result<String> {
        let id = ObjectId::new();
        let mut stored = record.clone();
        stored.id = Some(id);
        self.records.lock().unwrap().insert(id.to_hex(), stored);
        Ok(id.to_hex())
    }

    async fn find_one_and_update(
        &self,
        filter: &CommentFilter,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<CommentRecord>> {
        let mut records = self.records.lock().unwrap();
        let record = records.values_mut().find(|r| matches(r, filter));
        Ok(record.map(|r| {
            r.text = text.to_string();
            r.updated_at = updated_at;
            r.clone()
        }))
    }

    async fn delete_one(&self, filter: &CommentFilter) -> anyhow::Result<u64> {
        let mut records = self.records.lock().unwrap();
        let key = records
            .iter()
            .find(|(_, r)| matches(r, filter))
            .map(|(k, _)| k.clone());
        match key {
            Some(key) => {
                records.remove(&key);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// In-memory double for the external task store.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<HashSet<String>>,
}

impl MemoryTaskStore {
    pub fn seed_task(&self) -> String {
        let id = ObjectId::new().to_hex();
        self.tasks.lock().unwrap().insert(id.clone());
        id
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn task_exists(&self, task_id: &str) -> anyhow::Result<bool> {
        Ok(self.tasks.lock().unwrap().contains(task_id))
    }
}

pub struct TestHarness {
    pub service: CommentService,
    pub comments: Arc<MemoryCommentStore>,
    pub tasks: Arc<MemoryTaskStore>,
}

pub fn harness() -> TestHarness {
    let comments = Arc::new(MemoryCommentStore::default());
    let tasks = Arc::new(MemoryTaskStore::default());
    let service = CommentService::new(comments.clone(), tasks.clone());
    TestHarness {
        service,
        comments,
        tasks,
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_db: "taskboard_test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expires_in: 900,
        port: 0,
    }
}

pub fn test_app(harness: &TestHarness) -> Router {
    create_router(AppState {
        service: harness.service.clone(),
        config: test_config(),
    })
}

pub fn access_token(account_id: &str) -> String {
    create_access_token(account_id, TEST_JWT_SECRET, 900).unwrap()
}

pub fn comments_url(account_id: &str, task_id: &str, comment_id: Option<&str>) -> String {
    let url = format!("/accounts/{account_id}/tasks/{task_id}/comments");
    match comment_id {
        Some(comment_id) => format!("{url}/{comment_id}"),
        None => url,
    }
}

/// Drives one request through the router and returns the status plus the
/// decoded JSON body (`None` for empty bodies).
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, json)
}
