use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use mongodb::error::ErrorKind;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database, IndexModel};

use super::{CommentFilter, CommentRecord, CommentStore, TaskStore};

pub const COMMENTS_COLLECTION: &str = "comments";
pub const TASKS_COLLECTION: &str = "tasks";

const TASK_ID_INDEX: &str = "task_id_index";

// MongoDB "NamespaceNotFound", returned by collMod when the collection does
// not exist yet.
const NAMESPACE_NOT_FOUND: i32 = 26;

/// Comment persistence over a single `comments` collection.
#[derive(Clone)]
pub struct MongoCommentStore {
    db: Database,
    collection: Collection<CommentRecord>,
}

impl MongoCommentStore {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<CommentRecord>(COMMENTS_COLLECTION),
        }
    }

    /// Creates the `task_id` secondary index and installs the collection's
    /// schema validator. Idempotent: an existing collection is modified via
    /// `collMod`; a missing one is created with the validator attached.
    ///
    /// Failures are logged and startup continues — the store degrades to
    /// unvalidated writes rather than refusing to boot.
    pub async fn ensure_schema(&self) {
        let index = IndexModel::builder()
            .keys(doc! { "task_id": 1 })
            .options(
                mongodb::options::IndexOptions::builder()
                    .name(TASK_ID_INDEX.to_string())
                    .build(),
            )
            .build();
        if let Err(err) = self.collection.create_index(index).await {
            tracing::error!("Failed to create task_id index on comments: {}", err);
        }

        let command = doc! {
            "collMod": COMMENTS_COLLECTION,
            "validator": schema_validator(),
            "validationLevel": "strict",
        };
        match self.db.run_command(command).await {
            Ok(_) => {}
            Err(err) if command_error_code(&err) == Some(NAMESPACE_NOT_FOUND) => {
                if let Err(err) = self
                    .db
                    .create_collection(COMMENTS_COLLECTION)
                    .validator(schema_validator())
                    .await
                {
                    tracing::error!("Failed to create comments collection: {}", err);
                }
            }
            Err(err) => {
                tracing::error!("Failed to apply validator on comments: {}", err);
            }
        }
    }
}

#[async_trait]
impl CommentStore for MongoCommentStore {
    async fn find_one(&self, filter: &CommentFilter) -> anyhow::Result<Option<CommentRecord>> {
        let Some(filter) = filter_document(filter) else {
            return Ok(None);
        };
        Ok(self.collection.find_one(filter).await?)
    }

    async fn insert_one(&self, record: &CommentRecord) -> anyhow::Result<String> {
        let result = self.collection.insert_one(record).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow::anyhow!("insert did not return an object id"))?;
        Ok(id.to_hex())
    }

    async fn find_one_and_update(
        &self,
        filter: &CommentFilter,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<CommentRecord>> {
        let Some(filter) = filter_document(filter) else {
            return Ok(None);
        };
        let update = doc! {
            "$set": {
                "text": text,
                "updated_at": bson::DateTime::from_chrono(updated_at),
            }
        };
        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn delete_one(&self, filter: &CommentFilter) -> anyhow::Result<u64> {
        let Some(filter) = filter_document(filter) else {
            return Ok(0);
        };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count)
    }
}

/// Task existence lookups against the `tasks` collection.
#[derive(Clone)]
pub struct MongoTaskStore {
    collection: Collection<Document>,
}

impl MongoTaskStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Document>(TASKS_COLLECTION),
        }
    }
}

#[async_trait]
impl TaskStore for MongoTaskStore {
    async fn task_exists(&self, task_id: &str) -> anyhow::Result<bool> {
        let Ok(oid) = ObjectId::parse_str(task_id) else {
            return Ok(false);
        };
        let task = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(task.is_some())
    }
}

fn schema_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["task_id", "account_id", "text", "created_at", "updated_at"],
            "properties": {
                "task_id": { "bsonType": "string" },
                "account_id": { "bsonType": "string" },
                "text": { "bsonType": "string" },
                "created_at": { "bsonType": "date" },
                "updated_at": { "bsonType": "date" },
            },
        }
    }
}

/// Builds the match document for a compound-key filter. A comment id that is
/// not a valid object id can never match a stored record, so the whole filter
/// resolves to `None` and callers treat the operation as a no-match.
fn filter_document(filter: &CommentFilter) -> Option<Document> {
    let mut document = Document::new();
    if let Some(comment_id) = &filter.comment_id {
        let oid = ObjectId::parse_str(comment_id).ok()?;
        document.insert("_id", oid);
    }
    if let Some(task_id) = &filter.task_id {
        document.insert("task_id", task_id);
    }
    if let Some(account_id) = &filter.account_id {
        document.insert("account_id", account_id);
    }
    Some(document)
}

fn command_error_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}
