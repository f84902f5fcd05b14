// SQLite DocumentStore Implementation
//
// Generic document table keyed by (collection, id). Equality filters are
// applied with json_extract over the JSON data column; pages are ordered by
// the primary key, which is what makes `id > cursor` a stable continuation.

use async_trait::async_trait;
use jobcast_core::error::{AppError, Result};
use jobcast_core::port::{DocId, Document, DocumentStore, Filter};
use sqlx::SqlitePool;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => AppError::Store(format!(
                "Database error [{}]: {}",
                code.as_ref(),
                db_err.message()
            )),
            None => AppError::Store(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::RowNotFound => AppError::Store("Row not found".to_string()),
        _ => AppError::Store(err.to_string()),
    }
}

// Filter fields end up inside json_extract paths, so they must be plain
// identifiers
fn validate_field(field: &str) -> Result<()> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::Store(format!("Invalid filter field: {}", field)));
    }
    Ok(())
}

pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a document. Not part of the DocumentStore port
    /// (the notify engine is read-only); used by seeding flows and tests.
    pub async fn upsert(&self, collection: &str, document: &Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data) VALUES (?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(collection)
        .bind(&document.id)
        .bind(document.data.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        page_size: usize,
        after: Option<&DocId>,
    ) -> Result<Vec<Document>> {
        let mut sql = String::from("SELECT id, data FROM documents WHERE collection = ?");
        for filter in filters {
            validate_field(&filter.field)?;
            sql.push_str(&format!(
                " AND json_extract(data, '$.{}') = ?",
                filter.field
            ));
        }
        if after.is_some() {
            sql.push_str(" AND id > ?");
        }
        sql.push_str(" ORDER BY id LIMIT ?");

        let mut query = sqlx::query_as::<_, (String, String)>(&sql).bind(collection);
        for filter in filters {
            query = match &filter.value {
                serde_json::Value::Bool(b) => query.bind(*b),
                serde_json::Value::String(s) => query.bind(s.clone()),
                serde_json::Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        query.bind(i)
                    } else {
                        query.bind(n.as_f64().unwrap_or(0.0))
                    }
                }
                other => query.bind(other.to_string()),
            };
        }
        if let Some(cursor) = after {
            query = query.bind(cursor.clone());
        }
        query = query.bind(page_size as i64);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|(id, data)| {
                let value = serde_json::from_str(&data)?;
                Ok(Document::new(id, value))
            })
            .collect()
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        match row {
            Some((data,)) => {
                let value = serde_json::from_str(&data)?;
                Ok(Some(Document::new(id.to_string(), value)))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_migrations;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    // Single-connection pool so :memory: databases are shared across queries
    async fn memory_store() -> SqliteDocumentStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteDocumentStore::new(pool)
    }

    fn user_doc(id: &str, role: &str, available: bool) -> Document {
        Document::new(
            id,
            json!({"role": role, "isAvailable": available, "fcmToken": format!("tok-{}", id)}),
        )
    }

    #[tokio::test]
    async fn test_query_applies_equality_filters() {
        let store = memory_store().await;
        store.upsert("users", &user_doc("u1", "worker", true)).await.unwrap();
        store.upsert("users", &user_doc("u2", "worker", false)).await.unwrap();
        store.upsert("users", &user_doc("u3", "customer", true)).await.unwrap();

        let filters = [
            Filter::eq("role", "worker"),
            Filter::eq("isAvailable", true),
        ];
        let page = store.query("users", &filters, 10, None).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "u1");
    }

    #[tokio::test]
    async fn test_query_orders_by_id() {
        let store = memory_store().await;
        store.upsert("users", &user_doc("u3", "worker", true)).await.unwrap();
        store.upsert("users", &user_doc("u1", "worker", true)).await.unwrap();
        store.upsert("users", &user_doc("u2", "worker", true)).await.unwrap();

        let page = store.query("users", &[], 10, None).await.unwrap();

        let ids: Vec<&str> = page.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
    }

    #[tokio::test]
    async fn test_cursor_pagination_walks_the_full_set() {
        let store = memory_store().await;
        for i in 1..=5 {
            store
                .upsert("users", &user_doc(&format!("u{}", i), "worker", true))
                .await
                .unwrap();
        }

        let mut collected = Vec::new();
        let mut cursor: Option<DocId> = None;
        loop {
            let page = store
                .query("users", &[], 2, cursor.as_ref())
                .await
                .unwrap();
            if page.is_empty() {
                break;
            }
            cursor = page.last().map(|d| d.id.clone());
            collected.extend(page.into_iter().map(|d| d.id));
        }

        assert_eq!(collected, vec!["u1", "u2", "u3", "u4", "u5"]);
    }

    #[tokio::test]
    async fn test_query_respects_page_size() {
        let store = memory_store().await;
        for i in 1..=5 {
            store
                .upsert("users", &user_doc(&format!("u{}", i), "worker", true))
                .await
                .unwrap();
        }

        let page = store.query("users", &[], 3, None).await.unwrap();
        assert_eq!(page.len(), 3);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = memory_store().await;
        store.upsert("users", &user_doc("u1", "customer", false)).await.unwrap();

        let found = store.get_by_id("users", "u1").await.unwrap();
        assert_eq!(found.unwrap().data["role"], "customer");

        let missing = store.get_by_id("users", "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = memory_store().await;
        store.upsert("users", &user_doc("x1", "worker", true)).await.unwrap();

        let page = store.query("jobs", &[], 10, None).await.unwrap();
        assert!(page.is_empty());
        assert!(store.get_by_id("jobs", "x1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_data() {
        let store = memory_store().await;
        store.upsert("users", &user_doc("u1", "worker", true)).await.unwrap();
        store
            .upsert("users", &Document::new("u1", json!({"role": "worker", "isAvailable": false})))
            .await
            .unwrap();

        let doc = store.get_by_id("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.data["isAvailable"], false);
    }

    #[tokio::test]
    async fn test_invalid_filter_field_is_rejected() {
        let store = memory_store().await;
        let filters = [Filter::eq("role') OR 1=1 --", "worker")];

        let result = store.query("users", &filters, 10, None).await;
        assert!(result.is_err());
    }
}
