//! PostgreSQL-backed bar store.
//!
//! Every bar lives in the `bars` table as a JSONB document (`doc`). The
//! `place_id` column is generated from `doc->>'placeId'` and carries the
//! UNIQUE constraint, so duplicate detection is left to the database.
//!
//! - Filters use JSONB containment (`doc @> $1`)
//! - Updates merge the patch into the stored document (`doc || $2`)
//! - Batch inserts are ordered and run outside a transaction
use crate::domain::model::{Bar, BarFields, BarFilter, BarId, BarPatch};
use crate::domain::ports::{BarStore, StoreResult};
use crate::utils::error::StoreError;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

type BarRow = (Uuid, Json<BarFields>);

fn into_bar((id, Json(fields)): BarRow) -> Bar {
    Bar::new(BarId::from(id), fields)
}

/// Maps a write failure, turning the `placeId` constraint into a unique violation.
fn map_write_error(err: sqlx::Error, place_id: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation {
                place_id: place_id.to_string(),
            };
        }
    }
    StoreError::Database(err)
}

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an existing pool. The schema must already be migrated.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Connected to Postgres (max {} connections)", max_connections);
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;

        tracing::info!("Database migrations applied");
        Ok(())
    }

    async fn insert(&self, fields: BarFields) -> StoreResult<Bar> {
        let id = BarId::generate();

        sqlx::query("INSERT INTO bars (id, doc) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(Json(&fields))
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &fields.place_id))?;

        Ok(Bar::new(id, fields))
    }
}

#[async_trait]
impl BarStore for PostgresStore {
    async fn insert_one(&self, fields: BarFields) -> StoreResult<Bar> {
        self.insert(fields).await
    }

    async fn insert_many(&self, records: Vec<BarFields>) -> StoreResult<Vec<Bar>> {
        let mut inserted = Vec::with_capacity(records.len());
        for fields in records {
            inserted.push(self.insert(fields).await?);
        }
        Ok(inserted)
    }

    async fn find_all(&self) -> StoreResult<Vec<Bar>> {
        let rows: Vec<BarRow> = sqlx::query_as("SELECT id, doc FROM bars ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(into_bar).collect())
    }

    async fn find_by(&self, filter: &BarFilter) -> StoreResult<Vec<Bar>> {
        let rows: Vec<BarRow> =
            sqlx::query_as("SELECT id, doc FROM bars WHERE doc @> $1 ORDER BY created_at")
                .bind(Json(filter.as_document()))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(into_bar).collect())
    }

    async fn find_by_id(&self, id: BarId) -> StoreResult<Option<Bar>> {
        let row: Option<BarRow> = sqlx::query_as("SELECT id, doc FROM bars WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(into_bar))
    }

    async fn update_by_id(&self, id: BarId, patch: &BarPatch) -> StoreResult<Option<Bar>> {
        let row: Option<BarRow> =
            sqlx::query_as("UPDATE bars SET doc = doc || $2 WHERE id = $1 RETURNING id, doc")
                .bind(id.as_uuid())
                .bind(Json(patch))
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_write_error(e, patch.place_id.as_deref().unwrap_or_default()))?;

        Ok(row.map(into_bar))
    }

    async fn delete_by_id(&self, id: BarId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM bars WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
