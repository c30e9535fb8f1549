use crate::domain::model::{Bar, BarFields, BarFilter, BarId, BarPatch};
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document-oriented persistence for bar records.
///
/// Implementations must reject any insert or update that would leave two
/// records sharing a `placeId` with [`StoreError::UniqueViolation`].
#[async_trait]
pub trait BarStore: Send + Sync {
    async fn insert_one(&self, fields: BarFields) -> StoreResult<Bar>;

    /// Inserts in order and stops at the first failure. Records written
    /// before the failure stay persisted.
    async fn insert_many(&self, records: Vec<BarFields>) -> StoreResult<Vec<Bar>>;

    async fn find_all(&self) -> StoreResult<Vec<Bar>>;

    async fn find_by(&self, filter: &BarFilter) -> StoreResult<Vec<Bar>>;

    async fn find_by_id(&self, id: BarId) -> StoreResult<Option<Bar>>;

    /// Merges `patch` into the stored document. `None` when the id is unknown.
    async fn update_by_id(&self, id: BarId, patch: &BarPatch) -> StoreResult<Option<Bar>>;

    /// `false` when nothing was deleted.
    async fn delete_by_id(&self, id: BarId) -> StoreResult<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StoreBackend {
    Memory,
    Postgres,
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> String;
    fn store_backend(&self) -> StoreBackend;
    fn database_url(&self) -> Option<&str>;
    fn max_connections(&self) -> u32;
}

/// Turns a named view and its data context into an HTML page.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, context: &Value) -> Result<String>;
}
