use crate::domain::model::{Bar, BarFields, BarFilter, BarId, BarPatch};
use crate::domain::ports::BarStore;
use crate::utils::error::{BarError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Bar lifecycle operations on top of a [`BarStore`].
#[derive(Clone)]
pub struct BarService {
    store: Arc<dyn BarStore>,
}

/// Malformed ids are reported the same way as unknown ones.
fn parse_id(id: &str) -> Result<BarId> {
    id.parse()
        .map_err(|_| BarError::not_found(format!("Bar '{}'", id)))
}

impl BarService {
    pub fn new(store: Arc<dyn BarStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, patch: BarPatch) -> Result<Bar> {
        let fields = BarFields::from_patch(&patch)?;
        let bar = self.store.insert_one(fields).await?;

        tracing::info!("Created bar {} ({})", bar.id, bar.fields.name);
        Ok(bar)
    }

    pub async fn list(&self) -> Result<Vec<Bar>> {
        Ok(self.store.find_all().await?)
    }

    /// Fails with `NotFound` when nothing matches, unlike [`list`](Self::list).
    pub async fn list_by_neighbourhood(&self, neighbourhood: &str) -> Result<Vec<Bar>> {
        let bars = self
            .store
            .find_by(&BarFilter::neighbourhood(neighbourhood))
            .await?;

        if bars.is_empty() {
            return Err(BarError::not_found(format!(
                "Bars in neighbourhood '{}'",
                neighbourhood
            )));
        }

        tracing::debug!("Found {} bars in {}", bars.len(), neighbourhood);
        Ok(bars)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Bar> {
        let bar_id = parse_id(id)?;
        self.store
            .find_by_id(bar_id)
            .await?
            .ok_or_else(|| BarError::not_found(format!("Bar '{}'", id)))
    }

    pub async fn update(&self, id: &str, patch: BarPatch) -> Result<Bar> {
        let bar_id = parse_id(id)?;
        if patch.is_empty() {
            tracing::debug!("Update for bar {} carries no known fields", bar_id);
        }

        let bar = self
            .store
            .update_by_id(bar_id, &patch)
            .await?
            .ok_or_else(|| BarError::not_found(format!("Bar '{}'", id)))?;

        tracing::info!("Updated bar {}", bar.id);
        Ok(bar)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let bar_id = parse_id(id)?;
        if !self.store.delete_by_id(bar_id).await? {
            return Err(BarError::not_found(format!("Bar '{}'", id)));
        }

        tracing::info!("Deleted bar {}", bar_id);
        Ok(())
    }

    /// Inserts every record in one batch and echoes the submitted documents
    /// back unchanged.
    ///
    /// The batch is ordered and not atomic: the first conflict aborts it and
    /// records inserted before that point remain.
    pub async fn add_many(&self, records: Vec<Value>) -> Result<Vec<Value>> {
        let mut batch = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let patch: BarPatch = serde_json::from_value(record.clone()).map_err(|e| {
                BarError::validation(format!("record {} is not a valid bar: {}", index, e))
            })?;
            batch.push(BarFields::from_patch(&patch)?);
        }

        let inserted = self.store.insert_many(batch).await?;
        tracing::info!("Inserted {} bars in batch", inserted.len());

        Ok(records)
    }
}
