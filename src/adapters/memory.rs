use crate::domain::model::{Bar, BarFields, BarFilter, BarId, BarPatch};
use crate::domain::ports::{BarStore, StoreResult};
use crate::utils::error::StoreError;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-process bar collection. The uniqueness check and the write happen under
/// the same lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bars: RwLock<Vec<Bar>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique(bars: &[Bar], place_id: &str, except: Option<BarId>) -> StoreResult<()> {
    let taken = bars
        .iter()
        .any(|bar| Some(bar.id) != except && bar.fields.place_id == place_id);

    if taken {
        return Err(StoreError::UniqueViolation {
            place_id: place_id.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl BarStore for MemoryStore {
    async fn insert_one(&self, fields: BarFields) -> StoreResult<Bar> {
        let mut bars = self.bars.write().await;
        ensure_unique(&bars, &fields.place_id, None)?;

        let bar = Bar::new(BarId::generate(), fields);
        bars.push(bar.clone());
        Ok(bar)
    }

    async fn insert_many(&self, records: Vec<BarFields>) -> StoreResult<Vec<Bar>> {
        let mut bars = self.bars.write().await;
        let mut inserted = Vec::with_capacity(records.len());

        for fields in records {
            ensure_unique(&bars, &fields.place_id, None)?;
            let bar = Bar::new(BarId::generate(), fields);
            bars.push(bar.clone());
            inserted.push(bar);
        }

        Ok(inserted)
    }

    async fn find_all(&self) -> StoreResult<Vec<Bar>> {
        Ok(self.bars.read().await.clone())
    }

    async fn find_by(&self, filter: &BarFilter) -> StoreResult<Vec<Bar>> {
        let bars = self.bars.read().await;
        let mut matched = Vec::new();

        for bar in bars.iter() {
            if filter.matches(&bar.fields)? {
                matched.push(bar.clone());
            }
        }

        Ok(matched)
    }

    async fn find_by_id(&self, id: BarId) -> StoreResult<Option<Bar>> {
        let bars = self.bars.read().await;
        Ok(bars.iter().find(|bar| bar.id == id).cloned())
    }

    async fn update_by_id(&self, id: BarId, patch: &BarPatch) -> StoreResult<Option<Bar>> {
        let mut bars = self.bars.write().await;
        let Some(index) = bars.iter().position(|bar| bar.id == id) else {
            return Ok(None);
        };

        let mut fields = bars[index].fields.clone();
        patch.apply_to(&mut fields);
        ensure_unique(&bars, &fields.place_id, Some(id))?;

        bars[index].fields = fields;
        Ok(Some(bars[index].clone()))
    }

    async fn delete_by_id(&self, id: BarId) -> StoreResult<bool> {
        let mut bars = self.bars.write().await;
        let before = bars.len();
        bars.retain(|bar| bar.id != id);
        Ok(bars.len() < before)
    }
}
