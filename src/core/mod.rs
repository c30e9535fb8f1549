pub mod service;

pub use crate::domain::model::{Bar, BarFields, BarFilter, BarId, BarPatch};
pub use crate::domain::ports::{BarStore, ConfigProvider, StoreBackend, ViewRenderer};
pub use crate::utils::error::Result;
pub use service::BarService;
