// App state shared by every handler
use std::sync::Arc;

use crate::core::{BarService, ViewRenderer};

#[derive(Clone)]
pub struct AppState {
    pub service: BarService,
    pub renderer: Arc<dyn ViewRenderer>,
}

impl AppState {
    pub fn new(service: BarService, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self { service, renderer }
    }
}
