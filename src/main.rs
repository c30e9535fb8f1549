use anyhow::Context;
use bar_registry::core::{BarStore, ConfigProvider, StoreBackend};
use bar_registry::utils::{logger, validation::Validate};
use bar_registry::{
    create_app, run_server, AppState, BarService, HtmlRenderer, MemoryStore, ServerConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_server_logger(config.verbose, config.json_logs);

    tracing::info!("Starting bar-registry");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 建立存儲、服務與頁面渲染器
    let store = build_store(&config).await?;
    let service = BarService::new(store);
    let renderer = Arc::new(HtmlRenderer::new(config.site_title.clone()));
    let app = create_app(AppState::new(service, renderer));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    run_server(listener, app).await?;
    Ok(())
}

async fn build_store(config: &impl ConfigProvider) -> anyhow::Result<Arc<dyn BarStore>> {
    match config.store_backend() {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; records are lost on shutdown");
            let store: Arc<dyn BarStore> = Arc::new(MemoryStore::new());
            Ok(store)
        }
        #[cfg(feature = "postgres")]
        StoreBackend::Postgres => {
            let url = config
                .database_url()
                .context("a database URL is required for the postgres store")?;
            let store = bar_registry::PostgresStore::connect(url, config.max_connections()).await?;
            store.migrate().await?;
            let store: Arc<dyn BarStore> = Arc::new(store);
            Ok(store)
        }
        #[cfg(not(feature = "postgres"))]
        StoreBackend::Postgres => {
            anyhow::bail!("bar-registry was built without the `postgres` feature")
        }
    }
}
