//! Guava Core - session, coin ledger and contribution logic
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Session, GalleryImage, UploadRecord, etc.)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore, IdentityProvider)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, JSON files, demo identity)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::demo::DemoIdentityProvider;
use adapters::duckdb::DuckDbStore;
use adapters::file::FileStore;
use config::{Config, StorageBackend};
use ports::{IdentityProvider, KeyValueStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    Category, GalleryImage, Identity, ImageFile, Session, SessionSnapshot, UploadRecord,
    UploadStatus, UploadSubmission, Vote, WalletSummary, WithdrawalReceipt,
};
pub use domain::result::{Error, OperationResult};
pub use services::{LogEntry, LogEvent, LoggingService, RestoreOutcome};

/// Main context for Guava operations
///
/// This is the primary entry point for all business logic. It holds
/// the slot store, configuration, and all services sharing one ledger.
pub struct GuavaContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub session_service: Arc<SessionService>,
    pub gallery_service: GalleryService,
    pub upload_service: Arc<UploadService>,
    pub wallet_service: WalletService,
    /// What was found in the session slot at startup
    pub restore_outcome: RestoreOutcome,
}

impl GuavaContext {
    /// Create a new Guava context and restore any persisted session
    pub fn new(guava_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(guava_dir)
            .with_context(|| format!("Failed to create {}", guava_dir.display()))?;
        let config = Config::load(guava_dir)?;

        let store: Arc<dyn KeyValueStore> = match config.storage {
            StorageBackend::Duckdb => Arc::new(DuckDbStore::new(&guava_dir.join("guava.duckdb"))?),
            StorageBackend::File => Arc::new(FileStore::new(&guava_dir.join("store"))?),
        };
        let provider = Arc::new(DemoIdentityProvider::new(config.sign_in_latency));

        Self::with_store(config, store, provider)
    }

    /// Assemble the services around an already opened store
    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let session_service = Arc::new(SessionService::new(Arc::clone(&store), provider));
        let restore_outcome = session_service
            .restore()
            .context("Failed to restore session")?;

        let gallery_service = GalleryService::new(Arc::clone(&store), Arc::clone(&session_service));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&store),
            Arc::clone(&session_service),
            config.upload_latency,
        ));
        let wallet_service =
            WalletService::new(Arc::clone(&session_service), Arc::clone(&upload_service));

        Ok(Self {
            config,
            store,
            session_service,
            gallery_service,
            upload_service,
            wallet_service,
            restore_outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::memory::MemoryStore;
    use std::time::Duration;

    fn instant_config() -> Config {
        Config {
            storage: StorageBackend::File,
            sign_in_latency: Duration::ZERO,
            upload_latency: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_services_share_one_ledger() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let provider = Arc::new(DemoIdentityProvider::new(Duration::ZERO));
        let ctx = GuavaContext::with_store(instant_config(), store, provider).unwrap();

        assert_eq!(ctx.restore_outcome, RestoreOutcome::Absent);
        ctx.session_service.sign_in().await.unwrap();

        let summary = ctx.wallet_service.summary().unwrap();
        assert_eq!(summary.coins, STARTING_COINS);
    }

    #[tokio::test]
    async fn test_context_restores_persisted_session() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let provider = Arc::new(DemoIdentityProvider::new(Duration::ZERO));
            let ctx =
                GuavaContext::with_store(instant_config(), Arc::clone(&store), provider).unwrap();
            ctx.session_service.sign_in().await.unwrap();
            ctx.session_service.credit(5).unwrap();
        }

        let provider = Arc::new(DemoIdentityProvider::new(Duration::ZERO));
        let ctx = GuavaContext::with_store(instant_config(), store, provider).unwrap();
        assert_eq!(ctx.restore_outcome, RestoreOutcome::Restored);
        assert_eq!(ctx.session_service.balance(), Some(STARTING_COINS + 5));
    }
}
