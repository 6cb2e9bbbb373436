//! Integration tests for the session and coin ledger
//!
//! These tests exercise the services against real stores on disk and
//! simulate process restarts by dropping and rebuilding the context.
//!
//! Run with: cargo test --test ledger_integration_test -- --nocapture

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use guava_core::adapters::demo::DemoIdentityProvider;
use guava_core::adapters::duckdb::DuckDbStore;
use guava_core::adapters::file::FileStore;
use guava_core::config::{Config, StorageBackend};
use guava_core::ports::KeyValueStore;
use guava_core::services::{SESSION_SLOT, STARTING_COINS, UPLOADS_SLOT};
use guava_core::{
    Error, GuavaContext, ImageFile, RestoreOutcome, UploadStatus, UploadSubmission, Vote,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn instant_config(storage: StorageBackend) -> Config {
    Config {
        storage,
        sign_in_latency: Duration::ZERO,
        upload_latency: Duration::ZERO,
    }
}

fn open_store(storage: StorageBackend, dir: &Path) -> Arc<dyn KeyValueStore> {
    match storage {
        StorageBackend::Duckdb => Arc::new(DuckDbStore::new(&dir.join("guava.duckdb")).unwrap()),
        StorageBackend::File => Arc::new(FileStore::new(&dir.join("store")).unwrap()),
    }
}

/// Build a context the way a fresh process would
fn start(storage: StorageBackend, dir: &Path) -> GuavaContext {
    let store = open_store(storage, dir);
    let provider = Arc::new(DemoIdentityProvider::new(Duration::ZERO));
    GuavaContext::with_store(instant_config(storage), store, provider).unwrap()
}

fn png(name: &str, seed: u8) -> ImageFile {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[seed; 32]);
    ImageFile::new(name, bytes)
}

fn submission(file: ImageFile, name: &str) -> UploadSubmission {
    UploadSubmission {
        file: Some(file),
        name: name.to_string(),
        consent: true,
        ..Default::default()
    }
}

const BACKENDS: [StorageBackend; 2] = [StorageBackend::Duckdb, StorageBackend::File];

// ============================================================================
// Restart Tests
// ============================================================================

#[tokio::test]
async fn test_sign_in_survives_restart() {
    for storage in BACKENDS {
        let temp_dir = TempDir::new().unwrap();

        {
            let ctx = start(storage, temp_dir.path());
            let session = ctx.session_service.sign_in().await.unwrap();
            assert_eq!(session.coins(), STARTING_COINS);
        }

        let ctx = start(storage, temp_dir.path());
        assert_eq!(ctx.restore_outcome, RestoreOutcome::Restored, "{}", storage);
        let session = ctx.session_service.current().unwrap();
        assert_eq!(session.identity().name, "Kwame Asante");
        assert_eq!(session.coins(), STARTING_COINS);
    }
}

#[tokio::test]
async fn test_credit_survives_restart() {
    for storage in BACKENDS {
        let temp_dir = TempDir::new().unwrap();

        {
            let ctx = start(storage, temp_dir.path());
            ctx.session_service.sign_in().await.unwrap();
            assert_eq!(ctx.session_service.credit(10).unwrap(), Some(STARTING_COINS + 10));
            assert_eq!(ctx.session_service.credit(5).unwrap(), Some(STARTING_COINS + 15));
        }

        let ctx = start(storage, temp_dir.path());
        assert_eq!(ctx.session_service.balance(), Some(STARTING_COINS + 15), "{}", storage);
    }
}

#[tokio::test]
async fn test_sign_out_survives_restart() {
    for storage in BACKENDS {
        let temp_dir = TempDir::new().unwrap();

        {
            let ctx = start(storage, temp_dir.path());
            ctx.session_service.sign_in().await.unwrap();
            ctx.session_service.sign_out().unwrap();
            ctx.session_service.sign_out().unwrap();
            assert!(ctx.store.get(SESSION_SLOT).unwrap().is_none());
        }

        let ctx = start(storage, temp_dir.path());
        assert_eq!(ctx.restore_outcome, RestoreOutcome::Absent, "{}", storage);
        assert!(!ctx.session_service.is_signed_in());
    }
}

#[test]
fn test_malformed_snapshot_is_discarded_on_restart() {
    for storage in BACKENDS {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = open_store(storage, temp_dir.path());
            store
                .put(SESSION_SLOT, r#"{"id":"1","name":"x","email":"y","avatar":"z","coins":-3}"#)
                .unwrap();
        }

        let ctx = start(storage, temp_dir.path());
        assert!(
            matches!(ctx.restore_outcome, RestoreOutcome::Discarded { .. }),
            "{}",
            storage
        );
        assert!(!ctx.session_service.is_signed_in());
        assert!(ctx.store.get(SESSION_SLOT).unwrap().is_none());
    }
}

// ============================================================================
// End-to-end Contributor Flow
// ============================================================================

#[tokio::test]
async fn test_contributor_flow_on_duckdb() {
    let temp_dir = TempDir::new().unwrap();

    {
        let ctx = start(StorageBackend::Duckdb, temp_dir.path());

        // Nothing works before sign-in
        assert!(matches!(
            ctx.gallery_service.vote("1", Vote::Up),
            Err(Error::NotSignedIn)
        ));
        assert!(matches!(ctx.wallet_service.summary(), Err(Error::NotSignedIn)));

        ctx.session_service.sign_in().await.unwrap();

        let entry = ctx.gallery_service.vote("1", Vote::Up).unwrap();
        assert_eq!(entry.image.upvotes, 25);

        let outcome = ctx
            .upload_service
            .submit(&submission(png("market.png", 1), "Makola <b>Market</b>"))
            .await
            .unwrap();
        assert_eq!(outcome.balance, STARTING_COINS + 1);
        assert_eq!(outcome.record.name, "Makola Market");
        assert_eq!(outcome.record.status, UploadStatus::Approved);

        // Same bytes again are rejected and earn nothing
        let err = ctx
            .upload_service
            .submit(&submission(png("again.png", 1), "Again"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUpload(_)));
        assert_eq!(ctx.session_service.balance(), Some(STARTING_COINS + 1));
    }

    let ctx = start(StorageBackend::Duckdb, temp_dir.path());
    assert_eq!(ctx.session_service.balance(), Some(STARTING_COINS + 1));

    let history = ctx.upload_service.history().unwrap();
    assert_eq!(history[0].name, "Makola Market");
    assert!(ctx.store.get(UPLOADS_SLOT).unwrap().is_some());

    let gallery = ctx.gallery_service.list().unwrap();
    let first = gallery.iter().find(|e| e.image.id == "1").unwrap();
    assert_eq!(first.my_vote, Some(Vote::Up));
    assert_eq!(first.image.upvotes, 25);

    // 126 coins = GH₵12.60, enough to withdraw without touching the ledger
    let receipt = ctx.wallet_service.withdraw("024 123 4567").unwrap();
    assert_eq!(receipt.mobile_number, "024 123 4567");
    assert_eq!(ctx.session_service.balance(), Some(STARTING_COINS + 1));
}

#[tokio::test]
async fn test_context_new_reads_settings() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{"app": {"storage": "file", "signInLatencyMs": 0, "uploadLatencyMs": 0}}"#,
    )
    .unwrap();

    let ctx = GuavaContext::new(temp_dir.path()).unwrap();
    assert_eq!(ctx.config.storage, StorageBackend::File);
    assert_eq!(ctx.store.backend(), "file");

    ctx.session_service.sign_in().await.unwrap();
    assert!(temp_dir.path().join("store").join("guava_user.json").exists());
}
