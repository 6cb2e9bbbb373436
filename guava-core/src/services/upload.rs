//! Upload service - image submissions and upload history
//!
//! A submission is validated, "uploaded" (a fixed simulated delay),
//! approved on the spot and rewarded through the coin ledger. History is
//! kept newest-first in the `guava_uploads` slot.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::demo::generate_demo_uploads;
use crate::domain::result::{Error, Result};
use crate::domain::upload::UPLOAD_REWARD_COINS;
use crate::domain::{FieldError, UploadRecord, UploadStatus, UploadSubmission};
use crate::ports::{load_json, store_json, KeyValueStore};
use crate::services::SessionService;

/// Slot holding the upload history
pub const UPLOADS_SLOT: &str = "guava_uploads";

/// Default simulated upload time
pub const DEFAULT_UPLOAD_LATENCY: Duration = Duration::from_millis(2000);

/// Result of a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub record: UploadRecord,
    /// Balance after the reward was credited
    pub balance: u64,
}

/// Totals over the upload history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
    pub coins_earned: u64,
}

/// Upload service for submissions and history
pub struct UploadService {
    store: Arc<dyn KeyValueStore>,
    session: Arc<SessionService>,
    latency: Duration,
}

impl UploadService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        session: Arc<SessionService>,
        latency: Duration,
    ) -> Self {
        Self {
            store,
            session,
            latency,
        }
    }

    /// Upload history, newest first
    pub fn history(&self) -> Result<Vec<UploadRecord>> {
        Ok(load_json(self.store.as_ref(), UPLOADS_SLOT)?.unwrap_or_else(generate_demo_uploads))
    }

    pub fn stats(&self) -> Result<UploadStats> {
        let history = self.history()?;
        let count = |status: UploadStatus| history.iter().filter(|u| u.status == status).count();
        Ok(UploadStats {
            total: history.len(),
            approved: count(UploadStatus::Approved),
            pending: count(UploadStatus::Pending),
            rejected: count(UploadStatus::Rejected),
            coins_earned: history.iter().map(|u| u.coins).sum(),
        })
    }

    /// Check a submission without uploading it
    ///
    /// Returns every failing field, including a duplicate-image check
    /// against the history.
    pub fn validate(&self, submission: &UploadSubmission) -> Result<Vec<FieldError>> {
        let mut errors = submission.validate();

        if let Some(file) = &submission.file {
            let fingerprint = file.fingerprint();
            let duplicate = self
                .history()?
                .iter()
                .any(|u| u.fingerprint.as_deref() == Some(fingerprint.as_str()));
            if duplicate {
                errors.push(FieldError::new("file", "This image has already been uploaded"));
            }
        }

        Ok(errors)
    }

    /// Submit an image as the signed-in user
    ///
    /// Waits for the simulated upload, records it, then credits the
    /// approval reward. A failed credit removes the record again.
    pub async fn submit(&self, submission: &UploadSubmission) -> Result<UploadOutcome> {
        self.session.require()?;

        let submission = submission.sanitized();
        let errors = self.validate(&submission)?;
        if !errors.is_empty() {
            return Err(Error::InvalidUpload(errors));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        // The session may have ended while the upload was in flight
        self.session.require()?;

        let record = UploadRecord::approved(
            Uuid::new_v4().to_string(),
            &submission,
            Utc::now().date_naive(),
        );
        let previous = self.history()?;
        let mut history = previous.clone();
        history.insert(0, record.clone());
        store_json(self.store.as_ref(), UPLOADS_SLOT, &history)?;

        // The record only stands once the reward is on the ledger
        let balance = match self.session.credit(UPLOAD_REWARD_COINS) {
            Ok(Some(balance)) => balance,
            Ok(None) => {
                store_json(self.store.as_ref(), UPLOADS_SLOT, &previous)?;
                return Err(Error::NotSignedIn);
            }
            Err(e) => {
                store_json(self.store.as_ref(), UPLOADS_SLOT, &previous)?;
                return Err(e);
            }
        };

        Ok(UploadOutcome { record, balance })
    }
}
