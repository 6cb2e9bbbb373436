//! Wallet service - earnings summary and simulated withdrawals
//!
//! Withdrawals are acknowledged but never debit the ledger.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::result::{Error, Result};
use crate::domain::wallet::{coins_to_cedi, min_withdrawal};
use crate::domain::{WalletSummary, WithdrawalReceipt};
use crate::services::{SessionService, UploadService};

pub struct WalletService {
    session: Arc<SessionService>,
    uploads: Arc<UploadService>,
}

impl WalletService {
    pub fn new(session: Arc<SessionService>, uploads: Arc<UploadService>) -> Self {
        Self { session, uploads }
    }

    /// Dashboard figures for the signed-in user
    pub fn summary(&self) -> Result<WalletSummary> {
        let session = self.session.require()?;
        let stats = self.uploads.stats()?;
        let cedi = coins_to_cedi(session.coins());

        Ok(WalletSummary {
            coins: session.coins(),
            cedi,
            can_withdraw: cedi >= min_withdrawal(),
            approved_uploads: stats.approved,
            total_uploads: stats.total,
            total_earnings: stats.coins_earned,
        })
    }

    /// Request a mobile-money withdrawal of the full cedi balance
    pub fn withdraw(&self, mobile_number: &str) -> Result<WithdrawalReceipt> {
        let session = self.session.require()?;

        let mobile_number = mobile_number.trim();
        if mobile_number.is_empty() {
            return Err(Error::validation("Mobile money number is required"));
        }

        let amount = coins_to_cedi(session.coins());
        if amount < min_withdrawal() {
            return Err(Error::validation(format!(
                "You need at least GH₵{} to withdraw (available: GH₵{:.2})",
                min_withdrawal(),
                amount
            )));
        }

        Ok(WithdrawalReceipt {
            amount,
            mobile_number: mobile_number.to_string(),
            requested_at: Utc::now(),
        })
    }
}
