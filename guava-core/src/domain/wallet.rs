//! Wallet domain model - coin to cedi conversion and withdrawals

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value of one coin in Ghanaian cedi (GH₵0.10)
pub fn coin_rate() -> Decimal {
    Decimal::new(1, 1)
}

/// Smallest withdrawal, in cedi
pub fn min_withdrawal() -> Decimal {
    Decimal::new(10, 0)
}

/// Convert a coin balance to cedi
pub fn coins_to_cedi(coins: u64) -> Decimal {
    Decimal::from(coins) * coin_rate()
}

/// Dashboard view of a contributor's earnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub coins: u64,
    pub cedi: Decimal,
    pub can_withdraw: bool,
    pub approved_uploads: usize,
    pub total_uploads: usize,
    /// Coins earned from uploads in the history
    pub total_earnings: u64,
}

/// Confirmation of a (simulated) withdrawal request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub amount: Decimal,
    pub mobile_number: String,
    pub requested_at: DateTime<Utc>,
}
