//! Ledger: append-only money log
//!
//! Every money movement is recorded as an immutable [`LedgerTransaction`]
//! carrying the simulated timestamp and the resulting balance.
//!
//! # Critical Invariants
//!
//! 1. **Balance**: `balance == initial_balance + Σ accepted amounts`
//! 2. **Non-negative**: an expense that would drive the balance below zero
//!    is rejected with no state change
//! 3. **Append-only**: recorded transactions are never modified or removed
//!
//! CRITICAL: All money values are i64 (whole currency units)

mod consolidation;

pub use consolidation::{RevenueBucket, RevenueBuffer};

use crate::core::SimTimestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when recording a transaction
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Amount {amount} overflows balance {balance}")]
    Overflow { amount: i64, balance: i64 },
}

/// What a transaction pays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
    /// Consolidated daily pickup revenue
    FlightRevenue,
    GatePurchase,
    GateBooking,
    /// Scenario-driven manual adjustment
    Adjustment,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::FlightRevenue => "flight_revenue",
            TransactionCategory::GatePurchase => "gate_purchase",
            TransactionCategory::GateBooking => "gate_booking",
            TransactionCategory::Adjustment => "adjustment",
        }
    }
}

/// An accepted, immutable ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub id: String,

    /// Signed amount; negative for expenses
    pub amount: i64,

    pub category: TransactionCategory,
    pub description: String,
    pub timestamp: SimTimestamp,
    pub tick: usize,

    /// Balance after applying this transaction
    pub balance_after: i64,
}

/// Running balance plus its transaction history
///
/// # Example
/// ```
/// use airline_simulator_core_rs::core::SimTimestamp;
/// use airline_simulator_core_rs::ledger::{Ledger, TransactionCategory};
///
/// let mut ledger = Ledger::new(1000);
/// let ts = SimTimestamp::from_tick(0);
///
/// assert!(ledger
///     .add_transaction(-1500, TransactionCategory::GatePurchase, "gate", ts, 0)
///     .is_err());
/// assert_eq!(ledger.balance(), 1000);
/// assert!(ledger.transactions().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    initial_balance: i64,
    balance: i64,
    transactions: Vec<LedgerTransaction>,
}

impl Ledger {
    pub fn new(initial_balance: i64) -> Self {
        Self {
            initial_balance,
            balance: initial_balance,
            transactions: Vec::new(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn initial_balance(&self) -> i64 {
        self.initial_balance
    }

    pub fn transactions(&self) -> &[LedgerTransaction] {
        &self.transactions
    }

    /// Whether an expense of `cost` (positive) can be paid
    pub fn can_afford(&self, cost: i64) -> bool {
        cost <= 0 || self.balance >= cost
    }

    /// Record a transaction
    ///
    /// Income (`amount >= 0`) succeeds unless the balance would overflow.
    /// An expense is rejected when it would make the balance negative.
    pub fn add_transaction(
        &mut self,
        amount: i64,
        category: TransactionCategory,
        description: impl Into<String>,
        timestamp: SimTimestamp,
        tick: usize,
    ) -> Result<&LedgerTransaction, LedgerError> {
        let overflow = LedgerError::Overflow {
            amount,
            balance: self.balance,
        };
        let balance_after = self.balance.checked_add(amount).ok_or(overflow.clone())?;
        if amount < 0 && balance_after < 0 {
            return Err(LedgerError::InsufficientFunds {
                required: amount.checked_neg().ok_or(overflow)?,
                available: self.balance,
            });
        }

        self.balance = balance_after;
        self.transactions.push(LedgerTransaction {
            id: Uuid::new_v4().to_string(),
            amount,
            category,
            description: description.into(),
            timestamp,
            tick,
            balance_after,
        });

        debug_assert_eq!(
            self.balance,
            self.initial_balance + self.transactions.iter().map(|t| t.amount).sum::<i64>()
        );

        // Just pushed
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Sum of all recorded amounts in a category
    pub fn total_for(&self, category: TransactionCategory) -> i64 {
        self.transactions
            .iter()
            .filter(|t| t.category == category)
            .map(|t| t.amount)
            .sum()
    }

    /// Recompute the balance from history and compare
    pub fn is_consistent(&self) -> bool {
        let mut running = self.initial_balance;
        for tx in &self.transactions {
            running = match running.checked_add(tx.amount) {
                Some(next) => next,
                None => return false,
            };
            if tx.balance_after != running || running < 0 {
                return false;
            }
        }
        running == self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> SimTimestamp {
        SimTimestamp::from_tick(0)
    }

    #[test]
    fn test_income_always_succeeds() {
        let mut ledger = Ledger::new(0);
        let tx = ledger
            .add_transaction(500, TransactionCategory::FlightRevenue, "rev", ts(), 0)
            .unwrap();
        assert_eq!(tx.balance_after, 500);
        assert_eq!(ledger.balance(), 500);
    }

    #[test]
    fn test_expense_to_exactly_zero_accepted() {
        let mut ledger = Ledger::new(1000);
        ledger
            .add_transaction(-1000, TransactionCategory::GateBooking, "slots", ts(), 3)
            .unwrap();
        assert_eq!(ledger.balance(), 0);
        assert_eq!(ledger.transactions()[0].tick, 3);
    }

    #[test]
    fn test_rejected_expense_leaves_no_trace() {
        let mut ledger = Ledger::new(1000);
        let err = ledger
            .add_transaction(-1500, TransactionCategory::GatePurchase, "gate", ts(), 0)
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                required: 1500,
                available: 1000
            }
        );
        assert_eq!(ledger.balance(), 1000);
        assert!(ledger.transactions().is_empty());
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_total_for_category() {
        let mut ledger = Ledger::new(10_000);
        ledger
            .add_transaction(-300, TransactionCategory::GateBooking, "a", ts(), 0)
            .unwrap();
        ledger
            .add_transaction(-200, TransactionCategory::GateBooking, "b", ts(), 0)
            .unwrap();
        ledger
            .add_transaction(700, TransactionCategory::FlightRevenue, "c", ts(), 0)
            .unwrap();

        assert_eq!(ledger.total_for(TransactionCategory::GateBooking), -500);
        assert_eq!(ledger.balance(), 10_200);
        assert!(ledger.can_afford(10_200));
        assert!(!ledger.can_afford(10_201));
    }

    #[test]
    fn test_overflowing_amounts_rejected() {
        let mut ledger = Ledger::new(i64::MAX - 10);
        assert_eq!(
            ledger
                .add_transaction(11, TransactionCategory::Adjustment, "over", ts(), 0)
                .unwrap_err(),
            LedgerError::Overflow {
                amount: 11,
                balance: i64::MAX - 10
            }
        );
        ledger
            .add_transaction(10, TransactionCategory::Adjustment, "top", ts(), 0)
            .unwrap();
        assert_eq!(ledger.balance(), i64::MAX);

        let mut ledger = Ledger::new(5);
        assert!(matches!(
            ledger.add_transaction(i64::MIN, TransactionCategory::Adjustment, "min", ts(), 0),
            Err(LedgerError::Overflow { .. })
        ));
        assert_eq!(ledger.balance(), 5);
        assert!(ledger.transactions().is_empty());
        assert!(ledger.is_consistent());
    }
}
