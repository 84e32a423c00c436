//! Creator Coins wallet.
//!
//! Balances are plain integers; reward values arrive in cents and are
//! converted at the fixed ratio in `constants`, so no floating point ever
//! touches the wallet.

use serde::{Deserialize, Serialize};

/// Spendable in-app currency plus the lifetime-earned high-water counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorCoins {
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub lifetime_earned: i64,
}

/// Two-outcome contract for spending. `Declined` means nothing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendOutcome {
    Spent { remaining: i64 },
    Declined { balance: i64, requested: i64 },
}

impl SpendOutcome {
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        matches!(self, Self::Spent { .. })
    }
}

impl CreatorCoins {
    /// Credit coins, raising both balance and the lifetime counter.
    /// Non-positive amounts are ignored.
    pub fn add(&mut self, amount: i64) {
        if amount > 0 {
            self.balance += amount;
            self.lifetime_earned += amount;
        }
    }

    /// Debit coins. Declines without mutating when the balance is short
    /// or the amount is negative.
    pub fn spend(&mut self, amount: i64) -> SpendOutcome {
        if amount < 0 || self.balance < amount {
            return SpendOutcome::Declined {
                balance: self.balance,
                requested: amount,
            };
        }
        self.balance -= amount;
        SpendOutcome::Spent {
            remaining: self.balance,
        }
    }
}

/// Render a cent amount as a dollar string, e.g. `$12.50`.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents_as_dollars() {
        assert_eq!(format_cents(1_250), "$12.50");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(-300), "-$3.00");
    }

    #[test]
    fn add_raises_balance_and_lifetime() {
        let mut coins = CreatorCoins::default();
        coins.add(250);
        coins.add(-10);
        assert_eq!(coins.balance, 250);
        assert_eq!(coins.lifetime_earned, 250);
    }

    #[test]
    fn overdraft_is_declined_without_mutation() {
        let mut coins = CreatorCoins {
            balance: 100,
            lifetime_earned: 100,
        };
        let outcome = coins.spend(101);
        assert!(matches!(
            outcome,
            SpendOutcome::Declined {
                balance: 100,
                requested: 101
            }
        ));
        assert_eq!(coins.balance, 100);
    }

    #[test]
    fn exact_balance_spend_empties_wallet() {
        let mut coins = CreatorCoins {
            balance: 100,
            lifetime_earned: 100,
        };
        let outcome = coins.spend(100);
        assert!(matches!(outcome, SpendOutcome::Spent { remaining: 0 }));
        assert_eq!(coins.balance, 0);
        assert_eq!(coins.lifetime_earned, 100);
    }
}
