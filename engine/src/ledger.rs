//! Player ledger: balances plus an append-only change history.
//!
//! Accounts are guarded per player so independent players never contend.
//! Every mutation appends exactly one [`BalanceEntry`]; a rejected debit
//! appends nothing. Balances are unsigned, so a negative balance is
//! unrepresentable and an over-debit is rejected up front.

use crate::unix_millis;
use aviator_types::{
    game::{BalanceEntry, BalanceReason},
    Error, Result,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

struct Account {
    balance: u64,
    history: Vec<BalanceEntry>,
}

impl Account {
    fn record(&mut self, previous: u64, change: i64, reason: BalanceReason) {
        self.history.push(BalanceEntry {
            previous_balance: previous,
            change,
            new_balance: self.balance,
            reason,
            timestamp_millis: unix_millis(),
        });
    }

    fn credit(&mut self, amount: u64, reason: BalanceReason) -> u64 {
        let previous = self.balance;
        self.balance = self.balance.saturating_add(amount);
        self.record(previous, i64::try_from(amount).unwrap_or(i64::MAX), reason);
        self.balance
    }

    fn debit(&mut self, amount: u64, reason: BalanceReason) -> Result<u64> {
        if self.balance < amount {
            return Err(Error::InsufficientFunds {
                balance: self.balance,
                required: amount,
            });
        }
        let previous = self.balance;
        self.balance -= amount;
        self.record(previous, -i64::try_from(amount).unwrap_or(i64::MAX), reason);
        Ok(self.balance)
    }
}

/// Authoritative store of player balances.
pub struct Ledger {
    starting_balance: u64,
    accounts: RwLock<HashMap<String, Arc<Mutex<Account>>>>,
}

impl Ledger {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            starting_balance,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Create an account seeded with the starting balance.
    ///
    /// Registration is explicit: no other operation creates accounts.
    pub fn register(&self, player: &str) -> Result<u64> {
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if accounts.contains_key(player) {
            return Err(Error::PlayerAlreadyRegistered(player.to_string()));
        }
        let mut account = Account {
            balance: 0,
            history: Vec::new(),
        };
        let balance = account.credit(self.starting_balance, BalanceReason::InitialDeposit);
        accounts.insert(player.to_string(), Arc::new(Mutex::new(account)));
        Ok(balance)
    }

    fn account(&self, player: &str) -> Result<Arc<Mutex<Account>>> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        accounts
            .get(player)
            .cloned()
            .ok_or_else(|| Error::PlayerNotFound(player.to_string()))
    }

    pub fn balance(&self, player: &str) -> Result<u64> {
        let account = self.account(player)?;
        let account = account.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(account.balance)
    }

    /// Atomically add to a balance. Always succeeds for a known player.
    pub fn credit(&self, player: &str, amount: u64, reason: BalanceReason) -> Result<u64> {
        let account = self.account(player)?;
        let mut account = account.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(account.credit(amount, reason))
    }

    /// Atomically subtract from a balance, rejecting over-debits.
    pub fn debit(&self, player: &str, amount: u64, reason: BalanceReason) -> Result<u64> {
        let account = self.account(player)?;
        let mut account = account.lock().unwrap_or_else(PoisonError::into_inner);
        account.debit(amount, reason)
    }

    /// Balance-change entries, most recent first.
    pub fn history(&self, player: &str, limit: usize) -> Result<Vec<BalanceEntry>> {
        let account = self.account(player)?;
        let account = account.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(account.history.iter().rev().take(limit).cloned().collect())
    }

    pub fn player_count(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_seeds_starting_balance() {
        let ledger = Ledger::new(10_000);
        assert_eq!(ledger.register("a@x.com").unwrap(), 10_000);
        assert_eq!(ledger.balance("a@x.com").unwrap(), 10_000);

        let history = ledger.history("a@x.com", 10).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].previous_balance, 0);
        assert_eq!(history[0].change, 10_000);
        assert_eq!(history[0].new_balance, 10_000);
        assert_eq!(history[0].reason, BalanceReason::InitialDeposit);
    }

    #[test]
    fn test_register_twice_rejected() {
        let ledger = Ledger::new(10_000);
        ledger.register("a@x.com").unwrap();
        assert_eq!(
            ledger.register("a@x.com"),
            Err(Error::PlayerAlreadyRegistered("a@x.com".to_string()))
        );
    }

    #[test]
    fn test_unknown_player_rejected() {
        let ledger = Ledger::new(10_000);
        assert_eq!(
            ledger.balance("ghost@x.com"),
            Err(Error::PlayerNotFound("ghost@x.com".to_string()))
        );
        assert_eq!(
            ledger.debit("ghost@x.com", 1, BalanceReason::Bet),
            Err(Error::PlayerNotFound("ghost@x.com".to_string()))
        );
        assert_eq!(
            ledger.credit("ghost@x.com", 1, BalanceReason::Cashout),
            Err(Error::PlayerNotFound("ghost@x.com".to_string()))
        );
    }

    #[test]
    fn test_debit_credit_replay_matches_balance() {
        let ledger = Ledger::new(1_000);
        ledger.register("a@x.com").unwrap();

        ledger.debit("a@x.com", 300, BalanceReason::Bet).unwrap();
        ledger
            .credit("a@x.com", 450, BalanceReason::Cashout)
            .unwrap();
        ledger.debit("a@x.com", 150, BalanceReason::Bet).unwrap();

        // initial + sum(credits) - sum(debits)
        assert_eq!(ledger.balance("a@x.com").unwrap(), 1_000 + 450 - 300 - 150);

        // History (newest first) replays to the same balance.
        let history = ledger.history("a@x.com", usize::MAX).unwrap();
        assert_eq!(history.len(), 4);
        let replayed: i64 = history.iter().map(|e| e.change).sum();
        assert_eq!(replayed, 1_000);
        for entry in &history {
            assert_eq!(
                entry.new_balance as i64,
                entry.previous_balance as i64 + entry.change
            );
        }
    }

    #[test]
    fn test_over_debit_rejected_without_mutation() {
        let ledger = Ledger::new(500);
        ledger.register("a@x.com").unwrap();

        assert_eq!(
            ledger.debit("a@x.com", 501, BalanceReason::Bet),
            Err(Error::InsufficientFunds {
                balance: 500,
                required: 501,
            })
        );
        assert_eq!(ledger.balance("a@x.com").unwrap(), 500);
        // No entry appended for the rejected debit.
        assert_eq!(ledger.history("a@x.com", usize::MAX).unwrap().len(), 1);

        // Debiting the exact balance is fine.
        assert_eq!(ledger.debit("a@x.com", 500, BalanceReason::Bet), Ok(0));
    }

    #[test]
    fn test_history_limit_newest_first() {
        let ledger = Ledger::new(1_000);
        ledger.register("a@x.com").unwrap();
        for _ in 0..5 {
            ledger.debit("a@x.com", 10, BalanceReason::Bet).unwrap();
        }

        let history = ledger.history("a@x.com", 3).unwrap();
        assert_eq!(history.len(), 3);
        // Newest entry has the lowest balance.
        assert_eq!(history[0].new_balance, 950);
        assert_eq!(history[2].new_balance, 970);
    }

    #[test]
    fn test_concurrent_debits_never_go_negative() {
        let ledger = Arc::new(Ledger::new(500));
        ledger.register("a@x.com").unwrap();

        // 20 threads race to debit 100 from a balance of 500.
        let mut handles = Vec::new();
        for _ in 0..20 {
            let ledger = ledger.clone();
            handles.push(std::thread::spawn(move || {
                ledger.debit("a@x.com", 100, BalanceReason::Bet).is_ok()
            }));
        }
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|ok| *ok)
            .count();

        // Exactly five can succeed; the balance lands on zero, never below.
        assert_eq!(successes, 5);
        assert_eq!(ledger.balance("a@x.com").unwrap(), 0);

        let history = ledger.history("a@x.com", usize::MAX).unwrap();
        assert_eq!(history.len(), 6); // initial deposit + 5 debits
        for entry in &history {
            assert_eq!(
                entry.new_balance as i64,
                entry.previous_balance as i64 + entry.change
            );
        }
    }
}
