use crate::expense::Expense;
use log::{debug, warn};
use rust_decimal::Decimal;
use thiserror::Error;

/// The in-memory ledger of expenses.
///
/// Entries keep their insertion order and duplicates are allowed; there is no identity
/// key, so removal matches by value. The total is always derived from the entries and
/// is never cached.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    entries: Vec<Expense>,
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum NotFoundError {
    #[error("please select an expense to delete")]
    NoSelection,
    #[error("the selected expense is not in the list")]
    Missing,
}

impl ExpenseStore {
    pub fn new() -> Self {
        ExpenseStore::default()
    }

    /// Append an expense. The caller is responsible for validation.
    pub fn add(&mut self, expense: Expense) {
        debug!(
            "appending expense at position {}: {}",
            self.entries.len(),
            expense
        );
        self.entries.push(expense);
    }

    /// Remove the first entry equal to `expense`, returning it
    pub fn remove(&mut self, expense: &Expense) -> Result<Expense, NotFoundError> {
        match self.entries.iter().position(|e| e == expense) {
            Some(idx) => Ok(self.entries.remove(idx)),
            None => {
                warn!("cannot remove expense not in the store: {}", expense);
                Err(NotFoundError::Missing)
            }
        }
    }

    /// The sum of every entry's amount.
    ///
    /// Callers that keep `magnitude` representable (as `Tracker` does) get an exact
    /// total, since no partial sum can exceed it. Otherwise the total saturates at
    /// `Decimal::MAX`/`Decimal::MIN` rather than panicking.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount()))
    }

    /// The sum of the absolute value of every entry's amount, or `None` if that can't
    /// be represented
    pub fn magnitude(&self) -> Option<Decimal> {
        self.entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount().abs()))
    }

    pub fn entries(&self) -> &[Expense] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
