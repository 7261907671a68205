use crate::{category::Category, format_currency};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// A single spending record.
///
/// `Expense`s are immutable once built. The only way to get one from user input is
/// through [`validate`](crate::validate), which guarantees that the description is not
/// blank and that the amount was a well-formed number.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    description: String,
    amount: Decimal,
    category: Category,
    date: NaiveDate,
}

impl Expense {
    pub(crate) fn new<S: Into<String>>(
        description: S,
        amount: Decimal,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Expense {
            description: description.into(),
            amount,
            category,
            date,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

// This is the label a list row shows, e.g. "Lunch - $12.50 - Food - 2024-01-01"
impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.description,
            format_currency(self.amount),
            self.category,
            self.date.format("%Y-%m-%d")
        )
    }
}
