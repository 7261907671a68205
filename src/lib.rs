mod category;
mod expense;
mod store;
mod tracker;
mod validation;

use rust_decimal::{Decimal, RoundingStrategy};

pub use category::{Category, CategoryError};
pub use expense::Expense;
pub use store::{ExpenseStore, NotFoundError};
pub use tracker::{Action, ExpenseForm, Notification, Tracker, TrackerError, View};
pub use validation::{parse_amount, today, validate, ValidationError};

// This represents the number of decimal places that amounts are displayed with.
// Amounts themselves are stored at whatever precision the user entered.
const CURRENCY_PRECISION: u32 = 2;

const CURRENCY_SYMBOL: &str = "$";

/// Format an amount for display, e.g. `$12.50`. Midpoints round away from zero.
pub fn format_currency(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.*}", CURRENCY_SYMBOL, CURRENCY_PRECISION as usize, rounded)
}
