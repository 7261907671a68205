use crate::{
    expense::Expense,
    format_currency,
    store::{ExpenseStore, NotFoundError},
    validation::{today, validate, ValidationError},
};
use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use thiserror::Error;

/// The core that a presentation shell drives.
///
/// A `Tracker` owns the one `ExpenseStore` for the lifetime of the application. Shells
/// either call the operations directly or translate user intents into [`Action`]s and
/// render the [`View`] that `dispatch` returns.
#[derive(Debug, Default)]
pub struct Tracker {
    store: ExpenseStore,
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

/// A user intent captured by the shell
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    AddRequested(ExpenseForm),
    RemoveRequested(Option<Expense>), // The currently selected row, if any
}

/// Raw contents of the entry form, exactly as the user typed them
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Everything a shell needs to redraw after an action
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub entries: Vec<Expense>,
    pub rows: Vec<String>,
    pub total_label: String,
}

/// A blocking, user-facing error message
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker::default()
    }

    /// Validate raw input and, if it passes, record the expense
    pub fn add_expense(
        &mut self,
        description: &str,
        amount: &str,
        category: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<Expense, ValidationError> {
        self.add_expense_at(description, amount, category, date, None)
    }

    fn add_expense_at(
        &mut self,
        description: &str,
        amount: &str,
        category: Option<&str>,
        date: Option<NaiveDate>,
        now: Option<NaiveDate>,
    ) -> Result<Expense, ValidationError> {
        let expense = validate(description, amount, category, date, now)?;

        // Keep the sum of absolute amounts representable, so that the total of any
        // subset of entries, in any order, can never overflow
        let fits = self
            .store
            .magnitude()
            .and_then(|m| m.checked_add(expense.amount().abs()))
            .is_some();
        if !fits {
            warn!("rejecting expense that overflows the total: {}", expense);
            return Err(ValidationError::AmountOutOfRange(amount.into()));
        }

        info!("adding expense: {}", expense);
        self.store.add(expense.clone());
        Ok(expense)
    }

    /// Remove the selected expense. With no selection nothing is removed.
    pub fn remove_expense(
        &mut self,
        selected: Option<&Expense>,
    ) -> Result<Expense, NotFoundError> {
        let expense = selected.ok_or_else(|| {
            warn!("remove requested without a selected expense");
            NotFoundError::NoSelection
        })?;

        let removed = self.store.remove(expense)?;
        info!("removed expense: {}", removed);
        Ok(removed)
    }

    pub fn current_total(&self) -> Decimal {
        self.store.total()
    }

    pub fn current_entries(&self) -> &[Expense] {
        self.store.entries()
    }

    pub fn total_label(&self) -> String {
        let label = format!("Total Expenses: {}", format_currency(self.current_total()));
        info!("total label updated: {}", label);
        label
    }

    /// Apply a user intent and return the state to render.
    /// On error the store is unchanged.
    pub fn dispatch(&mut self, action: Action) -> Result<View, TrackerError> {
        self.dispatch_at(action, None)
    }

    fn dispatch_at(
        &mut self,
        action: Action,
        now: Option<NaiveDate>,
    ) -> Result<View, TrackerError> {
        match action {
            Action::AddRequested(form) => {
                self.add_expense_at(
                    &form.description,
                    &form.amount,
                    form.category.as_deref(),
                    form.date,
                    now,
                )?;
            }
            Action::RemoveRequested(selected) => {
                self.remove_expense(selected.as_ref())?;
            }
        }

        Ok(self.view())
    }

    /// Submit a live form. The form is cleared after a successful add and left as-is
    /// otherwise, so the user can correct it.
    pub fn submit(
        &mut self,
        form: &mut ExpenseForm,
        now: Option<NaiveDate>, // This allows overriding the current date for testing
    ) -> Result<View, TrackerError> {
        let view = self.dispatch_at(Action::AddRequested(form.clone()), now)?;
        form.clear(now.unwrap_or_else(today));
        Ok(view)
    }

    pub fn view(&self) -> View {
        let entries = self.current_entries().to_vec();
        let rows = entries.iter().map(ToString::to_string).collect();

        View {
            entries,
            rows,
            total_label: self.total_label(),
        }
    }
}

impl ExpenseForm {
    /// An empty form dated `today`
    pub fn new(today: NaiveDate) -> Self {
        ExpenseForm {
            description: String::new(),
            amount: String::new(),
            category: None,
            date: Some(today),
        }
    }

    pub fn clear(&mut self, today: NaiveDate) {
        *self = ExpenseForm::new(today);
    }
}

impl From<&TrackerError> for Notification {
    fn from(e: &TrackerError) -> Self {
        let n = Notification {
            title: "Error".into(),
            message: e.to_string(),
        };
        info!("alert shown: {} - {}", n.title, n.message);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form(description: &str, amount: &str, category: Option<&str>) -> ExpenseForm {
        ExpenseForm {
            description: description.into(),
            amount: amount.into(),
            category: category.map(Into::into),
            date: Some(date(2024, 1, 1)),
        }
    }

    #[test]
    fn add_lunch() {
        let mut t = Tracker::new();
        t.add_expense("Lunch", "12.50", Some("Food"), Some(date(2024, 1, 1)))
            .unwrap();

        assert_eq!(t.current_total(), dec!(12.50));
        assert_eq!(t.current_entries().len(), 1);
    }

    #[test]
    fn add_lunch_and_bus() {
        let mut t = Tracker::new();
        t.add_expense("Lunch", "12.50", Some("Food"), Some(date(2024, 1, 1)))
            .unwrap();
        t.add_expense("Bus", "3.00", Some("Transport"), Some(date(2024, 1, 2)))
            .unwrap();

        assert_eq!(t.current_total(), dec!(15.50));
        assert_eq!(t.total_label(), "Total Expenses: $15.50");
    }

    #[test]
    fn total_matches_sum_in_any_order() {
        let amounts = ["7.25", "0.10", "100", "0.20", "-2.5"];

        let mut a = Tracker::new();
        for amount in amounts.iter() {
            a.add_expense("x", amount, Some("Other"), None).unwrap();
        }

        let mut b = Tracker::new();
        for amount in amounts.iter().rev() {
            b.add_expense("x", amount, Some("Other"), None).unwrap();
        }

        assert_eq!(a.current_total(), dec!(105.05));
        assert_eq!(a.current_total(), b.current_total());
    }

    #[test]
    fn rejected_adds_leave_store_unchanged() {
        let mut t = Tracker::new();
        t.add_expense("Lunch", "12.50", Some("Food"), None).unwrap();

        assert_eq!(
            t.add_expense("", "5", Some("Food"), None),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            t.add_expense("Snack", "abc", Some("Food"), None),
            Err(ValidationError::InvalidAmount("abc".into()))
        );
        assert_eq!(t.current_entries().len(), 1);
        assert_eq!(t.current_total(), dec!(12.50));
    }

    #[test]
    fn negative_amounts_are_accepted() {
        let mut t = Tracker::new();
        t.add_expense("Refund", "-3", Some("Other"), None).unwrap();
        assert_eq!(t.total_label(), "Total Expenses: $-3.00");
    }

    #[test]
    fn add_rejects_amount_that_would_overflow_total() {
        let _ = env_logger::builder().is_test(true).try_init();

        let big = "70000000000000000000000000000";
        let mut t = Tracker::new();
        t.add_expense("a", big, Some("Food"), None).unwrap();
        let before = t.current_total();

        assert_eq!(
            t.add_expense("b", big, Some("Food"), None),
            Err(ValidationError::AmountOutOfRange(big.into()))
        );
        assert_eq!(t.current_entries().len(), 1);
        assert_eq!(t.current_total(), before);
        assert_eq!(
            t.total_label(),
            "Total Expenses: $70000000000000000000000000000.00"
        );
    }

    #[test]
    fn add_rejects_opposite_amounts_that_could_overflow_after_removal() {
        let big = "70000000000000000000000000000";
        let refund = "-70000000000000000000000000000";
        let mut t = Tracker::new();
        t.add_expense("a", big, Some("Food"), None).unwrap();

        assert_eq!(
            t.add_expense("b", refund, Some("Other"), None),
            Err(ValidationError::AmountOutOfRange(refund.into()))
        );
        assert_eq!(t.current_entries().len(), 1);
    }

    #[test]
    fn dispatch_out_of_range_amount_leaves_store_unchanged() {
        let mut t = Tracker::new();

        let err = t
            .dispatch(Action::AddRequested(form("Yacht", "1e40", Some("Other"))))
            .unwrap_err();
        assert_eq!(
            err,
            TrackerError::Validation(ValidationError::AmountOutOfRange("1e40".into()))
        );
        assert!(t.current_entries().is_empty());
    }

    #[test]
    fn remove_absent_expense() {
        let mut t = Tracker::new();
        let lunch = t
            .add_expense("Lunch", "12.50", Some("Food"), Some(date(2024, 1, 1)))
            .unwrap();
        let before = t.current_total();

        let mut other = Tracker::new();
        let bus = other
            .add_expense("Bus", "3.00", Some("Transport"), None)
            .unwrap();

        assert_eq!(t.remove_expense(Some(&bus)), Err(NotFoundError::Missing));
        assert_eq!(t.current_entries(), &[lunch][..]);
        assert_eq!(t.current_total(), before);
    }

    #[test]
    fn remove_without_selection() {
        let mut t = Tracker::new();
        t.add_expense("Lunch", "12.50", Some("Food"), None).unwrap();

        assert_eq!(t.remove_expense(None), Err(NotFoundError::NoSelection));
        assert_eq!(t.current_entries().len(), 1);
    }

    #[test]
    fn current_total_is_idempotent() {
        let mut t = Tracker::new();
        t.add_expense("Lunch", "12.50", Some("Food"), None).unwrap();

        let first = t.current_total();
        assert_eq!(t.current_total(), first);
        assert_eq!(t.current_total(), first);
    }

    #[test]
    fn add_then_remove_restores_total() {
        let mut t = Tracker::new();
        t.add_expense("Power", "81.17", Some("Utilities"), None)
            .unwrap();
        let before = t.current_total();

        let e = t
            .add_expense("Concert", "0.33", Some("Entertainment"), None)
            .unwrap();
        t.remove_expense(Some(&e)).unwrap();

        assert_eq!(t.current_total(), before);
    }

    #[test]
    fn empty_tracker_label() {
        assert_eq!(Tracker::new().total_label(), "Total Expenses: $0.00");
    }

    #[test]
    fn dispatch_add_returns_view() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut t = Tracker::new();
        let view = t
            .dispatch(Action::AddRequested(form("Lunch", "12.50", Some("Food"))))
            .unwrap();

        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.rows, vec!["Lunch - $12.50 - Food - 2024-01-01".to_string()]);
        assert_eq!(view.total_label, "Total Expenses: $12.50");
    }

    #[test]
    fn dispatch_remove_selected() {
        let mut t = Tracker::new();
        let view = t
            .dispatch(Action::AddRequested(form("Lunch", "12.50", Some("Food"))))
            .unwrap();
        let selected = view.entries.first().cloned();

        let view = t.dispatch(Action::RemoveRequested(selected)).unwrap();
        assert!(view.entries.is_empty());
        assert_eq!(view.total_label, "Total Expenses: $0.00");
    }

    #[test]
    fn dispatch_errors_leave_store_unchanged() {
        let mut t = Tracker::new();

        let err = t
            .dispatch(Action::AddRequested(form("Lunch", "12.50", None)))
            .unwrap_err();
        assert_eq!(err, TrackerError::Validation(ValidationError::MissingFields));

        let err = t.dispatch(Action::RemoveRequested(None)).unwrap_err();
        assert_eq!(err, TrackerError::NotFound(NotFoundError::NoSelection));
        assert!(t.current_entries().is_empty());
    }

    #[test]
    fn submit_clears_form_on_success() {
        let now = date(2026, 10, 19);
        let mut t = Tracker::new();
        let mut f = form("Lunch", "12.50", Some("Food"));

        t.submit(&mut f, Some(now)).unwrap();
        assert_eq!(f, ExpenseForm::new(now));
        assert_eq!(t.current_entries().len(), 1);
    }

    #[test]
    fn submit_keeps_form_on_failure() {
        let mut t = Tracker::new();
        let mut f = form("Lunch", "twelve", Some("Food"));
        let original = f.clone();

        assert!(t.submit(&mut f, Some(date(2026, 10, 19))).is_err());
        assert_eq!(f, original);
    }

    #[test]
    fn submit_without_date_uses_now() {
        let now = date(2026, 10, 19);
        let mut t = Tracker::new();
        let mut f = form("Bus", "3", Some("Transport"));
        f.date = None;

        t.submit(&mut f, Some(now)).unwrap();
        assert_eq!(t.current_entries()[0].date(), now);
    }

    #[test]
    fn notification_from_errors() {
        let err = TrackerError::from(ValidationError::InvalidAmount("x".into()));
        let n = Notification::from(&err);
        assert_eq!(n.title, "Error");
        assert_eq!(n.message, "please enter a valid amount");

        let n = Notification::from(&TrackerError::from(NotFoundError::NoSelection));
        assert_eq!(n.message, "please select an expense to delete");
    }
}
