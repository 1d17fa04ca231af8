#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::errors::{Error, ValidationError};

fn tracker() -> Tracker {
    Tracker::new(Database::open_in_memory().unwrap())
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn spend(t: &Tracker, amount: Decimal, category: &str, at: &str) -> Expense {
    t.create_expense(ExpenseCreate::new(amount, category, "u").at(ts(at)))
        .unwrap()
}

// ── CreateExpense ─────────────────────────────────────────────

#[test]
fn test_create_expense_assigns_new_ids() {
    let t = tracker();
    let a = spend(&t, dec!(10), "food", "2024-03-01 09:00:00");
    let b = spend(&t, dec!(10), "food", "2024-03-01 09:00:00");
    assert!(a.id.is_some());
    assert!(b.id.is_some());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_create_expense_keeps_supplied_timestamp() {
    let t = tracker();
    let e = spend(&t, dec!(10), "food", "2024-03-01 00:00:00");
    assert_eq!(e.created_at, ts("2024-03-01 00:00:00"));
}

#[test]
fn test_create_expense_defaults_to_now() {
    let t = tracker();
    let before = Local::now().naive_local();
    let e = t
        .create_expense(ExpenseCreate::new(dec!(4.20), "coffee", "u"))
        .unwrap();
    let after = Local::now().naive_local();
    // Stored at whole seconds, so allow the truncation.
    assert!(e.created_at >= before - chrono::Duration::seconds(1));
    assert!(e.created_at <= after);
}

#[test]
fn test_create_expense_returns_persisted_record() {
    let t = tracker();
    let e = t
        .create_expense_at(
            ExpenseCreate::new(dec!(60), "food", "u")
                .note("dinner")
                .shared("trip"),
            ts("2024-03-02 19:00:00"),
        )
        .unwrap();
    assert_eq!(e.note.as_deref(), Some("dinner"));
    assert_eq!(e.share_id.as_deref(), Some("trip"));
    assert_eq!(e.created_at, ts("2024-03-02 19:00:00"));
    assert_eq!(t.shared_expenses("trip", "u").unwrap(), vec![e]);
}

#[test]
fn test_create_expense_rejects_invalid_before_storage() {
    let t = tracker();
    let err = t
        .create_expense(ExpenseCreate::new(dec!(0), "food", "u"))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::NonPositiveAmount(_))
    ));
    assert_eq!(t.expense_count("u").unwrap(), 0);
}

// ── UpsertBudget ──────────────────────────────────────────────

#[test]
fn test_upsert_budget_idempotent_by_key() {
    let t = tracker();
    let a = t
        .upsert_budget(BudgetCreate::new("food", 2024, 3, dec!(200), "u"))
        .unwrap();
    let b = t
        .upsert_budget(BudgetCreate::new("food", 2024, 3, dec!(200), "u"))
        .unwrap();
    assert_eq!(a.id, b.id);
    let budgets = t.budgets_for_month(2024, 3, "u").unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, dec!(200));
}

#[test]
fn test_upsert_budget_preserves_id_on_update() {
    let t = tracker();
    let created = t
        .upsert_budget(BudgetCreate::new("food", 2024, 3, dec!(200), "u"))
        .unwrap();
    let updated = t
        .upsert_budget(BudgetCreate::new("food", 2024, 3, dec!(250), "u").alert_at(dec!(90)))
        .unwrap();
    assert_eq!(created.id, updated.id);
    assert_eq!(updated.amount, dec!(250));
    assert_eq!(updated.alert_threshold, Some(dec!(90)));
}

#[test]
fn test_upsert_budget_rejects_invalid() {
    let t = tracker();
    assert!(matches!(
        t.upsert_budget(BudgetCreate::new("food", 2024, 0, dec!(200), "u")),
        Err(Error::Validation(ValidationError::Month(0)))
    ));
    assert!(t.budgets_for_month(2024, 3, "u").unwrap().is_empty());
}

// ── GetTotalSpent / GetReport ─────────────────────────────────

#[test]
fn test_total_spent_example() {
    let t = tracker();
    spend(&t, dec!(100), "food", "2024-03-01 00:00:00");
    spend(&t, dec!(50), "food", "2024-03-31 23:59:59");
    spend(&t, dec!(30), "food", "2024-04-01 00:00:01");
    assert_eq!(t.total_spent(2024, 3, "u").unwrap(), dec!(150));
    assert_eq!(t.total_spent(2024, 5, "u").unwrap(), Decimal::ZERO);
}

#[test]
fn test_total_spent_requires_user() {
    let t = tracker();
    assert!(matches!(
        t.total_spent(2024, 3, " "),
        Err(Error::Validation(ValidationError::Empty("user")))
    ));
}

#[test]
fn test_report_example() {
    let t = tracker();
    spend(&t, dec!(100), "food", "2024-03-01 00:00:00");
    spend(&t, dec!(50), "food", "2024-03-20 13:00:00");
    t.upsert_budget(BudgetCreate::new("food", 2024, 3, dec!(200), "u"))
        .unwrap();
    t.upsert_budget(BudgetCreate::new("transport", 2024, 3, dec!(60), "u"))
        .unwrap();

    let report = t.report(2024, 3, "u").unwrap();
    assert_eq!(
        report,
        vec![ReportItem {
            category: "food".into(),
            spent: dec!(150),
            budget: Some(dec!(200)),
            percent_used: Some(dec!(75.0)),
            alert_threshold: None,
        }]
    );
}

#[test]
fn test_report_flags_alert_threshold() {
    let t = tracker();
    spend(&t, dec!(90), "fun", "2024-03-10 20:00:00");
    t.upsert_budget(BudgetCreate::new("fun", 2024, 3, dec!(100), "u").alert_at(dec!(80)))
        .unwrap();
    let report = t.report(2024, 3, "u").unwrap();
    assert!(report[0].is_alerting());
}

#[test]
fn test_report_rejects_bad_month() {
    let t = tracker();
    assert!(matches!(
        t.report(2024, 13, "u"),
        Err(Error::Validation(ValidationError::Month(13)))
    ));
}

#[test]
fn test_huge_amounts_report_overflow_instead_of_panicking() {
    let t = tracker();
    spend(&t, Decimal::MAX, "food", "2024-03-02 10:00:00");
    spend(&t, Decimal::MAX, "food", "2024-03-03 10:00:00");
    assert!(matches!(
        t.total_spent(2024, 3, "u"),
        Err(Error::Overflow(_))
    ));
    assert!(matches!(t.report(2024, 3, "u"), Err(Error::Overflow(_))));
}

#[test]
fn test_report_tiny_budget_overflow_is_an_error() {
    let t = tracker();
    let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
    spend(&t, huge, "food", "2024-03-02 10:00:00");
    t.upsert_budget(BudgetCreate::new("food", 2024, 3, dec!(0.001), "u"))
        .unwrap();
    assert!(matches!(
        t.report(2024, 3, "u"),
        Err(Error::Overflow("percent used"))
    ));
}

// ── Listing and export ────────────────────────────────────────

#[test]
fn test_expenses_for_month() {
    let t = tracker();
    spend(&t, dec!(1), "food", "2024-03-01 00:00:00");
    spend(&t, dec!(2), "food", "2024-03-15 00:00:00");
    spend(&t, dec!(3), "food", "2024-04-01 00:00:00");
    let march = t.expenses_for_month(2024, 3, "u").unwrap();
    let amounts: Vec<Decimal> = march.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![dec!(2), dec!(1)]);
}

#[test]
fn test_export_expenses_and_report() {
    let t = tracker();
    spend(&t, dec!(100), "food", "2024-03-01 00:00:00");
    spend(&t, dec!(20), "books", "2024-03-02 00:00:00");
    t.upsert_budget(BudgetCreate::new("food", 2024, 3, dec!(200), "u"))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let expenses_path = dir.path().join("expenses.csv");
    let report_path = dir.path().join("report.csv");

    assert_eq!(t.export_expenses(&expenses_path, 2024, 3, "u").unwrap(), 2);
    assert_eq!(t.export_report(&report_path, 2024, 3, "u").unwrap(), 2);

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("food,100,200,50,"));
    assert!(report.contains("books,20,,,"));
    let expenses = std::fs::read_to_string(&expenses_path).unwrap();
    assert_eq!(expenses.lines().count(), 3);
}
