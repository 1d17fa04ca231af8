//! Monthly totals and the spending-vs-budget report.
//!
//! Both use the same inclusive window, `[first day 00:00:00, last day
//! 23:59:59]`, so an expense counts toward a month's total exactly when it
//! counts toward that month's report.

use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::db::Database;
use crate::errors::Result;
use crate::models::{Budget, Period, ReportItem};

/// Sum of everything `user` spent in `period`. Zero if nothing was spent.
pub(crate) fn total_spent(db: &Database, period: &Period, user: &str) -> Result<Decimal> {
    db.sum_expenses_in_range(user, &period.start(), &period.end())
}

/// One item per category with spending in `period`, ordered by category.
///
/// Budgeted categories with no spending in the period are left out.
pub(crate) fn spending_vs_budget(
    db: &Database,
    period: &Period,
    user: &str,
) -> Result<Vec<ReportItem>> {
    let spent = db.spending_by_category(user, &period.start(), &period.end())?;
    let budgets: HashMap<String, Budget> = db
        .get_budgets(user, period)?
        .into_iter()
        .map(|b| (b.category.clone(), b))
        .collect();

    let items = spent
        .into_iter()
        .map(|(category, amount)| {
            let budget = budgets.get(&category);
            if let Some(b) = budget.filter(|b| b.amount <= Decimal::ZERO) {
                warn!(
                    "Budget for {category} in {period} is {}; percent used not computed",
                    b.amount
                );
            }
            ReportItem::new(category, amount, budget)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Report for {user} {period}: {} categories", items.len());
    Ok(items)
}
