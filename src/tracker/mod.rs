//! The operations a caller-facing layer exposes: record an expense, set a
//! budget, and ask how a month is going. Every operation is scoped to an
//! explicit user.

use chrono::{Local, NaiveDateTime};
use log::info;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;

use crate::db::Database;
use crate::errors::Result;
use crate::export;
use crate::models::{Budget, Expense, Period, ReportItem};
use crate::report;
use crate::validate::{require_user, BudgetCreate, ExpenseCreate};

pub(crate) struct Tracker {
    db: Database,
}

impl Tracker {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    pub(crate) fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Validate and store a new expense, returning the stored record.
    pub(crate) fn create_expense(&self, payload: ExpenseCreate) -> Result<Expense> {
        self.create_expense_at(payload, Local::now().naive_local())
    }

    fn create_expense_at(&self, payload: ExpenseCreate, now: NaiveDateTime) -> Result<Expense> {
        let mut expense = payload.validate(now)?;
        let id = self.db.insert_expense(&expense)?;
        info!(
            "Recorded expense {id}: {} {} for {}",
            expense.amount, expense.category, expense.user
        );
        expense.id = Some(id);
        Ok(self.db.get_expense(id)?.unwrap_or(expense))
    }

    /// Create the budget for (user, category, year, month), or overwrite its
    /// amount and alert threshold if one exists.
    pub(crate) fn upsert_budget(&self, payload: BudgetCreate) -> Result<Budget> {
        let mut budget = payload.validate()?;
        let id = self.db.upsert_budget(&budget)?;
        info!(
            "Budget {id} for {} {:04}-{:02} set to {} ({})",
            budget.category, budget.year, budget.month, budget.amount, budget.user
        );
        budget.id = Some(id);
        let period = budget.period()?;
        Ok(self
            .db
            .get_budget(&budget.user, &budget.category, &period)?
            .unwrap_or(budget))
    }

    pub(crate) fn total_spent(&self, year: i32, month: u32, user: &str) -> Result<Decimal> {
        let period = Period::new(year, month)?;
        let user = require_user(user)?;
        report::total_spent(&self.db, &period, &user)
    }

    pub(crate) fn report(&self, year: i32, month: u32, user: &str) -> Result<Vec<ReportItem>> {
        let period = Period::new(year, month)?;
        let user = require_user(user)?;
        report::spending_vs_budget(&self.db, &period, &user)
    }

    /// A user's expenses for one month, newest first.
    pub(crate) fn expenses_for_month(
        &self,
        year: i32,
        month: u32,
        user: &str,
    ) -> Result<Vec<Expense>> {
        let period = Period::new(year, month)?;
        let user = require_user(user)?;
        self.db
            .get_expenses_in_range(&user, &period.start(), &period.end())
    }

    /// Expenses grouped under one share id, oldest first.
    pub(crate) fn shared_expenses(&self, share_id: &str, user: &str) -> Result<Vec<Expense>> {
        let user = require_user(user)?;
        self.db.get_expenses_by_share(&user, share_id.trim())
    }

    pub(crate) fn budgets_for_month(&self, year: i32, month: u32, user: &str) -> Result<Vec<Budget>> {
        let period = Period::new(year, month)?;
        let user = require_user(user)?;
        self.db.get_budgets(&user, &period)
    }

    pub(crate) fn expense_count(&self, user: &str) -> Result<i64> {
        let user = require_user(user)?;
        self.db.get_expense_count(&user)
    }

    pub(crate) fn export_expenses(
        &self,
        path: &Path,
        year: i32,
        month: u32,
        user: &str,
    ) -> Result<usize> {
        let expenses = self.expenses_for_month(year, month, user)?;
        let count = export::write_expenses(File::create(path)?, &expenses)?;
        info!("Exported {count} expenses to {}", path.display());
        Ok(count)
    }

    pub(crate) fn export_report(
        &self,
        path: &Path,
        year: i32,
        month: u32,
        user: &str,
    ) -> Result<usize> {
        let items = self.report(year, month, user)?;
        let count = export::write_report(File::create(path)?, &items)?;
        info!("Exported {count} report rows to {}", path.display());
        Ok(count)
    }
}

#[cfg(test)]
mod tests;
