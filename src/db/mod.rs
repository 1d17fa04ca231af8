mod schema;

use chrono::NaiveDateTime;
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::models::*;

const EXPENSE_COLUMNS: &str = "id, amount, category, note, created_at, user, share_id";
const BUDGET_COLUMNS: &str = "id, category, year, month, amount, user, alert_threshold";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            info!("Creating schema version {}", schema::CURRENT_VERSION);
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                info!("Applying migration from schema version {from_version}");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (amount, category, note, created_at, user, share_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                expense.amount.to_string(),
                expense.category,
                expense.note,
                format_timestamp(&expense.created_at),
                expense.user,
                expense.share_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted expense {id} for user {}", expense.user);
        Ok(id)
    }

    pub(crate) fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], expense_from_row)
            .optional()?)
    }

    /// Expenses with `start <= created_at <= end`, newest first.
    pub(crate) fn get_expenses_in_range(
        &self,
        user: &str,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE user = ?1 AND created_at >= ?2 AND created_at <= ?3
             ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![user, format_timestamp(start), format_timestamp(end)],
            expense_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_expenses_by_share(&self, user: &str, share_id: &str) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE user = ?1 AND share_id = ?2
             ORDER BY created_at, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user, share_id], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Sum of amounts inside the inclusive range. Zero when nothing matches.
    pub(crate) fn sum_expenses_in_range(
        &self,
        user: &str,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<Decimal> {
        // Amounts are summed as Decimal; SQLite's SUM would go through REAL.
        let mut stmt = self.conn.prepare(
            "SELECT amount FROM expenses
             WHERE user = ?1 AND created_at >= ?2 AND created_at <= ?3",
        )?;
        let rows = stmt.query_map(
            params![user, format_timestamp(start), format_timestamp(end)],
            |row| decimal_column(row, 0),
        )?;
        let amounts = rows.collect::<std::result::Result<Vec<Decimal>, _>>()?;
        checked_sum(amounts, "total spent")
    }

    /// Per-category totals inside the inclusive range, ordered by category.
    /// Categories without expenses in the range do not appear.
    pub(crate) fn spending_by_category(
        &self,
        user: &str,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<Vec<(String, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, amount FROM expenses
             WHERE user = ?1 AND created_at >= ?2 AND created_at <= ?3
             ORDER BY category, id",
        )?;
        let rows = stmt.query_map(
            params![user, format_timestamp(start), format_timestamp(end)],
            |row| Ok((row.get::<_, String>(0)?, decimal_column(row, 1)?)),
        )?;

        let mut totals: Vec<(String, Decimal)> = Vec::new();
        for row in rows {
            let (category, amount) = row?;
            match totals.last_mut() {
                Some((last, sum)) if *last == category => {
                    *sum = sum
                        .checked_add(amount)
                        .ok_or(Error::Overflow("category spending"))?;
                }
                _ => totals.push((category, amount)),
            }
        }
        Ok(totals)
    }

    pub(crate) fn get_expense_count(&self, user: &str) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user = ?1",
            params![user],
            |row| row.get(0),
        )?)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Insert or overwrite the budget for (user, category, year, month) in
    /// one statement. Returns the row id, which is stable across updates.
    pub(crate) fn upsert_budget(&self, budget: &Budget) -> Result<i64> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO budgets (category, year, month, amount, user, alert_threshold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user, category, year, month) DO UPDATE
                 SET amount = excluded.amount,
                     alert_threshold = excluded.alert_threshold
             RETURNING id",
            params![
                budget.category,
                budget.year,
                budget.month,
                budget.amount.to_string(),
                budget.user,
                budget.alert_threshold.map(|t| t.to_string()),
            ],
            |row| row.get(0),
        )?;
        debug!(
            "Upserted budget {id} ({} {:04}-{:02}) for user {}",
            budget.category, budget.year, budget.month, budget.user
        );
        Ok(id)
    }

    pub(crate) fn get_budget(
        &self,
        user: &str,
        category: &str,
        period: &Period,
    ) -> Result<Option<Budget>> {
        let sql = format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets
             WHERE user = ?1 AND category = ?2 AND year = ?3 AND month = ?4"
        );
        Ok(self
            .conn
            .query_row(
                &sql,
                params![user, category, period.year(), period.month()],
                budget_from_row,
            )
            .optional()?)
    }

    pub(crate) fn get_budgets(&self, user: &str, period: &Period) -> Result<Vec<Budget>> {
        let sql = format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets
             WHERE user = ?1 AND year = ?2 AND month = ?3
             ORDER BY category"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![user, period.year(), period.month()],
            budget_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    #[cfg(test)]
    pub(crate) fn get_budget_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))?)
    }
}

// ── Row mapping ───────────────────────────────────────────────

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: Some(row.get(0)?),
        amount: decimal_column(row, 1)?,
        category: row.get(2)?,
        note: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        user: row.get(5)?,
        share_id: row.get(6)?,
    })
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let threshold: Option<String> = row.get(6)?;
    Ok(Budget {
        id: Some(row.get(0)?),
        category: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        amount: decimal_column(row, 4)?,
        user: row.get(5)?,
        alert_threshold: threshold
            .map(|t| parse_decimal(6, &t))
            .transpose()?,
    })
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    parse_decimal(idx, &raw)
}

fn parse_decimal(idx: usize, raw: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
