//! Request payloads and the checks they must pass before reaching storage.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::models::{Budget, Expense, Period};

/// Payload for recording an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseCreate {
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Defaults to the time of creation.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    pub user: String,
    #[serde(default)]
    pub share_id: Option<String>,
}

impl ExpenseCreate {
    pub fn new(amount: Decimal, category: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            note: None,
            created_at: None,
            user: user.into(),
            share_id: None,
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn shared(mut self, share_id: impl Into<String>) -> Self {
        self.share_id = Some(share_id.into());
        self
    }

    /// Check the payload and build the record to insert. `now` fills in a
    /// missing timestamp. Timestamps are kept at whole-second resolution.
    pub fn validate(self, now: NaiveDateTime) -> Result<Expense, ValidationError> {
        let amount = positive(self.amount)?;
        let category = required("category", &self.category)?;
        let user = required("user", &self.user)?;

        let ts = self.created_at.unwrap_or(now);
        let created_at = ts.with_nanosecond(0).unwrap_or(ts);
        // Reject years the window arithmetic can't represent.
        Period::new(created_at.year(), 1)?;

        let mut expense = Expense::new(amount, category, user, created_at);
        expense.note = optional(self.note);
        expense.share_id = optional(self.share_id);
        Ok(expense)
    }
}

/// Payload for creating or replacing a monthly budget.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetCreate {
    pub category: String,
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
    pub user: String,
    #[serde(default)]
    pub alert_threshold: Option<Decimal>,
}

impl BudgetCreate {
    pub fn new(
        category: impl Into<String>,
        year: i32,
        month: u32,
        amount: Decimal,
        user: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            year,
            month,
            amount,
            user: user.into(),
            alert_threshold: None,
        }
    }

    pub fn alert_at(mut self, threshold: Decimal) -> Self {
        self.alert_threshold = Some(threshold);
        self
    }

    pub fn validate(self) -> Result<Budget, ValidationError> {
        let period = Period::new(self.year, self.month)?;
        let amount = positive(self.amount)?;
        let category = required("category", &self.category)?;
        let user = required("user", &self.user)?;
        if let Some(t) = self.alert_threshold {
            if t < Decimal::ZERO {
                return Err(ValidationError::NegativeThreshold(t));
            }
        }

        let mut budget = Budget::new(category, period, amount, user);
        budget.alert_threshold = self.alert_threshold;
        Ok(budget)
    }
}

/// Trimmed user identifier; blank is rejected.
pub(crate) fn require_user(user: &str) -> Result<String, ValidationError> {
    required("user", user)
}

/// Parse a user-typed amount. Accepts `$` and thousands separators.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    let cleaned = s.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ValidationError::Amount(s.to_string()));
    }
    Decimal::from_str(cleaned).map_err(|_| ValidationError::Amount(s.to_string()))
}

/// Parse a date or date-time. A bare date means midnight.
pub(crate) fn parse_timestamp(s: &str) -> Result<NaiveDateTime, ValidationError> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ValidationError::Timestamp(s.to_string()))
}

fn positive(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(amount)
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
