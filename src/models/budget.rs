use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;
use crate::errors::ValidationError;

/// Spending ceiling for one category in one month.
/// Unique per (user, category, year, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Option<i64>,
    pub category: String,
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
    pub user: String,
    /// Percentage of `amount` at which the budget counts as nearly exhausted.
    pub alert_threshold: Option<Decimal>,
}

impl Budget {
    pub fn new(category: String, period: Period, amount: Decimal, user: String) -> Self {
        Self {
            id: None,
            category,
            year: period.year(),
            month: period.month(),
            amount,
            user,
            alert_threshold: None,
        }
    }

    pub fn period(&self) -> Result<Period, ValidationError> {
        Period::new(self.year, self.month)
    }
}
