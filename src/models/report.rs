use rust_decimal::Decimal;
use serde::Serialize;

use super::Budget;
use crate::errors::{Error, Result};

/// One category's line in a spending-vs-budget report. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    pub category: String,
    pub spent: Decimal,
    pub budget: Option<Decimal>,
    pub percent_used: Option<Decimal>,
    pub alert_threshold: Option<Decimal>,
}

impl ReportItem {
    pub fn new(category: String, spent: Decimal, budget: Option<&Budget>) -> Result<Self> {
        let budget_amount = budget.map(|b| b.amount);
        let percent_used = match budget_amount {
            Some(b) => percent_used(spent, b)?,
            None => None,
        };
        Ok(Self {
            category,
            spent,
            budget: budget_amount,
            percent_used,
            alert_threshold: budget.and_then(|b| b.alert_threshold),
        })
    }

    /// Budget left over; negative when overspent.
    pub fn remaining(&self) -> Result<Option<Decimal>> {
        self.budget
            .map(|b| {
                b.checked_sub(self.spent)
                    .ok_or(Error::Overflow("remaining budget"))
            })
            .transpose()
    }

    pub fn is_alerting(&self) -> bool {
        match (self.percent_used, self.alert_threshold) {
            (Some(pct), Some(threshold)) => pct >= threshold,
            _ => false,
        }
    }
}

/// `spent / budget * 100`, or `None` when the budget is not positive.
pub fn percent_used(spent: Decimal, budget: Decimal) -> Result<Option<Decimal>> {
    if budget <= Decimal::ZERO {
        return Ok(None);
    }
    spent
        .checked_div(budget)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(Some)
        .ok_or(Error::Overflow("percent used"))
}
