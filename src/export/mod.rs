use std::io;

use crate::errors::Result;
use crate::models::{Expense, ReportItem, TIMESTAMP_FORMAT};

/// Write expenses as CSV with a header row. Returns the number of rows.
pub(crate) fn write_expenses<W: io::Write>(writer: W, expenses: &[Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "created_at", "category", "amount", "note", "share_id"])?;
    for e in expenses {
        wtr.write_record([
            e.id.map(|id| id.to_string()).unwrap_or_default(),
            e.created_at.format(TIMESTAMP_FORMAT).to_string(),
            e.category.clone(),
            e.amount.to_string(),
            e.note.clone().unwrap_or_default(),
            e.share_id.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(expenses.len())
}

/// Write a report as CSV. Missing budgets and percentages are empty cells;
/// percentages are rounded to two places.
pub(crate) fn write_report<W: io::Write>(writer: W, items: &[ReportItem]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["category", "spent", "budget", "percent_used", "alert"])?;
    for item in items {
        wtr.write_record([
            item.category.clone(),
            item.spent.to_string(),
            item.budget.map(|b| b.to_string()).unwrap_or_default(),
            item.percent_used
                .map(|p| p.round_dp(2).normalize().to_string())
                .unwrap_or_default(),
            if item.is_alerting() { "yes" } else { "" }.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(items.len())
}

#[cfg(test)]
mod tests;
