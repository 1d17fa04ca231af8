mod budget;
mod expense;
mod period;
mod report;

use rust_decimal::Decimal;

use crate::errors::{Error, Result};

pub use budget::Budget;
pub use expense::Expense;
pub use period::Period;
pub use report::ReportItem;

/// Storage and display format for timestamps. Fixed width, so text order
/// matches chronological order.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Adds amounts without wrapping. `what` names the total in the overflow error.
pub(crate) fn checked_sum<I>(amounts: I, what: &'static str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).ok_or(Error::Overflow(what))
    })
}

pub(crate) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub(crate) fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
