use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single recorded expense. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: NaiveDateTime,
    pub user: String,
    /// Groups expenses split with other people.
    pub share_id: Option<String>,
}

impl Expense {
    pub fn new(amount: Decimal, category: String, user: String, created_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            amount,
            category,
            note: None,
            created_at,
            user,
            share_id: None,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.share_id.is_some()
    }
}
