#![allow(clippy::unwrap_used)]

use chrono::NaiveDateTime;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Budget, Period};

fn expense(id: i64, amount: rust_decimal::Decimal, category: &str) -> Expense {
    let at = NaiveDateTime::parse_from_str("2024-03-05 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    let mut e = Expense::new(amount, category.into(), "u".into(), at);
    e.id = Some(id);
    e
}

#[test]
fn test_write_expenses() {
    let mut a = expense(1, dec!(12.50), "food");
    a.note = Some("lunch, with Sam".into());
    let b = expense(2, dec!(3), "coffee");

    let mut out = Vec::new();
    let n = write_expenses(&mut out, &[a, b]).unwrap();
    assert_eq!(n, 2);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id,created_at,category,amount,note,share_id");
    assert_eq!(lines[1], "1,2024-03-05 12:00:00,food,12.50,\"lunch, with Sam\",");
    assert_eq!(lines[2], "2,2024-03-05 12:00:00,coffee,3,,");
}

#[test]
fn test_write_expenses_empty_has_header() {
    let mut out = Vec::new();
    assert_eq!(write_expenses(&mut out, &[]).unwrap(), 0);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "id,created_at,category,amount,note,share_id\n"
    );
}

#[test]
fn test_write_report() {
    let mut budget = Budget::new(
        "food".into(),
        Period::new(2024, 3).unwrap(),
        dec!(300),
        "u".into(),
    );
    budget.alert_threshold = Some(dec!(50));
    let items = vec![
        ReportItem::new("books".into(), dec!(40), None).unwrap(),
        ReportItem::new("food".into(), dec!(200), Some(&budget)).unwrap(),
    ];

    let mut out = Vec::new();
    write_report(&mut out, &items).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "category,spent,budget,percent_used,alert");
    assert_eq!(lines[1], "books,40,,,");
    assert_eq!(lines[2], "food,200,300,66.67,yes");
}
