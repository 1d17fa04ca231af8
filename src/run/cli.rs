use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{flag_value, format_amount, has_flag, positionals, truncate};
use crate::config::{Config, USER_ENV};
use crate::models::{checked_sum, Period};
use crate::tracker::Tracker;
use crate::validate::{parse_amount, parse_timestamp, BudgetCreate, ExpenseCreate};

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];

    match command.as_str() {
        "add" | "a" => cli_add(rest, &session(rest, config)?),
        "budget" | "b" => cli_budget(rest, &session(rest, config)?),
        "total" | "t" => cli_total(rest, &session(rest, config)?),
        "report" | "r" => cli_report(rest, &session(rest, config)?),
        "list" | "ls" => cli_list(rest, &session(rest, config)?),
        "budgets" => cli_budgets(rest, &session(rest, config)?),
        "shared" => cli_shared(rest, &session(rest, config)?),
        "export" => cli_export(rest, &session(rest, config)?),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

/// Open tracker and acting user for one command.
struct Session {
    tracker: Tracker,
    user: String,
}

fn session(rest: &[String], config: &Config) -> Result<Session> {
    let user = config.resolve_user(flag_value(rest, "--user"))?;
    let tracker = Tracker::open(&config.db_path).with_context(|| {
        format!("Failed to open database: {}", config.db_path.display())
    })?;
    Ok(Session { tracker, user })
}

fn print_usage() {
    println!("spendlog — local personal expense tracker");
    println!();
    println!("Usage: spendlog <command> [--user <name>]");
    println!();
    println!("Commands:");
    println!("  add <amount> <category>          Record an expense");
    println!("    --note <text>                  Free-text note");
    println!("    --at <YYYY-MM-DD[THH:MM:SS]>   When it happened (default: now)");
    println!("    --share <id>                   Group with other shared expenses");
    println!("  budget <category> <YYYY-MM> <amount>");
    println!("                                   Set a monthly budget (replaces existing)");
    println!("    --alert <percent>              Warn once this much is used");
    println!("  total [YYYY-MM]                  Total spent in a month (default: current)");
    println!("  report [YYYY-MM]                 Spending vs budget per category");
    println!("    --json                         Print as JSON");
    println!("  list [YYYY-MM]                   List a month's expenses");
    println!("  budgets [YYYY-MM]                List a month's budgets");
    println!("  shared <share_id>                List expenses sharing an id");
    println!("  export [path]                    Export a month to CSV");
    println!("    --month <YYYY-MM>              Month to export (default: current)");
    println!("    --report                       Export the report instead of expenses");
    println!("  --help, -h                       Show this help");
    println!("  --version, -V                    Show version");
    println!();
    println!("The user defaults to ${USER_ENV} when --user is not given.");
}

/// First positional argument as a period, else the current month.
fn period_arg(args: &[String]) -> Result<Period> {
    match positionals(args).first() {
        Some(p) => Ok(p.parse::<Period>()?),
        None => Ok(Period::current()?),
    }
}

fn cli_add(args: &[String], s: &Session) -> Result<()> {
    let pos = positionals(args);
    let (Some(amount), Some(category)) = (pos.first(), pos.get(1)) else {
        anyhow::bail!("Usage: spendlog add <amount> <category> [--note <text>] [--at <date>] [--share <id>]");
    };

    let mut payload = ExpenseCreate::new(parse_amount(amount)?, *category, s.user.as_str());
    if let Some(note) = flag_value(args, "--note") {
        payload = payload.note(note);
    }
    if let Some(at) = flag_value(args, "--at") {
        payload = payload.at(parse_timestamp(at)?);
    }
    if let Some(share) = flag_value(args, "--share") {
        payload = payload.shared(share);
    }

    let expense = s.tracker.create_expense(payload)?;
    println!(
        "Recorded #{} {} {} on {}",
        expense.id.unwrap_or(0),
        format_amount(expense.amount),
        expense.category,
        expense.created_at.format("%Y-%m-%d %H:%M"),
    );
    let current = Period::current()?;
    if !current.contains(&expense.created_at) {
        println!("  (dated outside {current}; see `spendlog list <YYYY-MM>`)");
    }
    Ok(())
}

fn cli_budget(args: &[String], s: &Session) -> Result<()> {
    let pos = positionals(args);
    let (Some(category), Some(period), Some(amount)) = (pos.first(), pos.get(1), pos.get(2))
    else {
        anyhow::bail!("Usage: spendlog budget <category> <YYYY-MM> <amount> [--alert <percent>]");
    };
    let period: Period = period.parse()?;

    let mut payload = BudgetCreate::new(
        *category,
        period.year(),
        period.month(),
        parse_amount(amount)?,
        s.user.as_str(),
    );
    if let Some(alert) = flag_value(args, "--alert") {
        payload = payload.alert_at(parse_amount(alert.trim_end_matches('%'))?);
    }

    let budget = s.tracker.upsert_budget(payload)?;
    print!(
        "Budget for {} in {period}: {}",
        budget.category,
        format_amount(budget.amount)
    );
    match budget.alert_threshold {
        Some(t) => println!(" (alert at {t}%)"),
        None => println!(),
    }
    Ok(())
}

fn cli_total(args: &[String], s: &Session) -> Result<()> {
    let period = period_arg(args)?;
    let total = s
        .tracker
        .total_spent(period.year(), period.month(), &s.user)?;
    println!("{period}: {}", format_amount(total));
    Ok(())
}

fn cli_report(args: &[String], s: &Session) -> Result<()> {
    let period = period_arg(args)?;
    let items = s.tracker.report(period.year(), period.month(), &s.user)?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("spendlog — {period} ({})", s.user);
    println!("{}", "─".repeat(71));
    if items.is_empty() {
        println!("  No spending recorded");
        return Ok(());
    }

    println!(
        "  {:<22} {:>12} {:>12} {:>12} {:>8}",
        "Category", "Spent", "Budget", "Left", "Used"
    );
    for item in &items {
        let budget = item.budget.map(format_amount).unwrap_or_else(|| "-".into());
        let used = item
            .percent_used
            .map(|p| format!("{:.1}%", p.round_dp(1)))
            .unwrap_or_else(|| "-".into());
        let left = item
            .remaining()?
            .map(format_amount)
            .unwrap_or_else(|| "-".into());
        let marker = if item.is_alerting() { " !" } else { "" };
        println!(
            "  {:<22} {:>12} {:>12} {:>12} {:>8}{marker}",
            truncate(&item.category, 22),
            format_amount(item.spent),
            budget,
            left,
            used,
        );
    }
    let total = checked_sum(items.iter().map(|i| i.spent), "report total")?;
    println!("{}", "─".repeat(71));
    println!("  {:<22} {:>12}", "Total", format_amount(total));
    Ok(())
}

fn cli_list(args: &[String], s: &Session) -> Result<()> {
    let period = period_arg(args)?;
    let expenses = s
        .tracker
        .expenses_for_month(period.year(), period.month(), &s.user)?;
    if expenses.is_empty() {
        println!("No expenses for {period}");
        return Ok(());
    }

    println!(
        "{:<6} {:<17} {:<20} {:>12}  Note",
        "ID", "When", "Category", "Amount"
    );
    println!("{}", "─".repeat(72));
    for e in &expenses {
        println!(
            "{:<6} {:<17} {:<20} {:>12}  {}{}",
            e.id.unwrap_or(0),
            e.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&e.category, 20),
            format_amount(e.amount),
            e.note.as_deref().unwrap_or(""),
            if e.is_shared() { " [shared]" } else { "" },
        );
    }
    println!(
        "{} of {} expenses",
        expenses.len(),
        s.tracker.expense_count(&s.user)?
    );
    Ok(())
}

fn cli_budgets(args: &[String], s: &Session) -> Result<()> {
    let period = period_arg(args)?;
    let budgets = s
        .tracker
        .budgets_for_month(period.year(), period.month(), &s.user)?;
    if budgets.is_empty() {
        println!("No budgets for {period}");
        return Ok(());
    }
    for b in &budgets {
        let alert = b
            .alert_threshold
            .map(|t| format!("  alert at {t}%"))
            .unwrap_or_default();
        println!("  {:<24} {:>12}{alert}", b.category, format_amount(b.amount));
    }
    Ok(())
}

fn cli_shared(args: &[String], s: &Session) -> Result<()> {
    let Some(share_id) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: spendlog shared <share_id>");
    };
    let expenses = s.tracker.shared_expenses(share_id, &s.user)?;
    if expenses.is_empty() {
        println!("No expenses shared as '{share_id}'");
        return Ok(());
    }
    for e in &expenses {
        println!(
            "  {}  {:<20} {:>12}",
            e.created_at.format("%Y-%m-%d"),
            truncate(&e.category, 20),
            format_amount(e.amount)
        );
    }
    let total = checked_sum(expenses.iter().map(|e| e.amount), "shared total")?;
    println!("  Total: {}", format_amount(total));
    Ok(())
}

fn cli_export(args: &[String], s: &Session) -> Result<()> {
    let period = match flag_value(args, "--month") {
        Some(m) => m.parse::<Period>()?,
        None => Period::current()?,
    };
    let report = has_flag(args, "--report");
    let kind = if report { "report" } else { "expenses" };

    let output_path = positionals(args)
        .first()
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(format!("{home}/spendlog-{kind}-{period}.csv"))
        });

    let count = if report {
        s.tracker
            .export_report(&output_path, period.year(), period.month(), &s.user)?
    } else {
        s.tracker
            .export_expenses(&output_path, period.year(), period.month(), &s.user)?
    };
    if count == 0 {
        println!("No {kind} for {period} (wrote header only)");
    } else {
        println!("Exported {count} {kind} rows to {}", output_path.display());
    }
    Ok(())
}

fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
