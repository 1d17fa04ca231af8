pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    amount      TEXT NOT NULL,
    category    TEXT NOT NULL,
    note        TEXT,
    created_at  TEXT NOT NULL,
    user        TEXT NOT NULL DEFAULT 'default_user',
    share_id    TEXT
);

CREATE INDEX IF NOT EXISTS idx_expenses_user_created ON expenses(user, created_at);
CREATE INDEX IF NOT EXISTS idx_expenses_share ON expenses(share_id) WHERE share_id IS NOT NULL;

CREATE TABLE IF NOT EXISTS budgets (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    category         TEXT NOT NULL,
    year             INTEGER NOT NULL,
    month            INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    amount           TEXT NOT NULL,
    user             TEXT NOT NULL DEFAULT 'default_user',
    alert_threshold  TEXT,
    UNIQUE(user, category, year, month)
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
