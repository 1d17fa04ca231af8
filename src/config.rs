use anyhow::{Context, Result};
use std::path::PathBuf;

/// Overrides the database location.
pub(crate) const DB_ENV: &str = "SPENDLOG_DB";
/// Acting user when `--user` is not given.
pub(crate) const USER_ENV: &str = "SPENDLOG_USER";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) user: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let db_path = match std::env::var_os(DB_ENV) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => default_db_path()?,
        };
        Ok(Self::new(db_path, std::env::var(USER_ENV).ok()))
    }

    fn new(db_path: PathBuf, user: Option<String>) -> Self {
        let user = user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Self { db_path, user }
    }

    /// The `--user` flag wins over the environment. There is no fallback
    /// user: one of the two must be set.
    pub(crate) fn resolve_user(&self, flag: Option<&str>) -> Result<String> {
        flag.map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| self.user.clone())
            .ok_or_else(|| anyhow::anyhow!("No user given. Pass --user <name> or set {USER_ENV}"))
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendlog", "spendlog")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendlog.db"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_flag_overrides_env_user() {
        let cfg = Config::new("x.db".into(), Some("env-user".into()));
        assert_eq!(cfg.resolve_user(Some("alice")).unwrap(), "alice");
        assert_eq!(cfg.resolve_user(None).unwrap(), "env-user");
    }

    #[test]
    fn test_blank_flag_falls_back_to_env() {
        let cfg = Config::new("x.db".into(), Some("env-user".into()));
        assert_eq!(cfg.resolve_user(Some("  ")).unwrap(), "env-user");
    }

    #[test]
    fn test_no_user_is_an_error() {
        let cfg = Config::new("x.db".into(), Some("   ".into()));
        assert!(cfg.user.is_none());
        let err = cfg.resolve_user(None).unwrap_err();
        assert!(err.to_string().contains(USER_ENV));
    }
}
