pub mod action;
pub mod config;
pub mod export;
pub mod import;
pub mod init;
pub mod subtask;
pub mod summary;
pub mod task;
pub mod view;

use anyhow::Context;
use campaign_core::{
    action::MarketingAction,
    config::Config,
    month::YearMonth,
    store::{ActionStore, FileBackend},
    types, validate,
};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::Path;

/// Config plus the loaded action collection for one invocation.
pub struct Plan {
    pub config: Config,
    pub store: ActionStore<FileBackend>,
}

pub fn open_plan(root: &Path) -> anyhow::Result<Plan> {
    let config = Config::load(root).context("failed to load config")?;
    if let Some(problem) = config.storage_key_problem() {
        anyhow::bail!("invalid config: {problem} (see 'campaign config validate')");
    }
    let store = ActionStore::open_root(root, &config.storage.key)
        .context("failed to open the action store")?;
    if store.recovered_from_corruption() {
        eprintln!(
            "warning: stored actions were unreadable; a copy was kept as {}.corrupt.json",
            config.storage.key
        );
    }
    Ok(Plan { config, store })
}

/// clap value parser for `YYYY-MM-DD` (RFC 3339 timestamps are accepted too).
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    types::parse_date(s).map_err(|e| e.to_string())
}

pub fn parse_month(s: Option<&str>) -> anyhow::Result<Option<YearMonth>> {
    s.map(|m| m.parse::<YearMonth>())
        .transpose()
        .map_err(anyhow::Error::from)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Responsible names outside the configured roles are kept, but reported.
pub fn warn_unknown_responsibles(config: &Config, action: &MarketingAction) {
    for name in validate::unknown_responsibles(action, &config.roles) {
        tracing::warn!("'{name}' is not one of the configured roles (see 'campaign config roles')");
    }
}

/// Ask a yes/no question on stdin. Anything but y/yes (any case) is a no.
/// The prompt is written to stderr.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
}
