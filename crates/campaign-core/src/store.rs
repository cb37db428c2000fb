use crate::action::MarketingAction;
use crate::error::{CampaignError, Result};
use crate::paths;
use crate::validate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Key-value medium the collection is persisted in. Values are whole JSON
/// documents; there is no partial update.
pub trait Backend {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, data: &str) -> Result<()>;
}

/// Stores key `K` as `<dir>/K.json`, written atomically.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Backend rooted at a project's `.campaign/` directory.
    pub fn for_root(root: &Path) -> Self {
        Self::new(paths::campaign_dir(root))
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        crate::io::read_optional(&self.path_for(key))
    }

    fn write(&mut self, key: &str, data: &str) -> Result<()> {
        crate::io::atomic_write(&self.path_for(key), data.as_bytes())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, data: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), data.into());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, data: &str) -> Result<()> {
        self.entries.insert(key.to_string(), data.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parse a persisted collection and reject it as a whole if any action is
/// structurally invalid. There is no partial recovery.
pub fn decode_collection(raw: &str) -> Result<Vec<MarketingAction>> {
    let actions: Vec<MarketingAction> = serde_json::from_str(raw)?;
    let issues = validate::check_collection(&actions);
    if let Some(first) = issues.first() {
        return Err(CampaignError::Validation(format!(
            "{first} ({} issue(s) in total)",
            issues.len()
        )));
    }
    Ok(actions)
}

pub fn encode_collection(actions: &[MarketingAction]) -> Result<String> {
    Ok(serde_json::to_string_pretty(actions)?)
}

// ---------------------------------------------------------------------------
// ActionStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MergeReport {
    pub added: usize,
    pub skipped: usize,
}

/// The single source of truth for the action collection. Loaded once, and
/// re-persisted as a whole after every successful mutation. A mutation that
/// fails validation or persistence leaves the in-memory collection unchanged.
pub struct ActionStore<B: Backend> {
    backend: B,
    key: String,
    actions: Vec<MarketingAction>,
    recovered: bool,
}

impl ActionStore<FileBackend> {
    pub fn open_root(root: &Path, key: &str) -> Result<Self> {
        Self::open(FileBackend::for_root(root), key)
    }
}

impl<B: Backend> ActionStore<B> {
    /// Load the collection under `key`. A missing key is an empty plan.
    /// Malformed or invalid data is logged, kept aside under `<key>.corrupt`,
    /// and the store starts empty.
    pub fn open(mut backend: B, key: &str) -> Result<Self> {
        let mut recovered = false;
        let actions = match backend.read(key)? {
            None => Vec::new(),
            Some(raw) => match decode_collection(&raw) {
                Ok(actions) => actions,
                Err(e) => {
                    tracing::error!(key, error = %e, "stored actions are unreadable, starting empty");
                    let aside = format!("{key}.corrupt");
                    if let Err(e) = backend.write(&aside, &raw) {
                        tracing::warn!(key = %aside, error = %e, "could not keep a copy of the unreadable data");
                    }
                    recovered = true;
                    Vec::new()
                }
            },
        };
        tracing::debug!(key, count = actions.len(), "loaded actions");
        Ok(Self {
            backend,
            key: key.to_string(),
            actions,
            recovered,
        })
    }

    /// True when the stored data was unreadable and the store started empty.
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn list(&self) -> &[MarketingAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&MarketingAction> {
        self.actions
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CampaignError::ActionNotFound(id.to_string()))
    }

    /// Full id for an exact id or a unique id prefix.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<String> {
        if self.actions.iter().any(|a| a.id == id_or_prefix) {
            return Ok(id_or_prefix.to_string());
        }
        let matches: Vec<&str> = self
            .actions
            .iter()
            .filter(|a| !id_or_prefix.is_empty() && a.id.starts_with(id_or_prefix))
            .map(|a| a.id.as_str())
            .collect();
        match matches.as_slice() {
            [] => Err(CampaignError::ActionNotFound(id_or_prefix.to_string())),
            [one] => Ok(one.to_string()),
            many => Err(CampaignError::AmbiguousId {
                prefix: id_or_prefix.to_string(),
                matches: many.join(", "),
            }),
        }
    }

    /// Actions ordered by start date; ties keep insertion order.
    pub fn sorted_by_start(&self) -> Vec<&MarketingAction> {
        let mut sorted: Vec<&MarketingAction> = self.actions.iter().collect();
        sorted.sort_by_key(|a| a.start);
        sorted
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn create(&mut self, action: MarketingAction) -> Result<&MarketingAction> {
        validate::ensure_valid(&action)?;
        if self.actions.iter().any(|a| a.id == action.id) {
            return Err(CampaignError::ActionExists(action.id));
        }
        let mut next = self.actions.clone();
        next.push(action);
        self.commit(next)?;
        Ok(&self.actions[self.actions.len() - 1])
    }

    /// Replace the action with the same id wholesale.
    pub fn update(&mut self, action: MarketingAction) -> Result<()> {
        validate::ensure_valid(&action)?;
        let pos = self.position(&action.id)?;
        let mut next = self.actions.clone();
        next[pos] = action;
        self.commit(next)
    }

    /// Apply `f` to a copy of the action, validate the result, and store it.
    pub fn modify<R>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut MarketingAction) -> Result<R>,
    ) -> Result<R> {
        let pos = self.position(id)?;
        let mut edited = self.actions[pos].clone();
        let out = f(&mut edited)?;
        // The id is the identity; edits may not change it.
        edited.id = self.actions[pos].id.clone();
        validate::ensure_valid(&edited)?;
        let mut next = self.actions.clone();
        next[pos] = edited;
        self.commit(next)?;
        Ok(out)
    }

    pub fn delete(&mut self, id: &str) -> Result<MarketingAction> {
        let pos = self.position(id)?;
        let mut next = self.actions.clone();
        let removed = next.remove(pos);
        self.commit(next)?;
        tracing::info!(id, title = %removed.title, "deleted action");
        Ok(removed)
    }

    /// Insert a copy of `id` (see [`MarketingAction::duplicate`]) right after it.
    pub fn duplicate(&mut self, id: &str) -> Result<&MarketingAction> {
        let pos = self.position(id)?;
        let copy = self.actions[pos].duplicate();
        let mut next = self.actions.clone();
        next.insert(pos + 1, copy);
        self.commit(next)?;
        Ok(&self.actions[pos + 1])
    }

    /// Replace the whole collection (import with `--replace`).
    pub fn replace_all(&mut self, actions: Vec<MarketingAction>) -> Result<()> {
        ensure_collection(&actions)?;
        self.commit(actions)
    }

    /// Append the actions whose ids are not present yet.
    pub fn merge(&mut self, incoming: Vec<MarketingAction>) -> Result<MergeReport> {
        ensure_collection(&incoming)?;
        let existing: HashSet<String> = self.actions.iter().map(|a| a.id.clone()).collect();
        let mut next = self.actions.clone();
        let mut report = MergeReport::default();
        for action in incoming {
            if existing.contains(&action.id) {
                tracing::debug!(id = %action.id, "skipping action already in the plan");
                report.skipped += 1;
            } else {
                next.push(action);
                report.added += 1;
            }
        }
        self.commit(next)?;
        Ok(report)
    }

    /// Persist the current collection.
    pub fn flush(&mut self) -> Result<()> {
        let data = encode_collection(&self.actions)?;
        self.backend.write(&self.key, &data)?;
        tracing::debug!(key = %self.key, count = self.actions.len(), "flushed actions");
        Ok(())
    }

    fn commit(&mut self, next: Vec<MarketingAction>) -> Result<()> {
        let data = encode_collection(&next)?;
        self.backend.write(&self.key, &data)?;
        self.actions = next;
        self.recovered = false;
        tracing::debug!(key = %self.key, count = self.actions.len(), "flushed actions");
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.actions
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CampaignError::ActionNotFound(id.to_string()))
    }
}

fn ensure_collection(actions: &[MarketingAction]) -> Result<()> {
    let issues = validate::check_collection(actions);
    match issues.first() {
        None => Ok(()),
        Some(first) => Err(CampaignError::Validation(first.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
