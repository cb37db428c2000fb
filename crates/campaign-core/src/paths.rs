use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CAMPAIGN_DIR: &str = ".campaign";
pub const CONFIG_FILE: &str = ".campaign/config.yaml";

/// localStorage key of the browser planner, kept as the default file stem.
pub const DEFAULT_STORAGE_KEY: &str = "marketingActions";
pub const DEFAULT_REPORT_FILE: &str = "plano-marketing-anual.pdf";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn campaign_dir(root: &Path) -> PathBuf {
    root.join(CAMPAIGN_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// File that backs storage key `key`: `.campaign/<key>.json`.
pub fn storage_path(root: &Path, key: &str) -> PathBuf {
    campaign_dir(root).join(format!("{key}.json"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/plan");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/plan/.campaign/config.yaml")
        );
        assert_eq!(
            storage_path(root, DEFAULT_STORAGE_KEY),
            PathBuf::from("/tmp/plan/.campaign/marketingActions.json")
        );
    }
}
