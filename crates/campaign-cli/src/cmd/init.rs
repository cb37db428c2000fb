use anyhow::Context;
use campaign_core::{config::Config, io, paths, store::ActionStore};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "marketing".to_string());

    println!("Initializing marketing plan in: {}", root.display());

    let dir = paths::campaign_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    let config = if config_path.exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config")?
    } else {
        let cfg = Config::new(&project_name);
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        cfg
    };

    let key = &config.storage.key;
    let data_file = format!("{}/{key}.json", paths::CAMPAIGN_DIR);
    if paths::storage_path(root, key).exists() {
        println!("  exists:  {data_file}");
    } else {
        let mut store =
            ActionStore::open_root(root, key).context("failed to open the action store")?;
        store.flush().context("failed to write the action store")?;
        println!("  created: {data_file}");
    }

    println!("\nNext: campaign action create --title \"...\" --start YYYY-MM-DD");
    Ok(())
}
