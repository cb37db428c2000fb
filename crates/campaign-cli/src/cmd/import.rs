use super::open_plan;
use crate::output::print_json;
use anyhow::Context;
use campaign_core::store::decode_collection;
use std::path::Path;

pub fn run(root: &Path, file: &Path, replace: bool, json: bool) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let incoming = decode_collection(&raw)
        .with_context(|| format!("{} is not a valid action collection", file.display()))?;

    if replace {
        let count = incoming.len();
        plan.store
            .replace_all(incoming)
            .context("failed to replace the plan")?;
        if json {
            print_json(&serde_json::json!({ "replaced": true, "added": count, "skipped": 0 }))?;
        } else {
            println!("Replaced the plan with {count} action(s)");
        }
        return Ok(());
    }

    let report = plan.store.merge(incoming).context("failed to merge actions")?;
    if json {
        print_json(&serde_json::json!({
            "replaced": false,
            "added": report.added,
            "skipped": report.skipped,
        }))?;
    } else {
        println!(
            "Imported {} action(s), skipped {} already in the plan",
            report.added, report.skipped
        );
    }
    Ok(())
}
