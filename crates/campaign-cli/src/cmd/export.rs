use super::{open_plan, today};
use crate::output::print_json;
use anyhow::Context;
use campaign_core::report::{self, ReportOptions};
use std::path::Path;

pub fn run(root: &Path, output: Option<&Path>, open: bool, json: bool) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let path = match output {
        Some(p) => p.to_path_buf(),
        None => root.join(&plan.config.report.file_name),
    };

    let options = ReportOptions {
        title: plan.config.report.title.clone(),
        generated_on: today(),
    };
    let pages = report::export(plan.store.list(), &options, &path)
        .with_context(|| format!("failed to export report to {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "pages": pages,
            "actions": plan.store.len(),
        }))?;
    } else {
        println!(
            "Exported {} action(s) to {} ({pages} page(s))",
            plan.store.len(),
            path.display()
        );
    }

    if open {
        open::that(&path).with_context(|| format!("failed to open {}", path.display()))?;
    }
    Ok(())
}
