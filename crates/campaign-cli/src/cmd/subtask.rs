use super::{open_plan, parse_date_arg, task::warn_unknown_role};
use crate::output::print_json;
use anyhow::Context;
use campaign_core::{task as task_ops, types::TaskStatus};
use chrono::NaiveDate;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum SubtaskSubcommand {
    /// Add a subtask under a task
    Add {
        action: String,
        task_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        responsible: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        deadline: NaiveDate,
    },
    /// Remove a subtask (e.g. T1.2)
    Remove { action: String, subtask_id: String },
    /// Set a subtask's status (pending, in-progress, done)
    Status {
        action: String,
        subtask_id: String,
        status: TaskStatus,
    },
}

pub fn run(root: &Path, subcmd: SubtaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SubtaskSubcommand::Add {
            action,
            task_id,
            title,
            responsible,
            deadline,
        } => add(root, &action, &task_id, &title, &responsible, deadline, json),
        SubtaskSubcommand::Remove { action, subtask_id } => {
            remove(root, &action, &subtask_id, json)
        }
        SubtaskSubcommand::Status {
            action,
            subtask_id,
            status,
        } => set_status(root, &action, &subtask_id, status, json),
    }
}

fn add(
    root: &Path,
    action: &str,
    task_id: &str,
    title: &str,
    responsible: &str,
    deadline: NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(action)?;
    warn_unknown_role(&plan.config, responsible);

    let subtask_id = plan
        .store
        .modify(&id, |a| {
            task_ops::add_subtask(&mut a.tasks, task_id, title, responsible, deadline)
        })
        .with_context(|| format!("failed to add subtask to '{task_id}'"))?;

    if json {
        print_json(&serde_json::json!({
            "action": id,
            "task_id": task_id,
            "subtask_id": subtask_id,
            "title": title,
        }))?;
    } else {
        println!("Added subtask [{subtask_id}]: {title}");
    }
    Ok(())
}

fn remove(root: &Path, action: &str, subtask_id: &str, json: bool) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(action)?;
    let removed = plan
        .store
        .modify(&id, |a| task_ops::remove_subtask(&mut a.tasks, subtask_id))
        .with_context(|| format!("failed to remove subtask '{subtask_id}'"))?;

    if json {
        print_json(&serde_json::json!({ "action": id, "subtask_id": subtask_id, "removed": true }))?;
    } else {
        println!("Removed subtask [{subtask_id}]: {}", removed.title);
    }
    Ok(())
}

fn set_status(
    root: &Path,
    action: &str,
    subtask_id: &str,
    status: TaskStatus,
    json: bool,
) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(action)?;
    plan.store
        .modify(&id, |a| {
            task_ops::set_subtask_status(&mut a.tasks, subtask_id, status)
        })
        .with_context(|| format!("failed to update subtask '{subtask_id}'"))?;

    if json {
        print_json(&serde_json::json!({
            "action": id,
            "subtask_id": subtask_id,
            "status": status,
        }))?;
    } else {
        println!("Subtask [{subtask_id}] is now {status}");
    }
    Ok(())
}
