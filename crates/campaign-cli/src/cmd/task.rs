use super::{open_plan, parse_date_arg};
use crate::output::{print_json, print_table, progress_bar};
use anyhow::Context;
use campaign_core::{
    config::Config,
    progress::{progress, subtask_progress},
    report::format::date_pt,
    task as task_ops,
    types::TaskStatus,
};
use chrono::NaiveDate;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task to an action
    Add {
        action: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        responsible: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        deadline: NaiveDate,
    },
    /// Remove a task and its subtasks
    Remove { action: String, task_id: String },
    /// Set a task's status (pending, in-progress, done)
    Status {
        action: String,
        task_id: String,
        status: TaskStatus,
    },
    /// List the tasks of an action
    List { action: String },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Add {
            action,
            title,
            responsible,
            deadline,
        } => add(root, &action, &title, &responsible, deadline, json),
        TaskSubcommand::Remove { action, task_id } => remove(root, &action, &task_id, json),
        TaskSubcommand::Status {
            action,
            task_id,
            status,
        } => set_status(root, &action, &task_id, status, json),
        TaskSubcommand::List { action } => list(root, &action, json),
    }
}

pub(super) fn warn_unknown_role(config: &Config, name: &str) {
    if !name.is_empty() && !config.is_known_role(name) {
        tracing::warn!("'{name}' is not one of the configured roles (see 'campaign config roles')");
    }
}

fn add(
    root: &Path,
    action: &str,
    title: &str,
    responsible: &str,
    deadline: NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(action)?;
    warn_unknown_role(&plan.config, responsible);

    let task_id = plan
        .store
        .modify(&id, |a| {
            Ok(task_ops::add_task(&mut a.tasks, &mut a.task_seq, title, responsible, deadline))
        })
        .context("failed to add task")?;

    if json {
        print_json(&serde_json::json!({ "action": id, "task_id": task_id, "title": title }))?;
    } else {
        println!("Added task [{task_id}]: {title}");
    }
    Ok(())
}

fn remove(root: &Path, action: &str, task_id: &str, json: bool) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(action)?;
    let removed = plan
        .store
        .modify(&id, |a| task_ops::remove_task(&mut a.tasks, task_id))
        .with_context(|| format!("failed to remove task '{task_id}'"))?;

    if json {
        print_json(&serde_json::json!({ "action": id, "task_id": task_id, "removed": true }))?;
    } else {
        println!("Removed task [{task_id}]: {}", removed.title);
    }
    Ok(())
}

fn set_status(
    root: &Path,
    action: &str,
    task_id: &str,
    status: TaskStatus,
    json: bool,
) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(action)?;
    plan.store
        .modify(&id, |a| task_ops::set_task_status(&mut a.tasks, task_id, status))
        .with_context(|| format!("failed to update task '{task_id}'"))?;

    if json {
        print_json(
            &serde_json::json!({ "action": id, "task_id": task_id, "status": status }),
        )?;
    } else {
        println!("Task [{task_id}] is now {status}");
    }
    Ok(())
}

fn list(root: &Path, action: &str, json: bool) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let id = plan.store.resolve(action)?;
    let a = plan.store.get(&id)?;

    if json {
        print_json(&serde_json::json!({
            "action": id,
            "progress": progress(&a.tasks),
            "tasks": a.tasks,
        }))?;
        return Ok(());
    }

    if a.tasks.is_empty() {
        println!("No tasks for '{}'.", a.title);
        return Ok(());
    }

    let p = progress(&a.tasks);
    println!("{}  {}", a.title, progress_bar(p.ratio(), 20));
    println!("{}\n", task_ops::summarize(&a.tasks));

    let mut rows = Vec::new();
    for t in &a.tasks {
        let subs = if t.subtasks.is_empty() {
            "-".to_string()
        } else {
            subtask_progress(t).to_string()
        };
        rows.push(vec![
            t.id.clone(),
            t.status.to_string(),
            t.title.clone(),
            t.responsible.clone(),
            date_pt(t.deadline),
            subs,
        ]);
        for s in &t.subtasks {
            rows.push(vec![
                format!("  {}", s.id),
                s.status.to_string(),
                format!("  {}", s.title),
                s.responsible.clone(),
                date_pt(s.deadline),
                String::new(),
            ]);
        }
    }
    print_table(
        &["ID", "STATUS", "TITLE", "RESPONSIBLE", "DEADLINE", "SUBTASKS"],
        rows,
    );
    Ok(())
}
