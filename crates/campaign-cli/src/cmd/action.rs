use super::{confirm, open_plan, parse_date_arg, parse_month, warn_unknown_responsibles};
use crate::output::{print_json, print_table};
use anyhow::Context;
use campaign_core::{
    action::{short_id, MarketingAction},
    month::filter_by_month,
    progress::{progress, subtask_progress},
    report::format::{date_pt, money_pt},
    task as task_ops,
    types::{ActionStatus, Frequency},
};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::Path;

/// Optional fields shared by `create` and `edit`.
#[derive(Args, Default)]
pub struct ActionFields {
    /// End date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    end: Option<NaiveDate>,
    /// weekly | biweekly | monthly
    #[arg(long)]
    frequency: Option<Frequency>,
    /// Budget (R$)
    #[arg(long)]
    budget: Option<f64>,
    /// Revenue goal (R$)
    #[arg(long)]
    revenue_goal: Option<f64>,
    /// Expected ROAS
    #[arg(long)]
    roas: Option<f64>,
    /// Responsible role
    #[arg(long)]
    responsible: Option<String>,
    /// planned | in-progress | done | cancelled
    #[arg(long)]
    status: Option<ActionStatus>,
    /// Campaign objective
    #[arg(long)]
    objective: Option<String>,
    /// Seasonality notes
    #[arg(long)]
    seasonality: Option<String>,
    /// Ideal customer description
    #[arg(long)]
    target_customer: Option<String>,
}

impl ActionFields {
    fn apply(self, action: &mut MarketingAction) {
        if let Some(v) = self.end {
            action.end = v;
        }
        if let Some(v) = self.frequency {
            action.frequency = v;
        }
        if let Some(v) = self.budget {
            action.budget = v;
        }
        if let Some(v) = self.revenue_goal {
            action.revenue_goal = v;
        }
        if let Some(v) = self.roas {
            action.roas = v;
        }
        if let Some(v) = self.responsible {
            action.responsible = v;
        }
        if let Some(v) = self.status {
            action.status = v;
        }
        if let Some(v) = self.objective {
            action.objective = v;
        }
        if let Some(v) = self.seasonality {
            action.seasonality = v;
        }
        if let Some(v) = self.target_customer {
            action.target_customer = v;
        }
    }
}

#[derive(Subcommand)]
pub enum ActionSubcommand {
    /// Create a new marketing action
    Create {
        #[arg(long)]
        title: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        /// Offered product (repeatable)
        #[arg(long = "product")]
        products: Vec<String>,
        #[command(flatten)]
        fields: ActionFields,
    },
    /// Edit an action; only the given fields change
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        /// Append a product (repeatable)
        #[arg(long = "add-product")]
        add_products: Vec<String>,
        /// Remove the product at this 1-based position (repeatable)
        #[arg(long = "remove-product")]
        remove_products: Vec<usize>,
        #[command(flatten)]
        fields: ActionFields,
    },
    /// Show full details for one action
    Show { id: String },
    /// List actions
    List {
        /// Only actions overlapping this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Delete an action
    Delete {
        id: String,
        /// Don't ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Copy an action with a new id and reset progress
    Duplicate { id: String },
}

pub fn run(root: &Path, subcmd: ActionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ActionSubcommand::Create {
            title,
            start,
            products,
            fields,
        } => create(root, title, start, products, fields, json),
        ActionSubcommand::Edit {
            id,
            title,
            start,
            add_products,
            remove_products,
            fields,
        } => edit(
            root,
            &id,
            Edits {
                title,
                start,
                add_products,
                remove_products,
                fields,
            },
            json,
        ),
        ActionSubcommand::Show { id } => show(root, &id, json),
        ActionSubcommand::List { month } => list(root, month.as_deref(), json),
        ActionSubcommand::Delete { id, yes } => delete(root, &id, yes, json),
        ActionSubcommand::Duplicate { id } => duplicate(root, &id, json),
    }
}

fn create(
    root: &Path,
    title: String,
    start: NaiveDate,
    products: Vec<String>,
    fields: ActionFields,
    json: bool,
) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let mut action =
        MarketingAction::with_duration(title, start, plan.config.defaults.duration_days);
    action.frequency = plan.config.defaults.frequency;
    fields.apply(&mut action);
    for p in &products {
        action.add_product(p);
    }

    warn_unknown_responsibles(&plan.config, &action);
    let created = plan.store.create(action).context("failed to create action")?;

    if json {
        print_json(created)?;
    } else {
        println!(
            "Created action [{}]: {} ({} - {})",
            short_id(&created.id),
            created.title,
            created.start,
            created.end
        );
    }
    Ok(())
}

struct Edits {
    title: Option<String>,
    start: Option<NaiveDate>,
    add_products: Vec<String>,
    remove_products: Vec<usize>,
    fields: ActionFields,
}

fn edit(root: &Path, id: &str, edits: Edits, json: bool) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(id)?;

    let mut removals = edits.remove_products;
    removals.sort_unstable();
    removals.dedup();

    let Edits {
        title,
        start,
        add_products,
        fields,
        ..
    } = edits;

    plan.store
        .modify(&id, |a| {
            if let Some(t) = title {
                a.title = t;
            }
            if let Some(s) = start {
                a.start = s;
            }
            fields.apply(a);
            // Highest index first so earlier positions stay valid
            for &pos in removals.iter().rev() {
                if pos == 0 || a.remove_product(pos - 1).is_none() {
                    return Err(campaign_core::CampaignError::Validation(format!(
                        "no product at position {pos}"
                    )));
                }
            }
            for p in &add_products {
                a.add_product(p);
            }
            Ok(())
        })
        .with_context(|| format!("failed to update action '{id}'"))?;

    let action = plan.store.get(&id)?;
    warn_unknown_responsibles(&plan.config, action);

    if json {
        print_json(action)?;
    } else {
        println!("Updated action [{}]: {}", short_id(&id), action.title);
    }
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let id = plan.store.resolve(id)?;
    let a = plan.store.get(&id)?;

    if json {
        print_json(a)?;
        return Ok(());
    }

    println!("Action: {}", a.id);
    println!("Title:           {}", a.title);
    println!("Period:          {} - {} ({} days)", date_pt(a.start), date_pt(a.end), a.duration_days());
    println!("Frequency:       {}", a.frequency);
    println!("Status:          {}", a.status);
    println!("Responsible:     {}", a.responsible);
    println!("Budget:          {}", money_pt(a.budget));
    println!("Revenue goal:    {}", money_pt(a.revenue_goal));
    println!("Expected ROAS:   {:.2}", a.roas);
    if !a.objective.is_empty() {
        println!("Objective:       {}", a.objective);
    }
    if !a.seasonality.is_empty() {
        println!("Seasonality:     {}", a.seasonality);
    }
    if !a.target_customer.is_empty() {
        println!("Target customer: {}", a.target_customer);
    }

    if a.products.is_empty() {
        println!("Products:        (none)");
    } else {
        println!("Products:");
        for (i, p) in a.products.iter().enumerate() {
            println!("  {}. {p}", i + 1);
        }
    }

    if a.tasks.is_empty() {
        println!("Tasks:           (none)");
        return Ok(());
    }
    println!("Tasks:           {}", task_ops::summarize(&a.tasks));
    for t in &a.tasks {
        let subs = if t.subtasks.is_empty() {
            String::new()
        } else {
            format!("  subtasks {}", subtask_progress(t))
        };
        println!(
            "  [{}] {:<11} {}  ({}, due {}){subs}",
            t.id,
            t.status,
            t.title,
            t.responsible,
            date_pt(t.deadline)
        );
        for s in &t.subtasks {
            println!(
                "      [{}] {:<11} {}  ({}, due {})",
                s.id,
                s.status,
                s.title,
                s.responsible,
                date_pt(s.deadline)
            );
        }
    }
    Ok(())
}

fn list(root: &Path, month: Option<&str>, json: bool) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let actions: Vec<&MarketingAction> = match parse_month(month)? {
        Some(m) => filter_by_month(plan.store.list(), m),
        None => plan.store.list().iter().collect(),
    };

    if json {
        print_json(&actions)?;
        return Ok(());
    }

    if actions.is_empty() {
        println!("No marketing actions.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = actions
        .iter()
        .map(|a| {
            vec![
                short_id(&a.id).to_string(),
                a.title.clone(),
                format!("{} - {}", date_pt(a.start), date_pt(a.end)),
                a.responsible.clone(),
                money_pt(a.budget),
                a.status.to_string(),
                progress(&a.tasks).to_string(),
            ]
        })
        .collect();
    print_table(
        &["ID", "TITLE", "PERIOD", "RESPONSIBLE", "BUDGET", "STATUS", "TASKS"],
        rows,
    );
    Ok(())
}

fn delete(root: &Path, id: &str, yes: bool, json: bool) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(id)?;
    let title = plan.store.get(&id)?.title.clone();

    if !yes && !confirm(&format!("Delete marketing action '{title}'?"))? {
        if json {
            print_json(&serde_json::json!({ "id": id, "deleted": false }))?;
        } else {
            println!("Aborted.");
        }
        return Ok(());
    }

    plan.store.delete(&id).context("failed to delete action")?;

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted action [{}]: {title}", short_id(&id));
    }
    Ok(())
}

fn duplicate(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let mut plan = open_plan(root)?;
    let id = plan.store.resolve(id)?;
    let copy = plan
        .store
        .duplicate(&id)
        .context("failed to duplicate action")?;

    if json {
        print_json(copy)?;
    } else {
        println!(
            "Duplicated [{}] as [{}]: {}",
            short_id(&id),
            short_id(&copy.id),
            copy.title
        );
    }
    Ok(())
}
