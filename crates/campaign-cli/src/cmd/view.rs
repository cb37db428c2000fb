use super::{open_plan, parse_month, today};
use crate::output::{print_json, print_table, progress_bar};
use campaign_core::{
    action::{short_id, MarketingAction},
    month::{active_on, budget_by_month, filter_by_month, months_between, YearMonth},
    progress::task_progress,
    report::format::{date_pt, money_pt, month_name_pt},
    summary::summarize,
};
use chrono::Datelike;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ViewSubcommand {
    /// Month grid with the number of running actions per day
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Month-by-month budget timeline
    Timeline {
        /// First month (YYYY-MM, default: current month)
        #[arg(long)]
        from: Option<String>,
        /// Number of months to show (default: this month and the next twelve)
        #[arg(long, default_value_t = 13)]
        months: u32,
        /// List the actions under each month
        #[arg(long)]
        expand: bool,
    },
    /// Every action, ordered by start date
    List,
}

pub fn run(root: &Path, subcmd: ViewSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ViewSubcommand::Calendar { month } => calendar(root, month.as_deref(), json),
        ViewSubcommand::Timeline {
            from,
            months,
            expand,
        } => timeline(root, from.as_deref(), months, expand, json),
        ViewSubcommand::List => list(root, json),
    }
}

const WEEKDAYS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

/// Header line such as `Março 2024`.
fn month_label(m: YearMonth) -> String {
    let name = month_name_pt(m.month());
    let mut chars = name.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{capitalized} {}", m.year())
}

/// Week rows of day cells, Sunday first. `None` pads days outside the month.
fn month_grid(m: YearMonth) -> Vec<[Option<u32>; 7]> {
    let offset = m.first_day().weekday().num_days_from_sunday() as usize;
    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut col = offset;
    for day in 1..=m.days() {
        week[col] = Some(day);
        col += 1;
        if col == 7 {
            weeks.push(week);
            week = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        weeks.push(week);
    }
    weeks
}

fn calendar(root: &Path, month: Option<&str>, json: bool) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let month = parse_month(month)?.unwrap_or_else(|| YearMonth::containing(today()));
    let actions = plan.store.list();
    let in_month = filter_by_month(actions, month);

    if json {
        let days: Vec<serde_json::Value> = (1..=month.days())
            .filter_map(|d| {
                let date = month.first_day().with_day(d)?;
                let ids: Vec<&str> = active_on(actions, date)
                    .iter()
                    .map(|a| a.id.as_str())
                    .collect();
                Some(serde_json::json!({ "date": date.to_string(), "actions": ids }))
            })
            .collect();
        print_json(&serde_json::json!({
            "month": month.to_string(),
            "days": days,
            "actions": in_month,
        }))?;
        return Ok(());
    }

    println!("{}\n", month_label(month));
    println!("{}", WEEKDAYS.map(|d| format!("{d:<6}")).concat().trim_end());
    for week in month_grid(month) {
        let mut line = String::new();
        for cell in week {
            let text = match cell.and_then(|d| month.first_day().with_day(d)) {
                Some(date) => {
                    let n = active_on(actions, date).len();
                    if n == 0 {
                        format!("{:>2}", date.day())
                    } else {
                        format!("{:>2}({n})", date.day())
                    }
                }
                None => String::new(),
            };
            line.push_str(&format!("{text:<6}"));
        }
        println!("{}", line.trim_end());
    }
    println!();

    if in_month.is_empty() {
        println!("No actions in {month}.");
        return Ok(());
    }
    for a in &in_month {
        println!(
            "  [{}] {} - {}  {}  {}  ({})",
            short_id(&a.id),
            date_pt(a.start),
            date_pt(a.end),
            a.title,
            money_pt(a.budget),
            a.status
        );
    }
    Ok(())
}

fn timeline(
    root: &Path,
    from: Option<&str>,
    months: u32,
    expand: bool,
    json: bool,
) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let first = parse_month(from)?.unwrap_or_else(|| YearMonth::containing(today()));
    let mut last = first;
    for _ in 1..months.max(1) {
        last = last.next();
    }
    let actions = plan.store.list();
    let summary = summarize(actions);

    if json {
        let rows: Vec<serde_json::Value> = months_between(first, last)
            .into_iter()
            .map(|m| {
                let ids: Vec<&str> = filter_by_month(actions, m)
                    .iter()
                    .map(|a| a.id.as_str())
                    .collect();
                serde_json::json!({
                    "month": m.to_string(),
                    "budget": budget_by_month(actions, m),
                    "actions": ids,
                })
            })
            .collect();
        print_json(&serde_json::json!({ "summary": summary, "months": rows }))?;
        return Ok(());
    }

    println!("Total budget:     {}", money_pt(summary.total_budget));
    println!("Expected revenue: {}", money_pt(summary.total_revenue));
    println!();

    for m in months_between(first, last) {
        let in_month = filter_by_month(actions, m);
        println!(
            "{:<16} {:>3} action(s)  {:>16}",
            month_label(m),
            in_month.len(),
            money_pt(budget_by_month(actions, m))
        );
        if expand {
            for a in &in_month {
                println!(
                    "    {} {}  {} - {}  {}",
                    progress_bar(task_progress(&a.tasks), 10),
                    a.title,
                    date_pt(a.start),
                    date_pt(a.end),
                    money_pt(a.budget)
                );
            }
        }
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let sorted = plan.store.sorted_by_start();

    if json {
        print_json(&sorted)?;
        return Ok(());
    }
    if sorted.is_empty() {
        println!("No marketing actions.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = sorted.iter().map(|a| row(a)).collect();
    print_table(
        &["ID", "TITLE", "START", "END", "FREQUENCY", "BUDGET", "REVENUE GOAL", "STATUS"],
        rows,
    );
    Ok(())
}

fn row(a: &MarketingAction) -> Vec<String> {
    vec![
        short_id(&a.id).to_string(),
        a.title.clone(),
        date_pt(a.start),
        date_pt(a.end),
        a.frequency.to_string(),
        money_pt(a.budget),
        money_pt(a.revenue_goal),
        a.status.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_starts_on_the_right_weekday() {
        // March 2024 starts on a Friday
        let grid = month_grid(YearMonth::new(2024, 3).unwrap());
        assert_eq!(grid[0][5], Some(1));
        assert_eq!(grid[0][4], None);
        let cells: usize = grid.iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(cells, 31);
    }

    #[test]
    fn february_in_a_leap_year() {
        let grid = month_grid(YearMonth::new(2024, 2).unwrap());
        let last = grid.iter().flatten().flatten().max().copied();
        assert_eq!(last, Some(29));
    }

    #[test]
    fn label_is_capitalized() {
        assert_eq!(month_label(YearMonth::new(2024, 3).unwrap()), "Março 2024");
    }
}
