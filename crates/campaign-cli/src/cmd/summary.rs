use super::{open_plan, parse_month};
use crate::output::print_json;
use campaign_core::{
    action::MarketingAction,
    month::filter_by_month,
    report::format::money_pt,
    summary::{status_breakdown, summarize},
    types::ActionStatus,
};
use std::path::Path;

pub fn run(root: &Path, month: Option<&str>, json: bool) -> anyhow::Result<()> {
    let plan = open_plan(root)?;
    let month = parse_month(month)?;
    let actions: Vec<&MarketingAction> = match month {
        Some(m) => filter_by_month(plan.store.list(), m),
        None => plan.store.list().iter().collect(),
    };

    let summary = summarize(actions.iter().copied());
    let statuses = status_breakdown(actions.iter().copied());

    if json {
        print_json(&serde_json::json!({
            "month": month.map(|m| m.to_string()),
            "count": summary.count,
            "totalBudget": summary.total_budget,
            "totalRevenue": summary.total_revenue,
            "averageRoas": summary.average_roas,
            "status": statuses,
        }))?;
        return Ok(());
    }

    if let Some(m) = month {
        println!("Month:            {m}");
    }
    println!("Actions:          {}", summary.count);
    println!("Total budget:     {}", money_pt(summary.total_budget));
    println!("Expected revenue: {}", money_pt(summary.total_revenue));
    println!("Average ROAS:     {:.2}", summary.average_roas);
    println!();
    for &status in ActionStatus::all() {
        println!("  {:<12} {}", status.to_string(), statuses.get(status));
    }
    Ok(())
}
