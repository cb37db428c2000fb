use crate::action::MarketingAction;
use crate::types::ActionStatus;
use serde::Serialize;

/// Plan-wide totals shown in the summary block of every view and report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total_budget: f64,
    pub total_revenue: f64,
    /// `total_revenue / total_budget`, or 0 when nothing is budgeted.
    pub average_roas: f64,
}

pub fn summarize<'a, I>(actions: I) -> Summary
where
    I: IntoIterator<Item = &'a MarketingAction>,
{
    let mut s = Summary::default();
    for a in actions {
        s.count += 1;
        s.total_budget += a.budget;
        s.total_revenue += a.revenue_goal;
    }
    s.average_roas = if s.total_budget > 0.0 {
        s.total_revenue / s.total_budget
    } else {
        0.0
    };
    s
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusBreakdown {
    pub planned: usize,
    pub in_progress: usize,
    pub done: usize,
    pub cancelled: usize,
}

impl StatusBreakdown {
    pub fn get(&self, status: ActionStatus) -> usize {
        match status {
            ActionStatus::Planned => self.planned,
            ActionStatus::InProgress => self.in_progress,
            ActionStatus::Done => self.done,
            ActionStatus::Cancelled => self.cancelled,
        }
    }
}

pub fn status_breakdown<'a, I>(actions: I) -> StatusBreakdown
where
    I: IntoIterator<Item = &'a MarketingAction>,
{
    let mut b = StatusBreakdown::default();
    for a in actions {
        match a.status {
            ActionStatus::Planned => b.planned += 1,
            ActionStatus::InProgress => b.in_progress += 1,
            ActionStatus::Done => b.done += 1,
            ActionStatus::Cancelled => b.cancelled += 1,
        }
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn action(budget: f64, revenue: f64) -> MarketingAction {
        let mut a = MarketingAction::new("a", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        a.budget = budget;
        a.revenue_goal = revenue;
        a
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let s = summarize(&Vec::<MarketingAction>::new());
        assert_eq!(s, Summary::default());
        assert_eq!(s.average_roas, 0.0);
    }

    #[test]
    fn two_action_scenario() {
        let actions = vec![action(500.0, 1000.0), action(1500.0, 4500.0)];
        let s = summarize(&actions);
        assert_eq!(s.count, 2);
        assert_eq!(s.total_budget, 2000.0);
        assert_eq!(s.total_revenue, 5500.0);
        assert_eq!(s.average_roas, 2.75);
    }

    #[test]
    fn zero_budget_guards_division() {
        let s = summarize(&vec![action(0.0, 800.0)]);
        assert_eq!(s.total_revenue, 800.0);
        assert_eq!(s.average_roas, 0.0);
    }

    #[test]
    fn order_independent() {
        let mut actions = vec![
            action(250.0, 1000.0),
            action(1500.0, 4500.0),
            action(750.0, 0.0),
        ];
        let forward = summarize(&actions);
        actions.reverse();
        assert_eq!(summarize(&actions), forward);
        actions.swap(0, 1);
        assert_eq!(summarize(&actions), forward);
    }

    #[test]
    fn works_on_filtered_refs() {
        let actions = vec![action(100.0, 300.0), action(200.0, 100.0)];
        let refs: Vec<&MarketingAction> = actions.iter().filter(|a| a.budget > 150.0).collect();
        let s = summarize(refs.iter().copied());
        assert_eq!(s.count, 1);
        assert_eq!(s.average_roas, 0.5);
    }

    #[test]
    fn breakdown_counts_each_status() {
        let mut actions = vec![action(0.0, 0.0), action(0.0, 0.0), action(0.0, 0.0)];
        actions[1].status = ActionStatus::Done;
        actions[2].status = ActionStatus::Done;
        let b = status_breakdown(&actions);
        assert_eq!(b.get(ActionStatus::Planned), 1);
        assert_eq!(b.get(ActionStatus::Done), 2);
        assert_eq!(b.cancelled, 0);
    }
}
