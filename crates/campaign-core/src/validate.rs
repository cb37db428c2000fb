//! Structural checks applied before an action reaches the store and when a
//! persisted collection is loaded. The pure functions elsewhere assume input
//! that passed these checks.

use crate::action::MarketingAction;
use crate::error::{CampaignError, Result};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub action_id: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "action '{}': {}", self.action_id, self.message)
    }
}

/// Problems with a single action. Empty means valid.
pub fn check_action(action: &MarketingAction) -> Vec<String> {
    let mut problems = Vec::new();

    if action.id.trim().is_empty() {
        problems.push("id is empty".to_string());
    }
    if action.title.trim().is_empty() {
        problems.push("title is empty".to_string());
    }
    if action.start > action.end {
        problems.push(format!(
            "start {} is after end {}",
            action.start, action.end
        ));
    }
    for (name, value) in [
        ("budget", action.budget),
        ("revenueGoal", action.revenue_goal),
        ("roas", action.roas),
    ] {
        if !value.is_finite() || value < 0.0 {
            problems.push(format!("{name} must be a non-negative number, got {value}"));
        }
    }

    let mut task_ids = HashSet::new();
    for task in &action.tasks {
        if !task_ids.insert(task.id.as_str()) {
            problems.push(format!("duplicate task id '{}'", task.id));
        }
        let mut sub_ids = HashSet::new();
        for sub in &task.subtasks {
            if !sub_ids.insert(sub.id.as_str()) {
                problems.push(format!(
                    "duplicate subtask id '{}' in task '{}'",
                    sub.id, task.id
                ));
            }
        }
    }

    problems
}

/// Reject an action that fails [`check_action`].
pub fn ensure_valid(action: &MarketingAction) -> Result<()> {
    let problems = check_action(action);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CampaignError::Validation(problems.join("; ")))
    }
}

/// Every issue in a collection, including duplicate action ids.
pub fn check_collection(actions: &[MarketingAction]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut ids = HashSet::new();
    for action in actions {
        if !ids.insert(action.id.as_str()) {
            issues.push(ValidationIssue {
                action_id: action.id.clone(),
                message: "duplicate action id".to_string(),
            });
        }
        issues.extend(check_action(action).into_iter().map(|message| ValidationIssue {
            action_id: action.id.clone(),
            message,
        }));
    }
    issues
}

/// Responsible names (action, tasks, subtasks) that are not in `roles`.
/// Advisory only: callers warn, never reject.
pub fn unknown_responsibles<'a>(action: &'a MarketingAction, roles: &[String]) -> Vec<&'a str> {
    let known = |name: &str| name.is_empty() || roles.iter().any(|r| r == name);
    let mut unknown: Vec<&str> = Vec::new();
    let names = std::iter::once(action.responsible.as_str())
        .chain(action.tasks.iter().map(|t| t.responsible.as_str()))
        .chain(
            action
                .tasks
                .iter()
                .flat_map(|t| t.subtasks.iter().map(|s| s.responsible.as_str())),
        );
    for name in names {
        if !known(name) && !unknown.contains(&name) {
            unknown.push(name);
        }
    }
    unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{add_task, Task};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn valid_action_passes() {
        let a = MarketingAction::new("Páscoa", date(3, 20));
        assert!(check_action(&a).is_empty());
        ensure_valid(&a).unwrap();
    }

    #[test]
    fn reversed_dates_and_negative_amounts() {
        let mut a = MarketingAction::new("x", date(3, 20));
        a.end = date(3, 1);
        a.budget = -1.0;
        a.roas = f64::NAN;
        let problems = check_action(&a);
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(matches!(ensure_valid(&a), Err(CampaignError::Validation(_))));
    }

    #[test]
    fn blank_title_rejected() {
        let a = MarketingAction::new("   ", date(1, 1));
        assert_eq!(check_action(&a), vec!["title is empty".to_string()]);
    }

    #[test]
    fn duplicate_ids_reported() {
        let mut a = MarketingAction::new("x", date(1, 1));
        a.tasks.push(Task::new("T1", "a", "", date(1, 1)));
        a.tasks.push(Task::new("T1", "b", "", date(1, 1)));
        let b = a.clone();
        let issues = check_collection(&[a, b]);
        assert!(issues.iter().any(|i| i.message == "duplicate action id"));
        assert!(issues.iter().any(|i| i.message.contains("duplicate task id")));
    }

    #[test]
    fn unknown_responsible_is_advisory() {
        let roles = vec!["Web Designer".to_string()];
        let mut a = MarketingAction::new("x", date(1, 1));
        a.responsible = "Web Designer".to_string();
        add_task(&mut a.tasks, &mut a.task_seq, "t", "Estagiário", date(1, 1));
        add_task(&mut a.tasks, &mut a.task_seq, "u", "Estagiário", date(1, 1));
        assert_eq!(unknown_responsibles(&a, &roles), vec!["Estagiário"]);
        assert!(check_action(&a).is_empty());
    }
}
