use crate::task::Task;
use crate::types::TaskStatus;
use serde::Serialize;
use std::fmt;

/// Completed/total counts behind a progress ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// `done / total`, 0 for an empty list. Always within `[0, 1]`.
    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    pub fn percent(self) -> u32 {
        (self.ratio() * 100.0).round() as u32
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

/// Progress over an action's top-level tasks. Subtasks do not count.
pub fn progress(tasks: &[Task]) -> Progress {
    Progress {
        done: tasks.iter().filter(|t| t.status == TaskStatus::Done).count(),
        total: tasks.len(),
    }
}

pub fn task_progress(tasks: &[Task]) -> f64 {
    progress(tasks).ratio()
}

/// Progress over one task's subtasks, for display next to the task.
pub fn subtask_progress(task: &Task) -> Progress {
    Progress {
        done: task
            .subtasks
            .iter()
            .filter(|s| s.status == TaskStatus::Done)
            .count(),
        total: task.subtasks.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{add_subtask, add_task, set_task_status};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(task_progress(&[]), 0.0);
        assert_eq!(progress(&[]).to_string(), "0/0");
    }

    #[test]
    fn one_of_four_done() {
        let mut tasks = Vec::new();
        let mut seq = 0;
        for t in ["a", "b", "c", "d"] {
            add_task(&mut tasks, &mut seq, t, "", day());
        }
        set_task_status(&mut tasks, "T3", TaskStatus::Done).unwrap();
        assert_eq!(task_progress(&tasks), 0.25);
        assert_eq!(progress(&tasks).percent(), 25);
    }

    #[test]
    fn ratio_stays_in_unit_interval() {
        let mut tasks = Vec::new();
        let mut seq = 0;
        for i in 0..7 {
            let id = add_task(&mut tasks, &mut seq, format!("t{i}"), "", day());
            if i % 2 == 0 {
                set_task_status(&mut tasks, &id, TaskStatus::Done).unwrap();
            }
            let r = task_progress(&tasks);
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn subtasks_do_not_roll_up() {
        let mut tasks = Vec::new();
        let mut seq = 0;
        let t1 = add_task(&mut tasks, &mut seq, "parent", "", day());
        let s1 = add_subtask(&mut tasks, &t1, "child", "", day()).unwrap();
        crate::task::set_subtask_status(&mut tasks, &s1, TaskStatus::Done).unwrap();
        assert_eq!(task_progress(&tasks), 0.0);
        assert_eq!(subtask_progress(&tasks[0]), Progress { done: 1, total: 1 });
    }
}
