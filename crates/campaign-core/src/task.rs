use crate::error::{CampaignError, Result};
use crate::types::{iso_date, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(with = "iso_date")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Highest subtask number ever issued under this task.
    #[serde(default, rename = "subtaskSeq")]
    pub subtask_seq: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(with = "iso_date")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        responsible: impl Into<String>,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            deadline,
            responsible: responsible.into(),
            status: TaskStatus::Pending,
            subtasks: Vec::new(),
            subtask_seq: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Task list operations (operate on an action's Vec<Task>)
// ---------------------------------------------------------------------------

/// Append a pending task and return its id (`T<n>`).
///
/// `last_seq` is the owner's high-water mark; it is bumped so a removed id is
/// never issued again. A zero mark is seeded from the ids present.
pub fn add_task(
    tasks: &mut Vec<Task>,
    last_seq: &mut u32,
    title: impl Into<String>,
    responsible: impl Into<String>,
    deadline: NaiveDate,
) -> String {
    let n = next_seq(tasks.iter().map(|t| t.id.as_str()), "T").max(*last_seq + 1);
    *last_seq = n;
    let id = format!("T{n}");
    tasks.push(Task::new(id.clone(), title, responsible, deadline));
    id
}

pub fn remove_task(tasks: &mut Vec<Task>, id: &str) -> Result<Task> {
    let pos = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| CampaignError::TaskNotFound(id.to_string()))?;
    Ok(tasks.remove(pos))
}

pub fn set_task_status(tasks: &mut [Task], id: &str, status: TaskStatus) -> Result<()> {
    find_mut(tasks, id)?.status = status;
    Ok(())
}

/// Append a pending subtask under `task_id` and return its id (`<task_id>.<n>`).
pub fn add_subtask(
    tasks: &mut [Task],
    task_id: &str,
    title: impl Into<String>,
    responsible: impl Into<String>,
    deadline: NaiveDate,
) -> Result<String> {
    let task = find_mut(tasks, task_id)?;
    let prefix = format!("{task_id}.");
    let n = next_seq(task.subtasks.iter().map(|s| s.id.as_str()), &prefix)
        .max(task.subtask_seq + 1);
    task.subtask_seq = n;
    let id = format!("{prefix}{n}");
    task.subtasks.push(Subtask {
        id: id.clone(),
        title: title.into(),
        deadline,
        responsible: responsible.into(),
        status: TaskStatus::Pending,
    });
    Ok(id)
}

pub fn remove_subtask(tasks: &mut [Task], id: &str) -> Result<Subtask> {
    for task in tasks.iter_mut() {
        if let Some(pos) = task.subtasks.iter().position(|s| s.id == id) {
            return Ok(task.subtasks.remove(pos));
        }
    }
    Err(CampaignError::SubtaskNotFound(id.to_string()))
}

pub fn set_subtask_status(tasks: &mut [Task], id: &str, status: TaskStatus) -> Result<()> {
    let sub = tasks
        .iter_mut()
        .flat_map(|t| t.subtasks.iter_mut())
        .find(|s| s.id == id)
        .ok_or_else(|| CampaignError::SubtaskNotFound(id.to_string()))?;
    sub.status = status;
    Ok(())
}

/// Human-readable summary: "1/4 done, 2 in progress, 1 pending"
pub fn summarize(tasks: &[Task]) -> String {
    let total = tasks.len();
    let count = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();
    format!(
        "{}/{total} done, {} in progress, {} pending",
        count(TaskStatus::Done),
        count(TaskStatus::InProgress),
        count(TaskStatus::Pending)
    )
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| CampaignError::TaskNotFound(id.to_string()))
}

/// One past the highest `<prefix><n>` suffix among `ids`. Ids that don't
/// follow the pattern are ignored.
fn next_seq<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u32 {
    ids.filter_map(|id| id.strip_prefix(prefix)?.parse::<u32>().ok())
        .max()
        .map_or(1, |n| n + 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn task_lifecycle() {
        let mut tasks: Vec<Task> = Vec::new();
        let mut seq = 0;
        let id = add_task(&mut tasks, &mut seq, "Criar banners", "Web Designer", day(10));
        assert_eq!(id, "T1");
        assert_eq!(tasks[0].status, TaskStatus::Pending);

        set_task_status(&mut tasks, &id, TaskStatus::InProgress).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::InProgress);

        set_task_status(&mut tasks, &id, TaskStatus::Done).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Done);
    }

    #[test]
    fn ids_not_reused_after_removal() {
        let mut tasks: Vec<Task> = Vec::new();
        let mut seq = 0;
        add_task(&mut tasks, &mut seq, "a", "", day(1));
        let t2 = add_task(&mut tasks, &mut seq, "b", "", day(2));
        remove_task(&mut tasks, &t2).unwrap();
        let t3 = add_task(&mut tasks, &mut seq, "c", "", day(3));
        assert_eq!(t3, "T3");
        assert_eq!(seq, 3);
    }

    #[test]
    fn subtask_ids_not_reused_after_removal() {
        let mut tasks: Vec<Task> = Vec::new();
        let mut seq = 0;
        let t1 = add_task(&mut tasks, &mut seq, "a", "", day(1));
        let s1 = add_subtask(&mut tasks, &t1, "x", "", day(1)).unwrap();
        assert_eq!(s1, "T1.1");
        remove_subtask(&mut tasks, &s1).unwrap();
        let s2 = add_subtask(&mut tasks, &t1, "y", "", day(1)).unwrap();
        assert_eq!(s2, "T1.2");
        assert_eq!(tasks[0].subtask_seq, 2);
    }

    #[test]
    fn zero_mark_is_seeded_from_existing_ids() {
        let mut tasks = vec![Task::new("T5", "imported", "", day(1))];
        tasks[0].subtasks.push(Subtask {
            id: "T5.3".to_string(),
            title: "imported".to_string(),
            deadline: day(1),
            responsible: String::new(),
            status: TaskStatus::Pending,
        });
        let mut seq = 0;
        assert_eq!(add_task(&mut tasks, &mut seq, "new", "", day(2)), "T6");
        assert_eq!(add_subtask(&mut tasks, "T5", "new", "", day(2)).unwrap(), "T5.4");
    }

    #[test]
    fn sequence_survives_serialization() {
        let mut tasks: Vec<Task> = Vec::new();
        let mut seq = 0;
        let t1 = add_task(&mut tasks, &mut seq, "a", "", day(1));
        let s1 = add_subtask(&mut tasks, &t1, "x", "", day(1)).unwrap();
        remove_subtask(&mut tasks, &s1).unwrap();

        let json = serde_json::to_string(&tasks[0]).unwrap();
        assert!(json.contains("\"subtaskSeq\":1"));
        let mut reloaded: Vec<Task> = vec![serde_json::from_str(&json).unwrap()];
        assert_eq!(add_subtask(&mut reloaded, &t1, "y", "", day(1)).unwrap(), "T1.2");
    }

    #[test]
    fn foreign_ids_do_not_break_numbering() {
        let mut tasks = vec![Task::new("9f1c-uuid", "imported", "", day(1))];
        let mut seq = 0;
        assert_eq!(add_task(&mut tasks, &mut seq, "new", "", day(2)), "T1");
    }

    #[test]
    fn subtask_lifecycle() {
        let mut tasks: Vec<Task> = Vec::new();
        let mut seq = 0;
        let t1 = add_task(&mut tasks, &mut seq, "Email", "Analista de CRM", day(5));
        let s1 = add_subtask(&mut tasks, &t1, "Copy", "Produtor de Conteúdo", day(3)).unwrap();
        let s2 = add_subtask(&mut tasks, &t1, "Layout", "Web Designer", day(4)).unwrap();
        assert_eq!(s1, "T1.1");
        assert_eq!(s2, "T1.2");

        set_subtask_status(&mut tasks, &s2, TaskStatus::Done).unwrap();
        assert_eq!(tasks[0].subtasks[1].status, TaskStatus::Done);

        let removed = remove_subtask(&mut tasks, &s1).unwrap();
        assert_eq!(removed.title, "Copy");
        assert_eq!(tasks[0].subtasks.len(), 1);
    }

    #[test]
    fn not_found_errors() {
        let mut tasks: Vec<Task> = Vec::new();
        assert!(matches!(
            set_task_status(&mut tasks, "T99", TaskStatus::Done),
            Err(CampaignError::TaskNotFound(_))
        ));
        assert!(matches!(
            add_subtask(&mut tasks, "T1", "x", "", day(1)),
            Err(CampaignError::TaskNotFound(_))
        ));
        assert!(matches!(
            remove_subtask(&mut tasks, "T1.1"),
            Err(CampaignError::SubtaskNotFound(_))
        ));
    }

    #[test]
    fn summary_line() {
        let mut tasks: Vec<Task> = Vec::new();
        let mut seq = 0;
        for t in ["a", "b", "c", "d"] {
            add_task(&mut tasks, &mut seq, t, "", day(1));
        }
        set_task_status(&mut tasks, "T1", TaskStatus::Done).unwrap();
        set_task_status(&mut tasks, "T2", TaskStatus::InProgress).unwrap();
        assert_eq!(summarize(&tasks), "1/4 done, 1 in progress, 2 pending");
    }
}
