use crate::month::YearMonth;
use crate::task::Task;
use crate::types::{iso_date, ActionStatus, Frequency, TaskStatus};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default length of a new action, in days, when no end date is given.
pub const DEFAULT_DURATION_DAYS: u64 = 7;

// ---------------------------------------------------------------------------
// MarketingAction
// ---------------------------------------------------------------------------

/// One campaign in the plan. Field names match the JSON the browser planner
/// persisted, so its exports load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingAction {
    pub id: String,
    pub title: String,
    #[serde(with = "iso_date")]
    pub start: NaiveDate,
    #[serde(with = "iso_date")]
    pub end: NaiveDate,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub seasonality: String,
    #[serde(default)]
    pub target_customer: String,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub revenue_goal: f64,
    #[serde(default)]
    pub roas: f64,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Highest task number ever issued for this action.
    #[serde(default)]
    pub task_seq: u32,
}

impl MarketingAction {
    /// A fresh `planned` action running for [`DEFAULT_DURATION_DAYS`] from `start`.
    pub fn new(title: impl Into<String>, start: NaiveDate) -> Self {
        Self::with_duration(title, start, DEFAULT_DURATION_DAYS)
    }

    pub fn with_duration(title: impl Into<String>, start: NaiveDate, days: u64) -> Self {
        let end = start.checked_add_days(Days::new(days)).unwrap_or(start);
        Self {
            id: new_id(),
            title: title.into(),
            start,
            end,
            frequency: Frequency::default(),
            budget: 0.0,
            objective: String::new(),
            seasonality: String::new(),
            target_customer: String::new(),
            products: Vec::new(),
            revenue_goal: 0.0,
            roas: 0.0,
            responsible: String::new(),
            status: ActionStatus::Planned,
            tasks: Vec::new(),
            task_seq: 0,
        }
    }

    /// Copy with a fresh id, a "(copy)" title and all progress reset.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        copy.title = format!("{} (copy)", self.title);
        copy.status = ActionStatus::Planned;
        for task in &mut copy.tasks {
            task.status = TaskStatus::Pending;
            for sub in &mut task.subtasks {
                sub.status = TaskStatus::Pending;
            }
        }
        copy
    }

    /// Inclusive overlap of `[start, end]` with `[from, to]`.
    pub fn overlaps_range(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start <= to && self.end >= from
    }

    pub fn overlaps(&self, month: YearMonth) -> bool {
        self.overlaps_range(month.first_day(), month.last_day())
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    /// Append a product label; blank labels are ignored. Returns true if added.
    pub fn add_product(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        self.products.push(label.to_string());
        true
    }

    /// Remove the product at `index`, returning it.
    pub fn remove_product(&mut self, index: usize) -> Option<String> {
        (index < self.products.len()).then(|| self.products.remove(index))
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// First 8 characters of an id, for tables.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_action_defaults() {
        let a = MarketingAction::new("Black Friday", date(2024, 11, 20));
        assert_eq!(a.status, ActionStatus::Planned);
        assert_eq!(a.frequency, Frequency::Weekly);
        assert_eq!(a.end, date(2024, 11, 27));
        assert!(a.tasks.is_empty());
        assert_eq!(a.id.len(), 36);
    }

    #[test]
    fn duplicate_resets_progress() {
        let mut a = MarketingAction::new("Dia das Mães", date(2024, 5, 1));
        a.status = ActionStatus::Done;
        let tid = task::add_task(
            &mut a.tasks,
            &mut a.task_seq,
            "Briefing",
            "Web Designer",
            date(2024, 4, 20),
        );
        task::add_subtask(&mut a.tasks, &tid, "Banner", "Web Designer", date(2024, 4, 18)).unwrap();
        task::set_task_status(&mut a.tasks, &tid, TaskStatus::Done).unwrap();
        a.tasks[0].subtasks[0].status = TaskStatus::Done;

        let copy = a.duplicate();
        assert_ne!(copy.id, a.id);
        assert_eq!(copy.title, "Dia das Mães (copy)");
        assert_eq!(copy.status, ActionStatus::Planned);
        assert_eq!(copy.tasks[0].status, TaskStatus::Pending);
        assert_eq!(copy.tasks[0].subtasks[0].status, TaskStatus::Pending);
        assert_eq!(copy.start, a.start);
    }

    #[test]
    fn json_uses_camel_case_and_iso_dates() {
        let mut a = MarketingAction::new("Verão", date(2024, 1, 10));
        a.revenue_goal = 10.0;
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["start"], "2024-01-10");
        assert_eq!(json["revenueGoal"], 10.0);
        assert!(json.get("targetCustomer").is_some());
    }

    #[test]
    fn loads_browser_payload() {
        let raw = r#"{
            "id": "lq2x9a",
            "title": "Natal",
            "start": "2024-12-01T12:00:00.000Z",
            "end": "2024-12-24T12:00:00.000Z",
            "frequency": "mensal",
            "budget": 2500,
            "objective": "Vender kits",
            "seasonality": "Fim de ano",
            "targetCustomer": "Presenteadores",
            "products": ["Kit A"],
            "revenueGoal": 10000,
            "roas": 4,
            "responsible": "Analista de Mídia",
            "status": "em andamento"
        }"#;
        let a: MarketingAction = serde_json::from_str(raw).unwrap();
        assert_eq!(a.start, date(2024, 12, 1));
        assert_eq!(a.end, date(2024, 12, 24));
        assert_eq!(a.frequency, Frequency::Monthly);
        assert_eq!(a.status, ActionStatus::InProgress);
        assert!(a.tasks.is_empty());
    }

    #[test]
    fn overlap_is_inclusive() {
        let mut a = MarketingAction::new("x", date(2024, 3, 31));
        a.end = date(2024, 4, 1);
        assert!(a.overlaps_range(date(2024, 4, 1), date(2024, 4, 30)));
        assert!(a.overlaps_range(date(2024, 3, 1), date(2024, 3, 31)));
        assert!(!a.overlaps_range(date(2024, 4, 2), date(2024, 4, 30)));
        assert_eq!(a.duration_days(), 2);
    }

    #[test]
    fn products_add_and_remove() {
        let mut a = MarketingAction::new("x", date(2024, 1, 1));
        assert!(a.add_product("  Batom  "));
        assert!(!a.add_product("   "));
        assert_eq!(a.products, vec!["Batom".to_string()]);
        assert_eq!(a.remove_product(3), None);
        assert_eq!(a.remove_product(0).as_deref(), Some("Batom"));
    }
}
