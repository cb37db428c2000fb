use crate::error::CampaignError;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// How often an action repeats. Informational only: nothing schedules on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    #[serde(alias = "semanal")]
    Weekly,
    #[serde(alias = "quinzenal")]
    Biweekly,
    #[serde(alias = "mensal")]
    Monthly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Label used in the exported report.
    pub fn label_pt(self) -> &'static str {
        match self {
            Frequency::Weekly => "semanal",
            Frequency::Biweekly => "quinzenal",
            Frequency::Monthly => "mensal",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "semanal" => Ok(Frequency::Weekly),
            "biweekly" | "quinzenal" => Ok(Frequency::Biweekly),
            "monthly" | "mensal" => Ok(Frequency::Monthly),
            _ => Err(CampaignError::InvalidFrequency(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    #[default]
    #[serde(alias = "planejado")]
    Planned,
    #[serde(alias = "em andamento")]
    InProgress,
    #[serde(alias = "concluído", alias = "concluido")]
    Done,
    #[serde(alias = "cancelado")]
    Cancelled,
}

impl ActionStatus {
    pub fn all() -> &'static [ActionStatus] {
        &[
            ActionStatus::Planned,
            ActionStatus::InProgress,
            ActionStatus::Done,
            ActionStatus::Cancelled,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::Planned => "planned",
            ActionStatus::InProgress => "in-progress",
            ActionStatus::Done => "done",
            ActionStatus::Cancelled => "cancelled",
        }
    }

    pub fn label_pt(self) -> &'static str {
        match self {
            ActionStatus::Planned => "planejado",
            ActionStatus::InProgress => "em andamento",
            ActionStatus::Done => "concluído",
            ActionStatus::Cancelled => "cancelado",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" | "planejado" => Ok(ActionStatus::Planned),
            "in-progress" | "in_progress" | "em andamento" => Ok(ActionStatus::InProgress),
            "done" | "concluído" | "concluido" => Ok(ActionStatus::Done),
            "cancelled" | "canceled" | "cancelado" => Ok(ActionStatus::Cancelled),
            _ => Err(CampaignError::InvalidStatus(format!(
                "'{s}' (expected planned, in-progress, done or cancelled)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status shared by tasks and subtasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "pendente")]
    Pending,
    #[serde(alias = "em andamento")]
    InProgress,
    #[serde(alias = "concluído", alias = "concluido")]
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn label_pt(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pendente",
            TaskStatus::InProgress => "em andamento",
            TaskStatus::Done => "concluído",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendente" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" | "em andamento" => Ok(TaskStatus::InProgress),
            "done" | "concluído" | "concluido" => Ok(TaskStatus::Done),
            _ => Err(CampaignError::InvalidStatus(format!(
                "'{s}' (expected pending, in-progress or done)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps are moved to the local time zone and then truncated to the day,
/// which is the date a browser showed for the same `Date` value.
pub fn parse_date(s: &str) -> crate::Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .map_err(|_| CampaignError::InvalidDate(s.to_string()))
}

/// Serde adapter: dates are written as `YYYY-MM-DD` and read with [`parse_date`].
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_portuguese_aliases() {
        let s: ActionStatus = serde_json::from_str("\"em andamento\"").unwrap();
        assert_eq!(s, ActionStatus::InProgress);
        let s: ActionStatus = serde_json::from_str("\"concluído\"").unwrap();
        assert_eq!(s, ActionStatus::Done);
        let t: TaskStatus = serde_json::from_str("\"pendente\"").unwrap();
        assert_eq!(t, TaskStatus::Pending);
        let f: Frequency = serde_json::from_str("\"quinzenal\"").unwrap();
        assert_eq!(f, Frequency::Biweekly);
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ActionStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Done).unwrap(), "\"done\"");
    }

    #[test]
    fn from_str_matches_display() {
        for s in ActionStatus::all() {
            assert_eq!(s.to_string().parse::<ActionStatus>().unwrap(), *s);
        }
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("daily".parse::<Frequency>().is_err());
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15").unwrap(), expected);
        assert_eq!(parse_date("2024-03-15T12:00:00.000Z").unwrap(), expected);
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn timestamps_take_the_local_calendar_day() {
        // Evening in UTC-3 is already the next day in UTC
        let raw = "2024-03-16T01:30:00.000Z";
        let local = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .date_naive();
        assert_eq!(parse_date(raw).unwrap(), local);

        let west = DateTime::parse_from_rfc3339("2024-03-15T22:30:00-03:00").unwrap();
        assert_eq!(
            parse_date("2024-03-15T22:30:00-03:00").unwrap(),
            west.with_timezone(&Local).date_naive()
        );
    }
}
