use crate::action::MarketingAction;
use crate::error::CampaignError;
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// YearMonth
// ---------------------------------------------------------------------------

/// A calendar month. Always valid: `month` is in 1..=12.
///
/// Only built through `new`, `containing` or `FromStr`. It serializes as
/// `YYYY-MM` and has no `Deserialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        // Reject years chrono can't represent so first_day/last_day never fail.
        NaiveDate::from_ymd_opt(year, month, 1)?;
        NaiveDate::from_ymd_opt(year, month, 28)?;
        Some(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days(self) -> u32 {
        self.last_day().day()
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CampaignError::InvalidMonth(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Actions whose `[start, end]` interval intersects `month`, in input order.
pub fn filter_by_month(actions: &[MarketingAction], month: YearMonth) -> Vec<&MarketingAction> {
    actions.iter().filter(|a| a.overlaps(month)).collect()
}

/// Actions running on `date` (one calendar cell).
pub fn active_on(actions: &[MarketingAction], date: NaiveDate) -> Vec<&MarketingAction> {
    actions.iter().filter(|a| a.is_active_on(date)).collect()
}

/// Sum of budgets of the actions overlapping `month`. An action spanning
/// several months counts in full in each of them.
pub fn budget_by_month(actions: &[MarketingAction], month: YearMonth) -> f64 {
    filter_by_month(actions, month).iter().map(|a| a.budget).sum()
}

/// Every month from `from` to `to`, both included. Empty if `from > to`.
pub fn months_between(from: YearMonth, to: YearMonth) -> Vec<YearMonth> {
    let mut out = Vec::new();
    let mut m = from;
    while m <= to {
        out.push(m);
        m = m.next();
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn action(start: NaiveDate, end: NaiveDate, budget: f64) -> MarketingAction {
        let mut a = MarketingAction::new("a", start);
        a.end = end;
        a.budget = budget;
        a
    }

    #[test]
    fn month_bounds() {
        assert_eq!(ym("2024-02").last_day(), date(2024, 2, 29));
        assert_eq!(ym("2023-02").days(), 28);
        assert_eq!(ym("2024-12").last_day(), date(2024, 12, 31));
        assert_eq!(ym("2024-12").next(), ym("2025-01"));
        assert_eq!(ym("2024-01").prev(), ym("2023-12"));
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(ym("2024-3").to_string(), "2024-03");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
    }

    #[test]
    fn serializes_as_month_string() {
        let json = serde_json::to_string(&ym("2024-03")).unwrap();
        assert_eq!(json, "\"2024-03\"");
        // Out-of-range months only come in through parsing, which rejects them
        assert!("2024-00".parse::<YearMonth>().is_err());
    }

    #[test]
    fn single_month_scenario() {
        let actions = vec![action(date(2024, 3, 15), date(2024, 3, 20), 1000.0)];
        assert_eq!(filter_by_month(&actions, ym("2024-03")).len(), 1);
        assert!(filter_by_month(&actions, ym("2024-04")).is_empty());
    }

    #[test]
    fn spanning_and_containing_actions() {
        let actions = vec![
            // starts in Feb, ends in Mar
            action(date(2024, 2, 20), date(2024, 3, 5), 100.0),
            // wholly contains April
            action(date(2024, 3, 1), date(2024, 5, 31), 200.0),
            // ends the day before April
            action(date(2024, 3, 1), date(2024, 3, 31), 300.0),
            // starts on April's last day
            action(date(2024, 4, 30), date(2024, 6, 1), 400.0),
        ];
        let april: Vec<f64> = filter_by_month(&actions, ym("2024-04"))
            .iter()
            .map(|a| a.budget)
            .collect();
        assert_eq!(april, vec![200.0, 400.0]);
        assert_eq!(budget_by_month(&actions, ym("2024-03")), 600.0);
    }

    #[test]
    fn filter_is_exact_partition() {
        let actions: Vec<MarketingAction> = (0..40)
            .map(|i| {
                let start = date(2024, 1, 1) + chrono::Days::new(i * 9);
                action(start, start + chrono::Days::new(i % 45), i as f64)
            })
            .collect();
        for month in months_between(ym("2023-12"), ym("2025-03")) {
            let hits = filter_by_month(&actions, month);
            for a in &actions {
                let intersects =
                    a.start <= month.last_day() && a.end >= month.first_day();
                let returned = hits.iter().any(|h| std::ptr::eq(*h, a));
                assert_eq!(intersects, returned, "{month}: {a:?}");
            }
        }
    }

    #[test]
    fn months_range() {
        let months = months_between(ym("2024-11"), ym("2025-02"));
        let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, ["2024-11", "2024-12", "2025-01", "2025-02"]);
        assert!(months_between(ym("2025-01"), ym("2024-01")).is_empty());
    }

    #[test]
    fn active_on_day() {
        let actions = vec![action(date(2024, 3, 15), date(2024, 3, 20), 0.0)];
        assert_eq!(active_on(&actions, date(2024, 3, 20)).len(), 1);
        assert!(active_on(&actions, date(2024, 3, 21)).is_empty());
    }
}
