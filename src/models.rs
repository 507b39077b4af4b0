use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::FetchError;

/// One remote activity record. Everything except the timestamp is discarded.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "occurredAt")]
    pub occurred_at: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub items_per_page: u32,
    pub page: u32,
    pub total: u32,
}

/// One page of the remote event log. Events are sorted newest-first by the
/// source; the fetcher's early termination depends on that order.
#[derive(Debug, Deserialize)]
pub struct ScoresPage {
    pub data: Vec<ActivityEvent>,
    pub metadata: PageMetadata,
}

/// Per-day event counts keyed by `YYYY-MM-DD` in the configured reference
/// offset. Built once by the fetcher, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounts {
    pub days: BTreeMap<String, u64>,
}

impl DailyCounts {
    pub fn get(&self, date: NaiveDate) -> u64 {
        self.days.get(&date_key(date)).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.days.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Result of a history fetch. `Complete` with an empty map means the player
/// genuinely has no recent activity; `Truncated` means the fetch stopped
/// before the source was drained and carries whatever was accumulated.
#[derive(Debug)]
pub enum HistoryOutcome {
    Complete(DailyCounts),
    Truncated(DailyCounts, TruncateReason),
}

#[derive(Debug)]
pub enum TruncateReason {
    Transport(FetchError),
    PageCap,
}

impl HistoryOutcome {
    pub fn counts(&self) -> &DailyCounts {
        match self {
            Self::Complete(counts) | Self::Truncated(counts, _) => counts,
        }
    }

    pub fn into_counts(self) -> DailyCounts {
        match self {
            Self::Complete(counts) | Self::Truncated(counts, _) => counts,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Discrete color bucket for a cell. `None` is reserved for padding cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    None,
    Level0,
    Level1,
    Level2,
    Level3,
    Level4,
}

impl Tier {
    pub fn classify(count: u64) -> Self {
        match count {
            10.. => Self::Level4,
            5.. => Self::Level3,
            3.. => Self::Level2,
            1.. => Self::Level1,
            0 => Self::Level0,
        }
    }
}

/// A grid cell: a real day with its count, or a weekday-alignment pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Day { date: NaiveDate, count: u64 },
    Pad,
}

impl Cell {
    pub fn tier(&self) -> Tier {
        match self {
            Self::Day { count, .. } => Tier::classify(*count),
            Self::Pad => Tier::None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Day { date, .. } => Some(*date),
            Self::Pad => None,
        }
    }
}

pub type Week = [Cell; 7];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabel {
    pub week_index: usize,
    pub month: &'static str,
}

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub weeks: Vec<Week>,
    pub month_labels: Vec<MonthLabel>,
}
