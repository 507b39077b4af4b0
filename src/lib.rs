pub mod calendar;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod models;

pub use calendar::{build_grid, build_grid_at};
pub use config::FetchConfig;
pub use errors::FetchError;
pub use fetcher::{reduce_events, HistoryFetcher};
pub use models::{CalendarGrid, Cell, DailyCounts, HistoryOutcome, MonthLabel, Tier, TruncateReason, Week};
