use chrono::{FixedOffset, Offset, Utc};
use std::{env, time::Duration};

/// Fetch tuning knobs. Defaults mirror the public BeatLeader API limits:
/// 100-item pages, 2s backoff on 429, 200ms between page requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub page_size: u32,
    /// Ceiling on total pages fetched per call. `None` keeps paging until
    /// the cutoff or the end of the source; `Some(n)` trades possible
    /// truncation for a bounded runtime.
    pub max_pages: Option<u32>,
    pub backoff: Duration,
    pub request_delay: Duration,
    pub request_timeout: Duration,
    /// Reference offset used to bucket event instants into calendar dates.
    /// The same offset must be used when windowing the calendar grid.
    pub utc_offset: FixedOffset,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.beatleader.xyz".to_string(),
            page_size: 100,
            max_pages: None,
            backoff: Duration::from_secs(2),
            request_delay: Duration::from_millis(200),
            request_timeout: Duration::from_secs(10),
            utc_offset: Utc.fix(),
        }
    }
}

impl FetchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("ACTIVITY_API_BASE").unwrap_or(defaults.base_url),
            page_size: env::var("ACTIVITY_PAGE_SIZE")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.page_size),
            max_pages: env::var("ACTIVITY_MAX_PAGES")
                .ok()
                .and_then(|value| value.parse().ok()),
            utc_offset: env::var("ACTIVITY_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|value| value.parse::<i32>().ok())
                .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
                .unwrap_or(defaults.utc_offset),
            backoff: defaults.backoff,
            request_delay: defaults.request_delay,
            request_timeout: defaults.request_timeout,
        }
    }
}
