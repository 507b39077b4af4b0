use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::models::{date_key, ActivityEvent, DailyCounts, HistoryOutcome, ScoresPage, TruncateReason};
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{debug, error, warn};

const LOOKBACK_SECS: i64 = 365 * 24 * 60 * 60;

/// Pulls a player's event history from the paginated remote source and
/// reduces it to per-day counts. Requests are strictly sequential; the
/// remote rate limit is the reason there is no per-page concurrency.
pub struct HistoryFetcher {
    client: Client,
    config: FetchConfig,
}

impl HistoryFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(FetchError::Network)?;
        Ok(Self { client, config })
    }

    /// Fetches all activity newer than 365 days ago. Never fails outright:
    /// transport errors and page caps end the pagination early and the
    /// outcome carries whatever was accumulated up to that point.
    pub async fn fetch(&self, player_id: &str) -> HistoryOutcome {
        let cutoff = Utc::now().timestamp() - LOOKBACK_SECS;
        self.fetch_since(player_id, cutoff).await
    }

    pub async fn fetch_since(&self, player_id: &str, cutoff: i64) -> HistoryOutcome {
        let mut events: Vec<ActivityEvent> = Vec::new();
        let mut page = 1u32;

        loop {
            if let Some(cap) = self.config.max_pages {
                if page > cap {
                    warn!("page cap {cap} reached for player {player_id}, truncating");
                    return HistoryOutcome::Truncated(
                        reduce_events(&events, self.config.utc_offset),
                        TruncateReason::PageCap,
                    );
                }
            }

            let url = format!(
                "{}/player/{}/scores?sortBy=date&page={}&count={}",
                self.config.base_url, player_id, page, self.config.page_size
            );

            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(err) => {
                    error!("page {page} request failed: {err}");
                    return HistoryOutcome::Truncated(
                        reduce_events(&events, self.config.utc_offset),
                        TruncateReason::Transport(FetchError::Network(err)),
                    );
                }
            };

            // Retry the same page index on 429; skipping or advancing here
            // would drop or duplicate events.
            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                warn!("rate limited on page {page}, waiting {:?}", self.config.backoff);
                sleep(self.config.backoff).await;
                continue;
            }

            if !response.status().is_success() {
                let code = response.status().as_u16();
                error!("page {page} returned HTTP {code}, stopping fetch");
                return HistoryOutcome::Truncated(
                    reduce_events(&events, self.config.utc_offset),
                    TruncateReason::Transport(FetchError::Status(code)),
                );
            }

            let body: ScoresPage = match response.json().await {
                Ok(body) => body,
                Err(err) => {
                    error!("page {page} payload did not parse: {err}");
                    return HistoryOutcome::Truncated(
                        reduce_events(&events, self.config.utc_offset),
                        TruncateReason::Transport(FetchError::Payload(err)),
                    );
                }
            };

            let Some(oldest) = body.data.last().map(|event| event.occurred_at) else {
                break;
            };
            debug!(
                "page {} of {} total events, oldest {}",
                body.metadata.page, body.metadata.total, oldest
            );
            events.extend(body.data);

            // Pages arrive newest-first, so once the tail of a page predates
            // the cutoff no later page can hold in-window events.
            if oldest < cutoff {
                break;
            }

            page += 1;
            sleep(self.config.request_delay).await;
        }

        HistoryOutcome::Complete(reduce_events(&events, self.config.utc_offset))
    }
}

/// Buckets events into per-day counts, converting each instant to a calendar
/// date in `offset`. Events past the window edge that were collected with
/// the final page still count; the at-most-one-day drift is accepted rather
/// than re-filtered here.
pub fn reduce_events(events: &[ActivityEvent], offset: FixedOffset) -> DailyCounts {
    let mut counts = DailyCounts::default();
    for event in events {
        let Some(instant) = DateTime::from_timestamp(event.occurred_at, 0) else {
            warn!("skipping event with out-of-range timestamp {}", event.occurred_at);
            continue;
        };
        let key = date_key(instant.with_timezone(&offset).date_naive());
        *counts.days.entry(key).or_insert(0) += 1;
    }
    counts
}
