use activity_graph::{build_grid, CalendarGrid, FetchConfig, HistoryFetcher, HistoryOutcome, Tier, TruncateReason};
use chrono::Utc;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let player_id = env::args()
        .nth(1)
        .ok_or("usage: activity_graph <player-id>")?;

    let config = FetchConfig::from_env();
    let offset = config.utc_offset;
    let fetcher = HistoryFetcher::new(config)?;

    let outcome = fetcher.fetch(&player_id).await;
    match &outcome {
        HistoryOutcome::Complete(counts) => {
            info!("fetched {} plays across {} active days", counts.total(), counts.days.len());
        }
        HistoryOutcome::Truncated(counts, TruncateReason::PageCap) => {
            warn!("page cap hit, showing {} plays (history truncated)", counts.total());
        }
        HistoryOutcome::Truncated(counts, TruncateReason::Transport(err)) => {
            warn!("fetch stopped early ({err}), showing {} plays", counts.total());
        }
    }

    let grid = build_grid(outcome.counts(), Utc::now(), offset);
    print_grid(&grid);

    Ok(())
}

fn print_grid(grid: &CalendarGrid) {
    let mut label_row = vec![' '; grid.weeks.len()];
    for label in &grid.month_labels {
        for (i, ch) in label.month.chars().enumerate() {
            let column = label.week_index + i;
            if column < label_row.len() && label_row[column] == ' ' {
                label_row[column] = ch;
            }
        }
    }
    println!("{}", label_row.into_iter().collect::<String>());

    for row in 0..7 {
        let line: String = grid.weeks.iter().map(|week| glyph(week[row].tier())).collect();
        println!("{line}");
    }
}

fn glyph(tier: Tier) -> char {
    match tier {
        Tier::None => ' ',
        Tier::Level0 => '·',
        Tier::Level1 => '░',
        Tier::Level2 => '▒',
        Tier::Level3 => '▓',
        Tier::Level4 => '█',
    }
}
