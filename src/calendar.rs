use crate::models::{month_name, CalendarGrid, Cell, DailyCounts, MonthLabel, Week};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};

const WINDOW_DAYS: i64 = 365;

/// Lays out the trailing-365-day window ending at `reference`, interpreted
/// in `offset`. The offset must match the one counts were bucketed with or
/// cells misalign by a day at the window edges.
pub fn build_grid(counts: &DailyCounts, reference: DateTime<Utc>, offset: FixedOffset) -> CalendarGrid {
    build_grid_at(counts, reference.with_timezone(&offset).date_naive())
}

/// Pure core: week-major grid of the 366 days `end - 365 ..= end`, padded so
/// day columns line up Sunday-first, plus a label anchor for every
/// first-of-month day in the window.
pub fn build_grid_at(counts: &DailyCounts, end: NaiveDate) -> CalendarGrid {
    let start = end - Duration::days(WINDOW_DAYS);
    let lead = start.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Cell> = Vec::with_capacity(lead + WINDOW_DAYS as usize + 7);
    cells.resize(lead, Cell::Pad);
    for offset in 0..=WINDOW_DAYS {
        let date = start + Duration::days(offset);
        cells.push(Cell::Day {
            date,
            count: counts.get(date),
        });
    }
    while cells.len() % 7 != 0 {
        cells.push(Cell::Pad);
    }

    let weeks: Vec<Week> = cells
        .chunks_exact(7)
        .map(|chunk| [chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6]])
        .collect();

    let mut month_labels = Vec::new();
    for (week_index, week) in weeks.iter().enumerate() {
        for cell in week {
            if let Cell::Day { date, .. } = cell {
                if date.day() == 1 {
                    month_labels.push(MonthLabel {
                        week_index,
                        month: month_name(*date),
                    });
                }
            }
        }
    }

    CalendarGrid { weeks, month_labels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{date_key, Tier};

    fn counts_of(entries: &[(&str, u64)]) -> DailyCounts {
        let mut counts = DailyCounts::default();
        for (date, count) in entries {
            counts.days.insert(date.to_string(), *count);
        }
        counts
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expected_week_count(end: NaiveDate) -> usize {
        let lead = (end - Duration::days(365)).weekday().num_days_from_sunday() as usize;
        (366 + lead).div_ceil(7)
    }

    #[test]
    fn grid_shape_holds_across_reference_dates() {
        let counts = DailyCounts::default();
        for day in 0..14 {
            let end = date(2024, 2, 20) + Duration::days(day);
            let grid = build_grid_at(&counts, end);
            assert_eq!(grid.weeks.len(), expected_week_count(end));
            for week in &grid.weeks {
                assert_eq!(week.len(), 7);
            }
        }
    }

    #[test]
    fn window_spans_inclusive_366_days() {
        let end = date(2024, 6, 2);
        let grid = build_grid_at(&DailyCounts::default(), end);
        let days: Vec<NaiveDate> = grid
            .weeks
            .iter()
            .flatten()
            .filter_map(Cell::date)
            .collect();
        assert_eq!(days.len(), 366);
        assert_eq!(days.first(), Some(&date(2023, 6, 3)));
        assert_eq!(days.last(), Some(&end));
        for pair in days.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn pads_only_at_head_and_tail_and_classify_as_none() {
        let end = date(2024, 6, 2);
        let grid = build_grid_at(&DailyCounts::default(), end);
        let cells: Vec<Cell> = grid.weeks.iter().flatten().copied().collect();

        let lead = cells.iter().take_while(|cell| **cell == Cell::Pad).count();
        let tail = cells.iter().rev().take_while(|cell| **cell == Cell::Pad).count();
        assert_eq!(lead + tail + 366, cells.len());
        assert_eq!(lead, date(2023, 6, 3).weekday().num_days_from_sunday() as usize);
        assert!(cells[lead..cells.len() - tail]
            .iter()
            .all(|cell| matches!(cell, Cell::Day { .. })));

        for cell in &cells {
            if *cell == Cell::Pad {
                assert_eq!(cell.tier(), Tier::None);
                assert_eq!(cell.date(), None);
            }
        }
    }

    #[test]
    fn first_day_lands_in_its_weekday_column() {
        let end = date(2024, 6, 2);
        let grid = build_grid_at(&DailyCounts::default(), end);
        let start = date(2023, 6, 3);
        let column = start.weekday().num_days_from_sunday() as usize;
        assert_eq!(grid.weeks[0][column].date(), Some(start));
    }

    #[test]
    fn every_first_of_month_gets_exactly_one_label() {
        let end = date(2024, 6, 2);
        let grid = build_grid_at(&DailyCounts::default(), end);

        let firsts: Vec<(usize, NaiveDate)> = grid
            .weeks
            .iter()
            .enumerate()
            .flat_map(|(week_index, week)| {
                week.iter()
                    .filter_map(Cell::date)
                    .filter(|date| date.day() == 1)
                    .map(move |date| (week_index, date))
            })
            .collect();

        assert_eq!(grid.month_labels.len(), firsts.len());
        assert!(grid.month_labels.len() >= 12);
        for ((week_index, date), label) in firsts.iter().zip(&grid.month_labels) {
            assert_eq!(label.week_index, *week_index);
            assert_eq!(label.month, crate::models::month_name(*date));
        }
    }

    #[test]
    fn counts_classify_into_tiers() {
        let counts = counts_of(&[("2024-06-01", 5), ("2024-06-02", 12)]);
        let end = date(2024, 6, 2);
        let grid = build_grid_at(&counts, end);

        let cell_for = |wanted: NaiveDate| {
            grid.weeks
                .iter()
                .flatten()
                .find(|cell| cell.date() == Some(wanted))
                .copied()
                .unwrap()
        };

        assert_eq!(cell_for(date(2024, 6, 1)).tier(), Tier::Level3);
        assert_eq!(cell_for(date(2024, 6, 2)).tier(), Tier::Level4);
        assert_eq!(cell_for(date(2024, 5, 31)).tier(), Tier::Level0);

        let june_week = grid
            .weeks
            .iter()
            .position(|week| week.iter().any(|cell| cell.date() == Some(date(2024, 6, 1))))
            .unwrap();
        assert!(grid
            .month_labels
            .iter()
            .any(|label| label.month == "Jun" && label.week_index == june_week));
    }

    #[test]
    fn empty_counts_yield_all_level0_days() {
        let grid = build_grid_at(&DailyCounts::default(), date(2024, 6, 2));
        assert!(grid
            .weeks
            .iter()
            .flatten()
            .filter(|cell| matches!(cell, Cell::Day { .. }))
            .all(|cell| cell.tier() == Tier::Level0));
        assert!(!grid.month_labels.is_empty());
    }

    #[test]
    fn layout_is_deterministic() {
        let counts = counts_of(&[("2024-03-15", 3), ("2024-04-01", 9)]);
        let end = date(2024, 6, 2);
        assert_eq!(build_grid_at(&counts, end), build_grid_at(&counts, end));
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(Tier::classify(0), Tier::Level0);
        assert_eq!(Tier::classify(1), Tier::Level1);
        assert_eq!(Tier::classify(2), Tier::Level1);
        assert_eq!(Tier::classify(3), Tier::Level2);
        assert_eq!(Tier::classify(4), Tier::Level2);
        assert_eq!(Tier::classify(5), Tier::Level3);
        assert_eq!(Tier::classify(9), Tier::Level3);
        assert_eq!(Tier::classify(10), Tier::Level4);
        assert_eq!(Tier::classify(250), Tier::Level4);
    }

    #[test]
    fn wrapper_converts_instant_in_reference_offset() {
        // 2024-06-01T23:30:00Z: still June 1 in UTC, already June 2 at +9.
        let instant = DateTime::from_timestamp(1_717_284_600, 0).unwrap();
        let counts = counts_of(&[(&date_key(date(2024, 6, 2)), 1)]);

        let utc_grid = build_grid(&counts, instant, FixedOffset::east_opt(0).unwrap());
        let last_utc = utc_grid.weeks.iter().flatten().filter_map(Cell::date).next_back();
        assert_eq!(last_utc, Some(date(2024, 6, 1)));

        let tokyo_grid = build_grid(&counts, instant, FixedOffset::east_opt(9 * 3600).unwrap());
        let last_tokyo = tokyo_grid.weeks.iter().flatten().filter_map(Cell::date).next_back();
        assert_eq!(last_tokyo, Some(date(2024, 6, 2)));
    }
}
