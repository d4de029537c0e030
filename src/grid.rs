//! Contribution grid model and calendar parsing
//!
//! Transforms the raw calendar weeks into the fixed 16x7 grid the renderer
//! draws. Columns are week buckets ordered oldest to newest, left to right;
//! rows are weekday positions.

use serde::Deserialize;

use crate::github::ContributionCalendar;
use crate::matrix::{HEIGHT, WIDTH};

/// Categorical intensity of one day's activity, as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionLevel {
    #[default]
    None,
    FirstQuartile,
    SecondQuartile,
    ThirdQuartile,
    FourthQuartile,
}

/// A fully-populated 16x7 grid of contribution levels.
///
/// Always exactly `WIDTH` columns by `HEIGHT` rows; cells without source
/// data are `ContributionLevel::None`. Replaced wholesale on each refresh,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionGrid {
    cells: [[ContributionLevel; HEIGHT]; WIDTH],
}

impl Default for ContributionGrid {
    fn default() -> Self {
        Self {
            cells: [[ContributionLevel::None; HEIGHT]; WIDTH],
        }
    }
}

impl ContributionGrid {
    /// Build a grid from the most recent `WIDTH` weeks of the calendar.
    ///
    /// Data is right-aligned: the newest week lands in the rightmost column
    /// and a short history is left-padded with empty weeks. Days carrying an
    /// out-of-range weekday are silently dropped. Deterministic.
    pub fn from_calendar(calendar: &ContributionCalendar) -> Self {
        let mut grid = Self::default();

        let weeks = &calendar.weeks;
        let skip = weeks.len().saturating_sub(WIDTH);
        let pad = WIDTH - (weeks.len() - skip);

        for (i, week) in weeks[skip..].iter().enumerate() {
            let x = pad + i;
            for day in &week.contribution_days {
                if (0..HEIGHT as i64).contains(&day.weekday) {
                    grid.cells[x][day.weekday as usize] = day.contribution_level;
                }
            }
        }

        grid
    }

    pub fn get(&self, x: usize, y: usize) -> ContributionLevel {
        self.cells[x][y]
    }
}
