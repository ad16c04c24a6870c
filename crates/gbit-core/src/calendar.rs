//! Year calendar grid for the activity heatmap.
//!
//! The grid is a run of Sunday-start week columns beginning on the Sunday on
//! or before January 1. Days outside the year are empty slots. Month labels
//! anchor at the week column holding the 1st of that month.
//!
//! # Layout
//!
//! ```text
//!            Jan                Feb
//!   Sun  .   4  11  18  25      1 ...
//!   Mon  .   5  12  19  26      2
//!   ...
//!   Thu  1   8  15  22  29      5
//! ```
//!
//! The grid always has at least [`MIN_WEEKS`] columns. Leap years that start
//! on a Saturday spill into a 54th column so December 31 is never dropped.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::ErrorCode;

/// Minimum number of week columns in a year grid.
pub const MIN_WEEKS: usize = 53;

/// One Sunday-start week column. `None` marks padding outside the year.
pub type Week = [Option<NaiveDate>; 7];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

impl CalendarError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidYear(_) => ErrorCode::InvalidYear,
        }
    }
}

/// A month label and the week column it sits above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub label: String,
    pub week_index: usize,
}

/// Week columns and month anchors for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGrid {
    pub year: i32,
    pub weeks: Vec<Week>,
    pub month_labels: Vec<MonthLabel>,
}

impl YearGrid {
    /// Every in-year date, in grid order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flat_map(|week| week.iter().flatten().copied())
    }

    #[must_use]
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }
}

/// Build the heatmap grid for `year`.
///
/// Depends only on `year`; callers may cache the result.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidYear`] when January 1 of `year` (or the
/// padding around it) cannot be represented.
pub fn build_year_grid(year: i32) -> Result<YearGrid, CalendarError> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CalendarError::InvalidYear(year))?;
    let dec_last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(CalendarError::InvalidYear(year))?;

    let lead = i64::from(jan_first.weekday().num_days_from_sunday());
    let mut cursor = jan_first
        .checked_sub_signed(Duration::days(lead))
        .ok_or(CalendarError::InvalidYear(year))?;
    debug_assert_eq!(cursor.weekday(), Weekday::Sun);

    let mut weeks: Vec<Week> = Vec::with_capacity(MIN_WEEKS + 1);
    let mut month_labels = Vec::with_capacity(12);

    while weeks.len() < MIN_WEEKS || cursor <= dec_last {
        let week_index = weeks.len();
        let mut week: Week = [None; 7];
        for slot in &mut week {
            if cursor.year() == year {
                *slot = Some(cursor);
                if cursor.day() == 1 {
                    month_labels.push(MonthLabel {
                        label: month_label(cursor),
                        week_index,
                    });
                }
            }
            cursor = cursor
                .succ_opt()
                .ok_or(CalendarError::InvalidYear(year))?;
        }
        weeks.push(week);
    }

    let first_month = month_label(jan_first);
    if !month_labels.iter().any(|m| m.label == first_month) {
        month_labels.insert(
            0,
            MonthLabel {
                label: first_month,
                week_index: 0,
            },
        );
    }

    tracing::debug!(year, weeks = weeks.len(), "built year grid");

    Ok(YearGrid {
        year,
        weeks,
        month_labels,
    })
}

/// January 1 of `year`, the seed date for cumulative series.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidYear`] for unrepresentable years.
pub fn year_start(year: i32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CalendarError::InvalidYear(year))
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b").to_string()
}
