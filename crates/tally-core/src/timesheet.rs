//! # Time Entry Aggregator
//!
//! Derives worked hours and the overtime flag from a clock-in/clock-out
//! pair. The persistence layer stores the result on the time entry row;
//! the batch payroll run sums the stored hours per employee.
//!
//! ## Contract
//! ```text
//! hours_worked = (end − start) in fractional hours
//! is_overtime  = hours_worked > 8.0        (strictly greater)
//! ```
//!
//! Entries are same-day only: an end time at or before the start time is
//! rejected, never wrapped to the next day.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::validation::validate_time_range;
use crate::DAILY_OVERTIME_THRESHOLD;

/// The derived figures for one time entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeEntryHours {
    pub hours_worked: f64,
    pub is_overtime: bool,
}

/// Computes worked hours and the overtime flag for a clock-in/clock-out
/// pair.
///
/// ## Example
/// ```rust
/// use chrono::NaiveTime;
/// use tally_core::timesheet::compute_time_entry_hours;
///
/// let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(17, 30, 0).unwrap();
///
/// let derived = compute_time_entry_hours(start, end).unwrap();
/// assert_eq!(derived.hours_worked, 8.5);
/// assert!(derived.is_overtime);
/// ```
pub fn compute_time_entry_hours(start: NaiveTime, end: NaiveTime) -> CoreResult<TimeEntryHours> {
    validate_time_range(start, end)?;

    let hours_worked = (end - start).num_seconds() as f64 / 3600.0;

    Ok(TimeEntryHours {
        hours_worked,
        is_overtime: hours_worked > DAILY_OVERTIME_THRESHOLD,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_eight_and_a_half_hours_is_overtime() {
        let d = compute_time_entry_hours(t(9, 0), t(17, 30)).unwrap();
        assert_eq!(d.hours_worked, 8.5);
        assert!(d.is_overtime);
    }

    #[test]
    fn test_exactly_eight_hours_is_not_overtime() {
        let d = compute_time_entry_hours(t(9, 0), t(17, 0)).unwrap();
        assert_eq!(d.hours_worked, 8.0);
        assert!(!d.is_overtime);
    }

    #[test]
    fn test_short_shift() {
        let d = compute_time_entry_hours(t(13, 15), t(16, 45)).unwrap();
        assert_eq!(d.hours_worked, 3.5);
        assert!(!d.is_overtime);
    }

    #[test]
    fn test_end_equal_to_start_rejected() {
        assert!(compute_time_entry_hours(t(9, 0), t(9, 0)).is_err());
    }

    #[test]
    fn test_overnight_rejected() {
        // 22:00 → 06:00 is not wrapped to the next day.
        assert!(compute_time_entry_hours(t(22, 0), t(6, 0)).is_err());
    }
}
