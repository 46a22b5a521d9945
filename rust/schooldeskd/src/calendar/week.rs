//! Academic week numbering.

use chrono::{Datelike, Days, NaiveDate};

use super::parse::parse_optional_date;
use super::types::{AcademicCalendar, AcademicWeek, WeekStart};

fn days_into_week(date: NaiveDate, week_start: WeekStart) -> u32 {
    match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    }
}

/// Returns the first day of the week containing `date`, or `None` when that
/// day falls before the earliest representable date.
pub fn week_start_of(date: NaiveDate, week_start: WeekStart) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days_into_week(date, week_start))))
}

/// 1-based week number of `current` relative to the week containing
/// `term_start`. Dates before the term start give zero or negative values.
pub fn academic_week_number(
    current: NaiveDate,
    term_start: NaiveDate,
    week_start: WeekStart,
) -> i64 {
    // Day numbers of both week starts; the dates themselves may be unrepresentable.
    let anchor_day = |date: NaiveDate| {
        i64::from(date.num_days_from_ce()) - i64::from(days_into_week(date, week_start))
    };
    (anchor_day(current) - anchor_day(term_start)).div_euclid(7) + 1
}

/// Academic week for `current`, or `None` when the calendar has no term start
/// or the week of `current` starts outside the supported date range.
pub fn compute_academic_week(
    current: NaiveDate,
    calendar: &AcademicCalendar,
) -> Option<AcademicWeek> {
    let term_start = calendar.term_start_date?;
    let week_start = calendar.week_start();
    Some(AcademicWeek {
        number: academic_week_number(current, term_start, week_start),
        week_start: week_start_of(current, week_start)?,
    })
}

/// String-boundary variant: malformed or missing inputs are logged and
/// reported as unavailable.
pub fn academic_week_from_strs(
    current: &str,
    term_start: Option<&str>,
    week_start: WeekStart,
) -> Option<i64> {
    let current = parse_optional_date(Some(current))?;
    let term_start = parse_optional_date(term_start)?;
    Some(academic_week_number(current, term_start, week_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn calendar(term: Option<NaiveDate>, sunday: bool) -> AcademicCalendar {
        AcademicCalendar {
            term_start_date: term,
            week_starts_on_sunday: sunday,
            breaks: Vec::new(),
        }
    }

    #[test]
    fn week_start_monday_and_sunday() {
        // 2025-02-19 is a Wednesday.
        assert_eq!(week_start_of(d(2025, 2, 19), WeekStart::Monday), Some(d(2025, 2, 17)));
        assert_eq!(week_start_of(d(2025, 2, 19), WeekStart::Sunday), Some(d(2025, 2, 16)));
        // Sundays close a Monday week and open a Sunday week.
        assert_eq!(week_start_of(d(2025, 2, 23), WeekStart::Monday), Some(d(2025, 2, 17)));
        assert_eq!(week_start_of(d(2025, 2, 23), WeekStart::Sunday), Some(d(2025, 2, 23)));
    }

    #[test]
    fn week_start_crosses_year_boundary() {
        // 2025-01-01 is a Wednesday.
        assert_eq!(week_start_of(d(2025, 1, 1), WeekStart::Monday), Some(d(2024, 12, 30)));
        assert_eq!(week_start_of(d(2025, 1, 1), WeekStart::Sunday), Some(d(2024, 12, 29)));
    }

    #[test]
    fn term_start_week_is_one() {
        let cal = calendar(Some(d(2025, 2, 17)), false);
        assert_eq!(compute_academic_week(d(2025, 2, 17), &cal).unwrap().number, 1);
        assert_eq!(compute_academic_week(d(2025, 2, 23), &cal).unwrap().number, 1);
        assert_eq!(compute_academic_week(d(2025, 2, 24), &cal).unwrap().number, 2);
    }

    #[test]
    fn mid_week_term_start_still_anchors_its_week() {
        // Term opens on a Thursday; the Monday before belongs to week 1.
        let term = d(2025, 9, 4);
        assert_eq!(academic_week_number(d(2025, 9, 1), term, WeekStart::Monday), 1);
        assert_eq!(academic_week_number(d(2025, 8, 31), term, WeekStart::Monday), 0);
        assert_eq!(academic_week_number(d(2025, 8, 31), term, WeekStart::Sunday), 1);
    }

    #[test]
    fn weeks_before_term_pass_through() {
        let term = d(2025, 2, 17);
        assert_eq!(academic_week_number(d(2025, 2, 16), term, WeekStart::Monday), 0);
        assert_eq!(academic_week_number(d(2025, 2, 3), term, WeekStart::Monday), -1);
        let week = compute_academic_week(d(2025, 2, 3), &calendar(Some(term), false)).unwrap();
        assert!(!week.has_started());
    }

    #[test]
    fn missing_term_start_is_unavailable() {
        assert_eq!(compute_academic_week(d(2025, 2, 24), &calendar(None, false)), None);
        assert_eq!(compute_academic_week(d(2025, 2, 24), &calendar(None, true)), None);
    }

    #[test]
    fn string_inputs_degrade() {
        assert_eq!(
            academic_week_from_strs("2025-02-24", Some("2025-02-17"), WeekStart::Monday),
            Some(2)
        );
        assert_eq!(academic_week_from_strs("2025-02-24", None, WeekStart::Monday), None);
        assert_eq!(
            academic_week_from_strs("2025-02-24", Some("Feb 17th"), WeekStart::Monday),
            None
        );
        assert_eq!(
            academic_week_from_strs("yesterday", Some("2025-02-17"), WeekStart::Sunday),
            None
        );
    }

    #[test]
    fn range_edges_do_not_overflow() {
        for ws in [WeekStart::Monday, WeekStart::Sunday] {
            let min = NaiveDate::MIN;
            let expected = if days_into_week(min, ws) == 0 { Some(min) } else { None };
            assert_eq!(week_start_of(min, ws), expected);

            let max = NaiveDate::MAX;
            let start = week_start_of(max, ws).unwrap();
            assert!(start <= max && (max - start).num_days() < 7);

            let term = d(2025, 2, 17);
            assert!(academic_week_number(min, term, ws) < 0);
            assert!(academic_week_number(max, term, ws) > 1);
            let cal = calendar(Some(term), ws.starts_on_sunday());
            assert_eq!(compute_academic_week(min, &cal).is_some(), expected.is_some());
            assert!(compute_academic_week(max, &cal).is_some());
        }
    }
}
