//! Day-index resolution shared by the monthly calendar and the timetable.
//!
//! Both views must agree on which column a date falls in, so neither computes
//! its own weekday arithmetic; they call [`date_to_day_index`].

use chrono::{Datelike, Days, NaiveDate};

use super::types::{DayIndex, ScheduleSlot, WeekStart};

const MONDAY_FIRST_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const SUNDAY_FIRST_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn date_to_day_index(date: NaiveDate, week_start: WeekStart) -> DayIndex {
    let n = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    DayIndex::wrapping(n)
}

/// Concrete date of `index` in the week that starts at `week_anchor`, or
/// `None` past the last representable date.
///
/// `week_anchor` is expected to be a week start as returned by
/// [`super::week_start_of`]; it is not re-normalised here.
pub fn day_index_to_date(week_anchor: NaiveDate, index: DayIndex) -> Option<NaiveDate> {
    week_anchor.checked_add_days(Days::new(u64::from(index.get())))
}

/// The seven dates of the week starting at `week_anchor`, unless the week
/// runs past the last representable date.
pub fn week_dates(week_anchor: NaiveDate) -> Option<[NaiveDate; 7]> {
    let dates = DayIndex::all()
        .map(|index| day_index_to_date(week_anchor, index))
        .collect::<Option<Vec<_>>>()?;
    dates.try_into().ok()
}

pub fn weekday_labels(week_start: WeekStart) -> [&'static str; 7] {
    match week_start {
        WeekStart::Monday => MONDAY_FIRST_LABELS,
        WeekStart::Sunday => SUNDAY_FIRST_LABELS,
    }
}

/// Slots scheduled on the weekday of `date`, in the order given.
pub fn slots_on_date<'a>(
    date: NaiveDate,
    week_start: WeekStart,
    slots: &'a [ScheduleSlot],
) -> Vec<&'a ScheduleSlot> {
    let index = date_to_day_index(date, week_start);
    slots.iter().filter(|s| s.day_index == index).collect()
}

#[cfg(test)]
mod tests {
    use super::super::week::week_start_of;
    use super::*;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // Absolute weekday in the 0=Sunday..6=Saturday numbering the views receive.
    fn absolute_weekday(date: NaiveDate) -> i64 {
        date.weekday().num_days_from_sunday() as i64
    }

    // Month grid column: Sunday-first uses the weekday as is, Monday-first
    // moves Sunday to the end.
    fn month_grid_column(date: NaiveDate, sunday_first: bool) -> i64 {
        let day = absolute_weekday(date);
        if sunday_first {
            day
        } else if day == 0 {
            6
        } else {
            day - 1
        }
    }

    // Timetable column: offset from the first weekday, wrapped.
    fn timetable_column(date: NaiveDate, sunday_first: bool) -> i64 {
        let first = if sunday_first { 0 } else { 1 };
        (absolute_weekday(date) - first + 7) % 7
    }

    #[test]
    fn monday_start_indices() {
        // 2025-02-17 is a Monday.
        let expected = [0, 1, 2, 3, 4, 5, 6];
        for (offset, want) in expected.iter().enumerate() {
            let date = d(2025, 2, 17) + Duration::days(offset as i64);
            assert_eq!(date_to_day_index(date, WeekStart::Monday).get(), *want);
        }
    }

    #[test]
    fn sunday_start_indices() {
        assert_eq!(date_to_day_index(d(2025, 2, 16), WeekStart::Sunday).get(), 0);
        assert_eq!(date_to_day_index(d(2025, 2, 17), WeekStart::Sunday).get(), 1);
        assert_eq!(date_to_day_index(d(2025, 2, 22), WeekStart::Sunday).get(), 6);
        assert_eq!(date_to_day_index(d(2025, 2, 23), WeekStart::Monday).get(), 6);
    }

    #[test]
    fn bijection_over_each_configured_week() {
        for week_start in [WeekStart::Monday, WeekStart::Sunday] {
            let mut day = d(2024, 1, 1);
            while day < d(2025, 1, 1) {
                let anchor = week_start_of(day, week_start).unwrap();
                let mut seen: Vec<u8> = week_dates(anchor)
                    .unwrap()
                    .iter()
                    .map(|x| date_to_day_index(*x, week_start).get())
                    .collect();
                assert_eq!(seen, vec![0, 1, 2, 3, 4, 5, 6], "week of {anchor}");
                seen.dedup();
                assert_eq!(seen.len(), 7);
                day += Duration::days(7);
            }
        }
    }

    #[test]
    fn both_view_formulas_match_resolver() {
        let mut day = d(2023, 12, 1);
        while day < d(2026, 2, 1) {
            for sunday_first in [false, true] {
                let ws = WeekStart::from_sunday_flag(sunday_first);
                let resolved = date_to_day_index(day, ws).get() as i64;
                assert_eq!(month_grid_column(day, sunday_first), resolved, "{day} {ws:?}");
                assert_eq!(timetable_column(day, sunday_first), resolved, "{day} {ws:?}");
            }
            day += Duration::days(1);
        }
    }

    #[test]
    fn inverse_mapping_round_trips_within_week() {
        for week_start in [WeekStart::Monday, WeekStart::Sunday] {
            let anchor = week_start_of(d(2025, 3, 12), week_start).unwrap();
            for index in DayIndex::all() {
                let date = day_index_to_date(anchor, index).unwrap();
                assert_eq!(date_to_day_index(date, week_start), index);
                assert_eq!(week_start_of(date, week_start), Some(anchor));
            }
        }
    }

    #[test]
    fn labels_follow_week_start() {
        assert_eq!(weekday_labels(WeekStart::Monday)[0], "Monday");
        assert_eq!(weekday_labels(WeekStart::Sunday)[0], "Sunday");
        for ws in [WeekStart::Monday, WeekStart::Sunday] {
            let anchor = week_start_of(d(2025, 5, 7), ws).unwrap();
            for index in DayIndex::all() {
                let date = day_index_to_date(anchor, index).unwrap();
                let name = date.format("%A").to_string();
                assert_eq!(weekday_labels(ws)[index.get() as usize], name);
            }
        }
    }

    #[test]
    fn slot_lookup_uses_configured_index() {
        let slot = |i: i64, subject: &str| ScheduleSlot {
            day_index: DayIndex::new(i).unwrap(),
            time_slot: "08:00 - 08:45".to_string(),
            subject: subject.to_string(),
            class_name: "7A".to_string(),
        };
        let slots = vec![slot(0, "Maths"), slot(1, "Science")];
        // Monday 2025-02-17: column 0 Monday-first, column 1 Sunday-first.
        let monday = d(2025, 2, 17);
        assert_eq!(slots_on_date(monday, WeekStart::Monday, &slots)[0].subject, "Maths");
        assert_eq!(slots_on_date(monday, WeekStart::Sunday, &slots)[0].subject, "Science");
        assert!(slots_on_date(d(2025, 2, 19), WeekStart::Monday, &slots).is_empty());
    }

    #[test]
    fn last_representable_week_is_partial() {
        let max = NaiveDate::MAX;
        let first = DayIndex::new(0).unwrap();
        let last = DayIndex::new(6).unwrap();
        assert_eq!(day_index_to_date(max, first), Some(max));
        assert_eq!(day_index_to_date(max, last), None);
        assert_eq!(week_dates(max), None);

        let earlier = max - Duration::days(6);
        assert_eq!(day_index_to_date(earlier, last), Some(max));
        assert_eq!(week_dates(earlier).map(|w| w[6]), Some(max));
    }
}
