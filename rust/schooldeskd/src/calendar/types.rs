//! Value types shared by the week calculator, the day-index resolver and
//! the holiday/break overlay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::CalendarError;

/// First displayed day of a school week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn from_sunday_flag(week_starts_on_sunday: bool) -> Self {
        if week_starts_on_sunday {
            Self::Sunday
        } else {
            Self::Monday
        }
    }

    pub fn starts_on_sunday(self) -> bool {
        matches!(self, Self::Sunday)
    }
}

/// Column of a day within a displayed week, counted from the configured
/// [`WeekStart`]. Always in `0..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct DayIndex(u8);

impl DayIndex {
    pub const COUNT: u8 = 7;

    pub fn new(index: i64) -> Result<Self, CalendarError> {
        if (0..Self::COUNT as i64).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(CalendarError::InvalidDayIndex { index })
        }
    }

    pub(super) fn wrapping(offset: u32) -> Self {
        Self((offset % Self::COUNT as u32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All seven indices in display order.
    pub fn all() -> impl Iterator<Item = DayIndex> {
        (0..Self::COUNT).map(DayIndex)
    }
}

impl TryFrom<i64> for DayIndex {
    type Error = CalendarError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayIndex> for u8 {
    fn from(value: DayIndex) -> Self {
        value.0
    }
}

/// Named, inclusive range of calendar dates without classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Break {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Break {
    /// Builds a break, rejecting ranges whose end precedes their start.
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, CalendarError> {
        let name = name.into();
        if end_date < start_date {
            return Err(CalendarError::InvertedBreak {
                name,
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            name,
            start_date,
            end_date,
        })
    }

    /// Inclusive on both ends. An inverted range contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Term anchor, week-start convention and breaks for one school year.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicCalendar {
    #[serde(default)]
    pub term_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub week_starts_on_sunday: bool,
    #[serde(default)]
    pub breaks: Vec<Break>,
}

impl AcademicCalendar {
    pub fn week_start(&self) -> WeekStart {
        WeekStart::from_sunday_flag(self.week_starts_on_sunday)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_school_holiday: bool,
}

fn default_true() -> bool {
    true
}

/// One lesson in the weekly timetable, keyed by `(day_index, time_slot)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub day_index: DayIndex,
    pub time_slot: String,
    pub subject: String,
    pub class_name: String,
}

/// Result of the holiday/break overlay for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatus {
    pub blocked: bool,
    pub label: Option<String>,
}

impl BlockStatus {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn blocked_by(label: impl Into<String>) -> Self {
        Self {
            blocked: true,
            label: Some(label.into()),
        }
    }
}

/// Academic week number together with the week-start date it was derived from.
///
/// `number` is 1 for the week containing the term start and may be zero or
/// negative for weeks before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicWeek {
    pub number: i64,
    pub week_start: NaiveDate,
}

impl AcademicWeek {
    pub fn has_started(&self) -> bool {
        self.number > 0
    }

    /// Display label such as `Week 3 of Feb 17, 2025`.
    pub fn label(&self) -> String {
        format!(
            "Week {} of {}",
            self.number,
            self.week_start.format("%b %-d, %Y")
        )
    }
}
