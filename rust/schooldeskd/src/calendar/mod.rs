//! Academic calendar arithmetic.
//!
//! Pure functions over calendar dates: academic week numbering, the day-index
//! convention shared by the monthly calendar and the weekly timetable, and the
//! holiday/break overlay. Nothing here touches the store or the clock.

mod day_index;
mod error;
mod overlay;
mod parse;
mod types;
mod week;

pub use day_index::{
    date_to_day_index, day_index_to_date, slots_on_date, week_dates, weekday_labels,
};
pub use error::CalendarError;
pub use overlay::is_blocked_date;
pub use parse::{format_iso_date, parse_iso_date, parse_month_key, parse_optional_date};
pub use types::{
    AcademicCalendar, AcademicWeek, BlockStatus, Break, DayIndex, Holiday, ScheduleSlot,
    WeekStart,
};
pub use week::{academic_week_from_strs, academic_week_number, compute_academic_week, week_start_of};
