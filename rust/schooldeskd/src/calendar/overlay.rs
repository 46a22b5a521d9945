use chrono::NaiveDate;

use super::types::{AcademicCalendar, BlockStatus, Holiday};

/// Marks `date` as blocked when it is a holiday or falls inside a break.
///
/// Holidays win over breaks for the label. Inverted break ranges never match.
pub fn is_blocked_date(
    date: NaiveDate,
    calendar: &AcademicCalendar,
    holidays: &[Holiday],
) -> BlockStatus {
    if let Some(h) = holidays.iter().find(|h| h.date == date) {
        return BlockStatus::blocked_by(h.name.clone());
    }
    if let Some(b) = calendar.breaks.iter().find(|b| b.contains(date)) {
        return BlockStatus::blocked_by(b.name.clone());
    }
    BlockStatus::open()
}
