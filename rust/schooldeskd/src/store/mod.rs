//! Collaborator data behind one injectable interface.
//!
//! Handlers only see [`SchoolStore`]; the calendar core never sees a store at
//! all and receives calendar and holiday data as plain values.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, DB_FILE_NAME};

use crate::calendar::{AcademicCalendar, DayIndex, Holiday, ScheduleSlot};
use serde_json::Value;

pub const CALENDAR_KEY: &str = "setup.calendar";
pub const TIMETABLE_KEY: &str = "setup.timetable";

pub trait SchoolStore {
    /// Short storage name reported by `health`.
    fn kind(&self) -> &'static str;

    fn settings_get_json(&self, key: &str) -> anyhow::Result<Option<Value>>;
    fn settings_set_json(&mut self, key: &str, value: &Value) -> anyhow::Result<()>;

    fn holidays_list(&self) -> anyhow::Result<Vec<Holiday>>;
    fn holiday_insert(&mut self, holiday: &Holiday) -> anyhow::Result<()>;
    /// Returns false when no holiday has `holiday.id`.
    fn holiday_update(&mut self, holiday: &Holiday) -> anyhow::Result<bool>;
    fn holiday_delete(&mut self, id: &str) -> anyhow::Result<bool>;

    fn slots_list(&self) -> anyhow::Result<Vec<ScheduleSlot>>;
    /// Inserts or replaces the slot at `(day_index, time_slot)`.
    fn slot_upsert(&mut self, slot: &ScheduleSlot) -> anyhow::Result<()>;
    fn slot_delete(&mut self, day_index: DayIndex, time_slot: &str) -> anyhow::Result<bool>;
}

/// Loads the academic calendar section. A missing or unreadable section
/// yields an empty calendar (no term start, Monday weeks, no breaks).
pub fn load_calendar(store: &dyn SchoolStore) -> anyhow::Result<AcademicCalendar> {
    let Some(raw) = store.settings_get_json(CALENDAR_KEY)? else {
        return Ok(AcademicCalendar::default());
    };
    match serde_json::from_value::<AcademicCalendar>(raw) {
        Ok(cal) => Ok(cal),
        Err(e) => {
            tracing::warn!(error = %e, "stored calendar section is malformed; using defaults");
            Ok(AcademicCalendar::default())
        }
    }
}

pub(crate) fn sort_holidays(holidays: &mut [Holiday]) {
    holidays.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
}

pub(crate) fn sort_slots(slots: &mut [ScheduleSlot]) {
    slots.sort_by(|a, b| {
        a.day_index
            .cmp(&b.day_index)
            .then_with(|| a.time_slot.cmp(&b.time_slot))
    });
}
