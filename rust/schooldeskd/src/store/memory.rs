use std::collections::HashMap;

use anyhow::Context;
use serde_json::{json, Value};

use super::{sort_holidays, sort_slots, SchoolStore, CALENDAR_KEY};
use crate::calendar::{DayIndex, Holiday, ScheduleSlot};

/// Process-local store. Nothing survives the process; `seeded` fills it with
/// the demo school used by the parent preview.
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: HashMap<String, Value>,
    holidays: Vec<Holiday>,
    slots: Vec<ScheduleSlot>,
}

fn fixture_calendar() -> Value {
    json!({
        "termStartDate": "2025-02-17",
        "weekStartsOnSunday": false,
        "breaks": [
            { "name": "Spring Break", "startDate": "2025-04-01", "endDate": "2025-04-15" },
            { "name": "Winter Break", "startDate": "2025-06-30", "endDate": "2025-07-11" }
        ]
    })
}

fn fixture_holidays() -> Value {
    json!([
        {
            "id": "holiday-good-friday",
            "name": "Good Friday",
            "date": "2025-04-18",
            "description": "Public holiday",
            "isSchoolHoliday": true
        },
        {
            "id": "holiday-labour-day",
            "name": "Labour Day",
            "date": "2025-05-01",
            "description": "Public holiday",
            "isSchoolHoliday": true
        },
        {
            "id": "holiday-sports-day",
            "name": "Sports Day",
            "date": "2025-03-14",
            "description": "No regular lessons; whole-school athletics",
            "isSchoolHoliday": false
        }
    ])
}

fn fixture_slots() -> Value {
    json!([
        { "dayIndex": 0, "timeSlot": "08:00 - 08:45", "subject": "Mathematics", "className": "7A" },
        { "dayIndex": 0, "timeSlot": "08:50 - 09:35", "subject": "English", "className": "7A" },
        { "dayIndex": 1, "timeSlot": "08:00 - 08:45", "subject": "Science", "className": "8B" },
        { "dayIndex": 2, "timeSlot": "09:40 - 10:25", "subject": "History", "className": "7A" },
        { "dayIndex": 3, "timeSlot": "08:00 - 08:45", "subject": "Mathematics", "className": "8B" },
        { "dayIndex": 4, "timeSlot": "10:45 - 11:30", "subject": "Physical Education", "className": "7A" }
    ])
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> anyhow::Result<Self> {
        let mut store = Self::new();
        store
            .settings
            .insert(CALENDAR_KEY.to_string(), fixture_calendar());
        store.holidays =
            serde_json::from_value(fixture_holidays()).context("invalid holiday fixtures")?;
        store.slots = serde_json::from_value(fixture_slots()).context("invalid schedule fixtures")?;
        sort_holidays(&mut store.holidays);
        sort_slots(&mut store.slots);
        Ok(store)
    }
}

impl SchoolStore for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn settings_get_json(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.settings.get(key).cloned())
    }

    fn settings_set_json(&mut self, key: &str, value: &Value) -> anyhow::Result<()> {
        self.settings.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn holidays_list(&self) -> anyhow::Result<Vec<Holiday>> {
        Ok(self.holidays.clone())
    }

    fn holiday_insert(&mut self, holiday: &Holiday) -> anyhow::Result<()> {
        if self.holidays.iter().any(|h| h.id == holiday.id) {
            anyhow::bail!("duplicate holiday id {}", holiday.id);
        }
        self.holidays.push(holiday.clone());
        sort_holidays(&mut self.holidays);
        Ok(())
    }

    fn holiday_update(&mut self, holiday: &Holiday) -> anyhow::Result<bool> {
        let Some(existing) = self.holidays.iter_mut().find(|h| h.id == holiday.id) else {
            return Ok(false);
        };
        *existing = holiday.clone();
        sort_holidays(&mut self.holidays);
        Ok(true)
    }

    fn holiday_delete(&mut self, id: &str) -> anyhow::Result<bool> {
        let before = self.holidays.len();
        self.holidays.retain(|h| h.id != id);
        Ok(self.holidays.len() != before)
    }

    fn slots_list(&self) -> anyhow::Result<Vec<ScheduleSlot>> {
        Ok(self.slots.clone())
    }

    fn slot_upsert(&mut self, slot: &ScheduleSlot) -> anyhow::Result<()> {
        self.slots
            .retain(|s| !(s.day_index == slot.day_index && s.time_slot == slot.time_slot));
        self.slots.push(slot.clone());
        sort_slots(&mut self.slots);
        Ok(())
    }

    fn slot_delete(&mut self, day_index: DayIndex, time_slot: &str) -> anyhow::Result<bool> {
        let before = self.slots.len();
        self.slots
            .retain(|s| !(s.day_index == day_index && s.time_slot == time_slot));
        Ok(self.slots.len() != before)
    }
}
