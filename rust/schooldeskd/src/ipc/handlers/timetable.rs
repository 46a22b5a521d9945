use crate::calendar::{
    date_to_day_index, day_index_to_date, format_iso_date, is_blocked_date, week_start_of,
    weekday_labels, DayIndex, ScheduleSlot,
};
use crate::ipc::handlers::calendar::{academic_week_json, snapshot};
use crate::ipc::handlers::setup::load_timetable_setup;
use crate::ipc::helpers::{query_date, respond, store_err, store_ref, HandlerErr};
use crate::ipc::types::{AppState, Request};
use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::{json, Value};

fn timetable_week_open(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let Some(date) = query_date(params, "date")? else {
        return Err(HandlerErr::bad_params("date must be YYYY-MM-DD"));
    };
    let snap = snapshot(store)?;
    let setup = load_timetable_setup(store).map_err(store_err("db_query_failed"))?;
    let week_start = snap.calendar.week_start();
    let anchor = week_start_of(date, week_start);
    let labels = weekday_labels(week_start);

    // Weeks at the edge of the date range keep only their representable days.
    let columns: Vec<(DayIndex, NaiveDate)> = DayIndex::all()
        .filter_map(|i| anchor.and_then(|a| day_index_to_date(a, i)).map(|d| (i, d)))
        .filter(|(_, d)| setup.show_weekends || !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect();
    if anchor.is_none() {
        tracing::warn!(date = %date, "week start is out of range");
    }

    let days: Vec<Value> = columns
        .iter()
        .map(|(index, day)| {
            let status = is_blocked_date(*day, &snap.calendar, &snap.holidays);
            json!({
                "dayIndex": index,
                "date": format_iso_date(*day),
                "weekday": labels[index.get() as usize],
                "isToday": *day == date,
                "blocked": status.blocked,
                "label": status.label,
            })
        })
        .collect();

    // Configured rows first, then any slot labels the setup no longer lists.
    let mut rows: Vec<String> = setup.time_slots.clone();
    for slot in &snap.slots {
        if !rows.contains(&slot.time_slot) {
            rows.push(slot.time_slot.clone());
        }
    }

    let grid: Vec<Value> = rows
        .iter()
        .map(|time_slot| {
            let cells: Vec<Value> = columns
                .iter()
                .map(|(index, day)| {
                    let status = is_blocked_date(*day, &snap.calendar, &snap.holidays);
                    let lesson: Option<&ScheduleSlot> = if status.blocked {
                        None
                    } else {
                        snap.slots
                            .iter()
                            .find(|s| s.day_index == *index && &s.time_slot == time_slot)
                    };
                    json!({
                        "dayIndex": date_to_day_index(*day, week_start),
                        "date": format_iso_date(*day),
                        "blocked": status.blocked,
                        "subject": lesson.map(|s| s.subject.clone()),
                        "className": lesson.map(|s| s.class_name.clone()),
                    })
                })
                .collect();
            json!({ "timeSlot": time_slot, "cells": cells })
        })
        .collect();

    Ok(json!({
        "date": format_iso_date(date),
        "weekStart": anchor.map(format_iso_date),
        "weekStartsOnSunday": week_start.starts_on_sunday(),
        "academicWeek": academic_week_json(Some(date), &snap.calendar),
        "days": days,
        "rows": grid,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "timetable.weekOpen" => Some(respond(req, timetable_week_open(state, &req.params))),
        _ => None,
    }
}
