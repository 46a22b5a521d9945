use crate::calendar::{
    compute_academic_week, date_to_day_index, day_index_to_date, format_iso_date,
    is_blocked_date, parse_month_key, slots_on_date, week_start_of, weekday_labels,
    AcademicCalendar, Holiday, ScheduleSlot,
};
use crate::ipc::helpers::{
    query_date, required_day_index, required_str, respond, store_err, store_ref, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{load_calendar, SchoolStore};
use chrono::{Datelike, NaiveDate};
use serde_json::{json, Value};

pub(crate) struct CalendarSnapshot {
    pub calendar: AcademicCalendar,
    pub holidays: Vec<Holiday>,
    pub slots: Vec<ScheduleSlot>,
}

pub(crate) fn snapshot(store: &dyn SchoolStore) -> Result<CalendarSnapshot, HandlerErr> {
    Ok(CalendarSnapshot {
        calendar: load_calendar(store).map_err(store_err("db_query_failed"))?,
        holidays: store.holidays_list().map_err(store_err("db_query_failed"))?,
        slots: store.slots_list().map_err(store_err("db_query_failed"))?,
    })
}

/// `{week, status, weekStart, label}` for the academic week containing `date`.
pub(crate) fn academic_week_json(date: Option<NaiveDate>, calendar: &AcademicCalendar) -> Value {
    let Some(week) = date.and_then(|d| compute_academic_week(d, calendar)) else {
        return json!({
            "week": null,
            "status": "unavailable",
            "weekStart": date
                .and_then(|d| week_start_of(d, calendar.week_start()))
                .map(format_iso_date),
            "label": null,
        });
    };
    json!({
        "week": week.number,
        "status": if week.has_started() { "inTerm" } else { "notStarted" },
        "weekStart": format_iso_date(week.week_start),
        "label": week.label(),
    })
}

fn lesson_json(slot: &ScheduleSlot) -> Value {
    json!({
        "timeSlot": slot.time_slot,
        "subject": slot.subject,
        "className": slot.class_name,
    })
}

fn calendar_academic_week(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let date = query_date(params, "date")?;
    let calendar = load_calendar(store).map_err(store_err("db_query_failed"))?;
    Ok(academic_week_json(date, &calendar))
}

fn calendar_day_index(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let date = query_date(params, "date")?;
    let calendar = load_calendar(store).map_err(store_err("db_query_failed"))?;
    let week_start = calendar.week_start();
    Ok(json!({
        "dayIndex": date.map(|d| date_to_day_index(d, week_start)),
        "weekStart": date.and_then(|d| week_start_of(d, week_start)).map(format_iso_date),
        "weekStartsOnSunday": week_start.starts_on_sunday(),
    }))
}

fn calendar_day_date(params: &Value) -> Result<Value, HandlerErr> {
    let anchor = query_date(params, "weekAnchor")?;
    let index = required_day_index(params, "dayIndex")?;
    Ok(json!({
        "date": anchor
            .and_then(|a| day_index_to_date(a, index))
            .map(format_iso_date),
    }))
}

fn calendar_blocked(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let Some(date) = query_date(params, "date")? else {
        return Ok(json!({ "blocked": false, "label": null }));
    };
    let calendar = load_calendar(store).map_err(store_err("db_query_failed"))?;
    let holidays = store.holidays_list().map_err(store_err("db_query_failed"))?;
    let status = is_blocked_date(date, &calendar, &holidays);
    Ok(json!({ "blocked": status.blocked, "label": status.label }))
}

fn calendar_month_open(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let month_key = required_str(params, "month")?;
    let (year, month) =
        parse_month_key(&month_key).map_err(|_| HandlerErr::bad_params("month must be YYYY-MM"))?;
    let snap = snapshot(store)?;
    let week_start = snap.calendar.week_start();

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| HandlerErr::bad_params("month out of range"))?;
    let days: Vec<NaiveDate> = (1..=31)
        .map_while(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect();

    let cells: Vec<Value> = days
        .iter()
        .map(|&date| {
            let status = is_blocked_date(date, &snap.calendar, &snap.holidays);
            let lessons: Vec<Value> = if status.blocked {
                Vec::new()
            } else {
                slots_on_date(date, week_start, &snap.slots)
                    .into_iter()
                    .map(lesson_json)
                    .collect()
            };
            json!({
                "date": format_iso_date(date),
                "day": date.day(),
                "dayIndex": date_to_day_index(date, week_start),
                "blocked": status.blocked,
                "label": status.label,
                "academicWeek": compute_academic_week(date, &snap.calendar).map(|w| w.number),
                "lessons": lessons,
            })
        })
        .collect();

    Ok(json!({
        "month": format!("{:04}-{:02}", year, month),
        "weekStartsOnSunday": week_start.starts_on_sunday(),
        "weekdays": weekday_labels(week_start),
        "leadingBlanks": date_to_day_index(first, week_start),
        "daysInMonth": days.len(),
        "cells": cells,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "calendar.academicWeek" => calendar_academic_week(state, &req.params),
        "calendar.dayIndex" => calendar_day_index(state, &req.params),
        "calendar.dayDate" => calendar_day_date(&req.params),
        "calendar.blocked" => calendar_blocked(state, &req.params),
        "calendar.monthOpen" => calendar_month_open(state, &req.params),
        _ => return None,
    };
    Some(respond(req, result))
}
