use crate::calendar::{format_iso_date, parse_iso_date, Holiday};
use crate::ipc::helpers::{
    parse_bool, parse_opt_string, required_date, required_str, respond, store_err, store_mut,
    store_ref, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use chrono::Datelike;
use serde_json::{json, Value};
use uuid::Uuid;

fn holiday_to_json(h: &Holiday) -> Value {
    json!({
        "id": h.id,
        "name": h.name,
        "date": format_iso_date(h.date),
        "description": h.description,
        "isSchoolHoliday": h.is_school_holiday,
    })
}

fn parse_name(v: Option<&Value>, key: &str) -> Result<String, HandlerErr> {
    let name = parse_opt_string(v)
        .map_err(|m| HandlerErr::bad_params(format!("{} {}", key, m)))?
        .ok_or_else(|| HandlerErr::bad_params(format!("{} is required", key)))?;
    if name.len() > 120 {
        return Err(HandlerErr::bad_params(format!("{} length must be <= 120", key)));
    }
    Ok(name)
}

fn holidays_list(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let year = match params.get("year") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_i64()
                .ok_or_else(|| HandlerErr::bad_params("year must be integer or null"))?,
        ),
    };
    let holidays = store
        .holidays_list()
        .map_err(store_err("db_query_failed"))?;
    let rows: Vec<Value> = holidays
        .iter()
        .filter(|h| year.map_or(true, |y| h.date.year() as i64 == y))
        .map(holiday_to_json)
        .collect();
    Ok(json!({ "holidays": rows }))
}

fn holidays_create(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_mut(state)?;
    let input = params
        .get("input")
        .filter(|v| v.is_object())
        .ok_or_else(|| HandlerErr::bad_params("missing input"))?;
    let name = parse_name(input.get("name"), "input.name")?;
    let date = required_date(input, "date")
        .map_err(|e| HandlerErr::bad_params(format!("input {}", e.message)))?;
    let description = parse_opt_string(input.get("description"))
        .map_err(|m| HandlerErr::bad_params(format!("input.description {}", m)))?
        .unwrap_or_default();
    let is_school_holiday = parse_bool(input.get("isSchoolHoliday"), true)
        .map_err(|m| HandlerErr::bad_params(format!("input.isSchoolHoliday {}", m)))?;

    let holiday = Holiday {
        id: Uuid::new_v4().to_string(),
        name,
        date,
        description,
        is_school_holiday,
    };
    store
        .holiday_insert(&holiday)
        .map_err(store_err("db_insert_failed"))?;
    tracing::info!(holiday = %holiday.id, date = %holiday.date, "holiday created");
    Ok(json!({ "holidayId": holiday.id }))
}

fn holidays_update(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_mut(state)?;
    let holiday_id = required_str(params, "holidayId")?;
    let patch = params
        .get("patch")
        .and_then(|v| v.as_object())
        .ok_or_else(|| HandlerErr::bad_params("patch must be an object"))?;

    let mut holiday = store
        .holidays_list()
        .map_err(store_err("db_query_failed"))?
        .into_iter()
        .find(|h| h.id == holiday_id)
        .ok_or_else(|| HandlerErr::new("not_found", "holiday not found"))?;

    for (k, v) in patch {
        match k.as_str() {
            "name" => holiday.name = parse_name(Some(v), "patch.name")?,
            "date" => {
                let raw = v
                    .as_str()
                    .ok_or_else(|| HandlerErr::bad_params("patch.date must be YYYY-MM-DD"))?;
                holiday.date = parse_iso_date(raw)
                    .map_err(|e| HandlerErr::bad_params(format!("patch.date: {}", e)))?;
            }
            "description" => {
                holiday.description = parse_opt_string(Some(v))
                    .map_err(|m| HandlerErr::bad_params(format!("patch.description {}", m)))?
                    .unwrap_or_default();
            }
            "isSchoolHoliday" => {
                holiday.is_school_holiday = v
                    .as_bool()
                    .ok_or_else(|| HandlerErr::bad_params("patch.isSchoolHoliday must be boolean"))?;
            }
            _ => {
                return Err(HandlerErr::bad_params(format!("unknown holiday field: {}", k)))
            }
        }
    }

    let updated = store
        .holiday_update(&holiday)
        .map_err(store_err("db_update_failed"))?;
    if !updated {
        return Err(HandlerErr::new("not_found", "holiday not found"));
    }
    Ok(json!({ "ok": true }))
}

fn holidays_delete(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_mut(state)?;
    let holiday_id = required_str(params, "holidayId")?;
    let deleted = store
        .holiday_delete(&holiday_id)
        .map_err(store_err("db_update_failed"))?;
    if !deleted {
        return Err(HandlerErr::new("not_found", "holiday not found")
            .with_details(json!({ "holidayId": holiday_id })));
    }
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "holidays.list" => holidays_list(state, &req.params),
        "holidays.create" => holidays_create(state, &req.params),
        "holidays.update" => holidays_update(state, &req.params),
        "holidays.delete" => holidays_delete(state, &req.params),
        _ => return None,
    };
    Some(respond(req, result))
}
