use crate::calendar::{DayIndex, ScheduleSlot};
use crate::ipc::helpers::{
    required_day_index, required_str, respond, store_err, store_mut, store_ref, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use serde_json::{json, Value};

fn text_field(obj: &Value, key: &str, max_len: usize) -> Result<String, HandlerErr> {
    let s = required_str(obj, key).map_err(|e| HandlerErr::bad_params(format!("slot {}", e.message)))?;
    if s.len() > max_len {
        return Err(HandlerErr::bad_params(format!(
            "slot.{} length must be <= {}",
            key, max_len
        )));
    }
    Ok(s)
}

fn schedule_list(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let day_filter: Option<DayIndex> = match params.get("dayIndex") {
        None | Some(Value::Null) => None,
        Some(_) => Some(required_day_index(params, "dayIndex")?),
    };
    let slots: Vec<ScheduleSlot> = store
        .slots_list()
        .map_err(store_err("db_query_failed"))?
        .into_iter()
        .filter(|s| day_filter.map_or(true, |d| s.day_index == d))
        .collect();
    Ok(json!({ "slots": slots }))
}

fn schedule_upsert(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_mut(state)?;
    let slot = params
        .get("slot")
        .filter(|v| v.is_object())
        .ok_or_else(|| HandlerErr::bad_params("missing slot"))?;
    let slot = ScheduleSlot {
        day_index: required_day_index(slot, "dayIndex")?,
        time_slot: text_field(slot, "timeSlot", 32)?,
        subject: text_field(slot, "subject", 80)?,
        class_name: text_field(slot, "className", 40)?,
    };
    store
        .slot_upsert(&slot)
        .map_err(store_err("db_update_failed"))?;
    Ok(json!({ "ok": true, "slot": slot }))
}

fn schedule_delete(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_mut(state)?;
    let day_index = required_day_index(params, "dayIndex")?;
    let time_slot = required_str(params, "timeSlot")?;
    let deleted = store
        .slot_delete(day_index, &time_slot)
        .map_err(store_err("db_update_failed"))?;
    Ok(json!({ "ok": true, "deleted": deleted }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "schedule.list" => schedule_list(state, &req.params),
        "schedule.upsert" => schedule_upsert(state, &req.params),
        "schedule.delete" => schedule_delete(state, &req.params),
        _ => return None,
    };
    Some(respond(req, result))
}
