use crate::calendar::{format_iso_date, parse_iso_date, Break};
use crate::ipc::helpers::{respond, store_err, store_mut, store_ref, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{SchoolStore, CALENDAR_KEY, TIMETABLE_KEY};
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

const MAX_BREAKS: usize = 32;
const MAX_TIME_SLOTS: usize = 16;

const DEFAULT_TIME_SLOTS: [&str; 7] = [
    "08:00 - 08:45",
    "08:50 - 09:35",
    "09:40 - 10:25",
    "10:45 - 11:30",
    "11:35 - 12:20",
    "13:00 - 13:45",
    "13:50 - 14:35",
];

#[derive(Clone, Copy)]
enum SetupSection {
    Calendar,
    Timetable,
}

impl SetupSection {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "calendar" => Some(Self::Calendar),
            "timetable" => Some(Self::Timetable),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Calendar => CALENDAR_KEY,
            Self::Timetable => TIMETABLE_KEY,
        }
    }
}

/// Timetable rows and column count as the grid renders them.
#[derive(Clone, Debug)]
pub struct TimetableSetup {
    pub time_slots: Vec<String>,
    pub show_weekends: bool,
}

fn default_section(section: SetupSection) -> Value {
    match section {
        SetupSection::Calendar => json!({
            "termStartDate": null,
            "weekStartsOnSunday": false,
            "breaks": []
        }),
        SetupSection::Timetable => json!({
            "timeSlots": DEFAULT_TIME_SLOTS,
            "showWeekends": false
        }),
    }
}

fn parse_bool(v: &Value, key: &str) -> Result<bool, String> {
    v.as_bool().ok_or_else(|| format!("{} must be boolean", key))
}

fn parse_string_max(v: &Value, key: &str, max_len: usize) -> Result<String, String> {
    let s = v.as_str().ok_or_else(|| format!("{} must be string", key))?;
    let s = s.trim();
    if s.is_empty() {
        return Err(format!("{} must not be empty", key));
    }
    if s.len() > max_len {
        return Err(format!("{} length must be <= {}", key, max_len));
    }
    Ok(s.to_string())
}

fn parse_date_value(v: &Value, key: &str) -> Result<NaiveDate, String> {
    let raw = v.as_str().ok_or_else(|| format!("{} must be YYYY-MM-DD", key))?;
    parse_iso_date(raw).map_err(|e| format!("{}: {}", key, e))
}

fn parse_breaks(v: &Value) -> Result<Value, String> {
    let arr = v.as_array().ok_or("breaks must be an array")?;
    if arr.len() > MAX_BREAKS {
        return Err(format!("breaks must contain at most {} entries", MAX_BREAKS));
    }
    let mut out = Vec::with_capacity(arr.len());
    for (i, item) in arr.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| format!("breaks[{}] must be an object", i))?;
        let field = |name: &str| obj.get(name).cloned().unwrap_or(Value::Null);
        let name = parse_string_max(&field("name"), &format!("breaks[{}].name", i), 80)?;
        let start = parse_date_value(&field("startDate"), &format!("breaks[{}].startDate", i))?;
        let end = parse_date_value(&field("endDate"), &format!("breaks[{}].endDate", i))?;
        let b = Break::new(name, start, end).map_err(|e| e.to_string())?;
        out.push(serde_json::to_value(&b).map_err(|e| e.to_string())?);
    }
    Ok(Value::Array(out))
}

fn parse_time_slots(v: &Value) -> Result<Value, String> {
    let arr = v.as_array().ok_or("timeSlots must be an array of strings")?;
    if arr.is_empty() || arr.len() > MAX_TIME_SLOTS {
        return Err(format!("timeSlots must contain 1..={} entries", MAX_TIME_SLOTS));
    }
    let mut out: Vec<String> = Vec::with_capacity(arr.len());
    for item in arr {
        let s = parse_string_max(item, "timeSlots[]", 32)?;
        if out.contains(&s) {
            return Err(format!("duplicate time slot: {}", s));
        }
        out.push(s);
    }
    Ok(json!(out))
}

fn merge_section_patch(
    section: SetupSection,
    current: &mut Value,
    patch: &Map<String, Value>,
) -> Result<(), String> {
    let obj = current
        .as_object_mut()
        .ok_or_else(|| "internal setup object must be a JSON object".to_string())?;
    for (k, v) in patch {
        match section {
            SetupSection::Calendar => match k.as_str() {
                "termStartDate" => {
                    let value = if v.is_null() {
                        Value::Null
                    } else {
                        Value::String(format_iso_date(parse_date_value(v, k)?))
                    };
                    obj.insert(k.clone(), value);
                }
                "weekStartsOnSunday" => {
                    obj.insert(k.clone(), Value::Bool(parse_bool(v, k)?));
                }
                "breaks" => {
                    obj.insert(k.clone(), parse_breaks(v)?);
                }
                _ => return Err(format!("unknown calendar field: {}", k)),
            },
            SetupSection::Timetable => match k.as_str() {
                "timeSlots" => {
                    obj.insert(k.clone(), parse_time_slots(v)?);
                }
                "showWeekends" => {
                    obj.insert(k.clone(), Value::Bool(parse_bool(v, k)?));
                }
                _ => return Err(format!("unknown timetable field: {}", k)),
            },
        }
    }
    Ok(())
}

fn load_section(store: &dyn SchoolStore, section: SetupSection) -> anyhow::Result<Value> {
    let mut current = default_section(section);
    if let Some(saved) = store.settings_get_json(section.key())? {
        if let Some(saved_obj) = saved.as_object() {
            // Best-effort apply: malformed historical values should not block the setup screen.
            if let Err(e) = merge_section_patch(section, &mut current, saved_obj) {
                tracing::warn!(section = section.key(), error = %e, "ignoring stored setup value");
            }
        }
    }
    Ok(current)
}

pub fn load_timetable_setup(store: &dyn SchoolStore) -> anyhow::Result<TimetableSetup> {
    let section = load_section(store, SetupSection::Timetable)?;
    let time_slots = section
        .get("timeSlots")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|s| s.as_str().map(|s| s.to_string()))
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect());
    let show_weekends = section
        .get("showWeekends")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    Ok(TimetableSetup {
        time_slots,
        show_weekends,
    })
}

fn setup_get(state: &AppState) -> Result<Value, HandlerErr> {
    let store = store_ref(state)?;
    let calendar =
        load_section(store, SetupSection::Calendar).map_err(store_err("db_query_failed"))?;
    let timetable =
        load_section(store, SetupSection::Timetable).map_err(store_err("db_query_failed"))?;
    Ok(json!({
        "calendar": calendar,
        "timetable": timetable
    }))
}

fn setup_update(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    let store = store_mut(state)?;
    let section_raw = params
        .get("section")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing section"))?;
    let section =
        SetupSection::parse(section_raw).ok_or_else(|| HandlerErr::bad_params("unknown section"))?;
    let patch = params
        .get("patch")
        .and_then(|v| v.as_object())
        .ok_or_else(|| HandlerErr::bad_params("patch must be an object"))?;

    let mut current = load_section(store, section).map_err(store_err("db_query_failed"))?;
    merge_section_patch(section, &mut current, patch).map_err(HandlerErr::bad_params)?;
    store
        .settings_set_json(section.key(), &current)
        .map_err(store_err("db_update_failed"))?;
    tracing::info!(section = section.key(), "setup updated");
    Ok(json!({ "ok": true }))
}

fn handle_setup_get(state: &mut AppState, req: &Request) -> Value {
    respond(req, setup_get(state))
}

fn handle_setup_update(state: &mut AppState, req: &Request) -> Value {
    respond(req, setup_update(state, &req.params))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "setup.get" => Some(handle_setup_get(state, req)),
        "setup.update" => Some(handle_setup_update(state, req)),
        _ => None,
    }
}
