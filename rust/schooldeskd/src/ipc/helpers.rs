use chrono::NaiveDate;
use serde_json::Value;

use crate::calendar::{parse_iso_date, parse_optional_date, DayIndex};
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request, Role};
use crate::store::SchoolStore;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, self.details)
    }
}

/// Maps a store failure to `code`, keeping the full context chain.
pub fn store_err(code: &'static str) -> impl FnOnce(anyhow::Error) -> HandlerErr {
    move |e| HandlerErr::new(code, format!("{e:#}"))
}

pub fn store_ref(state: &AppState) -> Result<&(dyn SchoolStore + 'static), HandlerErr> {
    state
        .store
        .as_deref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn require_writable(state: &AppState) -> Result<(), HandlerErr> {
    if state.role == Role::Parent {
        return Err(HandlerErr::new(
            "read_only",
            "the parent view cannot change school data",
        ));
    }
    Ok(())
}

/// Store handle for mutating methods; refused in the parent preview.
pub fn store_mut(state: &mut AppState) -> Result<&mut (dyn SchoolStore + 'static), HandlerErr> {
    require_writable(state)?;
    match state.store.as_deref_mut() {
        Some(store) => Ok(store),
        None => Err(HandlerErr::new("no_workspace", "select a workspace first")),
    }
}

pub fn required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Strict date for data being written.
pub fn required_date(params: &Value, key: &str) -> Result<NaiveDate, HandlerErr> {
    let raw = required_str(params, key)?;
    parse_iso_date(&raw).map_err(|e| HandlerErr::bad_params(format!("{}: {}", key, e)))
}

/// Lenient date for read-only calendar queries: present-but-malformed input
/// is logged and reported as `None` so the view can render a neutral state.
pub fn query_date(params: &Value, key: &str) -> Result<Option<NaiveDate>, HandlerErr> {
    let raw = required_str(params, key)?;
    Ok(parse_optional_date(Some(&raw)))
}

pub fn required_day_index(params: &Value, key: &str) -> Result<DayIndex, HandlerErr> {
    let raw = params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))?;
    DayIndex::new(raw).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

pub fn parse_opt_string(v: Option<&Value>) -> Result<Option<String>, &'static str> {
    match v {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => {
            let s = v.as_str().ok_or("must be string or null")?.trim().to_string();
            if s.is_empty() {
                Ok(None)
            } else {
                Ok(Some(s))
            }
        }
    }
}

pub fn parse_bool(v: Option<&Value>, default: bool) -> Result<bool, &'static str> {
    match v {
        None => Ok(default),
        Some(v) if v.is_null() => Ok(default),
        Some(v) => v.as_bool().ok_or("must be boolean"),
    }
}

pub fn respond(req: &Request, result: Result<Value, HandlerErr>) -> Value {
    match result {
        Ok(v) => crate::ipc::error::ok(&req.id, v),
        Err(e) => {
            tracing::debug!(method = %req.method, code = e.code, message = %e.message, "request failed");
            e.response(&req.id)
        }
    }
}
