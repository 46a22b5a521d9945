use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request, Role};
use crate::store::{MemoryStore, SqliteStore};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "storage": state.store.as_ref().map(|s| s.kind()),
            "role": state.role.as_str(),
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match SqliteStore::open(&path) {
        Ok(store) => {
            tracing::info!(db = %store.path().display(), "workspace opened");
            state.workspace = Some(path.clone());
            state.store = Some(Box::new(store));
            ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "workspace open failed");
            err(&req.id, "db_open_failed", format!("{e:#}"), None)
        }
    }
}

fn handle_workspace_open_demo(state: &mut AppState, req: &Request) -> serde_json::Value {
    match MemoryStore::seeded() {
        Ok(store) => {
            tracing::info!("demo workspace opened");
            state.workspace = None;
            state.store = Some(Box::new(store));
            ok(&req.id, json!({ "storage": "memory" }))
        }
        Err(e) => err(&req.id, "db_open_failed", format!("{e:#}"), None),
    }
}

fn handle_session_set_role(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = required_str(&req.params, "role").and_then(|raw| {
        let role = Role::parse(&raw)
            .ok_or_else(|| HandlerErr::bad_params("role must be one of: teacher, parent"))?;
        tracing::info!(role = role.as_str(), "session role changed");
        state.role = role;
        Ok(json!({ "role": role.as_str() }))
    });
    respond(req, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "workspace.openDemo" => Some(handle_workspace_open_demo(state, req)),
        "session.setRole" => Some(handle_session_set_role(state, req)),
        _ => None,
    }
}
