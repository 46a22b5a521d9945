use crate::backup;
use crate::ipc::helpers::{require_writable, required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{SchoolStore, SqliteStore};
use serde_json::{json, Value};
use std::path::PathBuf;

fn backup_export(state: &AppState, params: &Value) -> Result<Value, HandlerErr> {
    if state.store.is_none() {
        return Err(HandlerErr::new("no_workspace", "select a workspace first"));
    }
    let Some(workspace) = state.workspace.as_ref() else {
        return Err(HandlerErr::new(
            "backup_failed",
            "the demo workspace is not stored on disk",
        ));
    };
    let out_path = PathBuf::from(required_str(params, "outPath")?);
    let summary = backup::export_workspace_bundle(workspace, &out_path)
        .map_err(|e| HandlerErr::new("backup_failed", format!("{e:#}")))?;
    Ok(json!({
        "ok": true,
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
        "dbSha256": summary.db_sha256,
    }))
}

fn backup_import(state: &mut AppState, params: &Value) -> Result<Value, HandlerErr> {
    require_writable(state)?;
    let in_path = PathBuf::from(required_str(params, "inPath")?);
    let workspace_path = PathBuf::from(required_str(params, "workspacePath")?);
    if !in_path.is_file() {
        return Err(HandlerErr::new("not_found", "bundle file not found")
            .with_details(json!({ "path": in_path.to_string_lossy() })));
    }

    // Release the open database before its file is replaced.
    let previous_workspace = state.workspace.take();
    let previous_store = state.store.take();
    let summary = match backup::import_workspace_bundle(&in_path, &workspace_path) {
        Ok(summary) => summary,
        Err(e) => {
            restore_previous(state, previous_workspace, previous_store);
            return Err(HandlerErr::new("backup_failed", format!("{e:#}")));
        }
    };
    let store = match SqliteStore::open(&workspace_path) {
        Ok(store) => store,
        Err(e) => {
            restore_previous(state, previous_workspace, previous_store);
            return Err(HandlerErr::new("db_open_failed", format!("{e:#}")));
        }
    };
    state.store = Some(Box::new(store));
    state.workspace = Some(workspace_path.clone());
    tracing::info!(workspace = %workspace_path.display(), format = %summary.bundle_format_detected, "workspace imported");

    Ok(json!({
        "ok": true,
        "bundleFormatDetected": summary.bundle_format_detected,
        "workspacePath": workspace_path.to_string_lossy(),
    }))
}

/// Puts back the workspace that was open before a failed import. An on-disk
/// workspace is reopened so a replaced database file is picked up.
fn restore_previous(
    state: &mut AppState,
    workspace: Option<PathBuf>,
    store: Option<Box<dyn SchoolStore>>,
) {
    let Some(path) = workspace else {
        state.store = store;
        return;
    };
    drop(store);
    match SqliteStore::open(&path) {
        Ok(reopened) => {
            state.store = Some(Box::new(reopened));
            state.workspace = Some(path);
        }
        Err(e) => {
            tracing::warn!(workspace = %path.display(), error = %e, "could not reopen workspace after failed import");
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "backup.exportWorkspaceBundle" => backup_export(state, &req.params),
        "backup.importWorkspaceBundle" => backup_import(state, &req.params),
        _ => return None,
    };
    Some(respond(req, result))
}
