mod test_support;

use serde_json::json;
use test_support::{request, request_err, request_ok, send_line, spawn_sidecar, temp_dir};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("schooldesk-router-smoke");
    let bundle_out = workspace.join("smoke-backup.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert!(health.get("version").and_then(|v| v.as_str()).is_some());
    assert!(health.get("workspacePath").is_some_and(|v| v.is_null()));
    assert_eq!(health.get("role").and_then(|v| v.as_str()), Some("teacher"));

    let no_workspace = request_err(&mut stdin, &mut reader, "2", "setup.get", json!({}));
    assert_eq!(no_workspace, "no_workspace");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let health = request_ok(&mut stdin, &mut reader, "4", "health", json!({}));
    assert_eq!(health.get("storage").and_then(|v| v.as_str()), Some("sqlite"));

    let calls = [
        ("setup.get", json!({})),
        ("holidays.list", json!({})),
        ("schedule.list", json!({})),
        ("calendar.academicWeek", json!({ "date": "2025-03-03" })),
        ("calendar.dayIndex", json!({ "date": "2025-03-03" })),
        ("calendar.dayDate", json!({ "weekAnchor": "2025-03-03", "dayIndex": 4 })),
        ("calendar.blocked", json!({ "date": "2025-03-03" })),
        ("calendar.monthOpen", json!({ "month": "2025-03" })),
        ("timetable.weekOpen", json!({ "date": "2025-03-03" })),
        (
            "backup.exportWorkspaceBundle",
            json!({ "outPath": bundle_out.to_string_lossy() }),
        ),
    ];
    for (i, (method, params)) in calls.into_iter().enumerate() {
        let _ = request_ok(&mut stdin, &mut reader, &format!("c{}", i), method, params);
    }

    let unknown = request(&mut stdin, &mut reader, "5", "classes.list", json!({}));
    assert_eq!(
        unknown.pointer("/error/code").and_then(|v| v.as_str()),
        Some("not_implemented")
    );

    let garbage = send_line(&mut stdin, &mut reader, "{not json");
    assert_eq!(garbage.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        garbage.pointer("/error/code").and_then(|v| v.as_str()),
        Some("bad_json")
    );

    // The loop keeps serving after a bad line.
    let _ = request_ok(&mut stdin, &mut reader, "6", "health", json!({}));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
