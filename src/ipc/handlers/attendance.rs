use crate::ipc::error::ok;
use crate::ipc::helpers::{get_optional_str, get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, RecordFilter, Status};
use rusqlite::Connection;
use serde_json::json;

fn parse_entries(params: &serde_json::Value) -> Result<Vec<(String, Status)>, HandlerErr> {
    let Some(map) = params.get("entries").and_then(|v| v.as_object()) else {
        return Err(HandlerErr::bad_params("missing entries"));
    };
    let mut entries = Vec::with_capacity(map.len());
    for (student_id, value) in map {
        let Some(raw) = value.as_str() else {
            return Err(HandlerErr::bad_params(format!(
                "status for {} must be a string",
                student_id
            )));
        };
        let Some(status) = Status::parse(raw) else {
            return Err(HandlerErr::bad_params(format!(
                "status must be Present or Absent, got {:?}",
                raw
            )));
        };
        entries.push((student_id.clone(), status));
    }
    Ok(entries)
}

fn attendance_set_for_date(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_required_str(params, "date")?;
    let entries = parse_entries(params)?;

    let outcome = store::set_attendance_for_date(conn, &date, &entries)
        .map_err(|e| HandlerErr::from_store(e, "db_update_failed"))?;
    Ok(json!({
        "replaced": outcome.replaced,
        "inserted": outcome.inserted
    }))
}

fn attendance_records(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_optional_str(params, "date")?;
    let name_contains = get_optional_str(params, "nameContains")?;

    let records = store::query_records(
        conn,
        RecordFilter {
            date: date.as_deref(),
            name_contains: name_contains.as_deref(),
        },
    )
    .map_err(|e| HandlerErr::from_store(e, "db_query_failed"))?;
    Ok(json!({ "records": records }))
}

fn handle_attendance_set_for_date(state: &mut AppState, req: &Request) -> serde_json::Value {
    match attendance_set_for_date(&state.db, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_attendance_records(state: &mut AppState, req: &Request) -> serde_json::Value {
    match attendance_records(&state.db, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.setForDate" => Some(handle_attendance_set_for_date(state, req)),
        "attendance.records" => Some(handle_attendance_records(state, req)),
        _ => None,
    }
}
