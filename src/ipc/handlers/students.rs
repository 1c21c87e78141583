use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store;
use rusqlite::Connection;
use serde_json::json;

fn students_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let roll_number = get_required_str(params, "rollNumber")?;
    let course = get_required_str(params, "course")?;

    let student = store::add_student(conn, &name, &roll_number, &course)
        .map_err(|e| HandlerErr::from_store(e, "db_update_failed"))?;
    Ok(json!({ "student": student }))
}

fn students_list(conn: &Connection) -> Result<serde_json::Value, HandlerErr> {
    let students =
        store::list_students(conn).map_err(|e| HandlerErr::from_store(e, "db_query_failed"))?;
    Ok(json!({ "students": students }))
}

fn students_find_by_roll(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let roll_number = get_required_str(params, "rollNumber")?;
    let student = store::find_student_by_roll(conn, &roll_number)
        .map_err(|e| HandlerErr::from_store(e, "db_query_failed"))?;
    Ok(json!({ "student": student }))
}

fn students_summary(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let student = store::get_student(conn, &student_id)
        .map_err(|e| HandlerErr::from_store(e, "db_query_failed"))?;
    let summary = store::summarize_student(conn, &student.id)
        .map_err(|e| HandlerErr::from_store(e, "db_query_failed"))?;
    let history = store::student_history(conn, &student.id)
        .map_err(|e| HandlerErr::from_store(e, "db_query_failed"))?;

    // Pie payload for the breakdown chart: parallel labels/values arrays.
    Ok(json!({
        "student": student,
        "presentCount": summary.present_count,
        "absentCount": summary.absent_count,
        "totalDays": summary.total_days,
        "percentage": summary.percentage,
        "history": history,
        "chart": {
            "labels": ["Present", "Absent"],
            "values": [summary.present_count, summary.absent_count]
        }
    }))
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    match students_create(&state.db, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    match students_list(&state.db) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_students_find_by_roll(state: &mut AppState, req: &Request) -> serde_json::Value {
    match students_find_by_roll(&state.db, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_students_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    match students_summary(&state.db, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.create" => Some(handle_students_create(state, req)),
        "students.list" => Some(handle_students_list(state, req)),
        "students.findByRoll" => Some(handle_students_find_by_roll(state, req)),
        "students.summary" => Some(handle_students_summary(state, req)),
        _ => None,
    }
}
