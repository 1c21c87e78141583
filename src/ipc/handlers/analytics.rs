use crate::ipc::error::ok;
use crate::ipc::helpers::HandlerErr;
use crate::ipc::types::{AppState, Request};
use crate::store;
use rusqlite::Connection;
use serde_json::json;

fn analytics_class_summary(conn: &Connection) -> Result<serde_json::Value, HandlerErr> {
    let rows =
        store::summarize_class(conn).map_err(|e| HandlerErr::from_store(e, "db_query_failed"))?;

    // Bar payload: one label/value pair per student, in roster order.
    let labels: Vec<&str> = rows.iter().map(|r| r.student_name.as_str()).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.percentage).collect();

    Ok(json!({
        "rows": rows,
        "chart": {
            "labels": labels,
            "values": values
        }
    }))
}

fn handle_analytics_class_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    match analytics_class_summary(&state.db) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.classSummary" => Some(handle_analytics_class_summary(state, req)),
        _ => None,
    }
}
