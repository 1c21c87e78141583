use crate::ipc::error::ok;
use crate::ipc::helpers::HandlerErr;
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    match store::collection_counts(&state.db) {
        Ok((students, records)) => ok(
            &req.id,
            json!({
                "version": env!("CARGO_PKG_VERSION"),
                "students": students,
                "records": records
            }),
        ),
        Err(e) => HandlerErr::from_store(e, "db_query_failed").response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
