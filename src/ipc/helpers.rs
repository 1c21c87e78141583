use crate::ipc::error::err;
use crate::store::StoreError;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    /// `db_code` picks the wire code for backend failures, so mutations
    /// report `db_update_failed` and reads report `db_query_failed`.
    pub fn from_store(e: StoreError, db_code: &'static str) -> Self {
        match e {
            StoreError::NotFound => HandlerErr {
                code: "not_found",
                message: "student not found".to_string(),
                details: None,
            },
            StoreError::Validation(message) => HandlerErr {
                code: "bad_params",
                message,
                details: None,
            },
            StoreError::Db(e) => HandlerErr {
                code: db_code,
                message: e.to_string(),
                details: None,
            },
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Optional string parameter; absent, null, and empty all mean "not given"
/// so an empty filter field matches everything.
pub fn get_optional_str(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<String>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be a string", key))),
    }
}
