//! Usage: Backend command names and argument shapes.
//!
//! Names and camelCase argument keys are the frozen `invoke()` contract.

use serde::Serialize;
use serde_json::{json, Value};

pub const GET_ALL_API_KEYS: &str = "get_all_api_keys";
pub const GET_API_KEYS_PAGINATED: &str = "get_api_keys_paginated";
pub const CREATE_API_KEY: &str = "create_api_key";
pub const UPDATE_API_KEY: &str = "update_api_key";
pub const DELETE_API_KEY: &str = "delete_api_key";
pub const GET_REQUEST_LOGS: &str = "get_request_logs";
pub const GET_REQUEST_LOGS_PAGINATED: &str = "get_request_logs_paginated";
pub const GET_USAGE_STATS: &str = "get_usage_stats";
pub const LOGIN: &str = "login";
pub const CHANGE_PASSWORD: &str = "change_password";
pub const CHECK_DEFAULT_PASSWORD: &str = "check_default_password";
pub const GET_RETRY_COUNT: &str = "get_retry_count";
pub const SET_RETRY_COUNT: &str = "set_retry_count";
pub const GET_PROXY_SETTINGS: &str = "get_proxy_settings";
pub const SET_PROXY_SETTINGS: &str = "set_proxy_settings";

pub fn no_args() -> Value {
    json!({})
}

pub fn page_args(page: u32, per_page: u32) -> Value {
    json!({ "page": page, "perPage": per_page })
}

pub fn request_args<T: Serialize>(request: &T) -> Value {
    json!({ "request": request })
}

pub fn key_args(key_id: &str) -> Value {
    json!({ "keyId": key_id })
}

pub fn key_request_args<T: Serialize>(key_id: &str, request: &T) -> Value {
    json!({ "keyId": key_id, "request": request })
}

pub fn limit_args(limit: u32) -> Value {
    json!({ "limit": limit })
}

pub fn retry_count_args(retry_count: u32) -> Value {
    json!({ "retryCount": retry_count })
}

pub fn settings_args<T: Serialize>(settings: &T) -> Value {
    json!({ "settings": settings })
}
