use rocket::{
    catch,
    serde::json::{Value, json},
};

use crate::errors::ApiError;

pub mod flowers;
pub mod shopping;

/// Treats an absent or empty `flowername` query parameter as missing.
fn required_flowername(flowername: Option<String>) -> Result<String, ApiError> {
    flowername
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::MissingFlowername)
}

#[catch(404)]
pub fn catch404() -> Value {
    json!({ "error": "Not found" })
}

#[catch(500)]
pub fn catch500() -> Value {
    json!({ "error": "An error occurred" })
}
