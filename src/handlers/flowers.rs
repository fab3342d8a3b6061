//! # Flower handlers
//!
//! Looks a flower up by its English or Korean name.

use rocket::{Route, State, get, routes, serde::json::Json};

use crate::{db::SharedStore, errors::ApiError, models::FlowerRecord};

/// Looks up one flower whose `flowername` or `flowername_kr` equals the query.
///
/// # Returns
///
/// The five projected fields, 400 if `flowername` is missing, 404 if nothing
/// matches, or 500 if the store fails.
#[get("/flowers?<flowername>")]
pub async fn get_flower(
    store: &State<SharedStore>,
    flowername: Option<String>,
) -> Result<Json<FlowerRecord>, ApiError> {
    let flowername = super::required_flowername(flowername)?;

    match store.find_flower_by_name(&flowername).await {
        Ok(Some(flower)) => Ok(Json(flower)),
        Ok(None) => Err(ApiError::FlowerNotFound),
        Err(e) => {
            tracing::error!(%flowername, error = %e, "flower lookup failed");
            Err(e.into())
        }
    }
}

pub fn routes() -> Vec<Route> {
    routes![get_flower]
}
