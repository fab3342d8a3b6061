use rocket::{Route, State, get, routes, serde::json::Json};

use crate::{errors::ApiError, models::ShoppingResults, shopping::ShoppingClient};

/// Collects every Naver Shopping listing for `flowername`, page by page.
///
/// # Returns
///
/// `{"items": [...]}` with all pages concatenated, 400 if `flowername` is
/// missing, or 500 if credentials are missing or any page fails.
#[get("/naver-shopping?<flowername>")]
pub async fn search_shopping(
    shopping: &State<ShoppingClient>,
    flowername: Option<String>,
) -> Result<Json<ShoppingResults>, ApiError> {
    let flowername = super::required_flowername(flowername)?;
    let credentials = shopping.credentials().ok_or_else(|| {
        tracing::error!("CLIENT_ID or CLIENT_SECRET is not configured");
        ApiError::MissingCredentials
    })?;

    match shopping.search_all(credentials, &flowername).await {
        Ok(items) => {
            tracing::info!(%flowername, count = items.len(), "shopping search complete");
            Ok(Json(ShoppingResults { items }))
        }
        Err(e) => {
            tracing::error!(%flowername, error = %e, "shopping search failed");
            Err(e.into())
        }
    }
}

pub fn routes() -> Vec<Route> {
    routes![search_shopping]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use rocket::http::Status;
    use serde_json::{Value, json};

    use crate::handlers::test_support::{MemoryStore, client};
    use crate::shopping::{NaverCredentials, ShoppingClient};

    const PATH: &str = "/v1/search/shop.json";

    fn credentials() -> Option<NaverCredentials> {
        Some(NaverCredentials {
            client_id: "test-id".to_string(),
            client_secret: "test-secret".to_string(),
        })
    }

    fn listings(offset: u32, count: u32) -> Vec<Value> {
        (0..count)
            .map(|i| json!({ "title": format!("rose #{}", offset + i), "lprice": "15000" }))
            .collect()
    }

    #[rocket::async_test]
    async fn accumulates_pages_until_an_empty_one() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("start", "1");
                then.status(200).json_body(json!({ "items": listings(1, 100) }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("start", "101");
                then.status(200).json_body(json!({ "items": listings(101, 100) }));
            })
            .await;
        let last = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("start", "201");
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let shopping = ShoppingClient::new(server.url(PATH), credentials());
        let client = client(Arc::new(MemoryStore::default()), shopping).await;
        let response = client.get("/naver-shopping?flowername=rose").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 200);
        assert_eq!(items[0]["title"], "rose #1");
        assert_eq!(items[199]["title"], "rose #200");

        first.assert_hits_async(1).await;
        second.assert_hits_async(1).await;
        // The terminating empty page is the only other request.
        last.assert_hits_async(1).await;
    }

    #[rocket::async_test]
    async fn stops_after_the_tenth_page() {
        let server = MockServer::start_async().await;
        let mut pages = Vec::new();
        for offset in (1..=901).step_by(100) {
            let mock = server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(PATH)
                        .query_param("start", offset.to_string().as_str());
                    then.status(200).json_body(json!({ "items": listings(offset, 1) }));
                })
                .await;
            pages.push(mock);
        }
        let beyond = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("start", "1001");
                then.status(200).json_body(json!({ "items": listings(1001, 1) }));
            })
            .await;

        let shopping = ShoppingClient::new(server.url(PATH), credentials());
        let client = client(Arc::new(MemoryStore::default()), shopping).await;
        let response = client.get("/naver-shopping?flowername=rose").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["items"].as_array().unwrap().len(), 10);

        for page in &pages {
            page.assert_hits_async(1).await;
        }
        beyond.assert_hits_async(0).await;
    }

    #[rocket::async_test]
    async fn failure_mid_search_discards_earlier_pages() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("start", "1");
                then.status(200).json_body(json!({ "items": listings(1, 100) }));
            })
            .await;
        let failing = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("start", "101");
                then.status(500);
            })
            .await;
        let after = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("start", "201");
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let shopping = ShoppingClient::new(server.url(PATH), credentials());
        let client = client(Arc::new(MemoryStore::default()), shopping).await;
        let response = client.get("/naver-shopping?flowername=rose").dispatch().await;

        assert_eq!(response.status(), Status::InternalServerError);
        assert_eq!(
            response.into_string().await.unwrap(),
            r#"{"error":"Naver Shopping API error"}"#
        );
        first.assert_hits_async(1).await;
        failing.assert_hits_async(1).await;
        after.assert_hits_async(0).await;
    }

    #[rocket::async_test]
    async fn missing_name_makes_no_upstream_call() {
        let server = MockServer::start_async().await;
        let upstream = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let shopping = ShoppingClient::new(server.url(PATH), credentials());
        let client = client(Arc::new(MemoryStore::default()), shopping).await;
        let response = client.get("/naver-shopping").dispatch().await;

        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(
            response.into_string().await.unwrap(),
            r#"{"error":"Flowername is required"}"#
        );
        upstream.assert_hits_async(0).await;
    }

    #[rocket::async_test]
    async fn missing_credentials_make_no_upstream_call() {
        let server = MockServer::start_async().await;
        let upstream = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let shopping = ShoppingClient::new(server.url(PATH), None);
        let client = client(Arc::new(MemoryStore::default()), shopping).await;
        let response = client.get("/naver-shopping?flowername=rose").dispatch().await;

        assert_eq!(response.status(), Status::InternalServerError);
        assert_eq!(
            response.into_string().await.unwrap(),
            r#"{"error":"Naver API credentials missing"}"#
        );
        upstream.assert_hits_async(0).await;
    }

    #[rocket::async_test]
    async fn forwards_escaped_korean_query_and_empty_result() {
        let server = MockServer::start_async().await;
        let upstream = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(PATH)
                    .query_param("query", "장미")
                    .query_param("start", "1");
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let shopping = ShoppingClient::new(server.url(PATH), credentials());
        let client = client(Arc::new(MemoryStore::default()), shopping).await;
        let response = client
            .get("/naver-shopping?flowername=%EC%9E%A5%EB%AF%B8")
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body, json!({ "items": [] }));
        upstream.assert_hits_async(1).await;
    }
}
