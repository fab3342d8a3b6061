//! # flower-api - flower lookups and a Naver Shopping proxy
//!
//! ## Routes
//!
//! - `GET /flowers?flowername=...`: one flower by English or Korean name
//! - `GET /naver-shopping?flowername=...`: every shopping listing for the name
//!
//! ## Environment Variables
//!
//! - `DB_URI`: MongoDB connection string (required)
//! - `DB_NAME`: database name override (optional)
//! - `PORT` / `HOST`: listen address (default `0.0.0.0:5000`)
//! - `CLIENT_ID` / `CLIENT_SECRET`: Naver API credentials
//! - `NAVER_SHOPPING_URL`: upstream endpoint override
//! - `RUST_LOG`: log filter

use std::sync::Arc;

use clap::Parser;
use rocket::{Build, Rocket, catchers, fairing::AdHoc, figment::Figment, http::Method};
use rocket_cors::{AllowedHeaders, AllowedOrigins, Cors, CorsOptions};

use crate::{
    config::Config,
    db::{MongoFlowerStore, SharedStore},
    errors::StartupError,
    shopping::ShoppingClient,
};

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod shopping;

const ALLOWED_ORIGIN: &str = "*";
const ALLOWED_METHODS: &str = "GET, PUT, POST, DELETE";
const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

/// Preflight handling. The plain response headers are set by
/// [`cors_headers`], which runs on every response.
fn cors() -> Result<Cors, rocket_cors::Error> {
    CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![Method::Get, Method::Put, Method::Post, Method::Delete]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&[
            "Origin",
            "X-Requested-With",
            "Content-Type",
            "Accept",
        ]))
        .allow_credentials(false)
        .send_wildcard(true)
        .to_cors()
}

/// Stamps the cross-origin headers onto every response, whether or not the
/// request carried an `Origin` header.
fn cors_headers() -> AdHoc {
    AdHoc::on_response("CORS headers", |_, response| {
        Box::pin(async move {
            response.set_raw_header("Access-Control-Allow-Origin", ALLOWED_ORIGIN);
            response.set_raw_header("Access-Control-Allow-Methods", ALLOWED_METHODS);
            response.set_raw_header("Access-Control-Allow-Headers", ALLOWED_HEADERS);
        })
    })
}

/// Assembles the server around an already-connected store.
///
/// # Returns
///
/// A Rocket instance ready for launch, or the error from invalid CORS options.
pub fn server(
    figment: Figment,
    store: SharedStore,
    shopping: ShoppingClient,
) -> Result<Rocket<Build>, rocket_cors::Error> {
    Ok(rocket::custom(figment)
        .manage(store)
        .manage(shopping)
        .attach(cors()?)
        .attach(cors_headers())
        .attach(AdHoc::on_liftoff("Startup banner", |rocket| {
            Box::pin(async move {
                tracing::info!(
                    "server is running on http://localhost:{}",
                    rocket.config().port
                );
            })
        }))
        .register("/", catchers![handlers::catch404, handlers::catch500])
        .mount("/", handlers::flowers::routes())
        .mount("/", handlers::shopping::routes()))
}

#[rocket::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = Config::parse();

    let store = match MongoFlowerStore::connect(&config).await {
        Ok(store) => store,
        Err(StartupError::MissingDbUri) => {
            tracing::error!("fatal: DB_URI environment variable is not set");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal: could not connect to MongoDB");
            std::process::exit(1);
        }
    };

    let shopping = ShoppingClient::from_config(&config);
    if shopping.credentials().is_none() {
        tracing::warn!("CLIENT_ID or CLIENT_SECRET not set; /naver-shopping will fail");
    }

    let rocket = match server(config.figment(), Arc::new(store), shopping) {
        Ok(rocket) => rocket,
        Err(e) => {
            tracing::error!(error = %e, "fatal: invalid CORS options");
            std::process::exit(1);
        }
    };

    if let Err(e) = rocket.launch().await {
        tracing::error!(error = %e, "server failed to launch");
        std::process::exit(1);
    }
}
