//! # Database module
//!
//! Flower lookups go through the [`FlowerStore`] trait so request handlers
//! never touch the MongoDB client directly. The server manages one
//! [`SharedStore`] and every handler borrows it through `&State<SharedStore>`.
//!
//! ## Configuration
//!
//! - `DB_URI`: MongoDB connection string (required)
//! - `DB_NAME`: database name, when the connection string does not name one

use std::sync::Arc;

use mongodb::{
    Client, Collection,
    bson::{Document, doc},
    options::{ClientOptions, Tls, TlsOptions},
};

use crate::config::Config;
use crate::errors::{StartupError, StoreError};
use crate::models::FlowerRecord;

pub const FLOWER_COLLECTION: &str = "flowers";

/// Used when neither `DB_NAME` nor the connection string names a database.
const FALLBACK_DATABASE: &str = "test";

#[rocket::async_trait]
pub trait FlowerStore: Send + Sync {
    /// First flower whose `flowername` or `flowername_kr` equals `name`.
    async fn find_flower_by_name(&self, name: &str) -> Result<Option<FlowerRecord>, StoreError>;
}

pub type SharedStore = Arc<dyn FlowerStore>;

pub struct MongoFlowerStore {
    flowers: Collection<FlowerRecord>,
}

impl MongoFlowerStore {
    /// Opens the client and pings the server so a bad URI or unreachable
    /// cluster fails here rather than on the first request.
    ///
    /// TLS is always on, whatever the connection string says.
    pub async fn connect(config: &Config) -> Result<Self, StartupError> {
        let uri = config.db_uri()?;

        let client = Client::with_options(Self::client_options(uri).await?)?;
        let database = match config.db_name() {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(FALLBACK_DATABASE)),
        };

        database.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = database.name(), "connected to MongoDB");

        Ok(Self {
            flowers: database.collection(FLOWER_COLLECTION),
        })
    }

    async fn client_options(uri: &str) -> Result<ClientOptions, mongodb::error::Error> {
        let mut options = ClientOptions::parse(uri).await?;
        options.tls = Some(Tls::Enabled(TlsOptions::default()));
        options
            .app_name
            .get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());

        Ok(options)
    }

    /// Exact match on either the English or the Korean name.
    fn name_filter(name: &str) -> Document {
        doc! {
            "$or": [
                { "flowername": name },
                { "flowername_kr": name },
            ]
        }
    }

    fn projection() -> Document {
        doc! {
            "_id": 0,
            "flowername": 1,
            "habitat": 1,
            "binomialName": 1,
            "classification": 1,
            "flowername_kr": 1,
        }
    }
}

#[rocket::async_trait]
impl FlowerStore for MongoFlowerStore {
    async fn find_flower_by_name(&self, name: &str) -> Result<Option<FlowerRecord>, StoreError> {
        let flower = self
            .flowers
            .find_one(Self::name_filter(name))
            .projection(Self::projection())
            .await?;

        Ok(flower)
    }
}
