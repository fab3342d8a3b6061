//! # Process configuration
//!
//! Every setting is read from the environment (after `.env` is loaded) and
//! can be overridden on the command line.

use std::net::IpAddr;

use clap::Parser;
use rocket::figment::Figment;

use crate::errors::StartupError;
use crate::shopping::{DEFAULT_SHOPPING_URL, NaverCredentials};

#[derive(Parser, Debug, Clone)]
#[command(name = "flower-api", about = "Flower lookup and Naver Shopping proxy")]
pub struct Config {
    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address the HTTP server binds to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// MongoDB connection string.
    #[arg(long, env = "DB_URI", hide_env_values = true)]
    pub db_uri: Option<String>,

    /// Database holding the `flowers` collection. Defaults to the one named
    /// in the connection string.
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    #[arg(long, env = "CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Naver Shopping search endpoint.
    #[arg(long, env = "NAVER_SHOPPING_URL", default_value = DEFAULT_SHOPPING_URL)]
    pub naver_shopping_url: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Config {
    pub fn db_uri(&self) -> Result<&str, StartupError> {
        non_empty(&self.db_uri).ok_or(StartupError::MissingDbUri)
    }

    pub fn db_name(&self) -> Option<&str> {
        non_empty(&self.db_name)
    }

    /// Both credentials, or `None` if either is missing.
    pub fn credentials(&self) -> Option<NaverCredentials> {
        let client_id = non_empty(&self.client_id)?;
        let client_secret = non_empty(&self.client_secret)?;

        Some(NaverCredentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    /// Rocket's default figment with the listen address applied on top.
    pub fn figment(&self) -> Figment {
        rocket::Config::figment()
            .merge(("port", self.port))
            .merge(("address", self.host))
    }
}
