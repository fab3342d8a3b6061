use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::Request;
use serde_json::json;
use thiserror::Error;

use crate::shopping::ShoppingError;

/// Failures that stop the process before the server is launched.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("DB_URI environment variable is not set")]
    MissingDbUri,
    #[error("MongoDB connection failed: {0}")]
    Database(#[from] mongodb::error::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("flower query failed: {0}")]
    Query(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Query(Box::new(e))
    }
}

/// Request-level failures. The `Display` text carries the underlying cause
/// for the logs; callers only ever see [`ApiError::public_message`].
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Flowername is required")]
    MissingFlowername,
    #[error("Flower not found")]
    FlowerNotFound,
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Naver API credentials missing")]
    MissingCredentials,
    #[error("{0}")]
    Shopping(#[from] ShoppingError),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::MissingFlowername => Status::BadRequest,
            ApiError::FlowerNotFound => Status::NotFound,
            ApiError::Store(_) | ApiError::MissingCredentials | ApiError::Shopping(_) => {
                Status::InternalServerError
            }
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::MissingFlowername => "Flowername is required",
            ApiError::FlowerNotFound => "Flower not found",
            ApiError::Store(_) => "An error occurred",
            ApiError::MissingCredentials => "Naver API credentials missing",
            ApiError::Shopping(_) => "Naver Shopping API error",
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let body = json!({ "error": self.public_message() }).to_string();

        Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(body.len(), std::io::Cursor::new(body))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_hide_their_cause() {
        let err = ApiError::from(StoreError::Query("connection reset".into()));

        assert_eq!(err.status(), Status::InternalServerError);
        assert_eq!(err.public_message(), "An error occurred");
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn client_errors_map_to_their_statuses() {
        assert_eq!(ApiError::MissingFlowername.status(), Status::BadRequest);
        assert_eq!(ApiError::FlowerNotFound.status(), Status::NotFound);
        assert_eq!(
            ApiError::MissingCredentials.status(),
            Status::InternalServerError
        );
    }
}
