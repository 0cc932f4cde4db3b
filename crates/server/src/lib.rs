//! Backend for the admin panel.
//!
//! Serves the account collection to authenticated admin clients. Accounts
//! live in memory and are seeded from a JSON file at startup.

use api_types::ErrorResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};
pub use store::{AccountStore, StoreError};

mod accounts;
mod server;
mod store;

pub enum ServerError {
    Unauthorized(String),
    NotFound(String),
    Generic(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::NotFound(err) => (StatusCode::NOT_FOUND, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::Unauthorized("no token".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::NotFound("x".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
