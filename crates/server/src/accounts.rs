//! Account API endpoints

use api_types::account::{AccountResponse, AccountsResponse, Role};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    role: Option<String>,
}

/// Handle requests for listing accounts, optionally narrowed to one role
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AccountsResponse>, ServerError> {
    let role = match query.role.as_deref() {
        Some(raw) => Some(
            Role::from_wire(raw)
                .ok_or_else(|| ServerError::Generic(format!("unknown role `{raw}`")))?,
        ),
        None => None,
    };
    let data = state.store.list(role.map(Role::as_str)).await;
    tracing::debug!("listing {} accounts", data.len());

    Ok(Json(AccountsResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Handle requests for a single account
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ServerError> {
    let data = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| ServerError::NotFound(format!("account {id} not found")))?;

    Ok(Json(AccountResponse {
        success: true,
        data,
    }))
}
