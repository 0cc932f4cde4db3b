use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{ServerError, accounts, store::AccountStore};

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<AccountStore>,
    /// Bearer tokens accepted for admin requests.
    pub tokens: Arc<Vec<String>>,
}

impl ServerState {
    pub fn new(store: AccountStore, tokens: Vec<String>) -> Self {
        if tokens.is_empty() {
            tracing::warn!("no admin tokens configured: every request will be rejected");
        }
        Self {
            store: Arc::new(store),
            tokens: Arc::new(tokens),
        }
    }
}

async fn auth(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ServerError::Unauthorized("missing bearer token".to_string()));
    };

    if !state.tokens.iter().any(|token| token == bearer.token()) {
        tracing::warn!("rejected request with unknown bearer token");
        return Err(ServerError::Unauthorized("invalid token".to_string()));
    }

    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/admin/users", get(accounts::list))
        .route("/api/admin/users/{id}", get(accounts::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use api_types::{
        ErrorResponse,
        account::{AccountRecord, AccountResponse, AccountsResponse},
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn state() -> ServerState {
        let store = AccountStore::new(vec![
            AccountRecord {
                id: Some("1".to_string()),
                role: Some("user".to_string()),
                full_name: Some("Ann".to_string()),
                ..Default::default()
            },
            AccountRecord {
                id: Some("2".to_string()),
                role: Some("serviceProvider".to_string()),
                full_name: Some("Bob".to_string()),
                ..Default::default()
            },
        ]);
        ServerState::new(store, vec!["secret".to_string()])
    }

    fn request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body<T: serde::de::DeserializeOwned>(res: Response) -> T {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_requires_bearer_token() {
        let res = router(state())
            .oneshot(request("/api/admin/users", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let err: ErrorResponse = body(res).await;
        assert_eq!(err.error, "missing bearer token");
    }

    #[tokio::test]
    async fn list_rejects_unknown_token() {
        let res = router(state())
            .oneshot(request("/api/admin/users", Some("guess")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_returns_nested_data() {
        let res = router(state())
            .oneshot(request("/api/admin/users", Some("secret")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let listing: AccountsResponse = body(res).await;
        assert!(listing.success);
        assert_eq!(listing.count, 2);
        assert_eq!(listing.data[0].full_name.as_deref(), Some("Ann"));
        assert_eq!(listing.data[1].full_name.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn list_filters_by_role_query() {
        let res = router(state())
            .oneshot(request("/api/admin/users?role=serviceProvider", Some("secret")))
            .await
            .unwrap();
        let listing: AccountsResponse = body(res).await;
        assert_eq!(listing.count, 1);
        assert_eq!(listing.data[0].id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn unknown_role_query_is_rejected() {
        let res = router(state())
            .oneshot(request("/api/admin/users?role=owner", Some("secret")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body(res).await;
        assert!(error.error.contains("owner"));
    }

    #[tokio::test]
    async fn get_returns_account_or_404() {
        let res = router(state())
            .oneshot(request("/api/admin/users/2", Some("secret")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let account: AccountResponse = body(res).await;
        assert_eq!(account.data.full_name.as_deref(), Some("Bob"));

        let res = router(state())
            .oneshot(request("/api/admin/users/9", Some("secret")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
