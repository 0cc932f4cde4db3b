use std::time::Duration;

use api_types::{
    ErrorResponse,
    account::{AccountRecord, AccountsResponse},
};
use reqwest::Url;
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("server error: {0}")]
    Server(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct Client {
    accounts_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, accounts_path: &str, timeout: Duration) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|err| AppError::Setting(format!("invalid base_url: {err}")))?;
        let accounts_url = base_url
            .join(accounts_path.trim_start_matches('/'))
            .map_err(|err| AppError::Setting(format!("invalid accounts_path: {err}")))?;

        Ok(Self {
            accounts_url,
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn accounts_url(&self) -> &Url {
        &self.accounts_url
    }

    /// Fetches every account. `token` is sent as a bearer credential.
    pub async fn accounts_list(
        &self,
        token: &str,
    ) -> std::result::Result<Vec<AccountRecord>, ClientError> {
        let res = self
            .http
            .get(self.accounts_url.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res
                .json::<AccountsResponse>()
                .await
                .map(|listing| listing.data)
                .map_err(|err| ClientError::Decode(err.to_string()));
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            _ => ClientError::Server(format!("{status}: {body}")),
        };
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use api_types::account::AccountRecord;
    use server::{AccountStore, ServerState};

    use super::*;

    async fn spawn_server() -> String {
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
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = server::spawn_with_listener(
            ServerState::new(store, vec!["secret".to_string()]),
            listener,
        )
        .unwrap();
        format!("http://{addr}")
    }

    fn client(base_url: &str, path: &str) -> Client {
        Client::new(base_url, path, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn accounts_url_joins_base_and_path() {
        let client = client("http://admin.local/backend", "/api/admin/users");
        assert_eq!(
            client.accounts_url().as_str(),
            "http://admin.local/backend/api/admin/users"
        );
    }

    #[test]
    fn invalid_base_url_is_a_setting_error() {
        let res = Client::new("not a url", "api/admin/users", Duration::from_secs(1));
        assert!(matches!(res, Err(AppError::Setting(_))));
    }

    #[tokio::test]
    async fn lists_accounts_in_arrival_order() {
        let base = spawn_server().await;
        let accounts = client(&base, "api/admin/users")
            .accounts_list("secret")
            .await
            .unwrap();
        let names: Vec<_> = accounts
            .iter()
            .filter_map(|a| a.full_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let base = spawn_server().await;
        let res = client(&base, "api/admin/users").accounts_list("nope").await;
        assert!(matches!(res, Err(ClientError::Unauthorized)));
    }

    #[tokio::test]
    async fn missing_route_is_not_found() {
        let base = spawn_server().await;
        let res = client(&base, "api/admin/missing").accounts_list("secret").await;
        assert!(matches!(res, Err(ClientError::NotFound)));
    }

    #[tokio::test]
    async fn non_listing_body_is_a_decode_error() {
        let base = spawn_server().await;
        let res = client(&base, "api/admin/users/1").accounts_list("secret").await;
        assert!(matches!(res, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let res = client(&format!("http://{addr}"), "api/admin/users")
            .accounts_list("secret")
            .await;
        assert!(matches!(res, Err(ClientError::Transport(_))));
    }
}
