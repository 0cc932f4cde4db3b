//! In-memory account collection.

use std::path::Path;

use api_types::account::AccountRecord;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Accounts in insertion order. Listing returns them in that order.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: RwLock<Vec<AccountRecord>>,
}

impl AccountStore {
    pub fn new(accounts: Vec<AccountRecord>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    /// Loads a JSON array of accounts.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let accounts: Vec<AccountRecord> = serde_json::from_str(&content)?;
        tracing::info!("loaded {} accounts from {}", accounts.len(), path.display());
        Ok(Self::new(accounts))
    }

    /// Returns every account, optionally only those with the given raw role.
    pub async fn list(&self, role: Option<&str>) -> Vec<AccountRecord> {
        let accounts = self.accounts.read().await;
        match role {
            Some(role) => accounts
                .iter()
                .filter(|account| account.role.as_deref() == Some(role))
                .cloned()
                .collect(),
            None => accounts.clone(),
        }
    }

    pub async fn get(&self, id: &str) -> Option<AccountRecord> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|account| account.id.as_deref() == Some(id))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, role: &str) -> AccountRecord {
        AccountRecord {
            id: Some(id.to_string()),
            role: Some(role.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = AccountStore::new(vec![
            account("1", "user"),
            account("2", "admin"),
            account("3", "serviceProvider"),
        ]);

        let ids: Vec<_> = store
            .list(None)
            .await
            .into_iter()
            .filter_map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn list_filters_by_role() {
        let store = AccountStore::new(vec![account("1", "user"), account("2", "admin")]);
        let admins = store.list(Some("admin")).await;
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn get_by_id() {
        let store = AccountStore::new(vec![account("1", "user")]);
        assert!(store.get("1").await.is_some());
        assert!(store.get("2").await.is_none());
    }

    #[test]
    fn load_reads_seed_file() {
        let path = std::env::temp_dir().join(format!("server-seed-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"_id": "1", "role": "user", "fullName": "Ann"}]"#).unwrap();
        let store = AccountStore::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(store.accounts.blocking_read().len(), 1);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let path = std::env::temp_dir().join(format!("server-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();
        let res = AccountStore::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(res, Err(StoreError::Json(_))));
    }
}
