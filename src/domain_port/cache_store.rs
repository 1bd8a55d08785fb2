use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key-value store with absolute expiry. Values cross the port as bytes.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set_raw(
        &self,
        key: &str,
        value: Vec<u8>,
        expire_at: DateTime<Utc>,
    ) -> Result<(), CacheError>;

    /// Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

impl dyn CacheStore {
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key).await? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| CacheError::Codec(format!("{}: {}", key, e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        expire_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| CacheError::Codec(format!("{}: {}", key, e)))?;
        self.set_raw(key, bytes, expire_at).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("store error: {0}")]
    Store(String),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
