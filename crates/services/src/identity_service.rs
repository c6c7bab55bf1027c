use std::sync::Arc;

use quiz_core::model::UserKey;
use storage::repository::{IdentityRepository, StorageError};
use tracing::info;

/// Hands out the persisted anonymous key used for experiment bucketing.
#[derive(Clone)]
pub struct IdentityService {
    repo: Arc<dyn IdentityRepository>,
}

impl IdentityService {
    #[must_use]
    pub fn new(repo: Arc<dyn IdentityRepository>) -> Self {
        Self { repo }
    }

    /// Return the stored key, generating and persisting one on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be read or saved.
    pub async fn get_or_create(&self) -> Result<UserKey, StorageError> {
        if let Some(key) = self.repo.get_user_key().await? {
            return Ok(key);
        }
        let key = UserKey::generate();
        self.repo.save_user_key(&key).await?;
        info!("created new anonymous user key");
        Ok(key)
    }
}
