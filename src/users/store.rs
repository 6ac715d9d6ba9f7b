use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store's uniqueness guarantee on `email` rejected the write.
    #[error("email already exists: {0}")]
    DuplicateEmail(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for user records. Emails reaching the store are already normalized.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Inserts a record, failing with `DuplicateEmail` when the email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// All records, newest `created_at` first.
    async fn list_newest_first(&self) -> StoreResult<Vec<User>>;

    /// Releases connections; called once after the server stops.
    async fn close(&self);
}
