use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{normalize_email, NewUser, PublicUser, User},
    store::{StoreError, UserStore},
};
use crate::{
    auth::password::{hash_password, verify_password},
    error::{AppError, AppResult},
};

/// Raw registration input; every field may be absent.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration, lookup and credential checks over a `UserStore`.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    #[instrument(skip(self, input))]
    pub async fn register(&self, input: Registration) -> AppResult<PublicUser> {
        let email = input
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty());
        let password = input.password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            warn!("registration missing email or password");
            return Err(AppError::Validation("Email and password required".into()));
        };
        let name = input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if self.store.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(&password).map_err(AppError::Internal)?;

        // the store's uniqueness guarantee settles races with the pre-check above
        let user = self
            .store
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await
            .map_err(|e| {
                if let StoreError::DuplicateEmail(email) = &e {
                    warn!(email = %email, "lost registration race");
                }
                AppError::from(e)
            })?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> AppResult<Vec<PublicUser>> {
        let users = self.store.list_newest_first().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Checks an email/password pair. Unknown email and wrong password fail the same way.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Email and password required".into()));
        }

        let Some(user) = self.store.find_by_email(&email).await? else {
            warn!(email = %email, "login unknown email");
            return Err(AppError::Authentication("Invalid credentials".into()));
        };

        if !verify_password(password, &user.password_hash).map_err(AppError::Internal)? {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AppError::Authentication("Invalid credentials".into()));
        }

        info!(user_id = %user.id, "user authenticated");
        Ok(user)
    }

    pub async fn find_user(&self, id: Uuid) -> AppResult<PublicUser> {
        self.store
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::Authentication("User not found".into()))
    }
}
