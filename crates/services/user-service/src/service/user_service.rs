//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{DomainError, UpdateUser, User};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new user; name and email must be non-empty
    async fn create_user(&self, name: String, email: String) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// Look up a user by email. Absence is a valid outcome, not an error.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users in insertion order
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Merge the provided fields into an existing user
    async fn update_user(&self, id: i64, update: UpdateUser) -> AppResult<User>;

    /// Remove a user permanently, returning its final state
    async fn delete_user(&self, id: i64) -> AppResult<User>;

    /// Count currently stored users with an active account
    async fn count_active_users(&self) -> AppResult<u64>;

    /// Mark a user inactive; shorthand for an update of the lifecycle flag
    async fn deactivate_user(&self, id: i64) -> AppResult<User>;
}

/// Concrete implementation of UserService using a repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, name: String, email: String) -> AppResult<User> {
        if name.is_empty() || email.is_empty() {
            return Err(DomainError::validation("Name and email are required").into());
        }

        let user = self.repo.create(name, email).await?;
        tracing::info!(id = user.id, "created user");

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_user(&self, id: i64, update: UpdateUser) -> AppResult<User> {
        self.repo.update(id, update).await
    }

    async fn delete_user(&self, id: i64) -> AppResult<User> {
        let user = self.repo.delete(id).await?;
        tracing::info!(id = user.id, "deleted user");

        Ok(user)
    }

    async fn count_active_users(&self) -> AppResult<u64> {
        self.repo.count_active().await
    }

    async fn deactivate_user(&self, id: i64) -> AppResult<User> {
        self.update_user(id, UpdateUser::deactivation()).await
    }
}
