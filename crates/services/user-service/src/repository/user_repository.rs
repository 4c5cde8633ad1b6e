//! In-memory user repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{AppError, AppResult};
use domain::{UpdateUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, allocating the next id
    async fn create(&self, name: String, email: String) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by email address (exact, case-sensitive match)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users in insertion order
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Merge the provided fields into an existing user
    async fn update(&self, id: i64, update: UpdateUser) -> AppResult<User>;

    /// Remove a user permanently, returning its final state
    async fn delete(&self, id: i64) -> AppResult<User>;

    /// Count currently stored users with an active account
    async fn count_active(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository backed by process memory.
///
/// The store owns every user record for the lifetime of the process and
/// hands out clones, never references into its own state. Ids come from a
/// monotonic counter and are never reused, so `BTreeMap` iteration order
/// is insertion order.
pub struct UserStore {
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl UserStore {
    /// Create an empty store. The first allocated id is 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, name: String, email: String) -> AppResult<User> {
        let mut inner = self.inner.write().await;

        // The uniqueness check and the insert share one write guard, so
        // two concurrent creates with the same email cannot both pass.
        if inner.users.values().any(|user| user.email == email) {
            return Err(AppError::conflict("User with this email"));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let user = User::new(id, name, email);
        inner.users.insert(id, user.clone());
        tracing::debug!(id, "user created");

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|user| user.email == email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn update(&self, id: i64, update: UpdateUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(AppError::NotFound)?;

        // Email uniqueness is enforced at creation only; an update can
        // introduce a duplicate. See update_email_is_not_checked_for_uniqueness
        // in the store tests.
        user.apply(update);

        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.remove(&id).ok_or(AppError::NotFound)?;
        tracing::debug!(id, "user deleted");

        Ok(user)
    }

    async fn count_active(&self) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().filter(|user| user.is_active).count() as u64)
    }
}
