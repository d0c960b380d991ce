use crate::risk_assessment::domain::{PassportString, Score, User, UserName};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// UserRepository port for persisting users
///
/// Users are keyed by passport string, which is unique across the store.
/// Implementations must be `Send + Sync` so handlers can share them.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores `user` unless a user with the same passport already exists
    ///
    /// # Returns
    /// The stored user and `true` if it was inserted, or the existing user
    /// and `false`.
    async fn insert_if_absent(&self, user: User) -> Result<(User, bool)>;

    async fn find_by_passport(&self, passport: &PassportString) -> Result<Option<User>>;

    /// All users in creation order.
    async fn list(&self) -> Result<Vec<User>>;

    /// Changes the name of a stored user, leaving every other field as is.
    ///
    /// # Returns
    /// The updated user, or `None` if no user has that passport.
    async fn rename(
        &self,
        passport: &PassportString,
        name: UserName,
        now: DateTime<Utc>,
    ) -> Result<Option<User>>;

    /// Stores a recomputed reference score.
    ///
    /// # Returns
    /// The score held before this call, or `None` if no user has that passport.
    async fn set_ref_score(
        &self,
        passport: &PassportString,
        score: Score,
        now: DateTime<Utc>,
    ) -> Result<Option<Score>>;

    /// Returns `true` if a user was removed.
    async fn delete(&self, passport: &PassportString) -> Result<bool>;
}
