//! User accounts and authentication.
//!
//! [`UserService`] owns the user repository and the token issuer. It
//! hashes passwords on the way in, resolves session tokens to users, and
//! checks credentials for login. Lookup failures in the authentication
//! paths become `None` rather than errors so callers cannot tell an
//! unknown user from a wrong password.

use std::sync::Arc;

use chrono::TimeDelta;
use cryptid_db::{DbError, UserRepository};
use cryptid_types::{NewUser, User};

use crate::error::ServiceError;
use crate::password;
use crate::token::{TokenIssuer, LOGIN_TOKEN_TTL};

/// Name of the only user allowed to read, modify, or delete other users.
pub const ADMIN_NAME: &str = "admin";

/// User CRUD plus authentication helpers.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenIssuer>,
}

impl UserService {
    /// Create a service over `repo`, signing tokens with `tokens`.
    pub fn new(repo: Arc<dyn UserRepository>, tokens: TokenIssuer) -> Self {
        Self {
            repo,
            tokens: Arc::new(tokens),
        }
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Every user.
    pub async fn get_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repo.get_all().await?)
    }

    /// The user named `name`.
    pub async fn get_one(&self, name: &str) -> Result<User, ServiceError> {
        Ok(self.repo.get_one(name).await?)
    }

    /// Hash the password and store a new user.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, ServiceError> {
        let user = User {
            name: new_user.name.clone(),
            hash: password::hash(&new_user.password)?,
        };
        let created = self.repo.create(&user).await?;
        tracing::info!(name = %created.name, "User created");
        Ok(created)
    }

    /// Replace the user named `name`, re-hashing the password.
    pub async fn modify(&self, name: &str, new_user: &NewUser) -> Result<User, ServiceError> {
        let user = User {
            name: new_user.name.clone(),
            hash: password::hash(&new_user.password)?,
        };
        let modified = self.repo.modify(name, &user).await?;
        tracing::info!(from = name, to = %modified.name, "User modified");
        Ok(modified)
    }

    /// Delete the user named `name`, leaving a tombstone.
    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        self.repo.delete(name).await?;
        tracing::info!(name, "User deleted");
        Ok(())
    }

    /// Every deleted user.
    pub async fn get_tombstones(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repo.get_tombstones().await?)
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// Look a user up by name, returning `None` on any failure.
    pub async fn lookup_user(&self, name: &str) -> Option<User> {
        match self.repo.get_one(name).await {
            Ok(user) => Some(user),
            Err(DbError::Missing(_)) => {
                tracing::debug!(name, "User not found in the database");
                None
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "User lookup failed");
                None
            }
        }
    }

    /// The user named `name` if `plain` matches their password.
    ///
    /// An unknown user and a wrong password both yield `Ok(None)`.
    pub async fn authenticate(&self, name: &str, plain: &str) -> Result<Option<User>, ServiceError> {
        let user = match self.repo.get_one(name).await {
            Ok(user) => user,
            Err(DbError::Missing(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if password::verify(plain, &user.hash) {
            Ok(Some(user))
        } else {
            tracing::debug!(name, "Password mismatch");
            Ok(None)
        }
    }

    /// Check credentials and issue a login token ([`LOGIN_TOKEN_TTL`]).
    pub async fn login(&self, name: &str, plain: &str) -> Result<Option<String>, ServiceError> {
        let Some(user) = self.authenticate(name, plain).await? else {
            return Ok(None);
        };
        let token = self.tokens.issue(&user.name, Some(LOGIN_TOKEN_TTL))?;
        tracing::info!(name = %user.name, "User logged in");
        Ok(Some(token))
    }

    /// Issue a token for `subject` with an optional lifetime override.
    pub fn issue_token(&self, subject: &str, ttl: Option<TimeDelta>) -> Result<String, ServiceError> {
        self.tokens.issue(subject, ttl)
    }

    /// The subject of `token` if it is authentic and unexpired.
    pub fn validate_token(&self, token: &str) -> Option<String> {
        self.tokens.validate(token)
    }

    /// Resolve a session token to its user.
    ///
    /// `None` if there is no token, the token is invalid or expired, or
    /// the user it names no longer exists.
    pub async fn current_user(&self, token: Option<&str>) -> Option<User> {
        let Some(token) = token else {
            tracing::debug!("No token found in cookies");
            return None;
        };
        let name = self.validate_token(token)?;
        self.lookup_user(&name).await
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
