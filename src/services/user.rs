//! User accounts: registration and credential checks.
//!
//! DESIGN
//! ======
//! Users live in memory keyed by id; emails are unique after trimming and
//! lowercasing. Passwords are stored as Argon2id PHC strings. Hashing and
//! verification are CPU-bound, so they run on the blocking pool.
//!
//! A login for an unknown email still verifies against a throwaway hash so
//! that unknown-email and wrong-password attempts take the same time.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;
use serde::Serialize;
use tokio::sync::{OnceCell, RwLock};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("invalid registration: {0}")]
    Invalid(&'static str),
    #[error("a user with email {0} already exists")]
    AlreadyExists(String),
    #[error("login incorrect")]
    LoginIncorrect,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

struct StoredUser {
    profile: UserProfile,
    password_hash: String,
}

/// Shared user store. Clones share the same users.
#[derive(Clone)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<Uuid, StoredUser>>>,
    params: Params,
    dummy_hash: Arc<OnceCell<String>>,
}

impl UserStore {
    /// Store hashing new passwords with `params`.
    #[must_use]
    pub fn new(params: Params) -> Self {
        Self { users: Arc::new(RwLock::new(HashMap::new())), params, dummy_hash: Arc::new(OnceCell::new()) }
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// `Invalid` for malformed input, `AlreadyExists` for a taken email,
    /// `Hash` if hashing fails.
    pub async fn register(&self, new_user: NewUser) -> Result<UserProfile, UserError> {
        let email = normalize_email(&new_user.email);
        validate(&email, &new_user)?;

        let password_hash = self.hash(new_user.password).await?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.profile.email == email) {
            return Err(UserError::AlreadyExists(email));
        }

        let profile = UserProfile {
            id: Uuid::new_v4(),
            email,
            first_name: new_user.first_name.trim().to_owned(),
            last_name: new_user.last_name.trim().to_owned(),
        };
        users.insert(profile.id, StoredUser { profile: profile.clone(), password_hash });
        Ok(profile)
    }

    /// Check credentials.
    ///
    /// # Errors
    ///
    /// `LoginIncorrect` for an unknown email or wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserProfile, UserError> {
        let email = normalize_email(email);
        let found = {
            let users = self.users.read().await;
            users
                .values()
                .find(|u| u.profile.email == email)
                .map(|u| (u.profile.clone(), u.password_hash.clone()))
        };

        let (profile, hash) = match found {
            Some((profile, hash)) => (Some(profile), hash),
            None => (None, self.dummy_hash().await?),
        };

        let matches = verify(password.to_owned(), hash).await;
        match profile {
            Some(profile) if matches => Ok(profile),
            _ => Err(UserError::LoginIncorrect),
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<UserProfile> {
        self.users.read().await.get(&id).map(|u| u.profile.clone())
    }

    async fn hash(&self, password: String) -> Result<String, UserError> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || hash_password(params, &password))
            .await
            .map_err(|e| UserError::Hash(e.to_string()))?
    }

    async fn dummy_hash(&self) -> Result<String, UserError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash(crate::services::session::generate_token()))
            .await
            .cloned()
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn validate(email: &str, new_user: &NewUser) -> Result<(), UserError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(UserError::Invalid("email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(UserError::Invalid("email must contain '@'"));
    }
    if new_user.first_name.trim().is_empty() || new_user.last_name.trim().is_empty() {
        return Err(UserError::Invalid("first and last name are required"));
    }
    if new_user.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserError::Invalid("password must be at least 8 characters"));
    }
    Ok(())
}

fn hash_password(params: Params, password: &str) -> Result<String, UserError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| UserError::Hash(e.to_string()))?;
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::Hash(e.to_string()))
}

/// Verify against a PHC string; the hash carries its own parameters.
async fn verify(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || {
        PasswordHash::new(&hash).is_ok_and(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    })
    .await
    .unwrap_or(false)
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
