use std::sync::Mutex;

use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::{
    auth::{
        dto::PublicUser,
        password::{hash_password, verify_password},
        repo::{StoreError, UserStore},
        repo_types::{UserRecord, UserTable},
        validation::{is_valid_email, is_valid_password, normalize_email},
    },
    config::StoragePolicy,
};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid email or password")]
    InvalidInput,
    #[error("email and password required")]
    MissingCredentials,
    #[error("email already exists")]
    AlreadyExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Registration and login over a [`UserStore`].
///
/// The table is reloaded on every call. Registration holds `write_lock` across
/// load, duplicate check and save so two registrations in this process cannot
/// overwrite each other.
pub struct AccountService {
    store: UserStore,
    policy: StoragePolicy,
    write_lock: Mutex<()>,
}

impl AccountService {
    pub fn new(store: UserStore, policy: StoragePolicy) -> Self {
        Self {
            store,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn register(&self, email: &str, password: &str) -> Result<(), AccountError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) || !is_valid_password(password) {
            debug!(email = %email, "register rejected: invalid input");
            return Err(AccountError::InvalidInput);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut users = self.load()?;
        if users.contains_key(&email) {
            info!(email = %email, "register rejected: email already exists");
            return Err(AccountError::AlreadyExists);
        }

        let password_hash =
            hash_password(password).map_err(|e| AccountError::Internal(e.to_string()))?;
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        users.insert(email.clone(), UserRecord::new(password_hash, created_at));
        self.save(&users)?;

        info!(email = %email, "user registered");
        Ok(())
    }

    pub fn login(&self, email: &str, password: &str) -> Result<PublicUser, AccountError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AccountError::MissingCredentials);
        }

        let mut users = self.load()?;
        let Some(record) = users.remove(&email) else {
            info!(email = %email, "login unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let matches = record
            .password_hash()
            .is_some_and(|hash| verify_password(password, hash));
        if !matches {
            info!(email = %email, "login invalid password");
            return Err(AccountError::InvalidCredentials);
        }

        info!(email = %email, "user logged in");
        Ok(PublicUser {
            email,
            created_at: record.created_at().map(str::to_owned),
        })
    }

    fn load(&self) -> Result<UserTable, AccountError> {
        match (self.store.load(), self.policy) {
            (Ok(users), _) => Ok(users),
            (Err(e), StoragePolicy::Lenient) => {
                warn!(error = %e, "users file unreadable, continuing with empty table");
                Ok(UserTable::new())
            }
            (Err(e), StoragePolicy::Strict) => Err(e.into()),
        }
    }

    fn save(&self, users: &UserTable) -> Result<(), AccountError> {
        match (self.store.save(users), self.policy) {
            (Ok(()), _) => Ok(()),
            (Err(e), StoragePolicy::Lenient) => {
                warn!(error = %e, "users file not saved, continuing");
                Ok(())
            }
            (Err(e), StoragePolicy::Strict) => Err(e.into()),
        }
    }
}
