//! Static credential table.
//!
//! Passwords are plaintext and compared with plain string equality. There
//! is no hashing, no attempt counter, and no lockout.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{GatewayError, GatewayResult};

/// A username/password pair from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredUser {
    pub username: String,
    pub password: String,
}

impl ConfiguredUser {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// Read-only credential store keyed by username.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: Arc<HashMap<String, String>>,
}

impl CredentialStore {
    /// Build the store, refusing duplicate usernames.
    pub fn new(users: Vec<ConfiguredUser>) -> GatewayResult<Self> {
        let mut map = HashMap::with_capacity(users.len());
        for user in users {
            if map.contains_key(&user.username) {
                return Err(GatewayError::Config(format!(
                    "duplicate username '{}'",
                    user.username
                )));
            }
            map.insert(user.username, user.password);
        }
        Ok(Self {
            users: Arc::new(map),
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Exact-match authentication. Returns the username on success.
    pub fn authenticate<'a>(&self, username: &'a str, password: &str) -> Option<&'a str> {
        self.users
            .get(username)
            .filter(|stored| stored.as_str() == password)
            .map(|_| username)
    }
}
