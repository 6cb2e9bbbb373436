//! Session domain model
//!
//! A `Session` is the in-memory pairing of an identity with its coin
//! balance. A `SessionSnapshot` is the flat record persisted to the
//! session slot: `{id, name, email, avatar, coins}`.

use serde::{Deserialize, Serialize};

use super::identity::Identity;
use super::result::{Error, Result};

/// The currently signed-in identity and its coin balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Identity,
    coins: u64,
}

impl Session {
    pub fn new(identity: Identity, coins: u64) -> Self {
        Self { identity, coins }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    /// Return a copy of this session with `amount` added to the balance
    ///
    /// Fails without touching the balance if the addition would overflow.
    pub fn credited(&self, amount: u64) -> Result<Session> {
        let coins = self.coins.checked_add(amount).ok_or_else(|| {
            Error::validation(format!(
                "crediting {} coins would overflow a balance of {}",
                amount, self.coins
            ))
        })?;
        Ok(Session {
            identity: self.identity.clone(),
            coins,
        })
    }

    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.identity.id.clone(),
            name: self.identity.name.clone(),
            email: self.identity.email.clone(),
            avatar: self.identity.avatar.clone(),
            coins: self.coins,
        }
    }
}

/// Serialized form of a session as stored in the key-value slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub coins: u64,
}

impl SessionSnapshot {
    /// Parse and schema-check a raw snapshot
    ///
    /// Missing fields, wrong types, negative or fractional coin values and
    /// an empty id are all rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let snapshot: SessionSnapshot = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::validation("snapshot has an empty id"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<SessionSnapshot> for Session {
    fn from(snapshot: SessionSnapshot) -> Self {
        Session::new(
            Identity::new(snapshot.id, snapshot.name, snapshot.email, snapshot.avatar),
            snapshot.coins,
        )
    }
}
