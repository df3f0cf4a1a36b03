//! Record structs for creatures, explorers, and users.
//!
//! Field rules are declared with [`validator`] and checked at the HTTP
//! boundary before a record reaches the service layer. Names are capped at
//! 128 characters and free-text fields at 4096.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::record::Record;

// ---------------------------------------------------------------------------
// Creature
// ---------------------------------------------------------------------------

/// A cryptid sighting record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Creature {
    /// Unique creature name (primary key).
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Country the creature is associated with.
    #[validate(length(max = 4096))]
    pub country: Option<String>,
    /// Region or area within the country.
    #[validate(length(max = 4096))]
    pub area: Option<String>,
    /// Free-text description.
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    /// Other names the creature is known by.
    #[validate(length(max = 4096))]
    pub aka: Option<String>,
}

impl Creature {
    /// Create a creature with only its name set.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            country: None,
            area: None,
            description: None,
            aka: None,
        }
    }
}

impl Record for Creature {
    const KIND: &'static str = "Creature";

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Explorer
// ---------------------------------------------------------------------------

/// A person who goes looking for creatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Explorer {
    /// Unique explorer name (primary key).
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Home country.
    #[validate(length(max = 4096))]
    pub country: Option<String>,
    /// Short biography.
    #[validate(length(max = 4096))]
    pub description: Option<String>,
}

impl Explorer {
    /// Create an explorer with only its name set.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            country: None,
            description: None,
        }
    }
}

impl Record for Explorer {
    const KIND: &'static str = "Explorer";

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A stored user account.
///
/// `hash` is a PHC-format password hash, never a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    /// Unique user name (primary key).
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Password hash.
    pub hash: String,
}

impl Record for User {
    const KIND: &'static str = "User";

    fn name(&self) -> &str {
        &self.name
    }
}

/// Request body for creating or replacing a user.
///
/// The plaintext password is hashed by the service layer before the
/// resulting [`User`] is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewUser {
    /// Unique user name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Plaintext password.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
