//! User roles known to the auth service.
//!
//! The auth service expects upper-case role names on login and
//! registration but answers in whatever case it stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_PASSENGER: &str = "passenger";
pub const ROLE_DRIVER: &str = "driver";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Passenger,
    Driver,
    Admin,
}

impl Role {
    /// Parse a role name in any case.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            ROLE_PASSENGER => Ok(Self::Passenger),
            ROLE_DRIVER => Ok(Self::Driver),
            ROLE_ADMIN => Ok(Self::Admin),
            _ => Err(CoreError::UnknownRole(name.to_string())),
        }
    }

    /// Lower-case name, as persisted client-side.
    pub fn name(self) -> &'static str {
        match self {
            Self::Passenger => ROLE_PASSENGER,
            Self::Driver => ROLE_DRIVER,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Where a freshly logged-in user of this role lands.
    pub fn home_path(self) -> &'static str {
        match self {
            Self::Passenger => "/passenger/plan",
            Self::Driver => "/driver/dashboard",
            Self::Admin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
