// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session composed from an identity and its profile.

use crate::models::{Role, UserProfile};
use crate::services::identity::Identity;

/// A signed-in user whose profile record was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Identity provider subject id (also the profile document id)
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub blocked: bool,
}

impl Session {
    /// Merge identity fields with profile fields; profile values win.
    pub fn compose(identity: &Identity, profile: &UserProfile) -> Self {
        let email = if profile.email.is_empty() {
            identity.email.clone()
        } else {
            profile.email.clone()
        };

        Self {
            uid: identity.uid.clone(),
            email,
            name: profile.name.clone(),
            role: profile.role.clone(),
            blocked: profile.blocked,
        }
    }

    /// Header text, e.g. `Иван (admin)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.role.as_str())
    }

    pub fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}
