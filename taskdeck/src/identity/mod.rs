//! Session identity: who owns the task collection.
//!
//! The identity provider itself (token exchange, refresh, sign-out) is an
//! external collaborator; this module only models the resulting session —
//! an authenticated email owner, or a guest/incognito owner for callers
//! that opt in without signing in.

use taskdeck_proto::task::OwnerId;

/// Suffix for generated guest owner identifiers.
const GUEST_DOMAIN: &str = "incognito.local";

/// Default display name for guest sessions.
pub const DEFAULT_GUEST_NAME: &str = "Guest User";

/// Errors constructing a session.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The supplied email cannot serve as an owner identifier.
    #[error("invalid owner email: {0:?}")]
    InvalidEmail(String),
}

/// An active session scoping every task operation to one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner: OwnerId,
    display_name: String,
    guest: bool,
}

impl Session {
    /// Creates a session for an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidEmail`] for a blank address or one
    /// without an `@`.
    pub fn authenticated(email: &str) -> Result<Self, IdentityError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(IdentityError::InvalidEmail(email.to_string()));
        }
        let display_name = email.split('@').next().unwrap_or(email).to_string();
        Ok(Self {
            owner: OwnerId::new(email),
            display_name,
            guest: false,
        })
    }

    /// Creates a guest session with a generated incognito owner.
    ///
    /// The owner is derived from the display name, so the same guest name
    /// maps to the same task set across restarts.
    #[must_use]
    pub fn guest(display_name: &str) -> Self {
        let display_name = if display_name.trim().is_empty() {
            DEFAULT_GUEST_NAME.to_string()
        } else {
            display_name.trim().to_string()
        };
        let slug = display_name.to_lowercase().replace(' ', ".");
        Self {
            owner: OwnerId::new(format!("{slug}@{GUEST_DOMAIN}")),
            display_name,
            guest: true,
        }
    }

    /// The owner identifier scoping this session's tasks.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Name shown in the UI for this session.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether this is a guest/incognito session.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.guest
    }
}
